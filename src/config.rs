/// Tuning shared by the simulation and the renderer.
///
/// Built once at startup and handed out by reference.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// screen size in pixels
    pub screen_width: u32,
    pub screen_height: u32,
    /// horizontal field of view in degrees
    pub fov: f32,
    /// wall height relative to the distance between the eye and the projection plane
    pub wall_height: f32,
    /// distance walked per tick, in cells
    pub walk_step: f32,
    /// angle turned per tick, in radians
    pub turn_step: f32,
    /// simulation ticks per second
    pub tick_rate: u32,
    /// width of the wall texture in texels
    pub texture_width: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_width: 1440,
            screen_height: 720,
            fov: 90.,
            wall_height: 0.5,
            walk_step: 0.03,
            turn_step: 0.05,
            tick_rate: 60,
            texture_width: 64,
        }
    }
}

impl Config {
    pub fn fov_rad(&self) -> f32 {
        self.fov.to_radians()
    }

    /// Time between two simulation ticks.
    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_micros(1_000_000 / u64::from(self.tick_rate.max(1)))
    }
}

use crate::config::Config;
use crate::map::GridMap;
use crate::player::Pose;
use crate::ray::{cast, Cardinal};

/// Draw descriptor for one screen column.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Strip {
    /// destination screen column
    pub column: u32,
    /// wall height in pixels, not clipped to the screen
    pub height: f32,
    /// screen row the strip is centred on
    pub center_y: i32,
    /// source column in the wall texture
    pub tex_column: u32,
    pub distance: f32,
    pub face_direction: Cardinal,
}

/// Part of a strip that lands on the screen.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Clipped {
    /// first visible screen row
    pub top: i32,
    /// number of visible rows
    pub rows: u32,
    /// visible span of the texture, as fractions of its height
    pub tex_top: f32,
    pub tex_bottom: f32,
}

impl Strip {
    /// first screen row covered by the strip (may be negative)
    pub fn top(&self) -> i32 {
        self.center_y - (self.height as i32) / 2
    }

    /// Clip the strip to a screen `screen_height` rows tall.
    ///
    /// Walls right in front of the eye are far taller than the screen; only
    /// the middle of the texture is then visible.
    pub fn clip(&self, screen_height: u32) -> Option<Clipped> {
        if self.height.is_nan() || self.height <= 0. {
            return None;
        }

        let top = self.center_y as f32 - self.height / 2.;
        let bottom = top + self.height;
        let visible_top = top.max(0.);
        let visible_bottom = bottom.min(screen_height as f32);
        if visible_bottom <= visible_top {
            return None;
        }

        let first = visible_top.floor();
        Some(Clipped {
            top: first as i32,
            rows: ((visible_bottom.ceil() - first) as u32).max(1),
            tex_top: (visible_top - top) / self.height,
            tex_bottom: (visible_bottom - top) / self.height,
        })
    }
}

/// Per-column perspective projection of the map as seen from a pose.
///
/// Holds only the screen geometry, so a single value can be reused for every
/// frame.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Projection {
    screen_width: u32,
    screen_height: u32,
    wall_height: f32,
    texture_width: u32,
    /// distance from the eye to the projection plane, in pixels
    distance: f32,
}

impl Projection {
    pub fn new(config: &Config) -> Self {
        Self {
            screen_width: config.screen_width,
            screen_height: config.screen_height,
            wall_height: config.wall_height,
            texture_width: config.texture_width.max(1),
            distance: config.screen_width as f32 / 2. / (config.fov_rad() / 2.).tan(),
        }
    }

    pub fn projection_distance(&self) -> f32 {
        self.distance
    }

    /// Angle of `column` relative to the view direction.
    pub fn column_angle(&self, column: u32) -> f32 {
        (column as f32 - (self.screen_width / 2) as f32).atan2(self.distance)
    }

    /// On-screen height of a wall `distance` away seen at `gamma` off-centre.
    ///
    /// Dividing by `cos(gamma)` turns the ray length into the distance to the
    /// projection plane, which keeps straight walls straight.
    pub fn strip_height(&self, distance: f32, gamma: f32) -> f32 {
        self.wall_height * self.distance / (distance * gamma.cos())
    }

    pub fn strip(&self, map: &GridMap, pose: Pose, column: u32) -> Strip {
        let gamma = self.column_angle(column);
        let ray = cast(map, pose.pos, pose.heading + gamma);

        Strip {
            column,
            height: self.strip_height(ray.distance, gamma),
            center_y: (self.screen_height / 2) as i32,
            tex_column: ((self.texture_width as f32 * ray.tex_u).floor() as u32)
                .min(self.texture_width - 1),
            distance: ray.distance,
            face_direction: ray.face_direction,
        }
    }

    /// Strips for every screen column, left to right.
    pub fn strips<'a>(&'a self, map: &'a GridMap, pose: Pose) -> impl Iterator<Item = Strip> + 'a {
        (0..self.screen_width).map(move |column| self.strip(map, pose, column))
    }

    pub fn frame(&self, map: &GridMap, pose: Pose) -> Vec<Strip> {
        self.strips(map, pose).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn open_field() -> GridMap {
        "2.5 2.5 0\n.....\n.....\n.....\n.....\n.....".parse().unwrap()
    }

    fn config() -> Config {
        Config {
            screen_width: 640,
            screen_height: 480,
            ..Config::default()
        }
    }

    #[test]
    fn projection_distance_at_ninety_degrees() {
        let projection = Projection::new(&config());
        assert!((projection.projection_distance() - 320.).abs() < 1e-3);
    }

    #[test]
    fn centre_column_looks_straight_ahead() {
        let projection = Projection::new(&config());
        assert_eq!(projection.column_angle(320), 0.);
        assert!(projection.column_angle(0) < 0.);
        assert!(projection.column_angle(639) > 0.);
        // 90 degree field of view: edges are about 45 degrees off
        assert!((projection.column_angle(0) + std::f32::consts::FRAC_PI_4).abs() < 1e-2);
    }

    #[test]
    fn no_fisheye_correction_straight_ahead() {
        let projection = Projection::new(&config());
        let d = 2.5;
        assert_eq!(
            projection.strip_height(d, 0.),
            0.5 * projection.projection_distance() / d
        );
    }

    #[test]
    fn flat_wall_projects_flat() {
        let map = open_field();
        let projection = Projection::new(&config());
        let pose = Pose::new(Vec2::new(2.5, 2.5), 0.);

        // every column facing the east boundary sees it at the same plane distance
        let heights: Vec<f32> = projection
            .strips(&map, pose)
            .filter(|strip| strip.face_direction == Cardinal::West)
            .map(|strip| strip.height)
            .collect();
        assert!(!heights.is_empty());
        for height in &heights {
            assert!((height - heights[0]).abs() / heights[0] < 1e-2);
        }
    }

    #[test]
    fn centre_strip_samples_middle_of_face() {
        let map = open_field();
        let projection = Projection::new(&config());
        let strip = projection.strip(&map, Pose::new(Vec2::new(2.5, 2.5), 0.), 320);

        assert_eq!(strip.column, 320);
        assert_eq!(strip.center_y, 240);
        assert_eq!(strip.tex_column, 32);
        assert!((strip.distance - 2.5).abs() < 1e-3);
        assert!((strip.height - 0.5 * 320. / 2.5).abs() < 0.1);
        assert_eq!(strip.top(), 240 - strip.height as i32 / 2);
    }

    #[test]
    fn strip_inside_screen_is_not_clipped() {
        let map = open_field();
        let projection = Projection::new(&config());
        let strip = projection.strip(&map, Pose::new(Vec2::new(2.5, 2.5), 0.), 320);
        let clipped = strip.clip(480).unwrap();

        assert_eq!(clipped.top, (240. - strip.height / 2.).floor() as i32);
        assert!((clipped.rows as f32 - strip.height).abs() <= 2.);
        assert_eq!(clipped.tex_top, 0.);
        assert!((clipped.tex_bottom - 1.).abs() < 1e-6);
    }

    #[test]
    fn wall_right_in_front_fills_the_screen() {
        let map: GridMap = "1.5 1.5 0\n###\n#.#\n###".parse().unwrap();
        let config = Config::default();
        let projection = Projection::new(&config);
        let strip = projection.strip(&map, Pose::new(Vec2::new(1.99, 1.5), 0.), 720);
        assert!(strip.height > 10_000.);

        let clipped = strip.clip(config.screen_height).unwrap();
        assert_eq!(clipped.top, 0);
        assert_eq!(clipped.rows, config.screen_height);
        // only a thin band around the middle of the texture shows
        assert!(clipped.tex_top > 0.45 && clipped.tex_top < 0.5);
        assert!(clipped.tex_bottom > 0.5 && clipped.tex_bottom < 0.55);
    }

    #[test]
    fn strip_off_screen_is_dropped() {
        let strip = Strip {
            column: 0,
            height: 10.,
            center_y: -100,
            tex_column: 0,
            distance: 1.,
            face_direction: Cardinal::North,
        };
        assert_eq!(strip.clip(480), None);
        assert_eq!(Strip { height: 0., ..strip }.clip(480), None);
    }

    #[test]
    fn frame_has_one_strip_per_column_in_order() {
        let map = open_field();
        let projection = Projection::new(&config());
        let frame = projection.frame(&map, map.spawn());

        assert_eq!(frame.len(), 640);
        for (i, strip) in frame.iter().enumerate() {
            assert_eq!(strip.column, i as u32);
            assert!(strip.tex_column < 64);
            assert!(strip.height.is_finite() && strip.height > 0.);
        }
    }
}

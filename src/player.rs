use crate::map::GridMap;
use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Position and facing of a viewpoint.
///
/// `heading` is in radians with `(cos, sin)` as the forward vector. Turning
/// does not wrap it, see [`Player::wrap_heading`].
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Pose {
    pub pos: Vec2,
    pub heading: f32,
}

impl Pose {
    pub fn new(pos: Vec2, heading: f32) -> Self {
        Self { pos, heading }
    }

    /// unit vector pointing where the pose looks
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }
}

/// The player: a pose that is only ever committed to floor cells.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Player {
    pose: Pose,
}

impl Player {
    /// Create a player standing on the map's spawn point.
    pub fn spawned(map: &GridMap) -> Self {
        let mut this = Self::default();
        this.spawn(map);
        this
    }

    pub fn spawn(&mut self, map: &GridMap) {
        self.pose = map.spawn();
        log::debug!("spawned at {} facing {:.3}", self.pose.pos, self.pose.heading);
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn turn_left(&mut self, angle: f32) {
        self.pose.heading -= angle;
    }

    pub fn turn_right(&mut self, angle: f32) {
        self.pose.heading += angle;
    }

    /// Bring the heading back into [0, 2π) so it keeps full precision over a
    /// long session.
    pub fn wrap_heading(&mut self) {
        self.pose.heading = self.pose.heading.rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative headings
        if self.pose.heading >= TAU {
            self.pose.heading = 0.;
        }
    }

    pub fn move_forward(&mut self, map: &GridMap, dist: f32) -> bool {
        self.try_step(map, self.pose.heading, dist)
    }

    pub fn move_backward(&mut self, map: &GridMap, dist: f32) -> bool {
        self.try_step(map, self.pose.heading, -dist)
    }

    pub fn strafe_left(&mut self, map: &GridMap, dist: f32) -> bool {
        self.try_step(map, self.pose.heading - FRAC_PI_2, dist)
    }

    pub fn strafe_right(&mut self, map: &GridMap, dist: f32) -> bool {
        self.try_step(map, self.pose.heading + FRAC_PI_2, dist)
    }

    /// Move `dist` along `angle` unless the destination is a wall.
    ///
    /// Only the destination point is tested, the path to it is not swept.
    fn try_step(&mut self, map: &GridMap, angle: f32, dist: f32) -> bool {
        let candidate = self.pose.pos + Vec2::from_angle(angle) * dist;
        if map.is_wall_at(candidate) {
            return false;
        }

        self.pose.pos = candidate;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // floor cells x in 1..=3, walls on the ring
    const ROOM: &str = "2.5 2.5 0\n#####\n#...#\n#...#\n#...#\n#####";

    fn room() -> GridMap {
        ROOM.parse().unwrap()
    }

    #[test]
    fn spawn_copies_map_pose() {
        let map = room();
        let player = Player::spawned(&map);
        assert_eq!(player.pose(), map.spawn());
    }

    #[test]
    fn walks_along_heading() {
        let map = room();
        let mut player = Player::spawned(&map);

        assert!(player.move_forward(&map, 0.5));
        assert!((player.pose().pos - Vec2::new(3.0, 2.5)).length() < 1e-6);

        assert!(player.move_backward(&map, 1.0));
        assert!((player.pose().pos - Vec2::new(2.0, 2.5)).length() < 1e-6);
    }

    #[test]
    fn strafes_perpendicular() {
        let map = room();
        let mut player = Player::spawned(&map);

        // heading 0 looks along +x, +y is down the screen so left is -y
        assert!(player.strafe_left(&map, 0.5));
        assert!((player.pose().pos - Vec2::new(2.5, 2.0)).length() < 1e-6);

        assert!(player.strafe_right(&map, 1.0));
        assert!((player.pose().pos - Vec2::new(2.5, 3.0)).length() < 1e-6);
    }

    #[test]
    fn rejected_move_keeps_pose() {
        let map = room();
        let mut player = Player::spawned(&map);
        let before = player.pose();

        assert!(!player.move_forward(&map, 2.0));
        assert_eq!(player.pose(), before);
        assert!(!player.strafe_left(&map, 1.8));
        assert_eq!(player.pose(), before);
    }

    #[test]
    fn linear_motion_keeps_heading() {
        let map = room();
        let mut player = Player::spawned(&map);
        player.turn_right(0.7);
        let heading = player.pose().heading;

        player.move_forward(&map, 0.3);
        player.move_backward(&map, 0.1);
        player.strafe_left(&map, 0.2);
        player.strafe_right(&map, 5.0);
        assert_eq!(player.pose().heading, heading);
    }

    #[test]
    fn turning_round_trips() {
        let map = room();
        let mut player = Player::spawned(&map);

        for delta in [0.05, 1.0, 3.5, 100.0] {
            let before = player.pose().heading;
            player.turn_left(delta);
            player.turn_right(delta);
            assert!((player.pose().heading - before).abs() < 1e-4);
        }
    }

    #[test]
    fn wrapping_keeps_direction() {
        let map = room();
        let mut player = Player::spawned(&map);

        for _ in 0..10_000 {
            player.turn_right(0.05);
            player.wrap_heading();
        }
        let heading = player.pose().heading;
        assert!((0. ..TAU).contains(&heading));
        // 500 rad clockwise, reduced by whole turns
        let expected = 500_f64.rem_euclid(std::f64::consts::TAU) as f32;
        assert!((heading - expected).abs() < 0.05, "{heading} vs {expected}");

        player.turn_left(heading + 1e-9);
        player.wrap_heading();
        assert!((0. ..TAU).contains(&player.pose().heading));
    }

    #[test]
    fn repeated_steps_stop_before_wall() {
        let map = room();
        let mut player = Player::spawned(&map);

        // 0.2 short of the east wall face at x = 4
        player.pose.pos.x = 3.8;
        for _ in 0..10 {
            assert!(!player.move_forward(&map, 0.3));
            assert!((player.pose().pos.x - 3.8).abs() < 1e-6);
        }

        player.pose.pos.x = 2.45;
        let mut committed = 0;
        for _ in 0..20 {
            if player.move_forward(&map, 0.3) {
                committed += 1;
            }
            assert!(!map.is_wall_at(player.pose().pos));
        }
        assert_eq!(committed, 5);
        assert_eq!(player.pose().pos.x.floor(), 3.);
    }
}

use crate::map::GridMap;
use glam::Vec2;

/// Rays closer than this to an axis count as parallel to it; it is also how
/// far the marching seed is nudged past a grid line.
pub const EPSILON: f32 = 0.0001;

/// Stand-in for an infinite distance.
pub const FAR: f32 = 1.0e6;

/// Face of the wall cell a ray struck.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

/// Family of grid lines a hit lies on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Axis {
    /// lines of constant y
    Horizontal,
    /// lines of constant x
    Vertical,
}

impl Cardinal {
    pub fn axis(self) -> Axis {
        match self {
            Cardinal::North | Cardinal::South => Axis::Horizontal,
            Cardinal::East | Cardinal::West => Axis::Vertical,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RayCast {
    /// where the ray stopped, in map units
    pub hit: Vec2,
    pub distance: f32,
    pub face_direction: Cardinal,
    /// position along the struck face, in [0, 1)
    pub tex_u: f32,
}

impl RayCast {
    pub fn axis(&self) -> Axis {
        self.face_direction.axis()
    }
}

fn frac(v: f32) -> f32 {
    v - v.floor()
}

/// keep texture coordinates in [0, 1), `1 - frac(0)` would otherwise give 1
fn wrap_unit(u: f32) -> f32 {
    if (0. ..1.).contains(&u) {
        u
    } else {
        frac(u).min(1. - f32::EPSILON)
    }
}

/// Step from `ray` by `step` until the landing cell is a wall.
///
/// Every step advances one whole cell along its axis, so the ray leaves the
/// grid (where everything is wall) after a bounded number of steps.
fn march(map: &GridMap, mut ray: Vec2, step: Vec2) -> Vec2 {
    loop {
        ray += step;
        if map.is_wall_at(ray) {
            return ray;
        }
    }
}

/// Hit against lines of constant y.
fn cast_horizontal(map: &GridMap, origin: Vec2, angle: f32) -> Option<(Vec2, Cardinal, f32)> {
    let sin = angle.sin();

    let (ray, step, cardinal) = if sin > EPSILON {
        // looking down
        let dx = 1. / angle.tan();
        let y = origin.y.floor() + EPSILON;
        (
            Vec2::new(origin.x - (origin.y - y) * dx, y),
            Vec2::new(dx, 1.),
            Cardinal::North,
        )
    } else if sin < -EPSILON {
        // looking up
        let dx = 1. / (-angle).tan();
        let y = origin.y.floor() + 1. - EPSILON;
        (
            Vec2::new(origin.x - (y - origin.y) * dx, y),
            Vec2::new(dx, -1.),
            Cardinal::South,
        )
    } else {
        // sideways (parallel - will never hit)
        return None;
    };

    let hit = march(map, ray, step);
    let tex_u = match cardinal {
        Cardinal::North => 1. - frac(hit.x),
        _ => frac(hit.x),
    };

    Some((hit, cardinal, tex_u))
}

/// Hit against lines of constant x.
fn cast_vertical(map: &GridMap, origin: Vec2, angle: f32) -> Option<(Vec2, Cardinal, f32)> {
    let cos = angle.cos();

    let (ray, step, cardinal) = if cos > EPSILON {
        // looking right
        let dy = angle.tan();
        let x = origin.x.floor() + EPSILON;
        (
            Vec2::new(x, origin.y - (origin.x - x) * dy),
            Vec2::new(1., dy),
            Cardinal::West,
        )
    } else if cos < -EPSILON {
        // looking left
        let dy = (-angle).tan();
        let x = origin.x.floor() + 1. - EPSILON;
        (
            Vec2::new(x, origin.y - (x - origin.x) * dy),
            Vec2::new(-1., dy),
            Cardinal::East,
        )
    } else {
        // looking up/down (parallel - will never hit)
        return None;
    };

    let hit = march(map, ray, step);
    let tex_u = match cardinal {
        Cardinal::West => frac(hit.y),
        _ => 1. - frac(hit.y),
    };

    Some((hit, cardinal, tex_u))
}

/// Cast one ray from `origin` along the global `angle` and return the nearest
/// wall it strikes.
///
/// # Panics
///
/// If `angle` is not finite: neither family of grid lines can be crossed.
pub fn cast(map: &GridMap, origin: Vec2, angle: f32) -> RayCast {
    let horizontal = cast_horizontal(map, origin, angle);
    let vertical = cast_vertical(map, origin, angle);

    // find shortest ray, horizontal wins ties
    let (hit, face_direction, tex_u) = match (horizontal, vertical) {
        (Some(h), Some(v)) => {
            if origin.distance(v.0) < origin.distance(h.0) {
                v
            } else {
                h
            }
        }
        (Some(res), None) | (None, Some(res)) => res,
        (None, None) => unreachable!("ray at angle {angle} crosses no grid line"),
    };

    RayCast {
        hit,
        distance: origin.distance(hit).min(FAR),
        face_direction,
        tex_u: wrap_unit(tex_u),
    }
}

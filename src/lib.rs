//! First-person grid ray-casting core: map, player, ray caster, per-column
//! projection and the fixed-rate simulation that drives the player.

pub mod config;
pub mod map;
pub mod player;
pub mod projection;
pub mod ray;
pub mod sim;

pub use config::Config;
pub use map::{Cell, GridMap, MapError};
pub use player::{Player, Pose};
pub use projection::{Clipped, Projection, Strip};
pub use ray::{cast, Axis, Cardinal, RayCast};
pub use sim::{Control, Controls, Simulation};

//! Text front-end: simulate for a while, then print the view and a minimap.

use anyhow::Context;
use caster::{Cardinal, Cell, Config, Control, Controls, GridMap, Pose, Projection, Simulation, Strip};
use std::f32::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

/// wall shades from near to far
const NEAR_TO_FAR: &[u8] = b"@%#*+=-:";

pub(crate) fn run(
    map: Arc<GridMap>,
    config: &Config,
    held: impl IntoIterator<Item = Control>,
    seconds: f32,
) -> anyhow::Result<()> {
    let seconds = seconds.max(0.);
    let timeout = Duration::try_from_secs_f32(seconds * 4. + 1.)
        .with_context(|| format!("cannot simulate for {seconds} seconds"))?;
    let ticks = (seconds * config.tick_rate as f32) as u64;

    let controls = Arc::new(Controls::default());
    for control in held {
        controls.set(control, true);
    }

    let sim = Simulation::start(Arc::clone(&map), config, controls)?;
    if !sim.wait_ticks(ticks, timeout) {
        log::warn!("only {} of {ticks} ticks ran", sim.ticks());
    }
    let pose = sim.pose();
    sim.shutdown()?;

    let projection = Projection::new(config);
    let frame = projection.frame(&map, pose);
    println!("{}", draw_view(&frame, config.screen_height));
    println!("{}", draw_minimap(&map, pose));
    println!(
        "pos ({:.2}, {:.2}) heading {:.1} deg",
        pose.pos.x,
        pose.pos.y,
        pose.heading.to_degrees()
    );

    Ok(())
}

fn shade(strip: &Strip) -> char {
    let idx = (strip.distance.max(0.) as usize).min(NEAR_TO_FAR.len() - 1);
    // east/west faces one step darker for contrast
    let idx = match strip.face_direction {
        Cardinal::North | Cardinal::South => idx,
        Cardinal::East | Cardinal::West => (idx + 1).min(NEAR_TO_FAR.len() - 1),
    };
    NEAR_TO_FAR[idx] as char
}

/// Rasterize strips into rows of text, blank sky above and `.` floor below.
pub(crate) fn draw_view(frame: &[Strip], rows: u32) -> String {
    let mut out = String::with_capacity(frame.len() * rows as usize + rows as usize);

    for row in 0..rows as i32 {
        for strip in frame {
            let top = strip.top();
            let bottom = top.saturating_add(strip.height.min(i32::MAX as f32) as i32);
            out.push(if row < top {
                ' '
            } else if row >= bottom {
                '.'
            } else {
                shade(strip)
            });
        }
        out.push('\n');
    }
    out.pop();

    out
}

fn heading_glyph(heading: f32) -> char {
    // y grows downwards, so a quarter turn clockwise faces down
    match ((heading.rem_euclid(TAU) / (TAU / 4.)).round() as usize) % 4 {
        0 => '>',
        1 => 'v',
        2 => '<',
        _ => '^',
    }
}

pub(crate) fn draw_minimap(map: &GridMap, pose: Pose) -> String {
    let player = (pose.pos.x.floor() as i64, pose.pos.y.floor() as i64);
    let mut out = String::new();

    for (x, y, cell) in map.cells() {
        if x == 0 && y > 0 {
            out.push('\n');
        }
        out.push(match cell {
            _ if (x as i64, y as i64) == player => heading_glyph(pose.heading),
            Cell::Wall => '#',
            Cell::Floor => ' ',
        });
    }

    out
}

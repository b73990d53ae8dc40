//! SDL2 front-end: window, keyboard state and strip rasterization.

use caster::{Cardinal, Cell, Clipped, Config, Control, Controls, GridMap, Pose, Projection, Simulation};
use sdl2::event::Event;
use sdl2::image::LoadTexture;
use sdl2::keyboard::Scancode;
use sdl2::pixels::Color;
use sdl2::rect::{Point, Rect};
use sdl2::render::{BlendMode, Canvas, Texture, TextureQuery};
use sdl2::video::Window;
use std::path::Path;
use std::sync::Arc;

// minimap layout
const CELL_SIZE: i32 = 15;
const MAP_OFFSET: i32 = 5;
const DOT_SIZE: u32 = 3;

// helper trait to convert strings into std::error types
trait StringToAnyhow<T> {
    fn ah(self) -> anyhow::Result<T>;
}

impl<T> StringToAnyhow<T> for Result<T, String> {
    fn ah(self) -> anyhow::Result<T> {
        self.map_err(|err| anyhow::anyhow!("{err}"))
    }
}

fn control_for(scancode: Scancode) -> Option<Control> {
    match scancode {
        Scancode::W => Some(Control::WalkForward),
        Scancode::S => Some(Control::WalkBackward),
        Scancode::A => Some(Control::StrafeLeft),
        Scancode::D => Some(Control::StrafeRight),
        Scancode::Q | Scancode::Left => Some(Control::TurnLeft),
        Scancode::E | Scancode::Right => Some(Control::TurnRight),
        _ => None,
    }
}

pub(crate) fn run(map: Arc<GridMap>, config: &Config, texture: &Path) -> anyhow::Result<()> {
    // sdl boilerplate
    log::info!("initializing sdl2");
    let sdl_ctx = sdl2::init().ah()?;
    let video = sdl_ctx.video().ah()?;

    log::info!("initializing window");
    let window = video
        .window("caster", config.screen_width, config.screen_height)
        .position_centered()
        .build()?;
    let mut canvas = window.into_canvas().accelerated().present_vsync().build()?;
    let texture_creator = canvas.texture_creator();

    log::info!("loading texture at {}", texture.display());
    let wall = texture_creator.load_texture(texture).ah()?;
    let mut events = sdl_ctx.event_pump().ah()?;

    let config = Config {
        texture_width: wall.query().width,
        ..config.clone()
    };
    let projection = Projection::new(&config);
    let controls = Arc::new(Controls::default());
    let sim = Simulation::start(Arc::clone(&map), &config, Arc::clone(&controls))?;

    'main_loop: loop {
        for ev in events.poll_iter() {
            match ev {
                Event::Quit { .. } => break 'main_loop,
                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => break 'main_loop,
                Event::KeyDown {
                    scancode: Some(sc), ..
                } => {
                    if let Some(control) = control_for(sc) {
                        controls.set(control, true);
                    }
                }
                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    if let Some(control) = control_for(sc) {
                        controls.set(control, false);
                    }
                }
                _ => {}
            }
        }

        let pose = sim.pose();
        draw_view(&mut canvas, &wall, &projection, &map, pose, &config)?;
        draw_minimap(&mut canvas, &map, pose)?;
        canvas.present();
    }

    sim.shutdown()
}

fn draw_view(
    canvas: &mut Canvas<Window>,
    wall: &Texture,
    projection: &Projection,
    map: &GridMap,
    pose: Pose,
    config: &Config,
) -> anyhow::Result<()> {
    let (width, height) = (config.screen_width, config.screen_height);

    // DRAW CEILING
    canvas.set_draw_color(Color::RGB(127, 127, 127));
    canvas.fill_rect(Rect::new(0, 0, width, height / 2)).ah()?;

    // DRAW FLOOR
    canvas.set_draw_color(Color::RGB(7, 75, 22));
    canvas
        .fill_rect(Rect::new(0, height as i32 / 2, width, height - height / 2))
        .ah()?;

    // DRAW WALLS
    let TextureQuery {
        height: tex_height, ..
    } = wall.query();
    for strip in projection.strips(map, pose) {
        let Some(clipped) = strip.clip(height) else {
            continue;
        };
        let (src, dst) = strip_rects(strip.column, strip.tex_column, &clipped, tex_height);
        canvas.copy(wall, src, dst).ah()?;

        // slightly darken walls that face east/west for contrast
        if matches!(strip.face_direction, Cardinal::East | Cardinal::West) {
            canvas.set_blend_mode(BlendMode::Blend);
            canvas.set_draw_color(Color::RGBA(0, 0, 0, 0x22));
            canvas.fill_rect(dst).ah()?;
            canvas.set_blend_mode(BlendMode::None);
        }
    }

    Ok(())
}

/// Source texture rect and destination screen rect for a clipped strip.
fn strip_rects(column: u32, tex_column: u32, clipped: &Clipped, tex_height: u32) -> (Rect, Rect) {
    let src_top = (clipped.tex_top * tex_height as f32) as i32;
    let src_bottom = (clipped.tex_bottom * tex_height as f32).ceil() as i32;
    let src = Rect::new(
        tex_column as i32,
        src_top,
        1,
        (src_bottom - src_top).max(1) as u32,
    );
    let dst = Rect::new(column as i32, clipped.top, 1, clipped.rows);
    (src, dst)
}

fn draw_minimap(canvas: &mut Canvas<Window>, map: &GridMap, pose: Pose) -> anyhow::Result<()> {
    for (x, y, cell) in map.cells() {
        canvas.set_draw_color(match cell {
            Cell::Wall => Color::WHITE,
            Cell::Floor => Color::BLACK,
        });
        canvas
            .fill_rect(Rect::new(
                MAP_OFFSET + x as i32 * CELL_SIZE,
                MAP_OFFSET + y as i32 * CELL_SIZE,
                CELL_SIZE as u32,
                CELL_SIZE as u32,
            ))
            .ah()?;
    }

    let from = Point::new(
        (pose.pos.x * CELL_SIZE as f32) as i32 + MAP_OFFSET,
        (pose.pos.y * CELL_SIZE as f32) as i32 + MAP_OFFSET,
    );
    let dir = pose.forward() * (CELL_SIZE as f32 / 2.);
    let to = from + Point::new(dir.x as i32, dir.y as i32);

    canvas.set_draw_color(Color::RGB(64, 255, 64));
    canvas
        .fill_rect(Rect::new(
            from.x() - DOT_SIZE as i32 / 2,
            from.y() - DOT_SIZE as i32 / 2,
            DOT_SIZE,
            DOT_SIZE,
        ))
        .ah()?;
    canvas.set_draw_color(Color::RGB(255, 255, 64));
    canvas.draw_line(from, to).ah()?;

    Ok(())
}

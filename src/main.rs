use anyhow::Context;
use caster::{Config, Control, GridMap};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

mod headless;
#[cfg(feature = "sdl")]
mod window;

#[derive(Parser, Debug)]
#[command(version, about = "First-person ray-casting over a grid map")]
struct Args {
    /// map file: a `x y heading` spawn line followed by rows of `#` and `.`
    #[arg(default_value = "map/map01.txt")]
    map: PathBuf,

    /// wall texture (window mode only)
    #[arg(long, default_value = "wall.png")]
    texture: PathBuf,

    /// screen width, in pixels or in text columns when headless
    #[arg(long)]
    width: Option<u32>,

    /// screen height, in pixels or in text rows when headless
    #[arg(long)]
    height: Option<u32>,

    /// horizontal field of view in degrees
    #[arg(long)]
    fov: Option<f32>,

    /// print a text frame instead of opening a window
    #[arg(long)]
    headless: bool,

    /// controls held down while simulating (headless only)
    #[arg(long, value_enum, value_delimiter = ',')]
    hold: Vec<Held>,

    /// how long to simulate before printing the frame (headless only)
    #[arg(long, default_value_t = 0., value_parser = parse_seconds)]
    seconds: f32,
}

/// longest headless simulation accepted on the command line
const MAX_SECONDS: f32 = 3600.;

fn parse_seconds(arg: &str) -> Result<f32, String> {
    let seconds: f32 = arg.parse().map_err(|err| format!("{err}"))?;
    if !(0. ..=MAX_SECONDS).contains(&seconds) {
        return Err(format!("expected a duration between 0 and {MAX_SECONDS} seconds"));
    }
    Ok(seconds)
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Held {
    Forward,
    Backward,
    Left,
    Right,
    TurnLeft,
    TurnRight,
}

impl From<Held> for Control {
    fn from(held: Held) -> Self {
        match held {
            Held::Forward => Control::WalkForward,
            Held::Backward => Control::WalkBackward,
            Held::Left => Control::StrafeLeft,
            Held::Right => Control::StrafeRight,
            Held::TurnLeft => Control::TurnLeft,
            Held::TurnRight => Control::TurnRight,
        }
    }
}

impl Args {
    fn config(&self, headless: bool) -> Config {
        let mut config = Config::default();
        if headless {
            config.screen_width = 80;
            config.screen_height = 24;
        }
        config.screen_width = self.width.unwrap_or(config.screen_width).max(1);
        config.screen_height = self.height.unwrap_or(config.screen_height).max(1);
        config.fov = self.fov.unwrap_or(config.fov).clamp(1., 179.);
        config
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("CASTER_LOG");
    let result = run(Args::parse());
    if let Err(err) = &result {
        log::error!("{err:#}");
    }
    result
}

fn run(args: Args) -> anyhow::Result<()> {
    let map = GridMap::load(&args.map)
        .with_context(|| format!("could not load {}", args.map.display()))?;
    let map = Arc::new(map);

    let headless = args.headless || cfg!(not(feature = "sdl"));
    let config = args.config(headless);
    log::info!(
        "{}x{} screen, {} degree field of view",
        config.screen_width,
        config.screen_height,
        config.fov
    );

    if headless {
        let controls = args.hold.iter().map(|held| Control::from(*held));
        headless::run(map, &config, controls, args.seconds)
    } else {
        run_window(map, &config, &args.texture)
    }
}

#[cfg(feature = "sdl")]
fn run_window(map: Arc<GridMap>, config: &Config, texture: &std::path::Path) -> anyhow::Result<()> {
    window::run(map, config, texture)
}

#[cfg(not(feature = "sdl"))]
fn run_window(_map: Arc<GridMap>, _config: &Config, _texture: &std::path::Path) -> anyhow::Result<()> {
    anyhow::bail!("built without the `sdl` feature, use --headless")
}

use crate::config::Config;
use crate::map::GridMap;
use crate::player::{Player, Pose};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// A held control, applied once per simulation tick.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Control {
    WalkForward,
    WalkBackward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
}

impl Control {
    /// tick application order
    pub const ALL: [Control; 6] = [
        Control::WalkForward,
        Control::WalkBackward,
        Control::StrafeLeft,
        Control::StrafeRight,
        Control::TurnLeft,
        Control::TurnRight,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Control flags shared between the event loop and the update thread.
#[derive(Debug, Default)]
pub struct Controls {
    held: [AtomicBool; 6],
}

impl Controls {
    pub fn set(&self, control: Control, held: bool) {
        self.held[control.index()].store(held, Ordering::Relaxed);
    }

    pub fn held(&self, control: Control) -> bool {
        self.held[control.index()].load(Ordering::Relaxed)
    }

    pub fn release_all(&self) {
        for control in Control::ALL {
            self.set(control, false);
        }
    }
}

/// Advance `player` by one tick of every held control.
pub fn tick(player: &mut Player, map: &GridMap, controls: &Controls, config: &Config) {
    for control in Control::ALL.into_iter().filter(|c| controls.held(*c)) {
        match control {
            Control::WalkForward => {
                player.move_forward(map, config.walk_step);
            }
            Control::WalkBackward => {
                player.move_backward(map, config.walk_step);
            }
            Control::StrafeLeft => {
                player.strafe_left(map, config.walk_step);
            }
            Control::StrafeRight => {
                player.strafe_right(map, config.walk_step);
            }
            Control::TurnLeft => player.turn_left(config.turn_step),
            Control::TurnRight => player.turn_right(config.turn_step),
        }
    }
    player.wrap_heading();
}

/// State the update thread publishes for readers.
#[derive(Debug)]
struct Shared {
    running: AtomicBool,
    ticks: AtomicU64,
    pose: RwLock<Pose>,
}

/// Fixed-rate update thread owning the player.
///
/// Readers only ever see whole pose snapshots, published once per tick.
pub struct Simulation {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl Simulation {
    pub fn start(map: Arc<GridMap>, config: &Config, controls: Arc<Controls>) -> anyhow::Result<Self> {
        let mut player = Player::spawned(&map);
        let shared = Arc::new(Shared {
            running: AtomicBool::new(true),
            ticks: AtomicU64::new(0),
            pose: RwLock::new(player.pose()),
        });

        let config = config.clone();
        let period = config.tick_period();
        let worker = Arc::clone(&shared);

        log::info!("starting simulation at {} Hz", config.tick_rate);
        let handle = std::thread::Builder::new()
            .name("simulation".into())
            .spawn(move || {
                let mut next = Instant::now() + period;

                while worker.running.load(Ordering::Acquire) {
                    // sleep until the deadline rather than for a fixed time so
                    // the cadence does not drift
                    let now = Instant::now();
                    if next > now {
                        std::thread::sleep(next - now);
                    } else if now - next > period {
                        log::warn!("simulation tick late by {:?}", now - next);
                    }
                    next += period;

                    tick(&mut player, &map, &controls, &config);
                    *worker.pose.write().unwrap_or_else(PoisonError::into_inner) = player.pose();
                    let n = worker.ticks.fetch_add(1, Ordering::Release) + 1;
                    log::trace!("tick {n}: {:?}", player.pose());
                }
            })?;

        Ok(Self {
            shared,
            handle: Some(handle),
        })
    }

    /// latest published pose
    pub fn pose(&self) -> Pose {
        *self.shared.pose.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// number of ticks run so far
    pub fn ticks(&self) -> u64 {
        self.shared.ticks.load(Ordering::Acquire)
    }

    /// Block until at least `count` ticks have run or `timeout` passed.
    pub fn wait_ticks(&self, count: u64, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.ticks() < count {
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        true
    }

    /// Stop the update thread and wait for it to finish.
    pub fn shutdown(mut self) -> anyhow::Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        self.shared.running.store(false, Ordering::Release);
        let result = handle
            .join()
            .map_err(|_| anyhow::anyhow!("simulation thread panicked"));
        log::info!("simulation stopped after {} ticks", self.ticks());
        result
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            log::error!("{err}");
        }
    }
}

//! Fixed-rate game loops
//!
//! A [`LogicLoop`] calls a logic function once per tick at a fixed tick
//! rate. A [`RenderLoop`] interleaves a render function at its own frame
//! rate. Both can be stopped from any thread through a [`LoopHandle`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Stops a running loop; cheap to clone and send to other threads
#[derive(Clone, Debug)]
pub struct LoopHandle {
    running: Arc<AtomicBool>,
}

impl LoopHandle {
    /// Ask the loop to stop after the current tick
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

fn period(per_second: f64) -> Duration {
    if per_second > 0.0 && per_second.is_finite() {
        Duration::from_secs_f64(1.0 / per_second)
    } else {
        Duration::ZERO
    }
}

/// Calls a logic function at a fixed tick rate
#[derive(Clone, Debug)]
pub struct LogicLoop {
    tick_period: Duration,
    tick: u64,
    running: Arc<AtomicBool>,
}

impl LogicLoop {
    pub fn new(tick_per_second: f64) -> Self {
        Self {
            tick_period: period(tick_per_second),
            tick: 0,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Next tick to run
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            running: Arc::clone(&self.running),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Run `logic` once per tick
    ///
    /// Runs `ticks` ticks, or until stopped when `ticks` is `None`. With
    /// `max_speed` the ticks run back to back. The first error stops the
    /// loop and is returned.
    pub fn run<E, F>(&mut self, ticks: Option<u64>, max_speed: bool, mut logic: F) -> Result<(), E>
    where
        F: FnMut(u64) -> Result<(), E>,
    {
        let target = ticks.map(|t| self.tick + t);
        let mut reference = Instant::now();
        self.running.store(true, Ordering::SeqCst);
        log::info!("Logic loop started at tick {}", self.tick);

        let result = loop {
            if !self.is_running() || Some(self.tick) == target {
                break Ok(());
            }
            if max_speed || reference.elapsed() >= self.tick_period {
                if let Err(e) = logic(self.tick) {
                    log::error!("Logic loop failed at tick {}", self.tick);
                    break Err(e);
                }
                self.tick += 1;
                reference += self.tick_period;
            }
            if !max_speed {
                let next = reference + self.tick_period;
                if let Some(sleep) = next.checked_duration_since(Instant::now()) {
                    thread::sleep(sleep);
                }
            }
        };

        self.running.store(false, Ordering::SeqCst);
        log::info!("Logic loop stopped at tick {}", self.tick);
        result
    }
}

/// A logic loop that also renders frames at its own rate
#[derive(Clone, Debug)]
pub struct RenderLoop {
    logic: LogicLoop,
    frame_period: Duration,
    frame: u64,
}

impl RenderLoop {
    pub fn new(tick_per_second: f64, frame_per_second: f64) -> Self {
        Self {
            logic: LogicLoop::new(tick_per_second),
            frame_period: period(frame_per_second),
            frame: 0,
        }
    }

    pub fn tick(&self) -> u64 {
        self.logic.tick
    }

    /// Next frame to render
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn handle(&self) -> LoopHandle {
        self.logic.handle()
    }

    pub fn is_running(&self) -> bool {
        self.logic.is_running()
    }

    pub fn stop(&self) {
        self.logic.stop();
    }

    /// Run `logic` each tick and `render` each frame on `state`
    ///
    /// With `max_speed` ticks run back to back and frames are rendered
    /// whenever a frame period has elapsed between two ticks.
    pub fn run<T, E, L, R>(
        &mut self,
        state: &mut T,
        ticks: Option<u64>,
        max_speed: bool,
        mut logic: L,
        mut render: R,
    ) -> Result<(), E>
    where
        L: FnMut(&mut T, u64) -> Result<(), E>,
        R: FnMut(&mut T, u64) -> Result<(), E>,
    {
        let target = ticks.map(|t| self.logic.tick + t);
        let start = Instant::now();
        let mut reference_logic = start;
        let mut reference_render = start;
        self.logic.running.store(true, Ordering::SeqCst);
        log::info!("Render loop started at tick {}, frame {}", self.logic.tick, self.frame);

        let result = loop {
            if !self.logic.is_running() || Some(self.logic.tick) == target {
                break Ok(());
            }
            if max_speed || reference_logic.elapsed() >= self.logic.tick_period {
                if let Err(e) = logic(state, self.logic.tick) {
                    log::error!("Render loop failed at tick {}", self.logic.tick);
                    break Err(e);
                }
                self.logic.tick += 1;
                reference_logic += self.logic.tick_period;
            }
            if reference_render.elapsed() >= self.frame_period {
                if let Err(e) = render(state, self.frame) {
                    log::error!("Render loop failed at frame {}", self.frame);
                    break Err(e);
                }
                self.frame += 1;
                reference_render += self.frame_period;
            }
            if !max_speed {
                let next = (reference_logic + self.logic.tick_period).min(reference_render + self.frame_period);
                if let Some(sleep) = next.checked_duration_since(Instant::now()) {
                    thread::sleep(sleep);
                }
            }
        };

        self.logic.running.store(false, Ordering::SeqCst);
        log::info!("Render loop stopped at tick {}, frame {}", self.logic.tick, self.frame);
        result
    }
}

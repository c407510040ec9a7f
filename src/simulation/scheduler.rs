//! Tick scheduling for the engine
//!
//! A scheduler decides when [`Engine::step`] runs. Steps never overlap: the
//! scheduler holds the only `&mut Engine`. When a step overruns the cadence,
//! the missed ticks are dropped rather than replayed.

use std::thread;
use std::time::{Duration, Instant};

use super::engine::{Engine, StepOutcome};

pub trait Scheduler {
    /// Drive `engine` until the scheduler stops; returns the number of steps run
    fn run(&mut self, engine: &mut Engine) -> u64;
}

/// Runs a fixed number of steps back to back
#[derive(Debug, Clone, Copy)]
pub struct ManualScheduler {
    pub steps: u64,
}

impl ManualScheduler {
    pub fn new(steps: u64) -> Self {
        Self { steps }
    }
}

impl Scheduler for ManualScheduler {
    fn run(&mut self, engine: &mut Engine) -> u64 {
        for _ in 0..self.steps {
            engine.step();
        }
        self.steps
    }
}

/// Fixed-cadence trigger that fires at most once per poll
#[derive(Debug, Clone)]
pub struct TickGate {
    interval: Duration,
    next_due: Option<Instant>,
}

impl TickGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `Some(dropped)` if a tick is due at `now`, where `dropped` counts the
    /// cadence points that passed without a tick
    pub fn poll(&mut self, now: Instant) -> Option<u32> {
        let due = *self.next_due.get_or_insert(now);
        if now < due {
            return None;
        }
        let late = now - due;
        let dropped = (late.as_nanos() / self.interval.as_nanos()) as u32;
        self.next_due = Some(now + self.interval);
        Some(dropped)
    }

    /// Time left until the next tick is due
    pub fn wait_time(&self, now: Instant) -> Duration {
        self.next_due.map_or(Duration::ZERO, |due| due.saturating_duration_since(now))
    }
}

/// Steps the engine in real time on a fixed cadence
#[derive(Debug, Clone)]
pub struct RealTimeScheduler {
    gate: TickGate,
    max_ticks: u64,
}

impl RealTimeScheduler {
    pub fn new(interval: Duration, max_ticks: u64) -> Self {
        Self {
            gate: TickGate::new(interval),
            max_ticks,
        }
    }
}

impl Scheduler for RealTimeScheduler {
    fn run(&mut self, engine: &mut Engine) -> u64 {
        let mut steps = 0;
        let mut dropped_total = 0u64;
        let started = Instant::now();

        while steps < self.max_ticks {
            let now = Instant::now();
            match self.gate.poll(now) {
                Some(dropped) => {
                    if dropped > 0 {
                        log::debug!("dropped {dropped} overdue ticks");
                        dropped_total += u64::from(dropped);
                    }
                    if engine.step() == StepOutcome::Paused {
                        log::debug!("tick {steps} paused");
                    }
                    steps += 1;
                }
                None => thread::sleep(self.gate.wait_time(now)),
            }
        }

        log::info!(
            "ran {steps} ticks in {:.3} s ({dropped_total} dropped)",
            started.elapsed().as_secs_f64()
        );
        steps
    }
}

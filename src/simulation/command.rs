//! Intents submitted by the UI and input collaborators
//!
//! Nothing here touches simulation state. Intents are queued and the engine
//! drains them at the start of its next step.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Yaw/pitch deltas in radians
    Rotate { yaw: f64, pitch: f64 },
    /// Lateral move in camera axes, screen-down positive
    Pan { dx: f64, dy: f64 },
    /// Move along the view axis
    Dolly { dz: f64 },
    /// Toggle pursuit of a massive body by index
    Select(usize),
    /// Toggle pursuit of the body drawn nearest this screen point
    SelectAt { x: f64, y: f64 },
    Deselect,
    SetBodyCount(i64),
    SetParticleCount(i64),
    SetRunning(bool),
    ToggleRunning,
    CycleViewMode,
}

/// Stereo layout chosen by the UI; the engine only cycles it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Normal,
    Cross,
    Parallel,
}

impl ViewMode {
    pub fn next(self) -> Self {
        match self {
            ViewMode::Normal => ViewMode::Cross,
            ViewMode::Cross => ViewMode::Parallel,
            ViewMode::Parallel => ViewMode::Normal,
        }
    }
}

/// FIFO of pending intents
#[derive(Debug, Default)]
pub struct IntentQueue {
    pending: VecDeque<Intent>,
}

impl IntentQueue {
    pub fn push(&mut self, intent: Intent) {
        self.pending.push_back(intent);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending intent, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = Intent> + '_ {
        self.pending.drain(..)
    }
}

/// Count changes collected during a drain; last value of each kind wins
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StagedCounts {
    pub bh_count: Option<i64>,
    pub particle_count: Option<i64>,
}

//! Pure stopwatch logic with no platform dependencies.
//! Testable on host; the application drives it from its event loop.

/// Default tick quantum in milliseconds.
pub const TICK_QUANTUM_MS: u64 = 10;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerState {
    Idle,
    Running,
}

/// A recorded lap. Never mutated after creation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LapRecord {
    /// 1-based position in the lap list.
    pub index: usize,
    pub display_text: String,
}

/// Immutable copy of the observable stopwatch state.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Snapshot {
    pub elapsed_ms: u64,
    pub running: bool,
    pub laps: Vec<LapRecord>,
}

pub struct StopwatchCore {
    state: TimerState,
    elapsed_ms: u64,
    laps: Vec<LapRecord>,
}

impl StopwatchCore {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            elapsed_ms: 0,
            laps: Vec::new(),
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    /// Returns `true` if this call changed the state.
    pub fn start(&mut self) -> bool {
        if self.state == TimerState::Running {
            return false;
        }
        self.state = TimerState::Running;
        true
    }

    /// Returns `true` if this call changed the state.
    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.state = TimerState::Idle;
        true
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
        self.laps.clear();
        self.state = TimerState::Idle;
    }

    /// Records the current display time as a new lap, in either state.
    pub fn lap(&mut self) -> &LapRecord {
        let record = LapRecord {
            index: self.laps.len() + 1,
            display_text: format_elapsed(self.elapsed_ms),
        };
        self.laps.push(record);
        &self.laps[self.laps.len() - 1]
    }

    /// Advances elapsed time by one quantum. No-op while idle.
    pub fn tick(&mut self, quantum_ms: u64) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(quantum_ms);
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            elapsed_ms: self.elapsed_ms,
            running: self.is_running(),
            laps: self.laps.clone(),
        }
    }
}

impl Default for StopwatchCore {
    fn default() -> Self {
        Self::new()
    }
}

/// Format milliseconds as "MM:SS:mmm". Minutes grow past two digits, no hour rollover.
pub fn format_elapsed(ms: u64) -> String {
    let m = ms / 60_000;
    let s = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    format!("{:02}:{:02}:{:03}", m, s, millis)
}

/// Clock-face hand positions in degrees, clockwise from twelve o'clock.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct HandAngles {
    pub minute_deg: f32,
    pub second_deg: f32,
}

pub fn hand_angles(ms: u64) -> HandAngles {
    let seconds = (ms % 60_000) / 1000;
    let minutes = ms / 60_000;
    HandAngles {
        minute_deg: (minutes % 60) as f32 * 6.0,
        second_deg: (seconds % 60) as f32 * 6.0,
    }
}

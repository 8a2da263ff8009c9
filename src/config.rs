use std::time::Duration;

use log::LevelFilter;
use stopwatch_core::TICK_QUANTUM_MS;

use crate::ui::Theme;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub tick_quantum: Duration,
    pub initial_theme: Theme,
    pub event_queue_depth: usize,
    pub log_level: LevelFilter,
}

impl AppConfig {
    pub fn tick_quantum_ms(&self) -> u64 {
        self.tick_quantum.as_millis() as u64
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_quantum: Duration::from_millis(TICK_QUANTUM_MS),
            initial_theme: Theme::Light,
            event_queue_depth: 64,
            log_level: LevelFilter::Info,
        }
    }
}

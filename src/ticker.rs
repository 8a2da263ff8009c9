use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::sleep;

use crate::stopwatch::Event;

/// Periodic tick source for a running stopwatch.
///
/// Each activation spawns a fresh loop tagged with a generation number. The
/// loop sleeps one quantum, checks its activity flag and posts `Event::Tick`.
/// Deactivation clears the flag, so the loop exits at its next boundary, and
/// any tick it already posted is rejected by [`Ticker::accepts`].
pub struct Ticker {
    quantum: Duration,
    generation: u64,
    active: Option<watch::Sender<bool>>,
}

impl Ticker {
    pub fn new(quantum: Duration) -> Self {
        Self {
            quantum,
            generation: 0,
            active: None,
        }
    }

    pub fn activate(&mut self, events: &mpsc::Sender<Event>) {
        if self.active.is_some() {
            return;
        }
        self.generation += 1;
        let (flag_tx, flag_rx) = watch::channel(true);
        tokio::spawn(tick_loop(self.quantum, self.generation, flag_rx, events.clone()));
        self.active = Some(flag_tx);
        log::debug!("ticker {} started, quantum {:?}", self.generation, self.quantum);
    }

    pub fn deactivate(&mut self) {
        if let Some(flag) = self.active.take() {
            flag.send(false).ok();
            log::debug!("ticker {} stopping", self.generation);
        }
    }

    /// Whether a tick from loop `generation` may be applied.
    pub fn accepts(&self, generation: u64) -> bool {
        self.active.is_some() && generation == self.generation
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.deactivate();
    }
}

async fn tick_loop(
    quantum: Duration,
    generation: u64,
    active: watch::Receiver<bool>,
    events: mpsc::Sender<Event>,
) {
    loop {
        sleep(quantum).await;
        if !*active.borrow() {
            break;
        }
        if events.send(Event::Tick(generation)).await.is_err() {
            break;
        }
    }
    log::debug!("ticker {} exited", generation);
}

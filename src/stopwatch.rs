use stopwatch_core::{format_elapsed, Snapshot, StopwatchCore};
use tokio::sync::{mpsc, watch};

use crate::config::AppConfig;
use crate::ticker::Ticker;
use crate::ui::Theme;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Start,
    Pause,
    Reset,
    Lap,
    ToggleTheme,
    Quit,
}

#[derive(Debug)]
pub enum Event {
    Command(Command),
    /// One quantum elapsed in ticker loop `generation`.
    Tick(u64),
}

/// Owns the stopwatch for one interactive session and publishes a snapshot
/// after every change.
pub struct Session {
    core: StopwatchCore,
    ticker: Ticker,
    quantum_ms: u64,
    events: mpsc::Sender<Event>,
    snapshots: watch::Sender<Snapshot>,
    theme: watch::Sender<Theme>,
}

impl Session {
    pub fn new(config: &AppConfig, events: mpsc::Sender<Event>) -> Self {
        let core = StopwatchCore::new();
        let (snapshots, _) = watch::channel(core.snapshot());
        let (theme, _) = watch::channel(config.initial_theme);
        Self {
            core,
            ticker: Ticker::new(config.tick_quantum),
            quantum_ms: config.tick_quantum_ms(),
            events,
            snapshots,
            theme,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    pub fn subscribe_theme(&self) -> watch::Receiver<Theme> {
        self.theme.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.core.snapshot()
    }

    /// Applies one event. Returns `false` once the session should end.
    pub fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::Command(Command::Quit) => {
                self.ticker.deactivate();
                false
            }
            Event::Command(command) => {
                self.apply(command);
                true
            }
            Event::Tick(generation) => {
                if self.ticker.accepts(generation) && self.core.tick(self.quantum_ms) {
                    self.publish();
                }
                true
            }
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Start => {
                if self.core.start() {
                    log::debug!("start at {} ms", self.core.elapsed_ms());
                    self.ticker.activate(&self.events);
                    self.publish();
                }
            }
            Command::Pause => {
                if self.core.pause() {
                    self.ticker.deactivate();
                    log::debug!("pause at {} ms", self.core.elapsed_ms());
                    self.publish();
                }
            }
            Command::Reset => {
                self.ticker.deactivate();
                self.core.reset();
                log::debug!("reset");
                self.publish();
            }
            Command::Lap => {
                let lap = self.core.lap();
                log::debug!("lap {}: {}", lap.index, lap.display_text);
                self.publish();
            }
            Command::ToggleTheme => {
                self.theme.send_modify(|theme| *theme = theme.toggled());
            }
            Command::Quit => self.ticker.deactivate(),
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.core.snapshot());
    }

    pub async fn run(mut self, mut events: mpsc::Receiver<Event>) {
        log::info!("session started");
        while let Some(event) = events.recv().await {
            if !self.handle(event) {
                break;
            }
        }
        self.ticker.deactivate();
        let last = self.snapshot();
        log::info!("session ended at {}, {} laps", format_elapsed(last.elapsed_ms), last.laps.len());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;

    fn new_session() -> (Session, mpsc::Receiver<Event>) {
        let config = AppConfig::default();
        let (tx, rx) = mpsc::channel(config.event_queue_depth);
        (Session::new(&config, tx), rx)
    }

    fn drain(session: &mut Session, rx: &mut mpsc::Receiver<Event>) {
        while let Ok(event) = rx.try_recv() {
            session.handle(event);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_tick_pause_lap_reset() {
        let (mut session, mut rx) = new_session();

        session.apply(Command::Start);
        sleep(Duration::from_millis(35)).await;
        drain(&mut session, &mut rx);
        assert_eq!(session.snapshot().elapsed_ms, 30);
        assert!(session.snapshot().running);

        session.apply(Command::Pause);
        sleep(Duration::from_millis(50)).await;
        drain(&mut session, &mut rx);
        assert_eq!(session.snapshot().elapsed_ms, 30);

        session.apply(Command::Lap);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.laps.len(), 1);
        assert_eq!(snapshot.laps[0].index, 1);
        assert_eq!(snapshot.laps[0].display_text, format_elapsed(30));

        session.apply(Command::Reset);
        assert_eq!(session.snapshot(), Snapshot::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_while_running_stops_ticking() {
        let (mut session, mut rx) = new_session();
        session.apply(Command::Start);
        sleep(Duration::from_millis(25)).await;
        drain(&mut session, &mut rx);
        session.apply(Command::Reset);

        sleep(Duration::from_millis(100)).await;
        drain(&mut session, &mut rx);
        assert_eq!(session.snapshot(), Snapshot::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_tick_is_discarded() {
        let (mut session, mut rx) = new_session();
        session.apply(Command::Start);
        sleep(Duration::from_millis(15)).await;
        // One tick from the first loop is queued but not yet applied.
        session.apply(Command::Pause);
        session.apply(Command::Start);
        drain(&mut session, &mut rx);
        assert_eq!(session.snapshot().elapsed_ms, 0);

        sleep(Duration::from_millis(25)).await;
        drain(&mut session, &mut rx);
        assert_eq!(session.snapshot().elapsed_ms, 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_counts_once() {
        let (mut session, mut rx) = new_session();
        session.apply(Command::Start);
        session.apply(Command::Start);
        sleep(Duration::from_millis(45)).await;
        drain(&mut session, &mut rx);
        assert_eq!(session.snapshot().elapsed_ms, 40);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let (mut session, _rx) = new_session();
        let mut snapshots = session.subscribe();
        let mut theme = session.subscribe_theme();
        assert!(!snapshots.has_changed().unwrap());

        session.apply(Command::Lap);
        assert!(snapshots.has_changed().unwrap());
        assert_eq!(snapshots.borrow_and_update().laps.len(), 1);

        session.apply(Command::Pause);
        assert!(!snapshots.has_changed().unwrap());

        session.apply(Command::ToggleTheme);
        assert!(theme.has_changed().unwrap());
        assert_eq!(*theme.borrow_and_update(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_quit_ends_session() {
        let (mut session, _rx) = new_session();
        session.apply(Command::Start);
        assert!(!session.handle(Event::Command(Command::Quit)));
        assert!(session.handle(Event::Command(Command::Lap)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_consumes_events_until_quit() {
        let config = AppConfig::default();
        let (tx, rx) = mpsc::channel(config.event_queue_depth);
        let session = Session::new(&config, tx.clone());
        let mut snapshots = session.subscribe();
        let handle = tokio::spawn(session.run(rx));

        tx.send(Event::Command(Command::Start)).await.unwrap();
        sleep(Duration::from_millis(55)).await;
        tx.send(Event::Command(Command::Pause)).await.unwrap();
        tx.send(Event::Command(Command::Lap)).await.unwrap();
        tx.send(Event::Command(Command::Quit)).await.unwrap();
        handle.await.unwrap();

        let last = snapshots.borrow_and_update().clone();
        assert_eq!(last.elapsed_ms, 50);
        assert!(!last.running);
        assert_eq!(last.laps[0].display_text, "00:00:050");
    }
}

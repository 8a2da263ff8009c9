use std::fmt::Write;

use stopwatch_core::{format_elapsed, hand_angles, Snapshot};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;

use crate::error::AppError;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const RESET_STYLE: &str = "\x1b[0m";

const DIAL_ROWS: usize = 7;
const DIAL_COLS: usize = 13;
// (row, col) of each hour mark, twelve o'clock first, clockwise.
const DIAL_MARKS: [(usize, usize); 12] = [
    (0, 6),
    (1, 9),
    (2, 11),
    (3, 12),
    (4, 11),
    (5, 9),
    (6, 6),
    (5, 3),
    (4, 1),
    (3, 0),
    (2, 1),
    (1, 3),
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label of the toggle button, naming the theme it switches to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Dark Theme",
            Theme::Dark => "Light Theme",
        }
    }

    fn ansi_style(self) -> &'static str {
        match self {
            Theme::Light => "\x1b[30;107m",
            Theme::Dark => "\x1b[97;40m",
        }
    }
}

/// Nearest of the twelve dial marks for an angle in degrees.
pub fn dial_position(deg: f32) -> usize {
    ((deg / 30.0).round() as usize) % 12
}

pub fn draw_clock_face(elapsed_ms: u64) -> Vec<String> {
    let angles = hand_angles(elapsed_ms);
    let minute = dial_position(angles.minute_deg);
    let second = dial_position(angles.second_deg);

    let mut grid = [[' '; DIAL_COLS]; DIAL_ROWS];
    for (i, &(row, col)) in DIAL_MARKS.iter().enumerate() {
        grid[row][col] = match (i == minute, i == second) {
            (true, true) => '*',
            (true, false) => 'M',
            (false, true) => 'S',
            (false, false) => 'o',
        };
    }
    grid[DIAL_ROWS / 2][DIAL_COLS / 2] = '+';

    grid.iter()
        .map(|row| row.iter().collect::<String>().trim_end().to_string())
        .collect()
}

pub fn draw_stopwatch(state: &Snapshot, theme: Theme) -> String {
    let mut out = String::new();

    // Header
    writeln!(out, "Stopwatch                [{}]", theme.toggle_label()).ok();
    writeln!(out).ok();

    for line in draw_clock_face(state.elapsed_ms) {
        writeln!(out, "    {}", line).ok();
    }
    writeln!(out).ok();

    // Time display
    writeln!(out, "    {}", format_elapsed(state.elapsed_ms)).ok();
    writeln!(out).ok();

    writeln!(out, "[Start] [Pause] [Reset]  [Lap]").ok();
    writeln!(out).ok();

    writeln!(out, "Lap Times").ok();
    for lap in &state.laps {
        writeln!(out, "Lap {}: {}", lap.index, lap.display_text).ok();
    }

    // Footer
    writeln!(out).ok();
    write!(out, "s=start  p=pause  r=reset  l=lap  t=theme  q=quit").ok();
    out
}

fn paint(frame: &str, theme: Theme) -> String {
    let mut out = String::with_capacity(frame.len() + 32);
    out.push_str(theme.ansi_style());
    out.push_str(CLEAR_SCREEN);
    for line in frame.lines() {
        out.push_str(line);
        out.push_str("\r\n");
    }
    out.push_str(RESET_STYLE);
    out
}

/// Redraws on every snapshot or theme change until the session drops its senders.
pub async fn run_renderer<W>(
    mut out: W,
    mut snapshots: watch::Receiver<Snapshot>,
    mut theme: watch::Receiver<Theme>,
) -> Result<(), AppError>
where
    W: AsyncWrite + Unpin,
{
    loop {
        let frame = {
            let theme = *theme.borrow_and_update();
            let state = snapshots.borrow_and_update();
            paint(&draw_stopwatch(&state, theme), theme)
        };
        out.write_all(frame.as_bytes()).await?;
        out.flush().await?;

        tokio::select! {
            changed = snapshots.changed() => if changed.is_err() { break },
            changed = theme.changed() => if changed.is_err() { break },
        }
    }
    Ok(())
}

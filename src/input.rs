use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::stopwatch::{Command, Event};

pub fn command_for_key(key: char) -> Option<Command> {
    match key {
        's' => Some(Command::Start),
        'p' => Some(Command::Pause),
        'r' => Some(Command::Reset),
        'l' => Some(Command::Lap),
        't' => Some(Command::ToggleTheme),
        'q' => Some(Command::Quit),
        _ => None,
    }
}

/// Forwards key commands line by line. Returns after `q` or at end of input.
pub async fn read_commands<R>(reader: R, events: mpsc::Sender<Event>) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        for key in line.chars() {
            let Some(command) = command_for_key(key) else {
                if !key.is_whitespace() {
                    log::debug!("ignoring key {:?}", key);
                }
                continue;
            };
            events
                .send(Event::Command(command))
                .await
                .map_err(|_| AppError::ChannelClosed)?;
            if command == Command::Quit {
                return Ok(());
            }
        }
    }
    log::info!("input closed");
    Ok(())
}

use std::io::{BufRead, BufReader, Read};

use crossbeam_channel::Sender;

use crate::control::domain::control_event::ControlEvent;
use crate::control::domain::control_input::ControlInput;
use crate::control::infrastructure::channel_control_input::ChannelControlInput;

/// Keyboard control from a line-buffered terminal.
///
/// A background thread reads lines and turns every bound character into an
/// event, so `q⏎` quits and `22+⏎` selects blur twice and raises intensity.
/// The thread exits at end of input or once the receiving side is dropped.
pub struct StdinControlInput {
    inner: ChannelControlInput,
}

impl StdinControlInput {
    pub fn spawn() -> Self {
        Self::spawn_with(std::io::stdin())
    }

    /// Same as [`StdinControlInput::spawn`] but reading from any byte stream.
    pub fn spawn_with<R: Read + Send + 'static>(reader: R) -> Self {
        let (tx, inner) = ChannelControlInput::channel();
        let spawned = std::thread::Builder::new()
            .name("control-input".into())
            .spawn(move || read_keys(BufReader::new(reader), tx));
        if let Err(e) = spawned {
            log::warn!("Keyboard control unavailable: {e}");
        }
        Self { inner }
    }
}

impl ControlInput for StdinControlInput {
    fn poll(&mut self) -> Option<ControlEvent> {
        self.inner.poll()
    }
}

fn read_keys<R: BufRead>(reader: R, tx: Sender<ControlEvent>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::warn!("Stopped reading keyboard input: {e}");
                return;
            }
        };
        // A bare Enter stands for the space bar.
        let keys: Vec<char> = if line.is_empty() {
            vec![' ']
        } else {
            line.chars().collect()
        };
        for key in keys {
            let Some(event) = ControlEvent::from_key(key) else {
                log::debug!("Unbound key {key:?}");
                continue;
            };
            if tx.send(event).is_err() {
                return;
            }
        }
    }
    log::debug!("Keyboard input closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_keys_maps_every_character() {
        let (tx, rx) = crossbeam_channel::unbounded();
        read_keys(Cursor::new("2+z\nq\n"), tx);
        let events: Vec<ControlEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                ControlEvent::SelectEffect(1),
                ControlEvent::IncreaseIntensity,
                ControlEvent::Quit
            ]
        );
    }

    #[test]
    fn test_empty_line_toggles_split_view() {
        let (tx, rx) = crossbeam_channel::unbounded();
        read_keys(Cursor::new("\n"), tx);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![ControlEvent::ToggleSplitView]);
    }

    #[test]
    fn test_spawned_reader_delivers_events() {
        let mut input = StdinControlInput::spawn_with(Cursor::new("h\n"));
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        let event = loop {
            if let Some(event) = input.poll() {
                break Some(event);
            }
            if std::time::Instant::now() > deadline {
                break None;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        };
        assert_eq!(event, Some(ControlEvent::ToggleHelp));
    }
}

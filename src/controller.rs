use std::time::Duration;
use tracing::trace;

use crate::domain::{Message, TVConfig, TVError};
use ratatui::crossterm::event::{self, Event, KeyCode};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &TVConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self) -> Result<Option<Message>, TVError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            match event::read()? {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    return Ok(self.handle_key(key));
                }
                Event::Resize(width, height) => {
                    return Ok(Some(Message::Resize(width as usize, height as usize)));
                }
                _ => {}
            }
        }
        Ok(None)
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Left | KeyCode::Char('h') => Some(Message::MoveLeft),
            KeyCode::Right | KeyCode::Char('l') => Some(Message::MoveRight),
            KeyCode::Up | KeyCode::Char('k') => Some(Message::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::MoveDown),
            KeyCode::Enter | KeyCode::Char('s') => Some(Message::SortCurrentColumn),
            KeyCode::Char(c @ '1'..='9') => c
                .to_digit(10)
                .map(|d| Message::SortColumn(d as usize - 1)),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyEvent, KeyModifiers};

    fn press(code: KeyCode) -> Option<Message> {
        Controller::new(&TVConfig::default()).handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn digits_sort_columns() {
        assert_eq!(press(KeyCode::Char('1')), Some(Message::SortColumn(0)));
        assert_eq!(press(KeyCode::Char('9')), Some(Message::SortColumn(8)));
        assert_eq!(press(KeyCode::Char('0')), None);
    }

    #[test]
    fn navigation_and_sort_keys() {
        assert_eq!(press(KeyCode::Char('s')), Some(Message::SortCurrentColumn));
        assert_eq!(press(KeyCode::Enter), Some(Message::SortCurrentColumn));
        assert_eq!(press(KeyCode::Left), Some(Message::MoveLeft));
        assert_eq!(press(KeyCode::Char('l')), Some(Message::MoveRight));
        assert_eq!(press(KeyCode::Char('q')), Some(Message::Quit));
    }
}

//! Keyboard shortcuts

use crate::domain::errors::DomainError;
use crate::transport::TransportController;

/// A key press as delivered by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
    Enter,
    Char(char),
}

/// Element holding keyboard focus when a key arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Body,
    /// Presenter, title or talk id text field
    TextField,
    /// The video element itself
    Video,
    /// The timecode entry field
    TimecodeEntry,
}

/// What a shortcut asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    StepBack,
    StepForward,
    PlayPause,
    MarkIn,
    MarkOut,
    FocusEntry,
    BlurEntry,
    CommitEntry,
}

/// Maps key presses to transport actions and owns the timecode entry text
#[derive(Debug, Clone, Default)]
pub struct KeyboardShortcuts {
    focus: Focus,
    entry: String,
}

impl KeyboardShortcuts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    /// Text typed into the timecode entry so far
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Shortcut bound to `key` under the current focus.
    ///
    /// Nothing fires while a free-text field or the video element has focus.
    pub fn action_for(&self, key: Key) -> Option<ShortcutAction> {
        match self.focus {
            Focus::TextField | Focus::Video => return None,
            Focus::TimecodeEntry if key == Key::Enter => {
                return Some(ShortcutAction::CommitEntry)
            }
            _ => {}
        }

        match key {
            Key::ArrowLeft => Some(ShortcutAction::StepBack),
            Key::ArrowRight => Some(ShortcutAction::StepForward),
            Key::Space => Some(ShortcutAction::PlayPause),
            Key::Char('i') => Some(ShortcutAction::MarkIn),
            Key::Char('o') => Some(ShortcutAction::MarkOut),
            Key::Char(c) if c.is_ascii_digit() || c == '+' || c == '-' => {
                Some(ShortcutAction::FocusEntry)
            }
            Key::Escape => Some(ShortcutAction::BlurEntry),
            _ => None,
        }
    }

    /// Handle one key press against the transport
    pub fn handle(
        &mut self,
        key: Key,
        transport: &TransportController,
    ) -> Result<Option<ShortcutAction>, DomainError> {
        let Some(action) = self.action_for(key) else {
            if self.focus == Focus::TimecodeEntry {
                if let Key::Char(c) = key {
                    self.entry.push(c);
                }
            }
            return Ok(None);
        };

        match action {
            ShortcutAction::StepBack => transport.step_back(),
            ShortcutAction::StepForward => transport.step_forward(),
            ShortcutAction::PlayPause => {
                self.blur_entry();
                transport.play_pause();
            }
            ShortcutAction::MarkIn => {
                transport.mark_in();
            }
            ShortcutAction::MarkOut => {
                transport.mark_out();
            }
            ShortcutAction::FocusEntry => {
                if self.focus != Focus::TimecodeEntry {
                    self.focus = Focus::TimecodeEntry;
                    self.entry.clear();
                }
                if let Key::Char(c) = key {
                    self.entry.push(c);
                }
            }
            ShortcutAction::BlurEntry => self.blur_entry(),
            ShortcutAction::CommitEntry => {
                // a rejected entry stays in the field with focus kept
                let directive = transport.parser().parse(&self.entry)?;
                self.entry.clear();
                self.focus = Focus::Body;
                transport.seek(directive);
            }
        }

        Ok(Some(action))
    }

    fn blur_entry(&mut self) {
        if self.focus == Focus::TimecodeEntry {
            self.focus = Focus::Body;
            self.entry.clear();
        }
    }
}

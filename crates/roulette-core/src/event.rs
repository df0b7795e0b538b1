#![forbid(unsafe_code)]

//! Canonical input events and key bindings.
//!
//! The terminal backend converts its native events into these types, so the
//! session never sees backend-specific structures and tests can build events
//! directly.
//!
//! # Design Notes
//!
//! - `KeyEventKind` defaults to `Press` when the terminal does not report it
//! - `Modifiers` use bitflags for easy combination
//! - A [`KeyBinding`] matches a set of keys and carries its help text

use std::sync::OnceLock;

use bitflags::bitflags;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// Terminal was resized.
    Resize {
        /// New terminal width in columns.
        width: u16,
        /// New terminal height in rows.
        height: u16,
    },
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// Backspace key.
    Backspace,
    /// Tab key.
    Tab,
    /// Any arrow, function or media key the app does not distinguish.
    Other,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A key (code + required modifiers) a binding responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    /// Key code.
    pub code: KeyCode,
    /// Modifiers that must be held. Shift is ignored when matching characters.
    pub modifiers: Modifiers,
}

impl Key {
    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// A Ctrl+`c` chord.
    #[must_use]
    pub const fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: Modifiers::CTRL,
        }
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        let held = event.modifiers.difference(Modifiers::SHIFT);
        self.code == event.code && held == self.modifiers.difference(Modifiers::SHIFT)
    }
}

/// A named action bound to one or more keys, with short help text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    keys: Vec<Key>,
    help_key: &'static str,
    help_desc: &'static str,
}

impl KeyBinding {
    /// Bind `keys`, labelled `help_key` / `help_desc` in the help line.
    #[must_use]
    pub fn new(keys: Vec<Key>, help_key: &'static str, help_desc: &'static str) -> Self {
        Self {
            keys,
            help_key,
            help_desc,
        }
    }

    /// Whether a pressed (or repeated) key triggers this binding.
    #[must_use]
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.kind != KeyEventKind::Release && self.keys.iter().any(|k| k.matches(event))
    }

    /// Key label shown in help.
    #[must_use]
    pub fn help_key(&self) -> &'static str {
        self.help_key
    }

    /// Action description shown in help.
    #[must_use]
    pub fn help_desc(&self) -> &'static str {
        self.help_desc
    }

    /// Keys that trigger this binding.
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }
}

/// The bindings the roulette session understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    /// Start the spin, or cut it short once running.
    pub roll: KeyBinding,
    /// Leave immediately.
    pub quit: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            roll: KeyBinding::new(
                vec![Key::plain(KeyCode::Enter)],
                "enter",
                "roll/speed up",
            ),
            quit: KeyBinding::new(
                vec![Key::plain(KeyCode::Char('q')), Key::ctrl('c')],
                "q/ctrl+c",
                "quit",
            ),
        }
    }
}

impl KeyMap {
    /// The shared default bindings. Input mapping and the help line both read these.
    #[must_use]
    pub fn standard() -> &'static Self {
        static STANDARD: OnceLock<KeyMap> = OnceLock::new();
        STANDARD.get_or_init(Self::default)
    }

    /// Bindings listed in the short help line, in display order.
    #[must_use]
    pub fn short_help(&self) -> [&KeyBinding; 2] {
        [&self.roll, &self.quit]
    }
}

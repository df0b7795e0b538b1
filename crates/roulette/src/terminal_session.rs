#![forbid(unsafe_code)]

//! RAII terminal session.
//!
//! [`TerminalSession::new`] enters raw mode and hides the cursor; dropping
//! it restores both, including during panic unwinding. A panic hook and a
//! SIGTERM/SIGINT handler run the same cleanup for exit paths that skip
//! `Drop`. Only one session may be active per process.
//!
//! The session stays inline: no alternate screen, so the final frame remains
//! in the scrollback.

use std::io::{self, Write};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event as cte;
use roulette_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
use tracing::{info, warn};

use crate::program::EventSource;

static TERMINAL_SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

#[derive(Debug)]
struct SessionLock;

impl SessionLock {
    fn acquire() -> io::Result<Self> {
        if TERMINAL_SESSION_ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(io::Error::other("TerminalSession already active"));
        }
        Ok(Self)
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        TERMINAL_SESSION_ACTIVE.store(false, Ordering::SeqCst);
    }
}

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Owns raw mode and cursor visibility for the lifetime of the wheel.
#[derive(Debug)]
pub struct TerminalSession {
    session_lock: Option<SessionLock>,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enter raw mode and hide the cursor.
    pub fn new() -> io::Result<Self> {
        install_panic_hook();
        let session_lock = SessionLock::acquire()?;

        // Before raw mode, so a failure here leaves the terminal untouched.
        #[cfg(unix)]
        let signal_guard = Some(SignalGuard::new()?);

        crossterm::terminal::enable_raw_mode()?;
        info!("terminal raw mode enabled");

        let session = Self {
            session_lock: Some(session_lock),
            #[cfg(unix)]
            signal_guard,
        };
        crossterm::execute!(io::stdout(), crossterm::cursor::Hide)?;
        Ok(session)
    }

    fn cleanup(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();

        let mut stdout = io::stdout();
        let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
        let _ = crossterm::terminal::disable_raw_mode();
        info!("terminal raw mode disabled");
        let _ = stdout.flush();

        let _ = self.session_lock.take();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

impl EventSource for TerminalSession {
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if !cte::poll(timeout)? {
            return Ok(None);
        }
        Ok(map_event(cte::read()?))
    }
}

/// Translate a crossterm event; events the wheel has no use for map to `None`.
#[must_use]
pub fn map_event(event: cte::Event) -> Option<Event> {
    match event {
        cte::Event::Key(key) => Some(Event::Key(map_key(key))),
        cte::Event::Resize(width, height) => Some(Event::Resize { width, height }),
        _ => None,
    }
}

fn map_key(key: cte::KeyEvent) -> KeyEvent {
    let code = match key.code {
        cte::KeyCode::Char(c) => KeyCode::Char(c),
        cte::KeyCode::Enter => KeyCode::Enter,
        cte::KeyCode::Esc => KeyCode::Escape,
        cte::KeyCode::Backspace => KeyCode::Backspace,
        cte::KeyCode::Tab => KeyCode::Tab,
        _ => KeyCode::Other,
    };
    let kind = match key.kind {
        cte::KeyEventKind::Press => KeyEventKind::Press,
        cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
        cte::KeyEventKind::Release => KeyEventKind::Release,
    };
    KeyEvent::new(code)
        .with_modifiers(map_modifiers(key.modifiers))
        .with_kind(kind)
}

fn map_modifiers(mods: cte::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if mods.contains(cte::KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if mods.contains(cte::KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if mods.contains(cte::KeyModifiers::CONTROL) {
        out |= Modifiers::CTRL;
    }
    if mods.contains(cte::KeyModifiers::SUPER) {
        out |= Modifiers::SUPER;
    }
    out
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            if let Some(signal) = signals.forever().next() {
                warn!(signal, "termination signal received, cleaning up");
                best_effort_cleanup();
                std::process::exit(128 + signal);
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

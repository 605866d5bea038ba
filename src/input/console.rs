use super::OperatorInput;
use crate::error::{Result, TrigcamError};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, Stdout, Write};
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Confirm,
    Stop,
    Interrupt,
    Ignore,
}

fn classify(stop_key: char, key: &KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Ignore;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            KeyAction::Interrupt
        }
        KeyCode::Enter => KeyAction::Confirm,
        KeyCode::Esc => KeyAction::Stop,
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&stop_key) => KeyAction::Stop,
        _ => KeyAction::Ignore,
    }
}

/// Keyboard input read from the controlling terminal in raw mode.
///
/// Prompts and notices are written to `out`. An Enter typed while only the
/// stop key was being polled is kept and answers the next prompt.
pub struct ConsoleInput<W: Write = Stdout> {
    out: W,
    stop_key: char,
    stop_requested: bool,
    pending_confirm: bool,
    raw_mode: bool,
}

impl ConsoleInput<Stdout> {
    /// Put the terminal in raw mode so single key presses are delivered
    pub fn new(stop_key: char) -> Result<Self> {
        enable_raw_mode()
            .map_err(|e| TrigcamError::input(format!("Failed to enable raw mode: {}", e)))?;
        debug!("Raw mode enabled - stop key is '{}'", stop_key);

        let mut input = Self::with_writer(io::stdout(), stop_key);
        input.raw_mode = true;
        Ok(input)
    }
}

impl<W: Write> ConsoleInput<W> {
    /// Write operator text to `out` and leave the terminal mode untouched
    pub fn with_writer(out: W, stop_key: char) -> Self {
        Self {
            out,
            stop_key,
            stop_requested: false,
            pending_confirm: false,
            raw_mode: false,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    fn show(&mut self, message: &str) -> Result<()> {
        info!("{}", message);
        // Raw mode needs an explicit carriage return
        let written = queue!(self.out, Print(message), Print("\r\n"));
        written
            .and_then(|()| self.out.flush())
            .map_err(|e| TrigcamError::input(format!("Failed to write to terminal: {}", e)))
    }

    fn request_stop(&mut self) {
        if !self.stop_requested {
            info!("Stop key pressed - finishing the current cycle");
        }
        self.stop_requested = true;
    }

    /// Show `prompt`, then consume keys from `next_key` until Enter
    fn confirm_with<F>(&mut self, prompt: &str, mut next_key: F) -> Result<()>
    where
        F: FnMut() -> Result<KeyEvent>,
    {
        self.show(prompt)?;

        if self.pending_confirm {
            self.pending_confirm = false;
            debug!("Using Enter typed ahead");
            return Ok(());
        }

        loop {
            let key = next_key()?;
            match classify(self.stop_key, &key) {
                KeyAction::Confirm => return Ok(()),
                KeyAction::Stop => self.request_stop(),
                KeyAction::Interrupt => {
                    return Err(TrigcamError::input("Interrupted while waiting for trigger"))
                }
                KeyAction::Ignore => debug!("Key pressed: {:?}", key.code),
            }
        }
    }

    /// Consume every key `next_key` yields and report whether a stop was seen
    fn drain_with<F>(&mut self, mut next_key: F) -> Result<bool>
    where
        F: FnMut() -> Result<Option<KeyEvent>>,
    {
        while let Some(key) = next_key()? {
            match classify(self.stop_key, &key) {
                KeyAction::Stop | KeyAction::Interrupt => self.request_stop(),
                KeyAction::Confirm => self.pending_confirm = true,
                KeyAction::Ignore => {}
            }
        }

        Ok(self.stop_requested)
    }
}

fn read_key() -> Result<Option<KeyEvent>> {
    match event::read() {
        Ok(Event::Key(key)) => Ok(Some(key)),
        Ok(_) => Ok(None),
        Err(e) => Err(TrigcamError::input(format!("Failed to read keyboard event: {}", e))),
    }
}

fn next_key_blocking() -> Result<KeyEvent> {
    loop {
        if let Some(key) = read_key()? {
            return Ok(key);
        }
    }
}

fn key_available(wait: Duration) -> Result<bool> {
    event::poll(wait)
        .map_err(|e| TrigcamError::input(format!("Error polling for keyboard events: {}", e)))
}

impl<W: Write> OperatorInput for ConsoleInput<W> {
    fn wait_for_confirmation(&mut self, prompt: &str) -> Result<()> {
        self.confirm_with(prompt, next_key_blocking)
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        self.show(message)
    }

    fn poll_stop(&mut self, wait: Duration) -> Result<bool> {
        let mut timeout = wait;

        self.drain_with(|| {
            if !key_available(timeout)? {
                return Ok(None);
            }
            // Only the first poll waits; the rest drain what is queued
            timeout = Duration::ZERO;
            read_key()
        })
    }
}

impl<W: Write> Drop for ConsoleInput<W> {
    fn drop(&mut self) {
        if !self.raw_mode {
            return;
        }
        if let Err(e) = disable_raw_mode() {
            error!("Failed to disable raw mode: {}", e);
        } else {
            debug!("Raw mode disabled");
        }
    }
}

//! Pause and cancellation control for long-running tool invocations.
//!
//! A [`ControlToken`] is created by whoever owns the user interaction and is
//! handed to the process monitoring loop, which polls it between output
//! lines. Clones share state.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

const RUNNING: u8 = 0;
const PAUSED: u8 = 1;
const CANCELLED: u8 = 2;

/// Observable state of a [`ControlToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Running,
    Paused,
    Cancelled,
}

/// Shared pause/resume/cancel flag.
#[derive(Debug, Clone, Default)]
pub struct ControlToken {
    state: Arc<AtomicU8>,
}

impl ControlToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ControlState {
        match self.state.load(Ordering::Acquire) {
            RUNNING => ControlState::Running,
            PAUSED => ControlState::Paused,
            _ => ControlState::Cancelled,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state() == ControlState::Paused
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == ControlState::Cancelled
    }

    /// Request a pause. Has no effect once cancelled.
    pub fn pause(&self) {
        let _ = self
            .state
            .compare_exchange(RUNNING, PAUSED, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Resume after a pause. Has no effect once cancelled.
    pub fn resume(&self) {
        let _ = self
            .state
            .compare_exchange(PAUSED, RUNNING, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Flip between running and paused, returning the new state.
    pub fn toggle_pause(&self) -> ControlState {
        let result = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |s| match s {
                RUNNING => Some(PAUSED),
                PAUSED => Some(RUNNING),
                _ => None,
            });

        match result {
            Ok(RUNNING) => ControlState::Paused,
            Ok(_) => ControlState::Running,
            Err(_) => ControlState::Cancelled,
        }
    }

    /// Cancel permanently. Cancellation cannot be undone.
    pub fn cancel(&self) {
        self.state.store(CANCELLED, Ordering::Release);
    }

    /// Block while paused, polling every `interval`.
    ///
    /// Returns [`ControlState::Running`] or [`ControlState::Cancelled`].
    pub fn wait_while_paused(&self, interval: Duration) -> ControlState {
        loop {
            match self.state() {
                ControlState::Paused => std::thread::sleep(interval),
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let token = ControlToken::new();
        assert_eq!(token.state(), ControlState::Running);
        assert!(!token.is_paused());
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_pause_resume_shared_across_clones() {
        let token = ControlToken::new();
        let remote = token.clone();

        remote.pause();
        assert!(token.is_paused());

        remote.resume();
        assert_eq!(token.state(), ControlState::Running);
    }

    #[test]
    fn test_toggle() {
        let token = ControlToken::new();
        assert_eq!(token.toggle_pause(), ControlState::Paused);
        assert_eq!(token.toggle_pause(), ControlState::Running);
    }

    #[test]
    fn test_cancel_is_terminal() {
        let token = ControlToken::new();
        token.pause();
        token.cancel();

        token.resume();
        token.pause();
        assert_eq!(token.toggle_pause(), ControlState::Cancelled);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_wait_while_paused_returns_on_resume() {
        let token = ControlToken::new();
        token.pause();

        let remote = token.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            remote.resume();
        });

        let state = token.wait_while_paused(Duration::from_millis(5));
        handle.join().unwrap();
        assert_eq!(state, ControlState::Running);
    }

    #[test]
    fn test_wait_while_paused_returns_on_cancel() {
        let token = ControlToken::new();
        token.pause();

        let remote = token.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });

        let state = token.wait_while_paused(Duration::from_millis(5));
        handle.join().unwrap();
        assert_eq!(state, ControlState::Cancelled);
    }
}

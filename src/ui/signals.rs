use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::TerminalReason;
use crate::session::SessionObserver;

/// Values the front-end has learned from session signals.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct SessionSignals {
    pub score: u32,
    pub high_score: u32,
    /// Set once the current session beats the high score it started with.
    pub new_high_score: bool,
    pub game_over: Option<(u32, TerminalReason)>,
}

/// Observer that keeps the latest [`SessionSignals`]; clones share one record.
#[derive(Debug, Clone)]
pub struct SignalRecorder {
    signals: Rc<RefCell<SessionSignals>>,
}

impl SignalRecorder {
    #[must_use]
    pub fn new(high_score: u32) -> Self {
        Self {
            signals: Rc::new(RefCell::new(SessionSignals {
                high_score,
                ..SessionSignals::default()
            })),
        }
    }

    #[must_use]
    pub fn latest(&self) -> SessionSignals {
        *self.signals.borrow()
    }
}

impl SessionObserver for SignalRecorder {
    /// A score of 0 only arrives on reset, so it also clears the per-session marks.
    fn on_score_change(&mut self, score: u32) {
        let mut signals = self.signals.borrow_mut();
        if score == 0 {
            *signals = SessionSignals {
                high_score: signals.high_score,
                ..SessionSignals::default()
            };
        } else {
            signals.score = score;
        }
    }

    fn on_high_score_change(&mut self, high_score: u32) {
        let mut signals = self.signals.borrow_mut();
        signals.high_score = high_score;
        signals.new_high_score = true;
    }

    fn on_game_over(&mut self, final_score: u32, reason: TerminalReason) {
        self.signals.borrow_mut().game_over = Some((final_score, reason));
    }
}

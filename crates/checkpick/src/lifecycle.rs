#![forbid(unsafe_code)]

//! Open/close state machine.
//!
//! ```text
//! Closed --open--> Opening --finish--> Open
//!    ^                |                  |
//!    |              close              close
//!    |                v                  v
//!    +---finish--- Closing <-------------+
//!                     |
//!                     +--open--> Opening
//! ```
//!
//! Every transition bumps a generation counter and hands out a
//! [`TransitionToken`]. Only the token of the latest transition completes it;
//! older tokens are ignored, so a late "exited" signal from an interrupted
//! close cannot tear down a menu that has since re-opened.

use checkpick_core::debug;

/// Menu lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Not mounted.
    #[default]
    Closed,
    /// Mounted, enter transition running.
    Opening,
    /// Mounted and interactive.
    Open,
    /// Mounted, exit transition running.
    Closing,
}

/// Completion handle for one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionToken {
    generation: u64,
    target: Phase,
}

impl TransitionToken {
    /// Phase reached when this token completes.
    #[must_use]
    pub fn target(&self) -> Phase {
        self.target
    }
}

/// The lifecycle state machine.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    phase: Phase,
    generation: u64,
}

impl Lifecycle {
    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the menu has finished opening.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Open
    }

    /// Whether the menu is mounted (any phase but `Closed`).
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.phase != Phase::Closed
    }

    /// Whether the menu is open or on its way there.
    #[must_use]
    pub fn is_opening_or_open(&self) -> bool {
        matches!(self.phase, Phase::Opening | Phase::Open)
    }

    /// The token that would complete the running transition, if any.
    #[must_use]
    pub fn pending(&self) -> Option<TransitionToken> {
        match self.phase {
            Phase::Opening => Some(self.token(Phase::Open)),
            Phase::Closing => Some(self.token(Phase::Closed)),
            Phase::Closed | Phase::Open => None,
        }
    }

    /// Begin opening. No-op (returns `None`) when already opening or open.
    pub fn open(&mut self) -> Option<TransitionToken> {
        if self.is_opening_or_open() {
            return None;
        }
        self.begin(Phase::Opening, Phase::Open)
    }

    /// Begin closing. No-op (returns `None`) when already closing or closed.
    pub fn close(&mut self) -> Option<TransitionToken> {
        if !self.is_opening_or_open() {
            return None;
        }
        self.begin(Phase::Closing, Phase::Closed)
    }

    /// Complete the transition `token` belongs to.
    ///
    /// Returns the phase reached, or `None` for a stale token.
    pub fn finish(&mut self, token: TransitionToken) -> Option<Phase> {
        let current = self.pending();
        if current != Some(token) {
            debug!(
                generation = token.generation,
                latest = self.generation,
                "ignoring stale transition token"
            );
            return None;
        }
        debug!(from = ?self.phase, to = ?token.target, "transition finished");
        self.phase = token.target;
        Some(token.target)
    }

    fn begin(&mut self, phase: Phase, target: Phase) -> Option<TransitionToken> {
        self.generation = self.generation.wrapping_add(1);
        debug!(from = ?self.phase, to = ?phase, generation = self.generation, "transition started");
        self.phase = phase;
        Some(self.token(target))
    }

    fn token(&self, target: Phase) -> TransitionToken {
        TransitionToken {
            generation: self.generation,
            target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle() {
        let mut lc = Lifecycle::default();
        assert!(!lc.is_mounted());

        let opening = lc.open().expect("opens from closed");
        assert_eq!(lc.phase(), Phase::Opening);
        assert!(lc.is_mounted());
        assert!(!lc.is_active());

        assert_eq!(lc.finish(opening), Some(Phase::Open));
        assert!(lc.is_active());

        let closing = lc.close().expect("closes from open");
        assert_eq!(lc.finish(closing), Some(Phase::Closed));
        assert!(!lc.is_mounted());
    }

    #[test]
    fn repeated_open_is_noop() {
        let mut lc = Lifecycle::default();
        let token = lc.open();
        assert!(lc.open().is_none());
        assert_eq!(lc.pending(), token);
    }

    #[test]
    fn close_while_opening_goes_to_closing() {
        let mut lc = Lifecycle::default();
        let opening = lc.open().expect("opens");
        let closing = lc.close().expect("closes while opening");
        assert_eq!(lc.phase(), Phase::Closing);
        assert_eq!(lc.finish(opening), None, "enter completion is stale");
        assert_eq!(lc.finish(closing), Some(Phase::Closed));
    }

    #[test]
    fn stale_close_after_reopen_is_ignored() {
        let mut lc = Lifecycle::default();
        let t = lc.open().expect("opens");
        lc.finish(t);
        let closing = lc.close().expect("closes");
        let reopening = lc.open().expect("reopens while closing");

        assert_eq!(lc.finish(closing), None);
        assert_eq!(lc.phase(), Phase::Opening);
        assert_eq!(lc.finish(reopening), Some(Phase::Open));
    }

    #[test]
    fn close_when_closed_is_noop() {
        let mut lc = Lifecycle::default();
        assert!(lc.close().is_none());
        assert!(lc.pending().is_none());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn only_pending_token_completes(ops in proptest::collection::vec(0u8..3, 0..40)) {
                let mut lc = Lifecycle::default();
                let mut issued = Vec::new();
                for op in ops {
                    match op {
                        0 => issued.extend(lc.open()),
                        1 => issued.extend(lc.close()),
                        _ => {
                            let pending = lc.pending();
                            for token in issued.drain(..) {
                                let done = lc.finish(token);
                                if Some(token) == pending {
                                    prop_assert_eq!(done, Some(token.target()));
                                } else {
                                    prop_assert_eq!(done, None);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

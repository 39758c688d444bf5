//! Menu navigation state.
//!
//! The menu is either closed, or open over the candidate list of the last
//! applied lookup with at most one active row. Keyboard and pointer share the
//! single active row; whichever touched it last wins.

use horizon_autocomplete_core::logging::targets;

use crate::candidate::{Candidate, CandidateList};

/// Direction of a keyboard navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the end of the list (arrow down).
    Next,
    /// Towards the start of the list (arrow up).
    Previous,
}

/// Whether the menu is showing, and over which candidates.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum NavigationState {
    /// No menu.
    #[default]
    Closed,
    /// Menu showing `candidates`, with `active` highlighted.
    Open {
        /// The list being shown. Never empty.
        candidates: CandidateList,
        /// Index of the highlighted row.
        active: Option<usize>,
    },
}

impl NavigationState {
    /// Create a closed state.
    pub fn new() -> Self {
        Self::Closed
    }

    /// Open the menu over `candidates`, replacing any previous list.
    ///
    /// With `auto_focus`, the first row becomes active. An empty list closes
    /// the menu instead.
    pub fn open(&mut self, candidates: CandidateList, auto_focus: bool) {
        if candidates.is_empty() {
            self.close();
            return;
        }
        *self = Self::Open {
            candidates,
            active: None,
        };
        if auto_focus {
            self.advance(Direction::Next);
        }
    }

    /// Close the menu. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        *self = Self::Closed;
        was_open
    }

    /// Whether the menu is open.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// The candidates being shown; empty while closed.
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            Self::Open { candidates, .. } => candidates,
            Self::Closed => &[],
        }
    }

    /// The active row index.
    pub fn active_index(&self) -> Option<usize> {
        match self {
            Self::Open { active, .. } => *active,
            Self::Closed => None,
        }
    }

    /// The active candidate.
    pub fn active_candidate(&self) -> Option<&Candidate> {
        match self {
            Self::Open {
                candidates,
                active: Some(index),
            } => candidates.get(*index),
            _ => None,
        }
    }

    /// Move the active row one step, wrapping around both ends.
    ///
    /// From no active row, `Next` lands on the first row and `Previous` on
    /// the last. Does nothing while closed.
    pub fn advance(&mut self, direction: Direction) {
        let Self::Open { candidates, active } = self else {
            return;
        };
        let len = candidates.len();
        if len == 0 {
            return;
        }

        let next = match (direction, *active) {
            (Direction::Next, Some(index)) if index + 1 < len => index + 1,
            (Direction::Next, _) => 0,
            (Direction::Previous, Some(index)) if index > 0 => index - 1,
            (Direction::Previous, _) => len - 1,
        };
        *active = Some(next);
        tracing::trace!(target: targets::NAVIGATION, ?direction, active = next, "navigated");
    }

    /// Make `index` the active row, or clear it with `None`.
    ///
    /// Out-of-range indices are ignored.
    pub fn set_active(&mut self, index: Option<usize>) {
        if let Self::Open { candidates, active } = self {
            match index {
                Some(index) if index >= candidates.len() => {}
                other => *active = other,
            }
        }
    }
}

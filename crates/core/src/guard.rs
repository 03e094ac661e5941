// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Interception of route changes while draft selections are unsaved.

use serde::Serialize;
use tracing::debug;

/// Where the guard is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GuardState {
    /// No unsaved edits.
    Clean,
    /// Drafts were edited since the last commit.
    Dirty,
    /// A route change is waiting for confirmation.
    Blocked {
        /// The captured destination.
        next_path: String,
    },
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationDecision {
    /// The route change may happen now.
    Allow,
    /// The route change is held until confirmed or cancelled.
    Block,
}

/// Which confirmation dialog a blocked navigation shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogKind {
    /// Leaving for the cart.
    ConfirmSelection,
    /// Leaving for anywhere else.
    UnsavedChanges,
}

impl DialogKind {
    /// Dialog title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ConfirmSelection => "Confirm Selection",
            Self::UnsavedChanges => "Unsaved Changes",
        }
    }

    /// Dialog body.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfirmSelection => {
                "Do you want to proceed to the cart with your current selection?"
            }
            Self::UnsavedChanges => {
                "You have unsaved changes. Are you sure you want to leave this page?"
            }
        }
    }
}

/// Navigation guard for a selection screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationGuard {
    current_path: String,
    state: GuardState,
}

impl NavigationGuard {
    /// Creates a clean guard for the screen at `current_path`.
    #[must_use]
    pub fn new(current_path: impl Into<String>) -> Self {
        Self {
            current_path: current_path.into(),
            state: GuardState::Clean,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GuardState {
        &self.state
    }

    #[must_use]
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Moves to another screen and clears any pending state.
    pub fn enter(&mut self, path: impl Into<String>) {
        self.current_path = path.into();
        self.state = GuardState::Clean;
    }

    /// Records a draft edit. A pending confirmation is left untouched.
    pub fn mark_dirty(&mut self) {
        if self.state == GuardState::Clean {
            self.state = GuardState::Dirty;
        }
    }

    /// Clears the dirty flag, e.g. after a successful proceed.
    pub fn mark_clean(&mut self) {
        self.state = GuardState::Clean;
    }

    /// Decides whether a route change to `path` may happen.
    ///
    /// While blocked the first captured destination is kept and every
    /// further attempt is held.
    pub fn on_attempt_navigate(&mut self, path: &str) -> NavigationDecision {
        match &self.state {
            GuardState::Clean => NavigationDecision::Allow,
            GuardState::Dirty if path == self.current_path => NavigationDecision::Allow,
            GuardState::Dirty => {
                debug!(from = %self.current_path, to = %path, "Blocking navigation with unsaved drafts");
                self.state = GuardState::Blocked {
                    next_path: path.to_string(),
                };
                NavigationDecision::Block
            }
            GuardState::Blocked { .. } => NavigationDecision::Block,
        }
    }

    /// Confirms a blocked navigation.
    ///
    /// Returns the destination to complete, or `None` when nothing was blocked.
    pub fn confirm(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.state, GuardState::Clean) {
            GuardState::Blocked { next_path } => {
                self.current_path.clone_from(&next_path);
                Some(next_path)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Cancels a blocked navigation and drops the captured destination.
    pub fn cancel(&mut self) {
        if matches!(self.state, GuardState::Blocked { .. }) {
            self.state = GuardState::Dirty;
        }
    }

    /// The dialog for the pending navigation, if any.
    #[must_use]
    pub fn dialog_kind(&self) -> Option<DialogKind> {
        match &self.state {
            GuardState::Blocked { next_path } if next_path.contains("/cart") => {
                Some(DialogKind::ConfirmSelection)
            }
            GuardState::Blocked { .. } => Some(DialogKind::UnsavedChanges),
            _ => None,
        }
    }
}

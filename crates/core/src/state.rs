// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use seat_adopt_domain::{CartLine, Catalog, CourseId, Selection};
use serde::Serialize;
use std::collections::BTreeMap;

/// Draft selections keyed by course id.
pub type Drafts = BTreeMap<CourseId, Selection>;

/// Committed cart lines keyed by course id.
pub type CommittedSet = BTreeMap<CourseId, CartLine>;

/// The part of the selection state that survives reloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    /// Draft selections of the active screen.
    pub selections: Drafts,
    /// Committed cart lines.
    pub selected_courses: CommittedSet,
    /// Active selection step, 0 when no course type is chosen.
    pub current_step: u8,
}

impl SessionState {
    /// Creates an empty session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selections: BTreeMap::new(),
            selected_courses: BTreeMap::new(),
            current_step: 0,
        }
    }
}

/// Everything the selection store holds.
///
/// Only `session` is persisted; the catalog is refetched on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreState {
    /// Persisted selection state.
    pub session: SessionState,
    /// The most recently fetched catalog.
    pub catalog: Option<Catalog>,
    /// Whether a catalog fetch is in flight.
    pub is_loading: bool,
    /// The last fetch error, shown with a retry control.
    pub error: Option<String>,
}

/// The result of a successful draft transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The drafts after the transition.
    pub new_selections: Drafts,
    /// Whether the drafts differ from the input.
    pub changed: bool,
}

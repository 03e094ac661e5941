// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The selection store: an explicit state container with durable snapshots.
//!
//! Every persisted change is written through the [`SnapshotStore`] before the
//! in-memory state changes, and subscribers are notified only after both.

use crate::apply::apply_all;
use crate::cart::{CartSummary, summarize};
use crate::command::{Command, SelectionPatch};
use crate::error::CoreError;
use crate::finalize::proceed;
use crate::snapshot::{SNAPSHOT_KEY, SNAPSHOT_VERSION, decode_snapshot, encode_snapshot};
use crate::state::{CommittedSet, Drafts, SessionState, StoreState, TransitionResult};
use seat_adopt_domain::{CartLine, Catalog, CourseId, CourseType, Selection};
use std::collections::HashMap;
use std::convert::Infallible;
use tracing::{debug, error, info, warn};

/// Durable key-value storage for selection snapshots.
pub trait SnapshotStore {
    /// Adapter failure.
    type Error: std::error::Error;

    /// Reads the body stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn load(&mut self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Writes `body` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn save(&mut self, key: &str, body: &str, schema_version: u32) -> Result<(), Self::Error>;

    /// Deletes the value under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), Self::Error>;
}

/// A non-durable snapshot store, used when no database is configured.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    entries: HashMap<String, (String, u32)>,
    writes: usize,
}

impl MemorySnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saves performed so far.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }

    /// Schema version of the value under `key`.
    #[must_use]
    pub fn schema_version(&self, key: &str) -> Option<u32> {
        self.entries.get(key).map(|(_, version)| *version)
    }
}

impl SnapshotStore for MemorySnapshotStore {
    type Error = Infallible;

    fn load(&mut self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.get(key).map(|(body, _)| body.clone()))
    }

    fn save(&mut self, key: &str, body: &str, schema_version: u32) -> Result<(), Self::Error> {
        self.writes += 1;
        self.entries
            .insert(key.to_string(), (body.to_string(), schema_version));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Handle returned by [`SelectionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&StoreState) + Send>;

/// Holds drafts, the committed cart, the active step and the catalog.
pub struct SelectionStore<P: SnapshotStore> {
    state: StoreState,
    persistence: P,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<P: SnapshotStore> SelectionStore<P> {
    /// Creates an empty store. Call [`Self::restore`] to load the last snapshot.
    #[must_use]
    pub fn new(persistence: P) -> Self {
        Self {
            state: StoreState::default(),
            persistence,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// The current state.
    #[must_use]
    pub const fn get(&self) -> &StoreState {
        &self.state
    }

    /// The snapshot adapter.
    #[must_use]
    pub const fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Consumes the store and returns the snapshot adapter.
    #[must_use]
    pub fn into_persistence(self) -> P {
        self.persistence
    }

    /// Registers a callback invoked after every state change.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&StoreState) + Send + 'static,
    {
        let id: SubscriptionId = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before: usize = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    fn emit(&self) {
        for (_, callback) in &self.subscribers {
            callback(&self.state);
        }
    }

    /// Persists `session` and installs it without notifying subscribers.
    fn persist_session(&mut self, session: SessionState) -> Result<(), CoreError> {
        let body: String = encode_snapshot(&session)?;
        self.persistence
            .save(SNAPSHOT_KEY, &body, SNAPSHOT_VERSION)
            .map_err(|err| {
                error!(error = %err, "Failed to persist selection snapshot");
                CoreError::Persistence(err.to_string())
            })?;
        self.state.session = session;
        Ok(())
    }

    fn write_session(&mut self, session: SessionState) -> Result<(), CoreError> {
        self.persist_session(session)?;
        self.emit();
        Ok(())
    }

    /// Loads the persisted snapshot.
    ///
    /// An unreadable snapshot is discarded and the store starts empty.
    ///
    /// # Returns
    ///
    /// `true` if a snapshot was restored.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Persistence` if the adapter cannot be read.
    pub fn restore(&mut self) -> Result<bool, CoreError> {
        let body: Option<String> = self
            .persistence
            .load(SNAPSHOT_KEY)
            .map_err(|err| CoreError::Persistence(err.to_string()))?;

        let Some(body) = body else {
            debug!("No selection snapshot to restore");
            return Ok(false);
        };

        match decode_snapshot(&body) {
            Ok(session) => {
                info!(
                    cart_lines = session.selected_courses.len(),
                    current_step = session.current_step,
                    "Restored selection snapshot"
                );
                self.state.session = session;
                self.emit();
                Ok(true)
            }
            Err(err) => {
                warn!(error = %err, "Discarding unreadable selection snapshot");
                self.persistence
                    .remove(SNAPSHOT_KEY)
                    .map_err(|err| CoreError::Persistence(err.to_string()))?;
                Ok(false)
            }
        }
    }

    /// Applies draft commands against the loaded catalog.
    ///
    /// # Returns
    ///
    /// Whether the drafts changed.
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog is loaded or an edit is rejected. A
    /// rejected edit leaves the state untouched.
    pub fn apply(&mut self, commands: Vec<Command>) -> Result<bool, CoreError> {
        let catalog: &Catalog = self.state.catalog.as_ref().ok_or(CoreError::CatalogNotLoaded)?;

        let result: TransitionResult =
            apply_all(catalog, &self.state.session.selections, commands)
                .inspect_err(|err| warn!(error = %err, "Rejected selection edit"))?;

        if !result.changed {
            return Ok(false);
        }

        let session: SessionState = SessionState {
            selections: result.new_selections,
            ..self.state.session.clone()
        };
        self.write_session(session)?;
        Ok(true)
    }

    /// Merges a partial update into the draft for `course_id`.
    ///
    /// # Errors
    ///
    /// See [`Self::apply`].
    pub fn set_selection(
        &mut self,
        course_id: &CourseId,
        patch: SelectionPatch,
    ) -> Result<bool, CoreError> {
        self.apply(patch.into_commands(course_id))
    }

    /// Drops every draft.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Persistence` if the snapshot cannot be written.
    pub fn reset_drafts(&mut self) -> Result<(), CoreError> {
        if self.state.session.selections.is_empty() {
            return Ok(());
        }
        let session: SessionState = SessionState {
            selections: Drafts::new(),
            ..self.state.session.clone()
        };
        self.write_session(session)
    }

    /// Re-seeds the drafts from the committed cart.
    ///
    /// With a catalog loaded, lines whose course is gone or has fewer seats
    /// left than the line holds are not re-seeded.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Persistence` if the snapshot cannot be written.
    pub fn load_drafts_from_committed(&mut self) -> Result<(), CoreError> {
        let catalog: Option<&Catalog> = self.state.catalog.as_ref();
        let selections: Drafts = self
            .state
            .session
            .selected_courses
            .iter()
            .filter(|(_, line)| still_available(catalog, line))
            .map(|(id, line)| {
                (
                    id.clone(),
                    Selection {
                        is_selected: true,
                        seats: Some(line.selected_seats),
                        total_price: line.total_price,
                    },
                )
            })
            .collect();

        if selections == self.state.session.selections {
            return Ok(());
        }
        let session: SessionState = SessionState {
            selections,
            ..self.state.session.clone()
        };
        self.write_session(session)
    }

    /// Replaces the committed cart.
    ///
    /// # Returns
    ///
    /// `false` if the cart already held exactly these lines; nothing is
    /// written or emitted in that case.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Persistence` if the snapshot cannot be written.
    pub fn commit(&mut self, selections: CommittedSet) -> Result<bool, CoreError> {
        if selections == self.state.session.selected_courses {
            debug!("Commit skipped, cart unchanged");
            return Ok(false);
        }

        info!(lines = selections.len(), "Committing cart");
        let session: SessionState = SessionState {
            selected_courses: selections,
            ..self.state.session.clone()
        };
        self.write_session(session)?;
        Ok(true)
    }

    /// Finalizes the drafts against the catalog and merges them into the cart.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NothingSelected` when no draft yields a cart line,
    /// `CoreError::CatalogNotLoaded` without a catalog, or a persistence error.
    pub fn proceed(&mut self) -> Result<CartSummary, CoreError> {
        let catalog: &Catalog = self.state.catalog.as_ref().ok_or(CoreError::CatalogNotLoaded)?;
        let merged: CommittedSet = proceed(
            &self.state.session.selected_courses,
            &self.state.session.selections,
            catalog,
        )?;
        self.commit(merged)?;
        self.cart_summary()
    }

    /// Clears the committed cart and the error state. The catalog is kept.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Persistence` if the snapshot cannot be written.
    /// The error state is left as it was in that case.
    pub fn reset(&mut self) -> Result<(), CoreError> {
        info!("Resetting cart");
        let session: SessionState = SessionState {
            selected_courses: CommittedSet::new(),
            ..self.state.session.clone()
        };
        self.persist_session(session)?;
        self.state.error = None;
        self.emit();
        Ok(())
    }

    /// Sets the active selection step.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStep` for steps above 5, or a persistence
    /// error.
    pub fn set_current_step(&mut self, step: u8) -> Result<(), CoreError> {
        CourseType::from_step(step)?;
        if step == self.state.session.current_step {
            return Ok(());
        }
        let session: SessionState = SessionState {
            current_step: step,
            ..self.state.session.clone()
        };
        self.write_session(session)
    }

    /// Installs a freshly fetched catalog and clears the fetch state.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        info!(courses = catalog.len(), "Catalog loaded");
        self.state.catalog = Some(catalog);
        self.state.is_loading = false;
        self.state.error = None;
        self.emit();
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.state.is_loading = is_loading;
        self.emit();
    }

    /// Records a fetch failure for display with a retry control.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state.error = Some(message.into());
        self.state.is_loading = false;
        self.emit();
    }

    pub fn clear_error(&mut self) {
        if self.state.error.take().is_some() {
            self.emit();
        }
    }

    /// Summary of the committed cart.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PriceOverflow` if the cart total does not fit.
    pub fn cart_summary(&self) -> Result<CartSummary, CoreError> {
        summarize(self.state.session.selected_courses.values())
    }
}

fn still_available(catalog: Option<&Catalog>, line: &CartLine) -> bool {
    let Some(catalog) = catalog else {
        return true;
    };
    match catalog.find(&line.id) {
        Some(course) if line.selected_seats <= course.left_seats() => true,
        _ => {
            warn!(
                course_id = %line.id,
                seats = line.selected_seats,
                "Not re-seeding a cart line the catalog no longer covers"
            );
            false
        }
    }
}

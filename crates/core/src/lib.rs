// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod cart;
mod command;
mod error;
mod finalize;
mod guard;
mod notice;
mod snapshot;
mod state;
mod store;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{apply, apply_all};
pub use cart::{CartGroups, CartSummary, group, summarize, total_amount};
pub use command::{Command, SelectionPatch};
pub use error::CoreError;
pub use finalize::{finalize, proceed};
pub use guard::{DialogKind, GuardState, NavigationDecision, NavigationGuard};
pub use notice::{Notice, NoticeLevel};
pub use snapshot::{SNAPSHOT_KEY, SNAPSHOT_VERSION, decode_snapshot, encode_snapshot};
pub use state::{CommittedSet, Drafts, SessionState, StoreState, TransitionResult};
pub use store::{MemorySnapshotStore, SelectionStore, SnapshotStore, SubscriptionId};

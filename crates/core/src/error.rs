// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::notice::Notice;
use seat_adopt_domain::DomainError;

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// An edit arrived before the catalog was loaded.
    CatalogNotLoaded,
    /// Proceeding produced no cart lines.
    NothingSelected,
    /// The persisted snapshot could not be encoded or decoded.
    Snapshot(String),
    /// The snapshot adapter failed.
    Persistence(String),
}

impl CoreError {
    /// The user-facing notice for this error.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::DomainViolation(_) | Self::NothingSelected | Self::CatalogNotLoaded => {
                Notice::warning(self.to_string())
            }
            Self::Snapshot(_) | Self::Persistence(_) => Notice::error(self.to_string()),
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "{err}"),
            Self::CatalogNotLoaded => write!(f, "Courses have not been loaded yet"),
            Self::NothingSelected => {
                write!(f, "Please select at least one course with seats")
            }
            Self::Snapshot(msg) => write!(f, "Saved selection could not be read: {msg}"),
            Self::Persistence(msg) => write!(f, "Saving selection failed: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Snapshot(err.to_string())
    }
}

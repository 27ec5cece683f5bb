//! Error types for `rolodex-core`.
//!
//! The whole taxonomy lives here so that every layer — store backends, the
//! HTTP surface — can match on the same variants. Backends fold their
//! transport failures into [`Error::Storage`] via [`Error::storage`].

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::{category::CategoryId, contact::ContactId};

/// A single field-level validation failure, surfaced to the caller so the
/// offending field can be corrected and resubmitted.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
  pub field:   &'static str,
  pub message: String,
}

/// The full set of violations found on a draft.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
  pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.push(Violation { field, message: message.into() });
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl fmt::Display for Violations {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for v in &self.0 {
      if !first {
        write!(f, "; ")?;
      }
      write!(f, "{}: {}", v.field, v.message)?;
      first = false;
    }
    Ok(())
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// The contact is absent, or owned by someone other than the caller.
  /// The two cases are indistinguishable on purpose.
  #[error("contact not found: {0}")]
  ContactNotFound(ContactId),

  /// The category is absent, or owned by someone other than the caller.
  #[error("category not found: {0}")]
  CategoryNotFound(CategoryId),

  #[error("validation failed: {0}")]
  Validation(Violations),

  /// The targeted row changed version between read and write.
  #[error("{entity} {id} was modified by another caller")]
  EditConflict { entity: &'static str, id: i64 },

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend transport/transaction failure.
  pub fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Category — a user-defined grouping of contacts.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Violations};

pub type CategoryId = i64;

/// A stored category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id:       CategoryId,
  pub owner_id: String,
  pub name:     String,
  /// Optimistic-concurrency counter; bumped on every update.
  pub version:  i64,
}

/// Caller-supplied category fields for create and edit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryDraft {
  pub name: String,
}

impl CategoryDraft {
  pub fn validate(&self) -> Result<(), Error> {
    let mut violations = Violations::default();
    if self.name.trim().is_empty() {
      violations.push("name", "name is required");
    }
    if violations.is_empty() {
      Ok(())
    } else {
      Err(Error::Validation(violations))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::CategoryDraft;

  #[test]
  fn blank_name_rejected() {
    let d = CategoryDraft { name: "  ".into() };
    assert!(d.validate().is_err());
  }

  #[test]
  fn named_draft_passes() {
    let d = CategoryDraft { name: "Friends".into() };
    assert!(d.validate().is_ok());
  }
}

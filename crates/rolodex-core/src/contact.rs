//! Contact — the central entity of an address book.
//!
//! A contact row is owned by exactly one user and carries an optimistic
//! version counter. The category set is not stored on the row; it is
//! hydrated from the association table on every read.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  category::Category,
  error::{Error, Violations},
  state::UsState,
};

pub type ContactId = i64;

/// Bounds applied to both name fields.
pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 50;

// ─── Image payload ───────────────────────────────────────────────────────────

/// An uploaded image: raw bytes plus the content type declared at upload.
///
/// The two always travel together — a contact either has a typed image or no
/// image at all. Bytes are base64 at the JSON boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactImage {
  pub content_type: String,
  #[serde(with = "b64")]
  pub data:         Vec<u8>,
}

mod b64 {
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD;
  use serde::{Deserialize as _, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&STANDARD.encode(bytes))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
    let s = String::deserialize(d)?;
    STANDARD.decode(s).map_err(serde::de::Error::custom)
  }
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A stored contact, hydrated with its category set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
  pub id:            ContactId,
  pub owner_id:      String,
  pub first_name:    String,
  pub last_name:     String,
  /// Set once by the store at insert; stored UTC, presented local.
  pub created_at:    DateTime<Utc>,
  pub date_of_birth: Option<DateTime<Utc>>,
  pub address1:      Option<String>,
  pub address2:      Option<String>,
  pub city:          Option<String>,
  pub state:         Option<UsState>,
  pub zip_code:      Option<i32>,
  pub email:         String,
  pub phone:         Option<String>,
  pub image:         Option<ContactImage>,
  /// Optimistic-concurrency counter; bumped on every update.
  pub version:       i64,
  /// Categories in association order.
  pub categories:    Vec<Category>,
}

impl Contact {
  /// Display name — computed, never persisted.
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }

  /// Creation timestamp converted for presentation.
  pub fn created_at_local(&self) -> DateTime<Local> {
    self.created_at.with_timezone(&Local)
  }

  /// Birth date converted for presentation.
  pub fn date_of_birth_local(&self) -> Option<DateTime<Local>> {
    self.date_of_birth.map(|d| d.with_timezone(&Local))
  }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// Caller-supplied contact fields for create and full-field edit.
///
/// Owner id, numeric id, creation timestamp, and version are never part of
/// a draft; they are assigned or checked by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactDraft {
  pub first_name:    String,
  pub last_name:     String,
  pub date_of_birth: Option<DateTime<Utc>>,
  pub address1:      Option<String>,
  pub address2:      Option<String>,
  pub city:          Option<String>,
  pub state:         Option<UsState>,
  pub zip_code:      Option<i32>,
  pub email:         String,
  pub phone:         Option<String>,
  pub image:         Option<ContactImage>,
}

impl ContactDraft {
  /// Check required fields and formats, collecting every violation so the
  /// caller can surface them per field.
  pub fn validate(&self) -> Result<(), Error> {
    let mut violations = Violations::default();

    check_name(&mut violations, "first_name", &self.first_name);
    check_name(&mut violations, "last_name", &self.last_name);

    if self.email.trim().is_empty() {
      violations.push("email", "email address is required");
    } else if !self.email.contains('@') {
      violations.push("email", "not a valid email address");
    }

    if let Some(image) = &self.image
      && image.content_type.trim().is_empty()
    {
      violations.push("image", "image content type is required");
    }

    if violations.is_empty() {
      Ok(())
    } else {
      Err(Error::Validation(violations))
    }
  }
}

fn check_name(violations: &mut Violations, field: &'static str, value: &str) {
  let len = value.chars().count();
  if len < NAME_MIN || len > NAME_MAX {
    violations.push(
      field,
      format!("must be between {NAME_MIN} and {NAME_MAX} characters"),
    );
  }
}

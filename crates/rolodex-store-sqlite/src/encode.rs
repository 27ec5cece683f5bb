//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings in UTC; the local-time
//! presentation happens in `rolodex-core`, never here, so the store/read
//! round trip is symmetric by construction. States are stored as their
//! two-letter abbreviation.

use std::str::FromStr as _;

use chrono::{DateTime, Utc};
use rolodex_core::{
  Error, Result,
  category::Category,
  contact::{Contact, ContactImage},
  state::UsState,
};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(Error::storage)
}

// ─── UsState ─────────────────────────────────────────────────────────────────

pub fn encode_state(s: UsState) -> String { s.to_string() }

pub fn decode_state(s: &str) -> Result<UsState> {
  UsState::from_str(s).map_err(Error::storage)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw column values read directly from a `contacts` row.
pub struct RawContact {
  pub contact_id:    i64,
  pub owner_id:      String,
  pub first_name:    String,
  pub last_name:     String,
  pub created_at:    String,
  pub date_of_birth: Option<String>,
  pub address1:      Option<String>,
  pub address2:      Option<String>,
  pub city:          Option<String>,
  pub state:         Option<String>,
  pub zip_code:      Option<i32>,
  pub email:         String,
  pub phone:         Option<String>,
  pub image_data:    Option<Vec<u8>>,
  pub image_type:    Option<String>,
  pub version:       i64,
}

impl RawContact {
  /// Decode into the domain type, attaching the already-hydrated category
  /// set. The image pair is total by schema CHECK; a half-present pair is
  /// treated as no image.
  pub fn into_contact(self, categories: Vec<Category>) -> Result<Contact> {
    let created_at = decode_dt(&self.created_at)?;
    let date_of_birth =
      self.date_of_birth.as_deref().map(decode_dt).transpose()?;
    let state = self.state.as_deref().map(decode_state).transpose()?;

    let image = match (self.image_data, self.image_type) {
      (Some(data), Some(content_type)) => {
        Some(ContactImage { content_type, data })
      }
      _ => None,
    };

    Ok(Contact {
      id: self.contact_id,
      owner_id: self.owner_id,
      first_name: self.first_name,
      last_name: self.last_name,
      created_at,
      date_of_birth,
      address1: self.address1,
      address2: self.address2,
      city: self.city,
      state,
      zip_code: self.zip_code,
      email: self.email,
      phone: self.phone,
      image,
      version: self.version,
      categories,
    })
  }
}

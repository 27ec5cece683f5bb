//! Derived views assembled for UI population.

use serde::{Deserialize, Serialize};

use crate::{category::Category, contact::Contact};

/// Any contact listing (all, by category, or search results) paired with the
/// caller's full category set, so the filter controls can always be drawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactListing {
  pub contacts:   Vec<Contact>,
  pub categories: Vec<Category>,
}

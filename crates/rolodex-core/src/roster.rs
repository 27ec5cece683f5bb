//! Roster — the resolved member list of a category, used for bulk email.

use serde::{Deserialize, Serialize};

use crate::contact::Contact;

/// The bulk-email view of one category.
///
/// `email_addresses` is the ready-to-use recipient string; `members` keeps
/// positional correspondence with its slots, so a member with a blank email
/// still occupies a slot rather than silently vanishing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
  pub group_name:      String,
  pub members:         Vec<Contact>,
  pub email_addresses: String,
}

/// Join email addresses the way the compose form expects them.
pub fn join_emails<'a>(emails: impl IntoIterator<Item = &'a str>) -> String {
  emails.into_iter().collect::<Vec<_>>().join("; ")
}

#[cfg(test)]
mod tests {
  use super::join_emails;

  #[test]
  fn joins_with_semicolon_space() {
    let joined = join_emails(["alice@x.com", "bob@y.com"]);
    assert_eq!(joined, "alice@x.com; bob@y.com");
  }

  #[test]
  fn blank_email_keeps_its_slot() {
    let joined = join_emails(["alice@x.com", "", "carol@z.com"]);
    assert_eq!(joined, "alice@x.com; ; carol@z.com");
  }

  #[test]
  fn empty_roster_joins_to_empty_string() {
    assert_eq!(join_emails(std::iter::empty::<&str>()), "");
  }
}

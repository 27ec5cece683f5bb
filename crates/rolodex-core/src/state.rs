//! US state-of-residence enumeration.
//!
//! Stored and serialised as the two-letter postal abbreviation.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Two-letter US postal codes, plus DC.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[allow(clippy::upper_case_acronyms)]
pub enum UsState {
  AL, AK, AZ, AR, CA, CO, CT, DE, DC, FL,
  GA, HI, ID, IL, IN, IA, KS, KY, LA, ME,
  MD, MA, MI, MN, MS, MO, MT, NE, NV, NH,
  NJ, NM, NY, NC, ND, OH, OK, OR, PA, RI,
  SC, SD, TN, TX, UT, VT, VA, WA, WV, WI,
  WY,
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::UsState;

  #[test]
  fn abbreviation_roundtrip() {
    assert_eq!(UsState::NC.to_string(), "NC");
    assert_eq!(UsState::from_str("NC").unwrap(), UsState::NC);
  }

  #[test]
  fn unknown_abbreviation_rejected() {
    assert!(UsState::from_str("ZZ").is_err());
  }
}

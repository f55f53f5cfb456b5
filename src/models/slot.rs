use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{EnumIter, EnumString, IntoEnumIterator};

/// Fixed set of account identity contexts. Slots are never created at runtime.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    strum::Display,
)]
pub enum AccountSlot {
    #[default]
    S0,
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    S8,
    S9,
}

/// Highest slot number accepted in numeric form on the command line.
pub const MAX_SLOT_NUMBER: u32 = 99;

impl AccountSlot {
    /// Exact name match, `S0`, `S1`...
    pub fn from_name(name: &str) -> Option<Self> {
        Self::from_str(name).ok()
    }

    /// Maps `n` to slot `S<n>`. `None` when out of the numeric range or not a defined slot.
    pub fn from_number(n: u32) -> Option<Self> {
        if n > MAX_SLOT_NUMBER {
            return None;
        }
        Self::from_name(&format!("S{n}"))
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn all() -> impl Iterator<Item = AccountSlot> {
        Self::iter()
    }
}

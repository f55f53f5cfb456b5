use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    strum::Display,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum GameType {
    Bf3,
    Bf4,
    Bfh,
    Bf1,
    Bfv,
    Bf2042,
    Ttf2,
    Nfsu,
}

impl GameType {
    /// Case-insensitive lookup, `bf4` -> `BF4`.
    pub fn parse(value: &str) -> Option<Self> {
        Self::from_str(value.trim()).ok()
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GameType::Bf3 => "Battlefield 3",
            GameType::Bf4 => "Battlefield 4",
            GameType::Bfh => "Battlefield Hardline",
            GameType::Bf1 => "Battlefield 1",
            GameType::Bfv => "Battlefield V",
            GameType::Bf2042 => "Battlefield 2042",
            GameType::Ttf2 => "Titanfall 2",
            GameType::Nfsu => "Need for Speed Unbound",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_any_case() {
        assert_eq!(GameType::parse("bf4"), Some(GameType::Bf4));
        assert_eq!(GameType::parse("BF2042"), Some(GameType::Bf2042));
        assert_eq!(GameType::parse("Ttf2"), Some(GameType::Ttf2));
        assert_eq!(GameType::parse("bf5"), None);
    }

    #[test]
    fn displays_uppercase_identifier() {
        assert_eq!(GameType::Bf4.to_string(), "BF4");
        assert_eq!(GameType::Bfh.to_string(), "BFH");
    }
}

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LocaleEntry {
    pub code: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

use crate::models::game::GameType;
use crate::models::slot::AccountSlot;
use serde::{Deserialize, Serialize};

/// Per-run overrides parsed from the process arguments. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandLineOverrides {
    pub account_slot: Option<AccountSlot>,
    pub game: Option<GameType>,
}

/// Cookie pair that authorizes resuming a slot without interactive login.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    #[serde(rename = "Remid", default)]
    pub session_id: String,
    #[serde(rename = "Sid", default)]
    pub secondary_token: String,
}

impl SessionCredential {
    pub fn is_valid(&self) -> bool {
        !self.session_id.trim().is_empty() && !self.secondary_token.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionDecision {
    /// Skip interactive login and go straight to the authenticated flow.
    Resume(AccountSlot),
    ShowPicker,
}

use serde::{Deserialize, Serialize};

/// Visitor display settings. Independent from authorization state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPreferences {
    /// Dark colour scheme enabled.
    pub dark_mode: bool,
}

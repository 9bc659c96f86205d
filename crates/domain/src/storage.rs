use std::fmt::{Display, Formatter};
use std::str::FromStr;

use hearthware_core::AppError;
use serde::{Deserialize, Serialize};

/// Well-known local storage slots. Each holds one JSON value verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionKey {
    /// Product catalog array.
    Products,
    /// Customer enquiry array, newest first.
    Enquiries,
    /// Sample blog fixture kept from the pre-remote admin.
    LegacyBlogs,
    /// Display preference flag.
    DarkMode,
}

impl CollectionKey {
    /// Returns the storage key string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Enquiries => "enquiries",
            Self::LegacyBlogs => "blogs",
            Self::DarkMode => "darkMode",
        }
    }

    /// Returns all known keys.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[CollectionKey] = &[
            CollectionKey::Products,
            CollectionKey::Enquiries,
            CollectionKey::LegacyBlogs,
            CollectionKey::DarkMode,
        ];

        ALL
    }
}

impl Display for CollectionKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for CollectionKey {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown storage key '{value}'")))
    }
}

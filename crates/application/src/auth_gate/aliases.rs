use std::collections::BTreeMap;
use std::str::FromStr;

use hearthware_core::AppError;

/// Finite mapping from short login usernames to canonical emails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
}

impl AliasTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one alias. Aliases match case-insensitively.
    #[must_use]
    pub fn with_alias(mut self, alias: impl AsRef<str>, email: impl Into<String>) -> Self {
        self.aliases
            .insert(alias.as_ref().trim().to_lowercase(), email.into());
        self
    }

    /// Maps a login identifier to the email handed to the identity service.
    ///
    /// Identifiers containing `@` and unknown usernames pass through trimmed.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> String {
        let identifier = identifier.trim();
        if identifier.contains('@') {
            return identifier.to_owned();
        }

        self.aliases
            .get(&identifier.to_lowercase())
            .cloned()
            .unwrap_or_else(|| identifier.to_owned())
    }

    /// Returns the number of aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl FromStr for AliasTable {
    type Err = AppError;

    /// Parses `alias=email` pairs separated by commas.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut table = Self::new();
        for pair in value.split(',').map(str::trim).filter(|pair| !pair.is_empty()) {
            let Some((alias, email)) = pair.split_once('=') else {
                return Err(AppError::Validation(format!(
                    "alias entry '{pair}' must look like alias=email"
                )));
            };

            let (alias, email) = (alias.trim(), email.trim());
            if alias.is_empty() || alias.contains('@') || !email.contains('@') {
                return Err(AppError::Validation(format!(
                    "alias entry '{pair}' must map a username to an email"
                )));
            }

            table = table.with_alias(alias, email);
        }

        Ok(table)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated identity returned by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: String,
    email: Option<String>,
}

impl Principal {
    /// Creates a principal from the identity service's subject and email.
    #[must_use]
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }

    /// Returns the stable principal identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the email, if the provider returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// One authenticated session. Validity is owned by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    access_token: String,
    refresh_token: Option<String>,
    principal: Principal,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a session from token material and the signed-in principal.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        principal: Principal,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            principal,
            expires_at,
        }
    }

    /// Returns the opaque bearer token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.access_token.as_str()
    }

    /// Returns the refresh token, if the provider issued one.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Returns the principal the session belongs to.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Returns the expiry instant, if known.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns whether the session is past its expiry at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{Principal, Session};

    #[test]
    fn session_without_expiry_never_expires() {
        let session = Session::new("token", None, Principal::new("p-1", None), None);
        assert!(!session.is_expired(Utc::now()));
    }

    #[test]
    fn session_expires_at_deadline() {
        let now = Utc::now();
        let session = Session::new(
            "token",
            None,
            Principal::new("p-1", Some("ops@example.com".to_owned())),
            Some(now - Duration::seconds(1)),
        );
        assert!(session.is_expired(now));
    }
}

//! Customer contact submissions.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use hearthware_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Stored phone value when the customer leaves the field blank.
pub const PHONE_NOT_PROVIDED: &str = "Not provided";

/// Source tag used by the public contact form.
pub const CONTACT_FORM_SOURCE: &str = "contact-form";

/// Handling state of an enquiry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnquiryStatus {
    /// Not yet looked at.
    #[default]
    New,
    /// Someone is working on it.
    InProgress,
    /// A response has been recorded.
    Responded,
    /// No further action.
    Closed,
}

impl EnquiryStatus {
    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in-progress",
            Self::Responded => "responded",
            Self::Closed => "closed",
        }
    }

    /// Returns all statuses in workflow order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[EnquiryStatus] = &[
            EnquiryStatus::New,
            EnquiryStatus::InProgress,
            EnquiryStatus::Responded,
            EnquiryStatus::Closed,
        ];

        ALL
    }

    /// Returns whether the enquiry still awaits an answer.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::New | Self::InProgress)
    }
}

impl FromStr for EnquiryStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown enquiry status '{value}'")))
    }
}

/// Triage priority of an enquiry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnquiryPriority {
    /// Can wait.
    Low,
    /// Normal handling.
    #[default]
    Medium,
    /// Should be handled soon.
    High,
    /// Needs immediate attention.
    Urgent,
}

impl EnquiryPriority {
    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl FromStr for EnquiryPriority {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(AppError::Validation(format!(
                "unknown enquiry priority '{value}'"
            ))),
        }
    }
}

/// A customer enquiry as stored in the enquiries collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enquiry {
    /// Identifier.
    pub id: String,
    /// Customer name.
    pub name: String,
    /// Customer email.
    pub email: String,
    /// Customer phone or [`PHONE_NOT_PROVIDED`].
    pub phone: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub message: String,
    /// Enquiry category (e.g. "wholesale", "export").
    #[serde(default)]
    pub category: String,
    /// Handling state.
    #[serde(default)]
    pub status: EnquiryStatus,
    /// Triage priority.
    #[serde(default)]
    pub priority: EnquiryPriority,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
    /// Admin response text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// When the response was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
    /// Where the enquiry came from.
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    CONTACT_FORM_SOURCE.to_owned()
}

impl Enquiry {
    /// Builds a new enquiry from a public submission.
    #[must_use]
    pub fn from_submission(
        id: impl Into<String>,
        submission: EnquirySubmission,
        created_at: DateTime<Utc>,
    ) -> Self {
        let phone = submission
            .phone
            .map(|phone| phone.trim().to_owned())
            .filter(|phone| !phone.is_empty())
            .unwrap_or_else(|| PHONE_NOT_PROVIDED.to_owned());

        Self {
            id: id.into(),
            name: submission.name,
            email: submission.email,
            phone,
            subject: submission.subject,
            message: submission.message,
            category: submission.category,
            status: EnquiryStatus::New,
            priority: submission.priority.unwrap_or_default(),
            created_at,
            response: None,
            responded_at: None,
            source: submission.source.unwrap_or_else(default_source),
        }
    }

    /// Records an admin response and marks the enquiry responded.
    pub fn respond(&mut self, response: impl Into<String>, responded_at: DateTime<Utc>) {
        self.response = Some(response.into());
        self.responded_at = Some(responded_at);
        self.status = EnquiryStatus::Responded;
    }
}

/// Payload of the public contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnquirySubmission {
    /// Customer name.
    pub name: String,
    /// Customer email.
    pub email: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub message: String,
    /// Enquiry category.
    #[serde(default)]
    pub category: String,
    /// Optional priority, defaults to medium.
    #[serde(default)]
    pub priority: Option<EnquiryPriority>,
    /// Optional source tag, defaults to the contact form.
    #[serde(default)]
    pub source: Option<String>,
}

impl EnquirySubmission {
    /// Checks the contact form rules. Repositories do not call this.
    pub fn validate(&self) -> AppResult<()> {
        for (field, value) in [
            ("name", &self.name),
            ("subject", &self.subject),
            ("message", &self.message),
        ] {
            NonEmptyString::required(value.as_str(), field)?;
        }

        let email = self.email.trim();
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(AppError::Validation(format!(
                "'{email}' is not a valid email address"
            )));
        }

        Ok(())
    }
}

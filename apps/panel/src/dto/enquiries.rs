use hearthware_application::EnquirySummary;
use hearthware_domain::{Enquiry, EnquiryPriority, EnquirySubmission};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Optional status filter for the admin inbox, e.g. `?status=in-progress`.
#[derive(Debug, Default, Deserialize)]
pub struct EnquiryStatusQuery {
    pub status: Option<String>,
}

/// Public contact form payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/enquiry-request.ts"
)]
pub struct EnquiryRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub category: String,
    /// `low`, `medium`, `high` or `urgent`.
    pub priority: Option<String>,
}

impl EnquiryRequest {
    pub fn into_submission(self) -> hearthware_core::AppResult<EnquirySubmission> {
        let priority = self
            .priority
            .as_deref()
            .map(str::parse::<EnquiryPriority>)
            .transpose()?;

        Ok(EnquirySubmission {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: self.phone,
            subject: self.subject.trim().to_owned(),
            message: self.message,
            category: self.category,
            priority,
            source: None,
        })
    }
}

/// Incoming payload for an inbox status change.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/enquiry-status-request.ts"
)]
pub struct EnquiryStatusRequest {
    /// `new`, `in-progress`, `responded` or `closed`.
    pub status: String,
}

/// Incoming payload for an admin reply.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/enquiry-respond-request.ts"
)]
pub struct EnquiryRespondRequest {
    pub response: String,
}

/// API representation of an enquiry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/enquiry-response.ts"
)]
pub struct EnquiryResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub category: String,
    pub status: String,
    pub priority: String,
    pub created_at: String,
    pub response: Option<String>,
    pub responded_at: Option<String>,
    pub source: String,
}

impl From<Enquiry> for EnquiryResponse {
    fn from(value: Enquiry) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            phone: value.phone,
            subject: value.subject,
            message: value.message,
            category: value.category,
            status: value.status.as_str().to_owned(),
            priority: value.priority.as_str().to_owned(),
            created_at: value.created_at.to_rfc3339(),
            response: value.response,
            responded_at: value.responded_at.map(|at| at.to_rfc3339()),
            source: value.source,
        }
    }
}

/// Inbox dashboard counters.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/enquiry-summary-response.ts"
)]
pub struct EnquirySummaryResponse {
    pub total: usize,
    pub new: usize,
    pub in_progress: usize,
    pub responded: usize,
    pub closed: usize,
    pub urgent_open: usize,
}

impl From<EnquirySummary> for EnquirySummaryResponse {
    fn from(value: EnquirySummary) -> Self {
        Self {
            total: value.total,
            new: value.new,
            in_progress: value.in_progress,
            responded: value.responded,
            closed: value.closed,
            urgent_open: value.urgent_open,
        }
    }
}

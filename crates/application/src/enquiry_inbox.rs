//! Customer enquiries over the local `enquiries` collection.

use chrono::Utc;
use hearthware_core::{AppError, AppResult};
use hearthware_domain::{Enquiry, EnquiryPriority, EnquiryStatus, EnquirySubmission};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::{LiveCollection, LocalRepository};

/// Inbox counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquirySummary {
    /// Total stored enquiries.
    pub total: usize,
    /// Status `new`.
    pub new: usize,
    /// Status `in-progress`.
    pub in_progress: usize,
    /// Status `responded`.
    pub responded: usize,
    /// Status `closed`.
    pub closed: usize,
    /// Urgent enquiries that are still open.
    pub urgent_open: usize,
}

/// Contact form intake and admin triage.
///
/// The collection is kept newest first: submissions are inserted at the head.
#[derive(Clone)]
pub struct EnquiryInbox {
    repository: LocalRepository<Enquiry>,
}

impl EnquiryInbox {
    /// Creates an inbox over the enquiries repository.
    #[must_use]
    pub fn new(repository: LocalRepository<Enquiry>) -> Self {
        Self { repository }
    }

    /// Stores a public submission as a new enquiry.
    pub fn submit(&self, submission: EnquirySubmission) -> AppResult<Enquiry> {
        let enquiry = Enquiry::from_submission(Uuid::new_v4().to_string(), submission, Utc::now());
        let stored = enquiry.clone();
        self.repository.update(move |enquiries| {
            enquiries.insert(0, enquiry);
            Ok(())
        })?;

        info!(
            enquiry_id = %stored.id,
            priority = stored.priority.as_str(),
            "enquiry received"
        );
        Ok(stored)
    }

    /// Returns every enquiry, newest first.
    #[must_use]
    pub fn list_all(&self) -> Vec<Enquiry> {
        self.repository.load_all()
    }

    /// Returns the enquiries in one status.
    #[must_use]
    pub fn list_by_status(&self, status: EnquiryStatus) -> Vec<Enquiry> {
        self.repository
            .load_filtered(|enquiry| enquiry.status == status)
    }

    /// Finds one enquiry.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<Enquiry> {
        self.repository
            .load_all()
            .into_iter()
            .find(|enquiry| enquiry.id == id)
    }

    /// Moves one enquiry to another status.
    pub fn update_status(&self, id: &str, status: EnquiryStatus) -> AppResult<Enquiry> {
        let updated = self.repository.update(|enquiries| {
            let enquiry = find_mut(enquiries, id)?;
            enquiry.status = status;
            Ok(enquiry.clone())
        })?;

        info!(enquiry_id = %id, status = status.as_str(), "enquiry status changed");
        Ok(updated)
    }

    /// Records the admin's reply and marks the enquiry responded.
    pub fn respond(&self, id: &str, response: &str) -> AppResult<Enquiry> {
        let response = response.trim();
        if response.is_empty() {
            return Err(AppError::Validation("response text is required".to_owned()));
        }

        let updated = self.repository.update(|enquiries| {
            let enquiry = find_mut(enquiries, id)?;
            enquiry.respond(response, Utc::now());
            Ok(enquiry.clone())
        })?;

        info!(enquiry_id = %id, "enquiry responded");
        Ok(updated)
    }

    /// Removes one enquiry.
    pub fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.update(|enquiries| {
            let before = enquiries.len();
            enquiries.retain(|enquiry| enquiry.id != id);
            if enquiries.len() == before {
                return Err(not_found(id));
            }
            Ok(())
        })?;

        info!(enquiry_id = %id, "enquiry deleted");
        Ok(())
    }

    /// Counts enquiries per status.
    #[must_use]
    pub fn summary(&self) -> EnquirySummary {
        self.repository
            .load_all()
            .iter()
            .fold(EnquirySummary::default(), |mut summary, enquiry| {
                summary.total += 1;
                match enquiry.status {
                    EnquiryStatus::New => summary.new += 1,
                    EnquiryStatus::InProgress => summary.in_progress += 1,
                    EnquiryStatus::Responded => summary.responded += 1,
                    EnquiryStatus::Closed => summary.closed += 1,
                }
                if enquiry.priority == EnquiryPriority::Urgent && enquiry.status.is_open() {
                    summary.urgent_open += 1;
                }
                summary
            })
    }

    /// Live view of the whole inbox.
    #[must_use]
    pub fn live(&self) -> LiveCollection<Enquiry> {
        LiveCollection::unfiltered(&self.repository)
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("enquiry '{id}' does not exist"))
}

fn find_mut<'a>(enquiries: &'a mut [Enquiry], id: &str) -> AppResult<&'a mut Enquiry> {
    enquiries
        .iter_mut()
        .find(|enquiry| enquiry.id == id)
        .ok_or_else(|| not_found(id))
}

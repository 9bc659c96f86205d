use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use hearthware_domain::EnquiryStatus;
use tracing::info;

use crate::dto::{
    EnquiryRequest, EnquiryRespondRequest, EnquiryResponse, EnquiryStatusQuery,
    EnquiryStatusRequest, EnquirySummaryResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// Public contact form.
pub async fn submit_enquiry_handler(
    State(state): State<AppState>,
    Json(payload): Json<EnquiryRequest>,
) -> ApiResult<(StatusCode, Json<EnquiryResponse>)> {
    let submission = payload.into_submission()?;
    submission.validate()?;
    let enquiry = state.enquiries.submit(submission)?;
    info!(enquiry_id = %enquiry.id, category = %enquiry.category, "enquiry received");

    Ok((StatusCode::CREATED, Json(EnquiryResponse::from(enquiry))))
}

pub async fn list_enquiries_handler(
    State(state): State<AppState>,
    Query(query): Query<EnquiryStatusQuery>,
) -> ApiResult<Json<Vec<EnquiryResponse>>> {
    let enquiries = match query.status.as_deref() {
        Some(status) => state
            .enquiries
            .list_by_status(status.parse::<EnquiryStatus>()?),
        None => state.enquiries.list_all(),
    };

    Ok(Json(
        enquiries.into_iter().map(EnquiryResponse::from).collect(),
    ))
}

pub async fn update_enquiry_status_handler(
    State(state): State<AppState>,
    Path(enquiry_id): Path<String>,
    Json(payload): Json<EnquiryStatusRequest>,
) -> ApiResult<Json<EnquiryResponse>> {
    let status = payload.status.parse::<EnquiryStatus>()?;
    let enquiry = state
        .enquiries
        .update_status(enquiry_id.as_str(), status)?;

    Ok(Json(EnquiryResponse::from(enquiry)))
}

pub async fn respond_enquiry_handler(
    State(state): State<AppState>,
    Path(enquiry_id): Path<String>,
    Json(payload): Json<EnquiryRespondRequest>,
) -> ApiResult<Json<EnquiryResponse>> {
    let enquiry = state
        .enquiries
        .respond(enquiry_id.as_str(), payload.response.as_str())?;

    Ok(Json(EnquiryResponse::from(enquiry)))
}

pub async fn delete_enquiry_handler(
    State(state): State<AppState>,
    Path(enquiry_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.enquiries.delete(enquiry_id.as_str())?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn enquiry_summary_handler(State(state): State<AppState>) -> Json<EnquirySummaryResponse> {
    Json(EnquirySummaryResponse::from(state.enquiries.summary()))
}

//! Shared plumbing for the hosted auth and REST endpoints.

use hearthware_core::{AppError, AppResult, NonEmptyString};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use url::Url;

/// Base URL, public API key and HTTP client of the hosted backend.
#[derive(Clone, Debug)]
pub struct RemoteService {
    http_client: reqwest::Client,
    base_url: Url,
    anon_key: NonEmptyString,
}

impl RemoteService {
    /// Creates a service handle. The base URL must be absolute.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        anon_key: impl Into<String>,
    ) -> AppResult<Self> {
        let mut base_url = Url::parse(base_url.trim()).map_err(|error| {
            AppError::Validation(format!("invalid remote service url '{base_url}': {error}"))
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let anon_key = NonEmptyString::required(anon_key, "remote service api key")?;

        Ok(Self {
            http_client,
            base_url,
            anon_key,
        })
    }

    /// Resolves a path relative to the service root.
    pub(crate) fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url.join(path).map_err(|error| {
            AppError::Internal(format!("failed to build remote url for '{path}': {error}"))
        })
    }

    /// Starts a request carrying the api key and a bearer token.
    ///
    /// Without a user token the api key doubles as the bearer, which is how
    /// anonymous reads are authorised.
    pub(crate) fn request(&self, method: Method, url: Url, bearer: Option<&str>) -> RequestBuilder {
        let bearer = bearer.unwrap_or(self.anon_key.as_str());
        self.http_client
            .request(method, url)
            .header("apikey", self.anon_key.as_str())
            .bearer_auth(bearer)
    }

    /// Sends a request, mapping transport failures.
    pub(crate) async fn send(&self, builder: RequestBuilder, operation: &str) -> AppResult<Response> {
        builder.send().await.map_err(|error| {
            AppError::Internal(format!("{operation} failed: remote service unreachable: {error}"))
        })
    }
}

/// Which endpoint family a failed response came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ErrorScope {
    /// Token grants, where a bad request means rejected credentials.
    TokenGrant,
    /// Every other auth or REST call.
    Resource,
}

/// Converts a non-success response into an application error.
///
/// The service's own message is kept verbatim so it can be shown to the user.
pub(crate) async fn error_from_response(
    response: Response,
    operation: &str,
    scope: ErrorScope,
) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = service_message(&body)
        .unwrap_or_else(|| format!("{operation} failed with status {status}"));

    error_for_status(status, message, scope)
}

fn error_for_status(status: StatusCode, message: String, scope: ErrorScope) -> AppError {
    match status {
        StatusCode::BAD_REQUEST if scope == ErrorScope::TokenGrant => {
            AppError::Unauthorized(message)
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Internal(message),
    }
}

/// Picks the human readable message out of an auth or REST error body.
pub(crate) fn service_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|field| value.get(field).and_then(Value::as_str))
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(ToOwned::to_owned)
}

/// Reads a JSON body, mapping decode failures.
pub(crate) async fn decode_json<T>(response: Response, operation: &str) -> AppResult<T>
where
    T: serde::de::DeserializeOwned,
{
    response.json::<T>().await.map_err(|error| {
        AppError::Internal(format!("{operation} returned an unreadable body: {error}"))
    })
}

#[cfg(test)]
mod tests {
    use hearthware_core::AppError;
    use reqwest::StatusCode;

    use super::{ErrorScope, RemoteService, error_for_status, service_message};

    #[test]
    fn base_url_gains_trailing_slash() {
        let service = RemoteService::new(
            reqwest::Client::new(),
            "https://project.example.co/base",
            "anon",
        )
        .unwrap_or_else(|_| unreachable!());

        let url = service
            .endpoint("auth/v1/user")
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(url.as_str(), "https://project.example.co/base/auth/v1/user");
    }

    #[test]
    fn rejects_relative_url_and_blank_key() {
        assert!(RemoteService::new(reqwest::Client::new(), "/relative", "anon").is_err());
        assert!(RemoteService::new(reqwest::Client::new(), "https://x.example", " ").is_err());
    }

    #[test]
    fn extracts_service_messages() {
        assert_eq!(
            service_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
                .as_deref(),
            Some("Invalid login credentials")
        );
        assert_eq!(
            service_message(r#"{"code":400,"msg":"Email not confirmed"}"#).as_deref(),
            Some("Email not confirmed")
        );
        assert_eq!(
            service_message(r#"{"message":"permission denied for table blogs"}"#).as_deref(),
            Some("permission denied for table blogs")
        );
        assert!(service_message("<html>").is_none());
    }

    #[test]
    fn bad_request_is_a_credential_failure_only_for_token_grants() {
        let message = || "Invalid login credentials".to_owned();
        assert!(matches!(
            error_for_status(StatusCode::BAD_REQUEST, message(), ErrorScope::TokenGrant),
            AppError::Unauthorized(text) if text == "Invalid login credentials"
        ));
        assert!(matches!(
            error_for_status(StatusCode::BAD_REQUEST, message(), ErrorScope::Resource),
            AppError::Validation(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED, message(), ErrorScope::Resource),
            AppError::Unauthorized(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN, message(), ErrorScope::Resource),
            AppError::Forbidden(_)
        ));
    }
}

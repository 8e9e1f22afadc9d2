//! Async HTTP client for the election service.
//!
//! Every call is authenticated with a bearer token that the caller reads
//! from local storage immediately before the call.

use std::future::Future;

use reqwest::header::CACHE_CONTROL;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::errors::ApiError;
use super::types::{
    ElectionEnvelope, StatusNotification, StatusUpdateRequest, VoteStatusResponse,
};
use crate::config::ApiConfig;
use crate::elections::{CandidateRoster, Election, ElectionStatus};

/// Header carrying the election whose candidates are requested.
pub const ELECTION_ID_HEADER: &str = "x-election-id";

/// Remote operations the election screen consumes.
pub trait ElectionApi: Send + Sync {
    /// Requesting user plus approved candidates of an election.
    fn fetch_candidates(
        &self,
        token: &str,
        election_id: &str,
    ) -> impl Future<Output = Result<CandidateRoster, ApiError>> + Send;

    fn fetch_election(
        &self,
        token: &str,
        election_id: &str,
    ) -> impl Future<Output = Result<Election, ApiError>> + Send;

    /// Whether the token's user has voted in the election.
    fn check_vote_status(
        &self,
        token: &str,
        election_id: &str,
    ) -> impl Future<Output = Result<bool, ApiError>> + Send;

    fn set_election_status(
        &self,
        token: &str,
        election_id: &str,
        status: ElectionStatus,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn send_status_notification(
        &self,
        token: &str,
        notification: &StatusNotification,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// [`ElectionApi`] over HTTP/JSON using reqwest.
#[derive(Debug, Clone)]
pub struct HttpElectionApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpElectionApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<reqwest::Response, ApiError> {
        debug!(event = "core.api.request_started", operation = operation);

        let response = request.send().await.map_err(|e| {
            let error = ApiError::from(e);
            warn!(
                event = "core.api.request_failed",
                operation = operation,
                error = %error
            );
            error
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(
                event = "core.api.request_completed",
                operation = operation,
                status = status.as_u16()
            );
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_response(status.as_u16(), &body);
        warn!(
            event = "core.api.request_rejected",
            operation = operation,
            status = status.as_u16(),
            error = %error
        );
        Err(error)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, operation).await?;
        response.json::<T>().await.map_err(|e| ApiError::InvalidResponse {
            message: format!("{}: {}", operation, e),
        })
    }
}

impl ElectionApi for HttpElectionApi {
    async fn fetch_candidates(
        &self,
        token: &str,
        election_id: &str,
    ) -> Result<CandidateRoster, ApiError> {
        let request = self
            .client
            .get(self.url("/api/candidate"))
            .bearer_auth(token)
            .header(CACHE_CONTROL, "no-cache")
            .header(ELECTION_ID_HEADER, election_id);

        let roster: CandidateRoster = self.get_json(request, "fetch_candidates").await?;
        info!(
            event = "core.api.candidates_fetched",
            election_id = election_id,
            count = roster.candidates.len()
        );
        Ok(roster)
    }

    async fn fetch_election(&self, token: &str, election_id: &str) -> Result<Election, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("/api/election/{}", election_id)))
            .bearer_auth(token)
            .header(CACHE_CONTROL, "no-cache");

        let envelope: ElectionEnvelope = self.get_json(request, "fetch_election").await?;
        Ok(envelope.election)
    }

    async fn check_vote_status(&self, token: &str, election_id: &str) -> Result<bool, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("/api/votes/check-status/{}", election_id)))
            .bearer_auth(token);

        let status: VoteStatusResponse = self.get_json(request, "check_vote_status").await?;
        Ok(status.has_voted)
    }

    async fn set_election_status(
        &self,
        token: &str,
        election_id: &str,
        status: ElectionStatus,
    ) -> Result<(), ApiError> {
        let request = self
            .client
            .put(self.url(&format!("/api/election/{}/status", election_id)))
            .bearer_auth(token)
            .header(CACHE_CONTROL, "no-cache")
            .json(&StatusUpdateRequest { status });

        self.send(request, "set_election_status").await?;
        info!(
            event = "core.api.election_status_changed",
            election_id = election_id,
            status = %status
        );
        Ok(())
    }

    async fn send_status_notification(
        &self,
        token: &str,
        notification: &StatusNotification,
    ) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.url("/api/notification/send-status-notification"))
            .bearer_auth(token)
            .json(notification);

        self.send(request, "send_status_notification").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ApiConfig {
            base_url: Some("https://vote.example.edu/".to_string()),
            timeout_ms: None,
        };
        let api = HttpElectionApi::new(&config).unwrap();
        assert_eq!(api.base_url(), "https://vote.example.edu");
        assert_eq!(
            api.url("/api/election/3"),
            "https://vote.example.edu/api/election/3"
        );
    }
}

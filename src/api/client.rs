//! League API client
//!
//! Performs a single GET against the league endpoint, then checks that the
//! response actually contains matchups for the requested scoring period.

use reqwest::{Client, Url};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::RequestKey;
use crate::config::{Credentials, DEFAULT_BASE_URL};

/// Fixed timeout for one league request
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Why a fetch produced no usable payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// Connection failure or timeout
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("HTTP status {0}")]
    Http(u16),

    /// Response arrived but lacks the expected structure
    #[error("invalid payload: {0}")]
    InvalidShape(String),
}

impl FetchFailure {
    /// Short classification used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            FetchFailure::Network(_) => "network-error",
            FetchFailure::Http(_) => "http-error",
            FetchFailure::InvalidShape(_) => "invalid-shape",
        }
    }
}

/// Errors building a [`LeagueClient`]
#[derive(Debug, Error)]
pub enum ClientError {
    /// The underlying HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL does not parse or cannot take path segments
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Result of a single fetch
pub type FetchOutcome = Result<Value, FetchFailure>;

/// Checks that `payload` has `teams`, `schedule`, and a matchup in `period`
pub fn validate_payload(payload: &Value, period: u32) -> Result<(), FetchFailure> {
    let object = payload
        .as_object()
        .ok_or_else(|| FetchFailure::InvalidShape("response is not a JSON object".to_string()))?;

    if !object.contains_key("teams") || !object.contains_key("schedule") {
        return Err(FetchFailure::InvalidShape(
            "missing `teams` or `schedule`".to_string(),
        ));
    }

    let has_matchups = object
        .get("schedule")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter().any(|row| {
                row.get("matchupPeriodId").and_then(Value::as_f64) == Some(f64::from(period))
            })
        })
        .unwrap_or(false);

    if !has_matchups {
        return Err(FetchFailure::InvalidShape(format!(
            "no matchups for period {}",
            period
        )));
    }
    Ok(())
}

/// Client for the fantasy league read API
#[derive(Debug, Clone)]
pub struct LeagueClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Base URL for the API (allows override for testing)
    base_url: Url,
}

impl LeagueClient {
    /// Creates a client against the public API
    pub fn new() -> Result<Self, ClientError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL
    pub fn with_base_url(base_url: impl AsRef<str>) -> Result<Self, ClientError> {
        let raw = base_url.as_ref();
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason,
        };
        let base_url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".to_string()));
        }

        let http_client = Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Endpoint for a season and league
    ///
    /// The league id is appended as a single percent-encoded path segment.
    fn league_url(&self, key: &RequestKey) -> Url {
        let mut url = self.base_url.clone();
        let year = key.year.to_string();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "seasons",
                year.as_str(),
                "segments",
                "0",
                "leagues",
                key.league_id.as_str(),
            ]);
        }
        url
    }

    /// Fetches and validates league data for `key`
    ///
    /// Issues exactly one request. Every failure is logged with the full key
    /// and returned as a [`FetchFailure`]; nothing is retried here.
    pub async fn fetch(
        &self,
        key: &RequestKey,
        credentials: &Credentials,
        headers: &BTreeMap<String, String>,
    ) -> FetchOutcome {
        let result = self.fetch_unlogged(key, credentials, headers).await;
        if let Err(failure) = &result {
            warn!(
                league = %key.league_id,
                year = key.year,
                period = key.period,
                views = ?key.views,
                kind = failure.kind(),
                error = %failure,
                "league fetch failed"
            );
        }
        result
    }

    async fn fetch_unlogged(
        &self,
        key: &RequestKey,
        credentials: &Credentials,
        headers: &BTreeMap<String, String>,
    ) -> FetchOutcome {
        let mut query: Vec<(&str, String)> = vec![("scoringPeriodId", key.period.to_string())];
        query.extend(key.views().map(|view| ("view", view.to_string())));

        let mut request = self.http_client.get(self.league_url(key)).query(&query);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(cookie) = credentials.cookie_header() {
            request = request.header(reqwest::header::COOKIE, cookie);
        }

        debug!(%key, "requesting league data");
        let response = request
            .send()
            .await
            .map_err(|e| FetchFailure::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Http(status.as_u16()));
        }

        let payload = response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                FetchFailure::InvalidShape(format!("body is not JSON: {}", e))
            } else {
                FetchFailure::Network(e.to_string())
            }
        })?;

        validate_payload(&payload, key.period)?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_payload() {
        let payload = json!({
            "teams": [{"id": 1}],
            "schedule": [{"matchupPeriodId": 1}, {"matchupPeriodId": 2}]
        });
        assert!(validate_payload(&payload, 2).is_ok());
    }

    #[test]
    fn test_missing_schedule_is_invalid() {
        let payload = json!({"teams": []});
        assert!(matches!(
            validate_payload(&payload, 1),
            Err(FetchFailure::InvalidShape(_))
        ));
    }

    #[test]
    fn test_empty_object_is_invalid() {
        assert!(validate_payload(&json!({}), 1).is_err());
        assert!(validate_payload(&json!([]), 1).is_err());
        assert!(validate_payload(&Value::Null, 1).is_err());
    }

    #[test]
    fn test_schedule_without_requested_period_is_invalid() {
        let payload = json!({
            "teams": [],
            "schedule": [{"matchupPeriodId": 2}, {"matchupPeriodId": 2}]
        });
        let err = validate_payload(&payload, 3).unwrap_err();
        assert_eq!(err.kind(), "invalid-shape");
        assert!(err.to_string().contains("period 3"));
    }

    #[test]
    fn test_schedule_not_an_array_is_invalid() {
        let payload = json!({"teams": [], "schedule": {"matchupPeriodId": 1}});
        assert!(validate_payload(&payload, 1).is_err());
    }

    #[test]
    fn test_failure_kinds() {
        assert_eq!(FetchFailure::Network("x".into()).kind(), "network-error");
        assert_eq!(FetchFailure::Http(404).kind(), "http-error");
        assert_eq!(FetchFailure::Http(404).to_string(), "HTTP status 404");
    }

    #[test]
    fn test_league_url() {
        let client = LeagueClient::with_base_url("http://localhost:1/ffl/").unwrap();
        let key = RequestKey::new("777", 2023, 1, ["mTeam"]);
        assert_eq!(
            client.league_url(&key).as_str(),
            "http://localhost:1/ffl/seasons/2023/segments/0/leagues/777"
        );
    }

    #[test]
    fn test_league_url_encodes_league_id() {
        let client = LeagueClient::with_base_url("http://localhost:1/ffl").unwrap();
        let key = RequestKey::new("a/b?c#d", 2023, 1, ["mTeam"]);
        let url = client.league_url(&key);
        assert_eq!(
            url.as_str(),
            "http://localhost:1/ffl/seasons/2023/segments/0/leagues/a%2Fb%3Fc%23d"
        );
        assert!(url.query().is_none());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            LeagueClient::with_base_url("not a url"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            LeagueClient::with_base_url("mailto:someone@example.com"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_float_period_id_matches() {
        let payload = json!({"teams": [], "schedule": [{"matchupPeriodId": 3.0}]});
        assert!(validate_payload(&payload, 3).is_ok());
        let payload = json!({"teams": [], "schedule": [{"matchupPeriodId": 3.5}]});
        assert!(validate_payload(&payload, 3).is_err());
    }
}

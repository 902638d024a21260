use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::{DomainSearchData, Envelope, ErrorBody, VerificationData};
use super::{ApiError, EmailApi, Endpoint};
use crate::config::ApiConfig;

const USER_AGENT: &str = concat!("mailfinder/", env!("CARGO_PKG_VERSION"));
/// The key travels in a header so it never shows up in request URLs.
pub(crate) const API_KEY_HEADER: &str = "X-API-KEY";

/// Blocking client for the Hunter v2 API. Cloning is cheap and shares the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct HunterClient {
    http: Client,
    config: ApiConfig,
}

impl HunterClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(ApiError::client_build)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn get<T>(&self, endpoint: Endpoint, target: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = endpoint_url(self.config.base_url(), endpoint);
        debug!(%endpoint, lookup = target, "calling remote API");

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, self.config.api_key())
            .query(&[(endpoint.target_param(), target)])
            .send()
            .map_err(|err| ApiError::transport(endpoint, err))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| ApiError::transport(endpoint, err))?;

        if !status.is_success() {
            let details = error_details(&body);
            warn!(
                %endpoint,
                lookup = target,
                status = status.as_u16(),
                "remote API returned an error status"
            );
            return Err(ApiError::status(endpoint, status.as_u16(), details));
        }

        decode(endpoint, &body)
    }
}

impl EmailApi for HunterClient {
    fn verify_email(&self, email: &str) -> Result<String, ApiError> {
        let envelope: Envelope<VerificationData> = self.get(Endpoint::EmailVerifier, email)?;
        debug!(email, status = %envelope.data.status, "email verified");
        Ok(envelope.data.status)
    }

    fn domain_search(&self, domain: &str) -> Result<Vec<String>, ApiError> {
        let envelope: Envelope<DomainSearchData> = self.get(Endpoint::DomainSearch, domain)?;
        let emails = extract_values(envelope.data);
        debug!(domain, count = emails.len(), "domain searched");
        Ok(emails)
    }
}

pub(crate) fn endpoint_url(base_url: &str, endpoint: Endpoint) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), endpoint.path())
}

pub(crate) fn decode<T>(endpoint: Endpoint, body: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(body).map_err(|err| {
        warn!(%endpoint, error = %err, "undecodable response body");
        ApiError::decode(endpoint, err)
    })
}

pub(crate) fn extract_values(data: DomainSearchData) -> Vec<String> {
    data.emails.into_iter().map(|entry| entry.value).collect()
}

/// Joins the `details` (or `id` when absent) of every entry of an error
/// body. `None` when the body is not an error document.
pub(crate) fn error_details(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let details: Vec<String> = parsed
        .errors
        .into_iter()
        .filter_map(|entry| entry.details.or(entry.id))
        .collect();
    if details.is_empty() {
        None
    } else {
        Some(details.join("; "))
    }
}

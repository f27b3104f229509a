//! HTTP client for the TEDB VAT retrieval service.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::debug;

use super::envelope::{SOAP_ACTION, request_envelope};
use super::{RatesQuery, RawDocument, XmlNode};
use crate::core::SyncConfig;

/// Error from the TEDB fetch stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// Connection, TLS, or timeout failure.
    #[error("TEDB network error: {0}")]
    Network(String),
    /// Non-success HTTP status without a SOAP fault.
    #[error("TEDB returned HTTP {status}: {body}")]
    Http {
        /// Response status code.
        status: u16,
        /// Start of the response body.
        body: String,
    },
    /// The service answered with a SOAP fault.
    #[error("TEDB SOAP fault: {0}")]
    Fault(String),
    /// The response is not well-formed XML.
    #[error("malformed TEDB response: {0}")]
    Malformed(String),
    /// The request could not be built.
    #[error("could not build TEDB request: {0}")]
    Request(String),
}

/// Something that can answer a [`RatesQuery`] with a raw TEDB document.
pub trait RateSource {
    /// Perform one request for the query.
    fn fetch(&self, query: &RatesQuery) -> impl Future<Output = Result<RawDocument, FetchError>>;
}

const MAX_ERROR_BODY: usize = 512;

/// Client for the TEDB `retrieveVatRates` SOAP operation.
#[derive(Debug, Clone)]
pub struct TedbClient {
    endpoint: String,
    http: reqwest::Client,
}

impl TedbClient {
    /// Create a client for `endpoint` whose requests give up after `timeout`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    /// Create a client from the endpoint and timeout of a [`SyncConfig`].
    pub fn from_config(config: &SyncConfig) -> Result<Self, FetchError> {
        Self::new(config.endpoint.clone(), config.timeout)
    }

    /// The endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch VAT rates for the query's window and member states.
    ///
    /// Sends exactly one request. There is no retry and no pagination.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Network` on transport failures and timeouts,
    /// `FetchError::Fault` if the body is a SOAP fault,
    /// `FetchError::Http` on other non-success statuses, and
    /// `FetchError::Malformed` if the body is not XML.
    pub async fn fetch_vat_rates(&self, query: &RatesQuery) -> Result<RawDocument, FetchError> {
        let envelope = request_envelope(query)?;
        debug!(
            endpoint = %self.endpoint,
            from = %query.date_from,
            to = %query.date_to,
            member_states = ?query.member_states,
            "sending retrieveVatRates request"
        );

        let resp = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", SOAP_ACTION)
            .body(envelope)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        debug!(status = status.as_u16(), bytes = body.len(), "received TEDB response");

        interpret_response(query, status.as_u16(), &body)
    }
}

impl RateSource for TedbClient {
    async fn fetch(&self, query: &RatesQuery) -> Result<RawDocument, FetchError> {
        self.fetch_vat_rates(query).await
    }
}

/// Turn a status code and body into a raw document or a fetch error.
fn interpret_response(query: &RatesQuery, status: u16, body: &str) -> Result<RawDocument, FetchError> {
    let parsed = XmlNode::parse(body);

    // SOAP 1.1 faults usually arrive with HTTP 500.
    if let Some(fault) = parsed.as_ref().ok().and_then(soap_fault) {
        return Err(FetchError::Fault(fault));
    }
    if !(200..300).contains(&status) {
        return Err(FetchError::Http {
            status,
            body: body.chars().take(MAX_ERROR_BODY).collect(),
        });
    }

    Ok(RawDocument {
        query: query.clone(),
        root: parsed?,
    })
}

fn soap_fault(doc: &XmlNode) -> Option<String> {
    let fault = doc.find(&["Envelope", "Body", "Fault"])?;
    let message = fault
        .text_at(&["faultstring"])
        .or_else(|| fault.text_at(&["Reason", "Text"]))
        .unwrap_or("unspecified fault");
    Some(match fault.text_at(&["faultcode"]) {
        Some(code) => format!("{code}: {message}"),
        None => message.to_string(),
    })
}

//! Fetcher for the European Commission's TEDB VAT retrieval service.
//!
//! TEDB ("Taxes in Europe Database") exposes VAT rates per member state
//! through a SOAP operation, `retrieveVatRates`. This module builds the
//! request envelope, performs the single HTTP exchange, and hands back the
//! reply as a [`RawDocument`]: a namespace-stripped element tree the mapper
//! reads a handful of fields from.
//!
//! # Example
//!
//! ```ignore
//! use vatkit::core::DEFAULT_TEDB_ENDPOINT;
//! use vatkit::tedb::*;
//!
//! let client = TedbClient::new(DEFAULT_TEDB_ENDPOINT, Duration::from_secs(60))?;
//! let query = RatesQuery::new(from, to).with_member_states(vec!["DE".into()]);
//! let raw = client.fetch_vat_rates(&query).await?;
//! ```

mod client;
mod envelope;
mod xml;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use client::{FetchError, RateSource, TedbClient};
pub use xml::XmlNode;

/// Parameters of one `retrieveVatRates` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatesQuery {
    /// First day of the window.
    pub date_from: NaiveDate,
    /// Last day of the window (inclusive).
    pub date_to: NaiveDate,
    /// Uppercase ISO codes to restrict to; empty means all member states.
    pub member_states: Vec<String>,
}

impl RatesQuery {
    /// Query every member state for the given window.
    pub fn new(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            date_from,
            date_to,
            member_states: Vec::new(),
        }
    }

    /// Restrict the query to the given ISO codes.
    pub fn with_member_states(mut self, member_states: Vec<String>) -> Self {
        self.member_states = member_states;
        self
    }
}

/// A TEDB reply together with the query that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// The request parameters.
    pub query: RatesQuery,
    /// Parsed reply, rooted at the synthetic `#document` node.
    pub root: XmlNode,
}

impl RawDocument {
    /// Build a raw document from an XML reply body.
    pub fn from_xml(query: RatesQuery, xml: &str) -> Result<Self, FetchError> {
        Ok(Self {
            query,
            root: XmlNode::parse(xml)?,
        })
    }
}

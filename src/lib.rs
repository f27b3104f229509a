//! # vatkit
//!
//! Synchronizes EU VAT rates from the European Commission's TEDB service
//! into a unified, source-agnostic dataset, written as a JSON artifact and a
//! Markdown report.
//!
//! The pipeline has three stages run once per invocation:
//!
//! 1. [`tedb`]: one SOAP request for a date window and optional member
//!    state filter, returning the reply as a [`tedb::RawDocument`].
//! 2. [`mapper`]: translation into [`core::VatDataset`].
//! 3. [`render`]: JSON and Markdown output.
//!
//! Rates use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use vatkit::mapper::map_tedb_to_unified;
//! use vatkit::tedb::{RatesQuery, RawDocument};
//!
//! let query = RatesQuery::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
//! );
//! let raw = RawDocument::from_xml(query, r#"
//!     <retrieveVatRatesRespMsg>
//!       <vatRateResults>
//!         <memberState>DE</memberState>
//!         <type>STANDARD</type>
//!         <rate><type>DEFAULT</type><value>19.0</value></rate>
//!         <situationOn>2024-01-01+01:00</situationOn>
//!       </vatRateResults>
//!     </retrieveVatRatesRespMsg>"#).unwrap();
//!
//! let dataset = map_tedb_to_unified(&raw).unwrap();
//! assert_eq!(dataset.rates.len(), 1);
//! assert_eq!(dataset.rates[0].rate.to_string(), "19.0");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `cli` (default) | The `vatkit` binary (clap, tokio, tracing-subscriber) |

pub mod core;
pub mod mapper;
pub mod render;
pub mod sync;
pub mod tedb;

pub use crate::core::*;

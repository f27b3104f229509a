//! Unified VAT rate model, country tables, configuration and errors.
//!
//! Everything downstream of the TEDB client speaks these types; nothing
//! here performs I/O.

mod config;
pub mod countries;
mod error;
mod types;

pub use config::*;
pub use countries::{EU_MEMBER_STATES, is_known_country_code, member_state_name};
pub use error::*;
pub use types::*;

//! Mapping from the raw TEDB reply to the unified VAT model.
//!
//! Structural problems (no response message) fail the whole mapping, and so
//! does an unknown rate type label on an otherwise usable entry. Entries that
//! lack a usable country, rate, or situation date, or fall outside the
//! requested member states, are skipped and reported in [`MappingOutcome`]
//! whatever their labels say.

mod labels;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::countries::from_tedb_code;
use crate::core::{
    GoodsCategory, MappingError, RateCategory, SourceInfo, VatDataset, VatRate,
    is_known_country_code,
};
use crate::tedb::{RawDocument, XmlNode};
use labels::{
    CATEGORY_DESCRIPTION, CATEGORY_ID, COMMENT, ENTRY_TYPE, Field, MEMBER_STATE, RATE_ENTRY,
    RATE_TYPE, RATE_VALUE, RESPONSE_MESSAGE, SITUATION_ON, SOAP_BODY,
};

/// Service name recorded in [`SourceInfo`].
pub const TEDB_SERVICE: &str = "TEDB";

/// Why an entry was left out of the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SkipReason {
    /// No `memberState`.
    MissingCountry,
    /// `memberState` is not an ISO 3166-1 alpha-2 code.
    UnknownCountry(String),
    /// The country was not among the requested member states.
    OutsideFilter(String),
    /// Neither `rate/type` nor `type` is present.
    MissingCategory,
    /// No `rate/value`.
    MissingRate,
    /// `rate/value` is not a non-negative decimal.
    InvalidRate(String),
    /// No `situationOn`.
    MissingSituationDate,
    /// `situationOn` does not start with a `YYYY-MM-DD` date.
    InvalidSituationDate(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCountry => write!(f, "missing {}", MEMBER_STATE.name),
            Self::UnknownCountry(c) => write!(f, "unknown country code '{c}'"),
            Self::OutsideFilter(c) => write!(f, "country {c} was not requested"),
            Self::MissingCategory => write!(f, "missing {} and {}", RATE_TYPE.name, ENTRY_TYPE.name),
            Self::MissingRate => write!(f, "missing {}", RATE_VALUE.name),
            Self::InvalidRate(v) => write!(f, "invalid rate '{v}'"),
            Self::MissingSituationDate => write!(f, "missing {}", SITUATION_ON.name),
            Self::InvalidSituationDate(v) => write!(f, "invalid situation date '{v}'"),
        }
    }
}

/// An upstream entry that did not make it into the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Zero-based position among the reply's rate entries.
    pub index: usize,
    /// Raw member state code, if one was present.
    pub country: Option<String>,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Result of mapping: the dataset plus every skipped entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingOutcome {
    /// The unified dataset.
    pub dataset: VatDataset,
    /// Entries left out, in reply order.
    pub skipped: Vec<SkippedEntry>,
}

/// Map a raw TEDB document to the unified dataset.
///
/// Deterministic: the same document always yields the same dataset, with
/// rates sorted by country, category, goods category, and situation date.
///
/// # Errors
///
/// `MappingError::MissingSection` if the reply has no
/// `retrieveVatRatesRespMsg`, `MappingError::UnknownLabel` if a kept entry
/// carries a rate type label that is not in the translation table.
pub fn map_tedb_to_unified(raw: &RawDocument) -> Result<VatDataset, MappingError> {
    map_with_report(raw).map(|outcome| outcome.dataset)
}

/// Like [`map_tedb_to_unified`], but also returns the skipped entries.
pub fn map_with_report(raw: &RawDocument) -> Result<MappingOutcome, MappingError> {
    let message = response_message(&raw.root).ok_or(MappingError::MissingSection {
        section: RESPONSE_MESSAGE,
    })?;
    let requested: BTreeSet<&str> = raw.query.member_states.iter().map(String::as_str).collect();

    let mut rates = Vec::new();
    let mut skipped = Vec::new();
    for (index, entry) in message.children_named(RATE_ENTRY).enumerate() {
        match map_entry(index, entry, &requested)? {
            Ok(rate) => rates.push(rate),
            Err(reason) => {
                let country = entry.text_at(MEMBER_STATE.path).map(str::to_string);
                warn!(
                    entry = index,
                    country = country.as_deref().unwrap_or("-"),
                    "skipping TEDB entry: {reason}"
                );
                skipped.push(SkippedEntry {
                    index,
                    country,
                    reason,
                });
            }
        }
    }

    rates.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
    rates.dedup();
    info!(
        rates = rates.len(),
        skipped = skipped.len(),
        "mapped TEDB response"
    );

    Ok(MappingOutcome {
        dataset: VatDataset {
            snapshot: raw.query.date_to,
            source: SourceInfo {
                service: TEDB_SERVICE.into(),
                window_from: raw.query.date_from,
                window_to: raw.query.date_to,
                member_states: raw.query.member_states.clone(),
            },
            rates,
        },
        skipped,
    })
}

/// The response message, either at the document root or inside the SOAP body.
fn response_message(root: &XmlNode) -> Option<&XmlNode> {
    root.child(RESPONSE_MESSAGE)
        .or_else(|| root.find(SOAP_BODY)?.child(RESPONSE_MESSAGE))
}

/// Map one entry. The outer error aborts the mapping, the inner one skips.
///
/// Labels are only translated for entries that survive the field checks, so
/// an unknown label on an entry that would be dropped anyway does not fail
/// the run.
fn map_entry(
    index: usize,
    entry: &XmlNode,
    requested: &BTreeSet<&str>,
) -> Result<Result<VatRate, SkipReason>, MappingError> {
    let fields = match entry_fields(entry, requested) {
        Ok(fields) => fields,
        Err(reason) => return Ok(Err(reason)),
    };
    let Some(category) = entry_category(index, entry)? else {
        return Ok(Err(SkipReason::MissingCategory));
    };

    Ok(Ok(VatRate {
        country_code: fields.country_code,
        category,
        rate: fields.rate,
        situation_on: fields.situation_on,
        goods_category: goods_category(entry),
        comment: entry.text_at(COMMENT.path).map(str::to_string),
    }))
}

/// Fields every kept entry needs, checked before the category label.
struct EntryFields {
    country_code: String,
    rate: Decimal,
    situation_on: NaiveDate,
}

fn entry_fields(entry: &XmlNode, requested: &BTreeSet<&str>) -> Result<EntryFields, SkipReason> {
    let country_code = from_tedb_code(
        entry
            .text_at(MEMBER_STATE.path)
            .ok_or(SkipReason::MissingCountry)?,
    );
    if !is_known_country_code(&country_code) {
        return Err(SkipReason::UnknownCountry(country_code));
    }
    if !requested.is_empty() && !requested.contains(country_code.as_str()) {
        return Err(SkipReason::OutsideFilter(country_code));
    }
    let rate = parse_rate(entry.text_at(RATE_VALUE.path))?;
    let situation_on = parse_situation_date(entry.text_at(SITUATION_ON.path))?;

    Ok(EntryFields {
        country_code,
        rate,
        situation_on,
    })
}

/// Resolve the category from `rate/type`, falling back to the entry `type`.
fn entry_category(index: usize, entry: &XmlNode) -> Result<Option<RateCategory>, MappingError> {
    let lookups: [(Field, fn(&str) -> Option<RateCategory>); 2] = [
        (RATE_TYPE, labels::rate_type_category),
        (ENTRY_TYPE, labels::entry_type_category),
    ];
    for (field, translate) in lookups {
        if let Some(label) = entry.text_at(field.path) {
            return translate(label)
                .map(Some)
                .ok_or_else(|| MappingError::UnknownLabel {
                    field: field.name,
                    value: label.to_string(),
                    entry: index,
                });
        }
    }
    Ok(None)
}

fn parse_rate(value: Option<&str>) -> Result<Decimal, SkipReason> {
    let value = value.ok_or(SkipReason::MissingRate)?;
    match Decimal::from_str(value) {
        Ok(rate) if !rate.is_sign_negative() => Ok(rate),
        _ => Err(SkipReason::InvalidRate(value.to_string())),
    }
}

/// TEDB dates may carry a zone suffix (`2024-01-01+01:00`); only the date counts.
fn parse_situation_date(value: Option<&str>) -> Result<NaiveDate, SkipReason> {
    let value = value.ok_or(SkipReason::MissingSituationDate)?;
    value
        .get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .ok_or_else(|| SkipReason::InvalidSituationDate(value.to_string()))
}

fn goods_category(entry: &XmlNode) -> Option<GoodsCategory> {
    let identifier = entry.text_at(CATEGORY_ID.path)?;
    Some(GoodsCategory {
        identifier: identifier.to_string(),
        description: entry
            .text_at(CATEGORY_DESCRIPTION.path)
            .map(str::to_string),
    })
}

type SortKey<'a> = (
    &'a str,
    RateCategory,
    Option<&'a GoodsCategory>,
    NaiveDate,
    Decimal,
    Option<&'a str>,
);

fn sort_key(rate: &VatRate) -> SortKey<'_> {
    (
        rate.country_code.as_str(),
        rate.category,
        rate.goods_category.as_ref(),
        rate.situation_on,
        rate.rate,
        rate.comment.as_deref(),
    )
}

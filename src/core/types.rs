use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The unified dataset produced by one sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatDataset {
    /// Snapshot label: the run date.
    pub snapshot: NaiveDate,
    /// Where and for which window the rates were requested.
    pub source: SourceInfo,
    /// Normalized rate records, sorted and free of exact duplicates.
    pub rates: Vec<VatRate>,
}

/// Provenance of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Upstream service name (always "TEDB" for now).
    pub service: String,
    /// First day of the fetch window.
    pub window_from: NaiveDate,
    /// Last day of the fetch window (inclusive).
    pub window_to: NaiveDate,
    /// ISO codes the request was restricted to; empty means all member states.
    pub member_states: Vec<String>,
}

/// One normalized VAT rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatRate {
    /// ISO 3166-1 alpha-2 country code, uppercase.
    pub country_code: String,
    /// Rate category.
    pub category: RateCategory,
    /// Rate as a percentage (e.g. `19.0`).
    pub rate: Decimal,
    /// Date as of which the rate is in effect.
    pub situation_on: NaiveDate,
    /// Goods or services category the rate applies to, if any.
    pub goods_category: Option<GoodsCategory>,
    /// Free-text remark from the upstream service.
    pub comment: Option<String>,
}

/// Upstream category of goods or services a reduced rate applies to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GoodsCategory {
    /// Stable identifier (e.g. "FOODSTUFFS").
    pub identifier: String,
    /// Human-readable description.
    pub description: Option<String>,
}

/// Rate category in the unified model.
///
/// Variant order is the report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateCategory {
    /// Standard rate.
    Standard,
    /// Reduced rate.
    Reduced,
    /// Super-reduced rate (below 5%).
    SuperReduced,
    /// Parking rate (transitional, at least 12%).
    Parking,
    /// Zero rate with right of deduction.
    Zero,
    /// Exempt supplies.
    Exempt,
}

impl RateCategory {
    /// Stable machine code, identical to the JSON representation.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Reduced => "reduced",
            Self::SuperReduced => "super_reduced",
            Self::Parking => "parking",
            Self::Zero => "zero",
            Self::Exempt => "exempt",
        }
    }

    /// Label used in the Markdown report.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Reduced => "Reduced",
            Self::SuperReduced => "Super-reduced",
            Self::Parking => "Parking",
            Self::Zero => "Zero",
            Self::Exempt => "Exempt",
        }
    }

    /// Parse from the machine code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "standard" => Some(Self::Standard),
            "reduced" => Some(Self::Reduced),
            "super_reduced" => Some(Self::SuperReduced),
            "parking" => Some(Self::Parking),
            "zero" => Some(Self::Zero),
            "exempt" => Some(Self::Exempt),
            _ => None,
        }
    }
}

impl std::fmt::Display for RateCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

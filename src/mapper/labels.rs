//! Translation table from TEDB's reply schema to the unified model.
//!
//! Every upstream element name and enumeration label the mapper depends on
//! is listed here, so a schema change upstream shows up as a lookup miss in
//! one place.

use crate::core::RateCategory;

/// Response message wrapping the rate entries.
pub(crate) const RESPONSE_MESSAGE: &str = "retrieveVatRatesRespMsg";

/// SOAP wrapper around the response message.
pub(crate) const SOAP_BODY: &[&str] = &["Envelope", "Body"];

/// One rate entry inside the response message.
pub(crate) const RATE_ENTRY: &str = "vatRateResults";

/// An upstream field: its display name and element path within an entry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Field {
    pub name: &'static str,
    pub path: &'static [&'static str],
}

pub(crate) const MEMBER_STATE: Field = Field {
    name: "memberState",
    path: &["memberState"],
};
pub(crate) const ENTRY_TYPE: Field = Field {
    name: "type",
    path: &["type"],
};
pub(crate) const RATE_TYPE: Field = Field {
    name: "rate/type",
    path: &["rate", "type"],
};
pub(crate) const RATE_VALUE: Field = Field {
    name: "rate/value",
    path: &["rate", "value"],
};
pub(crate) const SITUATION_ON: Field = Field {
    name: "situationOn",
    path: &["situationOn"],
};
pub(crate) const CATEGORY_ID: Field = Field {
    name: "category/identifier",
    path: &["category", "identifier"],
};
pub(crate) const CATEGORY_DESCRIPTION: Field = Field {
    name: "category/description",
    path: &["category", "description"],
};
pub(crate) const COMMENT: Field = Field {
    name: "comment",
    path: &["comment"],
};

/// `rate/type` labels.
static RATE_TYPE_LABELS: &[(&str, RateCategory)] = &[
    ("DEFAULT", RateCategory::Standard),
    ("STANDARD_RATE", RateCategory::Standard),
    ("REDUCED_RATE", RateCategory::Reduced),
    ("SUPER_REDUCED_RATE", RateCategory::SuperReduced),
    ("PARKING_RATE", RateCategory::Parking),
    ("ZERO_REDUCED_RATE", RateCategory::Zero),
    ("ZERO_RATE", RateCategory::Zero),
    ("EXEMPTED", RateCategory::Exempt),
];

/// Entry-level `type` labels, used when `rate/type` is absent.
static ENTRY_TYPE_LABELS: &[(&str, RateCategory)] = &[
    ("STANDARD", RateCategory::Standard),
    ("REDUCED", RateCategory::Reduced),
];

fn lookup(table: &[(&str, RateCategory)], label: &str) -> Option<RateCategory> {
    let label = label.trim();
    table
        .iter()
        .find(|(l, _)| l.eq_ignore_ascii_case(label))
        .map(|(_, c)| *c)
}

/// Category for a `rate/type` label.
pub(crate) fn rate_type_category(label: &str) -> Option<RateCategory> {
    lookup(RATE_TYPE_LABELS, label)
}

/// Category for an entry `type` label.
pub(crate) fn entry_type_category(label: &str) -> Option<RateCategory> {
    lookup(ENTRY_TYPE_LABELS, label)
}

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use vatkit::core::*;
use vatkit::mapper::*;
use vatkit::tedb::{RatesQuery, RawDocument};

const RESPONSE: &str = include_str!("fixtures/tedb_response.xml");

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn query() -> RatesQuery {
    RatesQuery::new(date(2024, 1, 1), date(2024, 3, 31))
}

fn raw(query: RatesQuery, xml: &str) -> RawDocument {
    RawDocument::from_xml(query, xml).unwrap()
}

fn entry(country: &str, rate_type: &str, value: &str, situation: &str) -> String {
    format!(
        "<vatRateResults><memberState>{country}</memberState>\
         <rate><type>{rate_type}</type><value>{value}</value></rate>\
         <situationOn>{situation}</situationOn></vatRateResults>"
    )
}

fn response(entries: &[String]) -> String {
    format!(
        "<soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\"><soap:Body>\
         <ns2:retrieveVatRatesRespMsg xmlns:ns2=\"urn:x\">{}</ns2:retrieveVatRatesRespMsg>\
         </soap:Body></soap:Envelope>",
        entries.concat()
    )
}

// ---------------------------------------------------------------------------
// Full fixture
// ---------------------------------------------------------------------------

#[test]
fn fixture_maps_valid_entries_in_order() {
    let dataset = map_tedb_to_unified(&raw(query(), RESPONSE)).unwrap();

    let rows: Vec<_> = dataset
        .rates
        .iter()
        .map(|r| (r.country_code.as_str(), r.category, r.rate))
        .collect();
    assert_eq!(
        rows,
        [
            ("DE", RateCategory::Standard, dec!(19.0)),
            ("DE", RateCategory::Reduced, dec!(7.0)),
            ("FR", RateCategory::Standard, dec!(20.0)),
            ("FR", RateCategory::SuperReduced, dec!(2.1)),
            ("GR", RateCategory::Standard, dec!(24)),
        ]
    );
}

#[test]
fn fixture_metadata_comes_from_query() {
    let dataset = map_tedb_to_unified(&raw(query(), RESPONSE)).unwrap();
    assert_eq!(dataset.snapshot, date(2024, 3, 31));
    assert_eq!(dataset.source.service, "TEDB");
    assert_eq!(dataset.source.window_from, date(2024, 1, 1));
    assert_eq!(dataset.source.window_to, date(2024, 3, 31));
    assert!(dataset.source.member_states.is_empty());
}

#[test]
fn fixture_reports_every_skipped_entry() {
    let outcome = map_with_report(&raw(query(), RESPONSE)).unwrap();
    let reasons: Vec<_> = outcome
        .skipped
        .iter()
        .map(|s| (s.index, s.reason.clone()))
        .collect();
    assert_eq!(
        reasons,
        [
            (6, SkipReason::MissingCountry),
            (7, SkipReason::MissingRate),
            (8, SkipReason::UnknownCountry("XX".into())),
            (9, SkipReason::InvalidRate("twenty".into())),
        ]
    );
    assert_eq!(outcome.skipped[1].country.as_deref(), Some("IT"));
}

#[test]
fn fixture_keeps_goods_category_and_comment() {
    let dataset = map_tedb_to_unified(&raw(query(), RESPONSE)).unwrap();
    let pharma = dataset
        .rates
        .iter()
        .find(|r| r.category == RateCategory::SuperReduced)
        .unwrap();
    let goods = pharma.goods_category.as_ref().unwrap();
    assert_eq!(goods.identifier, "PHARMACEUTICAL_PRODUCTS");
    assert_eq!(
        goods.description.as_deref(),
        Some("Pharmaceutical products | reimbursed")
    );
    assert_eq!(
        pharma.comment.as_deref(),
        Some("Medicines reimbursed by social security")
    );
}

#[test]
fn duplicate_entries_collapse() {
    let dataset = map_tedb_to_unified(&raw(query(), RESPONSE)).unwrap();
    let de_standard = dataset
        .rates
        .iter()
        .filter(|r| r.country_code == "DE" && r.category == RateCategory::Standard)
        .count();
    assert_eq!(de_standard, 1);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn mapping_is_idempotent() {
    let doc = raw(query(), RESPONSE);
    let first = map_tedb_to_unified(&doc).unwrap();
    let second = map_tedb_to_unified(&doc).unwrap();
    assert_eq!(first, second);
}

#[test]
fn entry_order_does_not_change_the_result() {
    let a = entry("DE", "DEFAULT", "19", "2024-01-01");
    let b = entry("FR", "DEFAULT", "20", "2024-01-01");
    let c = entry("DE", "REDUCED_RATE", "7", "2024-01-01");
    let forward = map_tedb_to_unified(&raw(query(), &response(&[a.clone(), b.clone(), c.clone()])));
    let backward = map_tedb_to_unified(&raw(query(), &response(&[c, b, a])));
    assert_eq!(forward.unwrap(), backward.unwrap());
}

#[test]
fn country_codes_are_uppercase_iso() {
    let xml = response(&[
        entry("de", "DEFAULT", "19", "2024-01-01"),
        entry(" fr ", "DEFAULT", "20", "2024-01-01"),
        entry("el", "DEFAULT", "24", "2024-01-01"),
    ]);
    let dataset = map_tedb_to_unified(&raw(query(), &xml)).unwrap();
    let countries: Vec<_> = dataset.rates.iter().map(|r| r.country_code.as_str()).collect();
    assert_eq!(countries, ["DE", "FR", "GR"]);
}

#[test]
fn filter_keeps_only_requested_states() {
    let q = query().with_member_states(vec!["DE".into(), "FR".into()]);
    let dataset = map_tedb_to_unified(&raw(q, RESPONSE)).unwrap();
    assert!(!dataset.rates.is_empty());
    assert!(
        dataset
            .rates
            .iter()
            .all(|r| r.country_code == "DE" || r.country_code == "FR")
    );
    assert_eq!(dataset.source.member_states, ["DE", "FR"]);
}

#[test]
fn entries_without_country_or_rate_are_excluded() {
    let xml = response(&[
        "<vatRateResults><rate><type>DEFAULT</type><value>19</value></rate>\
         <situationOn>2024-01-01</situationOn></vatRateResults>"
            .to_string(),
        "<vatRateResults><memberState>DE</memberState><rate><type>DEFAULT</type></rate>\
         <situationOn>2024-01-01</situationOn></vatRateResults>"
            .to_string(),
        "<vatRateResults><memberState></memberState><rate><type>DEFAULT</type><value>5</value></rate>\
         <situationOn>2024-01-01</situationOn></vatRateResults>"
            .to_string(),
    ]);
    let outcome = map_with_report(&raw(query(), &xml)).unwrap();
    assert!(outcome.dataset.rates.is_empty());
    assert_eq!(outcome.skipped.len(), 3);
}

#[test]
fn incomplete_entry_with_unknown_label_is_skipped() {
    let xml = response(&[
        entry("DE", "DEFAULT", "19.0", "2024-01-01"),
        "<vatRateResults><memberState>IT</memberState><rate><type>NOT_APPLICABLE</type></rate>\
         <situationOn>2024-01-01</situationOn></vatRateResults>"
            .to_string(),
        "<vatRateResults><rate><type>NOT_APPLICABLE</type><value>4</value></rate>\
         <situationOn>2024-01-01</situationOn></vatRateResults>"
            .to_string(),
    ]);
    let outcome = map_with_report(&raw(query(), &xml)).unwrap();

    let countries: Vec<_> = outcome
        .dataset
        .rates
        .iter()
        .map(|r| r.country_code.as_str())
        .collect();
    assert_eq!(countries, ["DE"]);
    assert_eq!(
        outcome.skipped,
        [
            SkippedEntry {
                index: 1,
                country: Some("IT".into()),
                reason: SkipReason::MissingRate,
            },
            SkippedEntry {
                index: 2,
                country: None,
                reason: SkipReason::MissingCountry,
            },
        ]
    );
}

#[test]
fn unrequested_entry_with_unknown_label_is_skipped() {
    let xml = response(&[
        entry("DE", "DEFAULT", "19.0", "2024-01-01"),
        entry("FR", "INTERMEDIATE", "10", "2024-01-01"),
    ]);
    let q = query().with_member_states(vec!["DE".into()]);
    let outcome = map_with_report(&raw(q, &xml)).unwrap();

    assert_eq!(outcome.dataset.rates.len(), 1);
    assert_eq!(outcome.dataset.rates[0].country_code, "DE");
    assert_eq!(
        outcome.skipped,
        [SkippedEntry {
            index: 1,
            country: Some("FR".into()),
            reason: SkipReason::OutsideFilter("FR".into()),
        }]
    );
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn de_with_invalid_country_and_filter() {
    let xml = response(&[
        entry("DE", "DEFAULT", "19.0", "2024-01-01"),
        entry("XX", "DEFAULT", "5.0", "2024-01-01"),
    ]);
    let q = query().with_member_states(vec!["DE".into()]);
    let dataset = map_tedb_to_unified(&raw(q, &xml)).unwrap();
    assert_eq!(
        dataset.rates,
        [VatRate {
            country_code: "DE".into(),
            category: RateCategory::Standard,
            rate: dec!(19.0),
            situation_on: date(2024, 1, 1),
            goods_category: None,
            comment: None,
        }]
    );
}

#[test]
fn empty_response_is_an_empty_dataset() {
    let dataset = map_tedb_to_unified(&raw(query(), &response(&[]))).unwrap();
    assert!(dataset.rates.is_empty());
}

#[test]
fn bare_response_message_is_accepted() {
    let xml = format!(
        "<retrieveVatRatesRespMsg>{}</retrieveVatRatesRespMsg>",
        entry("DE", "DEFAULT", "19", "2024-01-01")
    );
    let dataset = map_tedb_to_unified(&raw(query(), &xml)).unwrap();
    assert_eq!(dataset.rates.len(), 1);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn missing_response_message_fails() {
    let err = map_tedb_to_unified(&raw(
        query(),
        "<soap:Envelope xmlns:soap=\"urn:s\"><soap:Body/></soap:Envelope>",
    ))
    .unwrap_err();
    assert_eq!(
        err,
        MappingError::MissingSection {
            section: "retrieveVatRatesRespMsg"
        }
    );
    assert_eq!(
        err.to_string(),
        "missing section 'retrieveVatRatesRespMsg' in TEDB response"
    );
}

#[test]
fn unknown_rate_type_fails_loudly() {
    let xml = response(&[
        entry("DE", "DEFAULT", "19", "2024-01-01"),
        entry("DE", "INTERMEDIATE_RATE", "13", "2024-01-01"),
    ]);
    let err = map_tedb_to_unified(&raw(query(), &xml)).unwrap_err();
    assert_eq!(
        err,
        MappingError::UnknownLabel {
            field: "rate/type",
            value: "INTERMEDIATE_RATE".into(),
            entry: 1,
        }
    );
}

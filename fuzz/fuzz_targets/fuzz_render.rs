#![no_main]

use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;
use vatkit::tedb::{RatesQuery, RawDocument};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let (Some(from), Some(to)) = (
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 3, 31),
        ) else {
            return;
        };
        // Map → JSON → parse must round-trip whatever the mapper accepts.
        let Ok(raw) = RawDocument::from_xml(RatesQuery::new(from, to), s) else {
            return;
        };
        let Ok(dataset) = vatkit::mapper::map_tedb_to_unified(&raw) else {
            return;
        };
        let _ = vatkit::render::render_markdown(&dataset);
        if let Ok(json) = vatkit::render::to_json_string(&dataset) {
            let back: vatkit::core::VatDataset =
                serde_json::from_str(&json).expect("dataset JSON must parse back");
            assert_eq!(back, dataset);
        }
    }
});

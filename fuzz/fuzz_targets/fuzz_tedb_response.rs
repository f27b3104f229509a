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
        // Must not panic: errors are fine, panics are bugs.
        if let Ok(raw) = RawDocument::from_xml(RatesQuery::new(from, to), s) {
            let _ = vatkit::mapper::map_with_report(&raw);
        }
    }
});

use std::path::Path;

use tracing::debug;

use super::write_atomic;
use crate::core::{
    GoodsCategory, OutputKind, RenderError, VatDataset, VatRate, member_state_name,
};

const TITLE: &str = "EU VAT rates and categories";
const TABLE_HEADER: &str = "| Country | Category | Rate (%) | Situation date | Goods category |\n\
                            |---|---|---|---|---|\n";

/// Render the dataset as a Markdown report.
///
/// The table has exactly one row per rate, in dataset order. An empty
/// dataset renders the header without rows.
pub fn render_markdown(dataset: &VatDataset) -> String {
    let source = &dataset.source;
    let states = if source.member_states.is_empty() {
        "all".to_string()
    } else {
        source.member_states.join(", ")
    };

    let mut out = String::new();
    out.push_str(&format!("# {TITLE}\n\n"));
    out.push_str(&format!("- Snapshot: {}\n", dataset.snapshot));
    out.push_str(&format!(
        "- Source: {}, {} to {}\n",
        source.service, source.window_from, source.window_to
    ));
    out.push_str(&format!("- Member states: {states}\n"));
    out.push_str(&format!("- Records: {}\n\n", dataset.rates.len()));
    out.push_str(TABLE_HEADER);
    for rate in &dataset.rates {
        push_row(&mut out, rate);
    }
    out
}

fn push_row(out: &mut String, rate: &VatRate) {
    let country = match member_state_name(&rate.country_code) {
        Some(name) => format!("{} ({name})", rate.country_code),
        None => rate.country_code.clone(),
    };
    let goods = match &rate.goods_category {
        Some(GoodsCategory {
            identifier,
            description: Some(description),
        }) => format!("{description} ({identifier})"),
        Some(GoodsCategory { identifier, .. }) => identifier.clone(),
        None => String::new(),
    };

    out.push_str(&format!(
        "| {} | {} | {} | {} | {} |\n",
        cell(&country),
        rate.category.label(),
        rate.rate,
        rate.situation_on,
        cell(&goods)
    ));
}

/// Escape pipes and flatten line breaks so a value stays in its cell.
fn cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace(['\r', '\n'], " ")
        .trim()
        .to_string()
}

/// Write the report to `path`, replacing any previous file.
pub fn write_markdown(dataset: &VatDataset, path: &Path) -> Result<(), RenderError> {
    let body = render_markdown(dataset);
    write_atomic(path, body.as_bytes())
        .map_err(|e| RenderError::new(OutputKind::Markdown, path, e))?;
    debug!(path = %path.display(), rows = dataset.rates.len(), "wrote Markdown report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_escapes_pipes_and_newlines() {
        assert_eq!(cell("a|b"), "a\\|b");
        assert_eq!(cell("line one\nline two"), "line one line two");
        assert_eq!(cell(" padded "), "padded");
    }

    #[test]
    fn goods_cell_always_names_the_identifier() {
        let mut rate = VatRate {
            country_code: "IT".into(),
            category: crate::core::RateCategory::Reduced,
            rate: rust_decimal::Decimal::new(10, 0),
            situation_on: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            goods_category: None,
            comment: None,
        };
        let row = |rate: &VatRate| {
            let mut out = String::new();
            push_row(&mut out, rate);
            out
        };
        assert_eq!(row(&rate), "| IT (Italy) | Reduced | 10 | 2024-01-01 |  |\n");

        rate.goods_category = Some(GoodsCategory {
            identifier: "HOTEL_ACCOMMODATION".into(),
            description: Some("Accommodation".into()),
        });
        let hotels = row(&rate);
        rate.goods_category = Some(GoodsCategory {
            identifier: "HOLIDAY_ACCOMMODATION".into(),
            description: Some("Accommodation".into()),
        });
        let holidays = row(&rate);
        assert_ne!(hotels, holidays);
        assert!(hotels.ends_with("| Accommodation (HOTEL_ACCOMMODATION) |\n"));

        rate.goods_category = Some(GoodsCategory {
            identifier: "BOOKS".into(),
            description: None,
        });
        assert!(row(&rate).ends_with("| BOOKS |\n"));
    }

    #[test]
    fn header_has_five_columns() {
        let first = TABLE_HEADER.lines().next().unwrap();
        assert_eq!(first.matches('|').count(), 6);
        let rule = TABLE_HEADER.lines().nth(1).unwrap();
        assert_eq!(rule, "|---|---|---|---|---|");
    }
}

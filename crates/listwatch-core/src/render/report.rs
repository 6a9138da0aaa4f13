//! Change report renderer.
//!
//! Layout:
//!
//! ```text
//! 新申請
//!
//! 公司代號: 2330
//! 申請日期: 20240115
//!
//! 最近更新
//!
//! 公司代號: 1101
//! 進度: 核准 (更新)
//!
//! ```
//!
//! Sections appear in fixed order and only when non-empty. Absent values
//! are skipped; the output has no markup and uses `\n` line breaks.

use crate::diff::model::ListingDiff;
use crate::model::{Market, Record};

/// Header line of the new-applications section
pub const NEW_SECTION_HEADER: &str = "新申請";
/// Header line of the recent-updates section
pub const UPDATED_SECTION_HEADER: &str = "最近更新";

fn render_record(out: &mut String, record: &Record) {
    for cell in record.cells() {
        if let Some(value) = &cell.value {
            out.push_str(&cell.column);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
    }
    out.push('\n');
}

fn render_section(out: &mut String, header: &str, records: Option<&[Record]>) {
    let Some(records) = records else {
        return;
    };
    out.push_str(header);
    out.push_str("\n\n");
    for record in records {
        render_record(out, record);
    }
}

/// Render the new and updated sections of a diff.
///
/// Returns an empty string for an empty diff.
pub fn render_report(diff: &ListingDiff) -> String {
    let mut out = String::new();
    render_section(&mut out, NEW_SECTION_HEADER, diff.new.as_deref());
    render_section(&mut out, UPDATED_SECTION_HEADER, diff.updated.as_deref());
    out
}

/// Render the report as delivered to the notifier: the market label on
/// its own line followed by [`render_report`].
pub fn render_market_report(market: Market, diff: &ListingDiff) -> String {
    format!("{}\n{}", market.label(), render_report(diff))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;

    fn record(uid: &str, cells: &[(&str, Option<&str>)]) -> Record {
        Record::new(
            uid,
            cells
                .iter()
                .map(|(c, v)| Cell::new(*c, v.map(str::to_string)))
                .collect(),
        )
    }

    #[test]
    fn test_empty_diff_renders_nothing() {
        assert_eq!(render_report(&ListingDiff::empty(Market::Twse)), "");
    }

    #[test]
    fn test_new_then_updated_layout() {
        let diff = ListingDiff {
            market: Market::Twse,
            new: Some(vec![record(
                "2330-20240115",
                &[("公司代號", Some("2330")), ("備註", None)],
            )]),
            updated: Some(vec![record(
                "1101-20240101",
                &[("公司代號", Some("1101")), ("進度", Some("核准 (更新)"))],
            )]),
            changes: Vec::new(),
        };

        assert_eq!(
            render_report(&diff),
            "新申請\n\n公司代號: 2330\n\n最近更新\n\n公司代號: 1101\n進度: 核准 (更新)\n\n"
        );
    }

    #[test]
    fn test_only_updated_section() {
        let diff = ListingDiff {
            market: Market::Tpex,
            new: None,
            updated: Some(vec![record("a-1", &[("x", Some("1"))])]),
            changes: Vec::new(),
        };
        let text = render_report(&diff);
        assert!(!text.contains(NEW_SECTION_HEADER));
        assert!(text.starts_with(UPDATED_SECTION_HEADER));
    }

    #[test]
    fn test_market_report_has_label_line() {
        let diff = ListingDiff {
            market: Market::Tpex,
            new: Some(vec![record("a-1", &[("x", Some("1"))])]),
            updated: None,
            changes: Vec::new(),
        };
        assert_eq!(
            render_market_report(Market::Tpex, &diff),
            "TPEX\n新申請\n\nx: 1\n\n"
        );
    }
}

//! Human-readable rendering of warnings.
//!
//! Code columns are translated with three lookup functions that fall back to
//! the raw code, so a warning type added upstream still shows up (as its
//! code) instead of being dropped.

use crate::model::WarningRecord;
use crate::regions::Region;

/// First line of every aggregate message.
pub const AGGREGATE_HEADER: &str = "🌤️ **실시간 기상 특보 정보** (최근 1시간)";

// ---------------------------------------------------------------------------
// Code tables
// ---------------------------------------------------------------------------

/// Label for a `WRN` warning-type code.
pub fn warning_type_label(code: &str) -> &str {
    match code {
        "W" => "강풍",
        "R" => "호우",
        "C" => "한파",
        "D" => "건조",
        "O" => "해일",
        "N" => "지진해일",
        "V" => "풍랑",
        "T" => "태풍",
        "S" => "대설",
        "Y" => "황사",
        "H" => "폭염",
        "F" => "안개",
        other => other,
    }
}

/// Label for an `LVL` level code.
pub fn level_label(code: &str) -> &str {
    match code {
        "1" => "예비",
        "2" => "주의보",
        "3" => "경보",
        other => other,
    }
}

/// Label for a `CMD` command code.
pub fn command_label(code: &str) -> &str {
    match code {
        "1" => "발표",
        "2" => "대치",
        "3" => "해제",
        "4" => "대치해제(자동)",
        "5" => "연장",
        "6" => "변경",
        "7" => "변경해제",
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Region outcome
// ---------------------------------------------------------------------------

/// What one region contributed to a tick.
///
/// Only [`RegionReport::Warnings`] is deliverable; the other variants are
/// logged and left out of the aggregate message.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionReport {
    /// Formatted text of the region's new warnings.
    Warnings { region: Region, text: String },
    /// The response parsed but contained nothing new.
    NoWarnings { region: Region },
    /// The feed answered with an empty body.
    EmptyResponse { region: Region },
    /// The fetch failed.
    FetchError { region: Region, reason: String },
}

impl RegionReport {
    pub fn region(&self) -> Region {
        match self {
            RegionReport::Warnings { region, .. }
            | RegionReport::NoWarnings { region }
            | RegionReport::EmptyResponse { region }
            | RegionReport::FetchError { region, .. } => *region,
        }
    }

    pub fn is_deliverable(&self) -> bool {
        matches!(self, RegionReport::Warnings { .. })
    }

    /// The `📍 **name**` block for the aggregate message, if deliverable.
    pub fn block(&self) -> Option<String> {
        match self {
            RegionReport::Warnings { region, text } => {
                Some(format!("📍 **{}**\n{}", region.name(), text))
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for RegionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionReport::Warnings { text, .. } => f.write_str(text),
            RegionReport::NoWarnings { region } => {
                write!(f, "지역 {}에 현재 발표된 특보가 없습니다.", region)
            }
            RegionReport::EmptyResponse { region } => {
                write!(f, "지역 {} 특보 API 응답이 비어있습니다.", region)
            }
            RegionReport::FetchError { region, reason } => {
                write!(f, "지역 {} 기상특보 API 오류: {}", region, reason)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Renders one record as the four-line warning template.
pub fn format_record(region: Region, record: &WarningRecord) -> String {
    format!(
        "[지역 {}] {} {} ({})\n\
         발표시각: {} / 발효시각: {}\n\
         구역코드: {} / 관서: {} / 등급: {}\n\
         작업상태: {} / 통보문: {}",
        region,
        warning_type_label(&record.wrn),
        level_label(&record.lvl),
        command_label(&record.cmd),
        record.tm_fc,
        record.tm_ef,
        record.reg_id,
        record.stn,
        record.grd,
        record.cnt,
        record.rpt,
    )
}

/// Builds the report for a region from the records selected for display.
///
/// No records means [`RegionReport::NoWarnings`].
pub fn region_report<'a, I>(region: Region, records: I) -> RegionReport
where
    I: IntoIterator<Item = &'a WarningRecord>,
{
    let rendered: Vec<String> = records
        .into_iter()
        .map(|record| format_record(region, record))
        .collect();

    if rendered.is_empty() {
        RegionReport::NoWarnings { region }
    } else {
        RegionReport::Warnings { region, text: rendered.join("\n\n") }
    }
}

/// Joins the deliverable reports into one message.
///
/// Returns `None` when no report is deliverable; in that case nothing
/// should be sent.
pub fn aggregate_message(reports: &[RegionReport]) -> Option<String> {
    let blocks: Vec<String> = reports.iter().filter_map(RegionReport::block).collect();
    if blocks.is_empty() {
        return None;
    }
    Some(format!("{}\n\n{}", AGGREGATE_HEADER, blocks.join("\n\n")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::kma::parse_line;

    fn region(code: u8) -> Region {
        Region::new(code).unwrap()
    }

    fn example_record() -> WarningRecord {
        parse_line("202401010000,202401010100,202401010000,108,L1010000,W,2,1,0,0,RPT=")
            .expect("example line should parse")
    }

    // --- Code tables ---------------------------------------------------------

    #[test]
    fn test_known_codes_map_to_labels() {
        assert_eq!(warning_type_label("W"), "강풍");
        assert_eq!(warning_type_label("H"), "폭염");
        assert_eq!(level_label("3"), "경보");
        assert_eq!(command_label("4"), "대치해제(자동)");
    }

    #[test]
    fn test_unknown_codes_fall_back_to_raw_code() {
        assert_eq!(warning_type_label("Q"), "Q");
        assert_eq!(level_label("9"), "9");
        assert_eq!(command_label(""), "");
    }

    // --- Record template -----------------------------------------------------

    #[test]
    fn test_example_record_formats_with_labels() {
        let text = format_record(region(1), &example_record());
        assert!(text.contains("강풍"), "warning type label missing: {}", text);
        assert!(text.contains("주의보"), "level label missing: {}", text);
        assert!(text.contains("발표"), "command label missing: {}", text);
    }

    #[test]
    fn test_record_template_layout() {
        let text = format_record(region(1), &example_record());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "[지역 1] 강풍 주의보 (발표)",
                "발표시각: 202401010000 / 발효시각: 202401010100",
                "구역코드: L1010000 / 관서: 108 / 등급: 0",
                "작업상태: 0 / 통보문: RPT",
            ]
        );
    }

    #[test]
    fn test_unknown_type_is_rendered_raw() {
        let mut record = example_record();
        record.wrn = "Z".to_string();
        let text = format_record(region(0), &record);
        assert!(text.starts_with("[지역 0] Z 주의보 (발표)"), "got: {}", text);
    }

    // --- Region reports -------------------------------------------------------

    #[test]
    fn test_region_report_without_records_is_no_warnings() {
        let report = region_report(region(4), std::iter::empty::<&WarningRecord>());
        assert_eq!(report, RegionReport::NoWarnings { region: region(4) });
        assert!(!report.is_deliverable());
        assert_eq!(report.to_string(), "지역 4에 현재 발표된 특보가 없습니다.");
    }

    #[test]
    fn test_region_report_joins_records_with_blank_line() {
        let a = example_record();
        let mut b = example_record();
        b.wrn = "R".to_string();
        let report = region_report(region(1), [&a, &b]);

        let RegionReport::Warnings { text, .. } = &report else {
            panic!("expected warnings, got {:?}", report);
        };
        assert_eq!(text.matches("\n\n").count(), 1, "two records, one separator");
        assert!(text.contains("강풍") && text.contains("호우"));
    }

    #[test]
    fn test_sentinels_are_distinct() {
        let r = region(2);
        let empty = RegionReport::EmptyResponse { region: r }.to_string();
        let none = RegionReport::NoWarnings { region: r }.to_string();
        let error = RegionReport::FetchError { region: r, reason: "timed out".into() }.to_string();

        assert_eq!(empty, "지역 2 특보 API 응답이 비어있습니다.");
        assert_eq!(error, "지역 2 기상특보 API 오류: timed out");
        assert_ne!(empty, none);
        assert_ne!(none, error);
    }

    // --- Aggregate -------------------------------------------------------------

    #[test]
    fn test_aggregate_skips_non_deliverable_reports() {
        let reports = vec![
            RegionReport::EmptyResponse { region: region(0) },
            RegionReport::Warnings { region: region(1), text: "W1".into() },
            RegionReport::FetchError { region: region(2), reason: "boom".into() },
            RegionReport::NoWarnings { region: region(3) },
            RegionReport::Warnings { region: region(9), text: "W9".into() },
        ];

        let message = aggregate_message(&reports).expect("two regions have content");
        assert_eq!(
            message,
            format!("{}\n\n📍 **서울/경기**\nW1\n\n📍 **제주**\nW9", AGGREGATE_HEADER)
        );
        assert!(!message.contains("boom"), "errors must never be delivered");
    }

    #[test]
    fn test_aggregate_is_none_when_nothing_deliverable() {
        let reports: Vec<RegionReport> = Region::all()
            .map(|region| match region.code() % 3 {
                0 => RegionReport::EmptyResponse { region },
                1 => RegionReport::NoWarnings { region },
                _ => RegionReport::FetchError { region, reason: "x".into() },
            })
            .collect();
        assert!(aggregate_message(&reports).is_none());
    }
}

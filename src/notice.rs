//! Purpose: Define a stable, structured schema for non-fatal stderr notices.
//! Exports: `Notice`, `notice_json`, `degrade_notice`.
//! Role: Shared contract helper for CLI diagnostics (defaulted fields, fallback layouts).
//! Invariants: Notices are non-fatal and never alter stdout payloads.
//! Invariants: JSON schema is stable once published; fields are additive-only.
use serde_json::{Map, Value, json};

use crate::feed::report::ImportReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: String,
    pub time: String,
    pub cmd: String,
    pub feed: String,
    pub message: String,
    pub details: Map<String, Value>,
}

pub fn notice_json(notice: &Notice) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(notice.kind));
    inner.insert("time".to_string(), json!(notice.time));
    inner.insert("cmd".to_string(), json!(notice.cmd));
    inner.insert("feed".to_string(), json!(notice.feed));
    inner.insert("message".to_string(), json!(notice.message));
    inner.insert("details".to_string(), Value::Object(notice.details.clone()));

    let mut outer = Map::new();
    outer.insert("notice".to_string(), Value::Object(inner));
    Value::Object(outer)
}

/// Summarizes defaulted fields of a run; `None` when the report is clean.
pub fn degrade_notice(
    report: &ImportReport,
    cmd: &str,
    feed: &str,
    time: String,
) -> Option<Notice> {
    if report.is_clean() {
        return None;
    }
    let mut details = Map::new();
    details.insert("field_warnings".to_string(), json!(report.field_warnings));
    details.insert("url_degrades".to_string(), json!(report.url_degrades));
    let per_field: Map<String, Value> = report
        .per_field
        .iter()
        .map(|(field, count)| (field.name().to_string(), json!(count)))
        .collect();
    details.insert("per_field".to_string(), Value::Object(per_field));
    Some(Notice {
        kind: "degraded".to_string(),
        time,
        cmd: cmd.to_string(),
        feed: feed.to_string(),
        message: format!(
            "{} fields left at defaults across {} entries",
            report.issue_count(),
            report.entries
        ),
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::{Notice, degrade_notice, notice_json};
    use crate::feed::layout::Field;
    use crate::feed::record::FieldIssue;
    use crate::feed::report::{ImportReport, IssueKind};
    use serde_json::{Map, Value};

    #[test]
    fn notice_json_has_required_fields() {
        let mut details = Map::new();
        details.insert("url_degrades".to_string(), Value::from(3));

        let notice = Notice {
            kind: "degraded".to_string(),
            time: "2026-02-01T00:00:00Z".to_string(),
            cmd: "import".to_string(),
            feed: "filme.json".to_string(),
            message: "3 fields left at defaults across 10 entries".to_string(),
            details,
        };

        let value = notice_json(&notice);
        let obj = value
            .get("notice")
            .and_then(|v| v.as_object())
            .expect("notice object");

        assert_eq!(obj.get("kind").and_then(|v| v.as_str()), Some("degraded"));
        assert_eq!(
            obj.get("time").and_then(|v| v.as_str()),
            Some("2026-02-01T00:00:00Z")
        );
        assert_eq!(obj.get("cmd").and_then(|v| v.as_str()), Some("import"));
        assert_eq!(obj.get("feed").and_then(|v| v.as_str()), Some("filme.json"));
        assert!(obj.get("details").and_then(|v| v.as_object()).is_some());
    }

    #[test]
    fn clean_reports_produce_no_notice() {
        let report = ImportReport::new(10, 32);
        assert!(degrade_notice(&report, "import", "-", String::new()).is_none());

        let mut report = ImportReport::new(10, 32);
        report.record_entry(
            1,
            0,
            vec![FieldIssue {
                field: Field::Size,
                kind: IssueKind::FieldDecodeWarning,
                raw: "?".to_string(),
            }],
        );
        let notice = degrade_notice(&report, "import", "-", String::new()).expect("notice");
        assert_eq!(notice.details["per_field"]["size"], 1);
    }
}

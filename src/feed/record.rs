//! Purpose: Decode one sliced entry into a typed `MovieRecord`.
//! Exports: `MovieRecord`, `BuiltRecord`, `FieldIssue`, `FieldOutcome`, `build_record`, `build_from_values`, `resolve_url`.
//! Role: Third pass; applies the offset table, lenient coercions and URL reconstruction.
//! Invariants: Only array decoding can fail the record; field problems degrade to defaults.
//! Invariants: Derived URLs never reference characters outside the canonical URL.

use std::borrow::Cow;

use serde_json::Value;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use super::layout::{Field, FieldLayout};
use super::report::IssueKind;
use super::slice::RawEntry;
use crate::core::error::Error;
use crate::json::parse;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MovieRecord {
    pub channel: String,
    pub channel_id: Option<u64>,
    pub topic: String,
    pub topic_id: Option<u64>,
    pub title: String,
    pub published_at: Option<OffsetDateTime>,
    /// `HH:MM:SS` as published.
    pub duration: String,
    pub size: u64,
    pub description: String,
    pub url: String,
    pub website_url: String,
    pub subtitle_url: String,
    pub small_format_url: String,
    pub hd_format_url: String,
    pub unix_date: u64,
    pub history_url: String,
    pub geo: String,
    pub is_new: bool,
}

impl MovieRecord {
    /// Duration in seconds, `None` unless it reads as a clock time `H:MM:SS`.
    pub fn duration_secs(&self) -> Option<u64> {
        let clock = Time::parse(
            self.duration.trim(),
            format_description!("[hour padding:none]:[minute]:[second]"),
        )
        .ok()?;
        let (hours, minutes, seconds) = clock.as_hms();
        Some(u64::from(hours) * 3600 + u64::from(minutes) * 60 + u64::from(seconds))
    }
}

/// Result of coercing one raw slot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldOutcome<T> {
    Parsed(T),
    /// Slot missing or empty; nothing to report.
    Absent,
    /// Slot present but unusable; the field falls back to its default.
    Degraded,
}

impl<T> FieldOutcome<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Absent | Self::Degraded => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldIssue {
    pub field: Field,
    pub kind: IssueKind,
    pub raw: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BuiltRecord {
    pub record: MovieRecord,
    pub issues: Vec<FieldIssue>,
}

pub fn build_record(entry: &RawEntry<'_>, layout: &FieldLayout) -> Result<BuiltRecord, Error> {
    let values: Vec<Value> = parse::from_str(entry.text).map_err(|err| {
        let hint = parse::hint_for_error(&err, "movie entry");
        Error::format("movie entry is not a valid array literal")
            .with_offset(entry.offset as u64)
            .with_hint(hint)
            .with_source(err)
    })?;
    Ok(build_from_values(&values, layout))
}

pub fn build_from_values(values: &[Value], layout: &FieldLayout) -> BuiltRecord {
    let mut builder = Builder {
        values,
        layout,
        issues: Vec::new(),
    };

    let url = builder.text(Field::Url);
    let date = builder.text(Field::Date);
    let time = builder.text(Field::Time);
    let (culprit, raw) = if parses_as_day(&date) {
        (Field::Time, time.clone())
    } else {
        (Field::Date, format!("{date} {time}").trim().to_string())
    };
    let published_at = builder.settle(culprit, &raw, parse_published_at(&date, &time));

    let record = MovieRecord {
        channel: builder.text(Field::Channel),
        channel_id: None,
        topic: builder.text(Field::Topic),
        topic_id: None,
        title: builder.text(Field::Title),
        published_at,
        duration: builder.text(Field::Duration),
        size: builder.coerce(Field::Size, parse_u64).unwrap_or_default(),
        description: builder.text(Field::Description),
        website_url: builder.text(Field::WebsiteUrl),
        subtitle_url: builder.derived_url(Field::SubtitleUrl, &url),
        small_format_url: builder.derived_url(Field::SmallFormatUrl, &url),
        hd_format_url: builder.derived_url(Field::HdFormatUrl, &url),
        unix_date: builder.coerce(Field::UnixDate, parse_u64).unwrap_or_default(),
        history_url: builder.derived_url(Field::HistoryUrl, &url),
        geo: builder.text(Field::Geo),
        is_new: builder.coerce(Field::IsNew, parse_bool).unwrap_or_default(),
        url,
    };

    BuiltRecord {
        record,
        issues: builder.issues,
    }
}

struct Builder<'a> {
    values: &'a [Value],
    layout: &'a FieldLayout,
    issues: Vec<FieldIssue>,
}

impl Builder<'_> {
    /// Trimmed text of a slot; missing slots read as empty.
    fn text(&mut self, field: Field) -> String {
        let values = self.values;
        let Some(value) = values.get(self.layout.position(field)) else {
            return String::new();
        };
        match value_text(value) {
            Some(text) => text.trim().to_string(),
            None => {
                self.issue(field, IssueKind::FieldDecodeWarning, value.to_string());
                String::new()
            }
        }
    }

    fn coerce<T>(&mut self, field: Field, parse: fn(&str) -> FieldOutcome<T>) -> Option<T> {
        let raw = self.text(field);
        let outcome = parse(&raw);
        self.settle(field, &raw, outcome)
    }

    fn settle<T>(&mut self, field: Field, raw: &str, outcome: FieldOutcome<T>) -> Option<T> {
        if matches!(outcome, FieldOutcome::Degraded) {
            self.issue(field, IssueKind::FieldDecodeWarning, raw.to_string());
        }
        outcome.into_option()
    }

    fn derived_url(&mut self, field: Field, base: &str) -> String {
        let raw = self.text(field);
        let outcome = resolve_url(base, &raw);
        if matches!(outcome, FieldOutcome::Degraded) {
            self.issue(field, IssueKind::UrlDecodeDegrade, raw);
        }
        outcome.into_option().unwrap_or_default()
    }

    fn issue(&mut self, field: Field, kind: IssueKind, raw: String) {
        self.issues.push(FieldIssue { field, kind, raw });
    }
}

/// Textual form of a scalar slot. Arrays and objects have none.
pub(crate) fn value_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) => Some(Cow::Borrowed(text.as_str())),
        Value::Number(number) => Some(Cow::Owned(number.to_string())),
        Value::Bool(flag) => Some(Cow::Owned(flag.to_string())),
        Value::Null => Some(Cow::Borrowed("")),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_u64(raw: &str) -> FieldOutcome<u64> {
    if raw.is_empty() {
        return FieldOutcome::Absent;
    }
    raw.parse().map_or(FieldOutcome::Degraded, FieldOutcome::Parsed)
}

fn parse_bool(raw: &str) -> FieldOutcome<bool> {
    match raw {
        "" => FieldOutcome::Absent,
        "1" | "t" | "T" | "TRUE" | "true" | "True" => FieldOutcome::Parsed(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => FieldOutcome::Parsed(false),
        _ => FieldOutcome::Degraded,
    }
}

fn parse_published_at(date: &str, time: &str) -> FieldOutcome<OffsetDateTime> {
    if date.is_empty() && time.is_empty() {
        return FieldOutcome::Absent;
    }
    let text = format!("{date} {time}");
    let with_seconds = format_description!("[day].[month].[year] [hour]:[minute]:[second]");
    let without_seconds = format_description!("[day].[month].[year] [hour]:[minute]");
    PrimitiveDateTime::parse(&text, with_seconds)
        .or_else(|_| PrimitiveDateTime::parse(&text, without_seconds))
        .map_or(FieldOutcome::Degraded, |parsed| {
            FieldOutcome::Parsed(parsed.assume_utc())
        })
}

fn parses_as_day(date: &str) -> bool {
    Date::parse(date, format_description!("[day].[month].[year]")).is_ok()
}

/// Rebuilds a derived URL from `<chars>|<suffix>` against the canonical URL.
///
/// Codes without `|` are complete URLs. A prefix length that does not parse or
/// reaches past the canonical URL degrades the field to empty.
pub fn resolve_url(base: &str, code: &str) -> FieldOutcome<String> {
    let code = code.trim();
    if code.is_empty() {
        return FieldOutcome::Absent;
    }
    let Some((prefix_len, suffix)) = code.split_once('|') else {
        return FieldOutcome::Parsed(code.to_string());
    };
    let Ok(prefix_len) = prefix_len.trim().parse::<usize>() else {
        return FieldOutcome::Degraded;
    };
    match base.char_indices().nth(prefix_len) {
        Some((end, _)) => FieldOutcome::Parsed(format!("{}{suffix}", &base[..end])),
        None => FieldOutcome::Degraded,
    }
}

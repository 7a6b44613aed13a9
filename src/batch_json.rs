//! Purpose: Shared JSON serializers for import batches, used by the CLI and the JSONL loader.
//! Exports: `metadata_json`, `movie_json`, `id_entry_json`, `report_json`, `summary_json`.
//! Role: Keep row and summary envelope shapes consistent across entry points.
//! Invariants: Stable key names for v0 payloads; timestamps are RFC 3339 in UTC.
//! Invariants: Optional values are emitted as `null`, never omitted, in row payloads.

use serde_json::{Map, Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::feed::import::ImportBatch;
use crate::feed::metadata::FeedMetadata;
use crate::feed::normalize::IdEntry;
use crate::feed::record::MovieRecord;
use crate::feed::report::ImportReport;

fn timestamp_json(ts: OffsetDateTime) -> Value {
    ts.format(&Rfc3339).map_or(Value::Null, Value::String)
}

pub fn metadata_json(metadata: &FeedMetadata) -> Value {
    json!({
        "published_at": timestamp_json(metadata.published_at),
        "version": metadata.version,
        "fingerprint": metadata.fingerprint,
    })
}

pub fn id_entry_json(entry: &IdEntry) -> Value {
    json!({ "id": entry.id, "name": entry.name })
}

pub fn movie_json(movie: &MovieRecord) -> Value {
    let mut map = Map::new();
    map.insert("channel".to_string(), json!(movie.channel));
    map.insert("channel_id".to_string(), json!(movie.channel_id));
    map.insert("topic".to_string(), json!(movie.topic));
    map.insert("topic_id".to_string(), json!(movie.topic_id));
    map.insert("title".to_string(), json!(movie.title));
    map.insert(
        "published_at".to_string(),
        movie.published_at.map_or(Value::Null, timestamp_json),
    );
    map.insert("duration".to_string(), json!(movie.duration));
    map.insert("duration_secs".to_string(), json!(movie.duration_secs()));
    map.insert("size".to_string(), json!(movie.size));
    map.insert("description".to_string(), json!(movie.description));
    map.insert("url".to_string(), json!(movie.url));
    map.insert("website_url".to_string(), json!(movie.website_url));
    map.insert("subtitle_url".to_string(), json!(movie.subtitle_url));
    map.insert("small_format_url".to_string(), json!(movie.small_format_url));
    map.insert("hd_format_url".to_string(), json!(movie.hd_format_url));
    map.insert("unix_date".to_string(), json!(movie.unix_date));
    map.insert("history_url".to_string(), json!(movie.history_url));
    map.insert("geo".to_string(), json!(movie.geo));
    map.insert("is_new".to_string(), json!(movie.is_new));
    Value::Object(map)
}

pub fn report_json(report: &ImportReport) -> Value {
    let per_field: Map<String, Value> = report
        .per_field
        .iter()
        .map(|(field, count)| (field.name().to_string(), json!(count)))
        .collect();
    let issues: Vec<Value> = report
        .issues
        .iter()
        .map(|issue| {
            json!({
                "entry": issue.entry,
                "offset": issue.offset,
                "field": issue.field.name(),
                "kind": issue.kind.label(),
                "snippet": issue.snippet,
            })
        })
        .collect();
    json!({
        "entries": report.entries,
        "field_warnings": report.field_warnings,
        "url_degrades": report.url_degrades,
        "per_field": per_field,
        "issues": issues,
        "dropped_issues": report.dropped_issues(),
    })
}

pub fn summary_json(batch: &ImportBatch) -> Value {
    json!({
        "metadata": metadata_json(&batch.metadata),
        "movies": batch.movies.len(),
        "channels": {
            "total": batch.channels.len(),
            "new": batch.channels.new_entries().count(),
        },
        "topics": {
            "total": batch.topics.len(),
            "new": batch.topics.new_entries().count(),
        },
        "report": report_json(&batch.report),
    })
}

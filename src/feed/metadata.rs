//! Purpose: Validate the feed header and decode it into `FeedMetadata`.
//! Exports: `FeedMetadata`, `decode_metadata`, `metadata_from_values`, `locate_header`.
//! Role: Gate run once per import before any movie entry is decoded.
//! Invariants: A returned `FeedMetadata` has a parsed timestamp and non-empty version and fingerprint.
//! Invariants: The header section ends at the second header key, else at the first entry, else at document end.

use serde_json::Value;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use super::record::value_text;
use super::scan::boundaries;
use super::slice::{RawEntry, slice_section};
use crate::core::error::Error;
use crate::json::parse;

const MIN_FIELDS: usize = 5;
const PUBLISHED_AT: usize = 1;
const VERSION: usize = 2;
const FINGERPRINT: usize = 4;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeedMetadata {
    /// Publication time of the list, UTC.
    pub published_at: OffsetDateTime,
    pub version: String,
    /// Content hash the publisher computes over the list.
    pub fingerprint: String,
}

pub fn locate_header<'a>(
    document: &'a str,
    header_key: &str,
    entry_key: &str,
) -> Result<RawEntry<'a>, Error> {
    let mut headers = boundaries(document, header_key);
    let start = headers.next().ok_or_else(|| {
        Error::format("movie list header not found")
            .with_hint("The input does not look like a movie list feed.")
    })?;
    let end = headers
        .next()
        .or_else(|| boundaries(document, entry_key).find(|offset| *offset > start))
        .unwrap_or(document.len());
    slice_section(document, header_key, start, end)
}

pub fn decode_metadata(
    document: &str,
    header_key: &str,
    entry_key: &str,
) -> Result<FeedMetadata, Error> {
    let header = locate_header(document, header_key, entry_key)?;
    let values: Vec<Value> = parse::from_str(header.text).map_err(|err| {
        let hint = parse::hint_for_error(&err, "movie list header");
        Error::format("movie list header is not a valid array literal")
            .with_offset(header.offset as u64)
            .with_hint(hint)
            .with_source(err)
    })?;
    metadata_from_values(&values).map_err(|err| err.with_offset(header.offset as u64))
}

pub fn metadata_from_values(values: &[Value]) -> Result<FeedMetadata, Error> {
    if values.len() < MIN_FIELDS {
        return Err(Error::format(format!(
            "movie list header has {} fields, expected at least {MIN_FIELDS}",
            values.len()
        )));
    }

    let published_at = required_text(values, PUBLISHED_AT, "publication timestamp")?;
    let published_at = PrimitiveDateTime::parse(
        &published_at,
        format_description!("[day].[month].[year], [hour]:[minute]"),
    )
    .map_err(|err| {
        Error::format(format!("invalid publication timestamp {published_at:?}"))
            .with_hint("Expected `DD.MM.YYYY, HH:MM`.")
            .with_source(err)
    })?
    .assume_utc();

    Ok(FeedMetadata {
        published_at,
        version: required_text(values, VERSION, "format version")?,
        fingerprint: required_text(values, FINGERPRINT, "content fingerprint")?,
    })
}

fn required_text(values: &[Value], position: usize, label: &str) -> Result<String, Error> {
    let text = values
        .get(position)
        .and_then(value_text)
        .map(|text| text.trim().to_string())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(Error::format(format!("movie list header has an empty {label}")));
    }
    Ok(text)
}

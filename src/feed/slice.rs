//! Purpose: Cut the document into one parsable array literal per entry boundary.
//! Exports: `RawEntry`, `EntrySlices`, `slice_entries`, `slice_section`.
//! Role: Second pass; strips container punctuation left by the enclosing object.
//! Invariants: Every yielded fragment starts with `[` and ends with `]`.
//! Invariants: Any prefix/suffix violation is a `Format` error; the feed is all-or-nothing.

use std::iter::Peekable;

use super::FEED_WHITESPACE;
use crate::core::error::Error;

/// One undecoded positional value-array and where its key started.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RawEntry<'a> {
    pub offset: usize,
    pub text: &'a str,
}

pub struct EntrySlices<'a, I: Iterator<Item = usize>> {
    document: &'a str,
    key: &'a str,
    offsets: Peekable<I>,
}

/// Pairs each offset with the next one (or document end) and validates the span.
pub fn slice_entries<'a, I>(
    document: &'a str,
    key: &'a str,
    offsets: I,
) -> EntrySlices<'a, I::IntoIter>
where
    I: IntoIterator<Item = usize>,
{
    EntrySlices {
        document,
        key,
        offsets: offsets.into_iter().peekable(),
    }
}

impl<'a, I: Iterator<Item = usize>> Iterator for EntrySlices<'a, I> {
    type Item = Result<RawEntry<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.offsets.next()?;
        let end = self
            .offsets
            .peek()
            .copied()
            .unwrap_or(self.document.len());
        Some(slice_section(self.document, self.key, start, end))
    }
}

/// Validates `document[start..end]` as `<key> : [ ... ]` with optional trailing `}` and `,`.
pub fn slice_section<'a>(
    document: &'a str,
    key: &str,
    start: usize,
    end: usize,
) -> Result<RawEntry<'a>, Error> {
    let span = document
        .get(start..end)
        .ok_or_else(|| Error::format("entry span is out of bounds").with_offset(start as u64))?;
    let body = strip_entry_prefix(span, key).ok_or_else(|| {
        Error::format("entry key is not followed by `:` and `[`").with_offset(start as u64)
    })?;
    let text = strip_entry_suffix(body).ok_or_else(|| {
        Error::format("entry array is not closed by `]`")
            .with_offset(start as u64)
            .with_hint("The movie list is truncated or not a movie list feed.")
    })?;
    Ok(RawEntry {
        offset: start,
        text,
    })
}

fn strip_entry_prefix<'a>(span: &'a str, key: &str) -> Option<&'a str> {
    let rest = span.strip_prefix(key)?.trim_start_matches(FEED_WHITESPACE);
    let rest = rest.strip_prefix(':')?.trim_start_matches(FEED_WHITESPACE);
    rest.starts_with('[').then_some(rest)
}

fn strip_entry_suffix(body: &str) -> Option<&str> {
    let mut rest = body.trim_end_matches(FEED_WHITESPACE);
    // Only the last entry carries the closing brace of the outer object.
    if let Some(stripped) = rest.strip_suffix('}') {
        rest = stripped.trim_end_matches(FEED_WHITESPACE);
    }
    if let Some(stripped) = rest.strip_suffix(',') {
        rest = stripped.trim_end_matches(FEED_WHITESPACE);
    }
    rest.ends_with(']').then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::{RawEntry, slice_entries, slice_section};
    use crate::core::error::ErrorKind;
    use crate::feed::ENTRY_KEY;
    use crate::feed::scan::boundaries;

    fn slices(doc: &str) -> Result<Vec<RawEntry<'_>>, crate::core::error::Error> {
        slice_entries(doc, ENTRY_KEY, boundaries(doc, ENTRY_KEY)).collect()
    }

    #[test]
    fn slices_each_entry_into_an_array_literal() {
        let doc = "{\"X\" : [\"a\", \"b\"],\n\"X\":[\"c\"]\n}\n";
        let entries = slices(doc).expect("slices");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "[\"a\", \"b\"]");
        assert_eq!(entries[0].offset, 1);
        assert_eq!(entries[1].text, "[\"c\"]");
    }

    #[test]
    fn missing_closing_bracket_is_a_format_error() {
        let doc = "{\"X\":[\"a\", \"X\":[\"b\"]}";
        let err = slices(doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.offset(), Some(1));
    }

    #[test]
    fn section_requires_key_colon_and_bracket() {
        let doc = "\"X\" [\"a\"]";
        let err = slice_section(doc, ENTRY_KEY, 0, doc.len()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);

        let doc = "\"X\": \"a\"]";
        assert!(slice_section(doc, ENTRY_KEY, 0, doc.len()).is_err());
    }

    #[test]
    fn brace_and_comma_are_each_stripped_once() {
        let doc = "\"X\":[\"a\"] , }";
        let entry = slice_section(doc, ENTRY_KEY, 0, doc.len()).expect("entry");
        assert_eq!(entry.text, "[\"a\"]");

        let doc = "\"X\":[\"a\"],,";
        assert!(slice_section(doc, ENTRY_KEY, 0, doc.len()).is_err());
    }

    #[test]
    fn no_offsets_yield_no_entries() {
        assert!(slices("{}").expect("slices").is_empty());
    }
}

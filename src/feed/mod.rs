//! Purpose: Extraction and normalization pipeline for the movie list feed.
//! Exports: Scanner, slicer, metadata decoder, record builder, normalizer, import driver.
//! Role: The only place that understands the feed's quasi-JSON dialect.
//! Invariants: Passes run in document order; the normalizer sees records exactly as they appear.
//! Invariants: Structural violations abort the whole import; field-level issues only degrade fields.

pub mod import;
pub mod layout;
pub mod metadata;
pub mod normalize;
pub mod record;
pub mod report;
pub mod scan;
pub mod slice;

/// Literal key marking each movie entry value-array.
pub const ENTRY_KEY: &str = "\"X\"";

/// Literal key of the header section (metadata array, then column names).
pub const HEADER_KEY: &str = "\"Filmliste\"";

/// Whitespace the feed grammar allows between structural tokens.
pub(crate) const FEED_WHITESPACE: [char; 4] = [' ', '\t', '\r', '\n'];

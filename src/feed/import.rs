//! Purpose: Drive one import run from raw feed bytes to a normalized batch.
//! Exports: `ImportOptions`, `ImportBatch`, `import`, `import_into`.
//! Role: Orchestrates metadata gate, scan, slice, build and normalize in that order.
//! Invariants: Returns a complete batch or an error; never a partial batch.
//! Invariants: No state outlives the call; concurrent runs share nothing.

use tracing::{debug, info, info_span, warn};

use super::layout::LayoutRegistry;
use super::metadata::{FeedMetadata, decode_metadata};
use super::normalize::{IdTable, Normalizer};
use super::record::{MovieRecord, build_record};
use super::report::ImportReport;
use super::scan::boundaries;
use super::slice::slice_entries;
use super::{ENTRY_KEY, HEADER_KEY};
use crate::core::error::Error;
use crate::load::BatchLoader;

#[derive(Clone, Debug)]
pub struct ImportOptions {
    pub entry_key: String,
    pub header_key: String,
    pub layouts: LayoutRegistry,
    /// Reject versions without a registered layout instead of using the fallback.
    pub strict_version: bool,
    pub max_issues: usize,
    pub max_snippet_bytes: usize,
    pub known_channels: IdTable,
    pub known_topics: IdTable,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            entry_key: ENTRY_KEY.to_string(),
            header_key: HEADER_KEY.to_string(),
            layouts: LayoutRegistry::default(),
            strict_version: false,
            max_issues: 100,
            max_snippet_bytes: 120,
            known_channels: IdTable::new(),
            known_topics: IdTable::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ImportBatch {
    pub metadata: FeedMetadata,
    pub channels: IdTable,
    pub topics: IdTable,
    pub movies: Vec<MovieRecord>,
    pub report: ImportReport,
}

pub fn import(document: &[u8], options: &ImportOptions) -> Result<ImportBatch, Error> {
    let _span = info_span!("import", bytes = document.len()).entered();
    let document = std::str::from_utf8(document).map_err(|err| {
        Error::format("movie list is not valid UTF-8")
            .with_offset(err.valid_up_to() as u64)
            .with_source(err)
    })?;

    let metadata = decode_metadata(document, &options.header_key, &options.entry_key)?;
    debug!(
        version = %metadata.version,
        fingerprint = %metadata.fingerprint,
        published_at = %metadata.published_at,
        "movie list header accepted"
    );

    let layout = match options.layouts.get(&metadata.version) {
        Some(layout) => layout,
        None if options.strict_version => {
            let known = options.layouts.versions().collect::<Vec<_>>().join(", ");
            return Err(Error::format(format!(
                "unsupported movie list version {:?} (supported: {known})",
                metadata.version
            ))
            .with_hint("Register a field layout for this version or drop --strict-version."));
        }
        None => {
            warn!(version = %metadata.version, "no field layout for version; using fallback");
            options.layouts.fallback()
        }
    };

    let mut normalizer =
        Normalizer::with_tables(options.known_channels.clone(), options.known_topics.clone());
    let mut report = ImportReport::new(options.max_issues, options.max_snippet_bytes);
    let mut movies = Vec::new();

    let offsets = boundaries(document, &options.entry_key);
    for (index, entry) in slice_entries(document, &options.entry_key, offsets).enumerate() {
        let entry = entry?;
        let built = build_record(&entry, layout)?;
        let mut record = built.record;
        normalizer
            .push(&mut record)
            .map_err(|err| err.with_offset(entry.offset as u64))?;
        report.record_entry(index as u64 + 1, entry.offset, built.issues);
        movies.push(record);
    }

    let (channels, topics) = normalizer.finish();
    if !report.is_clean() {
        warn!(
            field_warnings = report.field_warnings,
            url_degrades = report.url_degrades,
            "some fields were defaulted"
        );
    }
    info!(
        movies = movies.len(),
        channels = channels.len(),
        topics = topics.len(),
        "movie list decoded"
    );

    Ok(ImportBatch {
        metadata,
        channels,
        topics,
        movies,
        report,
    })
}

/// Imports and hands the complete batch to `loader`.
pub fn import_into<L>(
    document: &[u8],
    options: &ImportOptions,
    loader: &mut L,
) -> Result<ImportBatch, Error>
where
    L: BatchLoader + ?Sized,
{
    let batch = import(document, options)?;
    loader.load(&batch)?;
    Ok(batch)
}

//! Purpose: Define the stable public Rust API boundary for filmliste.
//! Exports: Error model, import pipeline entry points, records, id tables, loaders.
//! Role: Public, additive-only surface; hides internal pipeline modules.
//! Invariants: This module is the only public path to the feed pipeline.
//! Invariants: Individual passes are exposed for callers that need them piecemeal.

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};

pub use crate::batch_json::{id_entry_json, metadata_json, movie_json, report_json, summary_json};
pub use crate::feed::import::{ImportBatch, ImportOptions, import, import_into};
pub use crate::feed::layout::{Field, FieldLayout, LayoutRegistry};
pub use crate::feed::metadata::{FeedMetadata, decode_metadata, metadata_from_values};
pub use crate::feed::normalize::{IdEntry, IdTable, Normalizer, normalize};
pub use crate::feed::record::{
    BuiltRecord, FieldIssue, FieldOutcome, MovieRecord, build_from_values, build_record,
    resolve_url,
};
pub use crate::feed::report::{DecodeIssue, ImportReport, IssueKind};
pub use crate::feed::scan::{Boundaries, boundaries};
pub use crate::feed::slice::{EntrySlices, RawEntry, slice_entries};
pub use crate::feed::{ENTRY_KEY, HEADER_KEY};
pub use crate::load::{
    BatchLoader, CHANNELS_FILE, JsonlLoader, METADATA_FILE, MOVIES_FILE, TOPICS_FILE,
    read_known_names,
};

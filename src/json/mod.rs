//! Purpose: Internal JSON parsing boundary shared by the feed pipeline.
//! Exports: `parse` module with decode helpers used by entry and metadata decoding.
//! Role: Single seam for parser implementation so callsites avoid ad hoc decode logic.
//! Invariants: Array literals produced by the entry slicer are decoded only through this module.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub(crate) mod parse;

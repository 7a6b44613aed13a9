//! Purpose: Aggregate non-fatal decode issues for one import run.
//! Exports: `IssueKind`, `DecodeIssue`, `ImportReport`.
//! Role: Makes lenient field defaulting observable without failing the import.
//! Invariants: Counters cover every issue; only the first `max_issues` are retained in detail.
//! Invariants: Retained snippets are capped at `max_snippet_bytes` and cut on char boundaries.

use std::collections::BTreeMap;

use super::layout::Field;
use super::record::FieldIssue;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum IssueKind {
    /// Numeric, boolean or timestamp slot did not parse; defaulted.
    FieldDecodeWarning,
    /// Offset-encoded URL failed its bounds check; left empty.
    UrlDecodeDegrade,
}

impl IssueKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::FieldDecodeWarning => "field-decode",
            Self::UrlDecodeDegrade => "url-degrade",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodeIssue {
    /// 1-based position of the entry in document order.
    pub entry: u64,
    pub offset: u64,
    pub field: Field,
    pub kind: IssueKind,
    pub snippet: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImportReport {
    pub entries: u64,
    pub field_warnings: u64,
    pub url_degrades: u64,
    pub per_field: BTreeMap<Field, u64>,
    pub issues: Vec<DecodeIssue>,
    max_issues: usize,
    max_snippet_bytes: usize,
}

impl ImportReport {
    pub fn new(max_issues: usize, max_snippet_bytes: usize) -> Self {
        Self {
            entries: 0,
            field_warnings: 0,
            url_degrades: 0,
            per_field: BTreeMap::new(),
            issues: Vec::new(),
            max_issues,
            max_snippet_bytes,
        }
    }

    pub(crate) fn record_entry(&mut self, entry: u64, offset: usize, issues: Vec<FieldIssue>) {
        self.entries += 1;
        for issue in issues {
            match issue.kind {
                IssueKind::FieldDecodeWarning => self.field_warnings += 1,
                IssueKind::UrlDecodeDegrade => self.url_degrades += 1,
            }
            *self.per_field.entry(issue.field).or_default() += 1;
            if self.issues.len() < self.max_issues {
                self.issues.push(DecodeIssue {
                    entry,
                    offset: offset as u64,
                    field: issue.field,
                    kind: issue.kind,
                    snippet: truncate_snippet(&issue.raw, self.max_snippet_bytes),
                });
            }
        }
    }

    pub fn issue_count(&self) -> u64 {
        self.field_warnings + self.url_degrades
    }

    pub fn dropped_issues(&self) -> u64 {
        self.issue_count() - self.issues.len() as u64
    }

    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
    }
}

fn truncate_snippet(input: &str, max: usize) -> String {
    if input.len() <= max {
        return input.to_string();
    }
    let suffix = "...";
    if max <= suffix.len() {
        return suffix[..max].to_string();
    }
    let mut take = max - suffix.len();
    while !input.is_char_boundary(take) {
        take -= 1;
    }
    format!("{}{suffix}", &input[..take])
}

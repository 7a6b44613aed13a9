//! Purpose: Find the byte offsets where genuine feed entries begin.
//! Exports: `Boundaries`, `boundaries`, `is_entry_start`.
//! Role: First pass of the pipeline; feeds offsets to the entry slicer.
//! Invariants: Offsets are strictly ascending and each one is followed by `:` and `[`.
//! Invariants: Scanning resumes one byte past every candidate, so overlapping keys are seen.

use bstr::ByteSlice;

/// Lazy sequence of validated key offsets. Cloning restarts from the clone point.
#[derive(Clone, Debug)]
pub struct Boundaries<'a> {
    document: &'a [u8],
    key: &'a [u8],
    cursor: usize,
}

pub fn boundaries<'a>(document: &'a str, key: &'a str) -> Boundaries<'a> {
    Boundaries {
        document: document.as_bytes(),
        key: key.as_bytes(),
        cursor: 0,
    }
}

impl Iterator for Boundaries<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.key.is_empty() {
            return None;
        }
        loop {
            let rest = self.document.get(self.cursor..)?;
            let found = rest.find(self.key)?;
            let offset = self.cursor + found;
            self.cursor = offset + 1;
            if is_entry_start(&self.document[offset + self.key.len()..]) {
                return Some(offset);
            }
        }
    }
}

/// Checks the text right after a key for optional whitespace, `:`, optional whitespace, `[`.
pub fn is_entry_start(after_key: &[u8]) -> bool {
    let rest = skip_whitespace(after_key);
    match rest.split_first() {
        Some((b':', rest)) => skip_whitespace(rest).first() == Some(&b'['),
        _ => false,
    }
}

fn skip_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .unwrap_or(bytes.len());
    &bytes[start..]
}

//! Purpose: Provide the runtime JSON decode entrypoint for sliced feed entries.
//! Exports: `from_str`, `ParseFailureCategory`, `categorize_error`, `categorize_message`, `hint_for_error`.
//! Role: Parser boundary that centralizes simd-json usage details.
//! Invariants: Every entry fragment is decoded through `from_str`; no other callsite decodes feed text.
//! Invariants: Input buffers are copied once to satisfy simd-json mutable-slice API.
//! Notes: Error mapping is done by callsites so entry offsets stay explicit.

use serde::de::DeserializeOwned;

pub(crate) fn from_str<T: DeserializeOwned>(input: &str) -> Result<T, simd_json::Error> {
    let mut bytes = input.as_bytes().to_vec();
    simd_json::serde::from_slice(&mut bytes)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ParseFailureCategory {
    Syntax,
    Truncated,
    NumericRange,
    Utf8,
    DepthLimit,
    Unknown,
}

impl ParseFailureCategory {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::Truncated => "truncated",
            Self::NumericRange => "numeric-range",
            Self::Utf8 => "utf8",
            Self::DepthLimit => "depth-limit",
            Self::Unknown => "unknown",
        }
    }
}

pub(crate) fn categorize_error(err: &simd_json::Error) -> ParseFailureCategory {
    categorize_message(&err.to_string())
}

pub(crate) fn categorize_message(message: &str) -> ParseFailureCategory {
    let lower = message.to_ascii_lowercase();
    if lower.contains("utf8") || lower.contains("utf-8") {
        ParseFailureCategory::Utf8
    } else if lower.contains("recursion") || lower.contains("depth") {
        ParseFailureCategory::DepthLimit
    } else if lower.contains("number") || lower.contains("numeric") || lower.contains("overflow")
    {
        ParseFailureCategory::NumericRange
    } else if lower.contains("eof") || lower.contains("end of") {
        ParseFailureCategory::Truncated
    } else if lower.contains("syntax")
        || lower.contains("expected")
        || lower.contains("unexpected")
        || lower.contains("invalid")
    {
        ParseFailureCategory::Syntax
    } else {
        ParseFailureCategory::Unknown
    }
}

pub(crate) fn hint_for_error(err: &simd_json::Error, context: &str) -> String {
    let category = categorize_error(err);
    format!("parse category: {}; context: {context}", category.label())
}

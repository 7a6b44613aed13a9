//! Purpose: Map positional slots of an entry array to named movie fields.
//! Exports: `Field`, `FieldLayout`, `LayoutRegistry`.
//! Role: Versioned offset table consumed by the record builder.
//! Invariants: Only the layout observed in published feeds ships; others are registered by callers.
//! Invariants: A registry always has a fallback layout.

use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Field {
    Channel,
    Topic,
    Title,
    Date,
    Time,
    Duration,
    Size,
    Description,
    Url,
    WebsiteUrl,
    SubtitleUrl,
    SmallFormatUrl,
    HdFormatUrl,
    UnixDate,
    HistoryUrl,
    Geo,
    IsNew,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::Topic => "topic",
            Self::Title => "title",
            Self::Date => "date",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::Size => "size",
            Self::Description => "description",
            Self::Url => "url",
            Self::WebsiteUrl => "website_url",
            Self::SubtitleUrl => "subtitle_url",
            Self::SmallFormatUrl => "small_format_url",
            Self::HdFormatUrl => "hd_format_url",
            Self::UnixDate => "unix_date",
            Self::HistoryUrl => "history_url",
            Self::Geo => "geo",
            Self::IsNew => "is_new",
        }
    }
}

/// Array position of every field for one feed format version.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldLayout {
    pub channel: usize,
    pub topic: usize,
    pub title: usize,
    pub date: usize,
    pub time: usize,
    pub duration: usize,
    pub size: usize,
    pub description: usize,
    pub url: usize,
    pub website_url: usize,
    pub subtitle_url: usize,
    pub small_format_url: usize,
    pub hd_format_url: usize,
    pub unix_date: usize,
    pub history_url: usize,
    pub geo: usize,
    pub is_new: usize,
}

impl FieldLayout {
    /// Layout of format version 3. Slots 11, 13 and 15 carry RTMP variants that are not imported.
    pub const V3: FieldLayout = FieldLayout {
        channel: 0,
        topic: 1,
        title: 2,
        date: 3,
        time: 4,
        duration: 5,
        size: 6,
        description: 7,
        url: 8,
        website_url: 9,
        subtitle_url: 10,
        small_format_url: 12,
        hd_format_url: 14,
        unix_date: 16,
        history_url: 17,
        geo: 18,
        is_new: 19,
    };

    pub fn position(&self, field: Field) -> usize {
        match field {
            Field::Channel => self.channel,
            Field::Topic => self.topic,
            Field::Title => self.title,
            Field::Date => self.date,
            Field::Time => self.time,
            Field::Duration => self.duration,
            Field::Size => self.size,
            Field::Description => self.description,
            Field::Url => self.url,
            Field::WebsiteUrl => self.website_url,
            Field::SubtitleUrl => self.subtitle_url,
            Field::SmallFormatUrl => self.small_format_url,
            Field::HdFormatUrl => self.hd_format_url,
            Field::UnixDate => self.unix_date,
            Field::HistoryUrl => self.history_url,
            Field::Geo => self.geo,
            Field::IsNew => self.is_new,
        }
    }
}

/// Format version string to layout, with a fallback for versions nobody registered.
#[derive(Clone, Debug)]
pub struct LayoutRegistry {
    layouts: BTreeMap<String, FieldLayout>,
    fallback: FieldLayout,
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::new(FieldLayout::V3).with_layout("3", FieldLayout::V3)
    }
}

impl LayoutRegistry {
    pub fn new(fallback: FieldLayout) -> Self {
        Self {
            layouts: BTreeMap::new(),
            fallback,
        }
    }

    pub fn with_layout(mut self, version: impl Into<String>, layout: FieldLayout) -> Self {
        self.layouts.insert(version.into(), layout);
        self
    }

    pub fn get(&self, version: &str) -> Option<&FieldLayout> {
        self.layouts.get(version.trim())
    }

    pub fn fallback(&self) -> &FieldLayout {
        &self.fallback
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }
}

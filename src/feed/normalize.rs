//! Purpose: Forward-fill omitted channel/topic names and assign surrogate ids.
//! Exports: `IdTable`, `IdEntry`, `Normalizer`, `normalize`.
//! Role: Final pass; a strict left-to-right traversal in document order.
//! Invariants: Every pushed record leaves with non-empty channel/topic and both ids set.
//! Invariants: An id never changes once assigned within a run; distinct names never share an id.
//! Notes: Tables can be seeded with names from earlier runs; unseeded ids depend on first-seen order.

use std::collections::HashMap;

use super::record::MovieRecord;
use crate::core::error::{Error, ErrorKind};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IdEntry {
    pub id: u64,
    pub name: String,
    /// Seeded from a previous run rather than assigned by this one.
    pub known: bool,
}

/// Name to surrogate id, iterated in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct IdTable {
    known: HashMap<String, u64>,
    ids: HashMap<String, u64>,
    seen: Vec<IdEntry>,
    last_id: u64,
}

impl IdTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the table with `(name, id)` pairs persisted by an earlier run.
    pub fn with_known<I, S>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        let mut used = HashMap::new();
        for (name, id) in pairs {
            let name = name.into();
            if id == 0 {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(format!("known name {name:?} has id 0; ids start at 1")));
            }
            if id == u64::MAX {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(format!("known name {name:?} has id {id}; no ids would remain"))
                    .with_hint("Known ids must leave room for names first seen in this run."));
            }
            if let Some(other) = used.insert(id, name.clone()) {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(format!("id {id} is known for both {other:?} and {name:?}")));
            }
            if table.known.insert(name.clone(), id).is_some() {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(format!("known name {name:?} is listed twice")));
            }
            table.last_id = table.last_id.max(id);
        }
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.ids.get(name).copied()
    }

    /// Id for `name`, assigning the next free one on first sight.
    pub fn assign(&mut self, name: &str) -> u64 {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let (id, known) = match self.known.get(name) {
            Some(id) => (*id, true),
            None => {
                self.last_id += 1;
                (self.last_id, false)
            }
        };
        self.ids.insert(name.to_string(), id);
        self.seen.push(IdEntry {
            id,
            name: name.to_string(),
            known,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IdEntry> {
        self.seen.iter()
    }

    /// Entries first assigned by this run, for loaders that only insert new rows.
    pub fn new_entries(&self) -> impl Iterator<Item = &IdEntry> {
        self.seen.iter().filter(|entry| !entry.known)
    }
}

/// Running state of one normalization pass.
#[derive(Debug, Default)]
pub struct Normalizer {
    last_channel: Option<String>,
    last_topic: Option<String>,
    channels: IdTable,
    topics: IdTable,
    position: u64,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(channels: IdTable, topics: IdTable) -> Self {
        Self {
            channels,
            topics,
            ..Self::default()
        }
    }

    /// Normalizes the next record in document order.
    pub fn push(&mut self, record: &mut MovieRecord) -> Result<(), Error> {
        self.position += 1;
        fill(&mut record.channel, &mut self.last_channel, "channel", self.position)?;
        fill(&mut record.topic, &mut self.last_topic, "topic", self.position)?;
        record.channel_id = Some(self.channels.assign(&record.channel));
        record.topic_id = Some(self.topics.assign(&record.topic));
        Ok(())
    }

    pub fn finish(self) -> (IdTable, IdTable) {
        (self.channels, self.topics)
    }
}

fn fill(
    value: &mut String,
    last: &mut Option<String>,
    label: &str,
    position: u64,
) -> Result<(), Error> {
    if value.is_empty() {
        let previous = last.as_ref().ok_or_else(|| {
            Error::format(format!(
                "entry {position} omits its {label} but no earlier entry names one"
            ))
        })?;
        value.clone_from(previous);
    } else if last.as_deref() != Some(value.as_str()) {
        *last = Some(value.clone());
    }
    Ok(())
}

/// Normalizes a whole batch with fresh tables.
pub fn normalize(records: &mut [MovieRecord]) -> Result<(IdTable, IdTable), Error> {
    let mut normalizer = Normalizer::new();
    for record in records.iter_mut() {
        normalizer.push(record)?;
    }
    Ok(normalizer.finish())
}

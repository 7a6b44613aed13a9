//! Purpose: Hand-off seam between the import pipeline and whatever persists its output.
//! Exports: `BatchLoader`, `JsonlLoader`, `read_known_names`.
//! Role: The relational bulk loader lives outside this crate; `JsonlLoader` is the file-based stand-in.
//! Invariants: Loaders only ever receive complete, normalized batches.
//! Invariants: `read_known_names` accepts exactly the `channels.jsonl`/`topics.jsonl` rows the loader writes.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::batch_json::{id_entry_json, metadata_json, movie_json};
use crate::core::error::{Error, ErrorKind};
use crate::feed::import::ImportBatch;
use crate::feed::normalize::IdTable;

pub trait BatchLoader {
    fn load(&mut self, batch: &ImportBatch) -> Result<(), Error>;
}

pub const CHANNELS_FILE: &str = "channels.jsonl";
pub const TOPICS_FILE: &str = "topics.jsonl";
pub const MOVIES_FILE: &str = "movies.jsonl";
pub const METADATA_FILE: &str = "metadata.json";

/// Writes one JSON object per row into `channels.jsonl`, `topics.jsonl` and `movies.jsonl`.
#[derive(Clone, Debug)]
pub struct JsonlLoader {
    dir: PathBuf,
    only_new_names: bool,
}

impl JsonlLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            only_new_names: false,
        }
    }

    /// Skip channel/topic rows that were seeded as known names.
    pub fn only_new_names(mut self, only_new: bool) -> Self {
        self.only_new_names = only_new;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BatchLoader for JsonlLoader {
    fn load(&mut self, batch: &ImportBatch) -> Result<(), Error> {
        fs::create_dir_all(&self.dir)
            .map_err(|err| io_error(err, "failed to create output directory", &self.dir))?;

        let names = |table: &IdTable| -> Vec<Value> {
            if self.only_new_names {
                table.new_entries().map(id_entry_json).collect()
            } else {
                table.iter().map(id_entry_json).collect()
            }
        };
        write_lines(&self.dir.join(CHANNELS_FILE), names(&batch.channels))?;
        write_lines(&self.dir.join(TOPICS_FILE), names(&batch.topics))?;
        write_lines(
            &self.dir.join(MOVIES_FILE),
            batch.movies.iter().map(movie_json),
        )?;

        let path = self.dir.join(METADATA_FILE);
        let text = serde_json::to_string_pretty(&metadata_json(&batch.metadata)).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to encode metadata")
                .with_source(err)
        })?;
        fs::write(&path, text).map_err(|err| io_error(err, "failed to write metadata", &path))?;

        debug!(dir = %self.dir.display(), movies = batch.movies.len(), "batch written");
        Ok(())
    }
}

fn write_lines<I>(path: &Path, rows: I) -> Result<(), Error>
where
    I: IntoIterator<Item = Value>,
{
    let file = File::create(path).map_err(|err| io_error(err, "failed to create file", path))?;
    let mut out = BufWriter::new(file);
    for row in rows {
        serde_json::to_writer(&mut out, &row).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to write row")
                .with_path(path)
                .with_source(err)
        })?;
        out.write_all(b"\n")
            .map_err(|err| io_error(err, "failed to write row", path))?;
    }
    out.flush()
        .map_err(|err| io_error(err, "failed to flush file", path))
}

#[derive(Deserialize)]
struct NameRow {
    id: u64,
    name: String,
}

/// Reads `{"id":..,"name":..}` lines into a seeded `IdTable`.
pub fn read_known_names(path: &Path) -> Result<IdTable, Error> {
    let file = File::open(path).map_err(|err| {
        let kind = if err.kind() == io::ErrorKind::NotFound {
            ErrorKind::NotFound
        } else {
            ErrorKind::Io
        };
        Error::new(kind)
            .with_message("failed to open known names")
            .with_path(path)
            .with_source(err)
    })?;
    let mut pairs = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|err| io_error(err, "failed to read known names", path))?;
        if line.trim().is_empty() {
            continue;
        }
        let row: NameRow = serde_json::from_str(&line).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message(format!("invalid known name on line {}", index + 1))
                .with_path(path)
                .with_hint("Expected one {\"id\": <n>, \"name\": \"...\"} object per line.")
                .with_source(err)
        })?;
        pairs.push((row.name, row.id));
    }
    IdTable::with_known(pairs).map_err(|err| err.with_path(path))
}

fn io_error(err: io::Error, message: &str, path: &Path) -> Error {
    Error::new(ErrorKind::Io)
        .with_message(message)
        .with_path(path)
        .with_source(err)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{BatchLoader, CHANNELS_FILE, JsonlLoader, MOVIES_FILE, read_known_names};
    use crate::core::error::ErrorKind;
    use crate::feed::import::{ImportOptions, import};

    const FEED: &str = r#"{"Filmliste":["", "01.01.2024, 10:00", "3", "", "h"],
"Filmliste":["Sender","Thema"],
"X":["ARD","Tagesschau","20 Uhr","01.01.2024","20:00:00","00:15:00","512","","http://a.de/v.mp4"],
"X":["","","21 Uhr","01.01.2024","21:00:00","00:15:00","512","","http://a.de/w.mp4"],
"X":["ZDF","heute","19 Uhr","01.01.2024","19:00:00","00:20:00","300","","http://z.de/h.mp4"]}"#;

    #[test]
    fn writes_rows_that_read_back_as_known_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        let batch = import(FEED.as_bytes(), &ImportOptions::default()).expect("import");
        let mut loader = JsonlLoader::new(dir.path().join("out"));
        loader.load(&batch).expect("load");

        let movies = fs::read_to_string(loader.dir().join(MOVIES_FILE)).expect("movies");
        assert_eq!(movies.lines().count(), 3);
        let second: serde_json::Value =
            serde_json::from_str(movies.lines().nth(1).expect("line")).expect("json");
        assert_eq!(second["channel"], "ARD");
        assert_eq!(second["channel_id"], 1);
        assert_eq!(second["published_at"], "2024-01-01T21:00:00Z");

        let known = read_known_names(&loader.dir().join(CHANNELS_FILE)).expect("known");
        let mut options = ImportOptions::default();
        options.known_channels = known;
        let again = import(FEED.as_bytes(), &options).expect("import");
        assert_eq!(again.channels.new_entries().count(), 0);
        assert_eq!(again.movies[2].channel_id, Some(2));
    }

    #[test]
    fn known_names_errors_carry_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.jsonl");
        let err = read_known_names(&missing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let bad = dir.path().join("bad.jsonl");
        fs::write(&bad, "{\"id\":1,\"name\":\"ARD\"}\nnot json\n").expect("write");
        let err = read_known_names(&bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(err.message().is_some_and(|m| m.contains("line 2")));
        assert_eq!(err.path(), Some(&bad));
    }
}

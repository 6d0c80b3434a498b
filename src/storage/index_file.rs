//! On-disk index file.
//!
//! ```text
//! 0:
//! 1:com.example
//! 2:Service
//! #####
//! t|pb|0|1|2|||||c
//! ```
//!
//! The header is the write-time dictionary (token to value, one pair per
//! line); the body is one encoded record per line. Every write re-encodes
//! the whole record set with a fresh dictionary.

use super::error::{StorageError, StorageResult};
use crate::codec::DelegatingCodec;
use crate::dictionary::{Dictionary, TokenAllocator};
use crate::record::{Record, RecordKind};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Line separating the dictionary header from the record body.
pub const SENTINEL: &str = "#####";

/// Summary of one index file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub records: usize,
    pub by_kind: BTreeMap<RecordKind, usize>,
    pub dictionary_entries: usize,
}

impl IndexStats {
    pub fn count(&self, kind: RecordKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// Encode `records` into index file text.
///
/// Header values are line-delimited, so a value containing `\n` or `\r`
/// cannot be stored and fails the whole render.
pub fn render<'a>(records: impl IntoIterator<Item = &'a Record>) -> StorageResult<(String, IndexStats)> {
    let codec = DelegatingCodec::new();
    let mut alloc = TokenAllocator::new();
    let mut stats = IndexStats::default();

    let body: Vec<String> = records
        .into_iter()
        .map(|record| {
            stats.records += 1;
            *stats.by_kind.entry(record.kind()).or_default() += 1;
            codec.encode(record, &mut alloc)
        })
        .collect();

    let header = alloc.reader_dictionary();
    if let Some((_, value)) = header.iter().find(|(_, v)| v.contains(['\n', '\r'])) {
        return Err(StorageError::LineBreakInValue {
            value: value.to_string(),
        });
    }
    stats.dictionary_entries = header.len();

    let mut text = String::new();
    if !header.is_empty() {
        text.push_str(&header.to_canonical_form("\n"));
        text.push('\n');
    }
    text.push_str(SENTINEL);
    text.push('\n');
    for line in body {
        text.push_str(&line);
        text.push('\n');
    }
    Ok((text, stats))
}

/// Decode index file text. `path` is only used in error messages.
///
/// Body lines that do not decode are dropped.
pub fn parse(path: &Path, text: &str) -> StorageResult<Vec<Record>> {
    let mut lines = text.lines().enumerate();
    let mut dictionary = Dictionary::new();
    let mut saw_sentinel = false;

    for (index, line) in lines.by_ref() {
        if line == SENTINEL {
            saw_sentinel = true;
            break;
        }
        let (token, value) = Dictionary::parse_pair(line).ok_or_else(|| {
            StorageError::corrupt(path, format!("header line {} is not a token:value pair", index + 1))
        })?;
        dictionary.add_mapping(token, value);
    }

    if !saw_sentinel {
        return Err(StorageError::corrupt(path, format!("missing '{SENTINEL}' separator")));
    }

    let codec = DelegatingCodec::new();
    let mut records = Vec::new();
    for (index, line) in lines {
        if line.is_empty() {
            continue;
        }
        match codec.decode(line, &dictionary) {
            Some(record) => records.push(record),
            None => tracing::debug!(
                "[index] dropping undecodable line {} in {}",
                index + 1,
                path.display()
            ),
        }
    }
    Ok(records)
}

/// Read every record stored at `path`. A missing file is an empty index.
pub fn read_records(path: &Path) -> StorageResult<Vec<Record>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(StorageError::io(format!("reading index {}", path.display()), e));
        }
    };
    parse(path, &text)
}

/// Replace the index at `path` with `records`.
///
/// The file is written next to the target and renamed over it, so readers
/// never see a partial index.
pub fn write_records<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a Record>,
) -> StorageResult<IndexStats> {
    let (text, stats) = render(records)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .map_err(|e| StorageError::io(format!("creating {}", parent.display()), e))?;

    let mut temp = NamedTempFile::new_in(parent)
        .map_err(|e| StorageError::io(format!("creating temp file in {}", parent.display()), e))?;
    temp.write_all(text.as_bytes())
        .map_err(|e| StorageError::io(format!("writing index {}", path.display()), e))?;
    temp.persist(path)
        .map_err(|e| StorageError::io(format!("replacing index {}", path.display()), e.error))?;

    tracing::debug!(
        "[index] wrote {} records ({} dictionary entries) to {}",
        stats.records,
        stats.dictionary_entries,
        path.display()
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Attributes, ExecutableRecord, FieldRecord, ModuleRecord, TypeRecord};
    use crate::types::{Modifier, TypeKind};
    use tempfile::TempDir;

    fn sample() -> Vec<Record> {
        vec![
            ModuleRecord::new("app").into(),
            TypeRecord::new("app", "com.example.Service", TypeKind::Class).into(),
            FieldRecord::new("app", "com.example.Service", "name").into(),
            Record::Method(
                ExecutableRecord::method("app", "com.example.Service", "run")
                    .with_parameters(["int", "java.lang.String"]),
            ),
        ]
    }

    #[test]
    fn test_render_layout() {
        let records = sample();
        let (text, stats) = render(&records).unwrap();

        let (header, body) = text.split_once(&format!("{SENTINEL}\n")).expect("sentinel present");
        assert!(header.lines().all(|l| l.contains(':')));
        assert_eq!(body.lines().count(), 4);
        assert_eq!(stats.records, 4);
        assert_eq!(stats.count(RecordKind::Method), 1);
        assert_eq!(stats.count(RecordKind::Constructor), 0);
        assert_eq!(stats.dictionary_entries, header.lines().count());
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("elements.idx");
        let records = sample();

        write_records(&path, &records).unwrap();
        let loaded = read_records(&path).unwrap();

        let ids: Vec<String> = loaded.iter().map(Record::id).collect();
        let expected: Vec<String> = records.iter().map(Record::id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_records(&temp_dir.path().join("none.idx")).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_header_is_an_error() {
        let path = Path::new("broken.idx");
        let err = parse(path, "0:\nnot a pair\n#####\n").unwrap_err();
        assert!(matches!(err, StorageError::CorruptIndex { .. }));

        let err = parse(path, "0:\n1:pkg\n").unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_garbage_body_lines_are_dropped() {
        let text = "0:\n1:pkg\n2:Owner\n3:var\n#####\nf|f;pv|0|1|2#3||\nzz|junk\n\n";
        let records = parse(Path::new("x.idx"), text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), "pkg.Owner#var");
        assert!(records[0].modifiers().contains(&Modifier::Private));
    }

    #[test]
    fn test_line_break_in_value_leaves_index_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("elements.idx");
        write_records(&path, &sample()).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        for bad in ["multi\nline", "carriage\rreturn"] {
            let record: Record = TypeRecord::new("app", "com.example.Other", TypeKind::Class)
                .with_attributes(Attributes::default().with_aliases([bad]))
                .into();
            let err = write_records(&path, [&record]).unwrap_err();
            assert!(matches!(err, StorageError::LineBreakInValue { ref value } if value == bad));
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
        assert_eq!(read_records(&path).unwrap().len(), 4);
    }

    #[test]
    fn test_empty_index_round_trips() {
        let (text, stats) = render(std::iter::empty::<&Record>()).unwrap();
        assert_eq!(text, format!("{SENTINEL}\n"));
        assert_eq!(stats, IndexStats::default());
        assert!(parse(Path::new("empty.idx"), &text).unwrap().is_empty());
    }
}

//! Delimited record files: reading inputs and writing result tables.
//!
//! The first column of an input file is the text to classify; the remaining
//! columns are carried through to the result file. `.txt`, `.tsv` and
//! `.rawdata` files are tab separated, everything else is comma separated.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use postsift_query::{CheckRow, Record, RecordSource};
use tracing::debug;

use crate::commands::{CommandError, Result};

/// Extensions read and written with a tab delimiter.
const TAB_EXTENSIONS: &[&str] = &["txt", "tsv", "rawdata"];

/// Returns the field delimiter for `path`.
pub fn delimiter_for(path: &Path) -> u8 {
    let is_tab = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TAB_EXTENSIONS.iter().any(|t| ext.eq_ignore_ascii_case(t)));
    if is_tab {
        b'\t'
    } else {
        b','
    }
}

/// Returns the first regular, non-hidden file in `dir`, by name.
pub fn first_file(dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|e| {
        CommandError::Input(format!("Cannot read input directory {}: {e}", dir.display()))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if path.is_file() && !hidden {
            files.push(path);
        }
    }
    files.sort();

    files
        .into_iter()
        .next()
        .ok_or_else(|| CommandError::Input(format!("No input file in {}", dir.display())))
}

/// Returns `<results_dir>/<stem>_result.<ext>` for `input`.
pub fn result_path(results_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}_result.{}", ext.to_string_lossy()),
        None => format!("{stem}_result"),
    };
    results_dir.join(name)
}

/// A header row plus records read from a delimited file.
pub struct DelimitedSource {
    path: PathBuf,
    delimiter: u8,
    headers: StringRecord,
}

impl DelimitedSource {
    /// Opens `path` and reads its header row.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let delimiter = delimiter_for(&path);
        let headers = Self::reader(&path, delimiter)?.headers()?.clone();
        if headers.is_empty() {
            return Err(CommandError::Input(format!(
                "{} has no header row",
                path.display()
            )));
        }
        Ok(Self {
            path,
            delimiter,
            headers,
        })
    }

    fn reader(path: &Path, delimiter: u8) -> Result<csv::Reader<File>> {
        let file = File::open(path).map_err(|e| {
            CommandError::Input(format!("Cannot open input {}: {e}", path.display()))
        })?;
        Ok(ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(file))
    }

    /// Returns the input path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the field delimiter.
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Returns the header of the text column.
    pub fn text_header(&self) -> &str {
        self.headers.get(0).unwrap_or_default()
    }

    /// Returns the headers of the carried-through columns.
    pub fn field_headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().skip(1)
    }
}

impl RecordSource for DelimitedSource {
    type Element = StringRecord;
    type Error = CommandError;

    fn read_record(&self, element: &StringRecord) -> Result<Record> {
        let mut fields = element.iter();
        let text = fields.next().unwrap_or_default();
        Ok(Record::with_fields(text, fields.map(str::to_string).collect()))
    }

    fn read_records(&mut self, start: Option<usize>) -> Result<Vec<Record>> {
        let mut reader = Self::reader(&self.path, self.delimiter)?;
        let mut records = Vec::new();
        for row in reader.records().skip(start.unwrap_or(0)) {
            records.push(self.read_record(&row?)?);
        }
        debug!(path = %self.path.display(), records = records.len(), "read input");
        Ok(records)
    }
}

/// Column layout of a result file.
pub struct ResultLayout<'a> {
    /// Header of the text column, written when `keep_text` is set.
    pub text_header: &'a str,
    /// Headers of the carried-through columns.
    pub field_headers: Vec<&'a str>,
    /// Query names, one verdict column each.
    pub query_names: Vec<&'a str>,
    /// Whether the text column is kept.
    pub keep_text: bool,
}

/// Writes records and their verdicts to `path`.
///
/// An existing file at `path` is first rotated into numbered backups.
pub fn write_results(
    path: &Path,
    layout: &ResultLayout<'_>,
    records: &[Record],
    rows: &[CheckRow],
    backup_count: usize,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    rotate_backups(path, backup_count)?;

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter_for(path))
        .flexible(true)
        .from_path(path)?;

    let mut header: Vec<&str> = Vec::new();
    if layout.keep_text {
        header.push(layout.text_header);
    }
    header.extend(&layout.field_headers);
    header.extend(&layout.query_names);
    writer.write_record(&header)?;

    let mut line: Vec<String> = Vec::with_capacity(header.len());
    for (record, row) in records.iter().zip(rows) {
        line.clear();
        if layout.keep_text {
            line.push(record.text.clone());
        }
        line.extend(record.fields.iter().cloned());
        line.extend(row.verdicts().map(|v| v.to_string()));
        writer.write_record(&line)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "wrote results");
    Ok(())
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

/// Rotates `path` into `path.1`, shifting older backups up to `path.<max>`.
///
/// The oldest backups beyond `max` are removed. Does nothing when `path` does
/// not exist or `max` is zero.
pub fn rotate_backups(path: &Path, max: usize) -> Result<()> {
    if max == 0 || !path.exists() {
        return Ok(());
    }

    let mut existing = 0;
    while backup_path(path, existing + 1).exists() {
        existing += 1;
    }
    for index in max..=existing {
        fs::remove_file(backup_path(path, index))?;
    }

    for index in (1..existing.min(max - 1) + 1).rev() {
        fs::rename(backup_path(path, index), backup_path(path, index + 1))?;
    }
    fs::copy(path, backup_path(path, 1))?;

    debug!(path = %path.display(), backups = existing.min(max - 1) + 1, "rotated backups");
    Ok(())
}

#[cfg(test)]
mod tests {
    use postsift_query::{check, QuerySet};
    use tempfile::TempDir;

    use super::*;

    fn write(path: &Path, contents: &str) {
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_delimiter_by_extension() {
        assert_eq!(delimiter_for(Path::new("posts.txt")), b'\t');
        assert_eq!(delimiter_for(Path::new("posts.TSV")), b'\t');
        assert_eq!(delimiter_for(Path::new("posts.rawdata")), b'\t');
        assert_eq!(delimiter_for(Path::new("posts.csv")), b',');
        assert_eq!(delimiter_for(Path::new("posts")), b',');
    }

    #[test]
    fn test_result_path() {
        let dir = Path::new("/out");
        assert_eq!(
            result_path(dir, Path::new("/in/posts.csv")),
            PathBuf::from("/out/posts_result.csv")
        );
        assert_eq!(
            result_path(dir, Path::new("/in/posts")),
            PathBuf::from("/out/posts_result")
        );
    }

    #[test]
    fn test_first_file_sorted_and_skips_hidden() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join("b.csv"), "text\n");
        write(&temp.path().join("a.csv"), "text\n");
        write(&temp.path().join(".hidden"), "text\n");
        fs::create_dir(temp.path().join("0dir")).unwrap();

        assert_eq!(first_file(temp.path()).unwrap(), temp.path().join("a.csv"));
    }

    #[test]
    fn test_first_file_empty_dir() {
        let temp = TempDir::new().unwrap();
        let err = first_file(temp.path()).unwrap_err();
        assert!(matches!(err, CommandError::Input(_)));
    }

    #[test]
    fn test_read_records_splits_text_and_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("posts.csv");
        write(&path, "text,id,author\n\"hello, world\",1,ann\nsecond,2,bo\n");

        let mut source = DelimitedSource::open(&path).unwrap();
        assert_eq!(source.text_header(), "text");
        assert_eq!(source.field_headers().collect::<Vec<_>>(), vec!["id", "author"]);

        let records = source.read_records(None).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "hello, world");
        assert_eq!(records[0].fields, vec!["1", "ann"]);

        let skipped = source.read_records(Some(1)).unwrap();
        assert_eq!(skipped, vec![Record::with_fields("second", vec!["2".into(), "bo".into()])]);
    }

    #[test]
    fn test_read_tab_separated() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("posts.txt");
        write(&path, "text\tid\nhello, world\t7\n");

        let mut source = DelimitedSource::open(&path).unwrap();
        assert_eq!(source.delimiter(), b'\t');
        let records = source.read_records(None).unwrap();
        assert_eq!(records[0].text, "hello, world");
        assert_eq!(records[0].fields, vec!["7"]);
    }

    #[test]
    fn test_open_missing_file() {
        let err = DelimitedSource::open("/nonexistent/posts.csv").err().unwrap();
        assert!(matches!(err, CommandError::Input(_)));
    }

    #[test]
    fn test_write_results_drops_text_by_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out").join("posts_result.csv");
        let queries = QuerySet::parse_all([("camera", "camera")]).unwrap();
        let records = vec![
            Record::with_fields("nice camera", vec!["1".into()]),
            Record::with_fields("nothing", vec!["2".into()]),
        ];
        let rows: Vec<_> = records.iter().map(|r| check(&r.text, &queries)).collect();
        let layout = ResultLayout {
            text_header: "text",
            field_headers: vec!["id"],
            query_names: vec!["camera"],
            keep_text: false,
        };

        write_results(&path, &layout, &records, &rows, 5).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "id,camera\n1,Y\n2,N\n");

        let layout = ResultLayout {
            keep_text: true,
            ..layout
        };
        write_results(&path, &layout, &records, &rows, 5).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "text,id,camera\nnice camera,1,Y\nnothing,2,N\n"
        );
        assert!(backup_path(&path, 1).exists());
    }

    #[test]
    fn test_rotate_backups_keeps_newest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("result.csv");

        for generation in 0..4 {
            write(&path, &generation.to_string());
            rotate_backups(&path, 2).unwrap();
        }

        assert_eq!(fs::read_to_string(backup_path(&path, 1)).unwrap(), "3");
        assert_eq!(fs::read_to_string(backup_path(&path, 2)).unwrap(), "2");
        assert!(!backup_path(&path, 3).exists());
    }

    #[test]
    fn test_rotate_backups_trims_excess() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("result.csv");
        write(&path, "current");
        for index in 1..=4 {
            write(&backup_path(&path, index), &format!("old{index}"));
        }

        rotate_backups(&path, 2).unwrap();

        assert_eq!(fs::read_to_string(backup_path(&path, 1)).unwrap(), "current");
        assert_eq!(fs::read_to_string(backup_path(&path, 2)).unwrap(), "old1");
        assert!(!backup_path(&path, 3).exists());
        assert!(!backup_path(&path, 4).exists());
    }

    #[test]
    fn test_rotate_backups_disabled_or_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("result.csv");
        rotate_backups(&path, 5).unwrap();
        assert!(!backup_path(&path, 1).exists());

        write(&path, "x");
        rotate_backups(&path, 0).unwrap();
        assert!(!backup_path(&path, 1).exists());
    }
}

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{debug, trace};

use crate::errors::LoaderError;
use crate::filters::FilterMode;
use crate::model::{LoadReport, LoadedSeries, SeriesBuilder};

/// Everything needed to load one rig recording.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfig {
    pub path: PathBuf,
    pub expected_fields: usize,
    pub mode: FilterMode,
}

impl LoadConfig {
    pub fn new(path: impl Into<PathBuf>, expected_fields: usize, mode: FilterMode) -> Self {
        Self {
            path: path.into(),
            expected_fields,
            mode,
        }
    }
}

pub fn load(config: &LoadConfig) -> Result<(LoadedSeries, LoadReport), LoaderError> {
    config.mode.validate(config.expected_fields)?;

    let file = open(&config.path)?;
    debug!(path = %config.path.display(), mode = config.mode.as_str(), "loading recording");
    read_series(BufReader::new(file), config.expected_fields, config.mode)
}

pub fn load_str(
    content: &str,
    expected_fields: usize,
    mode: FilterMode,
) -> Result<(LoadedSeries, LoadReport), LoaderError> {
    load_from_reader(content.as_bytes(), expected_fields, mode)
}

pub fn load_from_reader<R: Read>(
    reader: R,
    expected_fields: usize,
    mode: FilterMode,
) -> Result<(LoadedSeries, LoadReport), LoaderError> {
    read_series(reader, expected_fields, mode)
}

fn read_series<R: Read>(
    reader: R,
    expected_fields: usize,
    mode: FilterMode,
) -> Result<(LoadedSeries, LoadReport), LoaderError> {
    let mut filter = mode.build(expected_fields)?;
    let mut reader = reader_builder().from_reader(reader);
    let mut records = reader.records();

    let title = match records.next() {
        Some(header) => title_from_header(&header.map_err(LoaderError::from_csv)?),
        None => None,
    };

    let mut builder = SeriesBuilder::new(expected_fields);
    let mut report = LoadReport::default();

    for record in records {
        let record = record.map_err(LoaderError::from_csv)?;
        let line = record.position().map_or(0, |pos| pos.line());
        report.rows_read += 1;

        if record.len() != expected_fields {
            trace!(line, fields = record.len(), expected_fields, "skipping malformed row");
            report.rows_skipped += 1;
            continue;
        }

        let row = parse_row(&record, line)?;
        if let Some(emitted) = filter.push(row) {
            builder.push_row(&emitted)?;
            report.rows_emitted += 1;
        }
    }

    debug!(
        filter = filter.name(),
        rows_read = report.rows_read,
        rows_skipped = report.rows_skipped,
        rows_emitted = report.rows_emitted,
        "recording loaded"
    );

    Ok((builder.build(title), report))
}

fn open(path: &Path) -> Result<File, LoaderError> {
    File::open(path).map_err(|source| LoaderError::MissingFile {
        path: path.to_path_buf(),
        source,
    })
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

/// The rig writes its run annotation (e.g. `K = 6 (N/deg)`) as the last header field.
///
/// Trailing empty fields are skipped, so `t,h,k = 6,` still yields `k = 6`
/// where a plain last-field lookup would give an empty title.
fn title_from_header(header: &StringRecord) -> Option<String> {
    header
        .iter()
        .rev()
        .find(|field| !field.is_empty())
        .map(str::to_string)
}

fn parse_row(record: &StringRecord, line: u64) -> Result<Vec<f64>, LoaderError> {
    record
        .iter()
        .enumerate()
        .map(|(column, value)| {
            value
                .parse::<f64>()
                .map_err(|_| LoaderError::NonNumericField {
                    line,
                    column,
                    value: value.to_string(),
                })
        })
        .collect()
}

//! Dataset loading from JSON and CSV sources.
//!
//! CSV rows become `Record`s with every cell kept as a string; numeric
//! accessors parse them on read, the same way they read JSON numbers.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::core::accessor::Record;
use crate::error::{ChartResult, DataLoadError};

const READER_ORIGIN: &str = "<reader>";

/// Deserializes one JSON document from `reader`.
pub fn load_json<T, R>(reader: R) -> ChartResult<T>
where
    T: DeserializeOwned,
    R: Read,
{
    parse_json(reader, READER_ORIGIN)
}

pub fn load_json_file<T, P>(path: P) -> ChartResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let origin = path.display().to_string();
    let file = open(path, &origin)?;
    let value = parse_json(BufReader::new(file), &origin)?;
    debug!(origin = %origin, "loaded json dataset");
    Ok(value)
}

/// Reads a headed CSV table into one record per row.
pub fn load_csv_records<R: Read>(reader: R) -> ChartResult<Vec<Record>> {
    parse_csv(csv::Reader::from_reader(reader), READER_ORIGIN)
}

pub fn load_csv_file<P: AsRef<Path>>(path: P) -> ChartResult<Vec<Record>> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let file = open(path, &origin)?;
    let records = parse_csv(csv::Reader::from_reader(BufReader::new(file)), &origin)?;
    debug!(origin = %origin, rows = records.len(), "loaded csv dataset");
    Ok(records)
}

fn open(path: &Path, origin: &str) -> ChartResult<File> {
    File::open(path).map_err(|source| {
        DataLoadError::Io {
            origin: origin.to_owned(),
            source,
        }
        .into()
    })
}

fn parse_json<T, R>(reader: R, origin: &str) -> ChartResult<T>
where
    T: DeserializeOwned,
    R: Read,
{
    serde_json::from_reader(reader).map_err(|source| {
        DataLoadError::Json {
            origin: origin.to_owned(),
            source,
        }
        .into()
    })
}

fn parse_csv<R: Read>(mut reader: csv::Reader<R>, origin: &str) -> ChartResult<Vec<Record>> {
    let csv_error = |source: csv::Error| DataLoadError::Csv {
        origin: origin.to_owned(),
        source,
    };
    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| (header.to_owned(), Value::String(cell.to_owned())))
            .collect();
        records.push(record);
    }
    Ok(records)
}

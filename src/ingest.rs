//! CSV ingest of weighted points.

use std::error;
use std::fmt;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use gravmap_engine::Point;
use log::{debug, info};

/// A row the reader could not turn into a point, carrying the 1-based line
/// number of the offending row.
#[derive(Debug)]
pub(crate) struct InputFormatError {
    line: u64,
    message: String,
}

impl fmt::Display for InputFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl error::Error for InputFormatError {}

/// Loads `longitude,latitude,weight` rows. The header line is ignored,
/// fields are trimmed, and rows with non-positive weight are dropped.
pub(crate) fn load_points(path: &Path) -> Result<Vec<Point>, Box<dyn error::Error>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut points = Vec::new();
    let mut dropped = 0usize;
    for row in reader.records() {
        let record = row?;
        let line = record.position().map_or(0, |position| position.line());
        if record.len() != 3 {
            return Err(Box::new(InputFormatError {
                line,
                message: format!("expected 3 fields, found {}", record.len()),
            }));
        }
        let lon = parse_field(&record[0], "longitude", line)?;
        let lat = parse_field(&record[1], "latitude", line)?;
        let weight = parse_field(&record[2], "weight", line)?;
        if weight <= 0.0 {
            dropped += 1;
            continue;
        }
        points.push(Point { lon, lat, weight });
    }

    info!("loaded {} points from {}", points.len(), path.display());
    if dropped > 0 {
        debug!("dropped {} rows with non-positive weight", dropped);
    }
    Ok(points)
}

fn parse_field(field: &str, name: &str, line: u64) -> Result<f64, InputFormatError> {
    field.parse().map_err(|_| InputFormatError {
        line,
        message: format!("unparsable {} `{}`", name, field),
    })
}

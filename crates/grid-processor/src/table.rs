//! Intermediate sample table.
//!
//! Plain text, one record per line. Successful samples are written as
//! `lon,lat,seconds`; everything else is a `#` comment:
//!
//! ```text
//! #Origin: 2.348800,48.853300
//! #Start time: 2024-05-01 09:12:44.123456
//! #longitude,latitude,time in seconds
//! 2.000000,48.600000,2412
//! #2.000000,48.700000,ZERO_RESULTS
//! #End time: 2024-05-01 09:13:02.456789
//! ```

use std::io::{BufRead, Write};

use chrono::{DateTime, TimeZone};
use iso_common::{Coordinate, SampleOutcome, SamplePoint};

use crate::error::{GridProcessorError, Result};

/// Prefix of the footer line that marks a complete table.
pub const END_MARKER: &str = "#End time:";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Streams sample records to an underlying writer.
pub struct TableWriter<W: Write> {
    inner: W,
    records: usize,
}

impl<W: Write> TableWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, records: 0 }
    }

    /// Write the origin, start time and column header comments.
    pub fn write_header<Tz>(&mut self, origin: Coordinate, started: &DateTime<Tz>) -> Result<()>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        writeln!(self.inner, "#Origin: {:.6},{:.6}", origin.lon, origin.lat)?;
        writeln!(self.inner, "#Start time: {}", started.format(TIMESTAMP_FORMAT))?;
        writeln!(self.inner, "#longitude,latitude,time in seconds")?;
        Ok(())
    }

    /// Write one sample. Failed samples become comment lines.
    pub fn write_sample(&mut self, sample: &SamplePoint) -> Result<()> {
        match &sample.outcome {
            SampleOutcome::Duration(secs) => {
                writeln!(self.inner, "{:.6},{:.6},{}", sample.x, sample.y, secs)?
            }
            SampleOutcome::Failed(reason) => writeln!(
                self.inner,
                "#{:.6},{:.6},{}",
                sample.x,
                sample.y,
                single_line(reason)
            )?,
        }
        self.records += 1;
        Ok(())
    }

    /// Write the end marker and flush.
    pub fn write_footer<Tz>(&mut self, finished: &DateTime<Tz>) -> Result<()>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        writeln!(self.inner, "{} {}", END_MARKER, finished.format(TIMESTAMP_FORMAT))?;
        self.inner.flush()?;
        Ok(())
    }

    /// Number of samples written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Control characters would split a comment line, so they become spaces.
fn single_line(reason: &str) -> String {
    reason
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Read the successful samples back from a table, skipping comments.
pub fn read_samples<R: BufRead>(reader: R) -> Result<Vec<SamplePoint>> {
    let mut samples = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        samples.push(parse_record(line, idx + 1)?);
    }

    Ok(samples)
}

fn parse_record(line: &str, line_no: usize) -> Result<SamplePoint> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [lon, lat, secs] = fields.as_slice() else {
        return Err(GridProcessorError::artifact(
            line_no,
            format!("expected 3 fields, found {}", fields.len()),
        ));
    };

    let x: f64 = lon
        .parse()
        .map_err(|_| GridProcessorError::artifact(line_no, format!("invalid longitude '{}'", lon)))?;
    let y: f64 = lat
        .parse()
        .map_err(|_| GridProcessorError::artifact(line_no, format!("invalid latitude '{}'", lat)))?;
    let secs: u64 = secs
        .parse()
        .map_err(|_| GridProcessorError::artifact(line_no, format!("invalid duration '{}'", secs)))?;

    Ok(SamplePoint::new(x, y, SampleOutcome::Duration(secs)))
}

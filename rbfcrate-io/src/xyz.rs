//! Plain-text XYZ export for reconstructed points
//!
//! One point per line, coordinates separated by a single delimiter. Values
//! are written with Rust's shortest round-trip float formatting, so parsing
//! a line back yields the exact `f64` bits that were written.

use crate::error::EncodeError;
use rbfcrate_core::Point3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column delimiter for XYZ output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Space,
    Comma,
    Tab,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Space => ' ',
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
        }
    }
}

/// Options for XYZ output
#[derive(Debug, Clone, Default)]
pub struct XyzWriteOptions {
    pub delimiter: Delimiter,
    /// Emit an `x y z` header line first
    pub include_header: bool,
}

impl XyzWriteOptions {
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_header(mut self, include_header: bool) -> Self {
        self.include_header = include_header;
        self
    }
}

/// XYZ writer
pub struct XyzWriter;

impl XyzWriter {
    /// Write points to a file
    pub fn write_points_to_path<P: AsRef<Path>>(
        points: &[Point3],
        path: P,
        options: &XyzWriteOptions,
    ) -> Result<(), EncodeError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_points(points, &mut writer, options)?;
        writer.flush()?;
        Ok(())
    }

    /// Write points to any writer
    pub fn write_points<W: Write>(
        points: &[Point3],
        writer: &mut W,
        options: &XyzWriteOptions,
    ) -> Result<(), EncodeError> {
        let d = options.delimiter.as_char();
        if options.include_header {
            writeln!(writer, "x{d}y{d}z")?;
        }
        for point in points {
            writeln!(writer, "{}{d}{}{d}{}", point.x(), point.y(), point.z())?;
        }
        Ok(())
    }
}

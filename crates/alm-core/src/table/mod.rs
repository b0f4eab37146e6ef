//! Three-column coefficient tables: `(index, real, imag)` with the dense
//! 1-based index `l^2 + l + m + 1`, one row per stored coefficient.

mod json;
mod serialization;
mod text;

pub use json::JsonTableCodec;
pub use serialization::{format_scientific, render_spectrum_text, write_spectrum};
pub use text::TextTableCodec;

use crate::common::config::CodecOptions;
use crate::harmonics::{
    CoefficientBounds, CoefficientSet, CoefficientSetError, ComplexCoefficientSet,
    decode_dense_index, dense_index,
};
use num_complex::{Complex64, ComplexFloat};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to access coefficient table '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("coefficient table stream failed: {0}")]
    Stream(#[source] std::io::Error),
    #[error("coefficient table is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("coefficient table line {line}: {message}")]
    MalformedRow { line: usize, message: String },
    #[error("coefficient table column length mismatch: index={index}, real={real}, imag={imag}")]
    ColumnLengthMismatch {
        index: usize,
        real: usize,
        imag: usize,
    },
    #[error("coefficient table has no rows")]
    Empty,
    #[error("row {row}: index {index} is below 1 and cannot be decoded")]
    NonPositiveIndex { row: usize, index: i64 },
    #[error("row {row}: index {index} decodes to l={degree}, m={order}; negative orders are not stored")]
    NegativeOrder {
        row: usize,
        index: i64,
        degree: i64,
        order: i64,
    },
    #[error(transparent)]
    Coefficients(#[from] CoefficientSetError),
}

impl TableError {
    /// Attach the table path to stream-level I/O failures.
    fn at_path(self, path: &Path) -> Self {
        match self {
            Self::Stream(source) => Self::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    #[default]
    Text,
    Json,
}

impl TableFormat {
    pub fn from_extension(path: &Path) -> Self {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

/// Parallel table columns as they sit on disk.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TableColumns {
    pub index: Vec<i64>,
    pub real: Vec<f64>,
    pub imag: Vec<f64>,
}

impl TableColumns {
    pub fn with_capacity(rows: usize) -> Self {
        Self {
            index: Vec::with_capacity(rows),
            real: Vec::with_capacity(rows),
            imag: Vec::with_capacity(rows),
        }
    }

    pub fn push(&mut self, index: i64, real: f64, imag: f64) {
        self.index.push(index);
        self.real.push(real);
        self.imag.push(imag);
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn check_lengths(&self) -> Result<(), TableError> {
        let index = self.index.len();
        if self.real.len() == index && self.imag.len() == index {
            return Ok(());
        }
        Err(TableError::ColumnLengthMismatch {
            index,
            real: self.real.len(),
            imag: self.imag.len(),
        })
    }
}

/// Reads and writes [`TableColumns`] over a byte stream. Stream failures are
/// reported as [`TableError::Stream`]; path-level helpers attach the path.
pub trait TableCodec {
    fn read_columns(&self, reader: &mut dyn BufRead) -> Result<TableColumns, TableError>;

    fn write_columns(
        &self,
        columns: &TableColumns,
        writer: &mut dyn Write,
    ) -> Result<(), TableError>;
}

pub fn codec_for(format: TableFormat, options: &CodecOptions) -> Box<dyn TableCodec> {
    match format {
        TableFormat::Text => Box::new(TextTableCodec::new(options.precision, options.header)),
        TableFormat::Json => Box::new(JsonTableCodec {
            pretty: options.pretty,
        }),
    }
}

/// Build a coefficient set from decoded table rows.
///
/// Bounds are inferred as the largest decoded degree and order. Rows that
/// repeat an index overwrite earlier ones.
pub fn decode_table(columns: &TableColumns) -> Result<ComplexCoefficientSet, TableError> {
    columns.check_lengths()?;
    if columns.is_empty() {
        return Err(TableError::Empty);
    }

    let mut degrees = Vec::with_capacity(columns.len());
    let mut orders = Vec::with_capacity(columns.len());
    for (row, &index) in columns.index.iter().enumerate() {
        let decoded =
            decode_dense_index(index).ok_or(TableError::NonPositiveIndex { row, index })?;
        if decoded.order < 0 {
            return Err(TableError::NegativeOrder {
                row,
                index,
                degree: decoded.degree,
                order: decoded.order,
            });
        }
        degrees.push(decoded.degree as usize);
        orders.push(decoded.order as usize);
    }

    let max_degree = degrees.iter().copied().max().unwrap_or(0);
    let max_order = orders.iter().copied().max().unwrap_or(0);
    let bounds = CoefficientBounds::with_orders(max_degree, max_order)
        .map_err(CoefficientSetError::from)?;
    if !bounds.is_full_triangle() {
        tracing::warn!(
            max_degree,
            max_order,
            "decoded coefficient table is truncated in order; power spectra cannot be reduced from it"
        );
    }

    let offsets = bounds
        .offsets_of(&degrees, &orders)
        .map_err(CoefficientSetError::from)?;
    let mut set = ComplexCoefficientSet::zeros_with_bounds(bounds)?;
    let values = set.as_mut_slice();
    for ((offset, &real), &imag) in offsets.into_iter().zip(&columns.real).zip(&columns.imag) {
        values[offset - 1] = Complex64::new(real, imag);
    }

    tracing::debug!(
        rows = columns.len(),
        max_degree,
        max_order,
        "decoded coefficient table"
    );
    Ok(set)
}

/// One row per stored coefficient, sorted by dense index.
pub fn encode_table<T, S>(set: &CoefficientSet<T, S>) -> TableColumns
where
    T: ComplexFloat<Real = f64>,
    S: AsRef<[T]>,
{
    let mut rows: Vec<(i64, T)> = set
        .iter()
        .map(|(degree, order, &value)| (dense_index(degree, order), value))
        .collect();
    rows.sort_unstable_by_key(|(index, _)| *index);

    let mut columns = TableColumns::with_capacity(rows.len());
    for (index, value) in rows {
        columns.push(index, value.re(), value.im());
    }
    columns
}

/// Decode a table from a caller-owned reader; the reader stays open.
pub fn read_table_from(
    reader: &mut dyn BufRead,
    format: TableFormat,
    options: &CodecOptions,
) -> Result<ComplexCoefficientSet, TableError> {
    let columns = codec_for(format, options).read_columns(reader)?;
    decode_table(&columns)
}

/// Encode into a caller-owned writer; flushing and closing stay with the caller.
pub fn write_table_to<T, S>(
    set: &CoefficientSet<T, S>,
    writer: &mut dyn Write,
    format: TableFormat,
    options: &CodecOptions,
) -> Result<(), TableError>
where
    T: ComplexFloat<Real = f64>,
    S: AsRef<[T]>,
{
    codec_for(format, options).write_columns(&encode_table(set), writer)
}

pub fn read_columns(path: &Path, options: &CodecOptions) -> Result<TableColumns, TableError> {
    let file = File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    codec_for(options.format_for(path), options)
        .read_columns(&mut reader)
        .map_err(|error| error.at_path(path))
}

/// Open `path`, decode it, and close the handle on every exit path.
pub fn read_table(path: &Path, options: &CodecOptions) -> Result<ComplexCoefficientSet, TableError> {
    let columns = read_columns(path, options)?;
    tracing::debug!(path = %path.display(), rows = columns.len(), "read coefficient table");
    decode_table(&columns)
}

/// Create or truncate `path` and write the encoded set. The buffered writer is
/// flushed explicitly so late write failures surface as errors.
pub fn write_table<T, S>(
    path: &Path,
    set: &CoefficientSet<T, S>,
    options: &CodecOptions,
) -> Result<(), TableError>
where
    T: ComplexFloat<Real = f64>,
    S: AsRef<[T]>,
{
    let io_error = |source| TableError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    let columns = encode_table(set);
    codec_for(options.format_for(path), options)
        .write_columns(&columns, &mut writer)
        .map_err(|error| error.at_path(path))?;
    writer.flush().map_err(io_error)?;

    tracing::debug!(path = %path.display(), rows = columns.len(), "wrote coefficient table");
    Ok(())
}

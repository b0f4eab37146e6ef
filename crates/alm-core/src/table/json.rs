use super::{TableCodec, TableColumns, TableError};
use std::io::{BufRead, Write};

/// `{"index": [...], "real": [...], "imag": [...]}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonTableCodec {
    pub pretty: bool,
}

impl TableCodec for JsonTableCodec {
    fn read_columns(&self, reader: &mut dyn BufRead) -> Result<TableColumns, TableError> {
        let columns: TableColumns = serde_json::from_reader(reader).map_err(|error| {
            if error.is_io() {
                TableError::Stream(error.into())
            } else {
                TableError::Json(error)
            }
        })?;
        columns.check_lengths()?;
        Ok(columns)
    }

    fn write_columns(
        &self,
        columns: &TableColumns,
        writer: &mut dyn Write,
    ) -> Result<(), TableError> {
        columns.check_lengths()?;

        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, columns)
        } else {
            serde_json::to_writer(&mut *writer, columns)
        };
        written.map_err(|error| {
            if error.is_io() {
                TableError::Stream(error.into())
            } else {
                TableError::Json(error)
            }
        })?;
        writeln!(writer).map_err(TableError::Stream)
    }
}

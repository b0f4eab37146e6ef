use super::serialization::format_scientific;
use super::{TableCodec, TableColumns, TableError};
use crate::common::constants::{DEFAULT_FLOAT_PRECISION, TABLE_COLUMN_NAMES};
use std::io::{BufRead, Write};

/// Whitespace-separated `index real imag` rows. Blank lines and lines
/// starting with `#` are skipped on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextTableCodec {
    precision: usize,
    header: bool,
}

impl Default for TextTableCodec {
    fn default() -> Self {
        Self::new(DEFAULT_FLOAT_PRECISION, true)
    }
}

impl TextTableCodec {
    pub const fn new(precision: usize, header: bool) -> Self {
        Self { precision, header }
    }
}

impl TableCodec for TextTableCodec {
    fn read_columns(&self, reader: &mut dyn BufRead) -> Result<TableColumns, TableError> {
        let mut columns = TableColumns::default();
        for (line_index, line) in reader.lines().enumerate() {
            let line = line.map_err(TableError::Stream)?;
            let line_number = line_index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (index, real, imag) = parse_row(trimmed, line_number)?;
            columns.push(index, real, imag);
        }
        Ok(columns)
    }

    fn write_columns(
        &self,
        columns: &TableColumns,
        writer: &mut dyn Write,
    ) -> Result<(), TableError> {
        columns.check_lengths()?;

        let width = self.precision + 8;
        if self.header {
            writeln!(
                writer,
                "# {:>10} {:>width$} {:>width$}",
                TABLE_COLUMN_NAMES[0],
                TABLE_COLUMN_NAMES[1],
                TABLE_COLUMN_NAMES[2],
            )
            .map_err(TableError::Stream)?;
        }

        for ((index, &real), &imag) in columns.index.iter().zip(&columns.real).zip(&columns.imag) {
            writeln!(
                writer,
                "  {:>10} {} {}",
                index,
                format_scientific(real, width, self.precision),
                format_scientific(imag, width, self.precision),
            )
            .map_err(TableError::Stream)?;
        }
        Ok(())
    }
}

fn parse_row(line: &str, line_number: usize) -> Result<(i64, f64, f64), TableError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(malformed(
            line_number,
            format!("expected 3 columns (index real imag), found {}", tokens.len()),
        ));
    }

    let index = tokens[0].parse::<i64>().map_err(|error| {
        malformed(
            line_number,
            format!("index '{}' is not an integer: {}", tokens[0], error),
        )
    })?;
    let real = parse_float(tokens[1], "real", line_number)?;
    let imag = parse_float(tokens[2], "imag", line_number)?;
    Ok((index, real, imag))
}

fn parse_float(token: &str, column: &str, line_number: usize) -> Result<f64, TableError> {
    // Fortran-style exponents show up in tables written by older tools.
    let normalized = token.replace(['d', 'D'], "e");
    normalized.parse::<f64>().map_err(|error| {
        malformed(
            line_number,
            format!("{column} value '{token}' is not a number: {error}"),
        )
    })
}

fn malformed(line: usize, message: String) -> TableError {
    TableError::MalformedRow { line, message }
}

#[cfg(test)]
mod tests {
    use super::TextTableCodec;
    use crate::table::{TableCodec, TableColumns, TableError};
    use std::io::Cursor;

    fn read(source: &str) -> Result<TableColumns, TableError> {
        let mut reader = Cursor::new(source.as_bytes());
        TextTableCodec::default().read_columns(&mut reader)
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let columns = read(
            "# index real imag\n\n  1  1.5  0.0\n3 -2.0e-3 4.25D1\n   \n4 0 -1\n",
        )
        .expect("table should parse");

        assert_eq!(columns.index, vec![1, 3, 4]);
        assert_eq!(columns.real, vec![1.5, -2.0e-3, 0.0]);
        assert_eq!(columns.imag, vec![0.0, 42.5, -1.0]);
    }

    #[test]
    fn malformed_rows_report_their_line_number() {
        let error = read("1 0.0 0.0\n3 0.0\n").expect_err("short row should fail");
        assert!(
            matches!(error, TableError::MalformedRow { line: 2, .. }),
            "unexpected error {error:?}"
        );

        let error = read("# header\n1.5 0.0 0.0\n").expect_err("float index should fail");
        assert!(matches!(error, TableError::MalformedRow { line: 2, .. }));

        let error = read("1 abc 0.0\n").expect_err("bad float should fail");
        let message = error.to_string();
        assert!(message.contains("real value 'abc'"), "message was {message}");
    }

    #[test]
    fn written_rows_parse_back_exactly() {
        let mut columns = TableColumns::default();
        columns.push(1, 0.1, -0.0);
        columns.push(3, 1.0 / 3.0, 2.0e-300);
        columns.push(4, -123_456.789, 6.02e23);

        let mut buffer = Vec::new();
        TextTableCodec::default()
            .write_columns(&columns, &mut buffer)
            .expect("table should be written");
        let rendered = String::from_utf8(buffer).expect("output is utf-8");
        assert!(rendered.starts_with("#      index"));

        let parsed = read(&rendered).expect("rendered table should parse");
        assert_eq!(parsed, columns);
    }

    #[test]
    fn header_can_be_disabled() {
        let mut columns = TableColumns::default();
        columns.push(1, 1.0, 0.0);

        let mut buffer = Vec::new();
        TextTableCodec::new(3, false)
            .write_columns(&columns, &mut buffer)
            .expect("table should be written");

        assert_eq!(
            String::from_utf8(buffer).expect("output is utf-8"),
            "           1     1.000E0     0.000E0\n"
        );
    }
}

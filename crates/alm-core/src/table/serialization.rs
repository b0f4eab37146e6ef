use crate::common::constants::SPECTRUM_COLUMN_NAMES;
use std::fs;
use std::path::Path;

pub fn format_scientific(value: f64, width: usize, precision: usize) -> String {
    format!(
        "{value:>width$.precision$E}",
        width = width,
        precision = precision
    )
}

/// `l  C_l` rows under a `#` header, one per degree, each ending in `\n`.
pub fn render_spectrum_text(spectrum: &[f64], precision: usize) -> String {
    let width = precision + 8;
    let mut rendered = format!(
        "# {:>6} {:>width$}\n",
        SPECTRUM_COLUMN_NAMES[0], SPECTRUM_COLUMN_NAMES[1]
    );
    for (degree, value) in spectrum.iter().enumerate() {
        rendered.push_str(&format!(
            "  {:>6} {}\n",
            degree,
            format_scientific(*value, width, precision)
        ));
    }
    rendered
}

/// Create or truncate `path` with the rendered spectrum.
pub fn write_spectrum(path: &Path, spectrum: &[f64], precision: usize) -> std::io::Result<()> {
    fs::write(path, render_spectrum_text(spectrum, precision))
}

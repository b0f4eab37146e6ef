use super::constants::DEFAULT_FLOAT_PRECISION;
use crate::table::TableFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Table codec settings, optionally loaded from a JSON file:
///
/// ```json
/// { "format": "text", "precision": 12, "header": false, "pretty": true }
/// ```
///
/// Missing keys fall back to [`CodecOptions::default`]. A missing `format`
/// means "infer from the file extension". `precision` and `header` apply to
/// text tables, `pretty` to JSON tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CodecOptions {
    pub format: Option<TableFormat>,
    pub precision: usize,
    pub header: bool,
    pub pretty: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            format: None,
            precision: DEFAULT_FLOAT_PRECISION,
            header: true,
            pretty: false,
        }
    }
}

impl CodecOptions {
    pub fn format_for(&self, path: &Path) -> TableFormat {
        self.format
            .unwrap_or_else(|| TableFormat::from_extension(path))
    }

    pub fn with_format(self, format: Option<TableFormat>) -> Self {
        Self {
            format: format.or(self.format),
            ..self
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodecOptionsError {
    #[error("failed to read codec options '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse codec options '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_codec_options(path: impl AsRef<Path>) -> Result<CodecOptions, CodecOptionsError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| CodecOptionsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| CodecOptionsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

use crate::common::config::CodecOptionsError;
use crate::harmonics::{CoefficientSetError, IndexingError, SpectrumError};
use crate::table::TableError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AlmResult<T> = Result<T, AlmError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlmErrorCategory {
    Success,
    InputValidationError,
    IoSystemError,
    ComputationError,
    InternalError,
}

impl AlmErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::ComputationError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ComputationError => "ComputationError",
            Self::InternalError => "InternalError",
        }
    }

    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Success)
    }
}

/// Workspace-wide error with a stable category, a dotted placeholder code
/// (`INPUT.ALM_BOUNDS`, `IO.TABLE_READ`, ...) and a human message.
///
/// Component errors keep their own typed enums; this is the shape they are
/// flattened into at the process boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlmError {
    category: AlmErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl AlmError {
    pub fn new(
        category: AlmErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            AlmErrorCategory::InputValidationError,
            placeholder,
            message,
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(AlmErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn computation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(AlmErrorCategory::ComputationError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(AlmErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> AlmErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        let severity = if self.category.is_fatal() {
            "ERROR"
        } else {
            "INFO"
        };
        format!("{}: [{}] {}", severity, self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> Option<String> {
        self.category
            .is_fatal()
            .then(|| format!("FATAL EXIT CODE: {}", self.exit_code()))
    }
}

impl Display for AlmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for AlmError {}

impl From<IndexingError> for AlmError {
    fn from(error: IndexingError) -> Self {
        let placeholder = match error {
            IndexingError::InvalidBounds { .. } => "INPUT.ALM_BOUNDS",
            IndexingError::Overflow { .. } => "INPUT.ALM_BOUNDS_OVERFLOW",
            IndexingError::ColumnLengthMismatch { .. } => "INPUT.ALM_INDEX_COLUMNS",
        };
        Self::input_validation(placeholder, error.to_string())
    }
}

impl From<CoefficientSetError> for AlmError {
    fn from(error: CoefficientSetError) -> Self {
        let message = error.to_string();
        let placeholder = match error {
            CoefficientSetError::Bounds(inner) => return inner.into(),
            CoefficientSetError::LengthMismatch { .. } => "INPUT.ALM_LENGTH",
            CoefficientSetError::OutOfRange { .. } => "INPUT.ALM_OUT_OF_RANGE",
            CoefficientSetError::IncompatiblePair { .. } => "INPUT.ALM_INCOMPATIBLE",
            CoefficientSetError::FilterTooShort { .. } => "INPUT.ALM_FILTER",
        };
        Self::input_validation(placeholder, message)
    }
}

impl From<SpectrumError> for AlmError {
    fn from(error: SpectrumError) -> Self {
        let placeholder = match error {
            SpectrumError::DegreeMismatch { .. } => "INPUT.SPECTRUM_DEGREE",
            SpectrumError::OrderMismatch { .. } => "INPUT.SPECTRUM_ORDER",
            SpectrumError::OrderBelowDegree { .. } => "INPUT.SPECTRUM_TRUNCATED",
        };
        Self::input_validation(placeholder, error.to_string())
    }
}

impl From<TableError> for AlmError {
    fn from(error: TableError) -> Self {
        let message = error.to_string();
        match error {
            TableError::Coefficients(inner) => inner.into(),
            TableError::Io { .. } | TableError::Stream(_) => Self::io_system("IO.TABLE", message),
            TableError::Json(_) => Self::input_validation("INPUT.TABLE_JSON", message),
            TableError::NonPositiveIndex { .. } | TableError::NegativeOrder { .. } => {
                Self::input_validation("INPUT.TABLE_INDEX", message)
            }
            TableError::ColumnLengthMismatch { .. }
            | TableError::Empty
            | TableError::MalformedRow { .. } => {
                Self::input_validation("INPUT.TABLE_SHAPE", message)
            }
        }
    }
}

impl From<CodecOptionsError> for AlmError {
    fn from(error: CodecOptionsError) -> Self {
        let message = error.to_string();
        match error {
            CodecOptionsError::Read { .. } => Self::io_system("IO.CONFIG_READ", message),
            CodecOptionsError::Parse { .. } => Self::input_validation("INPUT.CONFIG_PARSE", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AlmError, AlmErrorCategory};
    use crate::harmonics::{IndexingError, SpectrumError};

    #[test]
    fn exit_mapping_is_stable() {
        let cases = [
            (AlmErrorCategory::Success, 0, "Success"),
            (
                AlmErrorCategory::InputValidationError,
                2,
                "InputValidationError",
            ),
            (AlmErrorCategory::IoSystemError, 3, "IoSystemError"),
            (AlmErrorCategory::ComputationError, 4, "ComputationError"),
            (AlmErrorCategory::InternalError, 5, "InternalError"),
        ];

        for (category, exit_code, name) in cases {
            assert_eq!(category.exit_code(), exit_code);
            assert_eq!(category.as_str(), name);
        }
    }

    #[test]
    fn fatal_error_renders_diagnostic_lines() {
        let error = AlmError::input_validation("INPUT.ALM_BOUNDS", "max_order 3 exceeds max_degree 2");

        assert_eq!(error.exit_code(), 2);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [INPUT.ALM_BOUNDS] max_order 3 exceeds max_degree 2"
        );
        assert_eq!(error.fatal_exit_line().as_deref(), Some("FATAL EXIT CODE: 2"));
    }

    #[test]
    fn component_errors_keep_distinct_placeholders() {
        let bounds: AlmError = IndexingError::InvalidBounds {
            max_degree: 2,
            max_order: 3,
        }
        .into();
        let degree: AlmError = SpectrumError::DegreeMismatch { left: 2, right: 3 }.into();
        let truncated: AlmError = SpectrumError::OrderBelowDegree {
            max_order: 1,
            max_degree: 2,
        }
        .into();

        assert_eq!(bounds.placeholder(), "INPUT.ALM_BOUNDS");
        assert_eq!(degree.placeholder(), "INPUT.SPECTRUM_DEGREE");
        assert_eq!(truncated.placeholder(), "INPUT.SPECTRUM_TRUNCATED");
        assert_eq!(degree.category(), AlmErrorCategory::InputValidationError);
    }
}

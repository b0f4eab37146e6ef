pub mod coefficients;
pub mod indexing;
pub mod spectrum;

mod ops;

pub use coefficients::{CoefficientSet, CoefficientSetError, ComplexCoefficientSet};
pub use indexing::{
    CoefficientBounds, DecodedIndex, IndexingError, decode_dense_index, dense_index,
    number_of_coefficients,
};
pub use spectrum::{PowerSpectrum, PowerSpectrumApi, SpectrumError, auto_spectrum, dot, reduce};

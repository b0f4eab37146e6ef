pub mod errors;

pub use errors::{AlmError, AlmErrorCategory, AlmResult};

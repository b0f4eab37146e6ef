//! Spherical-harmonic coefficient sets (a_lm) in triangular packed storage,
//! angular power spectra derived from them, and the three-column table
//! format they are persisted in.

pub mod common;
pub mod domain;
pub mod harmonics;
pub mod numerics;
pub mod table;

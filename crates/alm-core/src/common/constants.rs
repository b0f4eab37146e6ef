//! Shared constants for coefficient tables and the sky-map collaborators
//! that produce or consume them.

/// Sentinel written into map pixels that carry no data.
pub const UNSEEN: f64 = -1.637_5e30;

/// Mantissa digits after the decimal point in written tables; 16 keeps an
/// `f64` exact through a text round trip.
pub const DEFAULT_FLOAT_PRECISION: usize = 16;

pub const TABLE_COLUMN_NAMES: [&str; 3] = ["index", "real", "imag"];
pub const SPECTRUM_COLUMN_NAMES: [&str; 2] = ["l", "cl"];

pub const ARCMIN_PER_RADIAN: f64 = 10_800.0 / std::f64::consts::PI;

#[cfg(test)]
mod tests {
    use super::{ARCMIN_PER_RADIAN, DEFAULT_FLOAT_PRECISION, TABLE_COLUMN_NAMES, UNSEEN};

    #[test]
    fn constants_match_reference_values() {
        assert_eq!(UNSEEN, -1.6375e30);
        assert_eq!(DEFAULT_FLOAT_PRECISION, 16);
        assert_eq!(TABLE_COLUMN_NAMES, ["index", "real", "imag"]);
        assert!((ARCMIN_PER_RADIAN - 3437.746_770_784_939).abs() < 1.0e-9);
    }
}

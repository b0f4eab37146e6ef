/// Running Kahan-compensated sum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompensatedSum {
    sum: f64,
    correction: f64,
}

impl CompensatedSum {
    pub const fn new() -> Self {
        Self {
            sum: 0.0,
            correction: 0.0,
        }
    }

    pub fn add(&mut self, value: f64) {
        let corrected = value - self.correction;
        let next = self.sum + corrected;
        self.correction = (next - self.sum) - corrected;
        self.sum = next;
    }

    pub const fn value(&self) -> f64 {
        self.sum
    }
}

pub fn stable_sum(values: &[f64]) -> f64 {
    let mut accumulator = CompensatedSum::new();
    for &value in values {
        accumulator.add(value);
    }
    accumulator.value()
}

pub fn gaussian_beam_window(max_degree: usize, fwhm_radians: f64) -> Vec<f64> {
    let sigma = fwhm_radians / (8.0 * 2.0_f64.ln()).sqrt();
    let sigma_squared = sigma * sigma;
    (0..=max_degree)
        .map(|degree| {
            let degree = degree as f64;
            (-0.5 * degree * (degree + 1.0) * sigma_squared).exp()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{CompensatedSum, gaussian_beam_window, stable_sum};

    #[test]
    fn compensated_sum_recovers_small_terms() {
        let mut values = vec![1.0e16];
        values.extend(std::iter::repeat_n(1.0, 1000));
        values.push(-1.0e16);

        assert_eq!(stable_sum(&values), 1000.0);
    }

    #[test]
    fn empty_accumulator_is_zero() {
        assert_eq!(CompensatedSum::new().value(), 0.0);
        assert_eq!(stable_sum(&[]), 0.0);
    }

    #[test]
    fn gaussian_window_starts_at_unity_and_decays() {
        let window = gaussian_beam_window(64, 30.0_f64.to_radians() / 60.0);

        assert_eq!(window.len(), 65);
        assert_eq!(window[0], 1.0);
        assert!(window.windows(2).all(|pair| pair[1] < pair[0]));
        assert!(window[64] > 0.0);
    }

    #[test]
    fn zero_width_window_is_flat() {
        let window = gaussian_beam_window(8, 0.0);
        assert!(window.iter().all(|value| *value == 1.0));
    }
}

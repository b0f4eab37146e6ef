use super::coefficients::CoefficientSet;
use crate::numerics::CompensatedSum;
use num_complex::ComplexFloat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SpectrumError {
    #[error("coefficient sets have different max_degree: {left} vs {right}")]
    DegreeMismatch { left: usize, right: usize },
    #[error("coefficient sets have different max_order: {left} vs {right}")]
    OrderMismatch { left: usize, right: usize },
    #[error(
        "max_order {max_order} of the first set is below max_degree {max_degree} of the second; truncated sets cannot be reduced"
    )]
    OrderBelowDegree { max_order: usize, max_degree: usize },
}

pub trait PowerSpectrumApi {
    fn reduce<T, SA, SB>(
        &self,
        left: &CoefficientSet<T, SA>,
        right: &CoefficientSet<T, SB>,
    ) -> Result<Vec<f64>, SpectrumError>
    where
        T: ComplexFloat<Real = f64>,
        SA: AsRef<[T]>,
        SB: AsRef<[T]>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerSpectrum;

impl PowerSpectrumApi for PowerSpectrum {
    fn reduce<T, SA, SB>(
        &self,
        left: &CoefficientSet<T, SA>,
        right: &CoefficientSet<T, SB>,
    ) -> Result<Vec<f64>, SpectrumError>
    where
        T: ComplexFloat<Real = f64>,
        SA: AsRef<[T]>,
        SB: AsRef<[T]>,
    {
        check_reducible(left, right)?;

        let max_degree = left.max_degree();
        let left_values = left.as_slice();
        let right_values = right.as_slice();
        let bounds = left.bounds();

        let mut spectrum = Vec::with_capacity(max_degree + 1);
        for degree in 0..=max_degree {
            let mut accumulator = CompensatedSum::new();
            for order in 1..=degree {
                let slot = bounds.slot_of(degree, order);
                accumulator.add(2.0 * cross_power(left_values[slot], right_values[slot]));
            }
            let slot = bounds.slot_of(degree, 0);
            accumulator.add(cross_power(left_values[slot], right_values[slot]));

            spectrum.push(accumulator.value() / (2 * degree + 1) as f64);
        }

        Ok(spectrum)
    }
}

/// Cross power spectrum `C_l = (1 / (2l + 1)) * sum_m a_lm * conj(b_lm)` over
/// `-l..=l`, with the negative orders folded in by conjugate symmetry.
///
/// Rejects, in order: different `max_degree`, different `max_order`, and a
/// first-set `max_order` smaller than the second-set `max_degree`.
pub fn reduce<T, SA, SB>(
    left: &CoefficientSet<T, SA>,
    right: &CoefficientSet<T, SB>,
) -> Result<Vec<f64>, SpectrumError>
where
    T: ComplexFloat<Real = f64>,
    SA: AsRef<[T]>,
    SB: AsRef<[T]>,
{
    PowerSpectrum.reduce(left, right)
}

pub fn auto_spectrum<T, S>(set: &CoefficientSet<T, S>) -> Result<Vec<f64>, SpectrumError>
where
    T: ComplexFloat<Real = f64>,
    S: AsRef<[T]>,
{
    reduce(set, set)
}

/// Real-field inner product `sum_l sum_{m=-l..l} a_lm * conj(b_lm)`.
///
/// Needs matching bounds but, unlike [`reduce`], accepts truncated sets.
pub fn dot<T, SA, SB>(
    left: &CoefficientSet<T, SA>,
    right: &CoefficientSet<T, SB>,
) -> Result<f64, SpectrumError>
where
    T: ComplexFloat<Real = f64>,
    SA: AsRef<[T]>,
    SB: AsRef<[T]>,
{
    check_matching_bounds(left, right)?;

    let mut accumulator = CompensatedSum::new();
    for ((_, order, &lhs), &rhs) in left.iter().zip(right.as_slice()) {
        let weight = if order == 0 { 1.0 } else { 2.0 };
        accumulator.add(weight * cross_power(lhs, rhs));
    }
    Ok(accumulator.value())
}

fn cross_power<T>(lhs: T, rhs: T) -> f64
where
    T: ComplexFloat<Real = f64>,
{
    (lhs * rhs.conj()).re()
}

fn check_matching_bounds<T, SA, SB>(
    left: &CoefficientSet<T, SA>,
    right: &CoefficientSet<T, SB>,
) -> Result<(), SpectrumError>
where
    SA: AsRef<[T]>,
    SB: AsRef<[T]>,
{
    if left.max_degree() != right.max_degree() {
        return Err(SpectrumError::DegreeMismatch {
            left: left.max_degree(),
            right: right.max_degree(),
        });
    }
    if left.max_order() != right.max_order() {
        return Err(SpectrumError::OrderMismatch {
            left: left.max_order(),
            right: right.max_order(),
        });
    }
    Ok(())
}

fn check_reducible<T, SA, SB>(
    left: &CoefficientSet<T, SA>,
    right: &CoefficientSet<T, SB>,
) -> Result<(), SpectrumError>
where
    SA: AsRef<[T]>,
    SB: AsRef<[T]>,
{
    check_matching_bounds(left, right)?;
    // Compares across the two sets; with the checks above this only admits
    // full triangles.
    if left.max_order() < right.max_degree() {
        return Err(SpectrumError::OrderBelowDegree {
            max_order: left.max_order(),
            max_degree: right.max_degree(),
        });
    }
    Ok(())
}

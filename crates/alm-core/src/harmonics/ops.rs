use super::coefficients::{CoefficientSet, CoefficientSetError};
use std::ops::{AddAssign, Mul, MulAssign, SubAssign};

impl<T, S> CoefficientSet<T, S>
where
    T: Copy,
    S: AsRef<[T]> + AsMut<[T]>,
{
    /// Multiply every `a_lm` by `filter[l]`, e.g. a beam or pixel window.
    pub fn apply_degree_filter(&mut self, filter: &[f64]) -> Result<(), CoefficientSetError>
    where
        T: Mul<f64, Output = T>,
    {
        let required = self.max_degree() + 1;
        if filter.len() < required {
            return Err(CoefficientSetError::FilterTooShort {
                required,
                actual: filter.len(),
            });
        }

        let bounds = self.bounds();
        for ((degree, _), value) in bounds.pairs().zip(self.as_mut_slice()) {
            *value = *value * filter[degree];
        }
        Ok(())
    }

    pub fn add_assign_set<U>(&mut self, other: &CoefficientSet<T, U>) -> Result<(), CoefficientSetError>
    where
        T: AddAssign,
        U: AsRef<[T]>,
    {
        self.zip_apply(other, |lhs, rhs| *lhs += rhs)
    }

    pub fn sub_assign_set<U>(&mut self, other: &CoefficientSet<T, U>) -> Result<(), CoefficientSetError>
    where
        T: SubAssign,
        U: AsRef<[T]>,
    {
        self.zip_apply(other, |lhs, rhs| *lhs -= rhs)
    }

    pub fn scale(&mut self, factor: T)
    where
        T: MulAssign,
    {
        for value in self.as_mut_slice() {
            *value *= factor;
        }
    }

    fn zip_apply<U>(
        &mut self,
        other: &CoefficientSet<T, U>,
        mut apply: impl FnMut(&mut T, T),
    ) -> Result<(), CoefficientSetError>
    where
        U: AsRef<[T]>,
    {
        if !self.has_same_bounds(other) {
            return Err(self.incompatible_with(other));
        }

        for (lhs, &rhs) in self.as_mut_slice().iter_mut().zip(other.as_slice()) {
            apply(lhs, rhs);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::harmonics::coefficients::{CoefficientSet, CoefficientSetError, ComplexCoefficientSet};
    use num_complex::Complex64;

    #[test]
    fn degree_filter_scales_each_degree_block() {
        let storage: Vec<f64> = vec![1.0; 6];
        let mut set = CoefficientSet::<f64, _>::with_storage(2, 2, storage).expect("length matches");

        set.apply_degree_filter(&[1.0, 0.5, 0.25, 99.0])
            .expect("filter covers every degree");

        assert_eq!(set[(0, 0)], 1.0);
        assert_eq!(set[(1, 0)], 0.5);
        assert_eq!(set[(1, 1)], 0.5);
        assert_eq!(set[(2, 0)], 0.25);
        assert_eq!(set[(2, 2)], 0.25);
    }

    #[test]
    fn degree_filter_applies_to_complex_coefficients() {
        let mut set = ComplexCoefficientSet::zeros(1, 1).expect("bounds should be valid");
        set[(1, 1)] = Complex64::new(2.0, -4.0);

        set.apply_degree_filter(&[1.0, 0.5]).expect("filter covers every degree");
        assert_eq!(set[(1, 1)], Complex64::new(1.0, -2.0));
    }

    #[test]
    fn short_filter_is_rejected() {
        let mut set = CoefficientSet::<f64>::zeros(3, 3).expect("bounds should be valid");
        assert_eq!(
            set.apply_degree_filter(&[1.0, 1.0]),
            Err(CoefficientSetError::FilterTooShort {
                required: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn set_arithmetic_requires_identical_bounds() {
        let mut left = ComplexCoefficientSet::zeros(2, 2).expect("bounds should be valid");
        let mut right = ComplexCoefficientSet::zeros(2, 2).expect("bounds should be valid");
        left[(2, 1)] = Complex64::new(1.0, 1.0);
        right[(2, 1)] = Complex64::new(0.5, -1.0);

        left.add_assign_set(&right).expect("bounds match");
        assert_eq!(left[(2, 1)], Complex64::new(1.5, 0.0));

        left.sub_assign_set(&right).expect("bounds match");
        left.sub_assign_set(&right).expect("bounds match");
        assert_eq!(left[(2, 1)], Complex64::new(0.5, 2.0));

        left.scale(Complex64::new(0.0, 1.0));
        assert_eq!(left[(2, 1)], Complex64::new(-2.0, 0.5));

        let truncated = ComplexCoefficientSet::zeros(2, 1).expect("bounds should be valid");
        assert_eq!(
            left.add_assign_set(&truncated),
            Err(CoefficientSetError::IncompatiblePair {
                left_degree: 2,
                left_order: 2,
                right_degree: 2,
                right_order: 1,
            })
        );
    }
}

use super::indexing::{CoefficientBounds, IndexingError};
use num_complex::Complex64;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut, RangeInclusive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CoefficientSetError {
    #[error(transparent)]
    Bounds(#[from] IndexingError),
    #[error(
        "coefficient storage for max_degree={max_degree}, max_order={max_order} needs {expected} values, got {actual}"
    )]
    LengthMismatch {
        max_degree: usize,
        max_order: usize,
        expected: usize,
        actual: usize,
    },
    #[error(
        "coefficient (l={degree}, m={order}) is outside max_degree={max_degree}, max_order={max_order}"
    )]
    OutOfRange {
        degree: usize,
        order: usize,
        max_degree: usize,
        max_order: usize,
    },
    #[error(
        "coefficient sets are incompatible: ({left_degree}, {left_order}) vs ({right_degree}, {right_order})"
    )]
    IncompatiblePair {
        left_degree: usize,
        left_order: usize,
        right_degree: usize,
        right_order: usize,
    },
    #[error("degree filter needs at least {required} values, got {actual}")]
    FilterTooShort { required: usize, actual: usize },
}

/// Triangular a_lm array: one value per `(l, m)` with `0 <= m <= min(l, mmax)`.
///
/// `S` is the backing storage. An owned `Vec<T>` is the default; a borrowed
/// `&[T]` or `&mut [T]` wraps caller memory with the same addressing. Any
/// `Copy` element type is accepted. Complex values are the intended use,
/// real element types work but carry no imaginary part.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientSet<T, S = Vec<T>> {
    bounds: CoefficientBounds,
    storage: S,
    element: PhantomData<T>,
}

pub type ComplexCoefficientSet = CoefficientSet<Complex64>;

impl<T> CoefficientSet<T, Vec<T>>
where
    T: Copy + Default,
{
    pub fn zeros(max_degree: usize, max_order: usize) -> Result<Self, CoefficientSetError> {
        let bounds = CoefficientBounds::with_orders(max_degree, max_order)?;
        Self::zeros_with_bounds(bounds)
    }

    /// Fails with [`IndexingError::Overflow`] when the storage cannot be
    /// allocated, so oversized bounds decoded from input never abort.
    pub fn zeros_with_bounds(bounds: CoefficientBounds) -> Result<Self, CoefficientSetError> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(bounds.len())
            .map_err(|_| IndexingError::Overflow {
                max_degree: bounds.max_degree() as i64,
                max_order: bounds.max_order() as i64,
            })?;
        storage.resize(bounds.len(), T::default());

        Ok(Self {
            bounds,
            storage,
            element: PhantomData,
        })
    }
}

impl<T, S> CoefficientSet<T, S>
where
    S: AsRef<[T]>,
{
    pub fn from_storage(bounds: CoefficientBounds, storage: S) -> Result<Self, CoefficientSetError> {
        check_storage_len(bounds, storage.as_ref().len())?;
        Ok(Self {
            bounds,
            storage,
            element: PhantomData,
        })
    }

    pub fn with_storage(
        max_degree: usize,
        max_order: usize,
        storage: S,
    ) -> Result<Self, CoefficientSetError> {
        let bounds = CoefficientBounds::with_orders(max_degree, max_order)?;
        Self::from_storage(bounds, storage)
    }

    pub const fn bounds(&self) -> CoefficientBounds {
        self.bounds
    }

    pub const fn max_degree(&self) -> usize {
        self.bounds.max_degree()
    }

    pub const fn max_order(&self) -> usize {
        self.bounds.max_order()
    }

    pub const fn tval(&self) -> usize {
        self.bounds.tval()
    }

    pub const fn len(&self) -> usize {
        self.bounds.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub fn has_same_bounds<U: AsRef<[T]>>(&self, other: &CoefficientSet<T, U>) -> bool {
        self.bounds == other.bounds
    }

    /// 1-based offset of `(degree, order)`, unchecked.
    pub const fn offset_of(&self, degree: usize, order: usize) -> usize {
        self.bounds.offset_of(degree, order)
    }

    pub fn offsets_of(
        &self,
        degrees: &[usize],
        orders: &[usize],
    ) -> Result<Vec<usize>, IndexingError> {
        self.bounds.offsets_of(degrees, orders)
    }

    pub fn as_slice(&self) -> &[T] {
        self.storage.as_ref()
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn get(&self, degree: usize, order: usize) -> Option<&T> {
        self.bounds
            .contains(degree, order)
            .then(|| &self.storage.as_ref()[self.bounds.slot_of(degree, order)])
    }

    /// `(l, m, &a_lm)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        self.bounds
            .pairs()
            .zip(self.storage.as_ref())
            .map(|((degree, order), value)| (degree, order, value))
    }

    /// Values of degree `l` for orders `0..=min(l, mmax)`.
    pub fn degree_values(&self, degree: usize) -> impl Iterator<Item = &T> + '_ {
        let count = if degree <= self.max_degree() {
            degree.min(self.max_order()) + 1
        } else {
            0
        };
        (0..count).map(move |order| &self.storage.as_ref()[self.bounds.slot_of(degree, order)])
    }

    pub fn degrees(&self) -> RangeInclusive<usize> {
        0..=self.max_degree()
    }

    pub fn orders(&self) -> RangeInclusive<usize> {
        0..=self.max_order()
    }

    fn out_of_range(&self, degree: usize, order: usize) -> CoefficientSetError {
        CoefficientSetError::OutOfRange {
            degree,
            order,
            max_degree: self.max_degree(),
            max_order: self.max_order(),
        }
    }

    pub(crate) fn incompatible_with<U: AsRef<[T]>>(
        &self,
        other: &CoefficientSet<T, U>,
    ) -> CoefficientSetError {
        CoefficientSetError::IncompatiblePair {
            left_degree: self.max_degree(),
            left_order: self.max_order(),
            right_degree: other.max_degree(),
            right_order: other.max_order(),
        }
    }
}

impl<T, S> CoefficientSet<T, S>
where
    S: AsRef<[T]> + AsMut<[T]>,
{
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.storage.as_mut()
    }

    pub fn get_mut(&mut self, degree: usize, order: usize) -> Option<&mut T> {
        if !self.bounds.contains(degree, order) {
            return None;
        }
        let slot = self.bounds.slot_of(degree, order);
        Some(&mut self.storage.as_mut()[slot])
    }

    pub fn set(&mut self, degree: usize, order: usize, value: T) -> Result<(), CoefficientSetError> {
        let error = self.out_of_range(degree, order);
        let slot = self.get_mut(degree, order).ok_or(error)?;
        *slot = value;
        Ok(())
    }

    /// Swap in new storage of the same length and hand back the old one.
    pub fn replace_storage(&mut self, storage: S) -> Result<S, CoefficientSetError> {
        check_storage_len(self.bounds, storage.as_ref().len())?;
        Ok(std::mem::replace(&mut self.storage, storage))
    }
}

impl<T, S> Index<(usize, usize)> for CoefficientSet<T, S>
where
    S: AsRef<[T]>,
{
    type Output = T;

    fn index(&self, (degree, order): (usize, usize)) -> &T {
        assert!(
            self.bounds.contains(degree, order),
            "coefficient (l={degree}, m={order}) is outside max_degree={}, max_order={}",
            self.max_degree(),
            self.max_order()
        );
        &self.storage.as_ref()[self.bounds.slot_of(degree, order)]
    }
}

impl<T, S> IndexMut<(usize, usize)> for CoefficientSet<T, S>
where
    S: AsRef<[T]> + AsMut<[T]>,
{
    fn index_mut(&mut self, (degree, order): (usize, usize)) -> &mut T {
        assert!(
            self.bounds.contains(degree, order),
            "coefficient (l={degree}, m={order}) is outside max_degree={}, max_order={}",
            self.max_degree(),
            self.max_order()
        );
        let slot = self.bounds.slot_of(degree, order);
        &mut self.storage.as_mut()[slot]
    }
}

fn check_storage_len(bounds: CoefficientBounds, actual: usize) -> Result<(), CoefficientSetError> {
    if actual == bounds.len() {
        return Ok(());
    }
    Err(CoefficientSetError::LengthMismatch {
        max_degree: bounds.max_degree(),
        max_order: bounds.max_order(),
        expected: bounds.len(),
        actual,
    })
}

#[cfg(test)]
mod tests {
    use super::{CoefficientSet, CoefficientSetError, ComplexCoefficientSet};
    use crate::harmonics::indexing::{CoefficientBounds, IndexingError};
    use num_complex::Complex64;

    #[test]
    fn zeros_allocates_the_packed_length() {
        let set = ComplexCoefficientSet::zeros(4, 2).expect("bounds should be valid");

        assert_eq!(set.len(), 12);
        assert_eq!(set.as_slice().len(), 12);
        assert_eq!(set.tval(), 9);
        assert!(set.as_slice().iter().all(|value| *value == Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn zeros_rejects_order_above_degree() {
        let error = ComplexCoefficientSet::zeros(2, 3).expect_err("mmax > lmax should fail");
        assert_eq!(
            error,
            CoefficientSetError::Bounds(IndexingError::InvalidBounds {
                max_degree: 2,
                max_order: 3
            })
        );
    }

    #[test]
    fn wrong_storage_length_is_rejected_for_every_shape() {
        for max_degree in 0..=6 {
            for max_order in 0..=max_degree {
                let bounds = CoefficientBounds::with_orders(max_degree, max_order)
                    .expect("bounds should be valid");
                for wrong in [0, bounds.len() - 1, bounds.len() + 1, bounds.len() * 2 + 3] {
                    if wrong == bounds.len() {
                        continue;
                    }
                    let error = CoefficientSet::<f64, _>::from_storage(bounds, vec![0.0; wrong])
                        .expect_err("length mismatch should fail");
                    assert_eq!(
                        error,
                        CoefficientSetError::LengthMismatch {
                            max_degree,
                            max_order,
                            expected: bounds.len(),
                            actual: wrong,
                        }
                    );
                }
            }
        }
    }

    #[test]
    fn borrowed_storage_shares_addressing_with_owned() {
        let mut backing = vec![Complex64::new(0.0, 0.0); 6];
        {
            let mut view = CoefficientSet::<Complex64, _>::with_storage(2, 2, backing.as_mut_slice())
                .expect("length matches");
            view[(2, 1)] = Complex64::new(1.5, -0.5);
            view.set(1, 1, Complex64::new(0.0, 2.0))
                .expect("coefficient is in range");
        }

        let owned = ComplexCoefficientSet::with_storage(2, 2, backing).expect("length matches");
        assert_eq!(owned[(2, 1)], Complex64::new(1.5, -0.5));
        assert_eq!(owned.get(1, 1), Some(&Complex64::new(0.0, 2.0)));
        assert_eq!(owned.as_slice()[owned.offset_of(2, 1) - 1], owned[(2, 1)]);
    }

    #[test]
    fn access_outside_bounds_is_reported() {
        let mut set = CoefficientSet::<f64>::zeros(3, 1).expect("bounds should be valid");

        assert_eq!(set.get(2, 2), None);
        assert_eq!(set.get(4, 0), None);
        assert_eq!(set.get(1, 2), None);
        assert_eq!(
            set.set(3, 2, 1.0),
            Err(CoefficientSetError::OutOfRange {
                degree: 3,
                order: 2,
                max_degree: 3,
                max_order: 1,
            })
        );
    }

    #[test]
    #[should_panic(expected = "outside max_degree=2")]
    fn index_operator_panics_outside_bounds() {
        let set = CoefficientSet::<f64>::zeros(2, 2).expect("bounds should be valid");
        let _value: f64 = set[(3, 0)];
    }

    #[test]
    fn replace_storage_preserves_the_length_invariant() {
        let mut set = CoefficientSet::<f64>::zeros(1, 1).expect("bounds should be valid");

        let previous = set
            .replace_storage(vec![1.0, 2.0, 3.0])
            .expect("same length is accepted");
        assert_eq!(previous, vec![0.0; 3]);
        assert_eq!(set[(1, 1)], 3.0);

        let error = set
            .replace_storage(vec![1.0; 4])
            .expect_err("longer storage is rejected");
        assert!(matches!(error, CoefficientSetError::LengthMismatch { .. }));
        assert_eq!(set.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn iteration_visits_every_pair_in_storage_order() {
        let storage: Vec<f64> = (0..7).map(f64::from).collect();
        let set = CoefficientSet::<f64, _>::with_storage(3, 1, storage).expect("length matches");

        let visited: Vec<(usize, usize, f64)> = set
            .iter()
            .map(|(degree, order, value)| (degree, order, *value))
            .collect();
        assert_eq!(
            visited,
            vec![
                (0, 0, 0.0),
                (1, 0, 1.0),
                (2, 0, 2.0),
                (3, 0, 3.0),
                (1, 1, 4.0),
                (2, 1, 5.0),
                (3, 1, 6.0),
            ]
        );

        let degree_three: Vec<f64> = set.degree_values(3).copied().collect();
        assert_eq!(degree_three, vec![3.0, 6.0]);
        assert_eq!(set.degree_values(4).count(), 0);
        assert_eq!(set.degrees(), 0..=3);
        assert_eq!(set.orders(), 0..=1);
    }

    #[test]
    fn owned_and_borrowed_sets_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<ComplexCoefficientSet>();
        assert_send_sync::<CoefficientSet<f64, &[f64]>>();
        assert_send_sync::<CoefficientSet<Complex64, &mut [Complex64]>>();
    }
}

//! Triangular packing of (degree, order) pairs into a flat coefficient array.
//!
//! Storage is order-major: for a fixed order `m` the degrees `m..=lmax` sit in
//! one contiguous block, blocks are laid out for `m = 0, 1, ..., mmax`. The
//! offset of `(l, m)` is `m * (2 * lmax + 1 - m) / 2 + 1 + l`, which only
//! depends on the lengths of the blocks before `m`. Those blocks are full
//! length whatever `mmax` is, so the same formula addresses truncated sets.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IndexingError {
    #[error("invalid coefficient bounds: max_degree={max_degree}, max_order={max_order}")]
    InvalidBounds { max_degree: i64, max_order: i64 },
    #[error("coefficient bounds max_degree={max_degree}, max_order={max_order} overflow the address space")]
    Overflow { max_degree: i64, max_order: i64 },
    #[error("degree/order column length mismatch: degrees={degrees}, orders={orders}")]
    ColumnLengthMismatch { degrees: usize, orders: usize },
}

/// Validated `(max_degree, max_order)` pair with the cached `tval = 2 * lmax + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoefficientBounds {
    max_degree: usize,
    max_order: usize,
    tval: usize,
    len: usize,
}

impl CoefficientBounds {
    /// `max_order = None` means a full triangle (`mmax == lmax`).
    pub fn new(max_degree: i64, max_order: Option<i64>) -> Result<Self, IndexingError> {
        let max_order = max_order.unwrap_or(max_degree);
        if max_degree < 0 || max_order < 0 || max_order > max_degree {
            return Err(IndexingError::InvalidBounds {
                max_degree,
                max_order,
            });
        }

        let overflow = IndexingError::Overflow {
            max_degree,
            max_order,
        };
        let lmax = usize::try_from(max_degree).map_err(|_| overflow)?;
        let mmax = usize::try_from(max_order).map_err(|_| overflow)?;
        // Slot arithmetic doubles offsets internally, so lengths stay below
        // isize::MAX.
        let len = packed_len(lmax, mmax)
            .filter(|&len| len <= isize::MAX as usize)
            .ok_or(overflow)?;
        let tval = lmax
            .checked_mul(2)
            .and_then(|doubled| doubled.checked_add(1))
            .ok_or(overflow)?;

        Ok(Self {
            max_degree: lmax,
            max_order: mmax,
            tval,
            len,
        })
    }

    pub fn full(max_degree: usize) -> Result<Self, IndexingError> {
        Self::with_orders(max_degree, max_degree)
    }

    pub fn with_orders(max_degree: usize, max_order: usize) -> Result<Self, IndexingError> {
        let max_degree = i64::try_from(max_degree).map_err(|_| IndexingError::Overflow {
            max_degree: i64::MAX,
            max_order: i64::MAX,
        })?;
        let max_order = i64::try_from(max_order).map_err(|_| IndexingError::Overflow {
            max_degree,
            max_order: i64::MAX,
        })?;
        Self::new(max_degree, Some(max_order))
    }

    pub const fn max_degree(&self) -> usize {
        self.max_degree
    }

    pub const fn max_order(&self) -> usize {
        self.max_order
    }

    pub const fn tval(&self) -> usize {
        self.tval
    }

    /// Number of stored coefficients.
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn is_full_triangle(&self) -> bool {
        self.max_order == self.max_degree
    }

    pub const fn contains(&self, degree: usize, order: usize) -> bool {
        degree <= self.max_degree && order <= self.max_order && order <= degree
    }

    /// 1-based position of `(degree, order)`.
    ///
    /// No bounds check: pairs outside [`Self::contains`] produce a value
    /// that does not address this set.
    pub const fn offset_of(&self, degree: usize, order: usize) -> usize {
        order * (self.tval - order) / 2 + 1 + degree
    }

    /// 0-based slot, `offset_of - 1`.
    pub const fn slot_of(&self, degree: usize, order: usize) -> usize {
        order * (self.tval - order) / 2 + degree
    }

    /// Element-wise [`Self::offset_of`] over parallel degree/order columns.
    pub fn offsets_of(
        &self,
        degrees: &[usize],
        orders: &[usize],
    ) -> Result<Vec<usize>, IndexingError> {
        if degrees.len() != orders.len() {
            return Err(IndexingError::ColumnLengthMismatch {
                degrees: degrees.len(),
                orders: orders.len(),
            });
        }

        Ok(degrees
            .iter()
            .zip(orders)
            .map(|(&degree, &order)| self.offset_of(degree, order))
            .collect())
    }

    /// `(degree, order)` pairs in storage order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let max_degree = self.max_degree;
        (0..=self.max_order)
            .flat_map(move |order| (order..=max_degree).map(move |degree| (degree, order)))
    }
}

pub fn number_of_coefficients(
    max_degree: i64,
    max_order: Option<i64>,
) -> Result<usize, IndexingError> {
    CoefficientBounds::new(max_degree, max_order).map(|bounds| bounds.len())
}

fn packed_len(max_degree: usize, max_order: usize) -> Option<usize> {
    let orders = max_order.checked_add(1)?;
    let triangle = orders.checked_mul(max_order.checked_add(2)?)? / 2;
    let rectangle = orders.checked_mul(max_degree - max_order)?;
    triangle.checked_add(rectangle)
}

/// Dense 1-based table index `l^2 + l + m + 1`.
pub fn dense_index(degree: usize, order: usize) -> i64 {
    let degree = degree as i64;
    degree * degree + degree + order as i64 + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedIndex {
    pub degree: i64,
    pub order: i64,
}

/// Inverse of [`dense_index`] over the full `-l..=l` range. Returns `None`
/// for indices below 1; a negative `order` is left to the caller to reject.
pub fn decode_dense_index(index: i64) -> Option<DecodedIndex> {
    if index < 1 {
        return None;
    }

    let degree = (index - 1).unsigned_abs().isqrt() as i64;
    let order = index - degree * degree - degree - 1;
    Some(DecodedIndex { degree, order })
}

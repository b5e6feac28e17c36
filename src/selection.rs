//! Row selections built on top of roaring bitmaps.

use std::fmt;

use roaring::RoaringBitmap;

/// Position of a row inside the table a filter was evaluated against.
pub type RowId = u32;

/// Borrowed iterator that yields [`RowId`] values in ascending order.
pub type RowIdIter<'a> = Box<dyn Iterator<Item = RowId> + Send + 'a>;

/// Ordered, duplicate-free set of row positions.
///
/// Selections never change after they are produced: every set operation
/// allocates a fresh result and leaves both operands untouched.
#[derive(Clone, Default, PartialEq)]
pub struct Selection {
    bitmap: RoaringBitmap,
}

impl Eq for Selection {}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Selection holding every row in `[0, rows)`.
    #[must_use]
    pub fn universe(rows: RowId) -> Self {
        let mut bitmap = RoaringBitmap::new();
        bitmap.insert_range(0..rows);
        Self { bitmap }
    }

    /// Applies `matches` to every row in `[0, rows)` in order and keeps the rows it accepts.
    pub fn from_fn<F>(rows: RowId, mut matches: F) -> Self
    where
        F: FnMut(usize) -> bool,
    {
        let mut bitmap = RoaringBitmap::new();
        for row in 0..rows {
            if matches(row as usize) {
                // rows are visited in ascending order, so push never rejects
                bitmap.push(row);
            }
        }
        Self { bitmap }
    }

    /// Returns the number of selected rows.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.bitmap.len()).unwrap_or(usize::MAX)
    }

    /// Returns true when no row is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bitmap.is_empty()
    }

    /// Returns true when `row` is selected.
    #[must_use]
    pub fn contains(&self, row: RowId) -> bool {
        self.bitmap.contains(row)
    }

    /// Iterates the selected rows in ascending order.
    pub fn iter(&self) -> RowIdIter<'_> {
        Box::new(self.bitmap.iter())
    }

    /// Collects the selected rows in ascending order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<RowId> {
        self.bitmap.iter().collect()
    }

    /// Smallest selected row.
    #[must_use]
    pub fn first(&self) -> Option<RowId> {
        self.bitmap.min()
    }

    /// Largest selected row.
    #[must_use]
    pub fn last(&self) -> Option<RowId> {
        self.bitmap.max()
    }

    /// Rows present in both selections.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let bitmap = &self.bitmap & &other.bitmap;
        Self { bitmap }
    }

    /// Rows present in either selection.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let bitmap = &self.bitmap | &other.bitmap;
        Self { bitmap }
    }

    /// Rows present in `self` but not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        let bitmap = &self.bitmap - &other.bitmap;
        Self { bitmap }
    }

    /// Rows in `[0, universe_size)` that are not selected.
    ///
    /// `universe_size` must be the row count of the table being evaluated; a
    /// complement has no meaning outside of that table.
    #[must_use]
    pub fn complement(&self, universe_size: RowId) -> Self {
        Self::universe(universe_size).difference(self)
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.bitmap.iter()).finish()
    }
}

impl FromIterator<RowId> for Selection {
    fn from_iter<I: IntoIterator<Item = RowId>>(iter: I) -> Self {
        Self {
            bitmap: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = RowId;
    type IntoIter = RowIdIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

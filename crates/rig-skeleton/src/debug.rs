//! Compact `Debug` output for geometry-heavy types

use std::{cmp, fmt};

const FIRST_N_ELEMENTS: usize = 3;

/// Collections that can be shortened for debug printing
pub trait TrimmedDebug {
    type Item: fmt::Debug;

    fn total(&self) -> usize;
    fn head(&self, elements: usize) -> &[Self::Item];
}

impl<T: fmt::Debug> TrimmedDebug for Vec<T> {
    type Item = T;

    fn total(&self) -> usize {
        self.len()
    }

    fn head(&self, elements: usize) -> &[T] {
        &self[..cmp::min(elements, self.len())]
    }
}

impl<T: fmt::Debug> TrimmedDebug for [T] {
    type Item = T;

    fn total(&self) -> usize {
        self.len()
    }

    fn head(&self, elements: usize) -> &[T] {
        &self[..cmp::min(elements, self.len())]
    }
}

/// Print the first few elements and a count of the rest
#[cfg(not(feature = "debug-print-all"))]
pub fn trimmed_collection_fmt<T: TrimmedDebug + fmt::Debug + ?Sized>(
    n: &T,
    f: &mut fmt::Formatter,
) -> fmt::Result {
    let head = n.head(FIRST_N_ELEMENTS);
    let remaining = n.total().saturating_sub(head.len());

    if remaining == 0 {
        write!(f, "{:#?}", n)
    } else {
        write!(f, "{:#?} + {} elements", head, remaining)
    }
}

#[cfg(feature = "debug-print-all")]
pub fn trimmed_collection_fmt<T: TrimmedDebug + fmt::Debug + ?Sized>(
    n: &T,
    f: &mut fmt::Formatter,
) -> fmt::Result {
    write!(f, "{:#?}", n)
}

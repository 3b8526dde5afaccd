/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Element identifiers.

use std::fmt;
use std::hash::Hash;

use num_traits::PrimInt;

/// A totally ordered, integer-like element identifier.
///
/// Implemented for every primitive integer type.
pub trait Id: PrimInt + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// `self + by`, or `None` if the result is not representable.
    fn offset(self, by: i64) -> Option<Self> {
        let shifted = self.to_i128()?.checked_add(i128::from(by))?;
        num_traits::cast(shifted)
    }

    /// Convert a position or encoding offset into an id.
    fn from_index(index: usize) -> Option<Self> {
        num_traits::cast(index)
    }

    /// Convert an id into a position, if it fits.
    fn to_index(self) -> Option<usize> {
        self.to_usize()
    }
}

impl<T> Id for T where T: PrimInt + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_in_range() {
        assert_eq!(5u32.offset(3), Some(8));
        assert_eq!(5u32.offset(-5), Some(0));
        assert_eq!((-2i16).offset(-3), Some(-5));
    }

    #[test]
    fn offset_out_of_range() {
        assert_eq!(5u32.offset(-6), None);
        assert_eq!(250u8.offset(6), None);
        assert_eq!(u64::MAX.offset(1), None);
    }

    #[test]
    fn index_conversions() {
        assert_eq!(u8::from_index(255), Some(255));
        assert_eq!(u8::from_index(256), None);
        assert_eq!(7u16.to_index(), Some(7));
        assert_eq!((-1i32).to_index(), None);
    }
}

/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

#![deny(missing_docs)]

//! Payload algebra for sparse distributed representations.
//!
//! An SDR stores `(id, payload)` pairs. Whenever two SDRs are merged
//! and an id is present on both sides, the two payloads are combined
//! with one of the operations defined here. After each combination a
//! relevance predicate decides whether the element survives.
//!
//! # Quick Start
//!
//! ```rust
//! use sdr_algebra::Combine;
//! use sdr_algebra::Payload;
//! use sdr_algebra::Weight;
//!
//! let a = Weight(0.5);
//! let b = Weight(0.4);
//!
//! // AND multiplies weights; 0.2 is still above the threshold.
//! assert!(a.combine_and(&b).relevant());
//!
//! // RM multiplies with the complement: 0.5 * 0.6 = 0.3.
//! assert!(a.combine_rm(&b).rm_relevant());
//! ```
//!
//! # Core Concepts
//!
//! - **Payload**: a value attached to an id. It has a *relevance*
//!   predicate (may the element be stored at all?) and a separate
//!   *removal relevance* predicate (does the element survive a
//!   subtraction or symmetric difference?).
//!
//! - **Combine**: the AND / OR / RM combination rules, optionally
//!   heterogeneous (`Weight: Combine<Unit>`). `adopt` converts a
//!   right-hand payload into the left-hand type when an element is
//!   present only on the right of a union.
//!
//! - **CombineXor**: symmetric difference. Not every payload has
//!   one; arithmetic payloads offer [`Divide`] instead.
//!
//! # Provided Types
//!
//! - [`Unit`]: no data. Plain set semantics.
//! - [`Weight`]: a bounded weight in `[0, 1]`, relevant above
//!   [`Weight::THRESHOLD`].
//! - [`Arith`]: an unbounded float with ordinary arithmetic.

use std::fmt;

mod primitives;

pub use primitives::Arith;
pub use primitives::Unit;
pub use primitives::Weight;

// Payload

/// A value that may be attached to an SDR element.
///
/// Laws (not enforced by type system):
///
/// - Every element stored in an SDR satisfies `relevant()`.
/// - After `combine_rm` or `combine_xor`, an element is kept iff
///   the result satisfies `rm_relevant()`.
/// - `Default::default()` is the payload given to an element
///   constructed from an id alone, and must be `relevant()`.
pub trait Payload: Clone + Default + fmt::Debug + fmt::Display + 'static {
    /// Whether the payload carries printable information. When
    /// `false`, an SDR prints as `[id,id,...]`.
    const INFORMATIVE: bool = true;

    /// True if an element with this payload belongs in the structure.
    fn relevant(&self) -> bool;

    /// True if an element survives a subtraction or symmetric
    /// difference combination.
    fn rm_relevant(&self) -> bool;
}

// Combine

/// Combination rules applied when an id is present on both sides of
/// a merge.
///
/// `Rhs` may differ from `Self`; the non-informative side then
/// contributes its implicit default.
///
/// Laws (not enforced by type system):
///
/// - **Commutative AND/OR** (homogeneous case):
///   `a.combine_and(&b) == b.combine_and(&a)`,
///   `a.combine_or(&b) == b.combine_or(&a)`
/// - **Associative OR**:
///   `a.combine_or(&b).combine_or(&c) == a.combine_or(&b.combine_or(&c))`
/// - **Adopt default**: `Self::adopt(&Rhs::default())` is relevant.
///
/// # Example
///
/// ```rust
/// use sdr_algebra::Arith;
/// use sdr_algebra::Combine;
///
/// let a = Arith(3.0);
/// let b = Arith(4.0);
/// assert_eq!(a.combine_and(&b), Arith(12.0));
/// assert_eq!(a.combine_or(&b), Arith(7.0));
/// assert_eq!(a.combine_rm(&b), Arith(-1.0));
/// ```
pub trait Combine<Rhs: Payload = Self>: Payload {
    /// Combination on intersection.
    fn combine_and(&self, other: &Rhs) -> Self;

    /// Combination on union.
    fn combine_or(&self, other: &Rhs) -> Self;

    /// Combination on subtraction.
    fn combine_rm(&self, other: &Rhs) -> Self;

    /// Convert a payload found only on the right-hand side of a
    /// union into the left-hand payload type.
    fn adopt(other: &Rhs) -> Self;

    /// In-place intersection combine.
    fn combine_and_assign(&mut self, other: &Rhs) {
        *self = self.combine_and(other);
    }

    /// In-place union combine.
    fn combine_or_assign(&mut self, other: &Rhs) {
        *self = self.combine_or(other);
    }

    /// In-place subtraction combine.
    fn combine_rm_assign(&mut self, other: &Rhs) {
        *self = self.combine_rm(other);
    }
}

/// Symmetric-difference combination.
///
/// Laws (not enforced by type system):
///
/// - For set semantics (`Unit`), `a.combine_xor(&a)` is never
///   `rm_relevant()`, so `x ^ x` is empty.
pub trait CombineXor<Rhs: Payload = Self>: Combine<Rhs> {
    /// Combination on symmetric difference.
    fn combine_xor(&self, other: &Rhs) -> Self;

    /// In-place symmetric-difference combine.
    fn combine_xor_assign(&mut self, other: &Rhs) {
        *self = self.combine_xor(other);
    }
}

/// Element-wise division, available on arithmetic payloads in place
/// of a symmetric difference.
pub trait Divide: Payload {
    /// Divide `self` by `other`.
    fn divide(&self, other: &Self) -> Self;
}

/// Reduce payloads with `combine_or`, returning `None` for an empty
/// iterator.
///
/// This is the reduction used for inner products, traces and sums:
/// for [`Arith`] it is ordinary addition.
///
/// # Example
///
/// ```rust
/// use sdr_algebra::Arith;
/// use sdr_algebra::sum_all;
///
/// assert_eq!(sum_all(vec![Arith(1.0), Arith(2.0)]), Some(Arith(3.0)));
/// assert_eq!(sum_all(Vec::<Arith>::new()), None);
/// ```
pub fn sum_all<P, It>(iter: It) -> Option<P>
where
    P: Combine,
    It: IntoIterator<Item = P>,
{
    iter.into_iter().reduce(|acc, x| acc.combine_or(&x))
}

/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Errors reported by the checked constructors.
//!
//! The primary API treats malformed input as a programming error and
//! asserts. The `try_*` constructors report the same conditions as
//! values, for callers that build SDRs from untrusted input.

/// Errors that can occur when building or extending an SDR.
#[derive(Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum SdrError {
    /// Input ids are not strictly ascending.
    #[error("ids are not strictly ascending at position {position}")]
    NotAscending {
        /// Index of the first offending element.
        position: usize,
    },

    /// Appended ids do not all exceed the receiver's ids.
    #[error("appended ids overlap the receiver: {first} is not greater than {last}")]
    Overlap {
        /// The receiver's last id.
        last: String,
        /// The argument's first id.
        first: String,
    },

    /// An encoding asked for more ids than the field is wide.
    #[error("encoding size {size} exceeds width {width}")]
    SizeExceedsWidth {
        /// Requested number of ids.
        size: usize,
        /// Field width.
        width: usize,
    },

    /// An encoding input is negative or not finite.
    #[error("invalid encoding input {input}")]
    InvalidEncodingInput {
        /// The rejected input.
        input: f32,
    },

    /// A periodic encoding was given a zero or non-finite period.
    #[error("invalid period {period}")]
    InvalidPeriod {
        /// The rejected period.
        period: f32,
    },

    /// A sampling fraction is outside `[0, 1]`.
    #[error("sampling fraction {amount} is outside [0, 1]")]
    FractionOutOfRange {
        /// The rejected fraction.
        amount: f32,
    },

    /// An id does not fit in the id type.
    #[error("id {value} is not representable")]
    IdOutOfRange {
        /// The offending value.
        value: i128,
    },
}

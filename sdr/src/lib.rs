/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Sparse distributed representation algebra.
//!
//! Provides [`Sdr`], an ascending, duplicate-free sequence of
//! `(id, payload)` pairs that stands for a large, mostly empty bit
//! vector without materialising it. See [`Sdr`] for more details.
//!
//! Two SDRs combine by merge-join: AND, OR, XOR and RM (subtraction),
//! each in value, in-place, size-only and visitor form. When an id is
//! present on both sides the payloads combine through the
//! [`sdr_algebra`] traits, and a relevance predicate decides whether
//! the element survives.
//!
//! The same algorithms run over four backing containers
//! ([`container::Array`], [`container::Tree`],
//! [`container::SinglyLinked`], [`container::Columnar`]) selected at
//! the type level. A sparse [`Matrix`] is an SDR whose payloads are
//! SDRs.
//!
//! ```
//! use sdr::Sdr;
//! use sdr::sdr;
//!
//! let a: Sdr = sdr![1, 2, 3, 99];
//! let b: Sdr = sdr![0, 1, 2, 99, 100];
//! assert_eq!((&a - &b).to_string(), "[3]");
//! ```

/// Runtime tunables for the merge kernels and output allocation.
pub mod config;

/// Backing storage strategies and the cursor protocol.
pub mod container;

mod element;
pub use element::Element;
pub use element::ElementRef;

mod encode;

mod error;
pub use error::SdrError;

mod id;
pub use id::Id;

/// Sparse matrices built from nested SDRs.
pub mod matrix;
pub use matrix::Matrix;

/// Merge-join kernels over ascending cursors.
pub mod merge;

mod sdr;
pub use sdr::Sdr;

/// Property-based generators for randomized test input.
#[cfg(test)]
pub mod strategy;

pub use config::SdrConfig;
pub use config::Traversal;
pub use sdr_algebra::Arith;
pub use sdr_algebra::Combine;
pub use sdr_algebra::CombineXor;
pub use sdr_algebra::Divide;
pub use sdr_algebra::Payload;
pub use sdr_algebra::Unit;
pub use sdr_algebra::Weight;

/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Sparse matrices as SDRs of SDRs.
//!
//! A [`Matrix`] is an [`Sdr`] whose payloads are themselves SDRs. Each
//! outer element is one major vector (a row, for a row-major matrix)
//! keyed by its major id; an absent major id is an all-default vector.
//! Empty inner vectors are irrelevant and never stored.
//!
//! Whether a matrix is row- or column-major is a matter of
//! interpretation. Operations that contract along the stored axis
//! walk the outer SDR directly. Operations that contract along the
//! other axis go through an [`OtherMajorView`], a k-way merge over all
//! major vectors that yields elements in minor-id order without
//! building a transposed copy.
//!
//! ```text
//!   stored (row-major)        other-major view order
//!   [ 1 2 ]                   1 3 2 4
//!   [ 3 4 ]
//! ```

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use sdr_algebra::Arith;
use sdr_algebra::Combine;
use sdr_algebra::Payload;
use sdr_algebra::sum_all;

use crate::config::global;
use crate::container::Array;
use crate::container::Container;
use crate::container::ReadCursor;
use crate::container::Seek;
use crate::element::Element;
use crate::id::Id;
use crate::merge;
use crate::sdr::Sdr;

/// An SDR of SDRs. `C` stores each major vector, `R` the outer
/// sequence of major vectors.
pub type Matrix<I = u32, P = Arith, C = Array<I, P>, R = Array<I, Sdr<I, P, C>>> =
    Sdr<I, Sdr<I, P, C>, R>;

/// One element seen through an [`OtherMajorView`].
#[derive(Debug)]
pub struct MinorEntry<'a, I, P> {
    /// Id within the major vector (the column, for a row-major
    /// matrix).
    pub minor: I,
    /// Id of the major vector the element came from.
    pub major: I,
    /// Insertion index of that major vector in the view.
    pub slot: usize,
    /// The element's payload.
    pub data: &'a P,
}

/// Iterates the elements of a set of major vectors ordered by minor
/// id, then by major id.
///
/// Holds one cursor per major vector and a min-heap keyed on each
/// cursor's current minor id. Each step pops the smallest, yields it,
/// advances that cursor and pushes it back if it is not exhausted.
pub struct OtherMajorView<'a, I: Id, P: Payload, C: Container<I, P>> {
    heap: BinaryHeap<Reverse<(I, I, usize)>>,
    cursors: Vec<C::Cursor<'a>>,
}

impl<'a, I: Id, P: Payload, C: Container<I, P>> OtherMajorView<'a, I, P, C> {
    /// An empty view.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            cursors: Vec::new(),
        }
    }

    /// Add a major vector. All vectors must be added before iterating.
    /// Slots are numbered in insertion order.
    pub fn add_major(&mut self, major: I, vector: &'a Sdr<I, P, C>) {
        debug_assert!(!vector.is_empty(), "major vector {} is empty", major);
        let slot = self.cursors.len();
        let cursor = vector.container().cursor();
        if let Some(minor) = cursor.id() {
            self.heap.push(Reverse((minor, major, slot)));
        }
        self.cursors.push(cursor);
    }

    /// A view over every major vector of `matrix`.
    pub fn from_matrix<R>(matrix: &'a Sdr<I, Sdr<I, P, C>, R>) -> Self
    where
        R: Container<I, Sdr<I, P, C>>,
    {
        let mut view = Self::new();
        for major in matrix.iter() {
            view.add_major(major.id(), major.data());
        }
        view
    }
}

impl<I: Id, P: Payload, C: Container<I, P>> Default for OtherMajorView<'_, I, P, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, I: Id, P: Payload, C: Container<I, P>> Iterator for OtherMajorView<'a, I, P, C> {
    type Item = MinorEntry<'a, I, P>;

    fn next(&mut self) -> Option<Self::Item> {
        let Reverse((minor, major, slot)) = self.heap.pop()?;
        let cursor = self.cursors.get_mut(slot)?;
        let data = cursor.payload()?;
        cursor.advance();
        if let Some(next) = cursor.id() {
            self.heap.push(Reverse((next, major, slot)));
        }
        Some(MinorEntry {
            minor,
            major,
            slot,
            data,
        })
    }
}

/// Groups consecutive same-id payloads with `combine_or` and appends
/// each group to an output SDR.
///
/// Ids must arrive in ascending order. A group is flushed when a
/// different id arrives and when the accumulator is dropped; groups
/// whose combined payload is not relevant are dropped.
pub struct BucketOutputAccumulator<'o, I: Id, P: Combine, C: Container<I, P>> {
    output: &'o mut Sdr<I, P, C>,
    bucket: Option<(I, P)>,
}

impl<'o, I: Id, P: Combine, C: Container<I, P>> BucketOutputAccumulator<'o, I, P, C> {
    /// Accumulate into `output`.
    pub fn new(output: &'o mut Sdr<I, P, C>) -> Self {
        Self {
            output,
            bucket: None,
        }
    }

    /// Add `data` under `id`.
    pub fn push(&mut self, id: I, data: P) {
        if let Some((current, bucket)) = &mut self.bucket {
            if *current == id {
                bucket.combine_or_assign(&data);
                return;
            }
        }
        self.flush();
        self.bucket = Some((id, data));
    }

    /// Flush the pending group.
    pub fn finish(mut self) {
        self.flush();
    }

    fn flush(&mut self) {
        if let Some((id, data)) = self.bucket.take() {
            if data.relevant() {
                self.output.push(id, data);
            }
        }
    }
}

impl<I: Id, P: Combine, C: Container<I, P>> Drop for BucketOutputAccumulator<'_, I, P, C> {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Groups consecutive same-key elements into one inner vector and
/// appends each vector to an output matrix.
///
/// Keys must arrive in ascending order, and within a key the inner
/// ids must ascend. Flushes on key change and on drop; an empty
/// vector is never appended.
pub struct BucketOutputAppender<'o, I, P, C, R>
where
    I: Id,
    P: Payload,
    C: Container<I, P>,
    R: Container<I, Sdr<I, P, C>>,
{
    output: &'o mut Sdr<I, Sdr<I, P, C>, R>,
    bucket: Option<(I, Sdr<I, P, C>)>,
}

impl<'o, I, P, C, R> BucketOutputAppender<'o, I, P, C, R>
where
    I: Id,
    P: Payload,
    C: Container<I, P>,
    R: Container<I, Sdr<I, P, C>>,
{
    /// Append into `output`.
    pub fn new(output: &'o mut Sdr<I, Sdr<I, P, C>, R>) -> Self {
        Self {
            output,
            bucket: None,
        }
    }

    /// Append `(id, data)` to the vector under `key`.
    pub fn send(&mut self, key: I, id: I, data: P) {
        if self.bucket.as_ref().map(|(current, _)| *current) != Some(key) {
            self.flush();
            self.bucket = Some((key, Sdr::new()));
        }
        if let Some((_, vector)) = &mut self.bucket {
            vector.push(id, data);
        }
    }

    /// Flush the pending vector.
    pub fn finish(mut self) {
        self.flush();
    }

    fn flush(&mut self) {
        if let Some((key, vector)) = self.bucket.take() {
            if vector.relevant() {
                self.output.push(key, vector);
            }
        }
    }
}

impl<I, P, C, R> Drop for BucketOutputAppender<'_, I, P, C, R>
where
    I: Id,
    P: Payload,
    C: Container<I, P>,
    R: Container<I, Sdr<I, P, C>>,
{
    fn drop(&mut self) {
        self.flush();
    }
}

/// Inner product: the `combine_or` reduction of `combine_and` over
/// the shared ids. `None` when the operands share no id.
pub fn inner<I, P, C, D>(a: &Sdr<I, P, C>, b: &Sdr<I, P, D>) -> Option<P>
where
    I: Id,
    P: Combine,
    C: Container<I, P>,
    D: Container<I, P>,
{
    let mut total: Option<P> = None;
    a.and_visit(b, |_, p, q| {
        let product = p.combine_and(q);
        total = Some(match total.take() {
            Some(sum) => sum.combine_or(&product),
            None => product,
        });
    });
    total
}

/// Outer product: row `i` holds `a[i] * b[j]` for every `j`.
pub fn outer<I, P, C, D, R>(a: &Sdr<I, P, C>, b: &Sdr<I, P, D>) -> Matrix<I, P, C, R>
where
    I: Id,
    P: Combine,
    C: Container<I, P>,
    D: Container<I, P>,
    R: Container<I, Sdr<I, P, C>>,
{
    let mut out = Matrix::<I, P, C, R>::new();
    for row in a.iter() {
        let p = row.data();
        let vector: Sdr<I, P, C> = b
            .iter()
            .map(|e| Element::new(e.id(), p.combine_and(e.data())))
            .collect();
        if !vector.is_empty() {
            out.push(row.id(), vector);
        }
    }
    out
}

impl<I, P, C, R> Sdr<I, Sdr<I, P, C>, R>
where
    I: Id,
    P: Combine,
    C: Container<I, P>,
    R: Container<I, Sdr<I, P, C>>,
{
    /// Matrix-vector product of a row-major matrix: the inner product
    /// of each row with `vector`.
    pub fn row_major_mul_vec<D: Container<I, P>>(&self, vector: &Sdr<I, P, D>) -> Sdr<I, P, C> {
        tracing::debug!(
            rows = self.len(),
            vector = vector.len(),
            "row-major matrix-vector product"
        );
        let mut out = Sdr::new();
        for row in self.iter() {
            if let Some(value) = inner(row.data(), vector).filter(P::relevant) {
                out.push(row.id(), value);
            }
        }
        out
    }

    /// Matrix-vector product of a column-major matrix.
    ///
    /// Each column whose id appears in `vector` is scaled by that
    /// entry; the scaled columns are merged in row order and summed
    /// per row.
    pub fn col_major_mul_vec<D: Container<I, P>>(&self, vector: &Sdr<I, P, D>) -> Sdr<I, P, C> {
        tracing::debug!(
            columns = self.len(),
            vector = vector.len(),
            "column-major matrix-vector product"
        );
        let mut view = OtherMajorView::<I, P, C>::new();
        let mut scales = Vec::new();
        let mut columns = self.container().cursor();
        let mut entries = vector.container().cursor();
        merge::and_join(
            &mut columns,
            &mut entries,
            global::get().traversal,
            |major, c, v| {
                if let (Some(column), Some(scale)) = (c.payload(), v.payload()) {
                    view.add_major(major, column);
                    scales.push(scale);
                }
            },
        );

        let mut out = Sdr::new();
        let mut accumulator = BucketOutputAccumulator::new(&mut out);
        for entry in view {
            if let Some(scale) = scales.get(entry.slot) {
                accumulator.push(entry.minor, entry.data.combine_and(scale));
            }
        }
        accumulator.finish();
        out
    }

    /// Product with a row-major `rhs`: row `i` of the result is
    /// `rhs` (read as column-major) times row `i` of `self`.
    pub fn mul_by_rows(&self, rhs: &Self) -> Self {
        tracing::debug!(rows = self.len(), rhs_rows = rhs.len(), "matrix product by rows");
        let mut out = Self::new();
        for row in self.iter() {
            let product = rhs.col_major_mul_vec(row.data());
            if product.relevant() {
                out.push(row.id(), product);
            }
        }
        out
    }

    /// Product with a column-major `rhs`: entry `(i, j)` is the inner
    /// product of row `i` of `self` with column `j` of `rhs`.
    pub fn mul_by_columns(&self, rhs: &Self) -> Self {
        tracing::debug!(
            rows = self.len(),
            rhs_columns = rhs.len(),
            "matrix product by columns"
        );
        let mut out = Self::new();
        for row in self.iter() {
            let mut product = Sdr::<I, P, C>::new();
            for column in rhs.iter() {
                if let Some(value) = inner(row.data(), column.data()).filter(P::relevant) {
                    product.push(column.id(), value);
                }
            }
            if product.relevant() {
                out.push(row.id(), product);
            }
        }
        out
    }

    /// The transpose, built from the other-major view of `self`.
    pub fn transpose(&self) -> Self {
        tracing::debug!(majors = self.len(), "transpose");
        let mut out = Self::new();
        let mut appender = BucketOutputAppender::new(&mut out);
        for entry in OtherMajorView::from_matrix(self) {
            appender.send(entry.minor, entry.major, entry.data.clone());
        }
        appender.finish();
        out
    }

    /// Sum of the diagonal entries. `None` when the diagonal is empty.
    pub fn trace(&self) -> Option<P> {
        sum_all(
            self.iter()
                .filter_map(|major| major.data().get(major.id()).cloned()),
        )
    }

    /// Sum of every entry. `None` when the matrix is empty.
    pub fn element_sum(&self) -> Option<P> {
        sum_all(self.iter().filter_map(|major| major.data().sum()))
    }
}

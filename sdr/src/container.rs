/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Backing storage for SDRs.
//!
//! Every container is an ascending, duplicate-free sequence of
//! `(id, payload)` pairs. Algorithms are written once against the
//! [`Container`] trait and its cursors; a container advertises what
//! it does well through [`Container::CAPABILITIES`] and by overriding
//! the provided methods (native ordered search, in-place merge).
//!
//! | Container        | Layout                  | Ordered search      | In-place overwrite |
//! |------------------|-------------------------|---------------------|--------------------|
//! | [`Array`]        | `Vec<Element>`          | galloping           | yes                |
//! | [`Tree`]         | `BTreeMap<I, P>`        | `range(id..)`       | no (rebuild)       |
//! | [`SinglyLinked`] | arena list + free list  | linear              | yes (lagging prev) |
//! | [`Columnar`]     | `Vec<I>` + `Vec<P>`     | galloping on ids    | yes                |

use std::fmt;

use sdr_algebra::Payload;

use crate::config::Traversal;
use crate::element::ElementRef;
use crate::id::Id;
use crate::merge::Side;
use crate::merge::side;

mod array;
mod columnar;
mod list;
mod tree;

pub use array::Array;
pub use array::ArrayCursor;
pub use array::ArrayCursorMut;
pub use array::ArrayIter;
pub use columnar::Columnar;
pub use columnar::ColumnarCursor;
pub use columnar::ColumnarCursorMut;
pub use columnar::ColumnarIter;
pub use list::ListCursor;
pub use list::ListCursorMut;
pub use list::ListIntoIter;
pub use list::SinglyLinked;
pub use tree::Tree;
pub use tree::TreeCursor;
pub use tree::TreeCursorMut;
pub use tree::TreeIter;

/// Compile-time description of what a container supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// O(1) access by position.
    pub random_access: bool,
    /// Iteration from the back.
    pub reverse: bool,
    /// Sub-linear lower-bound search.
    pub ordered_search: bool,
    /// The backing structure knows its own length.
    pub native_len: bool,
    /// Payloads (and ids, for shifts) may be rewritten where they
    /// stand. When false, filtering operations rebuild and swap.
    pub overwrite_in_place: bool,
}

/// A forward position in an ascending sequence of ids.
pub trait Seek<I: Id> {
    /// The id under the cursor, or `None` at the end.
    fn id(&self) -> Option<I>;

    /// Move to the next element. No-op at the end.
    fn advance(&mut self);

    /// Step forward one element at a time until the current id is
    /// at least `target`.
    fn step_to(&mut self, target: I) {
        while let Some(id) = self.id() {
            if id >= target {
                break;
            }
            self.advance();
        }
    }

    /// Move forward to the first id at least `target`, using the
    /// container's native search where it has one.
    fn lower_bound(&mut self, target: I) {
        self.step_to(target)
    }

    /// Move forward to the first id at least `target` using the given
    /// traversal.
    fn seek(&mut self, target: I, traversal: Traversal) {
        match traversal {
            Traversal::Search => self.lower_bound(target),
            Traversal::Linear => self.step_to(target),
        }
    }
}

/// A cursor that lends payloads for the lifetime of the container
/// borrow.
pub trait ReadCursor<'a, I: Id, P: 'a>: Seek<I> {
    /// The payload under the cursor.
    fn payload(&self) -> Option<&'a P>;
}

/// A cursor with mutable access to payloads. Ids are never exposed
/// mutably.
pub trait WriteCursor<I: Id, P>: Seek<I> {
    /// The payload under the cursor.
    fn payload_mut(&mut self) -> Option<&mut P>;
}

/// An ascending, duplicate-free sequence of `(id, payload)` pairs.
///
/// Laws (not enforced by type system):
///
/// - Iteration and cursors visit ids in strictly ascending order.
/// - `push` is only called with an id greater than `last_id()`.
/// - `retain_mut` visits elements in ascending order, exactly once.
/// - `map_ids` is only called with a strictly increasing function.
pub trait Container<I: Id, P: Payload>: Default + Clone + fmt::Debug + 'static {
    /// What this container supports.
    const CAPABILITIES: Capabilities;

    /// Borrowing iterator.
    type Iter<'a>: Iterator<Item = ElementRef<'a, I, P>>
    where
        Self: 'a;

    /// Read cursor.
    type Cursor<'a>: ReadCursor<'a, I, P>
    where
        Self: 'a;

    /// Payload-mutating cursor.
    type CursorMut<'a>: WriteCursor<I, P>
    where
        Self: 'a;

    /// Consuming iterator.
    type IntoPairs: Iterator<Item = (I, P)>;

    /// Iterate in ascending id order.
    fn iter(&self) -> Self::Iter<'_>;

    /// A read cursor at the first element.
    fn cursor(&self) -> Self::Cursor<'_>;

    /// A payload-mutating cursor at the first element.
    fn cursor_mut(&mut self) -> Self::CursorMut<'_>;

    /// Consume into ascending `(id, payload)` pairs.
    fn into_pairs(self) -> Self::IntoPairs;

    /// An empty container with room for `capacity` elements.
    fn with_capacity(capacity: usize) -> Self {
        let _ = capacity;
        Self::default()
    }

    /// Reserve room for `additional` more elements.
    fn reserve(&mut self, additional: usize) {
        let _ = additional;
    }

    /// Append at the end. `id` must exceed every id present.
    fn push(&mut self, id: I, data: P);

    /// Number of elements.
    fn len(&self) -> usize;

    /// True if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every element.
    fn clear(&mut self);

    /// Smallest id.
    fn first_id(&self) -> Option<I> {
        self.cursor().id()
    }

    /// Largest id.
    fn last_id(&self) -> Option<I>;

    /// Payload stored under `id`.
    fn get(&self, id: I) -> Option<&P> {
        let mut cursor = self.cursor();
        cursor.lower_bound(id);
        if cursor.id() == Some(id) {
            cursor.payload()
        } else {
            None
        }
    }

    /// Mutable payload stored under `id`.
    fn get_mut(&mut self, id: I) -> Option<&mut P>;

    /// Keep exactly the elements for which `keep` returns true,
    /// preserving order. `keep` may rewrite the payload.
    fn retain_mut<F>(&mut self, keep: F)
    where
        F: FnMut(I, &mut P) -> bool;

    /// Rewrite every id with a strictly increasing `f`.
    fn map_ids<F>(&mut self, f: F)
    where
        F: FnMut(I) -> I;

    /// Union-shaped merge of `arg` into `self`.
    ///
    /// For ids on both sides `both` updates the payload and decides
    /// whether the element stays. For ids only in `arg`, `right_only`
    /// produces the payload to insert, or `None` to skip. Ids only in
    /// `self` are kept unchanged.
    ///
    /// The provided implementation builds a fresh container and swaps
    /// it in.
    fn merge_in<'b, Q, R, B, O>(&mut self, arg: R, both: B, right_only: O)
    where
        Q: Payload,
        R: ReadCursor<'b, I, Q>,
        B: FnMut(I, &mut P, &'b Q) -> bool,
        O: FnMut(I, &'b Q) -> Option<P>,
    {
        let (mut arg, mut both, mut right_only) = (arg, both, right_only);
        let old = std::mem::take(self);
        let mut out = Self::with_capacity(old.len());
        let mut left = old.into_pairs().peekable();
        while let Some((which, id)) = side(left.peek().map(|(id, _)| *id), arg.id()) {
            match which {
                Side::Left => {
                    if let Some((id, data)) = left.next() {
                        out.push(id, data);
                    }
                }
                Side::Right => {
                    if let Some(data) = arg.payload().and_then(|q| right_only(id, q)) {
                        out.push(id, data);
                    }
                    arg.advance();
                }
                Side::Both => {
                    if let (Some((_, mut data)), Some(q)) = (left.next(), arg.payload()) {
                        if both(id, &mut data, q) {
                            out.push(id, data);
                        }
                    }
                    arg.advance();
                }
            }
        }
        *self = out;
    }
}

/// Index of the first element at or after `from` for which `before`
/// is false. `before` must be monotone over the slice (true, then
/// false).
///
/// Probes at exponentially growing distances from `from`, then binary
/// searches the last bracket, so the cost is logarithmic in the
/// distance moved rather than in the slice length.
pub(crate) fn gallop<T, F>(slice: &[T], from: usize, before: F) -> usize
where
    F: Fn(&T) -> bool,
{
    let len = slice.len();
    if from >= len || !before(&slice[from]) {
        return from.min(len);
    }
    let mut lo = from;
    let mut step = 1;
    let mut hi = lo + step;
    while hi < len && before(&slice[hi]) {
        lo = hi;
        step *= 2;
        hi = lo + step;
    }
    let hi = hi.min(len);
    lo + 1 + slice[lo + 1..hi].partition_point(before)
}

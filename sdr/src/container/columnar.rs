/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Struct-of-arrays storage: ids and payloads in parallel vectors.

use std::iter::FusedIterator;
use std::iter::Zip;
use std::slice;
use std::vec;

use sdr_algebra::Payload;

use super::Capabilities;
use super::Container;
use super::ReadCursor;
use super::Seek;
use super::WriteCursor;
use super::gallop;
use crate::element::ElementRef;
use crate::id::Id;

/// Ids and payloads in two parallel `Vec`s.
///
/// Searches touch only the id column, which keeps them dense in
/// cache when payloads are large.
#[derive(Clone, Debug)]
pub struct Columnar<I, P> {
    ids: Vec<I>,
    data: Vec<P>,
}

impl<I, P> Default for Columnar<I, P> {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            data: Vec::new(),
        }
    }
}

impl<I: Id, P: Payload> Columnar<I, P> {
    /// The id column.
    pub fn ids(&self) -> &[I] {
        &self.ids
    }

    /// The payload column.
    pub fn payloads(&self) -> &[P] {
        &self.data
    }

    fn position(&self, id: I) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }
}

impl<I: Id, P: Payload> Container<I, P> for Columnar<I, P> {
    const CAPABILITIES: Capabilities = Capabilities {
        random_access: true,
        reverse: true,
        ordered_search: true,
        native_len: true,
        overwrite_in_place: true,
    };

    type Iter<'a>
        = ColumnarIter<'a, I, P>
    where
        Self: 'a;

    type Cursor<'a>
        = ColumnarCursor<'a, I, P>
    where
        Self: 'a;

    type CursorMut<'a>
        = ColumnarCursorMut<'a, I, P>
    where
        Self: 'a;

    type IntoPairs = Zip<vec::IntoIter<I>, vec::IntoIter<P>>;

    fn iter(&self) -> Self::Iter<'_> {
        ColumnarIter {
            inner: self.ids.iter().zip(self.data.iter()),
        }
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        ColumnarCursor {
            ids: &self.ids,
            data: &self.data,
            pos: 0,
        }
    }

    fn cursor_mut(&mut self) -> Self::CursorMut<'_> {
        ColumnarCursorMut {
            ids: &self.ids,
            data: &mut self.data,
            pos: 0,
        }
    }

    fn into_pairs(self) -> Self::IntoPairs {
        self.ids.into_iter().zip(self.data)
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            data: Vec::with_capacity(capacity),
        }
    }

    fn reserve(&mut self, additional: usize) {
        self.ids.reserve(additional);
        self.data.reserve(additional);
    }

    fn push(&mut self, id: I, data: P) {
        debug_assert!(
            self.ids.last().map_or(true, |last| *last < id),
            "id {} pushed out of order",
            id
        );
        self.ids.push(id);
        self.data.push(data);
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn clear(&mut self) {
        self.ids.clear();
        self.data.clear();
    }

    fn first_id(&self) -> Option<I> {
        self.ids.first().copied()
    }

    fn last_id(&self) -> Option<I> {
        self.ids.last().copied()
    }

    fn get(&self, id: I) -> Option<&P> {
        self.data.get(self.position(id)?)
    }

    fn get_mut(&mut self, id: I) -> Option<&mut P> {
        let index = self.position(id)?;
        self.data.get_mut(index)
    }

    fn retain_mut<F>(&mut self, mut keep: F)
    where
        F: FnMut(I, &mut P) -> bool,
    {
        let mut write = 0;
        for read in 0..self.ids.len() {
            if keep(self.ids[read], &mut self.data[read]) {
                if read != write {
                    self.ids.swap(read, write);
                    self.data.swap(read, write);
                }
                write += 1;
            }
        }
        self.ids.truncate(write);
        self.data.truncate(write);
    }

    fn map_ids<F>(&mut self, f: F)
    where
        F: FnMut(I) -> I,
    {
        let mut f = f;
        for id in &mut self.ids {
            *id = f(*id);
        }
    }
}

/// Borrowing iterator over a [`Columnar`].
#[derive(Clone, Debug)]
pub struct ColumnarIter<'a, I, P> {
    inner: Zip<slice::Iter<'a, I>, slice::Iter<'a, P>>,
}

impl<'a, I: Id, P: Payload> Iterator for ColumnarIter<'a, I, P> {
    type Item = ElementRef<'a, I, P>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(id, data)| ElementRef::new(*id, data))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I: Id, P: Payload> DoubleEndedIterator for ColumnarIter<'_, I, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner
            .next_back()
            .map(|(id, data)| ElementRef::new(*id, data))
    }
}

impl<I: Id, P: Payload> ExactSizeIterator for ColumnarIter<'_, I, P> {}

impl<I: Id, P: Payload> FusedIterator for ColumnarIter<'_, I, P> {}

/// Read cursor over a [`Columnar`].
#[derive(Clone, Debug)]
pub struct ColumnarCursor<'a, I, P> {
    ids: &'a [I],
    data: &'a [P],
    pos: usize,
}

impl<I: Id, P: Payload> Seek<I> for ColumnarCursor<'_, I, P> {
    fn id(&self) -> Option<I> {
        self.ids.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos = (self.pos + 1).min(self.ids.len());
    }

    fn lower_bound(&mut self, target: I) {
        self.pos = gallop(self.ids, self.pos, |id| *id < target);
    }
}

impl<'a, I: Id, P: Payload> ReadCursor<'a, I, P> for ColumnarCursor<'a, I, P> {
    fn payload(&self) -> Option<&'a P> {
        let data: &'a [P] = self.data;
        data.get(self.pos)
    }
}

/// Payload-mutating cursor over a [`Columnar`]. The id column stays
/// shared.
#[derive(Debug)]
pub struct ColumnarCursorMut<'a, I, P> {
    ids: &'a [I],
    data: &'a mut [P],
    pos: usize,
}

impl<I: Id, P: Payload> Seek<I> for ColumnarCursorMut<'_, I, P> {
    fn id(&self) -> Option<I> {
        self.ids.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos = (self.pos + 1).min(self.ids.len());
    }

    fn lower_bound(&mut self, target: I) {
        self.pos = gallop(self.ids, self.pos, |id| *id < target);
    }
}

impl<I: Id, P: Payload> WriteCursor<I, P> for ColumnarCursorMut<'_, I, P> {
    fn payload_mut(&mut self) -> Option<&mut P> {
        self.data.get_mut(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use sdr_algebra::Weight;

    use super::*;

    #[test]
    fn columns_stay_aligned() {
        let mut c: Columnar<u32, Weight> = Columnar::default();
        for i in 0..8u32 {
            c.push(i * 3, Weight(i as f32 / 8.0));
        }
        c.retain_mut(|id, _| id % 2 == 0);
        assert_eq!(c.ids(), &[0, 6, 12, 18]);
        assert_eq!(
            c.payloads(),
            &[Weight(0.0), Weight(0.25), Weight(0.5), Weight(0.75)]
        );
        let back: Vec<u32> = c.iter().rev().map(|e| e.id()).collect();
        assert_eq!(back, vec![18, 12, 6, 0]);
    }

    #[test]
    fn cursor_searches_id_column() {
        let c: Columnar<u32, Weight> = {
            let mut c = Columnar::default();
            for i in 0..50u32 {
                c.push(i * 4, Weight::default());
            }
            c
        };
        let mut cursor = c.cursor();
        cursor.lower_bound(101);
        assert_eq!(cursor.id(), Some(104));
        assert_eq!(cursor.payload(), Some(&Weight::default()));
        cursor.lower_bound(1000);
        assert_eq!(cursor.id(), None);
        assert_eq!(cursor.payload(), None);
    }
}

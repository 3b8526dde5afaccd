/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Contiguous array of elements.

use std::iter::FusedIterator;
use std::iter::Map;
use std::slice;
use std::vec;

use sdr_algebra::Payload;

use super::Capabilities;
use super::Container;
use super::ReadCursor;
use super::Seek;
use super::WriteCursor;
use super::gallop;
use crate::element::Element;
use crate::element::ElementRef;
use crate::id::Id;

/// Elements stored contiguously in a `Vec`.
///
/// Random access, reverse iteration, and galloping lower-bound
/// search. Filtering is index-based compaction (read ahead, write
/// behind, truncate once).
#[derive(Clone, Debug)]
pub struct Array<I, P> {
    items: Vec<Element<I, P>>,
}

impl<I, P> Default for Array<I, P> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<I: Id, P: Payload> Array<I, P> {
    /// The elements as a slice.
    pub fn as_slice(&self) -> &[Element<I, P>] {
        &self.items
    }

    /// The element at `index`.
    pub fn at(&self, index: usize) -> Option<ElementRef<'_, I, P>> {
        self.items.get(index).map(Element::borrowed)
    }
}

impl<I: Id, P: Payload> Container<I, P> for Array<I, P> {
    const CAPABILITIES: Capabilities = Capabilities {
        random_access: true,
        reverse: true,
        ordered_search: true,
        native_len: true,
        overwrite_in_place: true,
    };

    type Iter<'a>
        = ArrayIter<'a, I, P>
    where
        Self: 'a;

    type Cursor<'a>
        = ArrayCursor<'a, I, P>
    where
        Self: 'a;

    type CursorMut<'a>
        = ArrayCursorMut<'a, I, P>
    where
        Self: 'a;

    type IntoPairs = Map<vec::IntoIter<Element<I, P>>, fn(Element<I, P>) -> (I, P)>;

    fn iter(&self) -> Self::Iter<'_> {
        ArrayIter {
            inner: self.items.iter(),
        }
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        ArrayCursor {
            items: &self.items,
            pos: 0,
        }
    }

    fn cursor_mut(&mut self) -> Self::CursorMut<'_> {
        ArrayCursorMut {
            items: &mut self.items,
            pos: 0,
        }
    }

    fn into_pairs(self) -> Self::IntoPairs {
        self.items
            .into_iter()
            .map(Element::into_parts as fn(Element<I, P>) -> (I, P))
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
    }

    fn push(&mut self, id: I, data: P) {
        debug_assert!(
            self.items.last().map_or(true, |last| last.id() < id),
            "id {} pushed out of order",
            id
        );
        self.items.push(Element::new(id, data));
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn first_id(&self) -> Option<I> {
        self.items.first().map(Element::id)
    }

    fn last_id(&self) -> Option<I> {
        self.items.last().map(Element::id)
    }

    fn get(&self, id: I) -> Option<&P> {
        let index = self.items.binary_search_by(|e| e.id().cmp(&id)).ok()?;
        Some(self.items[index].data())
    }

    fn get_mut(&mut self, id: I) -> Option<&mut P> {
        let index = self.items.binary_search_by(|e| e.id().cmp(&id)).ok()?;
        Some(self.items[index].data_mut())
    }

    fn retain_mut<F>(&mut self, mut keep: F)
    where
        F: FnMut(I, &mut P) -> bool,
    {
        self.items.retain_mut(|e| {
            let id = e.id();
            keep(id, e.data_mut())
        });
    }

    fn map_ids<F>(&mut self, mut f: F)
    where
        F: FnMut(I) -> I,
    {
        for e in &mut self.items {
            e.set_id(f(e.id()));
        }
    }
}

impl<I: Id, P: Payload> FromIterator<Element<I, P>> for Array<I, P> {
    fn from_iter<T: IntoIterator<Item = Element<I, P>>>(iter: T) -> Self {
        let mut array = Self::default();
        for e in iter {
            let (id, data) = e.into_parts();
            array.push(id, data);
        }
        array
    }
}

/// Borrowing iterator over an [`Array`].
#[derive(Clone, Debug)]
pub struct ArrayIter<'a, I, P> {
    inner: slice::Iter<'a, Element<I, P>>,
}

impl<'a, I: Id, P: Payload> Iterator for ArrayIter<'a, I, P> {
    type Item = ElementRef<'a, I, P>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Element::borrowed)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I: Id, P: Payload> DoubleEndedIterator for ArrayIter<'_, I, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Element::borrowed)
    }
}

impl<I: Id, P: Payload> ExactSizeIterator for ArrayIter<'_, I, P> {}

impl<I: Id, P: Payload> FusedIterator for ArrayIter<'_, I, P> {}

/// Read cursor over an [`Array`].
#[derive(Clone, Debug)]
pub struct ArrayCursor<'a, I, P> {
    items: &'a [Element<I, P>],
    pos: usize,
}

impl<I: Id, P: Payload> Seek<I> for ArrayCursor<'_, I, P> {
    fn id(&self) -> Option<I> {
        self.items.get(self.pos).map(Element::id)
    }

    fn advance(&mut self) {
        self.pos = (self.pos + 1).min(self.items.len());
    }

    fn lower_bound(&mut self, target: I) {
        self.pos = gallop(self.items, self.pos, |e| e.id() < target);
    }
}

impl<'a, I: Id, P: Payload> ReadCursor<'a, I, P> for ArrayCursor<'a, I, P> {
    fn payload(&self) -> Option<&'a P> {
        let items: &'a [Element<I, P>] = self.items;
        items.get(self.pos).map(Element::data)
    }
}

/// Payload-mutating cursor over an [`Array`].
#[derive(Debug)]
pub struct ArrayCursorMut<'a, I, P> {
    items: &'a mut [Element<I, P>],
    pos: usize,
}

impl<I: Id, P: Payload> Seek<I> for ArrayCursorMut<'_, I, P> {
    fn id(&self) -> Option<I> {
        self.items.get(self.pos).map(Element::id)
    }

    fn advance(&mut self) {
        self.pos = (self.pos + 1).min(self.items.len());
    }

    fn lower_bound(&mut self, target: I) {
        self.pos = gallop(self.items, self.pos, |e| e.id() < target);
    }
}

impl<I: Id, P: Payload> WriteCursor<I, P> for ArrayCursorMut<'_, I, P> {
    fn payload_mut(&mut self) -> Option<&mut P> {
        self.items.get_mut(self.pos).map(Element::data_mut)
    }
}

#[cfg(test)]
mod tests {
    use sdr_algebra::Arith;
    use sdr_algebra::Unit;

    use super::*;

    fn array(ids: &[u32]) -> Array<u32, Unit> {
        ids.iter().map(|id| Element::from_id(*id)).collect()
    }

    #[test]
    fn reverse_and_random_access() {
        let a = array(&[2, 4, 8]);
        let back: Vec<u32> = a.iter().rev().map(|e| e.id()).collect();
        assert_eq!(back, vec![8, 4, 2]);
        assert_eq!(a.at(1).map(|e| e.id()), Some(4));
        assert!(a.at(3).is_none());
        assert_eq!(a.iter().len(), 3);
    }

    #[test]
    fn cursor_gallops_forward_only() {
        let a = array(&(0..100).map(|i| i * 2).collect::<Vec<_>>());
        let mut cursor = a.cursor();
        cursor.lower_bound(51);
        assert_eq!(cursor.id(), Some(52));
        // Never moves backwards.
        cursor.lower_bound(10);
        assert_eq!(cursor.id(), Some(52));
        cursor.lower_bound(199);
        assert_eq!(cursor.id(), None);
    }

    #[test]
    fn compaction_keeps_order() {
        let mut a: Array<u32, Arith> = (0..10).map(|i| Element::new(i, Arith(i as f32))).collect();
        a.retain_mut(|id, data| {
            data.0 *= 2.0;
            id % 3 == 0
        });
        let pairs: Vec<(u32, Arith)> = a.into_pairs().collect();
        assert_eq!(
            pairs,
            vec![
                (0, Arith(0.0)),
                (3, Arith(6.0)),
                (6, Arith(12.0)),
                (9, Arith(18.0))
            ]
        );
    }

    #[test]
    #[should_panic(expected = "pushed out of order")]
    #[cfg(debug_assertions)]
    fn push_out_of_order_panics() {
        let mut a = array(&[5]);
        a.push(5, Unit);
    }
}

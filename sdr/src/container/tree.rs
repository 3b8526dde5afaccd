/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Self-ordering tree keyed by id.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::iter::FusedIterator;
use std::ops::Bound;

use sdr_algebra::Payload;

use super::Capabilities;
use super::Container;
use super::ReadCursor;
use super::Seek;
use super::WriteCursor;
use crate::element::ElementRef;
use crate::id::Id;

/// Elements kept in a `BTreeMap`.
///
/// The tree maintains its own order and offers a native lower-bound
/// search. Ids are keys and cannot be rewritten where they stand, so
/// filtering and id remapping build a new tree and swap it in.
#[derive(Clone, Debug)]
pub struct Tree<I, P> {
    map: BTreeMap<I, P>,
}

impl<I, P> Default for Tree<I, P> {
    fn default() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }
}

impl<I: Id, P: Payload> Tree<I, P> {
    /// The underlying map.
    pub fn as_map(&self) -> &BTreeMap<I, P> {
        &self.map
    }
}

impl<I: Id, P: Payload> Container<I, P> for Tree<I, P> {
    const CAPABILITIES: Capabilities = Capabilities {
        random_access: false,
        reverse: true,
        ordered_search: true,
        native_len: true,
        overwrite_in_place: false,
    };

    type Iter<'a>
        = TreeIter<'a, I, P>
    where
        Self: 'a;

    type Cursor<'a>
        = TreeCursor<'a, I, P>
    where
        Self: 'a;

    type CursorMut<'a>
        = TreeCursorMut<'a, I, P>
    where
        Self: 'a;

    type IntoPairs = btree_map::IntoIter<I, P>;

    fn iter(&self) -> Self::Iter<'_> {
        TreeIter {
            inner: self.map.iter(),
        }
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        let mut rest = self.map.range(..);
        let current = rest.next();
        TreeCursor {
            map: &self.map,
            rest,
            current,
        }
    }

    fn cursor_mut(&mut self) -> Self::CursorMut<'_> {
        let at = self.map.keys().next().copied();
        TreeCursorMut {
            map: &mut self.map,
            at,
        }
    }

    fn into_pairs(self) -> Self::IntoPairs {
        self.map.into_iter()
    }

    fn push(&mut self, id: I, data: P) {
        debug_assert!(
            self.map.last_key_value().map_or(true, |(last, _)| *last < id),
            "id {} pushed out of order",
            id
        );
        self.map.insert(id, data);
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn clear(&mut self) {
        self.map.clear();
    }

    fn first_id(&self) -> Option<I> {
        self.map.first_key_value().map(|(id, _)| *id)
    }

    fn last_id(&self) -> Option<I> {
        self.map.last_key_value().map(|(id, _)| *id)
    }

    fn get(&self, id: I) -> Option<&P> {
        self.map.get(&id)
    }

    fn get_mut(&mut self, id: I) -> Option<&mut P> {
        self.map.get_mut(&id)
    }

    fn retain_mut<F>(&mut self, mut keep: F)
    where
        F: FnMut(I, &mut P) -> bool,
    {
        let old = std::mem::take(&mut self.map);
        self.map = old
            .into_iter()
            .filter_map(|(id, mut data)| keep(id, &mut data).then_some((id, data)))
            .collect();
    }

    fn map_ids<F>(&mut self, mut f: F)
    where
        F: FnMut(I) -> I,
    {
        let old = std::mem::take(&mut self.map);
        self.map = old.into_iter().map(|(id, data)| (f(id), data)).collect();
    }
}

/// Borrowing iterator over a [`Tree`].
#[derive(Clone, Debug)]
pub struct TreeIter<'a, I, P> {
    inner: btree_map::Iter<'a, I, P>,
}

impl<'a, I: Id, P: Payload> Iterator for TreeIter<'a, I, P> {
    type Item = ElementRef<'a, I, P>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(id, data)| ElementRef::new(*id, data))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I: Id, P: Payload> DoubleEndedIterator for TreeIter<'_, I, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner
            .next_back()
            .map(|(id, data)| ElementRef::new(*id, data))
    }
}

impl<I: Id, P: Payload> FusedIterator for TreeIter<'_, I, P> {}

/// Read cursor over a [`Tree`]. Lower-bound search restarts a range
/// query at the target.
#[derive(Clone, Debug)]
pub struct TreeCursor<'a, I, P> {
    map: &'a BTreeMap<I, P>,
    rest: btree_map::Range<'a, I, P>,
    current: Option<(&'a I, &'a P)>,
}

impl<I: Id, P: Payload> Seek<I> for TreeCursor<'_, I, P> {
    fn id(&self) -> Option<I> {
        self.current.map(|(id, _)| *id)
    }

    fn advance(&mut self) {
        self.current = self.rest.next();
    }

    fn lower_bound(&mut self, target: I) {
        if self.current.map_or(true, |(id, _)| *id >= target) {
            return;
        }
        self.rest = self.map.range(target..);
        self.current = self.rest.next();
    }
}

impl<'a, I: Id, P: Payload> ReadCursor<'a, I, P> for TreeCursor<'a, I, P> {
    fn payload(&self) -> Option<&'a P> {
        self.current.map(|(_, data)| data)
    }
}

/// Payload-mutating cursor over a [`Tree`]. Holds the current key and
/// looks each step up in the map.
#[derive(Debug)]
pub struct TreeCursorMut<'a, I, P> {
    map: &'a mut BTreeMap<I, P>,
    at: Option<I>,
}

impl<I: Id, P: Payload> Seek<I> for TreeCursorMut<'_, I, P> {
    fn id(&self) -> Option<I> {
        self.at
    }

    fn advance(&mut self) {
        if let Some(id) = self.at {
            self.at = self
                .map
                .range((Bound::Excluded(id), Bound::Unbounded))
                .next()
                .map(|(id, _)| *id);
        }
    }

    fn lower_bound(&mut self, target: I) {
        if self.at.is_some_and(|id| id < target) {
            self.at = self.map.range(target..).next().map(|(id, _)| *id);
        }
    }
}

impl<I: Id, P: Payload> WriteCursor<I, P> for TreeCursorMut<'_, I, P> {
    fn payload_mut(&mut self) -> Option<&mut P> {
        let id = self.at?;
        self.map.get_mut(&id)
    }
}

#[cfg(test)]
mod tests {
    use sdr_algebra::Unit;

    use super::*;

    fn tree(ids: &[u32]) -> Tree<u32, Unit> {
        let mut t = Tree::default();
        for id in ids {
            t.push(*id, Unit);
        }
        t
    }

    #[test]
    fn cursor_range_search() {
        let t = tree(&[1, 5, 9, 13, 17]);
        let mut cursor = t.cursor();
        cursor.lower_bound(10);
        assert_eq!(cursor.id(), Some(13));
        cursor.advance();
        assert_eq!(cursor.id(), Some(17));
        cursor.lower_bound(2);
        assert_eq!(cursor.id(), Some(17));
        cursor.lower_bound(18);
        assert_eq!(cursor.id(), None);
    }

    #[test]
    fn mutable_cursor_walks_keys() {
        let mut t = tree(&[1, 5, 9]);
        let mut cursor = t.cursor_mut();
        let mut seen = Vec::new();
        while let Some(id) = cursor.id() {
            assert!(cursor.payload_mut().is_some());
            seen.push(id);
            cursor.advance();
        }
        assert_eq!(seen, vec![1, 5, 9]);
        assert!(cursor.payload_mut().is_none());
    }

    #[test]
    fn reverse_iteration() {
        let t = tree(&[3, 4, 7]);
        let back: Vec<u32> = t.iter().rev().map(|e| e.id()).collect();
        assert_eq!(back, vec![7, 4, 3]);
        assert_eq!(t.as_map().len(), 3);
    }
}

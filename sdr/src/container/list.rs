/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Singly linked list over an index arena.
//!
//! Nodes live in a `Vec` of slots and link forward by slot index.
//! Vacated slots go on a free list. The list is only ever walked
//! forward; removal keeps a lagging `prev` handle one node behind the
//! read position so that unlinking is O(1) without walking back.

use std::fmt;

use sdr_algebra::Payload;

use super::Capabilities;
use super::Container;
use super::ReadCursor;
use super::Seek;
use super::WriteCursor;
use crate::element::ElementRef;
use crate::id::Id;
use crate::merge::Side;
use crate::merge::side;

#[derive(Clone)]
struct Node<I, P> {
    id: I,
    data: P,
    next: Option<usize>,
}

/// Forward-only linked list of elements.
///
/// No random access or reverse iteration, and no ordered search:
/// cursors step linearly. The list itself has no notion of size; an
/// element count is maintained on the side by every link operation.
#[derive(Clone)]
pub struct SinglyLinked<I, P> {
    slots: Vec<Option<Node<I, P>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    count: usize,
}

impl<I, P> Default for SinglyLinked<I, P> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            count: 0,
        }
    }
}

impl<I: Id, P: Payload> fmt::Debug for SinglyLinked<I, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|e| (e.id(), e.data())))
            .finish()
    }
}

impl<I: Id, P: Payload> SinglyLinked<I, P> {
    fn node(&self, slot: usize) -> Option<&Node<I, P>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut Node<I, P>> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    fn next_of(&self, slot: Option<usize>) -> Option<usize> {
        match slot {
            Some(slot) => self.node(slot).and_then(|n| n.next),
            None => self.head,
        }
    }

    fn alloc(&mut self, node: Node<I, P>) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    /// Link a new node after `prev` (at the front when `None`) and
    /// return its slot.
    fn insert_after(&mut self, prev: Option<usize>, id: I, data: P) -> usize {
        let next = self.next_of(prev);
        let slot = self.alloc(Node { id, data, next });
        match prev.and_then(|p| self.node_mut(p)) {
            Some(node) => node.next = Some(slot),
            None => self.head = Some(slot),
        }
        if next.is_none() {
            self.tail = Some(slot);
        }
        self.count += 1;
        slot
    }

    /// Unlink the node after `prev` (the front when `None`).
    fn erase_after(&mut self, prev: Option<usize>) -> Option<(I, P)> {
        let target = self.next_of(prev)?;
        let node = self.slots.get_mut(target)?.take()?;
        self.free.push(target);
        match prev.and_then(|p| self.node_mut(p)) {
            Some(prev_node) => prev_node.next = node.next,
            None => self.head = node.next,
        }
        if self.tail == Some(target) {
            self.tail = prev;
        }
        self.count -= 1;
        Some((node.id, node.data))
    }

    /// Insert at the front. `id` must be smaller than every id present.
    pub fn push_front(&mut self, id: I, data: P) {
        debug_assert!(
            self.first_id().map_or(true, |first| id < first),
            "id {} pushed out of order",
            id
        );
        self.insert_after(None, id, data);
    }

    /// Remove and return the front element.
    pub fn pop_front(&mut self) -> Option<(I, P)> {
        self.erase_after(None)
    }

    /// Number of arena slots currently allocated, live or free.
    pub fn slot_capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<I: Id, P: Payload> Container<I, P> for SinglyLinked<I, P> {
    const CAPABILITIES: Capabilities = Capabilities {
        random_access: false,
        reverse: false,
        ordered_search: false,
        native_len: false,
        overwrite_in_place: true,
    };

    type Iter<'a>
        = ListCursor<'a, I, P>
    where
        Self: 'a;

    type Cursor<'a>
        = ListCursor<'a, I, P>
    where
        Self: 'a;

    type CursorMut<'a>
        = ListCursorMut<'a, I, P>
    where
        Self: 'a;

    type IntoPairs = ListIntoIter<I, P>;

    fn iter(&self) -> Self::Iter<'_> {
        self.cursor()
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        ListCursor {
            list: self,
            at: self.head,
        }
    }

    fn cursor_mut(&mut self) -> Self::CursorMut<'_> {
        let at = self.head;
        ListCursorMut { list: self, at }
    }

    fn into_pairs(self) -> Self::IntoPairs {
        ListIntoIter { list: self }
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional.saturating_sub(self.free.len()));
    }

    fn push(&mut self, id: I, data: P) {
        debug_assert!(
            self.last_id().map_or(true, |last| last < id),
            "id {} pushed out of order",
            id
        );
        self.insert_after(self.tail, id, data);
    }

    fn len(&self) -> usize {
        self.count
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.count = 0;
    }

    fn last_id(&self) -> Option<I> {
        self.tail.and_then(|slot| self.node(slot)).map(|n| n.id)
    }

    fn get_mut(&mut self, id: I) -> Option<&mut P> {
        let mut at = self.head;
        while let Some(slot) = at {
            let node = self.node(slot)?;
            if node.id >= id {
                break;
            }
            at = node.next;
        }
        let node = self.node_mut(at?)?;
        (node.id == id).then_some(&mut node.data)
    }

    fn retain_mut<F>(&mut self, mut keep: F)
    where
        F: FnMut(I, &mut P) -> bool,
    {
        let mut prev = None;
        let mut at = self.head;
        while let Some(slot) = at {
            let Some(node) = self.node_mut(slot) else {
                break;
            };
            let next = node.next;
            if keep(node.id, &mut node.data) {
                prev = Some(slot);
            } else {
                self.erase_after(prev);
            }
            at = next;
        }
    }

    fn map_ids<F>(&mut self, mut f: F)
    where
        F: FnMut(I) -> I,
    {
        let mut at = self.head;
        while let Some(node) = at.and_then(|slot| self.node_mut(slot)) {
            node.id = f(node.id);
            at = node.next;
        }
    }

    /// Merges in place: new nodes are linked after the lagging `prev`
    /// handle and dropped nodes are unlinked from it.
    fn merge_in<'b, Q, R, B, O>(&mut self, arg: R, both: B, right_only: O)
    where
        Q: Payload,
        R: ReadCursor<'b, I, Q>,
        B: FnMut(I, &mut P, &'b Q) -> bool,
        O: FnMut(I, &'b Q) -> Option<P>,
    {
        let (mut arg, mut both, mut right_only) = (arg, both, right_only);
        let mut prev = None;
        let mut at = self.head;
        loop {
            let left = at.and_then(|slot| self.node(slot)).map(|n| n.id);
            let Some((which, id)) = side(left, arg.id()) else {
                break;
            };
            match which {
                Side::Left => {
                    prev = at;
                    at = self.next_of(at);
                }
                Side::Right => {
                    if let Some(data) = arg.payload().and_then(|q| right_only(id, q)) {
                        prev = Some(self.insert_after(prev, id, data));
                    }
                    arg.advance();
                }
                Side::Both => {
                    let next = self.next_of(at);
                    let node = at.and_then(|slot| self.node_mut(slot));
                    let keep = match (node, arg.payload()) {
                        (Some(node), Some(q)) => both(id, &mut node.data, q),
                        _ => true,
                    };
                    if keep {
                        prev = at;
                    } else {
                        self.erase_after(prev);
                    }
                    at = next;
                    arg.advance();
                }
            }
        }
    }
}

/// Read cursor over a [`SinglyLinked`] list; also its iterator.
pub struct ListCursor<'a, I, P> {
    list: &'a SinglyLinked<I, P>,
    at: Option<usize>,
}

impl<I, P> Clone for ListCursor<'_, I, P> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            at: self.at,
        }
    }
}

impl<'a, I: Id, P: Payload> ListCursor<'a, I, P> {
    fn current(&self) -> Option<&'a Node<I, P>> {
        let list: &'a SinglyLinked<I, P> = self.list;
        list.node(self.at?)
    }
}

impl<I: Id, P: Payload> Seek<I> for ListCursor<'_, I, P> {
    fn id(&self) -> Option<I> {
        self.current().map(|n| n.id)
    }

    fn advance(&mut self) {
        self.at = self.current().and_then(|n| n.next);
    }
}

impl<'a, I: Id, P: Payload> ReadCursor<'a, I, P> for ListCursor<'a, I, P> {
    fn payload(&self) -> Option<&'a P> {
        self.current().map(|n| &n.data)
    }
}

impl<'a, I: Id, P: Payload> Iterator for ListCursor<'a, I, P> {
    type Item = ElementRef<'a, I, P>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current()?;
        self.at = node.next;
        Some(ElementRef::new(node.id, &node.data))
    }
}

/// Payload-mutating cursor over a [`SinglyLinked`] list.
pub struct ListCursorMut<'a, I, P> {
    list: &'a mut SinglyLinked<I, P>,
    at: Option<usize>,
}

impl<I: Id, P: Payload> Seek<I> for ListCursorMut<'_, I, P> {
    fn id(&self) -> Option<I> {
        self.list.node(self.at?).map(|n| n.id)
    }

    fn advance(&mut self) {
        if let Some(slot) = self.at {
            self.at = self.list.node(slot).and_then(|n| n.next);
        }
    }
}

impl<I: Id, P: Payload> WriteCursor<I, P> for ListCursorMut<'_, I, P> {
    fn payload_mut(&mut self) -> Option<&mut P> {
        let slot = self.at?;
        self.list.node_mut(slot).map(|n| &mut n.data)
    }
}

/// Consuming iterator over a [`SinglyLinked`] list.
pub struct ListIntoIter<I, P> {
    list: SinglyLinked<I, P>,
}

impl<I: Id, P: Payload> Iterator for ListIntoIter<I, P> {
    type Item = (I, P);

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.count, Some(self.list.count))
    }
}

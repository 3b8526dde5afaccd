/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The [`Sdr`] type and its merge-based algebra.
//!
//! Every binary operation comes in four forms:
//!
//! | Shape | value       | in place | size   | visitor           |
//! |-------|-------------|----------|--------|-------------------|
//! | AND   | `ande`      | `andi`   | `ands` | `andv`            |
//! | OR    | `ore`       | `ori`    | `ors`  | `orv`             |
//! | XOR   | `xore`      | `xori`   | `xors` |                   |
//! | RM    | `rme`       | `rmi`    | `rms`  | `rmv`             |
//!
//! Value forms read both operands and build a fresh SDR, optionally in
//! a different container (`*_into`). In-place forms rewrite the
//! receiver. Size forms only count. Visitor forms hand matched
//! payloads to a closure.
//!
//! The in-place forms take `&mut self` and `&arg`, so an SDR can
//! never be passed as its own argument. Self-combination has its own
//! entry points ([`Sdr::andi_self`] and friends) that follow the set
//! laws whatever the payload: AND and OR of an SDR with itself are the
//! SDR, XOR and RM are empty.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::BitAnd;
use std::ops::BitAndAssign;
use std::ops::BitOr;
use std::ops::BitOrAssign;
use std::ops::BitXor;
use std::ops::BitXorAssign;
use std::ops::Div;
use std::ops::DivAssign;
use std::ops::Shl;
use std::ops::ShlAssign;
use std::ops::Shr;
use std::ops::ShrAssign;
use std::ops::Sub;
use std::ops::SubAssign;

use rand::Rng;
use sdr_algebra::Combine;
use sdr_algebra::CombineXor;
use sdr_algebra::Divide;
use sdr_algebra::Payload;
use sdr_algebra::Unit;
use sdr_algebra::sum_all;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::config::SdrConfig;
use crate::config::global;
use crate::container::Array;
use crate::container::Container;
use crate::container::ReadCursor;
use crate::container::Seek;
use crate::container::WriteCursor;
use crate::element::Element;
use crate::element::ElementRef;
use crate::error::SdrError;
use crate::id::Id;
use crate::merge;
use crate::merge::Side;

/// A sparse distributed representation: an ascending, duplicate-free
/// sequence of `(id, payload)` pairs stored in a container `C`.
///
/// Invariants:
///
/// - ids are strictly ascending;
/// - every stored payload is [`Payload::relevant`].
///
/// Both are checked with `debug_assert!` on construction; the algebra
/// preserves them.
///
/// # Example
/// ```
/// use sdr::Sdr;
///
/// let a: Sdr = Sdr::from_ids([1, 2, 3]);
/// let b: Sdr = Sdr::from_ids([2, 3, 4]);
/// assert_eq!((&a & &b).to_string(), "[2,3]");
/// assert_eq!((&a | &b).to_string(), "[1,2,3,4]");
/// assert_eq!((&a ^ &b).to_string(), "[1,4]");
/// assert_eq!(a.ands(&b), 2);
/// ```
#[derive(Clone)]
pub struct Sdr<I = u32, P = Unit, C = Array<I, P>> {
    container: C,
    _marker: PhantomData<fn() -> (I, P)>,
}

fn config() -> SdrConfig {
    global::get()
}

impl<I: Id, P: Payload, C: Container<I, P>> Default for Sdr<I, P, C> {
    fn default() -> Self {
        Self::new()
    }
}

// Construction and access.
impl<I: Id, P: Payload, C: Container<I, P>> Sdr<I, P, C> {
    /// An empty SDR.
    pub fn new() -> Self {
        Self::from_container(C::default())
    }

    /// An empty SDR with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_container(C::with_capacity(capacity))
    }

    /// An empty output sized for at most `bound` elements, when
    /// output reservation is enabled.
    fn reserved(config: &SdrConfig, bound: usize) -> Self {
        if config.reserve_outputs {
            Self::with_capacity(bound)
        } else {
            Self::new()
        }
    }

    /// Wrap an existing container. The container must already satisfy
    /// the SDR invariants.
    pub fn from_container(container: C) -> Self {
        let sdr = Self {
            container,
            _marker: PhantomData,
        };
        debug_assert!(sdr.is_well_formed(), "container is not a valid SDR");
        sdr
    }

    /// The backing container.
    pub fn container(&self) -> &C {
        &self.container
    }

    /// Unwrap the backing container.
    pub fn into_container(self) -> C {
        self.container
    }

    /// Build from ascending ids, each with the default payload.
    ///
    /// Non-ascending input is a programming error; see
    /// [`Sdr::try_from_ids`] for untrusted input.
    pub fn from_ids<T: IntoIterator<Item = I>>(ids: T) -> Self {
        let mut sdr = Self::new();
        for id in ids {
            sdr.push(id, P::default());
        }
        sdr
    }

    /// Build from ids, reporting the first position that is not
    /// strictly ascending.
    pub fn try_from_ids<T: IntoIterator<Item = I>>(ids: T) -> Result<Self, SdrError> {
        Self::try_from_elements(ids.into_iter().map(Element::from_id))
    }

    /// Build from ascending elements. Elements whose payload is not
    /// relevant are skipped.
    pub fn from_elements<T: IntoIterator<Item = Element<I, P>>>(elements: T) -> Self {
        let mut sdr = Self::new();
        sdr.extend(elements);
        sdr
    }

    /// Build from elements, reporting the first position that is not
    /// strictly ascending. Irrelevant elements are skipped, as in
    /// [`Sdr::from_elements`].
    pub fn try_from_elements<T: IntoIterator<Item = Element<I, P>>>(
        elements: T,
    ) -> Result<Self, SdrError> {
        let mut sdr = Self::new();
        let mut last = None;
        for (position, element) in elements.into_iter().enumerate() {
            let (id, data) = element.into_parts();
            if last.is_some_and(|last| id <= last) {
                return Err(SdrError::NotAscending { position });
            }
            last = Some(id);
            if data.relevant() {
                sdr.container.push(id, data);
            }
        }
        Ok(sdr)
    }

    /// Append an element. `id` must exceed every id present and `data`
    /// must be relevant.
    pub fn push(&mut self, id: I, data: P) {
        debug_assert!(data.relevant(), "element {} is not relevant", id);
        self.container.push(id, data);
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.container.len()
    }

    /// True if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.container.clear();
    }

    /// Iterate in ascending id order.
    pub fn iter(&self) -> C::Iter<'_> {
        self.container.iter()
    }

    /// The ids, in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = I> + '_ {
        self.iter().map(|e| e.id())
    }

    /// Smallest id.
    pub fn first_id(&self) -> Option<I> {
        self.container.first_id()
    }

    /// Largest id.
    pub fn last_id(&self) -> Option<I> {
        self.container.last_id()
    }

    /// Payload stored under `id`. Absence is `None`, never an error.
    pub fn get(&self, id: I) -> Option<&P> {
        self.container.get(id)
    }

    /// Mutable payload stored under `id`.
    pub fn get_mut(&mut self, id: I) -> Option<&mut P> {
        self.container.get_mut(id)
    }

    /// True if `id` is present.
    pub fn contains(&self, id: I) -> bool {
        self.get(id).is_some()
    }

    /// Apply `f` to every `(id, payload)`. `f` must leave payloads
    /// relevant.
    pub fn visit<F>(&mut self, mut f: F)
    where
        F: FnMut(I, &mut P),
    {
        let mut cursor = self.container.cursor_mut();
        while let Some(id) = cursor.id() {
            if let Some(data) = cursor.payload_mut() {
                f(id, data);
            }
            cursor.advance();
        }
    }

    /// Check the SDR invariants: strictly ascending ids, relevant
    /// payloads.
    pub fn is_well_formed(&self) -> bool {
        let mut last = None;
        self.iter().all(|e| {
            let ascending = last.map_or(true, |last| last < e.id());
            last = Some(e.id());
            ascending && e.data().relevant()
        })
    }

    /// Lexicographic comparison of the id sequences, ignoring payloads.
    pub fn cmp_ids<Q, D>(&self, other: &Sdr<I, Q, D>) -> Ordering
    where
        Q: Payload,
        D: Container<I, Q>,
    {
        self.ids().cmp(other.ids())
    }

    /// Reduce every payload with `combine_or`. `None` when empty.
    pub fn sum(&self) -> Option<P>
    where
        P: Combine,
    {
        sum_all(self.iter().map(|e| e.data().clone()))
    }

    /// Remove the given ids, which must be ascending.
    fn remove_sorted(&mut self, ids: &[I]) {
        if ids.is_empty() {
            return;
        }
        let mut next = 0;
        self.container.retain_mut(|id, _| {
            while next < ids.len() && ids[next] < id {
                next += 1;
            }
            !(next < ids.len() && ids[next] == id)
        });
    }
}

// AND: intersection.
impl<I: Id, P: Payload, C: Container<I, P>> Sdr<I, P, C> {
    /// Payload under `id`, the single-id form of AND.
    pub fn ande_id(&self, id: I) -> Option<&P> {
        self.get(id)
    }

    /// Intersection.
    pub fn ande<Q, D>(&self, arg: &Sdr<I, Q, D>) -> Self
    where
        Q: Payload,
        D: Container<I, Q>,
        P: Combine<Q>,
    {
        self.ande_into(arg)
    }

    /// Intersection into a container of another kind.
    pub fn ande_into<E, Q, D>(&self, arg: &Sdr<I, Q, D>) -> Sdr<I, P, E>
    where
        E: Container<I, P>,
        Q: Payload,
        D: Container<I, Q>,
        P: Combine<Q>,
    {
        let config = config();
        let mut out = Sdr::<I, P, E>::reserved(&config, self.len().min(arg.len()));
        let mut left = self.container.cursor();
        let mut right = arg.container.cursor();
        merge::and_join(&mut left, &mut right, config.traversal, |id, l, r| {
            if let (Some(p), Some(q)) = (l.payload(), r.payload()) {
                let data = p.combine_and(q);
                if data.relevant() {
                    out.container.push(id, data);
                }
            }
        });
        out
    }

    /// Size of the intersection.
    pub fn ands<Q, D>(&self, arg: &Sdr<I, Q, D>) -> usize
    where
        Q: Payload,
        D: Container<I, Q>,
        P: Combine<Q>,
    {
        let mut count = 0;
        self.and_visit(arg, |_, p, q| {
            if p.combine_and(q).relevant() {
                count += 1;
            }
        });
        count
    }

    /// Intersection in place.
    pub fn andi<Q, D>(&mut self, arg: &Sdr<I, Q, D>)
    where
        Q: Payload,
        D: Container<I, Q>,
        P: Combine<Q>,
    {
        let traversal = config().traversal;
        let mut right = arg.container.cursor();
        self.container.retain_mut(|id, data| {
            right.seek(id, traversal);
            if right.id() != Some(id) {
                return false;
            }
            match right.payload() {
                Some(q) => {
                    data.combine_and_assign(q);
                    data.relevant()
                }
                None => false,
            }
        });
    }

    /// Intersection of an SDR with itself: the SDR unchanged.
    pub fn ande_self(&self) -> Self
    where
        P: Combine,
    {
        self.clone()
    }

    /// Size of the intersection of an SDR with itself.
    pub fn ands_self(&self) -> usize
    where
        P: Combine,
    {
        self.len()
    }

    /// Intersection of an SDR with itself, in place. A no-op.
    pub fn andi_self(&mut self)
    where
        P: Combine,
    {
    }

    /// Call `visitor` on every id present on both sides with mutable
    /// access to both payloads. The visitor must leave both payloads
    /// relevant.
    pub fn andv<Q, D, F>(&mut self, arg: &mut Sdr<I, Q, D>, mut visitor: F)
    where
        Q: Payload,
        D: Container<I, Q>,
        F: FnMut(I, &mut P, &mut Q),
    {
        let traversal = config().traversal;
        let mut left = self.container.cursor_mut();
        let mut right = arg.container.cursor_mut();
        merge::and_join(&mut left, &mut right, traversal, |id, l, r| {
            if let (Some(p), Some(q)) = (l.payload_mut(), r.payload_mut()) {
                visitor(id, p, q);
            }
        });
    }

    /// Like [`Sdr::andv`], with the argument borrowed immutably.
    pub fn andv_with<Q, D, F>(&mut self, arg: &Sdr<I, Q, D>, mut visitor: F)
    where
        Q: Payload,
        D: Container<I, Q>,
        F: FnMut(I, &mut P, &Q),
    {
        let traversal = config().traversal;
        let mut left = self.container.cursor_mut();
        let mut right = arg.container.cursor();
        merge::and_join(&mut left, &mut right, traversal, |id, l, r| {
            if let (Some(p), Some(q)) = (l.payload_mut(), r.payload()) {
                visitor(id, p, q);
            }
        });
    }

    /// Call `visitor` on every id present on both sides.
    pub fn and_visit<Q, D, F>(&self, arg: &Sdr<I, Q, D>, mut visitor: F)
    where
        Q: Payload,
        D: Container<I, Q>,
        F: FnMut(I, &P, &Q),
    {
        let traversal = config().traversal;
        let mut left = self.container.cursor();
        let mut right = arg.container.cursor();
        merge::and_join(&mut left, &mut right, traversal, |id, l, r| {
            if let (Some(p), Some(q)) = (l.payload(), r.payload()) {
                visitor(id, p, q);
            }
        });
    }

    /// Elements with `start <= id < stop`.
    pub fn ande_range(&self, start: I, stop: I) -> Self {
        let mut out = Self::new();
        let mut cursor = self.container.cursor();
        cursor.lower_bound(start);
        while let Some(id) = cursor.id().filter(|id| *id < stop) {
            if let Some(data) = cursor.payload() {
                out.container.push(id, data.clone());
            }
            cursor.advance();
        }
        out
    }

    /// Number of elements with `start <= id < stop`.
    pub fn ands_range(&self, start: I, stop: I) -> usize {
        let mut cursor = self.container.cursor();
        cursor.lower_bound(start);
        let mut count = 0;
        while cursor.id().is_some_and(|id| id < stop) {
            count += 1;
            cursor.advance();
        }
        count
    }

    /// Positions in `self` of the ids also present in `arg`.
    pub fn andp<Q, D>(&self, arg: &Sdr<I, Q, D>) -> Vec<usize>
    where
        Q: Payload,
        D: Container<I, Q>,
    {
        let traversal = config().traversal;
        let mut right = arg.container.cursor();
        self.iter()
            .enumerate()
            .filter_map(|(position, e)| {
                right.seek(e.id(), traversal);
                (right.id() == Some(e.id())).then_some(position)
            })
            .collect()
    }
}

// OR: union.
impl<I: Id, P: Payload, C: Container<I, P>> Sdr<I, P, C> {
    /// Union.
    pub fn ore<Q, D>(&self, arg: &Sdr<I, Q, D>) -> Self
    where
        Q: Payload,
        D: Container<I, Q>,
        P: Combine<Q>,
    {
        self.ore_into(arg)
    }

    /// Union into a container of another kind.
    pub fn ore_into<E, Q, D>(&self, arg: &Sdr<I, Q, D>) -> Sdr<I, P, E>
    where
        E: Container<I, P>,
        Q: Payload,
        D: Container<I, Q>,
        P: Combine<Q>,
    {
        let config = config();
        let mut out = Sdr::<I, P, E>::reserved(&config, self.len() + arg.len());
        let mut left = self.container.cursor();
        let mut right = arg.container.cursor();
        merge::or_join(&mut left, &mut right, |which, id, l, r| {
            let data = match which {
                Side::Left => l.payload().cloned(),
                Side::Right => r.payload().map(|q| <P as Combine<Q>>::adopt(q)),
                Side::Both => l.payload().zip(r.payload()).map(|(p, q)| p.combine_or(q)),
            };
            if let Some(data) = data {
                out.container.push(id, data);
            }
        });
        out
    }

    /// Size of the union.
    ///
    /// When both containers know their length this is
    /// `|a| + |b| - |a & b|`, which only walks the shared ids.
    pub fn ors<Q, D>(&self, arg: &Sdr<I, Q, D>) -> usize
    where
        Q: Payload,
        D: Container<I, Q>,
    {
        let mut left = self.container.cursor();
        let mut right = arg.container.cursor();
        if C::CAPABILITIES.native_len && D::CAPABILITIES.native_len {
            let common = merge::count_common(&mut left, &mut right, config().traversal);
            return self.len() + arg.len() - common;
        }
        let mut count = 0;
        merge::or_join(&mut left, &mut right, |_, _, _, _| count += 1);
        count
    }

    /// Union in place.
    pub fn ori<Q, D>(&mut self, arg: &Sdr<I, Q, D>)
    where
        Q: Payload,
        D: Container<I, Q>,
        P: Combine<Q>,
    {
        self.container.merge_in(
            arg.container.cursor(),
            |_, p, q| {
                p.combine_or_assign(q);
                true
            },
            |_, q| Some(<P as Combine<Q>>::adopt(q)),
        );
    }

    /// Union of an SDR with itself: the SDR unchanged.
    pub fn ore_self(&self) -> Self
    where
        P: Combine,
    {
        self.clone()
    }

    /// Size of the union of an SDR with itself.
    pub fn ors_self(&self) -> usize
    where
        P: Combine,
    {
        self.len()
    }

    /// Union of an SDR with itself, in place. A no-op.
    pub fn ori_self(&mut self)
    where
        P: Combine,
    {
    }

    /// Call `visitor` on every id present on either side. Payloads
    /// are `None` on the side where the id is absent.
    pub fn orv<Q, D, F>(&mut self, arg: &mut Sdr<I, Q, D>, mut visitor: F)
    where
        Q: Payload,
        D: Container<I, Q>,
        F: FnMut(I, Option<&mut P>, Option<&mut Q>),
    {
        let mut left = self.container.cursor_mut();
        let mut right = arg.container.cursor_mut();
        merge::or_join(&mut left, &mut right, |which, id, l, r| match which {
            Side::Left => visitor(id, l.payload_mut(), None),
            Side::Right => visitor(id, None, r.payload_mut()),
            Side::Both => visitor(id, l.payload_mut(), r.payload_mut()),
        });
    }
}

// XOR: symmetric difference.
impl<I: Id, P: Payload, C: Container<I, P>> Sdr<I, P, C> {
    /// Symmetric difference.
    pub fn xore<Q, D>(&self, arg: &Sdr<I, Q, D>) -> Self
    where
        Q: Payload,
        D: Container<I, Q>,
        P: CombineXor<Q>,
    {
        self.xore_into(arg)
    }

    /// Symmetric difference into a container of another kind.
    pub fn xore_into<E, Q, D>(&self, arg: &Sdr<I, Q, D>) -> Sdr<I, P, E>
    where
        E: Container<I, P>,
        Q: Payload,
        D: Container<I, Q>,
        P: CombineXor<Q>,
    {
        let config = config();
        let mut out = Sdr::<I, P, E>::reserved(&config, self.len() + arg.len());
        let mut left = self.container.cursor();
        let mut right = arg.container.cursor();
        merge::or_join(&mut left, &mut right, |which, id, l, r| {
            let data = match which {
                Side::Left => l.payload().cloned(),
                Side::Right => r.payload().map(|q| <P as Combine<Q>>::adopt(q)),
                Side::Both => l
                    .payload()
                    .zip(r.payload())
                    .map(|(p, q)| p.combine_xor(q))
                    .filter(P::rm_relevant),
            };
            if let Some(data) = data {
                out.container.push(id, data);
            }
        });
        out
    }

    /// Size of the symmetric difference.
    pub fn xors<Q, D>(&self, arg: &Sdr<I, Q, D>) -> usize
    where
        Q: Payload,
        D: Container<I, Q>,
        P: CombineXor<Q>,
    {
        let mut left = self.container.cursor();
        let mut right = arg.container.cursor();
        let mut count = 0;
        merge::or_join(&mut left, &mut right, |which, _, l, r| {
            let kept = match which {
                Side::Left | Side::Right => true,
                Side::Both => l
                    .payload()
                    .zip(r.payload())
                    .is_some_and(|(p, q)| p.combine_xor(q).rm_relevant()),
            };
            if kept {
                count += 1;
            }
        });
        count
    }

    /// Symmetric difference in place.
    pub fn xori<Q, D>(&mut self, arg: &Sdr<I, Q, D>)
    where
        Q: Payload,
        D: Container<I, Q>,
        P: CombineXor<Q>,
    {
        self.container.merge_in(
            arg.container.cursor(),
            |_, p, q| {
                p.combine_xor_assign(q);
                p.rm_relevant()
            },
            |_, q| Some(<P as Combine<Q>>::adopt(q)),
        );
    }

    /// Symmetric difference of an SDR with itself: always empty.
    pub fn xore_self(&self) -> Self
    where
        P: CombineXor,
    {
        Self::new()
    }

    /// Size of the symmetric difference of an SDR with itself.
    pub fn xors_self(&self) -> usize
    where
        P: CombineXor,
    {
        0
    }

    /// Symmetric difference of an SDR with itself, in place. Clears.
    pub fn xori_self(&mut self)
    where
        P: CombineXor,
    {
        self.clear();
    }
}

// RM: subtraction.
impl<I: Id, P: Payload, C: Container<I, P>> Sdr<I, P, C> {
    /// Subtraction.
    pub fn rme<Q, D>(&self, arg: &Sdr<I, Q, D>) -> Self
    where
        Q: Payload,
        D: Container<I, Q>,
        P: Combine<Q>,
    {
        self.rme_into(arg)
    }

    /// Subtraction into a container of another kind.
    pub fn rme_into<E, Q, D>(&self, arg: &Sdr<I, Q, D>) -> Sdr<I, P, E>
    where
        E: Container<I, P>,
        Q: Payload,
        D: Container<I, Q>,
        P: Combine<Q>,
    {
        let config = config();
        let mut out = Sdr::<I, P, E>::reserved(&config, self.len());
        let mut left = self.container.cursor();
        let mut right = arg.container.cursor();
        merge::rm_join(&mut left, &mut right, config.traversal, |id, l, r| {
            let Some(p) = l.payload() else {
                return;
            };
            let data = match r.and_then(|r| r.payload()) {
                Some(q) => Some(p.combine_rm(q)).filter(P::rm_relevant),
                None => Some(p.clone()),
            };
            if let Some(data) = data {
                out.container.push(id, data);
            }
        });
        out
    }

    /// Size of the subtraction.
    pub fn rms<Q, D>(&self, arg: &Sdr<I, Q, D>) -> usize
    where
        Q: Payload,
        D: Container<I, Q>,
        P: Combine<Q>,
    {
        let mut left = self.container.cursor();
        let mut right = arg.container.cursor();
        let mut count = 0;
        merge::rm_join(&mut left, &mut right, config().traversal, |_, l, r| {
            let kept = match (l.payload(), r.and_then(|r| r.payload())) {
                (Some(p), Some(q)) => p.combine_rm(q).rm_relevant(),
                (Some(_), None) => true,
                (None, _) => false,
            };
            if kept {
                count += 1;
            }
        });
        count
    }

    /// Subtraction in place.
    pub fn rmi<Q, D>(&mut self, arg: &Sdr<I, Q, D>)
    where
        Q: Payload,
        D: Container<I, Q>,
        P: Combine<Q>,
    {
        if arg.is_empty() {
            return;
        }
        let traversal = config().traversal;
        let mut right = arg.container.cursor();
        self.container.retain_mut(|id, data| {
            right.seek(id, traversal);
            if right.id() != Some(id) {
                return true;
            }
            match right.payload() {
                Some(q) => {
                    data.combine_rm_assign(q);
                    data.rm_relevant()
                }
                None => true,
            }
        });
    }

    /// Subtraction of an SDR from itself: always empty.
    pub fn rme_self(&self) -> Self
    where
        P: Combine,
    {
        Self::new()
    }

    /// Size of the subtraction of an SDR from itself.
    pub fn rms_self(&self) -> usize
    where
        P: Combine,
    {
        0
    }

    /// Subtraction of an SDR from itself, in place. Clears.
    pub fn rmi_self(&mut self)
    where
        P: Combine,
    {
        self.clear();
    }

    /// Call `visitor` on every id of `self`, with the matching
    /// argument payload when there is one.
    pub fn rmv<Q, D, F>(&mut self, arg: &mut Sdr<I, Q, D>, mut visitor: F)
    where
        Q: Payload,
        D: Container<I, Q>,
        F: FnMut(I, &mut P, Option<&mut Q>),
    {
        let traversal = config().traversal;
        let mut left = self.container.cursor_mut();
        let mut right = arg.container.cursor_mut();
        merge::rm_join(&mut left, &mut right, traversal, |id, l, r| {
            if let Some(p) = l.payload_mut() {
                visitor(id, p, r.and_then(|r| r.payload_mut()));
            }
        });
    }

    /// Replace `a` with `a - b` and `b` with `b - a`, both computed
    /// from the original operands.
    pub fn separate<Q, D>(a: &mut Self, b: &mut Sdr<I, Q, D>)
    where
        Q: Combine<P>,
        D: Container<I, Q>,
        P: Combine<Q>,
    {
        let mut drop_a = Vec::new();
        let mut drop_b = Vec::new();
        a.andv(b, |id, p, q| {
            let next_p = p.combine_rm(q);
            let next_q = q.combine_rm(p);
            if !next_p.rm_relevant() {
                drop_a.push(id);
            }
            if !next_q.rm_relevant() {
                drop_b.push(id);
            }
            *p = next_p;
            *q = next_q;
        });
        a.remove_sorted(&drop_a);
        b.remove_sorted(&drop_b);
    }
}

// Shift, append, sampling, division.
impl<I: Id, P: Payload, C: Container<I, P>> Sdr<I, P, C> {
    /// Add `by` to every id, failing without change if any id would
    /// leave the id type's range.
    pub fn try_shift(&mut self, by: i64) -> Result<(), SdrError> {
        for id in [self.first_id(), self.last_id()].into_iter().flatten() {
            if id.offset(by).is_none() {
                let value = id
                    .to_i128()
                    .map_or(i128::MAX, |v| v.saturating_add(i128::from(by)));
                return Err(SdrError::IdOutOfRange { value });
            }
        }
        // First and last fit, so every id in between does too.
        self.container.map_ids(|id| id.offset(by).unwrap_or(id));
        Ok(())
    }

    /// Add `by` to every id. Overflow is a programming error: it
    /// asserts in debug builds and leaves the SDR unchanged otherwise.
    pub fn shift(&mut self, by: i64) {
        let result = self.try_shift(by);
        debug_assert!(result.is_ok(), "shift by {}: {:?}", by, result);
    }

    /// Concatenate `arg` onto the end. Every id of `arg` must exceed
    /// every id of `self`.
    pub fn append<D: Container<I, P>>(&mut self, arg: Sdr<I, P, D>) {
        debug_assert!(
            Self::check_append(self.last_id(), arg.first_id()).is_ok(),
            "appended ids overlap"
        );
        self.append_unchecked(arg);
    }

    /// [`Sdr::append`], reporting overlapping ranges as an error.
    pub fn try_append<D: Container<I, P>>(&mut self, arg: Sdr<I, P, D>) -> Result<(), SdrError> {
        Self::check_append(self.last_id(), arg.first_id())?;
        self.append_unchecked(arg);
        Ok(())
    }

    fn check_append(last: Option<I>, first: Option<I>) -> Result<(), SdrError> {
        match (last, first) {
            (Some(last), Some(first)) if first <= last => Err(SdrError::Overlap {
                last: last.to_string(),
                first: first.to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn append_unchecked<D: Container<I, P>>(&mut self, arg: Sdr<I, P, D>) {
        self.container.reserve(arg.len());
        for (id, data) in arg.container.into_pairs() {
            self.container.push(id, data);
        }
    }

    /// Keep each element independently with probability `amount`.
    pub fn sample_portion<R: Rng + ?Sized>(&mut self, amount: f32, rng: &mut R) {
        debug_assert!(
            (0.0..=1.0).contains(&amount),
            "sampling fraction {} is outside [0, 1]",
            amount
        );
        self.container.retain_mut(|_, _| rng.gen::<f32>() < amount);
    }

    /// [`Sdr::sample_portion`], rejecting fractions outside `[0, 1]`.
    pub fn try_sample_portion<R: Rng + ?Sized>(
        &mut self,
        amount: f32,
        rng: &mut R,
    ) -> Result<(), SdrError> {
        if !(0.0..=1.0).contains(&amount) {
            return Err(SdrError::FractionOutOfRange { amount });
        }
        self.sample_portion(amount, rng);
        Ok(())
    }

    /// Keep exactly `len` elements chosen uniformly without
    /// replacement. No-op if the SDR already has at most `len`.
    pub fn sample_length<R: Rng + ?Sized>(&mut self, len: usize, rng: &mut R) {
        let total = self.len();
        if len >= total {
            return;
        }
        let mut keep = rand::seq::index::sample(rng, total, len).into_vec();
        keep.sort_unstable();
        let mut position = 0;
        let mut next = 0;
        self.container.retain_mut(|_, _| {
            let kept = keep.get(next) == Some(&position);
            if kept {
                next += 1;
            }
            position += 1;
            kept
        });
    }

    /// Element-wise division. Elements of `self` absent from `arg`
    /// pass through unchanged; ids only in `arg` are ignored.
    pub fn divide<D: Container<I, P>>(&self, arg: &Sdr<I, P, D>) -> Self
    where
        P: Divide,
    {
        let config = config();
        let mut out = Self::reserved(&config, self.len());
        let mut left = self.container.cursor();
        let mut right = arg.container.cursor();
        merge::rm_join(&mut left, &mut right, config.traversal, |id, l, r| {
            let Some(p) = l.payload() else {
                return;
            };
            let data = match r.and_then(|r| r.payload()) {
                Some(q) => p.divide(q),
                None => p.clone(),
            };
            if data.relevant() {
                out.container.push(id, data);
            }
        });
        out
    }

    /// Element-wise division in place, on the shared ids.
    pub fn divide_assign<D: Container<I, P>>(&mut self, arg: &Sdr<I, P, D>)
    where
        P: Divide,
    {
        self.andv_with(arg, |_, p, q| *p = p.divide(q));
    }
}

impl<I, P, C> PartialEq<Sdr<I, P, C>> for Sdr<I, P, C>
where
    I: Id,
    P: Payload + PartialEq,
    C: Container<I, P>,
{
    fn eq(&self, other: &Sdr<I, P, C>) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.id() == b.id() && a.data() == b.data())
    }
}

impl<I: Id, P: Payload, C: Container<I, P>> Sdr<I, P, C> {
    /// Element-wise equality with an SDR in any container.
    pub fn same_as<D: Container<I, P>>(&self, other: &Sdr<I, P, D>) -> bool
    where
        P: PartialEq,
    {
        self.iter()
            .map(|e| (e.id(), e.data()))
            .eq(other.iter().map(|e| (e.id(), e.data())))
    }
}

impl<I: Id, P: Payload, C: Container<I, P>> fmt::Debug for Sdr<I, P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|e| (e.id(), e.data())))
            .finish()
    }
}

impl<I: Id, P: Payload, C: Container<I, P>> fmt::Display for Sdr<I, P, C> {
    /// `[id(payload),...]`, or `[id,...]` for payloads without
    /// printable information.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, "]")
    }
}

impl<I, P, C> Serialize for Sdr<I, P, C>
where
    I: Id + Serialize,
    P: Payload + Serialize,
    C: Container<I, P>,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, I, P, C> Deserialize<'de> for Sdr<I, P, C>
where
    I: Id + Deserialize<'de>,
    P: Payload + Deserialize<'de>,
    C: Container<I, P>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let elements = Vec::<Element<I, P>>::deserialize(deserializer)?;
        Self::try_from_elements(elements).map_err(serde::de::Error::custom)
    }
}

impl<'a, I: Id, P: Payload, C: Container<I, P>> IntoIterator for &'a Sdr<I, P, C> {
    type Item = ElementRef<'a, I, P>;
    type IntoIter = C::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<I: Id, P: Payload, C: Container<I, P>> IntoIterator for Sdr<I, P, C> {
    type Item = (I, P);
    type IntoIter = C::IntoPairs;

    fn into_iter(self) -> Self::IntoIter {
        self.container.into_pairs()
    }
}

impl<I: Id, P: Payload, C: Container<I, P>> FromIterator<Element<I, P>> for Sdr<I, P, C> {
    fn from_iter<T: IntoIterator<Item = Element<I, P>>>(iter: T) -> Self {
        Self::from_elements(iter)
    }
}

impl<I: Id, P: Payload, C: Container<I, P>> Extend<Element<I, P>> for Sdr<I, P, C> {
    /// Append ascending elements, skipping irrelevant payloads.
    fn extend<T: IntoIterator<Item = Element<I, P>>>(&mut self, iter: T) {
        for element in iter {
            let (id, data) = element.into_parts();
            if data.relevant() {
                self.container.push(id, data);
            }
        }
    }
}

// An SDR is itself a payload, which is what makes a matrix an SDR of
// SDRs. An empty inner SDR is irrelevant.
impl<I: Id, P: Payload, C: Container<I, P>> Payload for Sdr<I, P, C> {
    fn relevant(&self) -> bool {
        !self.is_empty()
    }

    fn rm_relevant(&self) -> bool {
        !self.is_empty()
    }
}

impl<I, P, Q, C, D> Combine<Sdr<I, Q, D>> for Sdr<I, P, C>
where
    I: Id,
    P: Combine<Q>,
    Q: Payload,
    C: Container<I, P>,
    D: Container<I, Q>,
{
    fn combine_and(&self, other: &Sdr<I, Q, D>) -> Self {
        self.ande(other)
    }

    fn combine_or(&self, other: &Sdr<I, Q, D>) -> Self {
        self.ore(other)
    }

    fn combine_rm(&self, other: &Sdr<I, Q, D>) -> Self {
        self.rme(other)
    }

    fn adopt(other: &Sdr<I, Q, D>) -> Self {
        other
            .iter()
            .map(|e| Element::new(e.id(), <P as Combine<Q>>::adopt(e.data())))
            .collect()
    }

    fn combine_and_assign(&mut self, other: &Sdr<I, Q, D>) {
        self.andi(other);
    }

    fn combine_or_assign(&mut self, other: &Sdr<I, Q, D>) {
        self.ori(other);
    }

    fn combine_rm_assign(&mut self, other: &Sdr<I, Q, D>) {
        self.rmi(other);
    }
}

impl<I, P, Q, C, D> CombineXor<Sdr<I, Q, D>> for Sdr<I, P, C>
where
    I: Id,
    P: CombineXor<Q>,
    Q: Payload,
    C: Container<I, P>,
    D: Container<I, Q>,
{
    fn combine_xor(&self, other: &Sdr<I, Q, D>) -> Self {
        self.xore(other)
    }

    fn combine_xor_assign(&mut self, other: &Sdr<I, Q, D>) {
        self.xori(other);
    }
}

macro_rules! binary_operator {
    ($op:ident, $method:ident, $assign_op:ident, $assign_method:ident, $bound:ident, $value:ident, $in_place:ident) => {
        impl<I, P, Q, C, D> $op<&Sdr<I, Q, D>> for &Sdr<I, P, C>
        where
            I: Id,
            P: $bound<Q>,
            Q: Payload,
            C: Container<I, P>,
            D: Container<I, Q>,
        {
            type Output = Sdr<I, P, C>;

            fn $method(self, rhs: &Sdr<I, Q, D>) -> Sdr<I, P, C> {
                self.$value(rhs)
            }
        }

        impl<I, P, Q, C, D> $assign_op<&Sdr<I, Q, D>> for Sdr<I, P, C>
        where
            I: Id,
            P: $bound<Q>,
            Q: Payload,
            C: Container<I, P>,
            D: Container<I, Q>,
        {
            fn $assign_method(&mut self, rhs: &Sdr<I, Q, D>) {
                self.$in_place(rhs);
            }
        }
    };
}

binary_operator!(BitAnd, bitand, BitAndAssign, bitand_assign, Combine, ande, andi);
binary_operator!(BitOr, bitor, BitOrAssign, bitor_assign, Combine, ore, ori);
binary_operator!(BitXor, bitxor, BitXorAssign, bitxor_assign, CombineXor, xore, xori);
binary_operator!(Sub, sub, SubAssign, sub_assign, Combine, rme, rmi);

impl<I: Id, P: Payload, C: Container<I, P>> Shl<i64> for Sdr<I, P, C> {
    type Output = Self;

    fn shl(mut self, by: i64) -> Self {
        self.shift(by);
        self
    }
}

impl<I: Id, P: Payload, C: Container<I, P>> ShlAssign<i64> for Sdr<I, P, C> {
    fn shl_assign(&mut self, by: i64) {
        self.shift(by);
    }
}

impl<I: Id, P: Payload, C: Container<I, P>> Shr<i64> for Sdr<I, P, C> {
    type Output = Self;

    fn shr(mut self, by: i64) -> Self {
        self.shift(by.saturating_neg());
        self
    }
}

impl<I: Id, P: Payload, C: Container<I, P>> ShrAssign<i64> for Sdr<I, P, C> {
    fn shr_assign(&mut self, by: i64) {
        self.shift(by.saturating_neg());
    }
}

impl<I, P, C, D> Div<&Sdr<I, P, D>> for &Sdr<I, P, C>
where
    I: Id,
    P: Divide,
    C: Container<I, P>,
    D: Container<I, P>,
{
    type Output = Sdr<I, P, C>;

    fn div(self, rhs: &Sdr<I, P, D>) -> Sdr<I, P, C> {
        self.divide(rhs)
    }
}

impl<I, P, C, D> DivAssign<&Sdr<I, P, D>> for Sdr<I, P, C>
where
    I: Id,
    P: Divide,
    C: Container<I, P>,
    D: Container<I, P>,
{
    fn div_assign(&mut self, rhs: &Sdr<I, P, D>) {
        self.divide_assign(rhs);
    }
}

/// Build an [`Sdr`] from a literal list of ids, or of `id => payload`
/// pairs. Ids must be ascending; irrelevant payloads are skipped.
///
/// ```
/// use sdr::Sdr;
/// use sdr::sdr;
/// use sdr_algebra::Weight;
///
/// let a: Sdr = sdr![1, 5, 9];
/// assert_eq!(a.to_string(), "[1,5,9]");
///
/// let w: Sdr<u32, Weight> = sdr![1 => Weight(0.5), 2 => Weight(0.05)];
/// assert_eq!(w.to_string(), "[1(.50)]");
/// ```
#[macro_export]
macro_rules! sdr {
    () => {
        $crate::Sdr::new()
    };
    ($($id:expr => $data:expr),+ $(,)?) => {
        $crate::Sdr::from_elements([$($crate::Element::new($id, $data)),+])
    };
    ($($id:expr),+ $(,)?) => {
        $crate::Sdr::from_ids([$($id),+])
    };
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use sdr_algebra::Arith;
    use sdr_algebra::Weight;

    use super::*;
    use crate::container::SinglyLinked;
    use crate::container::Tree;

    fn ids<P: Payload, C: Container<u32, P>>(s: &Sdr<u32, P, C>) -> Vec<u32> {
        s.ids().collect()
    }

    #[test]
    fn basic_set_operations() {
        let a: Sdr = sdr![1, 2, 3];
        let b: Sdr = sdr![2, 3, 4];
        assert_eq!(ids(&a.ande(&b)), vec![2, 3]);
        assert_eq!(a.ands(&b), 2);
        assert_eq!(ids(&a.ore(&b)), vec![1, 2, 3, 4]);
        assert_eq!(a.ors(&b), 4);
        assert_eq!(ids(&a.xore(&b)), vec![1, 4]);
        assert_eq!(a.xors(&b), 2);

        let c: Sdr = sdr![1, 2, 3, 99];
        let d: Sdr = sdr![0, 1, 2, 99, 100];
        assert_eq!(ids(&c.rme(&d)), vec![3]);
        assert_eq!(c.rms(&d), 1);
    }

    #[test]
    fn in_place_matches_value_forms() {
        let a: Sdr<u32, Unit, SinglyLinked<u32, Unit>> = sdr![1, 2, 3, 8];
        let b: Sdr<u32, Unit, Tree<u32, Unit>> = sdr![0, 2, 3, 4, 9];

        let mut x = a.clone();
        x &= &b;
        assert!(x.same_as(&a.ande(&b)));
        let mut x = a.clone();
        x |= &b;
        assert!(x.same_as(&a.ore(&b)));
        assert_eq!(x.len(), 7);
        let mut x = a.clone();
        x ^= &b;
        assert_eq!(ids(&x), vec![0, 1, 4, 8, 9]);
        let mut x = a.clone();
        x -= &b;
        assert_eq!(ids(&x), vec![1, 8]);
    }

    #[test]
    fn self_operations() {
        let a: Sdr = sdr![3, 4, 10];
        let mut x = a.clone();
        x.andi_self();
        assert_eq!(x, a);
        x.ori_self();
        assert_eq!(x, a);
        x.xori_self();
        assert!(x.is_empty());
        let mut y = a.clone();
        y.rmi_self();
        assert!(y.is_empty());

        // Value forms may alias freely.
        assert_eq!(a.ande(&a), a);
        assert!(a.xore(&a).is_empty());
        assert!(a.rme(&a).is_empty());
    }

    #[test]
    fn self_operations_keep_payloads() {
        let w: Sdr<u32, Weight> = sdr![1 => Weight(0.25), 2 => Weight(0.75)];
        let mut x = w.clone();
        x.andi_self();
        assert_eq!(x.to_string(), "[1(.25),2(.75)]");
        x.ori_self();
        assert_eq!(x, w);
        x.rmi_self();
        assert!(x.is_empty());
        let mut x = w.clone();
        x.xori_self();
        assert!(x.is_empty());

        let n: Sdr<u32, Arith> = sdr![1 => Arith(2.0), 2 => Arith(3.0)];
        let mut y = n.clone();
        y.ori_self();
        assert_eq!(y.to_string(), "[1(2),2(3)]");
        y.andi_self();
        assert_eq!(y, n);
        y.rmi_self();
        assert!(y.is_empty());

        assert_eq!(n.ore_self(), n);
        assert_eq!(n.ande_self(), n);
        assert!(n.rme_self().is_empty());
        assert_eq!((n.ands_self(), n.ors_self(), n.rms_self()), (2, 2, 0));
        assert!(w.xore_self().is_empty());
        assert_eq!(w.xors_self(), 0);
    }

    #[test]
    fn weighted_relevance() {
        let a: Sdr<u32, Weight> = sdr![1 => Weight(0.5), 2 => Weight(0.25), 3 => Weight(0.75)];
        let b: Sdr<u32, Weight> = sdr![1 => Weight(0.5), 2 => Weight(0.25), 4 => Weight(0.5)];
        // 0.25 * 0.25 falls under the threshold.
        assert_eq!(a.ande(&b).to_string(), "[1(.25)]");
        assert_eq!(a.ands(&b), 1);
        assert_eq!(a.ore(&b).to_string(), "[1(.50),2(.25),3(.75),4(.50)]");
        assert_eq!(a.xore(&b).to_string(), "[3(.75),4(.50)]");
        assert_eq!(a.xors(&b), 2);
        assert_eq!(a.rme(&b).to_string(), "[1(.25),2(.18),3(.75)]");
        assert_eq!(a.rms(&b), 3);
    }

    #[test]
    fn heterogeneous_operands() {
        let w: Sdr<u32, Weight> = sdr![1 => Weight(0.5), 2 => Weight(0.75)];
        let u: Sdr = sdr![2, 3];
        assert_eq!(w.ande(&u).to_string(), "[2(.75)]");
        assert_eq!(w.ore(&u).to_string(), "[1(.50),2(.100),3(.100)]");
        assert_eq!(w.rme(&u).to_string(), "[1(.50)]");
        assert_eq!(w.xore(&u).to_string(), "[1(.50),3(.100)]");

        let mut a: Sdr<u32, Arith> = sdr![1 => Arith(2.0), 5 => Arith(3.0)];
        a |= &u;
        assert_eq!(a.to_string(), "[1(2),2(0),3(0),5(3)]");
        a &= &u;
        assert_eq!(a.to_string(), "[2(0),3(0)]");
    }

    #[test]
    fn empty_operands() {
        let x: Sdr = sdr![1, 2];
        let empty: Sdr = Sdr::new();
        assert!(empty.ande(&x).is_empty());
        assert_eq!(empty.ore(&x), x);
        assert_eq!(x.rme(&empty), x);
        assert!(empty.rme(&x).is_empty());

        let mut y = x.clone();
        y.ori(&empty);
        y.rmi(&empty);
        assert_eq!(y, x);
        y.andi(&empty);
        assert!(y.is_empty());
    }

    #[test]
    fn separate_matches_rme() {
        let a0: Sdr<u32, Weight> = sdr![1 => Weight(0.5), 2 => Weight(1.0), 4 => Weight(0.7)];
        let b0: Sdr<u32, Weight> = sdr![2 => Weight(0.5), 4 => Weight(0.2), 6 => Weight(0.3)];
        let expect_a = a0.rme(&b0);
        let expect_b = b0.rme(&a0);
        let (mut a, mut b) = (a0, b0);
        Sdr::separate(&mut a, &mut b);
        assert_eq!(a, expect_a);
        assert_eq!(b, expect_b);
    }

    #[test]
    fn range_and_position_queries() {
        let a: Sdr<u32, Unit, Tree<u32, Unit>> = sdr![2, 4, 6, 8, 10];
        assert_eq!(ids(&a.ande_range(3, 9)), vec![4, 6, 8]);
        assert_eq!(a.ands_range(3, 9), 3);
        assert_eq!(a.ands_range(11, 20), 0);
        let b: Sdr = sdr![4, 5, 10];
        assert_eq!(a.andp(&b), vec![1, 4]);
        assert!(a.contains(6));
        assert_eq!(a.ande_id(7), None);
    }

    #[test]
    fn shift_and_append() {
        let mut a: Sdr = sdr![1, 2, 3];
        a <<= 10;
        assert_eq!(ids(&a), vec![11, 12, 13]);
        a >>= 11;
        assert_eq!(ids(&a), vec![0, 1, 2]);
        assert_eq!(
            a.try_shift(-1),
            Err(SdrError::IdOutOfRange { value: -1 })
        );
        assert_eq!(ids(&a), vec![0, 1, 2]);

        let b: Sdr<u32, Unit, SinglyLinked<u32, Unit>> = sdr![5, 6];
        a.append(b);
        assert_eq!(ids(&a), vec![0, 1, 2, 5, 6]);
        let c: Sdr = sdr![6, 7];
        assert_eq!(
            a.try_append(c),
            Err(SdrError::Overlap {
                last: "6".to_string(),
                first: "6".to_string()
            })
        );
        assert_eq!(a.len(), 5);
    }

    #[test]
    fn sampling_keeps_order() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut a: Sdr = Sdr::from_ids(0..1000);
        a.sample_length(100, &mut rng);
        assert_eq!(a.len(), 100);
        assert!(a.is_well_formed());

        let mut b: Sdr = Sdr::from_ids(0..1000);
        b.sample_portion(0.0, &mut rng);
        assert!(b.is_empty());
        let mut c: Sdr = Sdr::from_ids(0..1000);
        c.sample_portion(1.0, &mut rng);
        assert_eq!(c.len(), 1000);
        assert_eq!(
            c.try_sample_portion(1.5, &mut rng),
            Err(SdrError::FractionOutOfRange { amount: 1.5 })
        );
    }

    #[test]
    fn division() {
        let a: Sdr<u32, Arith> = sdr![1 => Arith(6.0), 2 => Arith(5.0)];
        let b: Sdr<u32, Arith> = sdr![2 => Arith(2.0), 3 => Arith(4.0)];
        assert_eq!((&a / &b).to_string(), "[1(6),2(2.5)]");
        let mut c = a.clone();
        c /= &b;
        assert_eq!(c, &a / &b);
    }

    #[test]
    fn construction_checks() {
        assert_eq!(
            Sdr::<u32>::try_from_ids([1, 3, 3]).map(|s| s.len()),
            Err(SdrError::NotAscending { position: 2 })
        );
        let w: Sdr<u32, Weight> = Sdr::from_elements([
            Element::new(1, Weight(0.05)),
            Element::new(2, Weight(0.5)),
        ]);
        assert_eq!(ids(&w), vec![2]);
    }

    #[test]
    fn id_sequences_compare_lexicographically() {
        let a: Sdr = sdr![1, 2];
        let b: Sdr<u32, Weight> = sdr![1, 3];
        assert_eq!(a.cmp_ids(&b), Ordering::Less);
        assert_eq!(b.cmp_ids(&a), Ordering::Greater);
        assert_eq!(a.cmp_ids(&a), Ordering::Equal);
    }

    #[test]
    fn serde_round_trip() {
        let a: Sdr<u32, Weight> = sdr![1 => Weight(0.5), 7 => Weight(0.25)];
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, r#"[{"id":1,"data":0.5},{"id":7,"data":0.25}]"#);
        let back: Sdr<u32, Weight, Tree<u32, Weight>> = serde_json::from_str(&json).unwrap();
        assert!(a.same_as(&back));
        assert!(serde_json::from_str::<Sdr<u32, Weight>>(r#"[{"id":2,"data":1.0},{"id":1,"data":1.0}]"#).is_err());
    }

    #[test]
    fn sum_and_visit() {
        let mut a: Sdr<u32, Arith> = sdr![1 => Arith(1.0), 2 => Arith(2.5)];
        assert_eq!(a.sum(), Some(Arith(3.5)));
        a.visit(|id, data| data.0 += id as f32);
        assert_eq!(a.sum(), Some(Arith(6.5)));
        assert_eq!(Sdr::<u32, Arith>::new().sum(), None);
    }
}

/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! `(id, payload)` pairs.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use sdr_algebra::Payload;
use sdr_algebra::Unit;
use serde::Deserialize;
use serde::Serialize;

use crate::id::Id;

/// One `(id, payload)` pair.
///
/// Ordering and equality are defined by the id alone: two elements
/// occupy the same slot iff their ids are equal, regardless of
/// payload.
///
/// # Example
/// ```
/// use sdr::Element;
/// use sdr_algebra::Weight;
///
/// let a = Element::new(3u32, Weight(0.5));
/// let b = Element::<u32, Weight>::from_id(3);
/// assert_eq!(a, b);
/// assert_eq!(b.data(), &Weight(1.0));
/// ```
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Element<I, P = Unit> {
    id: I,
    data: P,
}

impl<I: Id, P: Payload> Element<I, P> {
    /// An element with an explicit payload.
    pub fn new(id: I, data: P) -> Self {
        Self { id, data }
    }

    /// An element carrying the default payload.
    pub fn from_id(id: I) -> Self {
        Self::new(id, P::default())
    }

    /// The element's id.
    pub fn id(&self) -> I {
        self.id
    }

    /// The element's payload.
    pub fn data(&self) -> &P {
        &self.data
    }

    /// Mutable access to the payload. The id is immutable.
    pub fn data_mut(&mut self) -> &mut P {
        &mut self.data
    }

    pub(crate) fn set_id(&mut self, id: I) {
        self.id = id;
    }

    /// Split into `(id, payload)`.
    pub fn into_parts(self) -> (I, P) {
        (self.id, self.data)
    }

    /// Borrow as an [`ElementRef`].
    pub fn borrowed(&self) -> ElementRef<'_, I, P> {
        ElementRef::new(self.id, &self.data)
    }
}

impl<I: Id, P: Payload> From<(I, P)> for Element<I, P> {
    fn from((id, data): (I, P)) -> Self {
        Self::new(id, data)
    }
}

impl<I: PartialEq, P> PartialEq for Element<I, P> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<I: Eq, P> Eq for Element<I, P> {}

impl<I: Hash, P> Hash for Element<I, P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<I: Ord, P> PartialOrd for Element<I, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I: Ord, P> Ord for Element<I, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl<I: Id, P: Payload> fmt::Display for Element<I, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.borrowed().fmt(f)
    }
}

/// A borrowed element, as yielded by container iteration.
///
/// For the columnar container this bundles a reference into the id
/// column and one into the payload column; the other containers
/// produce the same shape so generic code never sees the layout.
#[derive(Debug, Serialize)]
pub struct ElementRef<'a, I, P> {
    id: I,
    data: &'a P,
}

impl<'a, I: Id, P: Payload> ElementRef<'a, I, P> {
    pub(crate) fn new(id: I, data: &'a P) -> Self {
        Self { id, data }
    }

    /// The element's id.
    pub fn id(&self) -> I {
        self.id
    }

    /// The element's payload.
    pub fn data(&self) -> &'a P {
        self.data
    }

    /// Clone into an owned [`Element`].
    pub fn cloned(&self) -> Element<I, P> {
        Element::new(self.id, self.data.clone())
    }
}

impl<I: Copy, P> Clone for ElementRef<'_, I, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: Copy, P> Copy for ElementRef<'_, I, P> {}

impl<I: Id, P: Payload> fmt::Display for ElementRef<'_, I, P> {
    /// `id(payload)`, or just `id` for payloads without printable
    /// information.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if P::INFORMATIVE {
            write!(f, "{}({})", self.id, self.data)
        } else {
            write!(f, "{}", self.id)
        }
    }
}

/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Merge-join kernels shared by every SDR operation.
//!
//! Each kernel walks two ascending cursors and hands the caller both
//! cursors whenever it reaches an id of interest. Callers decide what
//! to read or write; the kernels only decide *where* to stop:
//!
//! - [`and_join`]: ids present on both sides. Leapfrogs: whichever
//!   side lags seeks to the other side's id, so a small operand
//!   drives the search through a large one.
//! - [`or_join`]: every id on either side, tagged with a [`Side`].
//! - [`rm_join`]: every id on the left, paired with the right cursor
//!   when the right has the same id. Only the right side seeks.

use std::cmp::Ordering;

use crate::config::Traversal;
use crate::container::Seek;
use crate::id::Id;

/// Where an id was found during a union-shaped merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Only in the left operand.
    Left,
    /// Only in the right operand.
    Right,
    /// In both operands.
    Both,
}

/// The side holding the smaller of two current ids, and that id.
/// `None` once both sides are exhausted.
pub(crate) fn side<I: Ord + Copy>(left: Option<I>, right: Option<I>) -> Option<(Side, I)> {
    match (left, right) {
        (None, None) => None,
        (Some(l), None) => Some((Side::Left, l)),
        (None, Some(r)) => Some((Side::Right, r)),
        (Some(l), Some(r)) => match l.cmp(&r) {
            Ordering::Less => Some((Side::Left, l)),
            Ordering::Greater => Some((Side::Right, r)),
            Ordering::Equal => Some((Side::Both, l)),
        },
    }
}

/// Visit every id present in both `left` and `right`.
///
/// `on_match` runs with both cursors positioned on the shared id;
/// both are advanced afterwards.
pub fn and_join<I, L, R, F>(left: &mut L, right: &mut R, traversal: Traversal, mut on_match: F)
where
    I: Id,
    L: Seek<I>,
    R: Seek<I>,
    F: FnMut(I, &mut L, &mut R),
{
    while let (Some(l), Some(r)) = (left.id(), right.id()) {
        match l.cmp(&r) {
            Ordering::Less => left.seek(r, traversal),
            Ordering::Greater => right.seek(l, traversal),
            Ordering::Equal => {
                on_match(l, left, right);
                left.advance();
                right.advance();
            }
        }
    }
}

/// Visit every id present in `left` or `right`, in ascending order.
///
/// The cursor (or cursors) on the visited id are advanced after
/// `on_id` returns.
pub fn or_join<I, L, R, F>(left: &mut L, right: &mut R, mut on_id: F)
where
    I: Id,
    L: Seek<I>,
    R: Seek<I>,
    F: FnMut(Side, I, &mut L, &mut R),
{
    while let Some((which, id)) = side(left.id(), right.id()) {
        on_id(which, id, left, right);
        match which {
            Side::Left => left.advance(),
            Side::Right => right.advance(),
            Side::Both => {
                left.advance();
                right.advance();
            }
        }
    }
}

/// Visit every id of `left`, passing the right cursor when it holds
/// the same id.
pub fn rm_join<I, L, R, F>(left: &mut L, right: &mut R, traversal: Traversal, mut on_left: F)
where
    I: Id,
    L: Seek<I>,
    R: Seek<I>,
    F: FnMut(I, &mut L, Option<&mut R>),
{
    while let Some(id) = left.id() {
        right.seek(id, traversal);
        if right.id() == Some(id) {
            on_left(id, left, Some(&mut *right));
            right.advance();
        } else {
            on_left(id, left, None);
        }
        left.advance();
    }
}

/// Number of ids present on both sides, ignoring payloads.
pub(crate) fn count_common<I, L, R>(left: &mut L, right: &mut R, traversal: Traversal) -> usize
where
    I: Id,
    L: Seek<I>,
    R: Seek<I>,
{
    let mut count = 0;
    and_join(left, right, traversal, |_, _, _| count += 1);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A bare id cursor over a slice that counts how it was moved.
    struct Probe<'a> {
        ids: &'a [u32],
        pos: usize,
        advances: usize,
        searches: usize,
    }

    impl<'a> Probe<'a> {
        fn new(ids: &'a [u32]) -> Self {
            Self {
                ids,
                pos: 0,
                advances: 0,
                searches: 0,
            }
        }
    }

    impl Seek<u32> for Probe<'_> {
        fn id(&self) -> Option<u32> {
            self.ids.get(self.pos).copied()
        }

        fn advance(&mut self) {
            self.advances += 1;
            self.pos = (self.pos + 1).min(self.ids.len());
        }

        fn lower_bound(&mut self, target: u32) {
            self.searches += 1;
            self.pos += self.ids[self.pos..].partition_point(|id| *id < target);
        }
    }

    #[test]
    fn side_orders_ids() {
        assert_eq!(side::<u32>(None, None), None);
        assert_eq!(side(Some(1), None), Some((Side::Left, 1)));
        assert_eq!(side(None, Some(2)), Some((Side::Right, 2)));
        assert_eq!(side(Some(3), Some(2)), Some((Side::Right, 2)));
        assert_eq!(side(Some(2), Some(2)), Some((Side::Both, 2)));
    }

    #[test]
    fn and_join_visits_common_ids() {
        for traversal in [Traversal::Search, Traversal::Linear] {
            let mut seen = Vec::new();
            and_join(
                &mut Probe::new(&[1, 2, 3, 99]),
                &mut Probe::new(&[0, 1, 2, 99, 100]),
                traversal,
                |id, _, _| seen.push(id),
            );
            assert_eq!(seen, vec![1, 2, 99]);
        }
    }

    #[test]
    fn and_join_searches_small_into_large() {
        let large: Vec<u32> = (0..10_000).collect();
        let mut left = Probe::new(&[5000, 9000]);
        let mut right = Probe::new(&large);
        let mut seen = Vec::new();
        and_join(&mut left, &mut right, Traversal::Search, |id, _, _| {
            seen.push(id)
        });
        assert_eq!(seen, vec![5000, 9000]);
        // Searching never steps through the large operand.
        assert!(right.advances <= 2);
        assert_eq!(right.searches, 2);

        let mut left = Probe::new(&[5000, 9000]);
        let mut right = Probe::new(&large);
        and_join(&mut left, &mut right, Traversal::Linear, |_, _, _| {});
        assert_eq!(right.searches, 0);
        assert!(right.advances >= 9000);
    }

    #[test]
    fn or_join_tags_sides() {
        let mut seen = Vec::new();
        or_join(
            &mut Probe::new(&[1, 2, 3]),
            &mut Probe::new(&[2, 3, 4]),
            |which, id, _, _| seen.push((which, id)),
        );
        assert_eq!(
            seen,
            vec![
                (Side::Left, 1),
                (Side::Both, 2),
                (Side::Both, 3),
                (Side::Right, 4)
            ]
        );
    }

    #[test]
    fn rm_join_pairs_left_ids() {
        let mut seen = Vec::new();
        rm_join(
            &mut Probe::new(&[1, 2, 3, 99]),
            &mut Probe::new(&[0, 1, 2, 99, 100]),
            Traversal::Search,
            |id, _, right| seen.push((id, right.is_some())),
        );
        assert_eq!(seen, vec![(1, true), (2, true), (3, false), (99, true)]);
    }

    #[test]
    fn count_common_ignores_tail() {
        let mut left = Probe::new(&[1, 2, 3]);
        let mut right = Probe::new(&[3, 4, 5, 6]);
        assert_eq!(count_common(&mut left, &mut right, Traversal::Search), 1);
    }
}

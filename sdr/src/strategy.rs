/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Property-based generators for [`Sdr`] and its payloads.
//!
//! These strategies feed the `proptest`-based tests that check the
//! set operations against a plain `BTreeMap` model.
//!
//! Ids are drawn from a small field so that two independently
//! generated SDRs overlap often enough to exercise the `Both` arm of
//! every merge.
//!
//! Example usage:
//!
//! ```
//! use proptest::prelude::*;
//!
//! use crate::strategy::gen_sdr;
//!
//! proptest! {
//!     #[test]
//!     fn test_sdr(s in gen_sdr(64, 32)) {
//!         // Use `s` as an operand.
//!     }
//! }
//! ```
//!
//! This module is only included in test builds (`#[cfg(test)]`).

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use proptest::prelude::*;
use sdr_algebra::Arith;
use sdr_algebra::Payload;
use sdr_algebra::Unit;
use sdr_algebra::Weight;

use crate::Element;
use crate::Sdr;
use crate::container::Container;

/// Ascending, duplicate-free ids below `max_id`, at most `max_len` of
/// them.
pub fn gen_ids(max_id: u32, max_len: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::btree_set(0..max_id, 0..=max_len).prop_map(|set| set.into_iter().collect())
}

/// A [`Unit`] SDR over any container.
pub fn gen_sdr<C>(max_id: u32, max_len: usize) -> impl Strategy<Value = Sdr<u32, Unit, C>>
where
    C: Container<u32, Unit>,
{
    gen_ids(max_id, max_len).prop_map(Sdr::from_ids)
}

/// A [`Weight`] SDR whose payloads are all relevant.
///
/// Weights are multiples of 1/8 so that products and complements
/// stay exact in `f32`.
pub fn gen_weighted_sdr<C>(
    max_id: u32,
    max_len: usize,
) -> impl Strategy<Value = Sdr<u32, Weight, C>>
where
    C: Container<u32, Weight>,
{
    prop::collection::btree_map(0..max_id, 1u8..=8, 0..=max_len).prop_map(|map| {
        Sdr::from_elements(
            map.into_iter()
                .map(|(id, eighths)| Element::new(id, Weight(eighths as f32 / 8.0))),
        )
    })
}

/// An [`Arith`] SDR with small integral values, so sums and
/// differences are exact.
pub fn gen_arith_sdr<C>(max_id: u32, max_len: usize) -> impl Strategy<Value = Sdr<u32, Arith, C>>
where
    C: Container<u32, Arith>,
{
    prop::collection::btree_map(0..max_id, -16i16..=16, 0..=max_len).prop_map(|map| {
        Sdr::from_elements(
            map.into_iter()
                .map(|(id, value)| Element::new(id, Arith(value as f32))),
        )
    })
}

/// The model of an SDR: its ids in order.
pub fn id_set<P: Payload, C: Container<u32, P>>(sdr: &Sdr<u32, P, C>) -> BTreeSet<u32> {
    sdr.ids().collect()
}

/// The model of an SDR: each id with its payload.
pub fn payload_map<P: Payload, C: Container<u32, P>>(sdr: &Sdr<u32, P, C>) -> BTreeMap<u32, P> {
    sdr.iter().map(|e| (e.id(), e.data().clone())).collect()
}

#[cfg(test)]
mod tests {
    use proptest::strategy::ValueTree;
    use proptest::test_runner::Config;
    use proptest::test_runner::TestRunner;

    use super::*;
    use crate::container::Array;
    use crate::container::Columnar;
    use crate::container::SinglyLinked;
    use crate::container::Tree;

    #[test]
    fn print_some_sdrs() {
        let mut runner = TestRunner::new(Config::default());
        for _ in 0..4 {
            let value = gen_weighted_sdr::<Array<u32, Weight>>(32, 6)
                .new_tree(&mut runner)
                .unwrap()
                .current();
            println!("{}", value);
        }
    }

    proptest! {
        #[test]
        fn generated_sdrs_are_well_formed(
            a in gen_sdr::<Array<u32, Unit>>(64, 32),
            w in gen_weighted_sdr::<Tree<u32, Weight>>(64, 32),
            x in gen_arith_sdr::<SinglyLinked<u32, Arith>>(64, 32),
        ) {
            prop_assert!(a.is_well_formed());
            prop_assert!(w.is_well_formed());
            prop_assert!(x.is_well_formed());
            prop_assert!(w.iter().all(|e| e.data().relevant()));
        }

        #[test]
        fn set_operations_match_model(
            a in gen_sdr::<Array<u32, Unit>>(64, 32),
            b in gen_sdr::<Array<u32, Unit>>(64, 32),
        ) {
            let (ma, mb) = (id_set(&a), id_set(&b));

            let and = a.ande(&b);
            prop_assert_eq!(id_set(&and), &ma & &mb);
            prop_assert_eq!(a.ands(&b), and.len());

            let or = a.ore(&b);
            prop_assert_eq!(id_set(&or), &ma | &mb);
            prop_assert_eq!(a.ors(&b), or.len());

            let xor = a.xore(&b);
            prop_assert_eq!(id_set(&xor), &ma ^ &mb);
            prop_assert_eq!(a.xors(&b), xor.len());

            let rm = a.rme(&b);
            prop_assert_eq!(id_set(&rm), &ma - &mb);
            prop_assert_eq!(a.rms(&b), rm.len());
        }

        #[test]
        fn in_place_forms_match_value_forms(
            a in gen_sdr::<SinglyLinked<u32, Unit>>(64, 32),
            b in gen_sdr::<Columnar<u32, Unit>>(64, 32),
        ) {
            let mut and = a.clone();
            and.andi(&b);
            prop_assert!(and.same_as(&a.ande(&b)));

            let mut or = a.clone();
            or.ori(&b);
            prop_assert!(or.same_as(&a.ore(&b)));

            let mut xor = a.clone();
            xor.xori(&b);
            prop_assert!(xor.same_as(&a.xore(&b)));

            let mut rm = a.clone();
            rm.rmi(&b);
            prop_assert!(rm.same_as(&a.rme(&b)));
        }

        #[test]
        fn arith_payloads_match_model(
            a in gen_arith_sdr::<Tree<u32, Arith>>(48, 24),
            b in gen_arith_sdr::<Columnar<u32, Arith>>(48, 24),
        ) {
            let (ma, mb) = (payload_map(&a), payload_map(&b));

            let mut sum = ma.clone();
            for (id, q) in &mb {
                sum.entry(*id)
                    .and_modify(|p| *p = Arith(p.0 + q.0))
                    .or_insert(*q);
            }
            prop_assert_eq!(payload_map(&a.ore(&b)), sum);

            let difference: BTreeMap<u32, Arith> = ma
                .iter()
                .map(|(id, p)| (*id, mb.get(id).map_or(*p, |q| Arith(p.0 - q.0))))
                .collect();
            prop_assert_eq!(payload_map(&a.rme(&b)), difference);

            let product: BTreeMap<u32, Arith> = ma
                .iter()
                .filter_map(|(id, p)| mb.get(id).map(|q| (*id, Arith(p.0 * q.0))))
                .collect();
            prop_assert_eq!(payload_map(&a.ande(&b)), product);
        }

        #[test]
        fn weighted_results_stay_relevant(
            a in gen_weighted_sdr::<Tree<u32, Weight>>(48, 24),
            b in gen_weighted_sdr::<Array<u32, Weight>>(48, 24),
        ) {
            for result in [a.ande(&b), a.xore(&b), a.rme(&b)] {
                prop_assert!(result.is_well_formed());
                prop_assert!(result.iter().all(|e| e.data().relevant()));
            }
            let mb = id_set(&b);
            let or = a.ore(&b);
            prop_assert_eq!(id_set(&or), &id_set(&a) | &mb);
        }
    }
}

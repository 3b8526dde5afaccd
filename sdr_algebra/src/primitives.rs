/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Primitive payload types: Unit, Weight, Arith.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use super::Combine;
use super::CombineXor;
use super::Divide;
use super::Payload;

// Unit: no data

/// The empty payload: an element is either present or not.
///
/// - `relevant() = true`
/// - `rm_relevant() = false`, so any match under subtraction or
///   symmetric difference cancels the element.
///
/// Combined with any informative payload, `Unit` ignores the other
/// side.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize
)]
pub struct Unit;

impl Payload for Unit {
    const INFORMATIVE: bool = false;

    fn relevant(&self) -> bool {
        true
    }

    fn rm_relevant(&self) -> bool {
        false
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

macro_rules! unit_combines_with {
    ($($rhs:ty),* $(,)?) => {
        $(
            impl Combine<$rhs> for Unit {
                fn combine_and(&self, _other: &$rhs) -> Self {
                    Unit
                }

                fn combine_or(&self, _other: &$rhs) -> Self {
                    Unit
                }

                fn combine_rm(&self, _other: &$rhs) -> Self {
                    Unit
                }

                fn adopt(_other: &$rhs) -> Self {
                    Unit
                }
            }
        )*
    };
}

unit_combines_with!(Unit, Weight, Arith);

impl CombineXor<Unit> for Unit {
    fn combine_xor(&self, _other: &Unit) -> Self {
        Unit
    }
}

impl CombineXor<Weight> for Unit {
    fn combine_xor(&self, _other: &Weight) -> Self {
        Unit
    }
}

// Weight: bounded relevance weight

/// A weight in `[0, 1]`.
///
/// - `AND = a * b`
/// - `OR = max(a, b)`
/// - `XOR = |a - b|`
/// - `RM = a * (1 - b)`
///
/// Relevant (and removal-relevant) when strictly above
/// [`Weight::THRESHOLD`]. The default weight is `1.0`.
///
/// Against a [`Unit`] operand, OR saturates to `1.0` and XOR / RM
/// cancel to `0.0`, which is what a full weight on the other side
/// would produce for OR and RM.
///
/// # Example
/// ```
/// use sdr_algebra::Combine;
/// use sdr_algebra::CombineXor;
/// use sdr_algebra::Weight;
///
/// let a = Weight(0.75);
/// let b = Weight(0.25);
/// assert_eq!(a.combine_or(&b), Weight(0.75));
/// assert_eq!(a.combine_xor(&b), Weight(0.5));
/// assert_eq!(format!("{}", a), ".75");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Weight(pub f32);

impl Weight {
    /// Weights at or below this value are not relevant.
    pub const THRESHOLD: f32 = 0.1;

    /// Get the inner value.
    pub fn get(&self) -> f32 {
        self.0
    }
}

impl Default for Weight {
    fn default() -> Self {
        Weight(1.0)
    }
}

impl From<f32> for Weight {
    fn from(value: f32) -> Self {
        Weight(value)
    }
}

impl Payload for Weight {
    fn relevant(&self) -> bool {
        self.0 > Self::THRESHOLD
    }

    fn rm_relevant(&self) -> bool {
        self.relevant()
    }
}

impl Combine for Weight {
    fn combine_and(&self, other: &Weight) -> Self {
        Weight(self.0 * other.0)
    }

    fn combine_or(&self, other: &Weight) -> Self {
        Weight(self.0.max(other.0))
    }

    fn combine_rm(&self, other: &Weight) -> Self {
        Weight(self.0 * (1.0 - other.0))
    }

    fn adopt(other: &Weight) -> Self {
        *other
    }
}

impl CombineXor for Weight {
    fn combine_xor(&self, other: &Weight) -> Self {
        Weight((self.0 - other.0).abs())
    }
}

impl Combine<Unit> for Weight {
    fn combine_and(&self, _other: &Unit) -> Self {
        *self
    }

    fn combine_or(&self, _other: &Unit) -> Self {
        Weight(1.0)
    }

    fn combine_rm(&self, _other: &Unit) -> Self {
        Weight(0.0)
    }

    fn adopt(_other: &Unit) -> Self {
        Weight::default()
    }
}

impl CombineXor<Unit> for Weight {
    fn combine_xor(&self, _other: &Unit) -> Self {
        Weight(0.0)
    }
}

impl fmt::Display for Weight {
    /// Two truncated decimal digits (`.25`), or `!!!` outside `[0, 1]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if !(0.0..=1.0).contains(&value) {
            return write!(f, "!!!");
        }
        let tenths = (value * 10.0) as u32;
        let hundredths = ((value * 10.0 - tenths as f32) * 10.0) as u32;
        write!(f, ".{}{}", tenths, hundredths)
    }
}

// Arith: unbounded float

/// An unbounded arithmetic value. Always relevant.
///
/// - `AND = a * b`
/// - `OR = a + b`
/// - `RM = a - b`
///
/// There is no symmetric difference; see [`Divide`]. A [`Unit`]
/// operand leaves the value unchanged, and a `Unit` adopted into an
/// arithmetic SDR becomes `Arith(0.0)`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize
)]
pub struct Arith(pub f32);

impl Arith {
    /// Get the inner value.
    pub fn get(&self) -> f32 {
        self.0
    }
}

impl From<f32> for Arith {
    fn from(value: f32) -> Self {
        Arith(value)
    }
}

impl Payload for Arith {
    fn relevant(&self) -> bool {
        true
    }

    fn rm_relevant(&self) -> bool {
        true
    }
}

impl Combine for Arith {
    fn combine_and(&self, other: &Arith) -> Self {
        Arith(self.0 * other.0)
    }

    fn combine_or(&self, other: &Arith) -> Self {
        Arith(self.0 + other.0)
    }

    fn combine_rm(&self, other: &Arith) -> Self {
        Arith(self.0 - other.0)
    }

    fn adopt(other: &Arith) -> Self {
        *other
    }
}

impl Combine<Unit> for Arith {
    fn combine_and(&self, _other: &Unit) -> Self {
        *self
    }

    fn combine_or(&self, _other: &Unit) -> Self {
        *self
    }

    fn combine_rm(&self, _other: &Unit) -> Self {
        *self
    }

    fn adopt(_other: &Unit) -> Self {
        Arith::default()
    }
}

impl Divide for Arith {
    fn divide(&self, other: &Self) -> Self {
        Arith(self.0 / other.0)
    }
}

impl fmt::Display for Arith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_is_plain_set_membership() {
        assert!(Unit.relevant());
        assert!(!Unit.rm_relevant());
        assert!(!Unit.combine_xor(&Unit).rm_relevant());
        assert!(!<Unit as Payload>::INFORMATIVE);
        assert_eq!(format!("{}", Unit), "");
    }

    #[test]
    fn unit_ignores_informative_operand() {
        assert_eq!(Unit.combine_and(&Weight(0.3)), Unit);
        assert_eq!(Unit.combine_or(&Arith(7.0)), Unit);
        assert!(!Unit.combine_rm(&Arith(7.0)).rm_relevant());
    }

    #[test]
    fn weight_threshold() {
        assert!(Weight(0.11).relevant());
        assert!(!Weight(0.1).relevant());
        assert!(!Weight(0.0).rm_relevant());
        assert_eq!(Weight::default(), Weight(1.0));
    }

    #[test]
    fn weight_combinations() {
        let a = Weight(0.5);
        let b = Weight(0.25);
        assert_eq!(a.combine_and(&b), Weight(0.125));
        assert_eq!(a.combine_or(&b), Weight(0.5));
        assert_eq!(a.combine_xor(&b), Weight(0.25));
        assert_eq!(a.combine_rm(&b), Weight(0.375));
    }

    #[test]
    fn weight_against_unit() {
        let a = Weight(0.5);
        assert_eq!(a.combine_and(&Unit), a);
        assert_eq!(a.combine_or(&Unit), Weight(1.0));
        assert!(!a.combine_rm(&Unit).rm_relevant());
        assert!(!a.combine_xor(&Unit).rm_relevant());
        assert_eq!(Weight::adopt(&Unit), Weight(1.0));
    }

    #[test]
    fn weight_display() {
        assert_eq!(format!("{}", Weight(0.5)), ".50");
        assert_eq!(format!("{}", Weight(0.0)), ".00");
        assert_eq!(format!("{}", Weight(1.5)), "!!!");
        assert_eq!(format!("{}", Weight(-0.5)), "!!!");
    }

    #[test]
    fn arith_combinations() {
        let a = Arith(6.0);
        let b = Arith(2.0);
        assert_eq!(a.combine_and(&b), Arith(12.0));
        assert_eq!(a.combine_or(&b), Arith(8.0));
        assert_eq!(a.combine_rm(&b), Arith(4.0));
        assert_eq!(a.divide(&b), Arith(3.0));
        assert!(Arith(-3.0).relevant());
        assert!(Arith(0.0).rm_relevant());
    }

    #[test]
    fn arith_against_unit() {
        let a = Arith(6.0);
        assert_eq!(a.combine_and(&Unit), a);
        assert_eq!(a.combine_or(&Unit), a);
        assert_eq!(a.combine_rm(&Unit), a);
        assert_eq!(Arith::adopt(&Unit), Arith(0.0));
    }

    #[test]
    fn arith_display() {
        assert_eq!(format!("{}", Arith(32.0)), "32");
        assert_eq!(format!("{}", Arith(0.5)), "0.5");
    }

    #[test]
    fn payloads_serialize() {
        let json = serde_json::to_string(&Weight(0.5)).unwrap();
        assert_eq!(json, "0.5");
        let back: Arith = serde_json::from_str("2.5").unwrap();
        assert_eq!(back, Arith(2.5));
    }
}

/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Scalar and periodic encoders.
//!
//! Both produce `size` active ids out of a field of `width` ids, each
//! with the default payload. The scalar encoder slides a contiguous
//! block across the field as the input goes from 0 to 1. The periodic
//! encoder does the same over one period and wraps the block around
//! the end of the field.

use std::ops::Range;

use sdr_algebra::Payload;

use crate::container::Container;
use crate::error::SdrError;
use crate::id::Id;
use crate::sdr::Sdr;

fn check_size(size: usize, width: usize) -> Result<(), SdrError> {
    if size > width {
        return Err(SdrError::SizeExceedsWidth { size, width });
    }
    Ok(())
}

fn check_input(input: f32) -> Result<(), SdrError> {
    if !input.is_finite() || input < 0.0 {
        return Err(SdrError::InvalidEncodingInput { input });
    }
    Ok(())
}

/// Start of the scalar block.
fn scalar_start(input: f32, size: usize, width: usize) -> usize {
    ((width - size) as f32 * input).round() as usize
}

/// The (front, tail) runs of the periodic block. The front run holds
/// the ids that wrapped past the end of the field.
fn periodic_runs(
    input: f32,
    period: f32,
    size: usize,
    width: usize,
) -> (Range<usize>, Range<usize>) {
    let progress = (input / period).fract();
    let start = ((progress * width as f32).round() as usize).min(width);
    if start + size > width {
        let wrapped = start + size - width;
        (0..wrapped, start..width)
    } else {
        (0..0, start..start + size)
    }
}

impl<I: Id, P: Payload, C: Container<I, P>> Sdr<I, P, C> {
    fn from_runs<T>(runs: T) -> Result<Self, SdrError>
    where
        T: IntoIterator<Item = Range<usize>>,
    {
        let mut sdr = Self::new();
        for index in runs.into_iter().flatten() {
            let id = I::from_index(index).ok_or(SdrError::IdOutOfRange {
                value: index as i128,
            })?;
            sdr.push(id, P::default());
        }
        Ok(sdr)
    }

    /// `size` consecutive ids starting at `round((width - size) * input)`.
    ///
    /// `input` is in `[0, 1]` and `size <= width`; anything else is a
    /// programming error. See [`Sdr::try_scalar_encode`].
    ///
    /// ```
    /// use sdr::Sdr;
    ///
    /// let low: Sdr = Sdr::scalar_encode(0.0, 3, 100);
    /// let high: Sdr = Sdr::scalar_encode(1.0, 3, 100);
    /// assert_eq!(low.to_string(), "[0,1,2]");
    /// assert_eq!(high.to_string(), "[97,98,99]");
    /// ```
    pub fn scalar_encode(input: f32, size: usize, width: usize) -> Self {
        debug_assert!(check_size(size, width).is_ok(), "size {} > width {}", size, width);
        debug_assert!(
            (0.0..=1.0).contains(&input),
            "scalar input {} is outside [0, 1]",
            input
        );
        let size = size.min(width);
        let start = scalar_start(input.clamp(0.0, 1.0), size, width);
        Self::from_runs([start..start + size]).unwrap_or_default()
    }

    /// [`Sdr::scalar_encode`], validating its parameters.
    pub fn try_scalar_encode(input: f32, size: usize, width: usize) -> Result<Self, SdrError> {
        check_size(size, width)?;
        check_input(input)?;
        if input > 1.0 {
            return Err(SdrError::InvalidEncodingInput { input });
        }
        let start = scalar_start(input, size, width);
        Self::from_runs([start..start + size])
    }

    /// `size` ids placed at `frac(input / period)` of the way across
    /// a circular field of `width` ids.
    ///
    /// When the block runs past the end of the field, the overflow
    /// wraps to the front: the result is a low run starting at 0 and
    /// a high run ending at `width - 1`.
    ///
    /// ```
    /// use sdr::Sdr;
    ///
    /// let s: Sdr = Sdr::periodic_encode(0.9, 1.0, 3, 10);
    /// assert_eq!(s.to_string(), "[0,1,9]");
    /// ```
    pub fn periodic_encode(input: f32, period: f32, size: usize, width: usize) -> Self {
        debug_assert!(check_size(size, width).is_ok(), "size {} > width {}", size, width);
        debug_assert!(check_input(input).is_ok(), "invalid input {}", input);
        debug_assert!(period.is_finite() && period > 0.0, "invalid period {}", period);
        let size = size.min(width);
        let (front, tail) = periodic_runs(input, period, size, width);
        Self::from_runs([front, tail]).unwrap_or_default()
    }

    /// [`Sdr::periodic_encode`], validating its parameters.
    pub fn try_periodic_encode(
        input: f32,
        period: f32,
        size: usize,
        width: usize,
    ) -> Result<Self, SdrError> {
        check_size(size, width)?;
        check_input(input)?;
        if !period.is_finite() || period <= 0.0 {
            return Err(SdrError::InvalidPeriod { period });
        }
        let (front, tail) = periodic_runs(input, period, size, width);
        Self::from_runs([front, tail])
    }
}

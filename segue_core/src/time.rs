// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host time and durations.
//!
//! [`HostTime`] is a point on the host's monotonic clock expressed in
//! microsecond ticks (the web backend derives it from `performance.now()`).
//! [`Duration`] uses the same unit. Timer APIs on the web take whole
//! milliseconds, so both types offer millisecond conversions.
//!
//! Arithmetic saturates instead of wrapping: a deferred task scheduled past
//! the end of the clock simply never becomes due.

use core::fmt;
use core::ops::{Add, Sub};

/// Number of ticks in one millisecond.
pub const TICKS_PER_MILLI: u64 = 1_000;

/// A point in time expressed as microsecond ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Creates a host time from a (possibly fractional) millisecond reading.
    ///
    /// Negative and non-finite readings map to zero.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "clamped to a non-negative value; µs fits in u64 for any realistic uptime"
    )]
    pub fn from_millis_f64(ms: f64) -> Self {
        if ms.is_finite() && ms > 0.0 {
            Self((ms * TICKS_PER_MILLI as f64) as u64)
        } else {
            Self(0)
        }
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Saturating addition of a duration.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.0))
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        self.saturating_add(rhs)
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        self.saturating_duration_since(rhs)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// A duration in microsecond ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Creates a duration from whole milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms.saturating_mul(TICKS_PER_MILLI))
    }

    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns the duration in whole milliseconds, rounded up so a timer
    /// armed with it never fires early.
    #[inline]
    #[must_use]
    pub const fn as_millis_ceil(self) -> u64 {
        self.0.div_ceil(TICKS_PER_MILLI)
    }

    /// Returns the duration in fractional milliseconds.
    #[inline]
    #[must_use]
    pub fn as_millis_f64(self) -> f64 {
        self.0 as f64 / TICKS_PER_MILLI as f64
    }

    /// Saturating addition.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl Sub for Duration {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_conversions() {
        let d = Duration::from_millis(500);
        assert_eq!(d.ticks(), 500_000);
        assert_eq!(d.as_millis_ceil(), 500);
        assert_eq!(Duration(1).as_millis_ceil(), 1, "partial ms rounds up");
        assert!((Duration(1_500).as_millis_f64() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn from_millis_f64_clamps_garbage() {
        assert_eq!(HostTime::from_millis_f64(16.5), HostTime(16_500));
        assert_eq!(HostTime::from_millis_f64(-3.0), HostTime(0));
        assert_eq!(HostTime::from_millis_f64(f64::NAN), HostTime(0));
    }

    #[test]
    fn arithmetic_saturates() {
        let t = HostTime(1000);
        assert_eq!((t + Duration(200)).ticks(), 1200);
        assert_eq!(HostTime(u64::MAX) + Duration(1), HostTime(u64::MAX));
        assert_eq!(t - HostTime(1500), Duration::ZERO);
        assert_eq!(t - HostTime(400), Duration(600));
        assert_eq!(Duration(100) - Duration(200), Duration::ZERO);
    }
}

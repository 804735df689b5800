//! Fixed-capacity sample history with wrap-and-reseed recycling.
//!
//! The ring holds `n` slots of `(t, s, v, x, y)` in parallel columns. The
//! cursor walks forward one slot per advance. Once it sits on the last slot,
//! the next advance does not integrate: it moves the cursor back to slot 0
//! and copies the last sample there, so the trajectory carries on from where
//! it was instead of restarting from the initial condition.

use serde::Serialize;

use crate::engine::integrator::{acceleration, Integrator, PendulumConstants, PhaseState};
use crate::error::{SimError, SimResult};

/// One complete slot of the ring.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Sample {
    /// Time (s).
    pub t: f64,
    /// Angular position.
    pub s: f64,
    /// Angular velocity (rad/s).
    pub v: f64,
    /// Horizontal bob position (m).
    pub x: f64,
    /// Vertical bob position (m).
    pub y: f64,
}

impl Sample {
    /// The integrated part of this sample.
    #[must_use]
    pub const fn phase(&self) -> PhaseState {
        PhaseState {
            t: self.t,
            s: self.s,
            v: self.v,
        }
    }
}

/// Bob position derived from the phase `s/L`:
/// `x = L - L·sin(s/L)`, `y = L - L·cos(s/L)`.
#[must_use]
pub fn bob_position(s: f64, length: f64) -> (f64, f64) {
    let phase = s / length;
    (length - length * phase.sin(), length - length * phase.cos())
}

/// Outcome of one [`SampleRing::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    /// Cursor after the advance.
    pub cursor: usize,
    /// Sample the advance started from.
    pub previous: Sample,
    /// Sample now under the cursor.
    pub current: Sample,
    /// Acceleration evaluated at `previous` (not stored in the ring).
    pub acceleration: f64,
    /// Whether this advance was a wrap to slot 0.
    pub wrapped: bool,
}

/// Fixed-capacity ring of pendulum samples.
#[derive(Debug, Clone, Serialize)]
pub struct SampleRing {
    t: Vec<f64>,
    s: Vec<f64>,
    v: Vec<f64>,
    x: Vec<f64>,
    y: Vec<f64>,
    cursor: usize,
    length: f64,
}

impl SampleRing {
    /// Create a ring of `capacity` slots with `initial` in slot 0.
    ///
    /// Unwritten slots hold the rest state `s = 0` with its derived position,
    /// so every slot satisfies the position invariant from the start.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `capacity < 2` or `length` is not a
    /// positive finite number.
    pub fn new(capacity: usize, initial: PhaseState, length: f64) -> SimResult<Self> {
        if capacity < 2 {
            return Err(SimError::config(format!(
                "sample ring needs at least 2 slots, got {capacity}"
            )));
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(SimError::config(format!("length must be positive, got {length}")));
        }

        let (rest_x, rest_y) = bob_position(0.0, length);
        let mut ring = Self {
            t: vec![0.0; capacity],
            s: vec![0.0; capacity],
            v: vec![0.0; capacity],
            x: vec![rest_x; capacity],
            y: vec![rest_y; capacity],
            cursor: 0,
            length,
        };
        ring.store(0, initial);
        Ok(ring)
    }

    /// Number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.t.len()
    }

    /// Current cursor.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// True when the cursor sits on the last slot.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cursor >= self.capacity() - 1
    }

    /// Sample at slot `i`, if in range.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<Sample> {
        (i < self.capacity()).then(|| Sample {
            t: self.t[i],
            s: self.s[i],
            v: self.v[i],
            x: self.x[i],
            y: self.y[i],
        })
    }

    /// Sample under the cursor.
    #[must_use]
    pub fn current(&self) -> Sample {
        Sample {
            t: self.t[self.cursor],
            s: self.s[self.cursor],
            v: self.v[self.cursor],
            x: self.x[self.cursor],
            y: self.y[self.cursor],
        }
    }

    /// Time column.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.t
    }

    /// Angular position column.
    #[must_use]
    pub fn positions(&self) -> &[f64] {
        &self.s
    }

    /// Angular velocity column.
    #[must_use]
    pub fn velocities(&self) -> &[f64] {
        &self.v
    }

    /// Horizontal bob position column.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.x
    }

    /// Vertical bob position column.
    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.y
    }

    /// Write `state` into slot `cursor + 1` and move the cursor there.
    ///
    /// Returns `None` without touching the ring when it is full; the caller
    /// must [`wrap`](Self::wrap) first.
    pub fn write_next(&mut self, state: PhaseState) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        self.cursor += 1;
        self.store(self.cursor, state);
        Some(self.cursor)
    }

    /// Move the cursor to slot 0 and reseed it from the last slot.
    ///
    /// `(t, s, v)` are copied, `(x, y)` recomputed from the copied `s`.
    pub fn wrap(&mut self) {
        let last = self.capacity() - 1;
        let seed = PhaseState {
            t: self.t[last],
            s: self.s[last],
            v: self.v[last],
        };
        self.cursor = 0;
        self.store(0, seed);
        tracing::debug!(t = seed.t, capacity = self.capacity(), "sample ring wrapped");
    }

    /// Advance by one slot, wrapping when full.
    ///
    /// A wrapping advance only reseeds slot 0; the acceleration it reports is
    /// evaluated at the reseeded state for display.
    pub fn advance(&mut self, constants: &PendulumConstants, integrator: &dyn Integrator) -> Advance {
        let previous = self.current();

        if self.is_full() {
            self.wrap();
            let current = self.current();
            return Advance {
                cursor: self.cursor,
                previous,
                current,
                acceleration: acceleration(current.s, current.v, constants),
                wrapped: true,
            };
        }

        let step = integrator.step(&previous.phase(), constants);
        let cursor = self.write_next(step.next).unwrap_or(self.cursor);

        Advance {
            cursor,
            previous,
            current: self.current(),
            acceleration: step.acceleration,
            wrapped: false,
        }
    }

    /// Restart from `initial` at slot 0, keeping capacity.
    pub fn reset(&mut self, initial: PhaseState) {
        let (rest_x, rest_y) = bob_position(0.0, self.length);
        self.t.fill(0.0);
        self.s.fill(0.0);
        self.v.fill(0.0);
        self.x.fill(rest_x);
        self.y.fill(rest_y);
        self.cursor = 0;
        self.store(0, initial);
    }

    fn store(&mut self, i: usize, state: PhaseState) {
        let (x, y) = bob_position(state.s, self.length);
        self.t[i] = state.t;
        self.s[i] = state.s;
        self.v[i] = state.v;
        self.x[i] = x;
        self.y[i] = y;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::engine::integrator::SemiImplicitEuler;
    use std::f64::consts::FRAC_PI_4;

    fn reference() -> PendulumConstants {
        PendulumConstants::new(9.81, 0.0018, 0.5, 10_000.0, 0.01).unwrap()
    }

    fn released() -> PhaseState {
        PhaseState {
            t: 0.0,
            s: FRAC_PI_4,
            v: 0.0,
        }
    }

    #[test]
    fn test_new_rejects_tiny_capacity() {
        assert!(SampleRing::new(1, released(), 0.5).is_err());
        assert!(SampleRing::new(0, released(), 0.5).is_err());
        assert!(SampleRing::new(2, released(), 0.5).is_ok());
    }

    #[test]
    fn test_new_rejects_bad_length() {
        assert!(SampleRing::new(5, released(), 0.0).is_err());
        assert!(SampleRing::new(5, released(), f64::NAN).is_err());
    }

    #[test]
    fn test_new_seeds_slot_zero() {
        let ring = SampleRing::new(5, released(), 0.5).unwrap();
        let first = ring.current();

        assert_eq!(ring.cursor(), 0);
        assert_eq!(ring.capacity(), 5);
        assert_eq!(first.s, FRAC_PI_4);
        let (x, y) = bob_position(FRAC_PI_4, 0.5);
        assert_eq!(first.x, x);
        assert_eq!(first.y, y);
    }

    #[test]
    fn test_position_invariant_holds_everywhere() {
        let c = reference();
        let mut ring = SampleRing::new(7, released(), c.length()).unwrap();
        for _ in 0..20 {
            ring.advance(&c, &SemiImplicitEuler);
            for i in 0..ring.capacity() {
                let sample = ring.get(i).unwrap();
                let (x, y) = bob_position(sample.s, c.length());
                assert_eq!(sample.x, x, "slot {i}");
                assert_eq!(sample.y, y, "slot {i}");
            }
        }
    }

    #[test]
    fn test_bob_position_formula() {
        let (x, y) = bob_position(0.0, 0.5);
        assert_eq!((x, y), (0.5, 0.0));

        // s/L = pi/2: swung a quarter turn
        let (x, y) = bob_position(0.25 * std::f64::consts::PI, 0.5);
        assert!(x.abs() < 1e-12);
        assert!((y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_advance_fills_in_order() {
        let c = reference();
        let mut ring = SampleRing::new(5, released(), c.length()).unwrap();

        for expected in 1..5 {
            let adv = ring.advance(&c, &SemiImplicitEuler);
            assert_eq!(adv.cursor, expected);
            assert!(!adv.wrapped);
            assert_eq!(adv.current, ring.get(expected).unwrap());
            assert_eq!(adv.previous, ring.get(expected - 1).unwrap());
        }
        assert!(ring.is_full());
    }

    #[test]
    fn test_wraparound_copies_last_slot() {
        let c = reference();
        let mut ring = SampleRing::new(5, released(), c.length()).unwrap();
        for _ in 0..4 {
            ring.advance(&c, &SemiImplicitEuler);
        }
        assert_eq!(ring.cursor(), 4);
        let last = ring.get(4).unwrap();

        let adv = ring.advance(&c, &SemiImplicitEuler);

        assert!(adv.wrapped);
        assert_eq!(adv.cursor, 0);
        assert_eq!(ring.cursor(), 0);
        let first = ring.get(0).unwrap();
        assert_eq!(first.t.to_bits(), last.t.to_bits());
        assert_eq!(first.v.to_bits(), last.v.to_bits());
        assert_eq!(first.s.to_bits(), last.s.to_bits());
        assert_eq!((first.x, first.y), bob_position(last.s, c.length()));
        assert_eq!(adv.acceleration, acceleration(last.s, last.v, &c));
    }

    #[test]
    fn test_trajectory_continues_after_wrap() {
        let c = reference();
        let mut ring = SampleRing::new(5, released(), c.length()).unwrap();
        for _ in 0..5 {
            ring.advance(&c, &SemiImplicitEuler);
        }
        let seam = ring.current();

        let adv = ring.advance(&c, &SemiImplicitEuler);
        let expected = SemiImplicitEuler.step(&seam.phase(), &c).next;

        assert_eq!(adv.cursor, 1);
        assert_eq!(adv.current.phase(), expected);
        assert!((adv.current.t - (seam.t + c.dt())).abs() < 1e-12);
    }

    #[test]
    fn test_write_next_refuses_when_full() {
        let mut ring = SampleRing::new(2, released(), 0.5).unwrap();
        assert_eq!(ring.write_next(PhaseState { t: 0.01, s: 0.1, v: 0.2 }), Some(1));
        assert_eq!(ring.write_next(PhaseState { t: 0.02, s: 0.3, v: 0.4 }), None);
        assert_eq!(ring.get(1).map(|s| s.s), Some(0.1));
    }

    #[test]
    fn test_get_out_of_range() {
        let ring = SampleRing::new(3, released(), 0.5).unwrap();
        assert!(ring.get(3).is_none());
    }

    #[test]
    fn test_columns_share_length() {
        let ring = SampleRing::new(4, released(), 0.5).unwrap();
        assert_eq!(ring.times().len(), 4);
        assert_eq!(ring.positions().len(), 4);
        assert_eq!(ring.velocities().len(), 4);
        assert_eq!(ring.xs().len(), 4);
        assert_eq!(ring.ys().len(), 4);
    }

    #[test]
    fn test_reset_restores_initial_condition() {
        let c = reference();
        let mut ring = SampleRing::new(5, released(), c.length()).unwrap();
        for _ in 0..3 {
            ring.advance(&c, &SemiImplicitEuler);
        }
        ring.reset(released());

        assert_eq!(ring.cursor(), 0);
        assert_eq!(ring.current().phase(), released());
        assert_eq!(ring.get(2).map(|s| s.s), Some(0.0));
    }
}

//! Opponent policies
//!
//! Both policies are stateless: everything they decide on comes in as
//! arguments each call.

use rand::Rng;

/// Parameters for the proportional paddle tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tracker {
    /// Distance moved per tick
    pub step: f32,
    /// No movement while the paddle center is within this distance of the target
    pub deadzone: f32,
    /// Paddle length along the tracking axis
    pub length: f32,
    /// Lowest allowed paddle position
    pub min: f32,
    /// Highest allowed paddle position
    pub max: f32,
}

impl Tracker {
    /// Next paddle position given its current position and the tracked coordinate
    pub fn follow(&self, paddle_pos: f32, target: f32) -> f32 {
        let center = paddle_pos + self.length / 2.0;
        if center < target - self.deadzone {
            (paddle_pos + self.step).min(self.max)
        } else if center > target + self.deadzone {
            (paddle_pos - self.step).max(self.min)
        } else {
            paddle_pos
        }
    }
}

/// Uniformly random element of `candidates`, or `None` when empty
pub fn pick_uniform<'a, T, R: Rng + ?Sized>(candidates: &'a [T], rng: &mut R) -> Option<&'a T> {
    if candidates.is_empty() {
        return None;
    }
    candidates.get(rng.random_range(0..candidates.len()))
}

/// Index of a uniformly random empty slot
pub fn pick_empty_slot<T, R: Rng + ?Sized>(slots: &[Option<T>], rng: &mut R) -> Option<usize> {
    let empty: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_none())
        .map(|(i, _)| i)
        .collect();
    pick_uniform(&empty, rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const PONG_AI: Tracker = Tracker {
        step: 4.0,
        deadzone: 10.0,
        length: 100.0,
        min: 0.0,
        max: 500.0,
    };

    #[test]
    fn test_tracker_step_at_large_positions() {
        // 127.4 + 4.0 - 127.4 is not exactly 4.0 in f32
        let pos = 127.409_935_f32;
        assert_eq!(PONG_AI.follow(pos, 442.9657), pos + 4.0);
    }

    #[test]
    fn test_tracker_moves_toward_target() {
        // center at 300
        assert_eq!(PONG_AI.follow(250.0, 400.0), 254.0);
        assert_eq!(PONG_AI.follow(250.0, 200.0), 246.0);
    }

    #[test]
    fn test_tracker_holds_inside_deadzone() {
        assert_eq!(PONG_AI.follow(250.0, 305.0), 250.0);
        assert_eq!(PONG_AI.follow(250.0, 290.0), 250.0);
    }

    #[test]
    fn test_tracker_clamps_to_bounds() {
        assert_eq!(PONG_AI.follow(498.0, 600.0), 500.0);
        assert_eq!(PONG_AI.follow(2.0, -50.0), 0.0);
    }

    #[test]
    fn test_pick_empty_slot_only_picks_empty() {
        let mut rng = Pcg32::seed_from_u64(3);
        let slots = [Some('X'), None, Some('O'), None];
        for _ in 0..50 {
            let idx = pick_empty_slot(&slots, &mut rng);
            assert!(matches!(idx, Some(1) | Some(3)));
        }
        assert_eq!(pick_empty_slot(&[Some(1), Some(2)], &mut rng), None);
    }

    #[test]
    fn test_pick_uniform_covers_all() {
        let mut rng = Pcg32::seed_from_u64(11);
        let items = [0usize, 1, 2, 3, 4, 5, 6];
        let mut seen = [false; 7];
        for _ in 0..500 {
            if let Some(&i) = pick_uniform(&items, &mut rng) {
                seen[i] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    proptest! {
        #[test]
        fn prop_tracker_stays_in_bounds(pos in 0.0f32..500.0, target in -100.0f32..700.0) {
            let next = PONG_AI.follow(pos, target);
            prop_assert!((0.0..=500.0).contains(&next));

            let center = pos + PONG_AI.length / 2.0;
            let expected = if center < target - PONG_AI.deadzone {
                (pos + PONG_AI.step).min(PONG_AI.max)
            } else if center > target + PONG_AI.deadzone {
                (pos - PONG_AI.step).max(PONG_AI.min)
            } else {
                pos
            };
            prop_assert_eq!(next, expected);
        }
    }
}

//! Opponent pattern detection over sliding windows
//!
//! The detectors here are pure: they read the histories and report whether the
//! window matches. Counting repeated matches is the policy's job.

use serde::{Deserialize, Serialize};

use crate::adversary::history::RingBuffer;
use crate::adversary::memory::OutcomeRecord;
use crate::core::types::GridPos;

/// Positions inspected by the circling detector
pub const CIRCLE_WINDOW: usize = 10;
/// Outcomes inspected by the hit-and-run detector
pub const HIT_RUN_WINDOW: usize = 5;
/// Retreats within the window that count as hit-and-run
pub const HIT_RUN_MIN_RETREATS: usize = 3;

const CIRCLE_MAX_VARIANCE: f64 = 4.0;
const CIRCLE_MIN_MEAN: f64 = 3.0;
const CIRCLE_MAX_MEAN: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern {
    Circling,
    HitAndRun,
}

/// Mean and population variance of the opponent's distance over the window
pub fn distance_profile(from: GridPos, history: &RingBuffer<GridPos>) -> Option<(f64, f64)> {
    if history.len() < CIRCLE_WINDOW {
        return None;
    }
    let distances: Vec<f64> = history
        .recent(CIRCLE_WINDOW)
        .map(|pos| from.manhattan(pos) as f64)
        .collect();
    let n = distances.len() as f64;
    let mean = distances.iter().sum::<f64>() / n;
    let variance = distances.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance))
}

/// Opponent holding a steady, medium distance: classic kiting
pub fn is_circling(from: GridPos, history: &RingBuffer<GridPos>) -> bool {
    match distance_profile(from, history) {
        Some((mean, variance)) => {
            variance < CIRCLE_MAX_VARIANCE && mean > CIRCLE_MIN_MEAN && mean < CIRCLE_MAX_MEAN
        }
        None => false,
    }
}

/// Most of the recent exchanges ended with the attacker backing off
pub fn is_hit_and_run(outcomes: &RingBuffer<OutcomeRecord>) -> bool {
    if outcomes.len() < HIT_RUN_WINDOW {
        return false;
    }
    let retreats = outcomes
        .recent(HIT_RUN_WINDOW)
        .filter(|record| record.retreated == Some(true))
        .count();
    retreats >= HIT_RUN_MIN_RETREATS
}

/// Linear extrapolation of the opponent's next cell.
///
/// Uses the displacement between the third-to-last and newest recorded
/// positions, applied to the opponent's current position.
pub fn predict_next(history: &RingBuffer<GridPos>, current: GridPos) -> Option<GridPos> {
    let newest = history.from_newest(0)?;
    let third = history.from_newest(2)?;
    Some(current + (*newest - *third))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(points: &[(i32, i32)]) -> RingBuffer<GridPos> {
        let mut history = RingBuffer::new(30);
        for &(x, y) in points {
            history.push(GridPos::new(x, y));
        }
        history
    }

    #[test]
    fn test_constant_ring_is_circling() {
        let boss = GridPos::new(10, 10);
        // Ten cells all at Manhattan distance 5
        let ring = [
            (15, 10),
            (14, 11),
            (13, 12),
            (12, 13),
            (11, 14),
            (10, 15),
            (9, 14),
            (8, 13),
            (7, 12),
            (6, 11),
        ];
        let history = history_of(&ring);
        let (mean, variance) = distance_profile(boss, &history).unwrap();
        assert_eq!(mean, 5.0);
        assert_eq!(variance, 0.0);
        assert!(is_circling(boss, &history));
    }

    #[test]
    fn test_short_history_is_not_circling() {
        let boss = GridPos::new(10, 10);
        let history = history_of(&[(15, 10); 9]);
        assert!(!is_circling(boss, &history));
    }

    #[test]
    fn test_close_or_far_ring_is_not_circling() {
        let boss = GridPos::new(10, 10);
        assert!(!is_circling(boss, &history_of(&[(12, 11); 10])));
        assert!(!is_circling(boss, &history_of(&[(17, 10); 10])));
    }

    #[test]
    fn test_erratic_distance_is_not_circling() {
        let boss = GridPos::new(10, 10);
        let points = [(11, 10), (19, 10)].repeat(5);
        assert!(!is_circling(boss, &history_of(&points)));
    }

    #[test]
    fn test_hit_and_run_needs_three_of_five() {
        let record = |retreated| OutcomeRecord {
            damage: 20,
            health_after: 400,
            retreated,
        };
        let mut outcomes = RingBuffer::new(20);
        for retreated in [Some(true), Some(false), Some(true), None] {
            outcomes.push(record(retreated));
        }
        assert!(!is_hit_and_run(&outcomes));

        outcomes.push(record(Some(false)));
        assert!(!is_hit_and_run(&outcomes));

        outcomes.push(record(Some(true)));
        assert!(is_hit_and_run(&outcomes));
    }

    #[test]
    fn test_prediction_extrapolates_two_step_delta() {
        let history = history_of(&[(0, 0), (1, 0), (2, 1)]);
        assert_eq!(
            predict_next(&history, GridPos::new(2, 1)),
            Some(GridPos::new(4, 2))
        );
        assert_eq!(predict_next(&history_of(&[(0, 0), (1, 0)]), GridPos::new(1, 0)), None);
    }
}

//! Order priority scoring and the delivery-time model.
//!
//! Score = 0.6 × normalized distance + 0.4 × normalized value, lower is
//! dispatched first. The normalization ceilings are fixed constants, not derived
//! from the live graph or the live order set.

use serde::{Deserialize, Serialize};

use crate::routing::distance_serde;

/// Weight of the distance term in the priority score.
pub const DISTANCE_WEIGHT: f64 = 0.6;
/// Weight of the order-value term in the priority score.
pub const VALUE_WEIGHT: f64 = 0.4;
/// Distance at or beyond which the distance term saturates at 1.
pub const MAX_DISTANCE: f64 = 20.0;
/// Order value at or beyond which the value term drops to 0.
pub const MAX_ORDER_VALUE: f64 = 1000.0;

/// Fixed minutes added to every delivery estimate.
pub const BASE_DELIVERY_MINUTES: f64 = 10.0;
/// Minutes per unit of travelled distance.
pub const MINUTES_PER_DISTANCE_UNIT: f64 = 2.0;

/// Components of an order's priority score, kept for display and audit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub score: f64,
    /// Pickup-to-destination distance; infinite when unreachable.
    #[serde(with = "distance_serde")]
    pub actual_distance: f64,
    pub normalized_distance: f64,
    pub normalized_value: f64,
}

impl PriorityBreakdown {
    /// Score an order from its pickup-to-destination distance and its value.
    ///
    /// An infinite distance clamps to a normalized distance of 1.
    pub fn compute(distance: f64, order_value: f64) -> Self {
        let normalized_distance = (distance / MAX_DISTANCE).min(1.0);
        let normalized_value = 1.0 - (order_value / MAX_ORDER_VALUE).min(1.0);
        let score = DISTANCE_WEIGHT * normalized_distance + VALUE_WEIGHT * normalized_value;
        Self {
            score,
            actual_distance: distance,
            normalized_distance,
            normalized_value,
        }
    }
}

pub fn priority_score(distance: f64, order_value: f64) -> f64 {
    PriorityBreakdown::compute(distance, order_value).score
}

/// Estimated delivery time in minutes for a total travelled distance.
pub fn estimated_delivery_time_minutes(total_distance: f64) -> f64 {
    BASE_DELIVERY_MINUTES + MINUTES_PER_DISTANCE_UNIT * total_distance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn high_value_nearby_order_scores_low() {
        let breakdown = PriorityBreakdown::compute(3.0, 1000.0);
        assert!(approx_eq(breakdown.normalized_distance, 0.15));
        assert_eq!(breakdown.normalized_value, 0.0);
        assert!(approx_eq(breakdown.score, 0.09));
    }

    #[test]
    fn low_value_distant_order_scores_high() {
        let score = priority_score(13.0, 200.0);
        assert!(approx_eq(score, 0.71), "score = {score}");
        assert!(priority_score(3.0, 1000.0) < score);
    }

    #[test]
    fn unreachable_distance_saturates() {
        let breakdown = PriorityBreakdown::compute(f64::INFINITY, 500.0);
        assert_eq!(breakdown.normalized_distance, 1.0);
        assert!(breakdown.actual_distance.is_infinite());
        assert!(approx_eq(breakdown.score, 0.6 + 0.4 * 0.5));
    }

    #[test]
    fn ceilings_clamp_both_terms() {
        let breakdown = PriorityBreakdown::compute(45.0, 2500.0);
        assert_eq!(breakdown.normalized_distance, 1.0);
        assert_eq!(breakdown.normalized_value, 0.0);
        assert!(approx_eq(breakdown.score, 0.6));

        assert!(approx_eq(priority_score(0.0, 0.0), 0.4));
    }

    #[test]
    fn delivery_time_is_linear_in_distance() {
        assert_eq!(estimated_delivery_time_minutes(0.0), 10.0);
        assert_eq!(estimated_delivery_time_minutes(16.0), 42.0);
    }
}

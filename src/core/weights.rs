//! Weight-sum invariant.
//!
//! The direct children of every area, and the top-level items of a tree, must
//! carry weights adding up to 1. Sums are compared against 1 with an absolute
//! tolerance so that sums such as `0.7 + 0.2 + 0.1` (which is
//! `0.9999999999999999` in binary floating point) are accepted. A tolerance
//! of `0.0` restores exact comparison.

use crate::core::ScoreNode;
use crate::errors::{Result, ScoreTreeError};
use crate::validation::FieldPath;
use tracing::debug;

/// Default absolute tolerance for weight sums.
pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 1e-9;

/// Largest accepted tolerance. Anything looser would let clearly
/// incomplete weight sets (and aggregates above 1) through.
pub const MAX_WEIGHT_TOLERANCE: f64 = 1e-3;

/// Pure function: tolerances are finite and within [0, `MAX_WEIGHT_TOLERANCE`].
pub fn is_valid_tolerance(tolerance: f64) -> bool {
    tolerance.is_finite() && (0.0..=MAX_WEIGHT_TOLERANCE).contains(&tolerance)
}

/// Validate a tolerance before it is attached to a tree.
pub fn ensure_tolerance(tolerance: f64) -> Result<f64> {
    if is_valid_tolerance(tolerance) {
        Ok(tolerance)
    } else {
        Err(ScoreTreeError::value(
            &FieldPath::new("weight_tolerance"),
            "tolerance out of range",
            format!("0 <= tolerance <= {}", MAX_WEIGHT_TOLERANCE),
            tolerance.to_string(),
        ))
    }
}

/// Sum of the direct children's weights.
pub fn weight_sum(items: &[ScoreNode]) -> f64 {
    items.iter().map(ScoreNode::weight).sum()
}

/// Σ child.score × child.weight over the direct children.
pub fn weighted_score(items: &[ScoreNode]) -> f64 {
    items.iter().map(|item| item.score() * item.weight()).sum()
}

/// Pure function: whether a weight sum counts as 1.
pub fn is_complete(total: f64, tolerance: f64) -> bool {
    (total - 1.0).abs() <= tolerance
}

/// Collect every weight-sum violation in `items` and all nested areas.
///
/// `owner` names the collection holding `items`; the root path stands for
/// the tree. Nested areas are reported under `owner` extended with their
/// name, deepest first.
pub fn weight_violations(
    items: &[ScoreNode],
    owner: &FieldPath,
    tolerance: f64,
) -> Vec<ScoreTreeError> {
    let mut violations: Vec<ScoreTreeError> = items
        .iter()
        .filter_map(ScoreNode::as_area)
        .flat_map(|area| weight_violations(area.items(), &owner.push(area.name()), tolerance))
        .collect();

    let total = weight_sum(items);
    if !is_complete(total, tolerance) {
        debug!(owner = %owner, total, "Weight sum violation");
        violations.push(ScoreTreeError::weight_sum(owner, total));
    }

    violations
}

/// Fail-fast form of [`weight_violations`]: the first violation found.
pub fn check_weights(items: &[ScoreNode], owner: &FieldPath, tolerance: f64) -> Result<()> {
    match weight_violations(items, owner, tolerance).into_iter().next() {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Score, ScoreArea};
    use crate::errors::ErrorKind;

    fn leaf(weight: f64) -> ScoreNode {
        Score::new("leaf", weight, (0.0, 1.0), 1.0, false)
            .unwrap()
            .into()
    }

    #[test]
    fn exact_sum_passes() {
        let items = vec![leaf(0.5), leaf(0.25), leaf(0.25)];
        assert!(check_weights(&items, &FieldPath::root(), 0.0).is_ok());
    }

    #[test]
    fn incomplete_sums_fail_with_value_error() {
        for weights in [vec![], vec![0.5], vec![0.9, 0.09], vec![0.6, 0.41], vec![0.0]] {
            let items: Vec<ScoreNode> = weights.iter().map(|w| leaf(*w)).collect();
            let err = check_weights(&items, &FieldPath::root(), DEFAULT_WEIGHT_TOLERANCE)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Value, "weights {:?}", weights);
        }
    }

    #[test]
    fn float_accumulation_needs_tolerance() {
        let items = vec![leaf(0.7), leaf(0.2), leaf(0.1)];
        assert_ne!(weight_sum(&items), 1.0);

        assert!(check_weights(&items, &FieldPath::root(), DEFAULT_WEIGHT_TOLERANCE).is_ok());
        assert!(check_weights(&items, &FieldPath::root(), 0.0).is_err());
    }

    #[test]
    fn nested_violations_are_reported_deepest_first() {
        let inner = ScoreArea::new("inner", 0.5, vec![leaf(1.0)]).unwrap();
        let items = vec![ScoreNode::Area(inner), leaf(0.5)];
        // 0.7 + 0.2 + 0.1 only fails once the tolerance is removed
        let loose = ScoreArea::new("loose", 1.0, vec![leaf(0.7), leaf(0.2), leaf(0.1)]).unwrap();
        let outer = vec![ScoreNode::Area(loose), leaf(0.1)];

        assert!(weight_violations(&items, &FieldPath::root(), 0.0).is_empty());

        let violations = weight_violations(&outer, &FieldPath::root(), 0.0);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field().unwrap().as_string(), "loose");
        assert!(violations[1].field().unwrap().is_root());
    }

    #[test]
    fn weighted_score_folds_children() {
        let items = vec![
            ScoreNode::from(Score::new("a", 0.5, (0.0, 1.0), 1.0, false).unwrap()),
            ScoreNode::from(Score::new("b", 0.5, (0.0, 1.0), 0.0, false).unwrap()),
        ];
        assert_eq!(weighted_score(&items), 0.5);
    }

    #[test]
    fn tolerance_bounds() {
        assert!(is_valid_tolerance(0.0));
        assert!(is_valid_tolerance(1e-6));
        assert!(!is_valid_tolerance(-1e-6));
        assert!(is_valid_tolerance(MAX_WEIGHT_TOLERANCE));
        assert!(!is_valid_tolerance(1.0));
        assert!(!is_valid_tolerance(f64::NAN));
        assert_eq!(ensure_tolerance(0.001).unwrap(), 0.001);
        assert_eq!(ensure_tolerance(2.0).unwrap_err().kind(), ErrorKind::Value);
    }

    #[test]
    fn loose_tolerances_are_rejected() {
        for tolerance in [0.5, 0.01, 0.0011] {
            let err = ensure_tolerance(tolerance).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Value, "tolerance {}", tolerance);
            assert_eq!(err.field().unwrap().as_string(), "weight_tolerance");
        }
    }
}

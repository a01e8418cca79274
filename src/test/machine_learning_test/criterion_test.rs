use super::*;

fn filled(factory: &CriterionFactory, values: &[f64]) -> Criterion {
    let mut criterion = factory.new_criterion();
    for &v in values {
        criterion.add(v);
    }
    criterion
}

// Test regression criterion prediction and metric
#[test]
fn test_mse_prediction_and_metric() {
    let criterion = filled(&CriterionFactory::Mse, &[1.0, 2.0, 6.0]);
    assert_eq!(criterion.count(), 3);
    assert_abs_diff_eq!(criterion.prediction(), 3.0, epsilon = 1e-12);
    // (1-3)^2 + (2-3)^2 + (6-3)^2
    assert_abs_diff_eq!(criterion.metric(), 14.0, epsilon = 1e-12);
}

// Test Gini metric and mode prediction
#[test]
fn test_gini_metric() {
    let criterion = filled(&CriterionFactory::gini(3), &[0.0, 2.0, 2.0, 2.0, 1.0, 1.0]);
    assert_eq!(criterion.prediction(), 2.0);
    // 1*(1-1/6) + 2*(1-2/6) + 3*(1-3/6)
    assert_abs_diff_eq!(criterion.metric(), 5.0 / 6.0 + 4.0 / 3.0 + 1.5, epsilon = 1e-12);
}

// Test entropy metric
#[test]
fn test_entropy_metric() {
    let criterion = filled(&CriterionFactory::entropy(2), &[0.0, 1.0, 0.0, 1.0]);
    // 2 * -log2(1/2) * 2
    assert_abs_diff_eq!(criterion.metric(), 4.0, epsilon = 1e-12);
}

// Test that a single-valued node has zero impurity for every criterion
#[test]
fn test_pure_node_metric_is_zero() {
    for factory in [
        CriterionFactory::Mse,
        CriterionFactory::gini(4),
        CriterionFactory::entropy(4),
    ] {
        let criterion = filled(&factory, &[3.0, 3.0, 3.0]);
        assert_abs_diff_eq!(criterion.metric(), 0.0, epsilon = 1e-12);
        assert_eq!(criterion.prediction(), 3.0);
    }
}

// Test that the lowest code wins a tie and an empty node predicts NaN
#[test]
fn test_categorical_prediction_ties_and_empty() {
    let factory = CriterionFactory::gini(3);
    assert!(factory.new_criterion().prediction().is_nan());
    assert!(CriterionFactory::Mse.new_criterion().prediction().is_nan());

    let criterion = filled(&factory, &[2.0, 1.0, 2.0, 1.0]);
    assert_eq!(criterion.prediction(), 1.0);
}

// Test add/subtract inverse for categorical counts
#[test]
fn test_categorical_add_subtract_inverse() {
    let mut criterion = filled(&CriterionFactory::gini(2), &[0.0, 1.0, 1.0]);
    let before = criterion.clone();

    criterion.add(0.0);
    criterion.subtract(0.0);
    assert_eq!(criterion, before);
    if let Criterion::Categorical(c) = &criterion {
        assert_eq!(c.counts(), &[1, 2]);
    } else {
        panic!("expected a categorical criterion");
    }
}

// Test that subtracting an absent category panics
#[test]
#[should_panic]
fn test_categorical_subtract_absent_category_panics() {
    let mut criterion = filled(&CriterionFactory::gini(2), &[0.0]);
    criterion.subtract(1.0);
}

// Test that a clone is an independent snapshot
#[test]
fn test_clone_is_independent() {
    let mut original = filled(&CriterionFactory::Mse, &[1.0, 2.0]);
    let snapshot = original.clone();
    original.add(10.0);

    assert_eq!(snapshot.count(), 2);
    assert_eq!(original.count(), 3);
}

// Test the additivity invariant: children never exceed their parent
#[test]
fn test_split_metric_never_exceeds_parent() {
    let targets = [3.0, 0.0, 3.0, 1.0, 7.0, 6.0, 5.0, -1.0];
    let parent = filled(&CriterionFactory::Mse, &targets);
    for cut in 1..targets.len() {
        let left = filled(&CriterionFactory::Mse, &targets[..cut]);
        let right = filled(&CriterionFactory::Mse, &targets[cut..]);
        assert!(left.metric() + right.metric() <= parent.metric() + 1e-9);
    }

    let classes = [0.0, 1.0, 1.0, 0.0, 1.0, 0.0];
    for factory in [CriterionFactory::gini(2), CriterionFactory::entropy(2)] {
        let parent = filled(&factory, &classes);
        for cut in 1..classes.len() {
            let left = filled(&factory, &classes[..cut]);
            let right = filled(&factory, &classes[cut..]);
            assert!(left.metric() + right.metric() <= parent.metric() + 1e-9);
        }
    }
}

// Test merge and unmerge of categorical criteria
#[test]
fn test_categorical_merge_unmerge() {
    let factory = CriterionFactory::gini(3);
    let mut a = filled(&factory, &[0.0, 1.0]);
    let b = filled(&factory, &[1.0, 2.0, 2.0]);

    a.merge(&b);
    assert_eq!(a, filled(&factory, &[0.0, 1.0, 1.0, 2.0, 2.0]));

    a.unmerge(&b);
    assert_eq!(a, filled(&factory, &[0.0, 1.0]));
}

// Test that mixing criterion kinds panics
#[test]
#[should_panic]
fn test_merge_mismatched_kinds_panics() {
    let mut a = CriterionFactory::Mse.new_criterion();
    a.merge(&CriterionFactory::gini(2).new_criterion());
}

// Test building a classification factory from a target column
#[test]
fn test_factory_classification() {
    let target = CategoricalFeature::from_values("label", ["a", "b", "c", "a"]);
    let factory = CriterionFactory::classification(Impurity::Gini, &target).unwrap();
    assert_eq!(factory, CriterionFactory::gini(3));

    let numeric = NumericFeature::new("y", vec![1.0, 2.0]);
    assert!(matches!(
        CriterionFactory::classification(Impurity::Entropy, &numeric),
        Err(ModelError::InputValidationError(_))
    ));
}

// Test target validation for both tasks
#[test]
fn test_factory_validate_target() {
    let finite = NumericFeature::new("y", vec![0.0, 1.0, 2.0]);
    assert!(CriterionFactory::Mse.validate_target(&finite).is_ok());
    assert!(CriterionFactory::gini(3).validate_target(&finite).is_ok());
    assert!(CriterionFactory::gini(2).validate_target(&finite).is_err());

    let with_nan = NumericFeature::new("y", vec![0.0, f64::NAN]);
    assert!(CriterionFactory::Mse.validate_target(&with_nan).is_err());
    assert!(CriterionFactory::gini(2).validate_target(&with_nan).is_err());

    let fractional = NumericFeature::new("y", vec![0.5]);
    assert!(CriterionFactory::entropy(2).validate_target(&fractional).is_err());
}

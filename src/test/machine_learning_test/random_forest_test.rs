use super::*;

// Test basic constructor functionality
#[test]
fn test_new() {
    let forest = RandomForest::new(25, None, false, Some(42)).unwrap();
    assert_eq!(forest.get_n_trees(), 25);
    assert!(!forest.get_bootstrap());
    assert_eq!(forest.get_random_state(), Some(42));
    assert_eq!(forest.get_n_features(), 0);
    assert_eq!(forest.get_params(), &DecisionTreeParams::default());
    assert!(forest.get_trees().is_none());
    assert!(forest.get_oob_predictions().is_none());
}

// Test default constructor
#[test]
fn test_default() {
    let forest = RandomForest::default();
    assert_eq!(forest.get_n_trees(), 100);
    assert!(forest.get_bootstrap());
    assert_eq!(forest.get_random_state(), None);
    assert!(forest.get_trees().is_none());
}

// Test that invalid parameters are rejected
#[test]
fn test_new_invalid() {
    assert!(matches!(
        RandomForest::new(0, None, true, None),
        Err(ModelError::InputValidationError(_))
    ));

    let params = DecisionTreeParams {
        max_features: None,
        min_leaf_size: 0,
    };
    assert!(RandomForest::new(10, Some(params), true, None).is_err());
}

// Test that an unfitted forest reports NotFitted
#[test]
fn test_not_fitted() {
    let forest = RandomForest::default();
    let x = array![[1.0, 2.0]];
    assert!(matches!(forest.predict_matrix(x.view()), Err(ModelError::NotFitted)));
    assert!(matches!(forest.importances(), Err(ModelError::NotFitted)));
}

// Test that fitting stores every tree and the out-of-bag predictions
#[test]
fn test_fit_stores_trees() {
    let x = array![[0.0, 1.0], [1.0, 3.0], [2.0, 2.0], [3.0, 5.0], [4.0, 4.0], [5.0, 7.0]];
    let y = array![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    let mut forest = RandomForest::new(15, None, true, Some(8)).unwrap();

    let oob = forest.fit_matrix(x.view(), y.view(), &CriterionFactory::Mse).unwrap();
    assert_eq!(oob.len(), 6);
    assert_eq!(forest.get_trees().map(|trees| trees.len()), Some(15));
    assert_eq!(forest.get_n_features(), 2);
    let stored = forest.get_oob_predictions().unwrap();
    for (a, b) in stored.iter().zip(oob.iter()) {
        assert!(a == b || (a.is_nan() && b.is_nan()));
    }
}

// Test that a forest without bootstrap has no out-of-bag estimate
#[test]
fn test_fit_without_bootstrap() {
    let x = array![[0.0], [1.0], [2.0], [3.0]];
    let y = array![1.0, 2.0, 3.0, 4.0];
    let mut forest = RandomForest::new(5, None, false, Some(1)).unwrap();

    let oob = forest.fit_matrix(x.view(), y.view(), &CriterionFactory::Mse).unwrap();
    assert!(oob.iter().all(|v| v.is_nan()));

    // every tree memorizes the data, so the average does too
    let predictions = forest.predict_matrix(x.view()).unwrap();
    for (p, t) in predictions.iter().zip(y.iter()) {
        assert_abs_diff_eq!(*p, *t, epsilon = 1e-12);
    }
}

// Test that importances are the mean of the per-tree importances
#[test]
fn test_importances_are_tree_means() {
    let mut rng = StdRng::seed_from_u64(5);
    let x = Array2::from_shape_fn((40, 3), |_| rng.random_range(0.0..1.0));
    let y = x.column(0).mapv(|v| if v > 0.5 { 1.0 } else { 0.0 });
    let mut forest = RandomForest::new(12, None, true, Some(2)).unwrap();
    forest.fit_matrix(x.view(), y.view(), &CriterionFactory::gini(2)).unwrap();

    let trees = forest.get_trees().unwrap();
    let mut expected = vec![0.0; 3];
    for tree in trees {
        tree.importances(&mut expected);
    }
    let importances = forest.importances().unwrap();
    for (actual, total) in importances.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(*actual, total / trees.len() as f64, epsilon = 1e-9);
    }
}

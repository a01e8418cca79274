use super::*;

// Test basic constructor functionality
#[test]
fn test_new() {
    let params = DecisionTreeParams {
        max_features: Some(2),
        min_leaf_size: 3,
    };
    let tree = DecisionTree::new(Some(params.clone()), Some(42)).unwrap();
    assert_eq!(tree.get_params(), &params);
    assert_eq!(tree.get_random_state(), Some(42));
    assert_eq!(tree.get_n_features(), 0);
    assert!(tree.get_root().is_none());
}

// Test default constructor
#[test]
fn test_default() {
    let tree = DecisionTree::default();
    assert_eq!(tree.get_params(), &DecisionTreeParams::default());
    assert_eq!(tree.get_random_state(), None);
}

// Test that invalid parameters are rejected
#[test]
fn test_new_invalid_params() {
    let zero_leaf = DecisionTreeParams {
        max_features: None,
        min_leaf_size: 0,
    };
    assert!(matches!(
        DecisionTree::new(Some(zero_leaf), None),
        Err(ModelError::InputValidationError(_))
    ));

    let zero_features = DecisionTreeParams {
        max_features: Some(0),
        min_leaf_size: 1,
    };
    assert!(DecisionTree::new(Some(zero_features), None).is_err());
}

// Test that an unfitted tree reports NotFitted
#[test]
fn test_not_fitted() {
    let tree = DecisionTree::default();
    let x = array![[1.0]];
    assert!(matches!(tree.predict_matrix(x.view()), Err(ModelError::NotFitted)));
    assert!(matches!(tree.importances(), Err(ModelError::NotFitted)));
    assert!(matches!(tree.generate_tree_structure(), Err(ModelError::NotFitted)));
}

// Test fitting with categorical features and a categorical target
#[test]
fn test_fit_categorical_features() {
    let mut features: Vec<Box<dyn OrderedFeature>> = vec![
        Box::new(CategoricalFeature::from_values(
            "weather",
            ["sun", "rain", "sun", "snow", "rain", "snow"],
        )),
        Box::new(NumericFeature::new(
            "temperature",
            vec![25.0, 12.0, 28.0, -3.0, 10.0, -1.0],
        )),
    ];
    let target = CategoricalFeature::from_values("play", ["yes", "no", "yes", "no", "no", "no"]);
    let factory = CriterionFactory::classification(Impurity::Gini, &target).unwrap();

    let mut tree = DecisionTree::new(None, Some(3)).unwrap();
    tree.fit(&mut features, &target, &factory).unwrap();
    assert_eq!(tree.get_n_features(), 2);

    let predictions = tree.predict(&as_features(&features)).unwrap();
    for row in 0..target.len() {
        assert_eq!(predictions[row], target.numeric_value(row));
    }

    let importances = tree.importances().unwrap();
    let root = tree.get_root().unwrap();
    assert_abs_diff_eq!(importances.sum(), root.total_reduction(), epsilon = 1e-12);
}

// Test that prediction checks the number of features
#[test]
fn test_predict_feature_count_mismatch() {
    let x = array![[0.0, 1.0], [1.0, 0.0], [2.0, 1.0]];
    let y = array![0.0, 1.0, 2.0];
    let mut tree = DecisionTree::new(None, Some(0)).unwrap();
    tree.fit_matrix(x.view(), y.view(), &CriterionFactory::Mse).unwrap();

    let narrow = array![[0.0], [1.0]];
    assert!(matches!(
        tree.predict_matrix(narrow.view()),
        Err(ModelError::InputValidationError(_))
    ));
}

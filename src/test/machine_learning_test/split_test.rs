use super::*;

fn search<'a>(
    target: &'a dyn Feature,
    factory: &'a CriterionFactory,
    membership: &'a [Option<usize>],
    bag: &'a Bag,
    min_leaf_size: usize,
) -> SplitSearch<'a> {
    SplitSearch {
        target,
        factory,
        membership,
        bag,
        min_leaf_size,
    }
}

fn node_total(factory: &CriterionFactory, target: &dyn Feature, rows: &[usize]) -> Criterion {
    let mut total = factory.new_criterion();
    for &row in rows {
        total.add(target.numeric_value(row));
    }
    total
}

// Test the best threshold on a cleanly separable numeric feature
#[test]
fn test_numeric_split_separable() {
    let mut feature = NumericFeature::new("x", vec![4.0, 1.0, 3.0, 2.0]);
    feature.prepare();
    let target = NumericFeature::new("y", vec![10.0, 0.0, 10.0, 0.0]);
    let factory = CriterionFactory::Mse;
    let membership = vec![Some(0); 4];
    let bag = Bag::full(4);
    let totals = vec![node_total(&factory, &target, &[0, 1, 2, 3])];

    let splits = search(&target, &factory, &membership, &bag, 1).optimal_splits(&feature, &totals);
    let split = splits[0].unwrap();

    assert_abs_diff_eq!(split.threshold, 2.5, epsilon = 1e-12);
    assert_abs_diff_eq!(split.metric, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(split.reduction, 100.0, epsilon = 1e-12);
    assert_eq!(split.left.size, 2);
    assert_eq!(split.right.size, 2);
    assert_abs_diff_eq!(split.left.prediction, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(split.right.prediction, 10.0, epsilon = 1e-12);
    assert!(split.goes_left(2.0) && !split.goes_left(3.0));
}

// Test that equal feature values always land on the same side
#[test]
fn test_numeric_split_keeps_runs_together() {
    let mut feature = NumericFeature::new("x", vec![1.0, 1.0, 1.0, 2.0, 2.0]);
    feature.prepare();
    let target = NumericFeature::new("y", vec![0.0, 0.0, 5.0, 5.0, 5.0]);
    let factory = CriterionFactory::Mse;
    let membership = vec![Some(0); 5];
    let bag = Bag::full(5);
    let totals = vec![node_total(&factory, &target, &[0, 1, 2, 3, 4])];

    let split = search(&target, &factory, &membership, &bag, 1)
        .optimal_splits(&feature, &totals)[0]
        .unwrap();

    assert_abs_diff_eq!(split.threshold, 1.5, epsilon = 1e-12);
    assert_eq!(split.left.size, 3);
    assert_eq!(split.right.size, 2);
}

// Test that a constant feature offers no split
#[test]
fn test_numeric_split_constant_feature() {
    let mut feature = NumericFeature::new("x", vec![7.0; 4]);
    feature.prepare();
    let target = NumericFeature::new("y", vec![1.0, 2.0, 3.0, 4.0]);
    let factory = CriterionFactory::Mse;
    let membership = vec![Some(0); 4];
    let bag = Bag::full(4);
    let totals = vec![node_total(&factory, &target, &[0, 1, 2, 3])];

    let splits = search(&target, &factory, &membership, &bag, 1).optimal_splits(&feature, &totals);
    assert!(splits[0].is_none());
}

// Test that the leaf-size floor rejects small children
#[test]
fn test_numeric_split_min_leaf_size() {
    let mut feature = NumericFeature::new("x", vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    feature.prepare();
    let target = NumericFeature::new("y", vec![100.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let factory = CriterionFactory::Mse;
    let membership = vec![Some(0); 6];
    let bag = Bag::full(6);
    let totals = vec![node_total(&factory, &target, &[0, 1, 2, 3, 4, 5])];

    let unconstrained = search(&target, &factory, &membership, &bag, 1)
        .optimal_splits(&feature, &totals)[0]
        .unwrap();
    assert_abs_diff_eq!(unconstrained.threshold, 0.5, epsilon = 1e-12);

    let constrained = search(&target, &factory, &membership, &bag, 3)
        .optimal_splits(&feature, &totals)[0]
        .unwrap();
    assert_abs_diff_eq!(constrained.threshold, 2.5, epsilon = 1e-12);
    assert!(constrained.left.size >= 3 && constrained.right.size >= 3);

    let impossible = search(&target, &factory, &membership, &bag, 4).optimal_splits(&feature, &totals);
    assert!(impossible[0].is_none());
}

// Test that NaN values split from finite ones at an infinite threshold
#[test]
fn test_numeric_split_nan_sorts_last() {
    let mut feature = NumericFeature::new("x", vec![f64::NAN, 1.0, f64::NAN, 2.0]);
    feature.prepare();
    let target = NumericFeature::new("y", vec![9.0, 0.0, 9.0, 0.0]);
    let factory = CriterionFactory::Mse;
    let membership = vec![Some(0); 4];
    let bag = Bag::full(4);
    let totals = vec![node_total(&factory, &target, &[0, 1, 2, 3])];

    let split = search(&target, &factory, &membership, &bag, 1)
        .optimal_splits(&feature, &totals)[0]
        .unwrap();

    assert_eq!(split.threshold, f64::INFINITY);
    assert!(split.goes_left(2.0));
    assert!(!split.goes_left(f64::NAN));
}

// Test the threshold between adjacent floats that have no representable midpoint
#[test]
fn test_numeric_split_adjacent_floats() {
    let a: f64 = 1.0;
    let b = f64::from_bits(a.to_bits() + 1);
    let mut feature = NumericFeature::new("x", vec![a, b]);
    feature.prepare();
    let target = NumericFeature::new("y", vec![0.0, 1.0]);
    let factory = CriterionFactory::Mse;
    let membership = vec![Some(0); 2];
    let bag = Bag::full(2);
    let totals = vec![node_total(&factory, &target, &[0, 1])];

    let split = search(&target, &factory, &membership, &bag, 1)
        .optimal_splits(&feature, &totals)[0]
        .unwrap();
    assert!(split.goes_left(a));
    assert!(!split.goes_left(b));
}

// Test that rows are attributed to their own node and bag weights repeat rows
#[test]
fn test_numeric_split_multiple_nodes_and_weights() {
    let mut feature = NumericFeature::new("x", vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    feature.prepare();
    let target = NumericFeature::new("y", vec![0.0, 1.0, 0.0, 5.0, 5.0, 9.0]);
    let factory = CriterionFactory::Mse;
    // rows 0..3 in node 0, rows 3..5 in node 1, row 5 already in a leaf
    let membership = vec![Some(0), Some(0), Some(0), Some(1), Some(1), None];
    let bag = Bag::Bootstrap(vec![1, 2, 0, 1, 1, 1]);

    let mut node0 = factory.new_criterion();
    node0.add(0.0);
    node0.add(1.0);
    node0.add(1.0);
    let node1 = node_total(&factory, &target, &[3, 4]);

    let splits =
        search(&target, &factory, &membership, &bag, 1).optimal_splits(&feature, &[node0, node1]);

    let split = splits[0].unwrap();
    assert_abs_diff_eq!(split.threshold, 0.5, epsilon = 1e-12);
    assert_eq!(split.left.size, 1);
    assert_eq!(split.right.size, 2);
    assert!(splits[1].is_none());
}

// Test the categorical scan in code order
#[test]
fn test_categorical_split() {
    let mut feature = CategoricalFeature::from_values("c", ["a", "b", "c", "a", "b", "c"]);
    feature.prepare();
    let target = NumericFeature::new("y", vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    let factory = CriterionFactory::gini(2);
    let membership = vec![Some(0); 6];
    let bag = Bag::full(6);
    let totals = vec![node_total(&factory, &target, &[0, 1, 2, 3, 4, 5])];

    let split = search(&target, &factory, &membership, &bag, 1)
        .optimal_splits(&feature, &totals)[0]
        .unwrap();

    // codes a=0, b=1, c=2: {a, b} | {c}
    assert_abs_diff_eq!(split.threshold, 1.5, epsilon = 1e-12);
    assert_abs_diff_eq!(split.metric, 0.0, epsilon = 1e-12);
    assert_eq!(split.left.size, 4);
    assert_eq!(split.right.size, 2);
    assert_eq!(split.left.prediction, 0.0);
    assert_eq!(split.right.prediction, 1.0);
}

// Test that the categorical scan skips categories absent from a node
#[test]
fn test_categorical_split_skips_empty_categories() {
    let mut feature = CategoricalFeature::from_values("c", ["a", "b", "c", "a", "c"]);
    feature.prepare();
    let target = NumericFeature::new("y", vec![1.0, 5.0, 3.0, 1.0, 3.0]);
    let factory = CriterionFactory::Mse;
    let membership = vec![Some(0), None, Some(0), Some(0), Some(0)];
    let bag = Bag::full(5);
    let totals = vec![node_total(&factory, &target, &[0, 2, 3, 4])];

    let split = search(&target, &factory, &membership, &bag, 1)
        .optimal_splits(&feature, &totals)[0]
        .unwrap();

    assert_abs_diff_eq!(split.threshold, 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(split.reduction, 4.0, epsilon = 1e-12);
}

// Test that reading a split before the sweep finishes panics
#[test]
#[should_panic]
fn test_split_accumulator_premature_best_split_panics() {
    let factory = CriterionFactory::Mse;
    let mut total = factory.new_criterion();
    total.add(1.0);
    total.add(2.0);

    let mut accumulator = SplitAccumulator::new(&factory, &total, 1);
    accumulator.move_row(0.0, 1.0);
    let _ = accumulator.best_split();
}

// Test a complete manual sweep with the accumulator
#[test]
fn test_split_accumulator_sweep() {
    let factory = CriterionFactory::Mse;
    let rows = [(1.0, 2.0), (2.0, 2.0), (3.0, 8.0)];
    let mut total = factory.new_criterion();
    for &(_, y) in &rows {
        total.add(y);
    }

    let mut accumulator = SplitAccumulator::new(&factory, &total, 1);
    for &(x, y) in &rows {
        accumulator.move_row(x, y);
    }
    let split = accumulator.best_split().unwrap();
    assert_abs_diff_eq!(split.threshold, 2.5, epsilon = 1e-12);
    assert_abs_diff_eq!(split.reduction, 24.0, epsilon = 1e-12);
}

// Test that groups with identical target distributions yield no split despite roundoff
#[test]
fn test_split_without_reduction_is_rejected() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..100 {
        let triple: Vec<f64> = (0..3).map(|_| rng.random_range(-10.0..10.0)).collect();
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for group in 0..6 {
            for k in 0..3 {
                xs.push(group as f64);
                ys.push(triple[(k + group) % 3]);
            }
        }
        let n = xs.len();
        let rows: Vec<usize> = (0..n).collect();

        let target = NumericFeature::new("y", ys);
        let factory = CriterionFactory::Mse;
        let membership = vec![Some(0); n];
        let bag = Bag::full(n);
        let totals = vec![node_total(&factory, &target, &rows)];

        let mut numeric = NumericFeature::new("x", xs.clone());
        numeric.prepare();
        let splits =
            search(&target, &factory, &membership, &bag, 1).optimal_splits(&numeric, &totals);
        assert!(splits[0].is_none(), "numeric split {:?}", splits[0]);

        let mut categorical =
            CategoricalFeature::from_values("x", xs.iter().map(|x| format!("group-{}", x)));
        categorical.prepare();
        let splits =
            search(&target, &factory, &membership, &bag, 1).optimal_splits(&categorical, &totals);
        assert!(splits[0].is_none(), "categorical split {:?}", splits[0]);
    }
}

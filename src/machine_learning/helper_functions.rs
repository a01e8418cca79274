use super::*;

/// Performs validation checks on a set of feature columns.
///
/// This function validates that:
/// - At least one feature is supplied
/// - Every feature has at least one row
/// - Every feature has the same number of rows as the first one
/// - No feature contains an infinite value (NaN is allowed and sorts last)
///
/// # Parameters
///
/// * `features` - The feature columns to check
///
/// # Returns
///
/// - `Ok(usize)` - The common number of rows
/// - `Err(ModelError::InputValidationError)` - If any validation check fails, with an informative error message
pub fn preliminary_check(features: &[&dyn Feature]) -> Result<usize, ModelError> {
    let first = match features.first() {
        Some(first) => first,
        None => {
            return Err(ModelError::InputValidationError(
                "At least one feature is required".to_string(),
            ));
        }
    };

    let n_rows = first.len();
    if n_rows == 0 {
        return Err(ModelError::InputValidationError(
            "Input data is empty".to_string(),
        ));
    }

    for feature in features {
        if feature.len() != n_rows {
            return Err(ModelError::InputValidationError(format!(
                "Feature '{}' has a different length, expected: {}, actual: {}",
                feature.name(),
                n_rows,
                feature.len()
            )));
        }

        for row in 0..n_rows {
            if feature.numeric_value(row).is_infinite() {
                return Err(ModelError::InputValidationError(format!(
                    "Feature '{}' contains an infinite value at row {}",
                    feature.name(),
                    row
                )));
            }
        }
    }

    Ok(n_rows)
}

/// Validates that the target column matches the feature columns and suits the criterion.
///
/// # Parameters
///
/// - `n_rows` - Number of rows of the feature columns
/// - `target` - The target column
/// - `factory` - The criterion factory the target will be fed to
///
/// # Returns
///
/// - `Ok(())` - If the target has `n_rows` rows and every value is valid for the criterion
/// - `Err(ModelError::InputValidationError)` - Otherwise
pub fn validate_target(
    n_rows: usize,
    target: &dyn Feature,
    factory: &CriterionFactory,
) -> Result<(), ModelError> {
    if target.len() != n_rows {
        return Err(ModelError::InputValidationError(format!(
            "Features and target '{}' have different lengths, expected: {}, actual: {}",
            target.name(),
            n_rows,
            target.len()
        )));
    }

    factory.validate_target(target)
}

/// Validates the feature set passed to a fitted model for prediction.
///
/// # Parameters
///
/// - `features` - The feature columns to predict on
/// - `n_features` - Number of features the model was fitted with
///
/// # Returns
///
/// - `Ok(usize)` - The common number of rows
/// - `Err(ModelError::InputValidationError)` - If the feature count differs from training or [`preliminary_check`] fails
pub fn validate_prediction_features(
    features: &[&dyn Feature],
    n_features: usize,
) -> Result<usize, ModelError> {
    if features.len() != n_features {
        return Err(ModelError::InputValidationError(format!(
            "Feature count mismatch, expected: {}, actual: {}",
            n_features,
            features.len()
        )));
    }

    preliminary_check(features)
}

/// Validates tree growth parameters.
///
/// # Parameters
///
/// * `params` - The parameters to validate
///
/// # Returns
///
/// - `Ok(())` - If `min_leaf_size` is at least 1 and `max_features` is not `Some(0)`
/// - `Err(ModelError::InputValidationError)` - Otherwise
pub fn validate_params(params: &DecisionTreeParams) -> Result<(), ModelError> {
    if params.min_leaf_size == 0 {
        return Err(ModelError::InputValidationError(
            "min_leaf_size must be greater than 0".to_string(),
        ));
    }

    if params.max_features == Some(0) {
        return Err(ModelError::InputValidationError(
            "max_features must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates that the number of trees is greater than zero.
///
/// # Parameters
///
/// * `n_trees` - The number of trees to validate
///
/// # Returns
///
/// - `Ok(())` - If `n_trees` is greater than 0
/// - `Err(ModelError::InputValidationError)` - If `n_trees` is 0
pub fn validate_n_trees(n_trees: usize) -> Result<(), ModelError> {
    if n_trees == 0 {
        return Err(ModelError::InputValidationError(
            "n_trees must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates a target vector supplied alongside a feature matrix.
pub fn validate_matrix_target(x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<(), ModelError> {
    if x.ncols() == 0 {
        return Err(ModelError::InputValidationError(
            "At least one feature is required".to_string(),
        ));
    }

    if y.len() != x.nrows() {
        return Err(ModelError::InputValidationError(format!(
            "Input data and target vector have different lengths, expected: {}, actual: {}",
            x.nrows(),
            y.len()
        )));
    }

    Ok(())
}

/// Creates the random source for one fit.
///
/// Seeded from `random_state` when given, otherwise from the thread-local generator.
pub fn make_rng(random_state: Option<u64>) -> StdRng {
    match random_state {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rng()),
    }
}

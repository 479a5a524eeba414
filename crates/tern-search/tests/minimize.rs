use tern_arith::Interval;
use tern_real::{FunctionCode, Real};
use tern_search::{
    maximize, minimize, InitPolicy, OptimizeConfig, OptimizeOutcome, SelectionPolicy,
};

fn square() -> FunctionCode {
    FunctionCode::pow(2)
}

/// x^6 + x^5 - x^4 + x^2, whose global minimum sits near x = -1.1959 with
/// value about -0.1360.
fn sextic() -> FunctionCode {
    FunctionCode::unary_polynomial(vec![
        (Real::from_int(1), 6),
        (Real::from_int(1), 5),
        (Real::from_int(-1), 4),
        (Real::from_int(1), 2),
    ])
    .unwrap()
}

#[test]
fn square_is_minimized_at_zero() {
    let domain = Interval::new(-1, 1, 0);
    let result = minimize(&square(), &domain, 50, &OptimizeConfig::default()).unwrap();
    match result.outcome {
        OptimizeOutcome::Found { point, image } => {
            assert!(point.precision() >= 10);
            assert!(point.left_endpoint().to_f64().abs() < 0.02);
            assert!(image.left_endpoint().to_f64().abs() < 1e-12);
        }
        other => panic!("expected a minimum, got {other:?}"),
    }
    assert!(result.report.intervals_checked > 0);
    assert!(result.report.answers_recorded >= 1);
}

#[test]
fn sextic_minimum_is_located() {
    let domain = Interval::new(-4, 4, 0);
    let result = minimize(&sextic(), &domain, 30, &OptimizeConfig::default()).unwrap();
    match result.outcome {
        OptimizeOutcome::Found { point, image } => {
            let x = point.left_endpoint().to_f64();
            let y = image.left_endpoint().to_f64();
            assert!((x + 1.1959).abs() < 0.05, "minimizer at {x}");
            assert!((y + 0.1360).abs() < 0.05, "minimum value {y}");
        }
        other => panic!("expected a minimum, got {other:?}"),
    }
}

#[test]
fn zero_accuracy_returns_the_domain_hull() {
    // At accuracy 0 the hull's own image enclosure is already good enough.
    let domain = Interval::new(-1, 1, 0);
    let result = minimize(&square(), &domain, 0, &OptimizeConfig::default()).unwrap();
    match result.outcome {
        OptimizeOutcome::Found { point, .. } => {
            assert_eq!(point, domain.canonicalize());
        }
        other => panic!("expected the hull itself, got {other:?}"),
    }
    assert_eq!(result.report.intervals_checked, 1);
}

#[test]
fn random_selection_is_deterministic_per_seed() {
    let domain = Interval::new(-1, 1, 0);
    let config = OptimizeConfig {
        selection: SelectionPolicy::UniformRandom,
        seed: 42,
        ..OptimizeConfig::default()
    };
    let first = minimize(&square(), &domain, 25, &config).unwrap();
    let second = minimize(&square(), &domain, 25, &config).unwrap();
    assert_eq!(first.outcome, second.outcome);
    assert_eq!(
        first.report.intervals_checked,
        second.report.intervals_checked
    );
}

#[test]
fn widest_image_selection_reaches_the_same_minimum() {
    let domain = Interval::new(-1, 1, 0);
    let config = OptimizeConfig {
        selection: SelectionPolicy::WidestImage,
        ..OptimizeConfig::default()
    };
    let result = minimize(&square(), &domain, 25, &config).unwrap();
    match result.outcome {
        OptimizeOutcome::Found { point, .. } => {
            assert!(point.left_endpoint().to_f64().abs() < 0.02);
        }
        other => panic!("expected a minimum, got {other:?}"),
    }
}

#[test]
fn grid_initialization_still_converges() {
    let domain = Interval::new(-1, 1, 0);
    let config = OptimizeConfig {
        init: InitPolicy::Grid(3),
        ..OptimizeConfig::default()
    };
    let result = minimize(&square(), &domain, 20, &config).unwrap();
    match result.outcome {
        OptimizeOutcome::Found { point, .. } => {
            assert!(point.left_endpoint().to_f64().abs() < 0.02);
        }
        other => panic!("expected a minimum, got {other:?}"),
    }
    // The grid seeds the frontier with more than one candidate.
    assert!(result.report.frontier_peak > 1);
}

#[test]
fn budget_cuts_the_refinement_short() {
    let domain = Interval::new(-1, 1, 0);
    let config = OptimizeConfig {
        budget: Some(10),
        ..OptimizeConfig::default()
    };
    let result = minimize(&square(), &domain, 80, &config).unwrap();
    match result.outcome {
        OptimizeOutcome::OutOfBudget { best } => {
            // Accuracy 80 is far out of reach in ten image evaluations.
            assert!(best.is_none());
        }
        other => panic!("expected an out-of-budget stop, got {other:?}"),
    }
    assert!(result.report.intervals_checked >= 10);
    assert!(result.report.intervals_checked <= 12);
}

#[test]
fn maximize_negates_through_the_minimizer() {
    // 1 - x^2 peaks at x = 0 with value 1.
    let hat = FunctionCode::unary_polynomial(vec![
        (Real::from_int(-1), 2),
        (Real::from_int(1), 0),
    ])
    .unwrap();
    let domain = Interval::new(-1, 1, 0);
    let result = maximize(&hat, &domain, 30, &OptimizeConfig::default()).unwrap();
    match result.outcome {
        OptimizeOutcome::Found { point, image } => {
            assert!(point.left_endpoint().to_f64().abs() < 0.02);
            assert!((image.left_endpoint().to_f64() - 1.0).abs() < 0.01);
        }
        other => panic!("expected a maximum, got {other:?}"),
    }
}

#[test]
fn non_unary_functions_are_rejected() {
    let domain = Interval::new(-1, 1, 0);
    let err = minimize(&FunctionCode::add(), &domain, 10, &OptimizeConfig::default())
        .unwrap_err();
    assert_eq!(err.info().code, "optimize.not_unary");
}

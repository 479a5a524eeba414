use tern_core::errors::{ErrorInfo, TernError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("arity", "2")
        .with_context("args", "1")
}

#[test]
fn arith_error_surface() {
    let err = TernError::Arith(sample_info("A001", "scale overflow"));
    assert_eq!(err.info().code, "A001");
    assert!(err.info().context.contains_key("arity"));
}

#[test]
fn function_error_surface() {
    let err = TernError::Function(sample_info("F001", "arity mismatch"));
    assert_eq!(err.info().code, "F001");
    assert!(err.info().context.contains_key("args"));
}

#[test]
fn search_error_surface() {
    let err = TernError::Search(sample_info("S001", "empty domain"));
    assert_eq!(err.info().code, "S001");
}

#[test]
fn optimize_error_surface() {
    let err = TernError::Optimize(sample_info("O001", "empty domain"));
    assert_eq!(err.info().code, "O001");
}

#[test]
fn hint_renders_in_display() {
    let err = TernError::Predicate(
        ErrorInfo::new("P001", "delta must be finite").with_hint("pick a precision level"),
    );
    let rendered = err.to_string();
    assert!(rendered.contains("P001"));
    assert!(rendered.contains("pick a precision level"));
}

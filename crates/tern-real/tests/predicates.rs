use num_bigint::BigInt;
use tern_arith::Dyadic;
use tern_real::{Predicate, Real};

#[test]
fn equality_holds_on_equal_reals() {
    let p = Predicate::eq(Real::from_int(1), 30);
    assert!(p.holds(&Real::from_int(1)));
    assert!(!p.holds(&Real::from_int(2)));
    assert_eq!(p.delta(), 30);
}

#[test]
fn equality_tolerates_differences_below_delta() {
    // 2^-30 is indistinguishable from 0 at level 10.
    let p = Predicate::eq(Real::from_int(0), 10);
    assert!(p.holds(&Real::from_dyadic(&Dyadic::new(1, 30))));
    // But not at a level fine enough to separate them.
    let q = Predicate::eq(Real::from_int(0), 40);
    assert!(!q.holds(&Real::from_dyadic(&Dyadic::new(1, 5))));
}

#[test]
fn order_predicates_are_non_strict() {
    let at_least_two = Predicate::geq(Real::from_int(2), 10);
    assert!(at_least_two.holds(&Real::from_int(3)));
    assert!(at_least_two.holds(&Real::from_int(2)));
    assert!(!at_least_two.holds(&Real::from_int(1)));

    let at_most_two = Predicate::leq(Real::from_int(2), 10);
    assert!(at_most_two.holds(&Real::from_int(1)));
    assert!(at_most_two.holds(&Real::from_int(2)));
    assert!(!at_most_two.holds(&Real::from_int(3)));
}

#[test]
fn negation_flips_the_verdict() {
    let below_two = Predicate::geq(Real::from_int(2), 10).not();
    assert!(below_two.holds(&Real::from_int(1)));
    assert!(!below_two.holds(&Real::from_int(3)));
    assert_eq!(below_two.delta(), 10);
}

#[test]
fn connectives_take_the_finer_delta() {
    let in_band = Predicate::geq(Real::from_int(0), 12).and(&Predicate::leq(Real::from_int(4), 25));
    assert_eq!(in_band.delta(), 25);
    assert!(in_band.holds(&Real::from_int(2)));
    assert!(!in_band.holds(&Real::from_int(5)));
    assert!(!in_band.holds(&Real::from_int(-1)));

    let outside = Predicate::leq(Real::from_int(0), 12).or(&Predicate::geq(Real::from_int(4), 25));
    assert_eq!(outside.delta(), 25);
    assert!(outside.holds(&Real::from_int(-1)));
    assert!(outside.holds(&Real::from_int(5)));
    assert!(!outside.holds(&Real::from_int(2)));
}

#[test]
fn custom_predicates_see_level_delta_codes() {
    let positive = Predicate::new(15, |x: &Real| x.approx(15) > BigInt::from(0));
    assert!(positive.holds(&Real::from_int(1)));
    assert!(!positive.holds(&Real::from_int(-1)));
}

use num_bigint::BigInt;
use proptest::prelude::*;
use tern_arith::{discretize, Interval, Node};

#[test]
fn corner_product_multiplication() {
    // [-1,2]/2 * [-3,1]/4 = [min,max] of {3,-1,-6,2} over 2^(1+2).
    let a = Interval::new(-1, 2, 1);
    let b = Interval::new(-3, 1, 2);
    let product = a.mul(&b);
    assert_eq!(product.left_code().clone(), BigInt::from(-6));
    assert_eq!(product.right_code().clone(), BigInt::from(3));
    assert_eq!(product.precision(), 3);
}

#[test]
fn abs_clamps_spanning_intervals_at_zero() {
    let spanning = Interval::new(-3, 2, 1);
    let clamped = spanning.abs();
    assert_eq!(clamped.left_code().clone(), BigInt::from(0));
    assert_eq!(clamped.right_code().clone(), BigInt::from(2));

    let negative = Interval::new(-5, -1, 1);
    let flipped = negative.abs();
    assert_eq!(flipped.left_code().clone(), BigInt::from(1));
    assert_eq!(flipped.right_code().clone(), BigInt::from(5));
}

#[test]
fn eclipse_boundary_cases() {
    let p = 3;
    assert!(Interval::new(0, 1, p).eclipses(&Interval::new(2, 3, p)));
    assert!(!Interval::new(2, 3, p).eclipses(&Interval::new(0, 1, p)));
    // Touching endpoints count: the relation is non-strict.
    assert!(Interval::new(0, 1, p).eclipses(&Interval::new(1, 2, p)));
    // Identical degenerate intervals eclipse each other both ways; the
    // optimization loop's sibling guard is what keeps one of them alive.
    assert!(Interval::new(1, 1, p).eclipses(&Interval::new(1, 1, p)));
    // Identical non-degenerate intervals do not.
    assert!(!Interval::new(0, 1, p).eclipses(&Interval::new(0, 1, p)));
}

#[test]
fn eclipse_aligns_mixed_scales() {
    // [0,1]/1 = [0, 0.5] against [2,3]/2 = [0.5, 0.75]: touching, eclipsed.
    assert!(Interval::new(0, 1, 1).eclipses(&Interval::new(2, 3, 2)));
    // [3,4]/2 = [0.75, 1] is entirely above [0, 0.5].
    assert!(!Interval::new(3, 4, 2).eclipses(&Interval::new(0, 1, 1)));
}

#[test]
fn canonicalize_node_view_round_trips() {
    for code in [-7i64, -2, 0, 3, 12] {
        for scale in [0i64, 1, 5, 11] {
            let node = Node::new(code, scale);
            assert_eq!(node.as_interval().canonicalize(), node);
        }
    }
}

#[test]
fn node_children_are_contained_in_parent() {
    let parent = Node::new(-5, 4);
    let parent_iv = parent.as_interval().rescale(1);
    for child in [parent.refine_left(), parent.refine_mid(), parent.refine_right()] {
        let child_iv = child.as_interval();
        assert!(parent_iv.left_code() <= child_iv.left_code());
        assert!(child_iv.right_code() <= parent_iv.right_code());
        assert_eq!(child.precision(), parent.precision() + 1);
    }
}

#[test]
fn discretize_tiles_the_domain() {
    let domain = Interval::new(-2, 2, 0);
    let grid = discretize(&domain, 3);
    assert!(!grid.is_empty());
    for pair in grid.windows(2) {
        assert_eq!(pair[1].code() - pair[0].code(), BigInt::from(2));
    }
    for node in &grid {
        assert_eq!(node.precision(), 3);
    }
    let first = grid.first().unwrap();
    let last = grid.last().unwrap();
    assert!(first.left_endpoint().to_f64() <= -2.0);
    assert!(last.right_endpoint().to_f64() >= 2.0);
}

#[test]
fn discretize_at_coarse_precision_returns_the_domain_node() {
    let domain = Interval::new(-2, 2, 0);
    let initial = domain.canonicalize();
    let grid = discretize(&domain, initial.precision());
    assert_eq!(grid, vec![initial]);
}

fn value_leq(num_a: &BigInt, scale_a: i64, num_b: &BigInt, scale_b: i64) -> bool {
    let scale = scale_a.max(scale_b);
    (num_a << (scale - scale_a) as usize) <= (num_b << (scale - scale_b) as usize)
}

proptest! {
    // Soundness of the domination relation: whenever A eclipses B, the right
    // endpoint of A is at most the left endpoint of B as exact rationals, at
    // any pair of scales.
    #[test]
    fn eclipses_is_sound(a in -100i64..100, b in -100i64..100, p in 0i64..12,
                         c in -100i64..100, d in -100i64..100, q in 0i64..12) {
        let (a, b) = (a.min(b), a.max(b));
        let (c, d) = (c.min(d), c.max(d));
        let x = Interval::new(a, b, p);
        let y = Interval::new(c, d, q);
        if x.eclipses(&y) {
            prop_assert!(value_leq(x.right_code(), p, y.left_code(), q));
        } else {
            prop_assert!(!value_leq(x.right_code(), p, y.left_code(), q));
        }
    }

    #[test]
    fn canonicalize_covers_the_whole_interval(a in -1000i64..1000, w in 0i64..1000, p in 0i64..16) {
        let iv = Interval::new(a, a + w, p);
        let node = iv.canonicalize();
        let shift = (p - node.precision()).max(0) as usize;
        let lower = node.code() << shift;
        let upper = (node.code() + 2) << shift;
        prop_assert!(lower <= BigInt::from(a));
        prop_assert!(BigInt::from(a + w) <= upper);
        // The coarsening count stays within bitlength(width) steps, the
        // point past which a node always covers regardless of alignment.
        let bits = BigInt::from(w).bits() as i64;
        prop_assert!(node.precision() >= p - bits.max(0));
    }

    #[test]
    fn interval_add_is_exact(a in -100i64..100, b in -100i64..100, p in 0i64..10,
                             c in -100i64..100, d in -100i64..100, q in 0i64..10) {
        let (a, b) = (a.min(b), a.max(b));
        let (c, d) = (c.min(d), c.max(d));
        let sum = Interval::new(a, b, p).add(&Interval::new(c, d, q));
        let scale = p.max(q);
        prop_assert_eq!(sum.precision(), scale);
        let expect_left = (BigInt::from(a) << (scale - p) as usize) + (BigInt::from(c) << (scale - q) as usize);
        prop_assert_eq!(sum.left_code().clone(), expect_left);
    }
}

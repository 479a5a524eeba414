use tern_arith::{Dyadic, Interval, Node};

#[test]
fn dyadic_roundtrips_through_json() {
    let value = Dyadic::new(-12345, 17);
    let json = serde_json::to_string(&value).unwrap();
    let back: Dyadic = serde_json::from_str(&json).unwrap();
    assert_eq!(back.num(), value.num());
    assert_eq!(back.scale(), value.scale());
}

#[test]
fn interval_roundtrips_through_json() {
    let value = Interval::new(-7, 13, 4);
    let json = serde_json::to_string(&value).unwrap();
    let back: Interval = serde_json::from_str(&json).unwrap();
    assert_eq!(back, value);
}

#[test]
fn node_roundtrips_through_json() {
    let value = Node::new(41, 9);
    let json = serde_json::to_string(&value).unwrap();
    let back: Node = serde_json::from_str(&json).unwrap();
    assert_eq!(back, value);
}

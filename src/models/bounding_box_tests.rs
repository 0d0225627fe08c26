use crate::models::{BoundingBox, Vec2};

fn square() -> BoundingBox {
    BoundingBox::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0))
}

#[test]
fn test_quadrant_order() {
    let bbox = square();
    assert_eq!(bbox.quadrant_of(Vec2::new(1.0, 1.0)), 0); // top-left
    assert_eq!(bbox.quadrant_of(Vec2::new(3.0, 1.0)), 1); // top-right
    assert_eq!(bbox.quadrant_of(Vec2::new(1.0, 3.0)), 2); // bottom-left
    assert_eq!(bbox.quadrant_of(Vec2::new(3.0, 3.0)), 3); // bottom-right
}

#[test]
fn test_midpoint_ties_go_right_and_bottom() {
    let bbox = square();
    assert_eq!(bbox.quadrant_of(Vec2::new(2.0, 1.0)), 1);
    assert_eq!(bbox.quadrant_of(Vec2::new(1.0, 2.0)), 2);
    assert_eq!(bbox.quadrant_of(Vec2::new(2.0, 2.0)), 3);
}

#[test]
fn test_quadrants_partition_parent() {
    let bbox = square();
    let [tl, tr, bl, br] = bbox.quadrants();
    assert_eq!(tl, BoundingBox::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0)));
    assert_eq!(tr, BoundingBox::new(Vec2::new(2.0, 0.0), Vec2::new(4.0, 2.0)));
    assert_eq!(bl, BoundingBox::new(Vec2::new(0.0, 2.0), Vec2::new(2.0, 4.0)));
    assert_eq!(br, BoundingBox::new(Vec2::new(2.0, 2.0), Vec2::new(4.0, 4.0)));
    let area: f32 = bbox.quadrants().iter().map(|q| q.size().x * q.size().y).sum();
    assert_eq!(area, 16.0);
}

#[test]
fn test_routed_quadrant_contains_point() {
    let bbox = BoundingBox::new(Vec2::new(-1.0, -3.0), Vec2::new(5.0, 2.0));
    for &p in &[Vec2::new(-1.0, -3.0), Vec2::new(2.0, -0.5), Vec2::new(5.0, 2.0), Vec2::new(0.3, 1.9)] {
        let index = bbox.quadrant_of(p);
        assert!(bbox.quadrant(index).contains(p), "{:?} not in quadrant {}", p, index);
    }
}

#[test]
fn test_distance_to_point() {
    let bbox = square();
    assert_eq!(bbox.distance_to_point(Vec2::new(2.0, 2.0)), 0.0);
    assert_eq!(bbox.distance_to_point(Vec2::new(-3.0, 2.0)), 3.0);
    assert_eq!(bbox.distance_to_point(Vec2::new(7.0, 8.0)), 5.0);
}

#[test]
fn test_degenerate_box() {
    let p = Vec2::new(1.5, 1.5);
    let bbox = BoundingBox::enclosing([p, p]);
    assert!(bbox.is_point());
    assert!(bbox.contains(p));
    assert_eq!(bbox.quadrant_of(p), 3);
    assert!(!square().is_point());
}

#[test]
fn test_expanded() {
    let bbox = square().expanded(1.0);
    assert_eq!(bbox.min, Vec2::new(-1.0, -1.0));
    assert_eq!(bbox.max, Vec2::new(5.0, 5.0));
}

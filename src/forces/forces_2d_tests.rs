use approx::assert_relative_eq;
use glam::Vec2;
use crate::forces::{compute_force, net_force};
use crate::particles::Particle;

fn particle_at(id: usize, x: f32, y: f32) -> Particle {
    Particle::new(id, 1.0, Vec2::new(x, y), Vec2::ZERO)
}

#[test]
fn test_force_points_towards_source() {
    let target = particle_at(0, 0.0, 0.0);
    let source = particle_at(1, 0.0, -0.4);
    let force = compute_force(&target, &source, 1.0);
    assert_eq!(force.x, 0.0);
    assert!(force.y < 0.0, "Force should point towards the source");
}

#[test]
fn test_inverse_square_magnitude() {
    let target = Particle { mass: 2.0, ..particle_at(0, 0.0, 0.0) };
    let source = Particle { mass: 3.0, ..particle_at(1, 0.3, 0.4) };
    // dist = 0.5, below the decay threshold of 0.75.
    let force = compute_force(&target, &source, 1.0);
    assert_relative_eq!(force.length(), 0.01 * 2.0 * 3.0 / 0.25, epsilon = 1e-5);
}

#[test]
fn test_zero_beyond_cull_radius() {
    let target = particle_at(0, 0.0, 0.0);
    for &d in &[1.0001_f32, 1.5, 10.0, 1000.0] {
        let source = particle_at(1, d, 0.0);
        assert_eq!(compute_force(&target, &source, 1.0), Vec2::ZERO, "distance {}", d);
    }
}

#[test]
fn test_zero_for_coincident_particles() {
    let target = particle_at(0, 2.0, 2.0);
    assert_eq!(compute_force(&target, &target, 1.0), Vec2::ZERO);
    let near = particle_at(1, 2.0005, 2.0);
    assert_eq!(compute_force(&target, &near, 1.0), Vec2::ZERO);
}

#[test]
fn test_contact_clamp_bounds_magnitude() {
    let target = particle_at(0, 0.0, 0.0);
    let close = particle_at(1, 0.01, 0.0);
    let at_clamp = particle_at(2, 0.1, 0.0);
    let f_close = compute_force(&target, &close, 1.0);
    let f_clamp = compute_force(&target, &at_clamp, 1.0);
    assert_relative_eq!(f_close.x, 1.0, epsilon = 1e-5);
    assert_relative_eq!(f_close.x, f_clamp.x, epsilon = 1e-5);
}

#[test]
fn test_linear_decay_near_cull_radius() {
    let target = particle_at(0, 0.0, 0.0);
    // At 0.875 the decay factor is 0.5.
    let source = particle_at(1, 0.875, 0.0);
    let force = compute_force(&target, &source, 1.0);
    let undecayed = 0.01 / (0.875 * 0.875);
    assert_relative_eq!(force.x, 0.5 * undecayed, epsilon = 1e-5);
}

#[test]
fn test_force_is_continuous_at_cull_radius() {
    let target = particle_at(0, 0.0, 0.0);
    let at_radius = particle_at(1, 2.0, 0.0);
    assert_relative_eq!(compute_force(&target, &at_radius, 2.0).length(), 0.0, epsilon = 1e-7);
    let just_inside = particle_at(2, 1.999, 0.0);
    assert!(compute_force(&target, &just_inside, 2.0).length() < 1e-5);
}

#[test]
fn test_net_force_ignores_self() {
    let target = particle_at(0, 0.0, 0.0);
    let left = particle_at(1, -0.5, 0.0);
    let right = particle_at(2, 0.5, 0.0);
    let sources = [target, left, right];
    let force = net_force(&target, &sources, 1.0);
    assert_relative_eq!(force.x, 0.0, epsilon = 1e-7);
    assert_relative_eq!(force.y, 0.0, epsilon = 1e-7);

    let one_sided = net_force(&target, &sources[..2], 1.0);
    assert_relative_eq!(one_sided.x, -0.04, epsilon = 1e-6);
}

use approx::assert_relative_eq;
use glam::Vec2;
use crate::forces::compute_force;
use crate::particles::{accumulate_forces, generate_scene, integrate, simulate_step, update_particle, Particle, SceneKind};
use crate::spatial::QuadTree;
use crate::utils::StepParameters;

fn two_bodies(separation: f32) -> Vec<Particle> {
    vec![
        Particle::new(0, 1.0, Vec2::new(0.0, 0.0), Vec2::ZERO),
        Particle::new(1, 1.0, Vec2::new(separation, 0.0), Vec2::ZERO),
    ]
}

#[test]
fn test_two_body_step() {
    let particles = two_bodies(0.5);
    let tree = QuadTree::from_particles(&particles);
    let params = StepParameters::new(Some(0.2), Some(1.0));

    let forces = accumulate_forces(&tree, &particles, params.cull_radius);
    assert_relative_eq!(forces[0].force.x, 0.04, epsilon = 1e-6);
    assert_relative_eq!(forces[0].force.y, 0.0);
    assert_eq!(forces[0].interactions, 2); // itself and its neighbour

    let next = integrate(&particles, &forces, params.delta_time);
    assert_relative_eq!(next[0].velocity.x, 0.008, epsilon = 1e-7);
    assert_relative_eq!(next[0].position.x, 0.0016, epsilon = 1e-7);
    assert_relative_eq!(next[1].velocity.x, -0.008, epsilon = 1e-7);
    assert_relative_eq!(next[1].position.x, 0.5 - 0.0016, epsilon = 1e-6);
}

#[test]
fn test_distant_particles_stay_still() {
    let mut particles = two_bodies(1.5);
    let params = StepParameters::new(Some(0.2), Some(1.0));
    for _ in 0..25 {
        let tree = QuadTree::from_particles(&particles);
        particles = simulate_step(&tree, &particles, &params);
    }
    assert_eq!(particles[0].position, Vec2::new(0.0, 0.0));
    assert_eq!(particles[1].position, Vec2::new(1.5, 0.0));
    assert_eq!(particles[0].velocity, Vec2::ZERO);
}

#[test]
fn test_step_matches_all_pairs_reference() {
    let particles = generate_scene(SceneKind::Random, 400, 20.0, 17);
    let params = StepParameters::for_space_size(20.0);
    let tree = QuadTree::from_particles(&particles);
    let next = simulate_step(&tree, &particles, &params);

    for (i, target) in particles.iter().enumerate() {
        let force = particles
            .iter()
            .fold(Vec2::ZERO, |acc, source| acc + compute_force(target, source, params.cull_radius));
        let expected = update_particle(target, force, params.delta_time);
        assert_eq!(next[i].id, expected.id);
        assert_relative_eq!(next[i].velocity.x, expected.velocity.x, epsilon = 1e-4);
        assert_relative_eq!(next[i].velocity.y, expected.velocity.y, epsilon = 1e-4);
        assert_relative_eq!(next[i].position.x, expected.position.x, epsilon = 1e-4);
        assert_relative_eq!(next[i].position.y, expected.position.y, epsilon = 1e-4);
    }
}

#[test]
fn test_input_is_not_modified() {
    let particles = two_bodies(0.5);
    let snapshot = particles.clone();
    let tree = QuadTree::from_particles(&particles);
    let _ = simulate_step(&tree, &particles, &StepParameters::default());
    assert_eq!(particles, snapshot);
}

//! The per-particle work of one iteration: radius queries, force accumulation and
//! integration.
//!
//! Both phases read the current particle records and produce new values; nothing is updated
//! in place, so a particle's next state never leaks into another particle's force
//! computation. With the `parallel` feature (enabled by default) particles are processed
//! with Rayon.
//!
//! # Example
//!
//! ```
//! use rs_nbody::models::Vec2;
//! use rs_nbody::particles::{simulate_step, Particle};
//! use rs_nbody::spatial::QuadTree;
//! use rs_nbody::utils::StepParameters;
//!
//! let particles = vec![
//!     Particle::new(0, 1.0, Vec2::new(0.0, 0.0), Vec2::ZERO),
//!     Particle::new(1, 1.0, Vec2::new(0.5, 0.0), Vec2::ZERO),
//! ];
//! let tree = QuadTree::from_particles(&particles);
//! let next = simulate_step(&tree, &particles, &StepParameters::default());
//!
//! // The two particles attract each other.
//! assert!(next[0].position.x > 0.0);
//! assert!(next[1].position.x < 0.5);
//! ```
use glam::Vec2;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use crate::forces::net_force;
use crate::particles::{update_particle, Particle};
use crate::spatial::QuadTree;
use crate::utils::StepParameters;

/// Net force on one particle, with the number of neighbour candidates its radius query
/// returned. The count is the cost signal used for load balancing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceSample {
    pub force: Vec2,
    pub interactions: u32,
}

/// Net force on one particle from every particle of `tree` within `cull_radius`.
pub fn force_on(tree: &QuadTree, target: &Particle, cull_radius: f32, scratch: &mut Vec<Particle>) -> ForceSample {
    tree.query(target.position, cull_radius, scratch);
    ForceSample {
        force: net_force(target, scratch.iter(), cull_radius),
        interactions: scratch.len() as u32,
    }
}

/// Computes the net force on each of `targets`. The result is parallel to `targets`.
///
/// `tree` must contain every particle that can interact with a target, i.e. the targets
/// themselves and all their neighbours within `cull_radius`.
pub fn accumulate_forces(tree: &QuadTree, targets: &[Particle], cull_radius: f32) -> Vec<ForceSample> {
    #[cfg(feature = "parallel")]
    {
        targets
            .par_iter()
            .map_init(Vec::new, |scratch, target| force_on(tree, target, cull_radius, scratch))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        let mut scratch = Vec::new();
        targets
            .iter()
            .map(|target| force_on(tree, target, cull_radius, &mut scratch))
            .collect()
    }
}

/// Advances each particle under its force. `forces` must be parallel to `particles`.
pub fn integrate(particles: &[Particle], forces: &[ForceSample], delta_time: f32) -> Vec<Particle> {
    debug_assert_eq!(particles.len(), forces.len());

    #[cfg(feature = "parallel")]
    {
        particles
            .par_iter()
            .zip(forces.par_iter())
            .map(|(particle, sample)| update_particle(particle, sample.force, delta_time))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        particles
            .iter()
            .zip(forces)
            .map(|(particle, sample)| update_particle(particle, sample.force, delta_time))
            .collect()
    }
}

/// Runs one full step for `particles` against `tree`: forces, then integration.
pub fn simulate_step(tree: &QuadTree, particles: &[Particle], params: &StepParameters) -> Vec<Particle> {
    let forces = accumulate_forces(tree, particles, params.cull_radius);
    integrate(particles, &forces, params.delta_time)
}

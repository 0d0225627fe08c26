use glam::Vec2;
use crate::particles::Particle;
use crate::utils::{CONTACT_DISTANCE, DECAY_START, G, MIN_INTERACTION_DISTANCE};

/// Computes the force `source` exerts on `target`.
///
/// The force is an inverse-square attraction directed from `target` towards `source` that only
/// acts inside `cull_radius`:
/// - coincident particles (closer than `1e-3`, including a particle and itself) exert no force,
/// - particles farther apart than `cull_radius` exert no force,
/// - the distance is clamped to at least `0.1` to bound the force near contact,
/// - past `0.75 * cull_radius` the force decays linearly, reaching zero at `cull_radius`.
///
/// # Examples
///
/// ```
/// use rs_nbody::forces::compute_force;
/// use rs_nbody::models::Vec2;
/// use rs_nbody::particles::Particle;
///
/// let a = Particle::new(0, 1.0, Vec2::new(0.0, 0.0), Vec2::ZERO);
/// let b = Particle::new(1, 1.0, Vec2::new(0.5, 0.0), Vec2::ZERO);
///
/// let force = compute_force(&a, &b, 1.0);
/// assert!((force.x - 0.04).abs() < 1e-6);
/// assert_eq!(force.y, 0.0);
///
/// // Outside the cull radius nothing happens.
/// assert_eq!(compute_force(&a, &b, 0.4), Vec2::ZERO);
/// ```
pub fn compute_force(target: &Particle, source: &Particle, cull_radius: f32) -> Vec2 {
    let offset = source.position - target.position;
    let dist = offset.length();
    if dist < MIN_INTERACTION_DISTANCE {
        return Vec2::ZERO;
    }
    let dir = offset * (1.0 / dist);
    if dist > cull_radius {
        return Vec2::ZERO;
    }
    let dist = dist.max(CONTACT_DISTANCE);
    let mut force = dir * target.mass * source.mass * (G / (dist * dist));
    let decay_start = cull_radius * DECAY_START;
    if dist > decay_start {
        let decay = 1.0 - (dist - decay_start) / (cull_radius * (1.0 - DECAY_START));
        force *= decay;
    }
    force
}

/// Sums the forces every particle in `sources` exerts on `target`.
///
/// `sources` is normally the result of a radius query around `target` and may contain
/// `target` itself, which contributes nothing.
pub fn net_force<'a, I>(target: &Particle, sources: I, cull_radius: f32) -> Vec2
where
    I: IntoIterator<Item = &'a Particle>,
{
    sources
        .into_iter()
        .fold(Vec2::ZERO, |acc, source| acc + compute_force(target, source, cull_radius))
}

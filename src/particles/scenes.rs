//! Reproducible initial conditions for benchmark runs.
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::particles::Particle;
use crate::utils::SimulationError;

/// Layout of a generated particle set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Uniformly spread over the whole space.
    Random,
    /// Concentrated towards the `(0, 0)` corner, leaving most of the space nearly empty.
    Corner,
    /// A few distinct sites, each shared by many coincident particles.
    Repeat,
    /// Small dense clusters separated by empty space.
    Sparse,
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SceneKind::Random => write!(f, "random"),
            SceneKind::Corner => write!(f, "corner"),
            SceneKind::Repeat => write!(f, "repeat"),
            SceneKind::Sparse => write!(f, "sparse"),
        }
    }
}

impl FromStr for SceneKind {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(SceneKind::Random),
            "corner" => Ok(SceneKind::Corner),
            "repeat" => Ok(SceneKind::Repeat),
            "sparse" => Ok(SceneKind::Sparse),
            other => Err(SimulationError::InvalidConfiguration(format!("unknown scene kind {:?}", other))),
        }
    }
}

/// Generates `count` particles inside `[0, space_size]²`.
///
/// The same `kind`, `count`, `space_size` and `seed` always produce the same particles.
///
/// # Examples
///
/// ```
/// use rs_nbody::particles::{generate_scene, SceneKind};
///
/// let particles = generate_scene(SceneKind::Random, 100, 50.0, 7);
/// assert_eq!(particles.len(), 100);
/// assert!(particles.iter().all(|p| p.position.x >= 0.0 && p.position.x <= 50.0));
/// assert_eq!(particles, generate_scene(SceneKind::Random, 100, 50.0, 7));
/// ```
pub fn generate_scene(kind: SceneKind, count: usize, space_size: f32, seed: u64) -> Vec<Particle> {
    let mut rng = StdRng::seed_from_u64(seed);
    let max_speed = space_size * 0.005;

    let sites: Vec<Vec2> = match kind {
        SceneKind::Repeat | SceneKind::Sparse => {
            let site_count = (count / 100).max(1);
            (0..site_count)
                .map(|_| Vec2::new(rng.gen_range(0.0..=space_size), rng.gen_range(0.0..=space_size)))
                .collect()
        }
        SceneKind::Random | SceneKind::Corner => Vec::new(),
    };

    (0..count)
        .map(|id| {
            let position = match kind {
                SceneKind::Random => Vec2::new(rng.gen_range(0.0..=space_size), rng.gen_range(0.0..=space_size)),
                SceneKind::Corner => {
                    let u: f32 = rng.gen_range(0.0..=1.0);
                    let v: f32 = rng.gen_range(0.0..=1.0);
                    Vec2::new(u * u * u, v * v * v) * space_size
                }
                SceneKind::Repeat => sites[id % sites.len()],
                SceneKind::Sparse => {
                    let site = sites[rng.gen_range(0..sites.len())];
                    let radius = space_size * 0.01 * rng.gen_range(0.0_f32..=1.0).sqrt();
                    let angle = rng.gen_range(0.0..2.0 * PI);
                    (site + Vec2::new(angle.cos(), angle.sin()) * radius).clamp(Vec2::ZERO, Vec2::splat(space_size))
                }
            };
            let velocity = match kind {
                SceneKind::Repeat => Vec2::ZERO,
                _ => Vec2::new(rng.gen_range(-max_speed..=max_speed), rng.gen_range(-max_speed..=max_speed)),
            };
            let mass = rng.gen_range(0.5..=2.0);
            Particle::new(id, mass, position, velocity)
        })
        .collect()
}

use glam::Vec2;

/// A point particle.
///
/// `id` is assigned when the particle list is loaded and stays the same for the whole run,
/// whichever worker currently owns the particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub id: usize,
    pub mass: f32,
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Particle {
    /// Creates a new Particle.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::models::Vec2;
    /// use rs_nbody::particles::Particle;
    ///
    /// let particle = Particle::new(7, 2.0, Vec2::new(1.0, 1.0), Vec2::ZERO);
    /// assert_eq!(particle.id, 7);
    /// assert_eq!(particle.mass, 2.0);
    /// ```
    pub fn new(id: usize, mass: f32, position: Vec2, velocity: Vec2) -> Self {
        Particle {
            id,
            mass,
            position,
            velocity,
        }
    }

    /// Distance between the positions of two particles.
    pub fn distance_to(&self, other: &Particle) -> f32 {
        (other.position - self.position).length()
    }
}

/// Advances a particle over a time step `delta_time` under `force`, using semi-implicit Euler
/// integration: the velocity is updated first and the new velocity moves the position.
///
/// The input is left untouched; `id` and `mass` are carried over to the result.
///
/// # Examples
///
/// ```
/// use rs_nbody::models::Vec2;
/// use rs_nbody::particles::{update_particle, Particle};
///
/// let particle = Particle::new(0, 1.0, Vec2::ZERO, Vec2::ZERO);
/// let next = update_particle(&particle, Vec2::new(0.04, 0.0), 0.2);
///
/// assert!((next.velocity.x - 0.008).abs() < 1e-7);
/// assert!((next.position.x - 0.0016).abs() < 1e-7);
/// assert_eq!(next.id, particle.id);
/// ```
pub fn update_particle(particle: &Particle, force: Vec2, delta_time: f32) -> Particle {
    let velocity = particle.velocity + force * (delta_time / particle.mass);
    Particle {
        velocity,
        position: particle.position + velocity * delta_time,
        ..*particle
    }
}

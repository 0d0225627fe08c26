//! Splits a particle set into per-worker strips and computes the halo each worker needs.
//!
//! Space is cut into `workers` strips across the longer axis of the particles' bounding box.
//! The outermost strips are unbounded, so every particle has exactly one owner wherever it
//! moved. A worker's halo holds every particle owned elsewhere whose coordinate along the
//! split axis is within the cull radius of its strip: the axis distance never exceeds the true
//! distance, so no interacting neighbour is missed.
use std::fmt;
use glam::Vec2;
use log::debug;
use crate::models::BoundingBox;
use crate::particles::Particle;
use crate::spatial::{QuadTree, QuadTreeConfig};
use crate::utils::SimulationError;

/// How strip boundaries are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceMode {
    /// Equal-width strips of the current bounding box.
    Static,
    /// Strips holding equal shares of the measured per-particle cost.
    Dynamic,
}

impl fmt::Display for BalanceMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BalanceMode::Static => write!(f, "static"),
            BalanceMode::Dynamic => write!(f, "dynamic"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The longer side of `bbox`, preferring x on ties.
    pub fn longest(bbox: &BoundingBox) -> Axis {
        let size = bbox.size();
        if size.y > size.x { Axis::Y } else { Axis::X }
    }

    pub fn coordinate(&self, p: Vec2) -> f32 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }
}

/// The strip `lower <= coordinate < upper` along `axis`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub axis: Axis,
    pub lower: f32,
    pub upper: f32,
}

impl Region {
    pub fn contains(&self, p: Vec2) -> bool {
        let c = self.axis.coordinate(p);
        c >= self.lower && c < self.upper
    }

    /// Distance along the axis from `p` to the strip, zero inside it.
    pub fn axis_distance(&self, p: Vec2) -> f32 {
        let c = self.axis.coordinate(p);
        (self.lower - c).max(c - self.upper).max(0.0)
    }
}

/// What one worker receives for an iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerShare {
    pub rank: usize,
    pub region: Region,
    /// Particles this worker computes and integrates.
    pub owned: Vec<Particle>,
    /// Read-only copies of nearby particles owned by other workers.
    pub halo: Vec<Particle>,
}

/// The result of decomposing a particle set.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub axis: Axis,
    /// The `workers - 1` interior strip boundaries, in non-decreasing order.
    pub cuts: Vec<f32>,
    /// One share per worker, indexed by rank.
    pub shares: Vec<WorkerShare>,
}

impl Partition {
    /// Rank owning a particle at `p`.
    pub fn owner_of(&self, p: Vec2) -> usize {
        owner(&self.cuts, self.axis.coordinate(p))
    }

    /// Largest owned count divided by the mean owned count; 1.0 is a perfect balance.
    pub fn imbalance(&self) -> f32 {
        let total: usize = self.shares.iter().map(|s| s.owned.len()).sum();
        let largest = self.shares.iter().map(|s| s.owned.len()).max().unwrap_or(0);
        if total == 0 {
            return 1.0;
        }
        largest as f32 * self.shares.len() as f32 / total as f32
    }
}

/// Assigns particles to workers, iteration after iteration.
///
/// Ownership is recomputed from the current positions every time. In
/// [`BalanceMode::Dynamic`] the decomposer remembers, per particle id, the cost measured in the
/// previous iteration and uses it to place the strip boundaries.
///
/// # Examples
///
/// ```
/// use rs_nbody::decomposition::{BalanceMode, Decomposer};
/// use rs_nbody::models::Vec2;
/// use rs_nbody::particles::Particle;
///
/// let particles: Vec<Particle> = (0..8)
///     .map(|i| Particle::new(i, 1.0, Vec2::new(i as f32, 0.0), Vec2::ZERO))
///     .collect();
/// let decomposer = Decomposer::new(2, 1.5, BalanceMode::Static).unwrap();
/// let partition = decomposer.decompose(&particles);
///
/// assert_eq!(partition.shares[0].owned.len(), 4);
/// assert_eq!(partition.shares[1].owned.len(), 4);
/// // Particles 2 and 3 lie within 1.5 of the cut at 3.5, so worker 1 sees them as halo.
/// let halo: Vec<usize> = partition.shares[1].halo.iter().map(|p| p.id).collect();
/// assert_eq!(halo, vec![2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct Decomposer {
    workers: usize,
    cull_radius: f32,
    mode: BalanceMode,
    costs: Vec<Option<u32>>,
}

impl Decomposer {
    pub fn new(workers: usize, cull_radius: f32, mode: BalanceMode) -> Result<Self, SimulationError> {
        if workers == 0 {
            return Err(SimulationError::InvalidConfiguration("cannot decompose for zero workers".to_string()));
        }
        if !(cull_radius >= 0.0) {
            return Err(SimulationError::InvalidConfiguration(format!("cull radius must be non-negative, got {}", cull_radius)));
        }
        Ok(Self {
            workers,
            cull_radius,
            mode,
            costs: Vec::new(),
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn mode(&self) -> BalanceMode {
        self.mode
    }

    /// Remembers the measured cost of particles, as `(id, interactions)` pairs. Only used in
    /// dynamic mode.
    pub fn record_costs<I>(&mut self, costs: I)
    where
        I: IntoIterator<Item = (usize, u32)>,
    {
        for (id, interactions) in costs {
            if id >= self.costs.len() {
                self.costs.resize(id + 1, None);
            }
            self.costs[id] = Some(interactions);
        }
    }

    /// Last measured cost of particle `id`, if any.
    pub fn cost_of(&self, id: usize) -> Option<u32> {
        self.costs.get(id).copied().flatten()
    }

    /// Splits `particles` into one owned set and one halo set per worker.
    ///
    /// The owned sets are disjoint and together hold every particle, in input order.
    pub fn decompose(&self, particles: &[Particle]) -> Partition {
        let bbox = BoundingBox::enclosing(particles.iter().map(|p| p.position));
        let axis = Axis::longest(&bbox);
        let cuts = match self.mode {
            BalanceMode::Static => self.uniform_cuts(&bbox, axis),
            BalanceMode::Dynamic => self.weighted_cuts(particles, axis),
        };

        let mut shares: Vec<WorkerShare> = (0..self.workers)
            .map(|rank| WorkerShare {
                rank,
                region: Region {
                    axis,
                    lower: if rank == 0 { f32::NEG_INFINITY } else { cuts[rank - 1] },
                    upper: if rank + 1 == self.workers { f32::INFINITY } else { cuts[rank] },
                },
                owned: Vec::new(),
                halo: Vec::new(),
            })
            .collect();

        for p in particles {
            let c = axis.coordinate(p.position);
            let rank = owner(&cuts, c);
            shares[rank].owned.push(*p);

            // Workers whose strip, grown by the cull radius, reaches this particle.
            let first = cuts.partition_point(|&cut| cut < c - self.cull_radius);
            let last = cuts.partition_point(|&cut| cut <= c + self.cull_radius);
            for other in first..=last {
                if other != rank {
                    shares[other].halo.push(*p);
                }
            }
        }

        let partition = Partition { axis, cuts, shares };
        debug!(
            "Decomposed {} particles for {} workers ({} mode, axis {:?}, imbalance {:.3})",
            particles.len(),
            self.workers,
            self.mode,
            axis,
            partition.imbalance()
        );
        partition
    }

    fn uniform_cuts(&self, bbox: &BoundingBox, axis: Axis) -> Vec<f32> {
        let lower = axis.coordinate(bbox.min);
        let width = axis.coordinate(bbox.max) - lower;
        (1..self.workers)
            .map(|k| lower + width * k as f32 / self.workers as f32)
            .collect()
    }

    /// Cuts at the weighted quantiles of the particle coordinates.
    fn weighted_cuts(&self, particles: &[Particle], axis: Axis) -> Vec<f32> {
        let estimates = if self.costs.is_empty() {
            Some(estimate_costs(particles, self.cull_radius))
        } else {
            None
        };

        let mut order: Vec<(f32, f64)> = particles
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let cost = match &estimates {
                    Some(estimates) => estimates[i],
                    None => self.cost_of(p.id).unwrap_or(0),
                };
                (axis.coordinate(p.position), 1.0 + f64::from(cost))
            })
            .collect();
        order.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total: f64 = order.iter().map(|(_, w)| w).sum();
        let mut cuts = Vec::with_capacity(self.workers - 1);
        let mut before = 0.0;
        let mut k = 1;
        for &(c, w) in &order {
            while k < self.workers && before >= total * k as f64 / self.workers as f64 {
                cuts.push(c);
                k += 1;
            }
            before += w;
        }
        while cuts.len() < self.workers - 1 {
            cuts.push(f32::INFINITY);
        }
        cuts
    }
}

/// Rank owning coordinate `c`: the number of cuts at or below it.
fn owner(cuts: &[f32], c: f32) -> usize {
    cuts.partition_point(|&cut| cut <= c)
}

/// Estimates how many neighbours each particle will interact with, from the particle density
/// of its leaf in a coarse quad-tree. Used before any cost has been measured.
pub fn estimate_costs(particles: &[Particle], cull_radius: f32) -> Vec<u32> {
    let config = QuadTreeConfig { leaf_capacity: 64, max_depth: 10 };
    let tree = QuadTree::build_with(
        particles,
        BoundingBox::enclosing(particles.iter().map(|p| p.position)),
        config,
    );
    let interaction_area = std::f32::consts::PI * cull_radius * cull_radius;

    let mut by_id: Vec<(usize, u32)> = Vec::with_capacity(particles.len());
    for (bbox, leaf) in tree.leaves() {
        let size = bbox.size();
        let area = size.x * size.y;
        let count = leaf.len() as f32;
        let estimate = if area > 0.0 {
            (count * interaction_area / area).min(particles.len() as f32)
        } else {
            count
        };
        by_id.extend(leaf.iter().map(|p| (p.id, estimate.round() as u32)));
    }

    // Leaves are visited in tree order; map the estimates back to input order.
    by_id.sort_unstable_by_key(|&(id, _)| id);
    particles
        .iter()
        .map(|p| {
            by_id
                .binary_search_by_key(&p.id, |&(id, _)| id)
                .map(|i| by_id[i].1)
                .unwrap_or(0)
        })
        .collect()
}

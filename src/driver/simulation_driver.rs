//! Per-iteration orchestration of a distributed run.
//!
//! Every worker runs a [`SimulationDriver`] over its own [`Transport`] endpoint. Worker 0 is
//! the root: it holds the authoritative particle set between iterations, decomposes it,
//! hands each worker its owned and halo particles, and collects the integrated particles at
//! the end of the iteration. Each iteration walks the phases
//! `Decomposing → Exchanging → TreeBuilding → ForceComputing → Integrating`; the first error
//! aborts the run.
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};
use log::{debug, info};
use crate::decomposition::{BalanceMode, Decomposer, WorkerShare};
use crate::models::BoundingBox;
use crate::particles::{accumulate_forces, integrate, load_from_file, save_to_file, Particle};
use crate::spatial::{QuadTree, QuadTreeConfig};
use crate::transport::{run_local, Transport};
use crate::utils::{SimulationError, StartupOptions, StepParameters};

/// Rank that loads, decomposes and saves the particle set.
pub const ROOT: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Decomposing,
    Exchanging,
    TreeBuilding,
    ForceComputing,
    Integrating,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Decomposing => "decomposing",
            Phase::Exchanging => "exchanging",
            Phase::TreeBuilding => "tree building",
            Phase::ForceComputing => "force computing",
            Phase::Integrating => "integrating",
            Phase::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// An integrated particle and the number of neighbour candidates its force query returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleUpdate {
    pub particle: Particle,
    pub interactions: u32,
}

/// Messages exchanged between drivers.
#[derive(Debug, Clone, PartialEq)]
pub enum Exchange {
    /// Root to worker: the particles to simulate for one iteration.
    Share(WorkerShare),
    /// Worker to root: the worker's owned particles after integration.
    Updates(Vec<ParticleUpdate>),
}

/// Result of a full run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Final particle set, ordered by id. Only the root has it.
    pub particles: Option<Vec<Particle>>,
    /// Wall-clock time between the barriers bracketing the iterations.
    pub elapsed: Duration,
}

pub struct SimulationDriver<T> {
    transport: T,
    params: StepParameters,
    tree_config: QuadTreeConfig,
    decomposer: Option<Decomposer>,
    phase: Phase,
    iteration: usize,
}

impl<T: Transport<Exchange>> SimulationDriver<T> {
    pub fn new(transport: T, params: StepParameters, mode: BalanceMode) -> Result<Self, SimulationError> {
        let decomposer = if transport.rank() == ROOT {
            Some(Decomposer::new(transport.size(), params.cull_radius, mode)?)
        } else {
            None
        };
        Ok(Self {
            transport,
            params,
            tree_config: QuadTreeConfig::default(),
            decomposer,
            phase: Phase::Idle,
            iteration: 0,
        })
    }

    /// Replaces the subdivision policy of the per-iteration quad-trees.
    pub fn with_tree_config(mut self, tree_config: QuadTreeConfig) -> Self {
        self.tree_config = tree_config;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of completed iterations.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    fn enter(&mut self, phase: Phase) {
        debug!("Worker {} iteration {}: {}", self.transport.rank(), self.iteration, phase);
        self.phase = phase;
    }

    /// Runs `iterations` iterations. `particles` is the initial set on the root and ignored
    /// elsewhere.
    pub fn run(&mut self, particles: Vec<Particle>, iterations: usize) -> Result<RunOutcome, SimulationError> {
        let mut particles = if self.transport.rank() == ROOT { particles } else { Vec::new() };

        self.transport.barrier()?;
        let start = Instant::now();
        for _ in 0..iterations {
            if let Some(next) = self.step(particles)? {
                particles = next;
            } else {
                particles = Vec::new();
            }
        }
        self.transport.barrier()?;
        let elapsed = start.elapsed();
        self.enter(Phase::Done);

        Ok(RunOutcome {
            particles: (self.transport.rank() == ROOT).then_some(particles),
            elapsed,
        })
    }

    /// Runs one iteration. The root passes the current particle set and gets the next one;
    /// other workers pass an empty set and get `None`.
    pub fn step(&mut self, particles: Vec<Particle>) -> Result<Option<Vec<Particle>>, SimulationError> {
        self.enter(Phase::Decomposing);
        let expected = particles.len();
        let shares = self.decomposer.as_ref().map(|decomposer| {
            decomposer
                .decompose(&particles)
                .shares
                .into_iter()
                .map(Exchange::Share)
                .collect::<Vec<_>>()
        });
        drop(particles);

        self.enter(Phase::Exchanging);
        let share = match self.transport.scatter(ROOT, shares)? {
            Exchange::Share(share) => share,
            Exchange::Updates(_) => {
                return Err(SimulationError::Transport(format!(
                    "worker {} expected its share but received updates",
                    self.transport.rank()
                )))
            }
        };

        self.enter(Phase::TreeBuilding);
        let local: Vec<Particle> = share.owned.iter().chain(&share.halo).copied().collect();
        let bbox = BoundingBox::enclosing(local.iter().map(|p| p.position));
        let tree = QuadTree::build_with(&local, bbox, self.tree_config);
        debug!(
            "Worker {} built a tree of depth {} over {} owned and {} halo particles",
            self.transport.rank(),
            tree.depth(),
            share.owned.len(),
            share.halo.len()
        );

        self.enter(Phase::ForceComputing);
        let forces = accumulate_forces(&tree, &share.owned, self.params.cull_radius);
        drop(tree);

        self.enter(Phase::Integrating);
        let updated = integrate(&share.owned, &forces, self.params.delta_time);
        let updates: Vec<ParticleUpdate> = updated
            .into_iter()
            .zip(&forces)
            .map(|(particle, sample)| ParticleUpdate { particle, interactions: sample.interactions })
            .collect();

        let gathered = self.transport.gather(ROOT, Exchange::Updates(updates))?;
        self.iteration += 1;

        match gathered {
            Some(parts) => self.reassemble(parts, expected).map(Some),
            None => Ok(None),
        }
    }

    /// Merges the workers' updates into the next authoritative set, ordered by id.
    fn reassemble(&mut self, parts: Vec<Exchange>, expected: usize) -> Result<Vec<Particle>, SimulationError> {
        let mut updates = Vec::with_capacity(expected);
        for (rank, part) in parts.into_iter().enumerate() {
            match part {
                Exchange::Updates(part) => updates.extend(part),
                Exchange::Share(_) => {
                    return Err(SimulationError::Transport(format!("worker {} sent a share instead of updates", rank)))
                }
            }
        }
        if updates.len() != expected {
            return Err(SimulationError::Transport(format!(
                "{} particles came back from the workers, expected {}",
                updates.len(),
                expected
            )));
        }
        updates.sort_unstable_by_key(|u| u.particle.id);

        if let Some(decomposer) = self.decomposer.as_mut() {
            if decomposer.mode() == BalanceMode::Dynamic {
                decomposer.record_costs(updates.iter().map(|u| (u.particle.id, u.interactions)));
            }
        }
        Ok(updates.into_iter().map(|u| u.particle).collect())
    }
}

/// Loads the input, runs the configured number of iterations on `options.workers` worker
/// threads and saves the result. Returns the simulation time measured by the root.
///
/// Only the root touches the files. The output directory is checked before the run so that
/// an unwritable destination fails before any work is done.
pub fn run_simulation(options: &StartupOptions) -> Result<Duration, SimulationError> {
    options.validate()?;
    if let Some(parent) = options.output_file.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(SimulationError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("output directory {} does not exist", parent.display()),
            )));
        }
    }

    let params = options.step_parameters();
    let mode = if options.load_balance { BalanceMode::Dynamic } else { BalanceMode::Static };
    info!(
        "Running {} iterations on {} workers ({} balancing, cull radius {}, time step {})",
        options.num_iterations, options.workers, mode, params.cull_radius, params.delta_time
    );

    let outcomes = run_local(options.workers, |transport| {
        let rank = transport.rank();
        let particles = if rank == ROOT { load_from_file(&options.input_file)? } else { Vec::new() };
        let mut driver = SimulationDriver::new(transport, params, mode)?;
        let outcome = driver.run(particles, options.num_iterations)?;
        if let Some(particles) = &outcome.particles {
            save_output(&options.output_file, particles)?;
        }
        Ok(outcome.elapsed)
    })?;

    Ok(outcomes.get(ROOT).copied().unwrap_or_default())
}

fn save_output(path: &Path, particles: &[Particle]) -> Result<(), SimulationError> {
    save_to_file(path, particles)?;
    info!("Wrote {} particles to {}", particles.len(), path.display());
    Ok(())
}

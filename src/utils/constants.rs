/// Gravitational constant of the short-range attraction.
pub const G: f32 = 0.01;

/// Pairs closer than this are treated as coincident and exert no force.
pub const MIN_INTERACTION_DISTANCE: f32 = 1e-3;

/// Distances are clamped to at least this value before computing the force magnitude.
pub const CONTACT_DISTANCE: f32 = 1e-1;

/// Fraction of the cull radius after which the force decays linearly to zero.
pub const DECAY_START: f32 = 0.75;

/// Default maximum number of particles a quad-tree leaf holds before it is split.
pub const DEFAULT_LEAF_CAPACITY: usize = 4;

/// Default recursion limit of quad-tree construction.
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Default time step of one iteration.
pub const DEFAULT_DELTA_TIME: f32 = 0.2;

/// Default cull radius when no space size is given.
pub const DEFAULT_CULL_RADIUS: f32 = 1.0;

/// Significant digits used when writing particle files.
pub const OUTPUT_SIGNIFICANT_DIGITS: usize = 9;

// src/utils/constants_config.rs
use std::path::PathBuf;
use crate::utils::{
    DEFAULT_CULL_RADIUS,
    DEFAULT_DELTA_TIME,
    errors::SimulationError
};

/// Parameters shared by every iteration of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepParameters {
    pub delta_time: f32,
    pub cull_radius: f32,
}

impl Default for StepParameters {
    fn default() -> Self {
        Self {
            delta_time: DEFAULT_DELTA_TIME,
            cull_radius: DEFAULT_CULL_RADIUS,
        }
    }
}

impl StepParameters {
    pub fn new(delta_time: Option<f32>, cull_radius: Option<f32>) -> Self {
        let default = Self::default();
        Self {
            delta_time: delta_time.unwrap_or(default.delta_time),
            cull_radius: cull_radius.unwrap_or(default.cull_radius),
        }
    }

    /// Benchmark parameters for a scene of the given size: the cull radius is a quarter of the
    /// space size and the time step is fixed.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::utils::StepParameters;
    ///
    /// let params = StepParameters::for_space_size(500.0);
    /// assert_eq!(params.cull_radius, 125.0);
    /// assert_eq!(params.delta_time, 0.2);
    /// ```
    pub fn for_space_size(space_size: f32) -> Self {
        Self::new(None, Some(space_size / 4.0))
    }
}

/// Options a simulation run is started with.
#[derive(Debug, Clone, PartialEq)]
pub struct StartupOptions {
    pub num_iterations: usize,
    pub space_size: f32,
    pub load_balance: bool,
    pub workers: usize,
    pub input_file: PathBuf,
    pub output_file: PathBuf,
}

impl Default for StartupOptions {
    fn default() -> Self {
        Self {
            num_iterations: 1,
            space_size: 10.0,
            load_balance: false,
            workers: 1,
            input_file: PathBuf::new(),
            output_file: PathBuf::new(),
        }
    }
}

impl StartupOptions {
    /// Checks that the options describe a run that can be executed.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.workers == 0 {
            return Err(SimulationError::InvalidConfiguration("at least one worker is required".to_string()));
        }
        if !(self.space_size > 0.0) || !self.space_size.is_finite() {
            return Err(SimulationError::InvalidConfiguration(format!("space size must be positive, got {}", self.space_size)));
        }
        if self.input_file.as_os_str().is_empty() {
            return Err(SimulationError::InvalidConfiguration("no input file given".to_string()));
        }
        if self.output_file.as_os_str().is_empty() {
            return Err(SimulationError::InvalidConfiguration("no output file given".to_string()));
        }
        Ok(())
    }

    pub fn step_parameters(&self) -> StepParameters {
        StepParameters::for_space_size(self.space_size)
    }
}

use std::fmt;
use std::error::Error;

/// Represents errors that can abort a simulation run.
#[derive(Debug)]
pub enum SimulationError {
    /// An input or output file could not be opened, read or written.
    Io(std::io::Error),
    /// A particle record could not be parsed.
    Parse {
        /// 1-based line number in the particle file.
        line: usize,
        /// Name of the offending field (`mass`, `posX`, ...), or `record` for a wrong field count.
        field: &'static str,
        /// The raw text that failed to parse.
        value: String,
    },
    /// A message could not be delivered to, or received from, another worker.
    Transport(String),
    /// The startup options describe a run that cannot be executed.
    InvalidConfiguration(String),
    /// Two particle lists differ by more than the allowed tolerance.
    Mismatch {
        /// 1-based line number of the first differing record.
        line: usize,
        /// Description of the difference.
        reason: String,
    },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimulationError::Io(err) => write!(f, "I/O error: {}", err),
            SimulationError::Parse { line, field, value } => {
                write!(f, "Parse error at line {}: invalid {} value {:?}", line, field, value)
            }
            SimulationError::Transport(msg) => write!(f, "Transport error: {}", msg),
            SimulationError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            SimulationError::Mismatch { line, reason } => {
                write!(f, "Mismatch at line {}: {}", line, reason)
            }
        }
    }
}

impl Error for SimulationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SimulationError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimulationError {
    fn from(err: std::io::Error) -> Self {
        SimulationError::Io(err)
    }
}

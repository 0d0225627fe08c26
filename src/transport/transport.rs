use crate::utils::SimulationError;

/// Message passing between the workers of a fixed-size group.
///
/// Every operation blocks until it has completed locally, and messages between a given pair
/// of workers are delivered in the order they were sent. Collective operations (`barrier`,
/// `scatter`, `gather`) must be entered by every worker of the group in the same order.
///
/// Implementations only provide the point-to-point primitives and `barrier`; `scatter` and
/// `gather` are built on top of them.
pub trait Transport<M: Send> {
    /// Index of this worker, in `0..size()`.
    fn rank(&self) -> usize;

    /// Number of workers in the group.
    fn size(&self) -> usize;

    /// Sends `message` to worker `to`.
    fn send(&self, to: usize, message: M) -> Result<(), SimulationError>;

    /// Blocks until the next message from worker `from` arrives.
    fn receive(&self, from: usize) -> Result<M, SimulationError>;

    /// Blocks until every worker of the group has called `barrier`.
    fn barrier(&self) -> Result<(), SimulationError>;

    /// Distributes one message to every worker.
    ///
    /// `root` passes `Some(parts)` with exactly `size()` messages, `parts[r]` being delivered
    /// to worker `r`; the other workers pass `None`. Every worker returns its own part.
    fn scatter(&self, root: usize, parts: Option<Vec<M>>) -> Result<M, SimulationError> {
        if self.rank() != root {
            return self.receive(root);
        }
        let parts = parts.ok_or_else(|| SimulationError::Transport("scatter root supplied no parts".to_string()))?;
        if parts.len() != self.size() {
            return Err(SimulationError::Transport(format!(
                "scatter needs {} parts, got {}",
                self.size(),
                parts.len()
            )));
        }
        let mut own = None;
        for (rank, part) in parts.into_iter().enumerate() {
            if rank == root {
                own = Some(part);
            } else {
                self.send(rank, part)?;
            }
        }
        own.ok_or_else(|| SimulationError::Transport("scatter root has no part".to_string()))
    }

    /// Collects one message from every worker on `root`.
    ///
    /// `root` gets `Some(parts)` ordered by rank; the other workers get `None`.
    fn gather(&self, root: usize, part: M) -> Result<Option<Vec<M>>, SimulationError> {
        if self.rank() != root {
            self.send(root, part)?;
            return Ok(None);
        }
        let mut parts = Vec::with_capacity(self.size());
        for rank in 0..root {
            parts.push(self.receive(rank)?);
        }
        parts.push(part);
        for rank in root + 1..self.size() {
            parts.push(self.receive(rank)?);
        }
        Ok(Some(parts))
    }
}

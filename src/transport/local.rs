//! A [`Transport`] joining worker threads of the current process with channels.
//!
//! Each ordered pair of workers gets its own channel, which gives in-order delivery per pair.
//! Workers share nothing but the messages they exchange. When a worker stops, its channel
//! ends are dropped and every peer waiting on it gets a transport error instead of blocking
//! forever.
use std::thread;
use flume::{Receiver, Sender};
use log::{debug, error};
use crate::transport::Transport;
use crate::utils::SimulationError;

enum Envelope<M> {
    Barrier,
    Message(M),
}

/// One worker's endpoint of a channel-connected group.
pub struct LocalTransport<M> {
    rank: usize,
    senders: Vec<Sender<Envelope<M>>>,
    receivers: Vec<Receiver<Envelope<M>>>,
}

impl<M: Send> LocalTransport<M> {
    /// Creates the endpoints of a fully connected group of `size` workers. Endpoint `r` has
    /// rank `r`.
    pub fn group(size: usize) -> Vec<LocalTransport<M>> {
        let mut senders: Vec<Vec<Sender<Envelope<M>>>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut receivers: Vec<Vec<Receiver<Envelope<M>>>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
        for from in 0..size {
            for to in 0..size {
                let (tx, rx) = flume::unbounded();
                senders[from].push(tx);
                // receivers[to] is filled in `from` order, so receivers[to][from] is this channel.
                receivers[to].push(rx);
            }
        }
        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (senders, receivers))| LocalTransport { rank, senders, receivers })
            .collect()
    }

    fn post(&self, to: usize, envelope: Envelope<M>) -> Result<(), SimulationError> {
        let sender = self.senders.get(to).ok_or_else(|| {
            SimulationError::Transport(format!("worker {} sent to unknown worker {}", self.rank, to))
        })?;
        sender
            .send(envelope)
            .map_err(|_| SimulationError::Transport(format!("worker {} is gone, worker {} cannot send to it", to, self.rank)))
    }

    fn take(&self, from: usize) -> Result<Envelope<M>, SimulationError> {
        let receiver = self.receivers.get(from).ok_or_else(|| {
            SimulationError::Transport(format!("worker {} received from unknown worker {}", self.rank, from))
        })?;
        receiver
            .recv()
            .map_err(|_| SimulationError::Transport(format!("worker {} is gone, worker {} cannot receive from it", from, self.rank)))
    }
}

impl<M: Send> Transport<M> for LocalTransport<M> {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.senders.len()
    }

    fn send(&self, to: usize, message: M) -> Result<(), SimulationError> {
        self.post(to, Envelope::Message(message))
    }

    fn receive(&self, from: usize) -> Result<M, SimulationError> {
        match self.take(from)? {
            Envelope::Message(message) => Ok(message),
            Envelope::Barrier => Err(SimulationError::Transport(format!(
                "worker {} expected a message from worker {} but got a barrier",
                self.rank, from
            ))),
        }
    }

    fn barrier(&self) -> Result<(), SimulationError> {
        let expect_barrier = |from: usize| match self.take(from)? {
            Envelope::Barrier => Ok(()),
            Envelope::Message(_) => Err(SimulationError::Transport(format!(
                "worker {} expected a barrier from worker {} but got a message",
                self.rank, from
            ))),
        };

        // Everyone checks in with worker 0, which releases them once all have arrived.
        if self.rank == 0 {
            for rank in 1..self.size() {
                expect_barrier(rank)?;
            }
            for rank in 1..self.size() {
                self.post(rank, Envelope::Barrier)?;
            }
        } else {
            self.post(0, Envelope::Barrier)?;
            expect_barrier(0)?;
        }
        Ok(())
    }
}

/// Runs `worker` on `size` threads connected by [`LocalTransport`] and collects the results in
/// rank order.
///
/// If any worker fails, the run fails. Workers blocked on a failed peer fail with a transport
/// error, so the error returned is the first one that is not a transport error when there is
/// one: the cause rather than its echo.
///
/// # Examples
///
/// ```
/// use rs_nbody::transport::{run_local, Transport};
///
/// let sums = run_local(3, |transport| {
///     let gathered = transport.gather(0, transport.rank() * 10)?;
///     Ok(gathered.map(|parts| parts.iter().sum::<usize>()))
/// }).unwrap();
///
/// assert_eq!(sums, vec![Some(30), None, None]);
/// ```
pub fn run_local<M, R, F>(size: usize, worker: F) -> Result<Vec<R>, SimulationError>
where
    M: Send,
    R: Send,
    F: Fn(LocalTransport<M>) -> Result<R, SimulationError> + Sync,
{
    if size == 0 {
        return Err(SimulationError::InvalidConfiguration("a worker group needs at least one worker".to_string()));
    }

    let outcomes: Vec<Result<R, SimulationError>> = thread::scope(|scope| {
        let handles: Vec<_> = LocalTransport::group(size)
            .into_iter()
            .map(|transport| {
                let worker = &worker;
                let rank = transport.rank;
                let handle = scope.spawn(move || worker(transport));
                (rank, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(rank, handle)| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(SimulationError::Transport(format!("worker {} panicked", rank))))
            })
            .collect()
    });

    let mut results = Vec::with_capacity(size);
    let mut first_error: Option<SimulationError> = None;
    for (rank, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(result) => results.push(result),
            Err(err) => {
                error!("Worker {} failed: {}", rank, err);
                let replace = match &first_error {
                    None => true,
                    Some(SimulationError::Transport(_)) => !matches!(err, SimulationError::Transport(_)),
                    Some(_) => false,
                };
                if replace {
                    first_error = Some(err);
                }
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => {
            debug!("All {} workers finished", size);
            Ok(results)
        }
    }
}

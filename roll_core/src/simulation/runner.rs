//! SimulationRunner - A worker thread driven through message channels

use super::{run_to_completion, CancellationToken, RunOutcome, SimulationConfig, SimulationError, SimulationResult};
use crate::config::GameData;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Inbound messages
#[derive(Debug, Clone)]
pub enum RunnerCommand {
    Start(Box<SimulationConfig>),
    Stop,
    Shutdown,
}

/// Outbound messages
///
/// Progress is non-decreasing within a run. `Result` is the last message of
/// a completed run and is never sent for a cancelled or failed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunnerEvent {
    Progress { completed: u64, total: u64 },
    Result { result: Box<SimulationResult> },
    Error { message: String },
}

/// Lifecycle of the most recent run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl RunnerState {
    /// A new run may be started from this state
    pub fn is_finished(&self) -> bool {
        !matches!(self, RunnerState::Running)
    }
}

type SharedState = Arc<Mutex<RunnerState>>;

fn read_state(state: &SharedState) -> RunnerState {
    match state.lock() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Move to `Running` unless already there; returns the state replaced
fn claim(state: &SharedState) -> Option<RunnerState> {
    let mut guard = match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if *guard == RunnerState::Running {
        return None;
    }
    Some(std::mem::replace(&mut *guard, RunnerState::Running))
}

fn write_state(state: &SharedState, value: RunnerState) {
    match state.lock() {
        Ok(mut guard) => *guard = value,
        Err(poisoned) => *poisoned.into_inner() = value,
    }
}

/// Owner's handle to one simulation worker
///
/// Each runner has its own thread, channels and cancellation, so several
/// can run side by side over the same shared [`GameData`].
pub struct SimulationRunner {
    commands: Sender<RunnerCommand>,
    events: Receiver<RunnerEvent>,
    state: SharedState,
    handle: Option<JoinHandle<()>>,
}

impl SimulationRunner {
    /// Spawn an idle worker
    pub fn spawn(data: Arc<GameData>) -> Self {
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let state = Arc::new(Mutex::new(RunnerState::Idle));

        let worker_state = Arc::clone(&state);
        let handle = thread::spawn(move || {
            Worker {
                data,
                commands: command_rx,
                events: event_tx,
                state: worker_state,
            }
            .run()
        });

        SimulationRunner {
            commands: command_tx,
            events: event_rx,
            state,
            handle: Some(handle),
        }
    }

    /// Request a run
    ///
    /// Invalid configs and starts while a run is in progress are rejected
    /// here without reaching the worker. The runner reads as `Running` from
    /// the moment this returns `Ok`.
    pub fn start(&self, config: SimulationConfig) -> Result<(), SimulationError> {
        if let Err(e) = config.validate() {
            tracing::warn!(error = %e, "simulation rejected");
            return Err(e);
        }
        let previous = claim(&self.state).ok_or_else(|| {
            tracing::warn!("simulation rejected: already running");
            SimulationError::AlreadyRunning
        })?;
        if let Err(e) = self.send(RunnerCommand::Start(Box::new(config))) {
            write_state(&self.state, previous);
            return Err(e);
        }
        Ok(())
    }

    /// Ask the current run to stop at its next batch boundary
    ///
    /// No-op when nothing is running.
    pub fn stop(&self) {
        // a dead worker has nothing left to stop
        let _ = self.commands.send(RunnerCommand::Stop);
    }

    pub fn state(&self) -> RunnerState {
        read_state(&self.state)
    }

    pub fn try_next_event(&self) -> Option<RunnerEvent> {
        self.events.try_recv().ok()
    }

    /// Block until the next event; `None` once the worker has exited
    pub fn next_event(&self) -> Option<RunnerEvent> {
        self.events.recv().ok()
    }

    pub fn next_event_timeout(&self, timeout: Duration) -> Option<RunnerEvent> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Stop any run and join the worker thread
    pub fn shutdown(mut self) {
        self.join();
    }

    fn send(&self, command: RunnerCommand) -> Result<(), SimulationError> {
        self.commands
            .send(command)
            .map_err(|_| SimulationError::Failed("simulation worker has exited".to_string()))
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.commands.send(RunnerCommand::Shutdown);
            if handle.join().is_err() {
                tracing::warn!("simulation worker panicked");
            }
        }
    }
}

impl Drop for SimulationRunner {
    fn drop(&mut self) {
        self.join();
    }
}

/// Thread side of a runner; ends every run it picks up with a final state
struct Worker {
    data: Arc<GameData>,
    commands: Receiver<RunnerCommand>,
    events: Sender<RunnerEvent>,
    state: SharedState,
}

impl Worker {
    fn run(self) {
        while let Ok(command) = self.commands.recv() {
            match command {
                RunnerCommand::Start(config) => {
                    if self.simulate(&config) {
                        break;
                    }
                }
                RunnerCommand::Stop => {}
                RunnerCommand::Shutdown => break,
            }
        }
    }

    fn emit(&self, event: RunnerEvent) {
        // the owner may already be gone
        let _ = self.events.send(event);
    }

    /// Execute one run; returns true when shutdown was requested meanwhile
    fn simulate(&self, config: &SimulationConfig) -> bool {
        // start() already moved the shared state to Running
        if let Err(e) = config.validate() {
            self.fail(e);
            return false;
        }

        let cancel = CancellationToken::new();
        let mut shutdown = false;
        // fresh seed per run so back-to-back runs are uncorrelated
        let mut rng = ChaCha8Rng::from_entropy();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            run_to_completion(&self.data, config, &mut rng, &cancel, |progress| {
                self.emit(RunnerEvent::Progress {
                    completed: progress.completed,
                    total: progress.total,
                });
                for command in self.commands.try_iter() {
                    match command {
                        RunnerCommand::Stop => cancel.cancel(),
                        RunnerCommand::Shutdown => {
                            cancel.cancel();
                            shutdown = true;
                        }
                        // start() refuses while Running, so nothing queues here
                        RunnerCommand::Start(_) => {
                            tracing::warn!("start ignored: already running");
                        }
                    }
                }
            })
        }));

        match outcome {
            Ok(Ok(RunOutcome::Completed(result))) => {
                write_state(&self.state, RunnerState::Completed);
                self.emit(RunnerEvent::Result { result });
            }
            Ok(Ok(RunOutcome::Cancelled { .. })) => {
                write_state(&self.state, RunnerState::Cancelled);
            }
            Ok(Err(e)) => self.fail(SimulationError::Failed(e.to_string())),
            Err(payload) => self.fail(SimulationError::Failed(panic_message(payload.as_ref()))),
        }

        shutdown
    }

    fn fail(&self, error: SimulationError) {
        tracing::warn!(error = %error, "simulation failed");
        write_state(&self.state, RunnerState::Failed);
        self.emit(RunnerEvent::Error {
            message: error.to_string(),
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

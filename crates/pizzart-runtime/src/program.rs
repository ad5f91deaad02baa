#![forbid(unsafe_code)]

//! Elm-style update loop for the storefront.
//!
//! State lives in a [`Model`]. Messages are applied one at a time by
//! [`Model::update`] on the loop thread; that is the only place state
//! changes. Side effects are described as [`Cmd`] values and executed by
//! the runtime: collaborator calls become [`Cmd::Task`]s that run on worker
//! threads and report back with a message.
//!
//! # Example
//!
//! ```ignore
//! use pizzart_runtime::program::{Cmd, Model, Program};
//!
//! struct Counter { count: i32 }
//!
//! enum Msg { Increment, Quit }
//!
//! impl Model for Counter {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Increment => { self.count += 1; Cmd::none() }
//!             Msg::Quit => Cmd::quit(),
//!         }
//!     }
//! }
//!
//! let program = Program::new(Counter { count: 0 });
//! let handle = program.handle();
//! handle.send(Msg::Increment);
//! handle.send(Msg::Quit);
//! let counter = program.run();
//! ```
//!
//! # Invariants
//!
//! 1. `update` is only ever called from the thread running [`Program::run`].
//! 2. Tasks are fire-and-forget: no retry, no cancellation. A task whose
//!    result arrives after [`Cmd::Quit`] is dropped.
//! 3. Subscriptions are reconciled after every message that reached `update`.

use std::fmt;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, debug_span, info, warn};

use crate::subscription::{Subscription, SubscriptionManager};

/// Application state and behaviour.
pub trait Model: Sized {
    /// Messages the model reacts to.
    type Message: Send + 'static;

    /// Startup commands. Called once before the first message.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Apply one message. This is the only place state changes.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Declare active subscriptions.
    ///
    /// Called after each `update()`. The runtime compares the returned set
    /// (by id) against running subscriptions and starts or stops as needed.
    fn subscriptions(&self) -> Vec<Box<dyn Subscription<Self::Message>>> {
        vec![]
    }
}

/// Side effects for the runtime to execute.
#[derive(Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Stop the loop.
    Quit,
    /// Execute commands in order, stopping early on quit.
    Batch(Vec<Cmd<M>>),
    /// Execute commands strictly in order.
    Sequence(Vec<Cmd<M>>),
    /// Feed a message straight back into `update`.
    Msg(M),
    /// Emit an informational log line.
    Log(String),
    /// Run a blocking closure on a worker thread and deliver its result.
    Task(TaskSpec, Box<dyn FnOnce() -> M + Send>),
}

impl<M: fmt::Debug> fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Quit => write!(f, "Quit"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Sequence(cmds) => f.debug_tuple("Sequence").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Log(s) => f.debug_tuple("Log").field(s).finish(),
            Self::Task(spec, _) => f.debug_struct("Task").field("spec", spec).finish(),
        }
    }
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    /// Batch of commands; collapses empty and single-element batches.
    pub fn batch(cmds: Vec<Self>) -> Self {
        Self::collapse(cmds, Self::Batch)
    }

    /// Sequence of commands; collapses empty and single-element sequences.
    pub fn sequence(cmds: Vec<Self>) -> Self {
        Self::collapse(cmds, Self::Sequence)
    }

    fn collapse(mut cmds: Vec<Self>, wrap: fn(Vec<Self>) -> Self) -> Self {
        cmds.retain(|c| !matches!(c, Self::None));
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or_default(),
            _ => wrap(cmds),
        }
    }

    /// Background task.
    pub fn task<F>(f: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::Task(TaskSpec::default(), Box::new(f))
    }

    /// Named background task; the name shows up in logs.
    pub fn task_named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::Task(TaskSpec::named(name), Box::new(f))
    }

    /// Stable name for tracing.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Quit => "Quit",
            Self::Batch(_) => "Batch",
            Self::Sequence(_) => "Sequence",
            Self::Msg(_) => "Msg",
            Self::Log(_) => "Log",
            Self::Task(..) => "Task",
        }
    }

    /// Count leaf commands of kind `Task`, recursing into batches.
    pub fn task_count(&self) -> usize {
        match self {
            Self::Task(..) => 1,
            Self::Batch(cmds) | Self::Sequence(cmds) => cmds.iter().map(Self::task_count).sum(),
            _ => 0,
        }
    }
}

/// Metadata attached to a background task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: Option<String>,
}

impl TaskSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("task")
    }
}

// ---------------------------------------------------------------------------
// Program
// ---------------------------------------------------------------------------

/// Runtime knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramConfig {
    /// How long the loop blocks waiting for a message before re-checking
    /// worker health.
    pub poll_interval: Duration,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
        }
    }
}

/// Sends messages into a running [`Program`] from any thread.
pub struct ProgramHandle<M> {
    sender: mpsc::Sender<M>,
}

impl<M> Clone for ProgramHandle<M> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<M: Send + 'static> ProgramHandle<M> {
    /// Queue a message. Returns `false` once the program has exited.
    pub fn send(&self, msg: M) -> bool {
        self.sender.send(msg).is_ok()
    }
}

/// Threaded driver for a [`Model`].
pub struct Program<M: Model> {
    model: M,
    config: ProgramConfig,
    sender: mpsc::Sender<M::Message>,
    receiver: mpsc::Receiver<M::Message>,
    subscriptions: SubscriptionManager<M::Message>,
    task_handles: Vec<JoinHandle<()>>,
    running: bool,
    updates: u64,
}

impl<M: Model> Program<M> {
    pub fn new(model: M) -> Self {
        Self::with_config(model, ProgramConfig::default())
    }

    pub fn with_config(model: M, config: ProgramConfig) -> Self {
        let (sender, receiver) = mpsc::channel();
        let subscriptions = SubscriptionManager::new(sender.clone());
        Self {
            model,
            config,
            sender,
            receiver,
            subscriptions,
            task_handles: Vec::new(),
            running: true,
            updates: 0,
        }
    }

    /// A handle for feeding messages in from outside the loop.
    pub fn handle(&self) -> ProgramHandle<M::Message> {
        ProgramHandle {
            sender: self.sender.clone(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run until the model returns [`Cmd::Quit`]; hands the model back.
    pub fn run(mut self) -> M {
        info!("program starting");
        let cmd = self.model.init();
        self.execute_cmd(cmd);
        self.reconcile_subscriptions();

        while self.running {
            match self.receiver.recv_timeout(self.config.poll_interval) {
                Ok(msg) => self.dispatch(msg),
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                // Unreachable while `self.sender` is alive; treat as shutdown.
                Err(mpsc::RecvTimeoutError::Disconnected) => self.running = false,
            }
            self.reap_finished_tasks();
        }

        self.subscriptions.stop_all();
        info!(updates = self.updates, "program stopped");
        self.model
    }

    fn dispatch(&mut self, msg: M::Message) {
        let cmd = {
            let _span = debug_span!("pizzart.program.update").entered();
            let start = Instant::now();
            let cmd = self.model.update(msg);
            debug!(
                duration_us = start.elapsed().as_micros() as u64,
                cmd_type = cmd.type_name(),
                "update applied"
            );
            cmd
        };
        self.updates += 1;
        self.execute_cmd(cmd);
        self.reconcile_subscriptions();
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => self.running = false,
            Cmd::Msg(m) => {
                self.updates += 1;
                let cmd = self.model.update(m);
                self.execute_cmd(cmd);
            }
            Cmd::Batch(cmds) | Cmd::Sequence(cmds) => {
                for c in cmds {
                    self.execute_cmd(c);
                    if !self.running {
                        break;
                    }
                }
            }
            Cmd::Log(text) => info!(target: "pizzart::app", "{text}"),
            Cmd::Task(spec, f) => {
                crate::debug_trace!("spawning task: {}", spec.label());
                let sender = self.sender.clone();
                let spawned = thread::Builder::new()
                    .name(format!("pizzart-{}", spec.label()))
                    .spawn(move || {
                        let msg = f();
                        let _ = sender.send(msg);
                    });
                match spawned {
                    Ok(handle) => self.task_handles.push(handle),
                    Err(err) => warn!(task = spec.label(), error = %err, "failed to spawn task"),
                }
            }
        }
    }

    fn reconcile_subscriptions(&mut self) {
        let subs = self.model.subscriptions();
        let before = self.subscriptions.active_count();
        self.subscriptions.reconcile(subs);
        let after = self.subscriptions.active_count();
        if before != after {
            crate::debug_trace!("subscriptions reconciled: before={before}, after={after}");
        }
    }

    fn reap_finished_tasks(&mut self) {
        if self.task_handles.is_empty() {
            return;
        }
        let mut remaining = Vec::with_capacity(self.task_handles.len());
        for handle in self.task_handles.drain(..) {
            if !handle.is_finished() {
                remaining.push(handle);
                continue;
            }
            if let Err(payload) = handle.join() {
                let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                    (*s).to_owned()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic payload".to_owned()
                };
                tracing::error!("task panicked: {msg}");
            }
        }
        self.task_handles = remaining;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        value: i32,
    }

    #[derive(Debug)]
    enum CounterMsg {
        Increment,
        SpawnIncrement,
        Quit,
    }

    impl Model for Counter {
        type Message = CounterMsg;

        fn update(&mut self, msg: CounterMsg) -> Cmd<CounterMsg> {
            match msg {
                CounterMsg::Increment => {
                    self.value += 1;
                    if self.value >= 3 { Cmd::quit() } else { Cmd::none() }
                }
                CounterMsg::SpawnIncrement => Cmd::task(|| CounterMsg::Increment),
                CounterMsg::Quit => Cmd::quit(),
            }
        }
    }

    #[test]
    fn batch_collapses() {
        let empty: Cmd<CounterMsg> = Cmd::batch(vec![]);
        assert!(matches!(empty, Cmd::None));
        let single = Cmd::batch(vec![Cmd::<CounterMsg>::quit()]);
        assert!(matches!(single, Cmd::Quit));
        let nones = Cmd::batch(vec![Cmd::<CounterMsg>::none(), Cmd::none()]);
        assert!(matches!(nones, Cmd::None));
    }

    #[test]
    fn task_count_recurses() {
        let cmd: Cmd<CounterMsg> = Cmd::batch(vec![
            Cmd::task(|| CounterMsg::Increment),
            Cmd::sequence(vec![Cmd::task(|| CounterMsg::Quit), Cmd::log("x")]),
        ]);
        assert_eq!(cmd.task_count(), 2);
        assert_eq!(cmd.type_name(), "Batch");
    }

    #[test]
    fn program_runs_tasks_off_thread_until_quit() {
        let program = Program::new(Counter { value: 0 });
        let handle = program.handle();
        assert!(handle.send(CounterMsg::SpawnIncrement));
        assert!(handle.send(CounterMsg::SpawnIncrement));
        assert!(handle.send(CounterMsg::SpawnIncrement));
        let counter = program.run();
        assert_eq!(counter.value, 3);
    }

    #[test]
    fn handle_reports_closed_program() {
        let program = Program::new(Counter { value: 0 });
        let handle = program.handle();
        handle.send(CounterMsg::Quit);
        let _ = program.run();
        assert!(!handle.send(CounterMsg::Increment));
    }
}

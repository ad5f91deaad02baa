#![forbid(unsafe_code)]

//! Deterministic program simulator for testing.
//!
//! `ProgramSimulator` drives a [`Model`] on the calling thread. Tasks run
//! synchronously at the point they are issued, unless the simulator is told
//! to hold them, in which case they queue until
//! [`run_pending_tasks`](ProgramSimulator::run_pending_tasks). Holding lets a
//! test interleave a slow collaborator result with later user actions.
//!
//! Subscriptions are not started; [`subscription_ids`](ProgramSimulator::subscription_ids)
//! reports what the model currently declares.
//!
//! ```ignore
//! let mut sim = ProgramSimulator::new(Storefront::new(services));
//! sim.init();
//! sim.send(StorefrontMsg::ToggleTopping("pepperoni".into()));
//! assert_eq!(sim.model().state().cart().len(), 0);
//! ```

use std::collections::VecDeque;

use crate::program::{Cmd, Model};
use crate::subscription::SubId;

/// Record of a command executed during simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdRecord {
    None,
    Quit,
    Msg,
    Batch(usize),
    Sequence(usize),
    Log(String),
    /// Task executed (or queued) with its name, if any.
    Task(Option<String>),
}

type PendingTask<M> = (Option<String>, Box<dyn FnOnce() -> M + Send>);

/// Single-threaded driver for [`Model`] tests.
pub struct ProgramSimulator<M: Model> {
    model: M,
    command_log: Vec<CmdRecord>,
    logs: Vec<String>,
    running: bool,
    hold_tasks: bool,
    pending: VecDeque<PendingTask<M::Message>>,
}

impl<M: Model> ProgramSimulator<M> {
    /// The model is not initialized until [`init`](Self::init) is called.
    pub fn new(model: M) -> Self {
        Self {
            model,
            command_log: Vec::new(),
            logs: Vec::new(),
            running: true,
            hold_tasks: false,
            pending: VecDeque::new(),
        }
    }

    /// Queue tasks instead of running them inline.
    #[must_use]
    pub fn holding_tasks(mut self) -> Self {
        self.hold_tasks = true;
        self
    }

    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.execute_cmd(cmd);
    }

    /// Dispatch one message through `update`.
    pub fn send(&mut self, msg: M::Message) {
        if !self.running {
            return;
        }
        let cmd = self.model.update(msg);
        self.execute_cmd(cmd);
    }

    pub fn send_all(&mut self, msgs: impl IntoIterator<Item = M::Message>) {
        for msg in msgs {
            self.send(msg);
        }
    }

    /// Number of queued tasks (only non-zero when holding).
    pub fn pending_tasks(&self) -> usize {
        self.pending.len()
    }

    /// Run queued tasks in issue order, including any they enqueue.
    pub fn run_pending_tasks(&mut self) {
        while let Some((_, task)) = self.pending.pop_front() {
            if !self.running {
                break;
            }
            let msg = task();
            self.send(msg);
        }
    }

    /// Run only the most recently queued task, leaving older ones queued.
    pub fn run_latest_task(&mut self) {
        if let Some((_, task)) = self.pending.pop_back() {
            let msg = task();
            self.send(msg);
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// `false` after a `Cmd::Quit` has been executed.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Lines emitted via `Cmd::Log`.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn command_log(&self) -> &[CmdRecord] {
        &self.command_log
    }

    /// Names of tasks issued so far, in order. Unnamed tasks are skipped.
    pub fn task_names(&self) -> Vec<&str> {
        self.command_log
            .iter()
            .filter_map(|r| match r {
                CmdRecord::Task(Some(name)) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Ids of the subscriptions the model currently declares.
    pub fn subscription_ids(&self) -> Vec<SubId> {
        self.model.subscriptions().iter().map(|s| s.id()).collect()
    }

    pub fn clear_logs(&mut self) {
        self.logs.clear();
        self.command_log.clear();
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => self.command_log.push(CmdRecord::None),
            Cmd::Quit => {
                self.running = false;
                self.command_log.push(CmdRecord::Quit);
            }
            Cmd::Msg(m) => {
                self.command_log.push(CmdRecord::Msg);
                let cmd = self.model.update(m);
                self.execute_cmd(cmd);
            }
            Cmd::Batch(cmds) => {
                self.command_log.push(CmdRecord::Batch(cmds.len()));
                self.execute_all(cmds);
            }
            Cmd::Sequence(cmds) => {
                self.command_log.push(CmdRecord::Sequence(cmds.len()));
                self.execute_all(cmds);
            }
            Cmd::Log(text) => {
                self.command_log.push(CmdRecord::Log(text.clone()));
                self.logs.push(text);
            }
            Cmd::Task(spec, f) => {
                self.command_log.push(CmdRecord::Task(spec.name.clone()));
                if self.hold_tasks {
                    self.pending.push_back((spec.name, f));
                } else {
                    let msg = f();
                    let cmd = self.model.update(msg);
                    self.execute_cmd(cmd);
                }
            }
        }
    }

    fn execute_all(&mut self, cmds: Vec<Cmd<M::Message>>) {
        for c in cmds {
            self.execute_cmd(c);
            if !self.running {
                break;
            }
        }
    }
}

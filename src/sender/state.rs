//! Submission state machine.

use serde::Serialize;

use crate::error::{Error, ToNotification};
use crate::types::Notification;

/// Message shown when the NAS accepted the task
pub const SUCCESS_MESSAGE: &str = "Task sent successfully!";

/// Step of a submission
///
/// Ordered by execution; a run only ever moves to a later stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Target URL resolution, before any I/O
    Idle,
    /// Reading and decrypting stored credentials
    LoadingCredentials,
    /// Querying the API info endpoint
    Discovering,
    /// Logging in
    Authenticating,
    /// Normalizing the download location
    ResolvingDestination,
    /// Creating the task on the NAS
    Submitting,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::LoadingCredentials => "loading_credentials",
            Stage::Discovering => "discovering",
            Stage::Authenticating => "authenticating",
            Stage::ResolvingDestination => "resolving_destination",
            Stage::Submitting => "submitting",
        };
        f.write_str(name)
    }
}

/// Terminal state of a submission
#[derive(Debug)]
pub enum SendOutcome {
    /// The NAS accepted the task
    Succeeded,
    /// The run stopped at `stage`
    Failed {
        /// Stage the failure happened in
        stage: Stage,
        /// Classified failure
        error: Error,
    },
}

impl SendOutcome {
    /// Whether the task was accepted
    pub fn is_success(&self) -> bool {
        matches!(self, SendOutcome::Succeeded)
    }

    /// The failure, if any
    pub fn error(&self) -> Option<&Error> {
        match self {
            SendOutcome::Succeeded => None,
            SendOutcome::Failed { error, .. } => Some(error),
        }
    }

    /// The notification this outcome produces
    pub fn notification(&self) -> Notification {
        match self {
            SendOutcome::Succeeded => Notification::new(SUCCESS_MESSAGE),
            SendOutcome::Failed { error, .. } => Notification::new(error.notification_message()),
        }
    }
}

/// Everything one call to [`SynoSend::send`](crate::SynoSend::send) did
#[derive(Debug)]
pub struct SendReport {
    /// Stages entered, in order, starting with [`Stage::Idle`]
    pub transitions: Vec<Stage>,
    /// How the run ended
    pub outcome: SendOutcome,
    /// The notification that was delivered
    pub notification: Notification,
}

/// Stage tracking for a single run
#[derive(Debug)]
pub(crate) struct Run {
    transitions: Vec<Stage>,
}

impl Run {
    pub(crate) fn new() -> Self {
        Self {
            transitions: vec![Stage::Idle],
        }
    }

    /// Stage the run is currently in
    pub(crate) fn stage(&self) -> Stage {
        self.transitions.last().copied().unwrap_or(Stage::Idle)
    }

    /// Move forward to `next`; backward or repeated moves are ignored
    pub(crate) fn enter(&mut self, next: Stage) {
        let current = self.stage();
        if next <= current {
            tracing::warn!(%current, %next, "ignoring non-forward stage transition");
            return;
        }
        tracing::debug!(from = %current, to = %next, "submission stage");
        self.transitions.push(next);
    }

    pub(crate) fn finish(self, outcome: SendOutcome) -> SendReport {
        SendReport {
            transitions: self.transitions,
            notification: outcome.notification(),
            outcome,
        }
    }
}

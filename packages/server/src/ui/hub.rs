//! The hub: a single task that owns every roster mutation.
//!
//! WebSocket handlers never call the mutating use cases directly. They
//! enqueue [`HubCommand`]s, and the hub applies them one at a time in
//! arrival order. Commands from one connection therefore keep their order
//! (a socket's join is always enqueued before its leave) without any lock
//! spanning more than one use case.

use std::sync::Arc;

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::{
    domain::{Color, ConnectionId, Participant, PusherChannel},
    usecase::{
        ChangeColorUseCase, JoinError, JoinParticipantUseCase, LeaveParticipantUseCase,
        RenameParticipantUseCase, SubmitMessageUseCase,
    },
};

/// Work items processed by the hub, in order
#[derive(Debug)]
pub enum HubCommand {
    Join {
        id: ConnectionId,
        channel: PusherChannel,
        reply: oneshot::Sender<Result<Participant, JoinError>>,
    },
    Leave {
        id: ConnectionId,
    },
    Submit {
        id: ConnectionId,
        text: String,
    },
    Rename {
        id: ConnectionId,
        name: String,
    },
    SetColor {
        id: ConnectionId,
        color: Color,
    },
    /// Evict everyone, reply with the evicted participants, then stop
    Shutdown {
        reply: oneshot::Sender<Vec<Participant>>,
    },
}

/// Cloneable sender side of the hub queue
#[derive(Debug, Clone)]
pub struct HubHandle {
    commands: mpsc::UnboundedSender<HubCommand>,
}

impl HubHandle {
    /// Joins `id` and waits for the outcome.
    ///
    /// Answers [`JoinError::Unavailable`] once the hub has shut down.
    pub async fn join(
        &self,
        id: ConnectionId,
        channel: PusherChannel,
    ) -> Result<Participant, JoinError> {
        let (reply, outcome) = oneshot::channel();
        if self
            .commands
            .send(HubCommand::Join { id, channel, reply })
            .is_err()
        {
            return Err(JoinError::Unavailable);
        }
        outcome.await.unwrap_or(Err(JoinError::Unavailable))
    }

    pub fn leave(&self, id: ConnectionId) {
        self.dispatch(HubCommand::Leave { id });
    }

    pub fn submit(&self, id: ConnectionId, text: String) {
        self.dispatch(HubCommand::Submit { id, text });
    }

    pub fn rename(&self, id: ConnectionId, name: String) {
        self.dispatch(HubCommand::Rename { id, name });
    }

    pub fn set_color(&self, id: ConnectionId, color: Color) {
        self.dispatch(HubCommand::SetColor { id, color });
    }

    /// Evicts every participant and stops the hub.
    ///
    /// Returns the evicted participants; empty if the hub was already gone.
    pub async fn shutdown(&self) -> Vec<Participant> {
        let (reply, evicted) = oneshot::channel();
        if self.commands.send(HubCommand::Shutdown { reply }).is_err() {
            return Vec::new();
        }
        evicted.await.unwrap_or_default()
    }

    fn dispatch(&self, command: HubCommand) {
        if let Err(e) = self.commands.send(command) {
            tracing::debug!("Hub is stopped, dropping {:?}", e.0);
        }
    }

    /// A handle whose hub is already gone
    #[cfg(test)]
    pub(crate) fn closed() -> Self {
        let (commands, _) = mpsc::unbounded_channel();
        Self { commands }
    }
}

/// The mutating use cases the hub drives
pub struct Hub {
    join: Arc<JoinParticipantUseCase>,
    leave: Arc<LeaveParticipantUseCase>,
    submit: Arc<SubmitMessageUseCase>,
    rename: Arc<RenameParticipantUseCase>,
    change_color: Arc<ChangeColorUseCase>,
}

impl Hub {
    pub fn new(
        join: Arc<JoinParticipantUseCase>,
        leave: Arc<LeaveParticipantUseCase>,
        submit: Arc<SubmitMessageUseCase>,
        rename: Arc<RenameParticipantUseCase>,
        change_color: Arc<ChangeColorUseCase>,
    ) -> Self {
        Self {
            join,
            leave,
            submit,
            rename,
            change_color,
        }
    }

    /// Spawns the hub task. The task ends after a `Shutdown` command or when
    /// every [`HubHandle`] has been dropped.
    pub fn spawn(self) -> (HubHandle, JoinHandle<()>) {
        let (commands, queue) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(queue));
        (HubHandle { commands }, task)
    }

    async fn run(self, mut queue: mpsc::UnboundedReceiver<HubCommand>) {
        while let Some(command) = queue.recv().await {
            match command {
                HubCommand::Join { id, channel, reply } => {
                    let outcome = self.join.execute(id, channel).await;
                    if let Err(Ok(orphan)) = reply.send(outcome) {
                        // The socket went away while waiting for the reply
                        self.leave.execute(orphan.id).await;
                    }
                }
                HubCommand::Leave { id } => {
                    if let Some(participant) = self.leave.execute(id).await {
                        tracing::info!("{} ({}) left", participant.name, id);
                    }
                }
                HubCommand::Submit { id, text } => {
                    self.submit.execute(id, &text).await;
                }
                HubCommand::Rename { id, name } => {
                    self.rename.execute(id, &name).await;
                }
                HubCommand::SetColor { id, color } => {
                    self.change_color.execute(id, color).await;
                }
                HubCommand::Shutdown { reply } => {
                    let evicted = self.leave.evict_all().await;
                    if reply.send(evicted).is_err() {
                        tracing::debug!("Shutdown requester went away before the reply");
                    }
                    break;
                }
            }
        }
        tracing::debug!("Hub stopped");
    }
}

//! Dependency wiring.

use std::sync::Arc;

use parlor_shared::time::{Clock, SystemClock};

use crate::{
    domain::{IdentityGenerator, MessagePusher, ParticipantRepository, RandomIdentityGenerator},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryParticipantRepository,
    },
    ui::{Server, ServerUseCases},
    usecase::{
        ChangeColorUseCase, GetRosterUseCase, JoinParticipantUseCase, LeaveParticipantUseCase,
        RenameParticipantUseCase, SubmitMessageUseCase,
    },
};

/// Build a server with an in-memory roster of `max_participants` seats.
///
/// Initializes dependencies in order:
/// 1. Repository
/// 2. MessagePusher
/// 3. Identity generator and clock
/// 4. UseCases
pub fn build_server(max_participants: usize) -> Server {
    let repository: Arc<dyn ParticipantRepository> =
        Arc::new(InMemoryParticipantRepository::with_capacity(max_participants));
    let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::default());
    let identity: Arc<dyn IdentityGenerator> = Arc::new(RandomIdentityGenerator);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    Server::new(ServerUseCases {
        join: Arc::new(JoinParticipantUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            identity.clone(),
            clock.clone(),
        )),
        leave: Arc::new(LeaveParticipantUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        )),
        submit: Arc::new(SubmitMessageUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            clock,
        )),
        rename: Arc::new(RenameParticipantUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            identity,
        )),
        change_color: Arc::new(ChangeColorUseCase::new(
            repository.clone(),
            message_pusher,
        )),
        roster: Arc::new(GetRosterUseCase::new(repository)),
    })
}

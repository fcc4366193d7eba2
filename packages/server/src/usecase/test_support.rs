//! UseCase テスト用の共通ヘルパー

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parlor_shared::time::FixedClock;

use crate::{
    domain::{
        Color, ConnectionId, DisplayName, FixedIdentityGenerator, MessagePushError, MessagePusher,
        Participant, ParticipantRepository, PusherChannel, ServerEvent, Timestamp,
    },
    infrastructure::repository::InMemoryParticipantRepository,
};

pub const FIXED_TIME: i64 = 1672531200000;

/// Records every push instead of delivering it
#[derive(Default)]
pub struct RecordingPusher {
    pub registered: Mutex<Vec<ConnectionId>>,
    pub pushes: Mutex<Vec<(ConnectionId, ServerEvent)>>,
    pub broadcasts: Mutex<Vec<(Vec<ConnectionId>, ServerEvent)>>,
}

impl RecordingPusher {
    pub fn broadcasts(&self) -> Vec<(Vec<ConnectionId>, ServerEvent)> {
        self.broadcasts.lock().unwrap().clone()
    }

    pub fn pushes(&self) -> Vec<(ConnectionId, ServerEvent)> {
        self.pushes.lock().unwrap().clone()
    }

    pub fn registered(&self) -> Vec<ConnectionId> {
        self.registered.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, id: ConnectionId, _sender: PusherChannel) {
        self.registered.lock().unwrap().push(id);
    }

    async fn unregister_client(&self, id: ConnectionId) {
        self.registered.lock().unwrap().retain(|registered| *registered != id);
    }

    async fn unregister_all(&self) -> Vec<ConnectionId> {
        std::mem::take(&mut *self.registered.lock().unwrap())
    }

    async fn push_to(&self, id: ConnectionId, event: &ServerEvent) -> Result<(), MessagePushError> {
        self.pushes.lock().unwrap().push((id, event.clone()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        self.broadcasts.lock().unwrap().push((targets, event.clone()));
        Ok(())
    }
}

pub fn repository(capacity: usize) -> Arc<InMemoryParticipantRepository> {
    Arc::new(InMemoryParticipantRepository::with_capacity(capacity))
}

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(FIXED_TIME))
}

pub fn identity(name: &str, color: Color) -> Arc<FixedIdentityGenerator> {
    Arc::new(FixedIdentityGenerator::new(
        DisplayName::new(name).unwrap(),
        color,
    ))
}

pub fn participant(id: u64, name: &str, color: Color) -> Participant {
    Participant::new(
        ConnectionId::new(id),
        DisplayName::new(name).unwrap(),
        color,
        Timestamp::new(FIXED_TIME),
    )
}

/// Insert participants directly, bypassing the join use case
pub async fn seed(repository: &InMemoryParticipantRepository, participants: &[Participant]) {
    for participant in participants {
        repository.insert(participant.clone()).await.unwrap();
    }
}

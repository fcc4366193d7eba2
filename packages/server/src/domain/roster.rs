//! Roster aggregate: the authoritative set of connected participants.

use super::{entity::Participant, error::RosterError, value_object::ConnectionId};

/// Default cap on simultaneous participants.
pub const DEFAULT_MAX_PARTICIPANTS: usize = 16;

/// Participants keyed by connection, kept in join order.
#[derive(Debug, Clone)]
pub struct Roster {
    participants: Vec<Participant>,
    capacity: usize,
}

impl Default for Roster {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_PARTICIPANTS)
    }
}

impl Roster {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            participants: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.capacity
    }

    /// Participants in join order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Add a participant.
    ///
    /// A connection that is already registered is reported before capacity is
    /// considered, since it indicates a broken transport rather than load.
    pub fn add(&mut self, participant: Participant) -> Result<(), RosterError> {
        if self.contains(participant.id) {
            return Err(RosterError::DuplicateConnection(participant.id));
        }
        if self.is_full() {
            return Err(RosterError::Full {
                capacity: self.capacity,
            });
        }
        self.participants.push(participant);
        Ok(())
    }

    /// Remove a participant; unknown ids are ignored.
    pub fn remove(&mut self, id: ConnectionId) -> Option<Participant> {
        let index = self.participants.iter().position(|p| p.id == id)?;
        Some(self.participants.remove(index))
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.participants.iter().any(|p| p.id == id)
    }

    pub fn find(&self, id: ConnectionId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn find_mut(&mut self, id: ConnectionId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    /// Remove everyone, returning them in join order.
    pub fn drain(&mut self) -> Vec<Participant> {
        std::mem::take(&mut self.participants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Color, DisplayName, Timestamp};

    fn participant(id: u64) -> Participant {
        Participant::new(
            ConnectionId::new(id),
            DisplayName::new(format!("Player{}", 1000 + id)).unwrap(),
            Color::WHITE,
            Timestamp::new(1000),
        )
    }

    #[test]
    fn test_add_keeps_join_order() {
        // テスト項目: 参加者が参加順に保持される
        // given (前提条件):
        let mut roster = Roster::default();

        // when (操作):
        roster.add(participant(3)).unwrap();
        roster.add(participant(1)).unwrap();
        roster.add(participant(2)).unwrap();

        // then (期待する結果):
        let ids: Vec<u64> = roster.participants().iter().map(|p| p.id.value()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_add_duplicate_connection_is_rejected() {
        // テスト項目: 同じ接続 ID の二重登録はエラーになる
        // given (前提条件):
        let mut roster = Roster::default();
        roster.add(participant(1)).unwrap();

        // when (操作):
        let result = roster.add(participant(1));

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RosterError::DuplicateConnection(ConnectionId::new(1)))
        );
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_add_beyond_capacity_is_rejected() {
        // テスト項目: 定員に達した状態での追加はエラーになり、人数は変わらない
        // given (前提条件):
        let mut roster = Roster::with_capacity(2);
        roster.add(participant(1)).unwrap();
        roster.add(participant(2)).unwrap();

        // when (操作):
        let result = roster.add(participant(3));

        // then (期待する結果):
        assert_eq!(result, Err(RosterError::Full { capacity: 2 }));
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_remove_is_idempotent() {
        // テスト項目: 削除は冪等であり、存在しない ID の削除は何もしない
        // given (前提条件):
        let mut roster = Roster::default();
        roster.add(participant(1)).unwrap();

        // when (操作):
        let first = roster.remove(ConnectionId::new(1));
        let second = roster.remove(ConnectionId::new(1));

        // then (期待する結果):
        assert_eq!(first.map(|p| p.id), Some(ConnectionId::new(1)));
        assert_eq!(second, None);
        assert!(roster.is_empty());
        assert!(roster.find(ConnectionId::new(1)).is_none());
    }

    #[test]
    fn test_size_tracks_joins_minus_leaves() {
        // テスト項目: 人数は参加数から対応する退出数を引いた値に一致する
        // given (前提条件):
        let mut roster = Roster::default();
        let operations: [(bool, u64); 8] = [
            (true, 1),
            (true, 2),
            (false, 1),
            (false, 1),
            (true, 3),
            (false, 9),
            (true, 4),
            (false, 3),
        ];

        // when (操作):
        let mut expected = 0usize;
        for (join, id) in operations {
            if join {
                roster.add(participant(id)).unwrap();
                expected += 1;
            } else if roster.remove(ConnectionId::new(id)).is_some() {
                expected -= 1;
            }
        }

        // then (期待する結果):
        assert_eq!(roster.len(), expected);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_drain_empties_roster() {
        // テスト項目: drain で全員が参加順に取り出され、空になる
        // given (前提条件):
        let mut roster = Roster::default();
        roster.add(participant(2)).unwrap();
        roster.add(participant(1)).unwrap();

        // when (操作):
        let drained = roster.drain();

        // then (期待する結果):
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].id, ConnectionId::new(2));
        assert!(roster.is_empty());
    }
}

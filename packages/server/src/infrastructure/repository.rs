//! InMemory Participant Repository 実装
//!
//! ドメイン層が定義する ParticipantRepository trait の具体的な実装。
//! 接続順を保つため Vec をインメモリ DB として使用します。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Participant, ParticipantRepository, RepositoryError};

/// インメモリ Participant Repository 実装
#[derive(Default)]
pub struct InMemoryParticipantRepository {
    participants: Mutex<Vec<Participant>>,
}

impl InMemoryParticipantRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn add_participant(&self, participant: Participant) -> Result<(), RepositoryError> {
        let mut participants = self.participants.lock().await;
        if participants
            .iter()
            .any(|p| p.nickname == participant.nickname)
        {
            return Err(RepositoryError::DuplicateNickname(
                participant.nickname.as_str().to_string(),
            ));
        }
        participants.push(participant);
        Ok(())
    }

    async fn remove_participant(&self, key: &str) -> Option<Participant> {
        let mut participants = self.participants.lock().await;
        let index = participants.iter().position(|p| p.key() == key)?;
        Some(participants.remove(index))
    }

    async fn get_participants(&self) -> Vec<Participant> {
        self.participants.lock().await.clone()
    }

    async fn count_participants(&self) -> usize {
        self.participants.lock().await.len()
    }
}

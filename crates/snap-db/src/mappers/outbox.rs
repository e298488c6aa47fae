//! Outbox message <-> model mapper

use snap_core::{DomainError, OutboxId, OutboxMessage, OutboxStatus};

use crate::models::OutboxModel;

impl TryFrom<OutboxModel> for OutboxMessage {
    type Error = DomainError;

    fn try_from(model: OutboxModel) -> Result<Self, Self::Error> {
        let status = OutboxStatus::parse(&model.status).ok_or_else(|| {
            DomainError::DatabaseError(format!("unknown outbox status '{}'", model.status))
        })?;

        Ok(OutboxMessage {
            id: OutboxId::from(model.id),
            recipient: model.recipient,
            subject: model.subject,
            body: model.body,
            status,
            attempts: model.attempts,
            next_attempt_at: model.next_attempt_at,
            last_error: model.last_error,
            created_at: model.created_at,
            sent_at: model.sent_at,
        })
    }
}

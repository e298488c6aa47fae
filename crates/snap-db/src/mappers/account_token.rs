//! Account token entity <-> model mapper

use snap_core::{AccountToken, DomainError, TokenId, TokenPurpose, UserId};

use crate::models::AccountTokenModel;

impl TryFrom<AccountTokenModel> for AccountToken {
    type Error = DomainError;

    fn try_from(model: AccountTokenModel) -> Result<Self, Self::Error> {
        let purpose = TokenPurpose::parse(&model.purpose).ok_or_else(|| {
            DomainError::DatabaseError(format!("unknown token purpose '{}'", model.purpose))
        })?;

        Ok(AccountToken {
            id: TokenId::from(model.id),
            token: model.token,
            user_id: UserId::from(model.user_id),
            purpose,
            expires_at: model.expires_at,
            active: model.active,
            created_at: model.created_at,
        })
    }
}

//! User entity <-> model mapper

use snap_core::{User, UserId};

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: UserId::from(model.id),
            name: model.name,
            email: model.email,
            verified: model.verified,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

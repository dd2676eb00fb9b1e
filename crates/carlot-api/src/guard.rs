//! Ownership is the only authorization rule: whoever created a comment or a
//! tag assignment is the only one who may change or remove it.

use crate::error::ApiError;

pub fn can_mutate(actor_user_id: i64, owner_user_id: i64) -> bool {
    actor_user_id == owner_user_id
}

/// `Forbidden` naming `resource` unless the actor owns it.
pub fn ensure_can_mutate(
    actor_user_id: i64,
    owner_user_id: i64,
    resource: &'static str,
) -> Result<(), ApiError> {
    if can_mutate(actor_user_id, owner_user_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(resource))
    }
}

use crate::{DeskError, User, UserRepository};

pub struct GetProfileAction<U> {
    user_repository: U,
}

impl<U: UserRepository> GetProfileAction<U> {
    pub fn new(user_repository: U) -> Self {
        Self { user_repository }
    }

    pub async fn execute(&self, user_id: i64) -> Result<User, DeskError> {
        self.user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or(DeskError::UserNotFound)
    }
}

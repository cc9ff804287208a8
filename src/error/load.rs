use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Must provide either existing users or a positive number of new users.")]
    MissingUserSource,
    #[error("Cannot combine {num_new_users} new users with {existing_users} existing users.")]
    ConflictingUserSources {
        num_new_users: usize,
        existing_users: usize,
    },
    #[error("Cannot derive {num_new_users} user ids starting at {start_user_id} without overflowing.")]
    UserIdOverflow {
        start_user_id: u64,
        num_new_users: usize,
    },
    #[error("Existing user at index {index} has an empty email.")]
    ExistingUserMissingEmail { index: usize },
}

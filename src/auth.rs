use crate::error::AppError;
use crate::model::User;
use crate::service::UserService;
use log::debug;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use thiserror::Error;

const DUMMY_PASSWORD: &str = "movieflix-unknown-user";

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("bad credentials")]
    BadCredentials,
    #[error(transparent)]
    Internal(#[from] AppError),
}

impl From<bcrypt::BcryptError> for AuthenticationError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AuthenticationError::Internal(err.into())
    }
}

/// Matches email/password pairs against registered users.
#[derive(Clone)]
pub struct AuthenticationManager {
    users: UserService,
    /// Verified against when the email is unknown, so both failure paths
    /// cost one bcrypt verification at the configured cost.
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthenticationManager {
    pub fn new(users: UserService) -> Self {
        AuthenticationManager {
            users,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    fn dummy_hash(&self) -> Result<&str, bcrypt::BcryptError> {
        self.dummy_hash
            .get_or_try_init(|| bcrypt::hash(DUMMY_PASSWORD, self.users.bcrypt_cost()))
            .map(String::as_str)
    }

    /// Unknown emails and wrong passwords are both `BadCredentials`.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthenticationError> {
        let user = match self.users.find_by_email(email)? {
            Some(user) => user,
            None => {
                bcrypt::verify(password, self.dummy_hash()?)?;
                debug!("login for unknown email");
                return Err(AuthenticationError::BadCredentials);
            }
        };
        if bcrypt::verify(password, &user.password_hash)? {
            Ok(user)
        } else {
            debug!("wrong password for user {}", user.id);
            Err(AuthenticationError::BadCredentials)
        }
    }
}

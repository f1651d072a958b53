use crate::database::UserDb;
use crate::error::AppError;
use crate::model::{NewUser, User};
use log::info;

#[derive(Clone)]
pub struct UserService {
    db: sled::Db,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(db: sled::Db, bcrypt_cost: u32) -> Self {
        UserService { db, bcrypt_cost }
    }

    /// Hashes the password and stores the user. A taken email is a
    /// validation failure.
    pub fn save_user(&self, user: NewUser) -> Result<User, AppError> {
        let password_hash = bcrypt::hash(&user.password, self.bcrypt_cost)?;
        match self.db.add_user(&user.name, &user.email, &password_hash)? {
            Some(saved) => {
                info!("registered user {}", saved.id);
                Ok(saved)
            }
            None => Err(AppError::Validation("E-mail já cadastrado.".to_owned())),
        }
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.db.get_user_by_email(email)?)
    }
}

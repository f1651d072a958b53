use super::{decode, encode, id_key, next_id, DbError};
use crate::model::User;
use sled::transaction::{abort, TransactionError, Transactional};

const USERS: &str = "users";
const USERS_EMAIL: &str = "users_email";

pub trait UserDb {
    /// Returns `None` if the email is already registered.
    fn add_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, DbError>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
}

impl UserDb for sled::Db {
    fn add_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, DbError> {
        let users = self.open_tree(USERS)?;
        let users_email = self.open_tree(USERS_EMAIL)?;
        let id = next_id(self)?;
        let user = User {
            id,
            name: name.to_owned(),
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
        };
        let encoded = encode(&user)?;
        let key = id_key(id);
        let result = (&users, &users_email).transaction(|(users, users_email)| {
            users.insert(key.clone(), encoded.as_slice())?;
            if users_email
                .insert(user.email.as_bytes(), key.clone())?
                .is_some()
            {
                return abort(());
            }
            Ok(())
        });
        match result {
            Ok(()) => Ok(Some(user)),
            Err(TransactionError::Abort(())) => Ok(None),
            Err(TransactionError::Storage(err)) => Err(err.into()),
        }
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let users_email = self.open_tree(USERS_EMAIL)?;
        let users = self.open_tree(USERS)?;
        match users_email.get(email.as_bytes())? {
            Some(id) => users.get(id)?.map(|raw| decode(&raw)).transpose(),
            None => Ok(None),
        }
    }
}

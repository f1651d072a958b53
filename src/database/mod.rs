mod catalog;
mod movie;
mod user;

pub use catalog::{CatalogDb, CatalogEntry};
pub use movie::MovieDb;
pub use user::UserDb;

use serde::{de::DeserializeOwned, Serialize};
use sled::transaction::{ConflictableTransactionError, ConflictableTransactionResult, TransactionError};
use sled::IVec;
use thiserror::Error;

const MOVIES: &str = "movies";
const CATEGORIES: &str = "categories";
const STREAMINGS: &str = "streamings";
const CATEGORY_MOVIES: &str = "category_movies";
const STREAMING_MOVIES: &str = "streaming_movies";

const EMPTY: &[u8] = &[];

#[derive(Debug, Error)]
pub enum DbError {
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
    #[error("corrupt key of length {0}")]
    CorruptKey(usize),
}

impl From<TransactionError<DbError>> for DbError {
    fn from(err: TransactionError<DbError>) -> Self {
        match err {
            TransactionError::Abort(err) => err,
            TransactionError::Storage(err) => DbError::Storage(err),
        }
    }
}

type TxResult<T> = ConflictableTransactionResult<T, DbError>;

/// Ids are stored big-endian so that iteration and prefix scans follow
/// numeric order.
fn id_key(id: u64) -> IVec {
    IVec::from(&id.to_be_bytes()[..])
}

fn deserialize_id<V: AsRef<[u8]>>(id: V) -> Result<u64, DbError> {
    let bytes = id.as_ref();
    <[u8; 8]>::try_from(bytes)
        .map(u64::from_be_bytes)
        .map_err(|_| DbError::CorruptKey(bytes.len()))
}

/// Key of an association index entry: `owner ++ movie`.
fn link_key(owner: u64, movie: u64) -> IVec {
    let mut key = owner.to_be_bytes().to_vec();
    key.extend_from_slice(&movie.to_be_bytes());
    IVec::from(key)
}

fn linked_movie<V: AsRef<[u8]>>(key: V) -> Result<u64, DbError> {
    let bytes = key.as_ref();
    if bytes.len() != 16 {
        return Err(DbError::CorruptKey(bytes.len()));
    }
    deserialize_id(&bytes[8..])
}

fn next_id(db: &sled::Db) -> Result<u64, DbError> {
    Ok(db.generate_id()? + 1)
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, DbError> {
    Ok(bincode::serialize(value)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DbError> {
    Ok(bincode::deserialize(bytes)?)
}

fn abortable<T>(result: Result<T, DbError>) -> TxResult<T> {
    result.map_err(ConflictableTransactionError::Abort)
}

#[cfg(test)]
pub(crate) fn temporary() -> sled::Db {
    sled::Config::new()
        .temporary(true)
        .open()
        .expect("temporary database")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_keys() {
        assert_eq!(deserialize_id(id_key(42)).unwrap(), 42);
        assert_eq!(linked_movie(link_key(7, 9)).unwrap(), 9);
    }

    #[test]
    fn short_keys_are_rejected() {
        assert!(matches!(deserialize_id([1u8, 2]), Err(DbError::CorruptKey(2))));
        assert!(matches!(linked_movie(id_key(3)), Err(DbError::CorruptKey(8))));
    }

    #[test]
    fn generated_ids_start_at_one() {
        let db = temporary();
        let first = next_id(&db).unwrap();
        assert!(first >= 1);
        assert!(next_id(&db).unwrap() > first);
    }
}

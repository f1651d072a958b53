use crate::database::{CatalogDb, CatalogEntry};
use crate::error::AppError;
use crate::model::{Category, Streaming};
use std::marker::PhantomData;

pub type CategoryService = CatalogService<Category>;
pub type StreamingService = CatalogService<Streaming>;

/// CRUD over a catalog tree. Holds a handle to the shared database.
pub struct CatalogService<T> {
    db: sled::Db,
    entry: PhantomData<T>,
}

impl<T> Clone for CatalogService<T> {
    fn clone(&self) -> Self {
        CatalogService {
            db: self.db.clone(),
            entry: PhantomData,
        }
    }
}

impl<T: CatalogEntry> CatalogService<T> {
    pub fn new(db: sled::Db) -> Self {
        CatalogService {
            db,
            entry: PhantomData,
        }
    }

    pub fn find_all(&self) -> Result<Vec<T>, AppError> {
        Ok(CatalogDb::<T>::list_entries(&self.db)?)
    }

    pub fn find_by_id(&self, id: u64) -> Result<Option<T>, AppError> {
        Ok(CatalogDb::<T>::get_entry(&self.db, id)?)
    }

    pub fn save(&self, name: &str) -> Result<T, AppError> {
        Ok(CatalogDb::<T>::add_entry(&self.db, name)?)
    }

    /// Returns false if nothing was deleted.
    pub fn delete(&self, id: u64) -> Result<bool, AppError> {
        Ok(CatalogDb::<T>::remove_entry(&self.db, id)?)
    }
}

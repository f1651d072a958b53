use crate::database::{CatalogDb, CatalogEntry, MovieDb};
use crate::error::AppError;
use crate::model::{Movie, MovieDraft, MovieRecord};
use log::debug;

#[derive(Clone)]
pub struct MovieService {
    db: sled::Db,
}

impl MovieService {
    pub fn new(db: sled::Db) -> Self {
        MovieService { db }
    }

    /// Unknown category and streaming ids are dropped, not reported.
    pub fn save(&self, draft: &MovieDraft) -> Result<Movie, AppError> {
        let record = self.db.add_movie(draft)?;
        debug!(
            "saved movie {} with {} categories, {} streamings",
            record.id,
            record.categories.len(),
            record.streamings.len()
        );
        self.resolve(record)
    }

    pub fn find_all(&self) -> Result<Vec<Movie>, AppError> {
        self.db
            .list_movies()?
            .into_iter()
            .map(|record| self.resolve(record))
            .collect()
    }

    pub fn find_movie_by_id(&self, id: u64) -> Result<Option<Movie>, AppError> {
        self.db
            .get_movie(id)?
            .map(|record| self.resolve(record))
            .transpose()
    }

    pub fn update(&self, id: u64, draft: &MovieDraft) -> Result<Option<Movie>, AppError> {
        self.db
            .replace_movie(id, draft)?
            .map(|record| self.resolve(record))
            .transpose()
    }

    pub fn find_by_category(&self, category_id: u64) -> Result<Vec<Movie>, AppError> {
        self.db
            .movies_by_category(category_id)?
            .into_iter()
            .map(|record| self.resolve(record))
            .collect()
    }

    pub fn delete(&self, id: u64) -> Result<bool, AppError> {
        Ok(self.db.remove_movie(id)?)
    }

    fn resolve(&self, record: MovieRecord) -> Result<Movie, AppError> {
        Ok(Movie {
            categories: self.entries(&record.categories)?,
            streamings: self.entries(&record.streamings)?,
            id: record.id,
            title: record.title,
            description: record.description,
            release_date: record.release_date,
            rating: record.rating,
        })
    }

    fn entries<T: CatalogEntry>(&self, ids: &[u64]) -> Result<Vec<T>, AppError> {
        let entries = ids
            .iter()
            .filter_map(|&id| CatalogDb::<T>::get_entry(&self.db, id).transpose())
            .collect::<Result<Vec<T>, _>>()?;
        Ok(entries)
    }
}

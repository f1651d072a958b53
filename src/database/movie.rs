use super::{
    abortable, decode, encode, id_key, link_key, linked_movie, next_id, DbError, TxResult,
    CATEGORIES, CATEGORY_MOVIES, EMPTY, MOVIES, STREAMINGS, STREAMING_MOVIES,
};
use crate::model::{MovieDraft, MovieRecord};
use sled::transaction::{TransactionalTree, Transactional};

pub trait MovieDb {
    /// Stores a new movie, keeping only the category and streaming ids
    /// that exist.
    fn add_movie(&self, draft: &MovieDraft) -> Result<MovieRecord, DbError>;
    fn get_movie(&self, id: u64) -> Result<Option<MovieRecord>, DbError>;
    fn list_movies(&self) -> Result<Vec<MovieRecord>, DbError>;
    /// Overwrites an existing movie and replaces its association sets in
    /// one transaction. Returns `None` without writing if the movie is
    /// missing.
    fn replace_movie(&self, id: u64, draft: &MovieDraft) -> Result<Option<MovieRecord>, DbError>;
    fn movies_by_category(&self, category_id: u64) -> Result<Vec<MovieRecord>, DbError>;
    /// Returns whether the movie existed.
    fn remove_movie(&self, id: u64) -> Result<bool, DbError>;
}

struct MovieTrees {
    movies: sled::Tree,
    categories: sled::Tree,
    streamings: sled::Tree,
    category_movies: sled::Tree,
    streaming_movies: sled::Tree,
}

struct MovieTx<'a> {
    movies: &'a TransactionalTree,
    categories: &'a TransactionalTree,
    streamings: &'a TransactionalTree,
    category_movies: &'a TransactionalTree,
    streaming_movies: &'a TransactionalTree,
}

impl MovieTrees {
    fn open(db: &sled::Db) -> Result<Self, DbError> {
        Ok(MovieTrees {
            movies: db.open_tree(MOVIES)?,
            categories: db.open_tree(CATEGORIES)?,
            streamings: db.open_tree(STREAMINGS)?,
            category_movies: db.open_tree(CATEGORY_MOVIES)?,
            streaming_movies: db.open_tree(STREAMING_MOVIES)?,
        })
    }

    fn transaction<A, F>(&self, f: F) -> Result<A, DbError>
    where
        F: Fn(MovieTx<'_>) -> TxResult<A>,
    {
        let result = (
            &self.movies,
            &self.categories,
            &self.streamings,
            &self.category_movies,
            &self.streaming_movies,
        )
            .transaction(
                |(movies, categories, streamings, category_movies, streaming_movies)| {
                    f(MovieTx {
                        movies,
                        categories,
                        streamings,
                        category_movies,
                        streaming_movies,
                    })
                },
            )?;
        Ok(result)
    }
}

impl MovieTx<'_> {
    /// Builds the stored form of `draft`, resolving its ids against the
    /// catalog trees, and writes it together with its index entries.
    fn write(&self, id: u64, draft: &MovieDraft) -> TxResult<MovieRecord> {
        let record = MovieRecord {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            release_date: draft.release_date,
            rating: draft.rating,
            categories: resolve(self.categories, &draft.categories)?,
            streamings: resolve(self.streamings, &draft.streamings)?,
        };
        for &category in &record.categories {
            self.category_movies.insert(link_key(category, id), EMPTY)?;
        }
        for &streaming in &record.streamings {
            self.streaming_movies.insert(link_key(streaming, id), EMPTY)?;
        }
        self.movies
            .insert(id_key(id), abortable(encode(&record))?)?;
        Ok(record)
    }

    fn unlink(&self, record: &MovieRecord) -> TxResult<()> {
        for &category in &record.categories {
            self.category_movies.remove(link_key(category, record.id))?;
        }
        for &streaming in &record.streamings {
            self.streaming_movies.remove(link_key(streaming, record.id))?;
        }
        Ok(())
    }

    fn existing(&self, id: u64) -> TxResult<Option<MovieRecord>> {
        match self.movies.get(id_key(id))? {
            Some(raw) => Ok(Some(abortable(decode(&raw))?)),
            None => Ok(None),
        }
    }
}

/// Keeps the ids present in `tree`, in request order and without
/// duplicates.
fn resolve(tree: &TransactionalTree, ids: &[u64]) -> TxResult<Vec<u64>> {
    let mut found = Vec::with_capacity(ids.len());
    for &id in ids {
        if !found.contains(&id) && tree.get(id_key(id))?.is_some() {
            found.push(id);
        }
    }
    Ok(found)
}

impl MovieDb for sled::Db {
    fn add_movie(&self, draft: &MovieDraft) -> Result<MovieRecord, DbError> {
        let trees = MovieTrees::open(self)?;
        let id = next_id(self)?;
        trees.transaction(|tx| tx.write(id, draft))
    }

    fn get_movie(&self, id: u64) -> Result<Option<MovieRecord>, DbError> {
        let movies = self.open_tree(MOVIES)?;
        movies.get(id_key(id))?.map(|raw| decode(&raw)).transpose()
    }

    fn list_movies(&self) -> Result<Vec<MovieRecord>, DbError> {
        let movies = self.open_tree(MOVIES)?;
        movies.iter().values().map(|raw| decode(&raw?)).collect()
    }

    fn replace_movie(&self, id: u64, draft: &MovieDraft) -> Result<Option<MovieRecord>, DbError> {
        let trees = MovieTrees::open(self)?;
        trees.transaction(|tx| match tx.existing(id)? {
            Some(existing) => {
                tx.unlink(&existing)?;
                Ok(Some(tx.write(id, draft)?))
            }
            None => Ok(None),
        })
    }

    fn movies_by_category(&self, category_id: u64) -> Result<Vec<MovieRecord>, DbError> {
        let category_movies = self.open_tree(CATEGORY_MOVIES)?;
        let mut movies = Vec::new();
        for key in category_movies.scan_prefix(id_key(category_id)).keys() {
            if let Some(movie) = self.get_movie(linked_movie(key?)?)? {
                movies.push(movie);
            }
        }
        Ok(movies)
    }

    fn remove_movie(&self, id: u64) -> Result<bool, DbError> {
        let trees = MovieTrees::open(self)?;
        trees.transaction(|tx| match tx.existing(id)? {
            Some(existing) => {
                tx.unlink(&existing)?;
                tx.movies.remove(id_key(id))?;
                Ok(true)
            }
            None => Ok(false),
        })
    }
}

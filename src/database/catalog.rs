use super::{
    abortable, decode, encode, id_key, link_key, linked_movie, next_id, DbError, TxResult,
    CATEGORIES, CATEGORY_MOVIES, MOVIES, STREAMINGS, STREAMING_MOVIES,
};
use crate::model::{Category, MovieRecord, Streaming};
use log::debug;
use serde::{de::DeserializeOwned, Serialize};
use sled::transaction::{Transactional, TransactionalTree};

/// A named entity that movies reference many-to-many.
pub trait CatalogEntry: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Tree holding the entries.
    const TREE: &'static str;
    /// Association index keyed `entry ++ movie`.
    const LINKS: &'static str;

    fn new(id: u64, name: String) -> Self;
    fn id(&self) -> u64;
    fn name(&self) -> &str;
    /// Drops the reference to `id` from a stored movie.
    fn detach(movie: &mut MovieRecord, id: u64);
}

impl CatalogEntry for Category {
    const TREE: &'static str = CATEGORIES;
    const LINKS: &'static str = CATEGORY_MOVIES;

    fn new(id: u64, name: String) -> Self {
        Category { id, name }
    }

    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn detach(movie: &mut MovieRecord, id: u64) {
        movie.categories.retain(|category| *category != id);
    }
}

impl CatalogEntry for Streaming {
    const TREE: &'static str = STREAMINGS;
    const LINKS: &'static str = STREAMING_MOVIES;

    fn new(id: u64, name: String) -> Self {
        Streaming { id, name }
    }

    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn detach(movie: &mut MovieRecord, id: u64) {
        movie.streamings.retain(|streaming| *streaming != id);
    }
}

pub trait CatalogDb<T: CatalogEntry> {
    fn add_entry(&self, name: &str) -> Result<T, DbError>;
    fn get_entry(&self, id: u64) -> Result<Option<T>, DbError>;
    fn list_entries(&self) -> Result<Vec<T>, DbError>;
    /// Removes the entry together with its movie associations. Returns
    /// whether the entry existed.
    fn remove_entry(&self, id: u64) -> Result<bool, DbError>;
}

impl<T: CatalogEntry> CatalogDb<T> for sled::Db {
    fn add_entry(&self, name: &str) -> Result<T, DbError> {
        let entries = self.open_tree(T::TREE)?;
        let entry = T::new(next_id(self)?, name.to_owned());
        entries.insert(id_key(entry.id()), encode(&entry)?)?;
        Ok(entry)
    }

    fn get_entry(&self, id: u64) -> Result<Option<T>, DbError> {
        let entries = self.open_tree(T::TREE)?;
        entries.get(id_key(id))?.map(|raw| decode(&raw)).transpose()
    }

    fn list_entries(&self) -> Result<Vec<T>, DbError> {
        let entries = self.open_tree(T::TREE)?;
        entries.iter().values().map(|raw| decode(&raw?)).collect()
    }

    fn remove_entry(&self, id: u64) -> Result<bool, DbError> {
        let links = self.open_tree(T::LINKS)?;
        remove_with_links::<T>(self, id, &linked_movies(&links, id)?)
    }
}

fn linked_movies(links: &sled::Tree, id: u64) -> Result<Vec<u64>, DbError> {
    links
        .scan_prefix(id_key(id))
        .keys()
        .map(|key| linked_movie(key?))
        .collect()
}

fn detach_all<T: CatalogEntry>(
    links: &TransactionalTree,
    movies: &TransactionalTree,
    id: u64,
    linked: &[u64],
) -> TxResult<()> {
    for &movie_id in linked {
        links.remove(link_key(id, movie_id))?;
        if let Some(raw) = movies.get(id_key(movie_id))? {
            let mut movie: MovieRecord = abortable(decode(&raw))?;
            T::detach(&mut movie, id);
            movies.insert(id_key(movie_id), abortable(encode(&movie))?)?;
        }
    }
    Ok(())
}

/// Removes the entry and detaches it from the movies in `linked`, a scan
/// taken before the transaction. Links committed after that scan are swept
/// once the entry is gone; movie writes resolve ids against the entry tree,
/// so none can be added after the removal commits.
fn remove_with_links<T: CatalogEntry>(
    db: &sled::Db,
    id: u64,
    linked: &[u64],
) -> Result<bool, DbError> {
    let entries = db.open_tree(T::TREE)?;
    let links = db.open_tree(T::LINKS)?;
    let movies = db.open_tree(MOVIES)?;

    let removed = (&entries, &links, &movies).transaction(|(entries, links, movies)| {
        if entries.remove(id_key(id))?.is_none() {
            return Ok(false);
        }
        detach_all::<T>(links, movies, id, linked)?;
        Ok(true)
    })?;

    let late = linked_movies(&links, id)?;
    if !late.is_empty() {
        debug!("sweeping {} late links of {} {}", late.len(), T::TREE, id);
        (&links, &movies)
            .transaction(|(links, movies)| detach_all::<T>(links, movies, id, &late))?;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{temporary, MovieDb};
    use crate::model::MovieDraft;

    #[test]
    fn entries_are_listed_in_id_order() {
        let db = temporary();
        let drama: Category = db.add_entry("Drama").unwrap();
        let action: Category = db.add_entry("Action").unwrap();
        let listed: Vec<Category> = db.list_entries().unwrap();
        assert_eq!(listed, vec![drama, action]);
    }

    #[test]
    fn categories_and_streamings_use_separate_trees() {
        let db = temporary();
        let category: Category = db.add_entry("Action").unwrap();
        let streaming: Option<Streaming> = db.get_entry(category.id).unwrap();
        assert!(streaming.is_none());
    }

    #[test]
    fn removing_missing_entry_reports_false() {
        let db = temporary();
        assert!(!CatalogDb::<Streaming>::remove_entry(&db, 99).unwrap());
    }

    #[test]
    fn removing_a_category_detaches_it_from_movies() {
        let db = temporary();
        let action: Category = db.add_entry("Action").unwrap();
        let drama: Category = db.add_entry("Drama").unwrap();
        let movie = db
            .add_movie(&MovieDraft {
                title: "Heat".to_owned(),
                categories: vec![action.id, drama.id],
                ..MovieDraft::default()
            })
            .unwrap();

        assert!(CatalogDb::<Category>::remove_entry(&db, action.id).unwrap());

        let stored = db.get_movie(movie.id).unwrap().unwrap();
        assert_eq!(stored.categories, vec![drama.id]);
        assert!(db.movies_by_category(action.id).unwrap().is_empty());
        assert!(CatalogDb::<Category>::get_entry(&db, action.id)
            .unwrap()
            .is_none());
    }

    #[test]
    fn links_missed_by_the_scan_are_swept() {
        let db = temporary();
        let action: Category = db.add_entry("Action").unwrap();
        let movie = db
            .add_movie(&MovieDraft {
                title: "Heat".to_owned(),
                categories: vec![action.id],
                ..MovieDraft::default()
            })
            .unwrap();

        // The movie was linked after the pre-transaction scan ran.
        assert!(remove_with_links::<Category>(&db, action.id, &[]).unwrap());

        let stored = db.get_movie(movie.id).unwrap().unwrap();
        assert!(stored.categories.is_empty());
        assert!(db.movies_by_category(action.id).unwrap().is_empty());
        assert!(CatalogDb::<Category>::get_entry(&db, action.id)
            .unwrap()
            .is_none());
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Registration data before the password has been hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Streaming {
    pub id: u64,
    pub name: String,
}

/// A movie as stored: associations are kept as ids.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub rating: f64,
    pub categories: Vec<u64>,
    pub streamings: Vec<u64>,
}

/// Incoming movie fields. The id lists are candidates and may reference
/// rows that do not exist.
#[derive(Debug, Clone, Default)]
pub struct MovieDraft {
    pub title: String,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub rating: f64,
    pub categories: Vec<u64>,
    pub streamings: Vec<u64>,
}

/// A movie with its associations resolved to entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub rating: f64,
    pub categories: Vec<Category>,
    pub streamings: Vec<Streaming>,
}

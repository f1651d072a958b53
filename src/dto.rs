//! Wire formats of the HTTP API and their mapping to the model.

use crate::database::CatalogEntry;
use crate::error::AppError;
use crate::model::{Movie, MovieDraft, NewUser, User};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl UserRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.is_empty() {
            return Err(AppError::Validation("Nome do usuário é obrigatório.".to_owned()));
        }
        if !self.email.contains('@') {
            return Err(AppError::Validation("E-mail inválido.".to_owned()));
        }
        if self.password.is_empty() {
            return Err(AppError::Validation("Senha é obrigatória.".to_owned()));
        }
        Ok(())
    }
}

impl From<UserRequest> for NewUser {
    fn from(request: UserRequest) -> Self {
        NewUser {
            name: request.name,
            email: request.email,
            password: request.password,
        }
    }
}

/// Public projection of a user; never carries the password.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Request body for categories and streaming services.
#[derive(Deserialize)]
pub struct CatalogRequest {
    #[serde(default)]
    pub name: String,
}

impl CatalogRequest {
    pub fn validate(&self, missing_name: &str) -> Result<(), AppError> {
        if self.name.is_empty() {
            return Err(AppError::Validation(missing_name.to_owned()));
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub struct CatalogResponse {
    pub id: u64,
    pub name: String,
}

impl CatalogResponse {
    pub fn from_entry<T: CatalogEntry>(entry: &T) -> Self {
        CatalogResponse {
            id: entry.id(),
            name: entry.name().to_owned(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "release_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub categories: Vec<u64>,
    #[serde(default)]
    pub streamings: Vec<u64>,
}

impl MovieRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.is_empty() {
            return Err(AppError::Validation("Título do filme é obrigatório.".to_owned()));
        }
        Ok(())
    }
}

impl From<MovieRequest> for MovieDraft {
    fn from(request: MovieRequest) -> Self {
        MovieDraft {
            title: request.title,
            description: request.description,
            release_date: request.release_date,
            rating: request.rating,
            categories: request.categories,
            streamings: request.streamings,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "release_date")]
    pub release_date: Option<NaiveDate>,
    pub rating: f64,
    pub categories: Vec<CatalogResponse>,
    pub streamings: Vec<CatalogResponse>,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        MovieResponse {
            id: movie.id,
            title: movie.title.clone(),
            description: movie.description.clone(),
            release_date: movie.release_date,
            rating: movie.rating,
            categories: movie.categories.iter().map(CatalogResponse::from_entry).collect(),
            streamings: movie.streamings.iter().map(CatalogResponse::from_entry).collect(),
        }
    }
}

#[derive(Deserialize)]
pub struct CategoryQuery {
    pub category: u64,
}

/// `dd/MM/yyyy`, e.g. `19/10/1998`.
mod release_date {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%d/%m/%Y";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.collect_str(&date.format(FORMAT)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| NaiveDate::parse_from_str(&raw, FORMAT).map_err(D::Error::custom))
            .transpose()
    }
}

use crate::database::DbError;
use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use thiserror::Error;

pub const INVALID_CREDENTIALS: &str = "Usuário ou senha inválida";

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,
    #[error("Acesso não autorizado.")]
    Unauthorized,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Database error")]
    Database(#[from] DbError),
    #[error("Password hashing error")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("Token error")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("Internal error")]
    Blocking(#[from] BlockingError),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::Hash(_)
            | AppError::Token(_)
            | AppError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{:?}", self);
        }
        HttpResponse::build(status).json(ErrorBody {
            message: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::NotFound("Filme não encontrado").status_code(),
            StatusCode::NOT_FOUND
        );
        let storage = AppError::from(DbError::CorruptKey(3));
        assert_eq!(storage.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let err = AppError::from(DbError::CorruptKey(3));
        assert_eq!(err.to_string(), "Database error");
        assert_eq!(AppError::InvalidCredentials.to_string(), INVALID_CREDENTIALS);
    }
}

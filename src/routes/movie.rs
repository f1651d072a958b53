use crate::dto::{CategoryQuery, MovieRequest, MovieResponse};
use crate::error::AppError;
use crate::model::{Movie, MovieDraft};
use crate::service::MovieService;
use crate::token::JwtUserData;
use actix_web::{web, HttpResponse, Scope};
use log::info;

const NOT_FOUND: &str = "Filme não encontrado";

pub fn scope() -> Scope {
    web::scope("/movie")
        .route("", web::post().to(save))
        .route("", web::get().to(find_all))
        .route("/search", web::get().to(find_by_category))
        .route("/{id}", web::get().to(find_by_id))
        .route("/{id}", web::put().to(update))
        .route("/{id}", web::delete().to(delete))
}

fn list(movies: &[Movie]) -> HttpResponse {
    HttpResponse::Ok().json(movies.iter().map(MovieResponse::from).collect::<Vec<_>>())
}

async fn save(
    movies: web::Data<MovieService>,
    user: JwtUserData,
    request: web::Json<MovieRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let movie = movies.save(&MovieDraft::from(request.into_inner()))?;
    info!("{} created movie {}", user, movie.id);
    Ok(HttpResponse::Ok().json(MovieResponse::from(&movie)))
}

async fn find_all(movies: web::Data<MovieService>) -> Result<HttpResponse, AppError> {
    Ok(list(&movies.find_all()?))
}

async fn find_by_id(
    movies: web::Data<MovieService>,
    id: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    movies
        .find_movie_by_id(id.into_inner())?
        .map(|movie| HttpResponse::Ok().json(MovieResponse::from(&movie)))
        .ok_or(AppError::NotFound(NOT_FOUND))
}

async fn update(
    movies: web::Data<MovieService>,
    user: JwtUserData,
    id: web::Path<u64>,
    request: web::Json<MovieRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let id = id.into_inner();
    let movie = movies
        .update(id, &MovieDraft::from(request.into_inner()))?
        .ok_or(AppError::NotFound(NOT_FOUND))?;
    info!("{} updated movie {}", user, id);
    Ok(HttpResponse::Ok().json(MovieResponse::from(&movie)))
}

async fn find_by_category(
    movies: web::Data<MovieService>,
    query: web::Query<CategoryQuery>,
) -> Result<HttpResponse, AppError> {
    Ok(list(&movies.find_by_category(query.category)?))
}

async fn delete(
    movies: web::Data<MovieService>,
    user: JwtUserData,
    id: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    if movies.delete(id)? {
        info!("{} deleted movie {}", user, id);
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound(NOT_FOUND))
    }
}

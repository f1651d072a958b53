use crate::database::CatalogEntry;
use crate::dto::{CatalogRequest, CatalogResponse};
use crate::error::AppError;
use crate::model::{Category, Streaming};
use crate::service::CatalogService;
use crate::token::JwtUserData;
use actix_web::{web, HttpResponse, Scope};
use log::info;

/// Messages a catalog resource answers with.
pub trait CatalogResource: CatalogEntry {
    const MISSING_NAME: &'static str;
    const NOT_FOUND: &'static str;
}

impl CatalogResource for Category {
    const MISSING_NAME: &'static str = "Nome da categoria é obrigatório.";
    const NOT_FOUND: &'static str = "Categoria não encontrada";
}

impl CatalogResource for Streaming {
    const MISSING_NAME: &'static str = "Nome do streaming é obrigatório.";
    const NOT_FOUND: &'static str = "Streaming não encontrado";
}

pub fn scope<T: CatalogResource>(path: &str) -> Scope {
    web::scope(path)
        .route("", web::get().to(list::<T>))
        .route("", web::post().to(create::<T>))
        .route("/{id}", web::get().to(find::<T>))
        .route("/{id}", web::delete().to(delete::<T>))
}

async fn list<T: CatalogResource>(
    service: web::Data<CatalogService<T>>,
) -> Result<HttpResponse, AppError> {
    let entries = service.find_all()?;
    Ok(HttpResponse::Ok().json(
        entries
            .iter()
            .map(CatalogResponse::from_entry)
            .collect::<Vec<_>>(),
    ))
}

async fn create<T: CatalogResource>(
    service: web::Data<CatalogService<T>>,
    user: JwtUserData,
    request: web::Json<CatalogRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate(T::MISSING_NAME)?;
    let entry = service.save(&request.name)?;
    info!("{} created {} {}", user, T::TREE, entry.id());
    Ok(HttpResponse::Created().json(CatalogResponse::from_entry(&entry)))
}

async fn find<T: CatalogResource>(
    service: web::Data<CatalogService<T>>,
    id: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    match service.find_by_id(id.into_inner())? {
        Some(entry) => Ok(HttpResponse::Ok().json(CatalogResponse::from_entry(&entry))),
        None => Err(AppError::NotFound(T::NOT_FOUND)),
    }
}

async fn delete<T: CatalogResource>(
    service: web::Data<CatalogService<T>>,
    user: JwtUserData,
    id: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    if service.delete(id)? {
        info!("{} deleted {} {}", user, T::TREE, id);
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound(T::NOT_FOUND))
    }
}

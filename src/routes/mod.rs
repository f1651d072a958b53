mod auth;
mod catalog;
mod movie;

use crate::error::AppError;
use crate::middleware::JwtAuth;
use crate::model::{Category, Streaming};
use crate::service::Services;
use actix_web::web;

/// Registers every route under `/movieflix`. Everything except `/auth`
/// requires a bearer token.
pub fn configure(cfg: &mut web::ServiceConfig, services: &Services) {
    let guard = || JwtAuth::new(services.tokens.clone());
    cfg.app_data(web::Data::new(services.categories.clone()))
        .app_data(web::Data::new(services.streamings.clone()))
        .app_data(web::Data::new(services.users.clone()))
        .app_data(web::Data::new(services.movies.clone()))
        .app_data(web::Data::new(services.authentication.clone()))
        .app_data(web::Data::new(services.tokens.clone()))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            AppError::Validation(err.to_string()).into()
        }))
        .app_data(web::PathConfig::default().error_handler(|err, _req| {
            AppError::Validation(err.to_string()).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            AppError::Validation(err.to_string()).into()
        }))
        .service(
            web::scope("/movieflix")
                .service(auth::scope())
                .service(catalog::scope::<Category>("/category").wrap(guard()))
                .service(catalog::scope::<Streaming>("/streaming").wrap(guard()))
                .service(movie::scope().wrap(guard())),
        );
}

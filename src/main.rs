mod auth;
mod config;
mod database;
mod dto;
mod error;
mod middleware;
mod model;
mod routes;
mod service;
mod token;

use actix_web::{middleware::Logger, App, HttpServer};
use config::Config;
use log::info;
use service::Services;
use std::io;

fn startup_error<E: std::fmt::Display>(err: E, message: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", message, err))
}

#[actix_rt::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("movieflix=debug,actix_web=info"),
    )
    .init();

    let config = Config::from_env().map_err(|err| startup_error(err, "Configuration error"))?;
    let db = config
        .open_database()
        .map_err(|err| startup_error(err, "Database error"))?;
    let services = Services::new(db, &config.secret, config.bcrypt_cost);

    info!("listening on {}", config.bind);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| routes::configure(cfg, &services))
    })
    .bind(&config.bind)?
    .run()
    .await
}

use crate::auth::{AuthenticationError, AuthenticationManager};
use crate::dto::{LoginRequest, LoginResponse, UserRequest, UserResponse};
use crate::error::AppError;
use crate::model::NewUser;
use crate::service::UserService;
use crate::token::TokenService;
use actix_web::{web, HttpResponse, Scope};

pub fn scope() -> Scope {
    web::scope("/auth")
        .route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
}

async fn register(
    users: web::Data<UserService>,
    request: web::Json<UserRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let new_user: NewUser = request.into_inner().into();
    // Hashing runs on the blocking pool.
    let user = web::block(move || users.save_user(new_user)).await??;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

async fn login(
    authentication: web::Data<AuthenticationManager>,
    tokens: web::Data<TokenService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { email, password } = request.into_inner();
    let user = web::block(move || authentication.authenticate(&email, &password))
        .await?
        .map_err(|err| match err {
            AuthenticationError::BadCredentials => AppError::InvalidCredentials,
            AuthenticationError::Internal(err) => err,
        })?;
    let token = tokens.issue(&user)?;
    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

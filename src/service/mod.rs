mod catalog;
mod movie;
mod user;

pub use catalog::{CatalogService, CategoryService, StreamingService};
pub use movie::MovieService;
pub use user::UserService;

use crate::auth::AuthenticationManager;
use crate::token::TokenService;

/// Everything the request handlers need, wired in dependency order.
#[derive(Clone)]
pub struct Services {
    pub categories: CategoryService,
    pub streamings: StreamingService,
    pub users: UserService,
    pub movies: MovieService,
    pub authentication: AuthenticationManager,
    pub tokens: TokenService,
}

impl Services {
    pub fn new(db: sled::Db, secret: &str, bcrypt_cost: u32) -> Self {
        let categories = CategoryService::new(db.clone());
        let streamings = StreamingService::new(db.clone());
        let users = UserService::new(db.clone(), bcrypt_cost);
        let movies = MovieService::new(db);
        let authentication = AuthenticationManager::new(users.clone());
        Services {
            categories,
            streamings,
            users,
            movies,
            authentication,
            tokens: TokenService::new(secret),
        }
    }
}

//! 用户

pub mod api;
mod model;
mod repository;
mod service;

pub use model::{LoginRequest, NewUser, SignUpRequest, UpdateUserRequest, User, UsersOverview};
pub use repository::{PgUserRepository, UserRepository};
pub use service::UserService;

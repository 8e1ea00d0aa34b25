pub mod base;
pub mod error;
pub mod refresh_token_dao;
pub mod todo_dao;
pub mod user_dao;

pub use base::DaoBase;
pub use error::{DaoLayerError, DaoResult};
pub use refresh_token_dao::RefreshTokenDao;
pub use todo_dao::{TodoChanges, TodoDao};
pub use user_dao::UserDao;

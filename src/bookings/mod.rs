pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod state_machine;

pub use error::*;
pub use handlers::*;
pub use models::*;
pub use repository::*;
pub use service::*;
pub use state_machine::*;

pub mod catalog;
pub mod error;
pub mod files;
pub mod handlers;
pub mod history;
pub mod middleware;
pub mod resolve;
pub mod routes;

pub use routes::create_router;

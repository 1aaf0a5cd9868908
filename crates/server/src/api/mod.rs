pub mod handlers;
pub mod rank;
pub mod routes;

pub use routes::create_router;

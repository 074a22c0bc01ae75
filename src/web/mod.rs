pub mod error;
pub mod pages;
pub mod route;

pub use error::WebError;
pub use route::create_router;

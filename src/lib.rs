// Library exports for testing
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod models;
pub mod query;
pub mod service;
pub mod store;
pub mod validation;

pub use self::config::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use models::*;
pub use service::*;
pub use store::*;
pub use validation::*;

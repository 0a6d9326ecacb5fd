mod error;
mod log;
pub mod midware;
pub mod routes;
mod serve;
pub mod types;

pub use error::{ClientError, Error, Result};
pub use serve::serve;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

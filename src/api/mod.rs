pub mod api_football;

pub use api_football::{ApiError, ApiFootballClient};

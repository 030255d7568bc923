pub mod error;
pub mod server;

pub use error::ApiError;
pub use server::{SurveyServer, router};

pub mod error;
pub mod university_service;
pub mod user_service;
pub mod validation;

pub use error::ServiceError;
pub use university_service::UniversityService;
pub use user_service::{Credentials, UserService};

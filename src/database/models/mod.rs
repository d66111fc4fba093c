pub mod university;
pub mod user;

pub use university::{LifecycleState, NewUniversity, University, UniversityPatch};
pub use user::UserAccount;

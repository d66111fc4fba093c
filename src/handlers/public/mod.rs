// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition, read-only university access and service status.

pub mod auth;
pub mod status;
pub mod university;

pub use auth::{login_post, register_post};
pub use status::{health, root};
pub use university::{university_list, university_show};

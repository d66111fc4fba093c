// handlers/protected/mod.rs - Handlers behind `jwt_auth_middleware`
//
// Every handler here receives the verified `AuthUser` as a request extension.

pub mod university;

pub use university::{
    university_bookmark, university_create, university_delete, university_restore, university_update,
};

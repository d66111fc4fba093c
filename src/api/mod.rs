pub mod format;

pub use format::{UniversityPageView, UniversityView};

pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod page;
pub mod types;

pub use error::FilterError;
pub use filter::FilterCompiler;
pub use page::{Page, PageRequest, PagedResultAssembler, Pagination};
pub use types::*;

pub mod config;
pub mod domain;
pub mod errors;
pub mod search;

pub use domain::product::{NewProduct, Product, ProductId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use search::{Keyword, PageRequest, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

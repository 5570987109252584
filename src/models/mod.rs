//! Data models for the catalog

pub mod author;
pub mod book_instance;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book_instance::{BookInstance, LoanStatus};
pub use user::{AccountType, UserClaims};

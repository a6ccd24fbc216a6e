pub mod error;
pub mod video;

pub use error::ReorderError;

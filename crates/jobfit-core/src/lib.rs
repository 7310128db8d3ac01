pub mod config;
pub mod error;
pub mod normalize;
pub mod similarity;
pub mod traits;
pub mod types;

pub use error::{Error, Result};

pub mod error;
pub mod export;
pub mod gate;
pub mod intent;
pub mod io;
pub mod paths;
pub mod plan;
pub mod progression;
pub mod store;
pub mod types;
pub mod validate;

pub use error::{MandalaError, Result};

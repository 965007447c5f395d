pub mod agent;
pub mod backup;
pub mod bundle;
pub mod cheatsheet;
pub mod compress;
pub mod config;
pub mod diagnostics;
pub mod docs;
pub mod error;
pub mod extract;
pub mod fields;
pub mod io;
pub mod paths;
pub mod prompt;
pub mod standards;

pub use error::{BmadError, Result};

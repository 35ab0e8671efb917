pub mod errors;
pub mod filters;
mod loader;
pub mod model;

pub use errors::LoaderError;
pub use filters::{FilterMode, RowFilter};
pub use loader::{load, load_from_reader, load_str, LoadConfig};
pub use model::{LoadReport, LoadedSeries};
pub use polars::prelude::DataFrame;

#[cfg(test)]
mod tests;

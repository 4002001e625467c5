//! File I/O, validation, and serialization for the tempo pipeline.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{SeriesFormat, SessionName};
pub use error::IoError;
pub use reader::{KeypointReader, SeriesReader};
pub use writer::ReportWriter;

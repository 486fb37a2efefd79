use thiserror::Error;

use crate::routing::raptor::RaptorError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("Routing error: {0}")]
    Raptor(#[from] RaptorError),
}

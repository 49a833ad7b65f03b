pub mod config;
pub mod logging;

pub mod cdx;
pub mod domains;
pub mod error;
pub mod retry;
pub mod scheduler;
pub mod snapshot;
pub mod storage;
pub mod transport;
pub mod url_model;

// stride-api: Async REST client for the stride running-club server

pub mod error;
pub mod rest;
pub mod transport;

pub use error::Error;
pub use rest::{Page, PageQuery, RestClient, TOTAL_COUNT_HEADER};
pub use transport::{TlsMode, TransportConfig};

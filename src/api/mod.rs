// myQuran API module.
// Provides the cached request dispatcher, the HTTP transport and typed endpoint methods.

pub mod api_types;
pub mod client;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod transport;

pub use client::MyQuranClient;
pub use dispatcher::{Dispatcher, RequestOptions, DEFAULT_CACHE_SECONDS};
pub use error::ApiError;
pub use transport::{HttpTransport, Transport};

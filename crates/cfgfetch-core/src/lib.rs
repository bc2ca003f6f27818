pub mod config;
pub mod logging;

pub mod client;
pub mod control;
pub mod error;
pub mod extract;
pub mod getter;
pub mod transport;
pub mod yamlpath;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{Client, ClientContext, ClientMode};
pub use control::CancelToken;
pub use error::GetError;
pub use extract::ExtractGetter;
pub use getter::{Getter, HttpGetter, HttpGetterOptions};

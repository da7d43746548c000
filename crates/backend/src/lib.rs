#![forbid(unsafe_code)]

pub mod cache;
pub mod config;
pub mod gateway;
pub mod http;
pub mod identity;

pub use cache::FallbackCache;
pub use config::{AuthMode, GatewayConfig};
pub use gateway::{ProgressFilter, RemoteGateway};
pub use http::HttpGateway;
pub use identity::{CallerIdentity, IdentityProvider, StaticIdentity};

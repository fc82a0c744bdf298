// jsonrpc-protocol/src/lib.rs
pub mod constants;
pub mod context;
pub mod error;
pub mod request;
pub mod response;
pub mod spec;

// Re-export commonly used items
pub use constants::PROTOCOL_VERSION;
pub use context::RpcContext;
pub use error::{ErrorObject, PresetError};
pub use request::Request;
pub use response::Response;
pub use spec::{AnyVersion, ContextBuilder, Specification};

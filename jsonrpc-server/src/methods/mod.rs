// jsonrpc-server/src/methods/mod.rs
pub mod echo;

pub use echo::EchoMethod;

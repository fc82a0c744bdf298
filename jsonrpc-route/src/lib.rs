// jsonrpc-route/src/lib.rs
pub mod route;

pub use route::{route_mapper, HttpRoute, RouteError};

pub use jsonrpc_server;

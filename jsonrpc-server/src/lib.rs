// jsonrpc-server/src/lib.rs
pub mod dispatch;
pub mod handler;
pub mod methods;

pub use dispatch::{Dispatcher, DispatcherBuilder};
pub use handler::params;
pub use handler::{HandlerMapper, Matcher, MethodMapper, Params, ParamsDecoder, RpcMethod};
pub use methods::EchoMethod;

pub use jsonrpc_protocol;

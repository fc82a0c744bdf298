// jsonrpc-protocol/src/constants.rs

/// The protocol version this engine speaks by default
pub const PROTOCOL_VERSION: &str = "2.0";

/// JSON-RPC error codes
pub mod error_codes {
    // Codes from -32768 to -32000 are reserved for pre-defined errors
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

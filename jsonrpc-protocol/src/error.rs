// jsonrpc-protocol/src/error.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::constants::error_codes;

/// The preset errors defined by the JSON-RPC 2.0 specification.
///
/// Every protocol failure the engine produces on its own maps to one of
/// these; handler code may attach custom codes through [`ErrorObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetError {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
}

impl PresetError {
    pub fn code(&self) -> i32 {
        match self {
            PresetError::ParseError => error_codes::PARSE_ERROR,
            PresetError::InvalidRequest => error_codes::INVALID_REQUEST,
            PresetError::MethodNotFound => error_codes::METHOD_NOT_FOUND,
            PresetError::InvalidParams => error_codes::INVALID_PARAMS,
            PresetError::InternalError => error_codes::INTERNAL_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PresetError::ParseError => "Parse error",
            PresetError::InvalidRequest => "Invalid Request",
            PresetError::MethodNotFound => "Method not found",
            PresetError::InvalidParams => "Invalid params",
            PresetError::InternalError => "Internal error",
        }
    }
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// The `error` member of a failure response.
///
/// `data` is server-defined and omitted from the wire form when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    pub fn new(code: i32, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }

    /// A preset error enriched with a server-defined `data` value.
    pub fn with_data(preset: PresetError, data: Value) -> Self {
        Self::new(preset.code(), preset.message(), Some(data))
    }
}

impl From<PresetError> for ErrorObject {
    fn from(preset: PresetError) -> Self {
        Self::new(preset.code(), preset.message(), None)
    }
}

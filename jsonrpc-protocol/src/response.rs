// jsonrpc-protocol/src/response.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::PROTOCOL_VERSION;
use crate::error::{ErrorObject, PresetError};
use crate::request::Request;

fn default_version() -> String {
    PROTOCOL_VERSION.to_string()
}

/// Accepts the id forms the wire allows (string, number, null) and keeps
/// the engine-wide decimal-string normalization for numbers.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id)),
        Some(Value::Number(id)) => Ok(Some(id.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid response id: {other}"
        ))),
    }
}

/// The outcome of one JSON-RPC call.
///
/// A response is either a success or a failure, never both: the wire form
/// carries exactly one of `result` and `error`.
///
/// ```json
/// {"jsonrpc": "2.0", "result": "success data", "id": "0"}
/// {"jsonrpc": "2.0", "error": {"code": -32602, "message": "Invalid params"}, "id": 1}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Success {
        #[serde(default = "default_version")]
        jsonrpc: String,
        result: Value,
        #[serde(default, deserialize_with = "deserialize_id")]
        id: Option<String>,
    },
    Failure {
        #[serde(default = "default_version")]
        jsonrpc: String,
        error: ErrorObject,
        #[serde(default, deserialize_with = "deserialize_id")]
        id: Option<String>,
    },
}

impl Response {
    /// Success response mirroring the originating request's version and id.
    /// Without a request (or without an id on it) the defaults "2.0" and
    /// "0" apply.
    pub fn success(result: Value, request: Option<&Request>) -> Self {
        Response::Success {
            jsonrpc: request
                .map(|request| request.version().to_string())
                .unwrap_or_else(default_version),
            result,
            id: Some(
                request
                    .and_then(Request::id)
                    .unwrap_or("0")
                    .to_string(),
            ),
        }
    }

    /// Failure response for a preset error, carrying the default id "0".
    /// This is the form validation-stage failures take, where no request
    /// id has been read yet.
    pub fn error(preset: PresetError) -> Self {
        Self::failure(preset.into(), Some("0"))
    }

    /// Failure response for a preset error keyed to a known request id.
    pub fn error_with_id(preset: PresetError, id: Option<&str>) -> Self {
        Self::failure(preset.into(), id)
    }

    /// Failure response with full control over the error object.
    pub fn failure(error: ErrorObject, id: Option<&str>) -> Self {
        Response::Failure {
            jsonrpc: default_version(),
            error,
            id: id.map(|id| id.to_string()),
        }
    }

    /// Re-parses a serialized response, e.g. one relayed from a remote
    /// endpoint. Returns `None` when the text is not a response object.
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    pub fn version(&self) -> &str {
        match self {
            Response::Success { jsonrpc, .. } | Response::Failure { jsonrpc, .. } => jsonrpc,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Response::Success { id, .. } | Response::Failure { id, .. } => id.as_deref(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    /// The `result` member, for success responses.
    pub fn result(&self) -> Option<&Value> {
        match self {
            Response::Success { result, .. } => Some(result),
            Response::Failure { .. } => None,
        }
    }

    /// The `error` member, for failure responses.
    pub fn error_info(&self) -> Option<&ErrorObject> {
        match self {
            Response::Success { .. } => None,
            Response::Failure { error, .. } => Some(error),
        }
    }

    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_mirrors_the_request_id() {
        let request = Request::of("adder", Some(&vec![1, 2]), Some("12")).unwrap();
        let response = Response::success(json!(3), Some(&request));

        assert!(response.is_success());
        assert_eq!(response.id(), Some("12"));
        assert_eq!(response.version(), "2.0");
        assert_eq!(response.result(), Some(&json!(3)));
    }

    #[test]
    fn success_without_a_request_uses_defaults() {
        let response = Response::success(json!("ok"), None);

        assert_eq!(response.id(), Some("0"));
        assert_eq!(response.version(), "2.0");
    }

    #[test]
    fn wire_form_carries_exactly_one_of_result_and_error() {
        let success: Value =
            serde_json::from_str(&Response::success(json!(1), None).to_json().unwrap()).unwrap();
        let failure: Value =
            serde_json::from_str(&Response::error(PresetError::InvalidRequest).to_json().unwrap())
                .unwrap();

        assert!(success.get("result").is_some());
        assert!(success.get("error").is_none());
        assert!(failure.get("error").is_some());
        assert!(failure.get("result").is_none());
    }

    #[test]
    fn failure_keeps_the_preset_code_and_message() {
        let response = Response::error_with_id(PresetError::MethodNotFound, Some("9"));
        let error = response.error_info().unwrap();

        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "Method not found");
        assert_eq!(response.id(), Some("9"));
    }

    #[test]
    fn failure_without_an_id_serializes_a_null_id() {
        let json = Response::error_with_id(PresetError::MethodNotFound, None)
            .to_json()
            .unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["id"], Value::Null);
    }

    #[test]
    fn from_json_round_trips_both_variants() {
        let success = Response::success(json!({"answer": 42}), None);
        let failure = Response::failure(
            ErrorObject::with_data(PresetError::InvalidParams, json!("username is required")),
            Some("1"),
        );

        let success_back = Response::from_json(&success.to_json().unwrap()).unwrap();
        let failure_back = Response::from_json(&failure.to_json().unwrap()).unwrap();

        assert_eq!(success, success_back);
        assert_eq!(failure, failure_back);
    }

    #[test]
    fn from_json_tolerates_a_bare_result_object() {
        let response = Response::from_json(r#"{"result": [1, 2, 3]}"#).unwrap();

        assert!(response.is_success());
        assert_eq!(response.version(), "2.0");
        assert_eq!(response.id(), None);
    }

    #[test]
    fn from_json_normalizes_numeric_ids() {
        let response = Response::from_json(r#"{"jsonrpc": "2.0", "result": 5, "id": 17}"#).unwrap();

        assert_eq!(response.id(), Some("17"));
    }

    #[test]
    fn from_json_rejects_a_shapeless_object() {
        assert!(Response::from_json(r#"{"jsonrpc": "2.0", "id": 1}"#).is_none());
        assert!(Response::from_json("not json").is_none());
    }

    #[test]
    fn result_round_trips_through_the_json_layer() {
        for value in [json!(42), json!({"a": [1, 2], "b": "x"}), json!([1, "two", null])] {
            let response = Response::success(value.clone(), None);
            let reparsed = Response::from_json(&response.to_json().unwrap()).unwrap();

            assert_eq!(reparsed.result(), Some(&value));
        }
    }
}

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode, Uri},
};
use serde::de::{DeserializeOwned, Error as _};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::admin::error::AdminError;
use crate::admin::AdminState;

/// Payload for `POST /dynamic-router/add`. Absent fields decode as `""`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddRequest {
    pub host: String,
    pub upstream: String,
}

/// Payload for `POST /dynamic-router/delete`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteRequest {
    pub host: String,
}

/// Decode an admin payload leniently.
///
/// Only the first JSON value is read and trailing bytes are ignored. Keys
/// match field names case-insensitively, `null` fields are skipped and a
/// top-level `null` yields the default payload. Anything that is not an
/// object (or `null`) is rejected.
pub fn decode_payload<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, serde_json::Error> {
    let first = serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .next()
        .unwrap_or_else(|| Err(serde_json::Error::custom("EOF")))?;

    match first {
        Value::Null => Ok(T::default()),
        Value::Object(fields) => {
            let folded: Map<String, Value> = fields
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect();
            serde_json::from_value(Value::Object(folded))
        }
        other => Err(serde_json::Error::custom(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Endpoints under the admin namespace, matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Add,
    Delete,
}

impl Endpoint {
    pub fn parse(segment: &str) -> Option<Self> {
        if segment.eq_ignore_ascii_case("add") {
            Some(Endpoint::Add)
        } else if segment.eq_ignore_ascii_case("delete") {
            Some(Endpoint::Delete)
        } else {
            None
        }
    }
}

/// POST handler for every path under the namespace.
pub async fn handle_endpoint(
    State(state): State<AdminState>,
    Path(endpoint): Path<String>,
    uri: Uri,
    body: Bytes,
) -> Result<StatusCode, AdminError> {
    match Endpoint::parse(&endpoint) {
        Some(Endpoint::Add) => {
            let req: AddRequest = decode_payload(&body)?;
            tracing::info!(host = %req.host, upstream = %req.upstream, "Adding route");
            state.table.add(req.host, req.upstream);
            Ok(StatusCode::OK)
        }
        Some(Endpoint::Delete) => {
            let req: DeleteRequest = decode_payload(&body)?;
            tracing::info!(host = %req.host, "Deleting route");
            state.table.delete(&req.host);
            Ok(StatusCode::OK)
        }
        None => Err(AdminError::NotFound(uri.path().to_string())),
    }
}

/// Non-POST requests under the namespace: 405 for known endpoints, else 404.
pub async fn reject_method(
    Path(endpoint): Path<String>,
    method: Method,
    uri: Uri,
) -> AdminError {
    match Endpoint::parse(&endpoint) {
        Some(_) => AdminError::MethodNotAllowed(method.to_string()),
        None => AdminError::NotFound(uri.path().to_string()),
    }
}

/// Anything outside `/dynamic-router/{endpoint}`.
pub async fn not_found(uri: Uri) -> AdminError {
    AdminError::NotFound(uri.path().to_string())
}

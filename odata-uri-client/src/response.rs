//! Response decoding.

use odata_uri::ResponseKind;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use crate::{ClientError, TransportResponse};

/// Decoded result of a service call.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Payload, with the `{"d": ...}` envelope removed
    pub data: Value,
    /// `DataServiceVersion` reported by the service, without the trailing `;`
    pub version: Option<String>,
    /// `ETag` reported by the service
    pub etag: Option<String>,
    /// HTTP status code
    pub status: u16,
}

impl QueryResult {
    /// Decodes a transport response.
    ///
    /// `kind` selects how the body is read: a `$count` response is parsed as
    /// an integer, a `$value` response is kept as a string, everything else
    /// is parsed as JSON. An empty body decodes to `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Status` for a non-`2xx` status and
    /// `ClientError::InvalidBody` if a JSON body does not parse.
    pub fn from_response(
        response: TransportResponse,
        kind: ResponseKind,
    ) -> Result<Self, ClientError> {
        if !response.is_success() {
            return Err(ClientError::Status {
                status: response.status,
                body: response.body,
            });
        }

        let version = response
            .header("DataServiceVersion")
            .map(|v| v.replace(';', ""));
        let etag = response.header("ETag").map(str::to_string);
        let data = decode_body(&response.body, kind)?;

        trace!(status = response.status, ?kind, ?version, "decoded response");

        Ok(Self {
            data,
            version,
            etag,
            status: response.status,
        })
    }

    /// Returns the entries of a collection response.
    ///
    /// Handles both the bare array form and the `{"results": [...]}` form
    /// used with `$inlinecount`.
    #[must_use]
    pub fn results(&self) -> Option<&[Value]> {
        match &self.data {
            Value::Array(entries) => Some(entries),
            Value::Object(map) => map.get("results")?.as_array().map(Vec::as_slice),
            _ => None,
        }
    }

    /// Returns the `__count` reported with `$inlinecount=allpages`.
    #[must_use]
    pub fn inline_count(&self) -> Option<u64> {
        match self.data.get("__count")? {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    /// Returns the count of a `$count` response.
    #[must_use]
    pub fn count(&self) -> Option<u64> {
        self.data.as_u64()
    }

    /// Deserializes the payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBody` if the payload does not match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(T::deserialize(&self.data)?)
    }
}

fn decode_body(body: &str, kind: ResponseKind) -> Result<Value, ClientError> {
    if body.is_empty() {
        return Ok(Value::Null);
    }

    match kind {
        ResponseKind::Text => Ok(body
            .trim()
            .parse::<i64>()
            .map_or_else(|_| Value::String(body.to_string()), Value::from)),
        ResponseKind::Raw => Ok(Value::String(body.to_string())),
        ResponseKind::Json => {
            let value: Value = serde_json::from_str(body)?;
            Ok(unwrap_envelope(value))
        }
    }
}

fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("d") => {
            map.remove("d").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn decode(response: TransportResponse, kind: ResponseKind) -> QueryResult {
        QueryResult::from_response(response, kind).unwrap()
    }

    #[test]
    fn json_envelope_unwrapped() {
        let result = decode(
            TransportResponse::ok(r#"{"d":[{"ID":0},{"ID":1}]}"#),
            ResponseKind::Json,
        );
        assert_eq!(result.data, json!([{"ID": 0}, {"ID": 1}]));
        assert_eq!(result.results().map(<[Value]>::len), Some(2));
    }

    #[test]
    fn json_without_envelope_kept() {
        let result = decode(TransportResponse::ok(r#"{"ID":7}"#), ResponseKind::Json);
        assert_eq!(result.data, json!({"ID": 7}));
        assert!(result.results().is_none());
    }

    #[test]
    fn inlinecount_results() {
        let body = r#"{"d":{"results":[{"ID":0}],"__count":"9"}}"#;
        let result = decode(TransportResponse::ok(body), ResponseKind::Json);
        assert_eq!(result.inline_count(), Some(9));
        assert_eq!(result.results().unwrap()[0], json!({"ID": 0}));
    }

    #[test]
    fn count_body_is_integer() {
        let result = decode(TransportResponse::ok("9\n"), ResponseKind::Text);
        assert_eq!(result.data, json!(9));
        assert_eq!(result.count(), Some(9));
    }

    #[test]
    fn non_numeric_text_kept_as_string() {
        let result = decode(TransportResponse::ok("many"), ResponseKind::Text);
        assert_eq!(result.data, json!("many"));
        assert_eq!(result.count(), None);
    }

    #[test]
    fn raw_value_is_string() {
        let result = decode(TransportResponse::ok("{not json"), ResponseKind::Raw);
        assert_eq!(result.data, json!("{not json"));
    }

    #[test]
    fn empty_body_is_null() {
        let result = decode(TransportResponse::new(204, ""), ResponseKind::Json);
        assert_eq!(result.data, Value::Null);
        assert_eq!(result.status, 204);
    }

    #[test]
    fn headers_captured() {
        let response = TransportResponse::ok("{}")
            .with_header("DataServiceVersion", "2.0;")
            .with_header("ETag", "W/\"5\"");
        let result = decode(response, ResponseKind::Json);
        assert_eq!(result.version.as_deref(), Some("2.0"));
        assert_eq!(result.etag.as_deref(), Some("W/\"5\""));
    }

    #[test]
    fn error_status() {
        let err = QueryResult::from_response(
            TransportResponse::new(404, "Resource not found"),
            ResponseKind::Json,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ClientError::Status {
                status: 404,
                body: "Resource not found".to_string()
            }
        );
    }

    #[test]
    fn malformed_json() {
        let err = QueryResult::from_response(TransportResponse::ok("{"), ResponseKind::Json)
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidBody { .. }));
    }

    #[test]
    fn deserialize_payload() {
        #[derive(serde::Deserialize)]
        struct Product {
            #[serde(rename = "ID")]
            id: u32,
        }

        let result = decode(TransportResponse::ok(r#"{"d":{"ID":3}}"#), ResponseKind::Json);
        let product: Product = result.deserialize().unwrap();
        assert_eq!(product.id, 3);
        assert!(result.deserialize::<Vec<Product>>().is_err());
    }
}

//! Normalization of transport responses.
//!
//! Every operation funnels through [`normalize`]: decode the payload, then
//! split on status. Anything below 400 resolves to an `ApiResponse`; 400 and
//! above becomes `ApiError::Application`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ApplicationFailure};
use crate::http::{find_header, Payload, TransportResponse};
use crate::util;

/// First status classified as a failure.
pub const FAILURE_STATUS: u16 = 400;

/// Status line and headers of a received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMeta {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl ResponseMeta {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Successful outcome of a gateway call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub res: ResponseMeta,
    pub body: Value,
}

impl ApiResponse {
    pub fn status(&self) -> u16 {
        self.res.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.res.header(name)
    }

    /// Decode the body into a typed view.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        T::deserialize(&self.body).map_err(ApiError::Decode)
    }

    /// Value of a cookie set by this response.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.res
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("set-cookie"))
            .filter_map(|(_, v)| v.split(';').next())
            .filter_map(|pair| util::parse_cookies(pair).remove(name))
            .last()
    }
}

/// Turn a transport response into the gateway's result.
pub fn normalize(response: TransportResponse) -> Result<ApiResponse, ApiError> {
    let TransportResponse { status, headers, body } = response;

    if status >= FAILURE_STATUS {
        return Err(ApiError::Application(ApplicationFailure {
            status,
            body: decode_lenient(body),
            headers,
        }));
    }

    Ok(ApiResponse {
        res: ResponseMeta { status, headers },
        body: decode(body)?,
    })
}

fn decode(payload: Payload) -> Result<Value, ApiError> {
    match payload {
        Payload::Structured(value) => Ok(value),
        Payload::Raw(text) if text.trim().is_empty() => Ok(Value::Null),
        Payload::Raw(text) => serde_json::from_str(&text).map_err(ApiError::Decode),
    }
}

/// Error bodies never fail to decode; non-JSON text is kept as a string.
fn decode_lenient(payload: Payload) -> Value {
    match payload {
        Payload::Structured(value) => value,
        Payload::Raw(text) if text.trim().is_empty() => Value::Null,
        Payload::Raw(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
    }
}

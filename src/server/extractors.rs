//! Custom extractors for the HTTP server.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Rejection type for `MsgPackBody`
pub struct BodyRejection {
    status: StatusCode,
    message: String,
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        let body = crate::error::ErrorResponse {
            error: crate::error::ErrorDetail {
                code: "DESERIALIZATION_ERROR",
                message: self.message.clone(),
            },
        };

        match rmp_serde::to_vec_named(&body) {
            Ok(bytes) => (
                self.status,
                [("content-type", "application/msgpack")],
                bytes,
            )
                .into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}

/// Request body encoding, chosen by content type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyFormat {
    MsgPack,
    Json,
}

impl BodyFormat {
    /// A missing content type is treated as `MessagePack`
    fn from_content_type(content_type: &str) -> Option<Self> {
        if content_type.is_empty() || content_type.contains("msgpack") {
            Some(BodyFormat::MsgPack)
        } else if content_type.contains("json") {
            Some(BodyFormat::Json)
        } else {
            None
        }
    }
}

/// Extractor for `MessagePack` request bodies.
///
/// Accepts `application/msgpack` and `application/x-msgpack`. Browser
/// front-ends may send `application/json` instead; responses are always
/// `MessagePack`.
pub struct MsgPackBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for MsgPackBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let format = BodyFormat::from_content_type(&content_type).ok_or_else(|| BodyRejection {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: format!(
                "Invalid content type: expected application/msgpack or application/json, got {content_type}"
            ),
        })?;

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| BodyRejection {
                status: e.status(),
                message: format!("Failed to read request body: {e}"),
            })?;

        match format {
            BodyFormat::MsgPack => rmp_serde::from_slice(&bytes).map_err(|e| BodyRejection {
                status: StatusCode::BAD_REQUEST,
                message: format!("Failed to deserialize MessagePack: {e}"),
            }),
            BodyFormat::Json => serde_json::from_slice(&bytes).map_err(|e| BodyRejection {
                status: StatusCode::BAD_REQUEST,
                message: format!("Failed to deserialize JSON: {e}"),
            }),
        }
        .map(MsgPackBody)
    }
}

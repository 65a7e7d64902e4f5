pub mod items;
pub mod suppliers;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{StatusCode, Uri},
    Json,
};
use serde_json::{json, Map, Value};

use crate::error::{AppError, AppResult};

pub async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "service": "inventory-api" })))
}

/// Fallback for unknown paths behind the auth gate.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Ids are integers; anything else cannot name an existing row.
pub(crate) fn parse_id(raw: &str, resource: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("{} {} not found", resource, raw)))
}

/// Buffered request body, parsed on demand so handlers can look up their
/// target first. An empty body reads as `{}`.
#[derive(Debug, Clone)]
pub struct JsonBody(Bytes);

impl JsonBody {
    /// The body as a raw JSON value; validation then reports every field
    /// at once.
    pub fn value(&self) -> AppResult<Value> {
        if self.0.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Object(Map::new()));
        }

        serde_json::from_slice(&self.0)
            .map_err(|err| AppError::BadRequest(format!("JSON parse error - {}", err)))
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Bytes::from_request(req, state)
            .await
            .map(Self)
            .map_err(|rejection| match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(rejection.body_text()),
                _ => AppError::BadRequest(rejection.body_text()),
            })
    }
}

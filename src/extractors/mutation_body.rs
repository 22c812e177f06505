//! Write payload: a JSON object or multipart form fields, chosen by content type.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde_json::Value;

#[derive(Debug)]
pub enum MutationBody {
    Json(Value),
    /// `(field name, raw bytes)` in arrival order.
    Parts(Vec<(String, Vec<u8>)>),
}

#[async_trait]
impl<S> FromRequest<S> for MutationBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if is_multipart {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            let mut parts = Vec::new();
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?
            {
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                let bytes = field.bytes().await.map_err(|e| AppError::Validation(e.body_text()))?;
                parts.push((name, bytes.to_vec()));
            }
            return Ok(MutationBody::Parts(parts));
        }

        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        Ok(MutationBody::Json(value))
    }
}

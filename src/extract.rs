use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::{error::ApiError, validation::FieldError};

/// Path reported when the problem is the body as a whole.
pub const BODY_PATH: &str = "body";

/// JsonBody
///
/// Request-body extractor used in place of `axum::Json`. A body that cannot be
/// read, parsed or mapped onto `T` is rejected with the same 400
/// `{"errors": [...]}` shape as a validation failure. A value of the wrong type
/// is reported under its field path; serde's own message stays in the logs.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|err| {
            tracing::debug!("request body unreadable: {err}");
            body_error("Request body could not be read")
        })?;

        parse_body(&bytes).map(JsonBody)
    }
}

/// parse_body
///
/// Deserializes `bytes` into `T`, tracking the path of the value that failed.
pub fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);

    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        tracing::debug!("request body rejected: {err}");
        let path = err.path().to_string();
        match err.inner().classify() {
            Category::Data if path != "." => ApiError::BadInput(vec![FieldError {
                message: format!("{path} has an invalid type"),
                path,
            }]),
            Category::Data => body_error("Request body does not have the expected shape"),
            Category::Syntax | Category::Eof | Category::Io => {
                body_error("Request body is not valid JSON")
            }
        }
    })?;

    // Trailing characters after the document.
    deserializer
        .end()
        .map_err(|_| body_error("Request body is not valid JSON"))?;

    Ok(value)
}

fn body_error(message: &str) -> ApiError {
    ApiError::BadInput(vec![FieldError {
        path: BODY_PATH.to_string(),
        message: message.to_string(),
    }])
}

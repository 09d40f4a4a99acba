use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

/// Custom JSON extractor that provides better error messages
///
/// This wrapper catches JSON deserialization errors (including validation
/// errors from the amount deserializers) and formats them as standardized
/// JSON error responses instead of plain text.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ValidationJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidatedJson(value)),
            Err(rejection) => Err(ValidationJsonRejection(rejection)),
        }
    }
}

/// Custom rejection type that formats JSON errors as standardized responses
pub struct ValidationJsonRejection(JsonRejection);

impl IntoResponse for ValidationJsonRejection {
    fn into_response(self) -> Response {
        // `Display` on JsonRejection omits the inner serde error; `body_text()`
        // includes it, which the matching below relies on.
        let error_message = self.0.body_text();

        let (code, message) = if let Some(custom_msg) = error_message
            .split("Invalid amount:")
            .nth(1)
            .and_then(|s| s.split("at line").next())
            .map(|s| s.trim())
        {
            (
                "VALIDATION_INVALID_AMOUNT",
                format!("Invalid amount: {}", custom_msg),
            )
        } else if error_message.contains("missing field") {
            let field = error_message
                .split("missing field `")
                .nth(1)
                .and_then(|s| s.split('`').next())
                .unwrap_or("unknown");
            (
                "VALIDATION_MISSING_FIELD",
                format!("Missing required field: {}", field),
            )
        } else {
            (
                "VALIDATION_INVALID_INPUT",
                "Invalid request body".to_string(),
            )
        };

        tracing::warn!(
            error_code = code,
            error_message = %message,
            original_error = %error_message,
            "Request validation failed during JSON deserialization"
        );
        metrics::counter!("errors_total", "category" => "Validation", "code" => code)
            .increment(1);

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "category": "Validation",
            }
        }));

        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

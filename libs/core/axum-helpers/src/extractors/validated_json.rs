//! JSON extractor with automatic validation using the validator crate.

use axum::{
    extract::{FromRequest, Json, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::detail_response;

/// JSON extractor with automatic validation.
///
/// Deserializes the request body, then runs the `validator` crate's
/// `Validate` derive over it. Malformed JSON, unknown fields (on payloads
/// deriving `deny_unknown_fields`), and failed field validations all reject
/// with 400 and a `detail` message.
///
/// # Example
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct RegisterRequest {
///     #[validate(email)]
///     email: String,
///     password: String,
/// }
///
/// async fn register(ValidatedJson(payload): ValidatedJson<RegisterRequest>) { /* ... */ }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| detail_response(StatusCode::BAD_REQUEST, e.body_text()))?;

        data.validate().map_err(|e| {
            // Flatten field errors into one readable detail line
            let mut parts: Vec<String> = e
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let reasons: Vec<String> = errors
                        .iter()
                        .map(|err| {
                            err.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| err.code.to_string())
                        })
                        .collect();
                    format!("{}: {}", field, reasons.join(", "))
                })
                .collect();
            parts.sort();

            detail_response(
                StatusCode::BAD_REQUEST,
                format!("Validation failed: {}", parts.join("; ")),
            )
        })?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(email)]
        email: String,
        #[validate(length(min = 1))]
        name: String,
    }

    fn json_request(body: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_extracts() {
        let req = json_request(r#"{"email": "a@x.com", "name": "A"}"#);
        let result = ValidatedJson::<Payload>::from_request(req, &()).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap().0.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let req = json_request(r#"{"email": "nope", "name": "A"}"#);
        let result = ValidatedJson::<Payload>::from_request(req, &()).await;
        let response = result.err().unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let req = json_request("{not json");
        let result = ValidatedJson::<Payload>::from_request(req, &()).await;
        assert_eq!(result.err().unwrap().status(), StatusCode::BAD_REQUEST);
    }
}

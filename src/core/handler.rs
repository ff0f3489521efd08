use crate::core::{HttpResponse, Verifier};
use crate::utils::error::{Result, VerifierError};
use serde_json::{json, Value};
use std::collections::BTreeMap;

const EMAIL_REQUIRED: &str = "Email is required";
const INVALID_BODY: &str = "Invalid request body";
const INTERNAL_ERROR: &str = "Internal server error";

/// Request/response boundary around a [`Verifier`].
///
/// Every outcome becomes a response: client input problems are 400s, any
/// other failure is a 500 with no internal detail in the body.
pub struct RequestHandler<V: Verifier> {
    verifier: V,
}

impl<V: Verifier> RequestHandler<V> {
    pub fn new(verifier: V) -> Self {
        Self { verifier }
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    pub async fn handle(&self, body: Option<&str>) -> HttpResponse {
        match self.process(body).await {
            Ok(response) => response,
            Err(e) if e.is_client_error() => {
                tracing::warn!("Rejected request: {}", e);
                let message = match &e {
                    VerifierError::MissingEmail => EMAIL_REQUIRED,
                    _ => INVALID_BODY,
                };
                error_response(e.status_code(), message)
            }
            Err(e) => {
                tracing::error!("Verification failed: {}", e);
                error_response(500, INTERNAL_ERROR)
            }
        }
    }

    async fn process(&self, body: Option<&str>) -> Result<HttpResponse> {
        let email = parse_email(body)?;
        let outcome = self.verifier.verify(&email).await?;

        let result = serde_json::to_value(&outcome.verification)?;
        let payload = if outcome.cached {
            json!({ "cached": true, "result": result })
        } else {
            json!({ "result": result })
        };
        Ok(json_response(200, &payload))
    }
}

/// Pulls the required `email` field out of a JSON request body.
pub fn parse_email(body: Option<&str>) -> Result<String> {
    let raw = match body.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(VerifierError::MissingEmail),
    };

    let payload: Value = serde_json::from_str(raw).map_err(|e| VerifierError::InvalidRequest {
        message: e.to_string(),
    })?;
    let object = payload
        .as_object()
        .ok_or_else(|| VerifierError::InvalidRequest {
            message: "expected a JSON object".to_string(),
        })?;

    match object.get("email") {
        None | Some(Value::Null) => Err(VerifierError::MissingEmail),
        Some(Value::String(email)) if email.is_empty() => Err(VerifierError::MissingEmail),
        Some(Value::String(email)) => Ok(email.clone()),
        Some(_) => Err(VerifierError::InvalidRequest {
            message: "email must be a string".to_string(),
        }),
    }
}

pub fn cors_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        (
            "Access-Control-Allow-Credentials".to_string(),
            "true".to_string(),
        ),
        ("Content-Type".to_string(), "application/json".to_string()),
    ])
}

fn json_response(status_code: u16, payload: &Value) -> HttpResponse {
    HttpResponse {
        status_code,
        headers: cors_headers(),
        body: payload.to_string(),
    }
}

fn error_response(status_code: u16, message: &str) -> HttpResponse {
    json_response(status_code, &json!({ "error": message }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Verification, VerificationOutcome};
    use async_trait::async_trait;

    struct FixedVerifier {
        cached: bool,
    }

    #[async_trait]
    impl Verifier for FixedVerifier {
        async fn verify(&self, email: &str) -> Result<VerificationOutcome> {
            Ok(VerificationOutcome {
                verification: Verification::new(email).with_syntax(true),
                cached: self.cached,
            })
        }
    }

    struct FailingVerifier;

    #[async_trait]
    impl Verifier for FailingVerifier {
        async fn verify(&self, _email: &str) -> Result<VerificationOutcome> {
            Err(VerifierError::InternalError {
                message: "secret table name leaked".to_string(),
            })
        }
    }

    fn body_json(response: &HttpResponse) -> Value {
        serde_json::from_str(&response.body).unwrap()
    }

    #[test]
    fn test_parse_email() {
        assert_eq!(
            parse_email(Some(r#"{"email":"a@example.com"}"#)).unwrap(),
            "a@example.com"
        );
        assert!(matches!(parse_email(None), Err(VerifierError::MissingEmail)));
        assert!(matches!(parse_email(Some("  ")), Err(VerifierError::MissingEmail)));
        assert!(matches!(parse_email(Some("{}")), Err(VerifierError::MissingEmail)));
        assert!(matches!(
            parse_email(Some(r#"{"email":null}"#)),
            Err(VerifierError::MissingEmail)
        ));
        assert!(matches!(
            parse_email(Some(r#"{"email":""}"#)),
            Err(VerifierError::MissingEmail)
        ));
        assert!(matches!(
            parse_email(Some("{not json")),
            Err(VerifierError::InvalidRequest { .. })
        ));
        assert!(matches!(
            parse_email(Some(r#"["a@example.com"]"#)),
            Err(VerifierError::InvalidRequest { .. })
        ));
        assert!(matches!(
            parse_email(Some(r#"{"email":42}"#)),
            Err(VerifierError::InvalidRequest { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_email_is_bad_request() {
        let handler = RequestHandler::new(FixedVerifier { cached: false });

        let response = handler.handle(Some("{}")).await;

        assert_eq!(response.status_code, 400);
        assert_eq!(body_json(&response), json!({ "error": "Email is required" }));
    }

    #[tokio::test]
    async fn test_empty_body_is_bad_request() {
        let handler = RequestHandler::new(FixedVerifier { cached: false });

        let response = handler.handle(None).await;

        assert_eq!(response.status_code, 400);
        assert_eq!(body_json(&response)["error"], "Email is required");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let handler = RequestHandler::new(FixedVerifier { cached: false });

        let response = handler.handle(Some("{\"email\": ")).await;

        assert_eq!(response.status_code, 400);
        assert_eq!(body_json(&response)["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_fresh_result_has_no_cached_flag() {
        let handler = RequestHandler::new(FixedVerifier { cached: false });

        let response = handler.handle(Some(r#"{"email":"a@example.com"}"#)).await;

        assert_eq!(response.status_code, 200);
        let body = body_json(&response);
        assert!(body.get("cached").is_none());
        assert_eq!(body["result"]["email"], "a@example.com");
        assert_eq!(body["result"]["syntax"], true);
        assert_eq!(body["result"]["mxRecord"], false);
    }

    #[tokio::test]
    async fn test_cached_result_is_flagged() {
        let handler = RequestHandler::new(FixedVerifier { cached: true });

        let response = handler.handle(Some(r#"{"email":"a@example.com"}"#)).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(body_json(&response)["cached"], true);
    }

    #[tokio::test]
    async fn test_unexpected_failure_hides_details() {
        let handler = RequestHandler::new(FailingVerifier);

        let response = handler.handle(Some(r#"{"email":"a@example.com"}"#)).await;

        assert_eq!(response.status_code, 500);
        assert_eq!(body_json(&response), json!({ "error": "Internal server error" }));
        assert!(!response.body.contains("secret"));
    }

    #[tokio::test]
    async fn test_every_response_carries_cors_headers() {
        let handler = RequestHandler::new(FailingVerifier);

        for body in [None, Some(r#"{"email":"a@example.com"}"#)] {
            let response = handler.handle(body).await;
            assert_eq!(
                response.headers.get("Access-Control-Allow-Origin").map(String::as_str),
                Some("*")
            );
            assert_eq!(
                response
                    .headers
                    .get("Access-Control-Allow-Credentials")
                    .map(String::as_str),
                Some("true")
            );
        }
    }
}

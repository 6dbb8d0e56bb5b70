use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::model::{TrackingError, TrackingRequest, TrackingResult};
use crate::http::{self, HttpResponse};

/// Sends one tracking notification. Implementations must not fail past
/// their own boundary: every error becomes a [`TrackingResult::Failed`].
#[async_trait(?Send)]
pub trait Notifier {
    async fn notify(&self, request: &TrackingRequest) -> TrackingResult;
}

#[derive(Debug, Deserialize)]
struct Acknowledgement {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Turn a received response into a result.
///
/// A non-2xx status is only logged; if the body still carries `success`
/// it decides the outcome.
pub fn interpret_response(request: &TrackingRequest, response: &HttpResponse) -> TrackingResult {
    if !response.ok {
        warn!(
            "Datahub: {} tracking for dataset {} returned HTTP {}, continuing",
            request.action, request.dataset_id, response.status
        );
    }

    match response.json::<Acknowledgement>() {
        Ok(ack) => TrackingResult::Acknowledged {
            success: ack.success,
            message: ack.message,
        },
        Err(e) => TrackingResult::Failed(TrackingError::MalformedResponse(format!(
            "HTTP {}: {}",
            response.status, e
        ))),
    }
}

/// Notifier backed by `fetch`: `POST <prefix>/<id>/<action>` with an empty
/// JSON object.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    prefix: String,
}

impl HttpNotifier {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

#[async_trait(?Send)]
impl Notifier for HttpNotifier {
    async fn notify(&self, request: &TrackingRequest) -> TrackingResult {
        let url = request.endpoint(&self.prefix);
        match http::post_json(&url, "{}", request.csrf_token.as_deref()).await {
            Ok(response) => interpret_response(request, &response),
            Err(e) => {
                debug!("Datahub: POST {} did not complete: {}", url, e);
                TrackingResult::Failed(TrackingError::NetworkFailure(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::model::{DatasetId, TrackedAction};

    fn request() -> TrackingRequest {
        TrackingRequest {
            dataset_id: DatasetId::parse("42").unwrap(),
            action: TrackedAction::View,
            csrf_token: None,
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            ok: (200..300).contains(&status),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_success_body() {
        let result = interpret_response(&request(), &response(200, r#"{"success": true}"#));
        assert_eq!(
            result,
            TrackingResult::Acknowledged {
                success: true,
                message: None
            }
        );
    }

    #[test]
    fn test_rejection_carries_message() {
        let result = interpret_response(
            &request(),
            &response(200, r#"{"success": false, "message": "quota exceeded"}"#),
        );
        assert_eq!(
            result,
            TrackingResult::Acknowledged {
                success: false,
                message: Some("quota exceeded".to_string())
            }
        );
    }

    #[test]
    fn test_error_status_with_parseable_body_is_not_failed() {
        let result = interpret_response(
            &request(),
            &response(404, r#"{"success": false, "message": "Dataset not found"}"#),
        );
        assert!(matches!(
            result,
            TrackingResult::Acknowledged { success: false, .. }
        ));

        let result = interpret_response(&request(), &response(500, r#"{"success": true}"#));
        assert!(result.is_success());
    }

    #[test]
    fn test_unparseable_body_is_malformed() {
        let result = interpret_response(&request(), &response(502, "<html>Bad Gateway</html>"));
        match result {
            TrackingResult::Failed(TrackingError::MalformedResponse(reason)) => {
                assert!(reason.starts_with("HTTP 502"), "got {}", reason);
            }
            other => panic!("expected malformed response, got {:?}", other),
        }
    }

    #[test]
    fn test_body_without_success_field_is_malformed() {
        let result = interpret_response(&request(), &response(200, r#"{"message": "ok"}"#));
        assert!(matches!(
            result,
            TrackingResult::Failed(TrackingError::MalformedResponse(_))
        ));
    }
}

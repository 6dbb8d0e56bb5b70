use std::fmt;
use std::num::NonZeroU64;

use thiserror::Error;

/// What the user asked for when clicking a tracked link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedAction {
    View,
    Download,
}

impl TrackedAction {
    /// Path segment used by the backend route.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackedAction::View => "view",
            TrackedAction::Download => "download",
        }
    }
}

impl fmt::Display for TrackedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positive dataset identifier taken from `data-dataset-id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatasetId(NonZeroU64);

impl DatasetId {
    /// Parse an attribute value. Empty, zero, negative and non-numeric
    /// values are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<NonZeroU64>().ok().map(DatasetId)
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A clicked affordance, derived fresh from the DOM on every click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedLink {
    pub dataset_id: DatasetId,
    pub target_url: String,
    pub action: TrackedAction,
}

impl TrackedLink {
    pub fn request(&self, csrf_token: Option<String>) -> TrackingRequest {
        TrackingRequest {
            dataset_id: self.dataset_id,
            action: self.action,
            csrf_token,
        }
    }
}

/// One outbound notification. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingRequest {
    pub dataset_id: DatasetId,
    pub action: TrackedAction,
    pub csrf_token: Option<String>,
}

impl TrackingRequest {
    /// `/<prefix>/<id>/<action>`, e.g. `/dataset/42/view`.
    pub fn endpoint(&self, prefix: &str) -> String {
        format!(
            "{}/{}/{}",
            prefix.trim_end_matches('/'),
            self.dataset_id,
            self.action
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingError {
    #[error("tracked link has no usable data-dataset-id")]
    MissingIdentifier,

    #[error("tracking request did not complete: {0}")]
    NetworkFailure(String),

    #[error("server rejected tracking event: {}", .0.as_deref().unwrap_or("no message"))]
    ServerRejected(Option<String>),

    #[error("unreadable tracking response: {0}")]
    MalformedResponse(String),
}

/// Outcome of a [`TrackingRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingResult {
    Acknowledged {
        success: bool,
        message: Option<String>,
    },
    Failed(TrackingError),
}

impl TrackingResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TrackingResult::Acknowledged { success: true, .. })
    }

    /// The error to log for this result, if any.
    pub fn error(&self) -> Option<TrackingError> {
        match self {
            TrackingResult::Acknowledged { success: true, .. } => None,
            TrackingResult::Acknowledged {
                success: false,
                message,
            } => Some(TrackingError::ServerRejected(message.clone())),
            TrackingResult::Failed(err) => Some(err.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_id_parse() {
        assert_eq!(DatasetId::parse("42").map(|id| id.get()), Some(42));
        assert_eq!(DatasetId::parse(" 7 ").map(|id| id.get()), Some(7));
        assert!(DatasetId::parse("").is_none());
        assert!(DatasetId::parse("0").is_none());
        assert!(DatasetId::parse("-3").is_none());
        assert!(DatasetId::parse("abc").is_none());
        assert!(DatasetId::parse("4.2").is_none());
    }

    #[test]
    fn test_endpoint_shapes() {
        let request = TrackingRequest {
            dataset_id: DatasetId::parse("42").unwrap(),
            action: TrackedAction::View,
            csrf_token: None,
        };
        assert_eq!(request.endpoint("/dataset"), "/dataset/42/view");
        assert_eq!(request.endpoint("/food/dataset/"), "/food/dataset/42/view");

        let request = TrackingRequest {
            action: TrackedAction::Download,
            ..request
        };
        assert_eq!(request.endpoint("/dataset"), "/dataset/42/download");
    }

    #[test]
    fn test_result_error_mapping() {
        let ok = TrackingResult::Acknowledged {
            success: true,
            message: None,
        };
        assert!(ok.is_success());
        assert_eq!(ok.error(), None);

        let rejected = TrackingResult::Acknowledged {
            success: false,
            message: Some("quota exceeded".to_string()),
        };
        assert!(!rejected.is_success());
        assert_eq!(
            rejected.error(),
            Some(TrackingError::ServerRejected(Some("quota exceeded".to_string())))
        );

        let failed = TrackingResult::Failed(TrackingError::NetworkFailure("timeout".into()));
        assert_eq!(
            failed.error().map(|e| e.to_string()).as_deref(),
            Some("tracking request did not complete: timeout")
        );
    }

    #[test]
    fn test_server_rejected_display_without_message() {
        assert_eq!(
            TrackingError::ServerRejected(None).to_string(),
            "server rejected tracking event: no message"
        );
    }
}

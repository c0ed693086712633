//! Failure classification.
//!
//! All classification happens here, at the client boundary. The HTTP status
//! code is preferred when the transport provides one; the substring match on
//! raw error text is the fallback for transport-level strings that carry no
//! structured code.

use reqwest::StatusCode;
use solvesphere_core::solve::SolveFailure;

/// Classifies an HTTP error response from the model API.
pub(crate) fn classify_status(status: StatusCode, message: &str) -> SolveFailure {
    let message = message.to_string();
    match status {
        StatusCode::TOO_MANY_REQUESTS => SolveFailure::RateLimited(message),
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => SolveFailure::Overloaded(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SolveFailure::AuthFailure(message),
        // The API reports an invalid key as a 400 with an API_KEY detail.
        StatusCode::BAD_REQUEST if is_credential_text(&message) => {
            SolveFailure::AuthFailure(message)
        }
        _ if is_safety_text(&message) => SolveFailure::SafetyBlocked(message),
        _ => SolveFailure::Unknown(message),
    }
}

/// Classifies a raw error message with no structured status code.
pub fn classify_message(message: &str) -> SolveFailure {
    let lower = message.to_lowercase();
    let owned = message.to_string();

    if lower.contains("429")
        || lower.contains("quota")
        || lower.contains("rate limit")
        || lower.contains("resource_exhausted")
    {
        SolveFailure::RateLimited(owned)
    } else if lower.contains("503") || lower.contains("overloaded") || lower.contains("unavailable")
    {
        SolveFailure::Overloaded(owned)
    } else if is_safety_text(&lower) {
        SolveFailure::SafetyBlocked(owned)
    } else if lower.contains("401")
        || lower.contains("403")
        || is_credential_text(&lower)
        || lower.contains("permission denied")
        || lower.contains("unauthenticated")
    {
        SolveFailure::AuthFailure(owned)
    } else if lower.contains("network")
        || lower.contains("connection")
        || lower.contains("fetch")
        || lower.contains("timed out")
        || lower.contains("dns")
    {
        SolveFailure::NetworkFailure(owned)
    } else {
        SolveFailure::Unknown(owned)
    }
}

fn is_credential_text(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("api key") || lower.contains("api_key")
}

fn is_safety_text(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("safety") || lower.contains("blocked") || lower.contains("prohibited")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "quota exceeded"),
            SolveFailure::RateLimited(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE, "try later"),
            SolveFailure::Overloaded(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            SolveFailure::Overloaded(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, "no"),
            SolveFailure::AuthFailure(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, "no"),
            SolveFailure::AuthFailure(_)
        ));
    }

    #[test]
    fn test_invalid_key_is_an_auth_failure_despite_400() {
        assert!(matches!(
            classify_status(
                StatusCode::BAD_REQUEST,
                "INVALID_ARGUMENT: API key not valid. Please pass a valid API key."
            ),
            SolveFailure::AuthFailure(_)
        ));
    }

    #[test]
    fn test_safety_block_from_message_text() {
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST, "Request blocked by SAFETY settings"),
            SolveFailure::SafetyBlocked(_)
        ));
        assert!(matches!(
            classify_message("candidate was blocked due to safety"),
            SolveFailure::SafetyBlocked(_)
        ));
    }

    #[test]
    fn test_message_fallback_classification() {
        assert!(matches!(
            classify_message("got HTTP 429 from upstream"),
            SolveFailure::RateLimited(_)
        ));
        assert!(matches!(
            classify_message("model is overloaded"),
            SolveFailure::Overloaded(_)
        ));
        assert!(matches!(
            classify_message("connection refused"),
            SolveFailure::NetworkFailure(_)
        ));
        assert!(matches!(
            classify_message("completely novel explosion"),
            SolveFailure::Unknown(_)
        ));
    }

    #[test]
    fn test_unknown_keeps_the_raw_message() {
        match classify_message("completely novel explosion") {
            SolveFailure::Unknown(message) => assert_eq!(message, "completely novel explosion"),
            other => panic!("expected Unknown, got {other:?}"),
        }
    }
}

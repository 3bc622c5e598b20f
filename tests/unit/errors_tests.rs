/*!
 * Tests for error types and conversions
 */

use vidscribe::errors::{AppError, PipelineError, ProviderError, SubtitleError};

#[test]
fn test_from_status_shouldMapKnownCodes() {
    assert!(matches!(ProviderError::from_status(401, "bad key"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(403, "denied"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(429, "slow down"), ProviderError::RateLimitExceeded(_)));
    assert!(matches!(
        ProviderError::from_status(503, "down"),
        ProviderError::ApiError { status_code: 503, .. }
    ));
}

#[test]
fn test_pipeline_error_fromProviderError_shouldWrapAndDisplay() {
    let error: PipelineError = ProviderError::RateLimitExceeded("try later".to_string()).into();
    assert!(matches!(error, PipelineError::Provider(_)));
    assert_eq!(error.to_string(), "Provider error: Rate limit exceeded: try later");
}

#[test]
fn test_app_error_fromSubtitleError_shouldKeepMessage() {
    let error: AppError = SubtitleError::EmptyTrack("https://youtu.be/dQw4w9WgXcQ".to_string()).into();
    assert_eq!(
        error.to_string(),
        "Subtitle error: No caption track found for https://youtu.be/dQw4w9WgXcQ"
    );
}

#[test]
fn test_app_error_fromAnyhow_shouldBeUnknown() {
    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(ref msg) if msg == "something odd"));
}

#[test]
fn test_no_transcript_display() {
    assert_eq!(PipelineError::NoTranscript.to_string(), "Transcript is empty");
}

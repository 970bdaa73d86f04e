//! Unit tests for submission validation

use super::submit::*;
use crate::domain::MediaKind;

fn request(kind: &str) -> SubmitRequest {
    SubmitRequest {
        kind: kind.to_string(),
        source: "clip.wav".to_string(),
        quality: None,
        adaptive: None,
        bitrate: None,
    }
}

#[test]
fn test_validate_unknown_kind() {
    let req = request("document");

    let result = validate_request(&req);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("unknown media kind"));
}

#[test]
fn test_validate_empty_source() {
    let mut req = request("image");
    req.source = "  ".to_string();

    let result = validate_request(&req);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("empty"));
}

#[test]
fn test_validate_quality_out_of_range() {
    let mut req = request("image");
    req.quality = Some(0);
    assert!(validate_request(&req).is_err());

    req.quality = Some(101);
    let result = validate_request(&req);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("out of range"));
}

#[test]
fn test_validate_bitrate_must_be_positive() {
    let mut req = request("audio");
    req.bitrate = Some(0.0);
    assert!(validate_request(&req).is_err());

    req.bitrate = Some(-3.0);
    let result = validate_request(&req);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("positive"));
}

#[test]
fn test_validate_applies_defaults() {
    let (kind, params) = validate_request(&request("image")).unwrap();
    assert_eq!(kind, MediaKind::Image);
    assert_eq!(params.quality, 80);
    assert!(params.adaptive);
    assert_eq!(params.bitrate, DEFAULT_BITRATE_KBPS);
}

#[test]
fn test_validate_video_default_quality() {
    let (kind, params) = validate_request(&request("video")).unwrap();
    assert_eq!(kind, MediaKind::Video);
    assert_eq!(params.quality, 50);
}

#[test]
fn test_validate_explicit_params_kept() {
    let mut req = request("audio");
    req.quality = Some(42);
    req.adaptive = Some(false);
    req.bitrate = Some(12.0);

    let (_, params) = validate_request(&req).unwrap();
    assert_eq!(params.quality, 42);
    assert!(!params.adaptive);
    assert_eq!(params.bitrate, 12.0);
}

use super::*;

// ============================================================================
// Display formatting tests
// ============================================================================

#[test]
fn test_capacity_exceeded_display() {
    let err = Error::CapacityExceeded { capacity: 256, generation: 7 };
    let msg = err.to_string();
    assert!(msg.contains("256"), "message should name the capacity: {}", msg);
    assert!(msg.contains("generation 7"), "message should name the generation: {}", msg);
}

#[test]
fn test_submission_failed_display() {
    let err = Error::SubmissionFailed {
        generation: 42,
        reason: "invalid command encoding".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("generation 42"));
    assert!(msg.contains("invalid command encoding"));
}

#[test]
fn test_device_lost_display() {
    assert_eq!(Error::DeviceLost.to_string(), "Device lost");
}

#[test]
fn test_initialization_failed_display() {
    let err = Error::InitializationFailed("frames_in_flight must be >= 1".to_string());
    assert_eq!(
        err.to_string(),
        "Initialization failed: frames_in_flight must be >= 1"
    );
}

#[test]
fn test_invalid_state_display() {
    let err = Error::InvalidState("no active frame".to_string());
    assert_eq!(err.to_string(), "Invalid state: no active frame");
}

// ============================================================================
// Trait impl tests
// ============================================================================

#[test]
fn test_error_is_std_error() {
    fn assert_std_error<E: std::error::Error>(_e: &E) {}
    assert_std_error(&Error::DeviceLost);
}

#[test]
fn test_error_is_cloneable() {
    let err = Error::SubmissionFailed { generation: 1, reason: "x".to_string() };
    let cloned = err.clone();
    assert_eq!(err.to_string(), cloned.to_string());
}

#[test]
fn test_result_alias() {
    fn fails() -> Result<u32> {
        Err(Error::DeviceLost)
    }
    assert!(fails().is_err());
}

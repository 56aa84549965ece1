use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WaveformError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        WaveformError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        WaveformError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WaveformError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_decode());
}

#[test]
fn decode_is_classified() {
    assert!(WaveformError::decode("missing").is_decode());
    assert!(!WaveformError::validation("bad").is_decode());
}

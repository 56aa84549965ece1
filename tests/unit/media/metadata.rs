use super::*;

#[test]
fn new_derives_duration_from_samples() {
    let m = AudioMetadata::new(4, vec![vec![0.0; 10], vec![0.0; 10]]).unwrap();
    assert_eq!(m.number_of_channels(), 2);
    assert_eq!(m.samples_per_channel(), 10);
    assert!((m.duration_secs() - 2.5).abs() < 1e-12);
}

#[test]
fn new_rejects_zero_rate_and_ragged_channels() {
    assert!(AudioMetadata::new(0, vec![vec![0.0; 4]]).is_err());
    let err = AudioMetadata::new(4, vec![vec![0.0; 4], vec![0.0; 3]]).unwrap_err();
    assert!(err.to_string().contains("channel 1"));
}

#[test]
fn from_interleaved_deinterleaves_and_drops_partial_frame() {
    let m = AudioMetadata::from_interleaved(2, 2, &[0.1, -0.1, 0.2, -0.2, 0.3]).unwrap();
    assert_eq!(m.number_of_channels(), 2);
    assert_eq!(&*m.channel_data()[0], &[0.1, 0.2]);
    assert_eq!(&*m.channel_data()[1], &[-0.1, -0.2]);
}

#[test]
fn silent_has_no_channels() {
    let m = AudioMetadata::silent(48_000).unwrap();
    assert_eq!(m.number_of_channels(), 0);
    assert_eq!(m.samples_per_channel(), 0);
    assert_eq!(m.duration_secs(), 0.0);
}

#[test]
fn mixed_sample_averages_channels() {
    let m = AudioMetadata::new(4, vec![vec![1.0, -1.0], vec![1.0, 1.0]]).unwrap();
    assert_eq!(m.mixed_sample(0), 1.0);
    assert_eq!(m.mixed_sample(1), 0.0);
}

#[test]
fn max_media_duration_floors() {
    let m = AudioMetadata::new(10, vec![vec![0.0; 25]]).unwrap();
    // 2.5 s at 30 fps = 75 frames; at 29.97 fps = 74.925 -> 74
    assert_eq!(max_media_duration_frames(&m, Fps::new(30, 1).unwrap()), 75);
    assert_eq!(
        max_media_duration_frames(&m, Fps::new(30000, 1001).unwrap()),
        74
    );
}

#[test]
fn json_roundtrip_is_validated() {
    let m: AudioMetadata =
        serde_json::from_str(r#"{"sample_rate":2,"channel_data":[[0.5,-0.5]]}"#).unwrap();
    assert_eq!(m.sample_rate(), 2);
    assert!((m.duration_secs() - 1.0).abs() < 1e-12);

    let bad = serde_json::from_str::<AudioMetadata>(
        r#"{"sample_rate":2,"channel_data":[[0.5],[0.1,0.2]]}"#,
    );
    assert!(bad.is_err());
}

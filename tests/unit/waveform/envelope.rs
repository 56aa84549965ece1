use super::*;

const H: f64 = TIMELINE_LAYER_HEIGHT;

fn xy(env: &Envelope) -> Vec<(f64, f64)> {
    env.points().iter().map(|p| (p.x, p.y)).collect()
}

#[test]
fn constant_volume_has_no_envelope() {
    assert!(compute_envelope(&Volume::from(0.8), 400, EnvelopeOpts::default()).is_none());
}

#[test]
fn single_keyframe_is_one_point_at_origin() {
    let v: Volume = "0.5".parse().unwrap();
    let env = compute_envelope(&v, 400, EnvelopeOpts::default()).unwrap();
    assert_eq!(xy(&env), vec![(0.0, 0.5 * (H - 2.0))]);

    let path = env.to_bez_path();
    assert_eq!(path.elements().len(), 2);
}

#[test]
fn keyframes_spread_evenly_across_width() {
    let v = Volume::parse_keyframes("0,1,0.5");
    let env = compute_envelope(&v, 300, EnvelopeOpts::default()).unwrap();
    assert_eq!(
        xy(&env),
        vec![(0.0, H - 2.0), (150.0, 0.0), (300.0, 0.5 * (H - 2.0))]
    );
    assert_eq!(env.to_bez_path().elements().len(), 3);
}

#[test]
fn unparsable_keyframes_are_skipped_but_keep_their_slot() {
    let v = Volume::parse_keyframes(" 1 , abc ,, 0 ");
    assert_eq!(
        match &v {
            Volume::Keyframes(k) => k.len(),
            Volume::Constant(_) => 0,
        },
        4
    );
    let env = compute_envelope(&v, 300, EnvelopeOpts::default()).unwrap();
    assert_eq!(xy(&env), vec![(0.0, 0.0), (300.0, H - 2.0)]);
}

#[test]
fn out_of_range_gains_are_clamped() {
    let v = Volume::Keyframes(vec![2.0, -1.0]);
    let env = compute_envelope(&v, 10, EnvelopeOpts::default()).unwrap();
    assert_eq!(xy(&env), vec![(0.0, 0.0), (10.0, H - 2.0)]);
}

#[test]
fn nothing_drawable_is_none() {
    assert!(compute_envelope(&Volume::Keyframes(vec![]), 10, EnvelopeOpts::default()).is_none());
    let v = Volume::parse_keyframes("x,y");
    assert!(compute_envelope(&v, 10, EnvelopeOpts::default()).is_none());
}

#[test]
fn custom_layer_geometry() {
    let opts = EnvelopeOpts {
        layer_height: 42.0,
        bottom_margin: 0.0,
    };
    let env = compute_envelope(&Volume::parse_keyframes("0.25,0.75"), 100, opts).unwrap();
    assert_eq!(xy(&env), vec![(0.0, 31.5), (100.0, 10.5)]);
}

#[test]
fn volume_json_number_or_string() {
    let c: Volume = serde_json::from_str("0.8").unwrap();
    assert_eq!(c, Volume::Constant(0.8));

    let k: Volume = serde_json::from_str(r#""0,1,0.5""#).unwrap();
    assert_eq!(k, Volume::Keyframes(vec![0.0, 1.0, 0.5]));
    assert_eq!(serde_json::to_string(&k).unwrap(), r#""0,1,0.5""#);
}

use super::*;
use crate::foundation::error::WaveformError;
use crate::media::provider::InMemoryProvider;
use crate::timeline::range::{ClipDuration, resolve};

fn tone() -> Arc<AudioMetadata> {
    Arc::new(AudioMetadata::new(4, vec![vec![0.5, -1.0, 0.25, 0.0]]).unwrap())
}

fn fps() -> Fps {
    Fps::new(4, 1).unwrap()
}

#[test]
fn loading_renders_nothing() {
    let view = WaveformView::new("a.wav");
    assert!(matches!(view.state(), WaveformState::Loading));
    assert!(view.bars(resolve(0, ClipDuration::UntilEnd), fps(), 4).is_empty());
    assert_eq!(view.max_media_duration(fps()), None);
}

#[test]
fn ready_renders_bars() {
    let mut view = WaveformView::new("a.wav");
    let ticket = view.ticket();
    assert!(view.apply(&ticket, Ok(tone())));
    assert!(matches!(view.state(), WaveformState::Ready(_)));

    let bars = view.bars(resolve(0, ClipDuration::UntilEnd), fps(), 2);
    let amps = bars.iter().map(|b| b.amplitude).collect::<Vec<_>>();
    assert_eq!(amps, vec![1.0, 0.25]);
    assert_eq!(view.max_media_duration(fps()), Some(4));
}

#[test]
fn failure_stays_empty() {
    let mut view = WaveformView::new("broken.wav");
    let ticket = view.ticket();
    assert!(view.apply(&ticket, Err(WaveformError::decode("bad header"))));
    let WaveformState::Failed(msg) = view.state() else {
        panic!("expected failed state");
    };
    assert!(msg.contains("bad header"));
    assert!(view.bars(resolve(0, ClipDuration::UntilEnd), fps(), 4).is_empty());
}

#[test]
fn stale_result_is_discarded() {
    let mut view = WaveformView::new("a.wav");
    let stale = view.ticket();
    let fresh = view.set_source("b.wav");
    assert_eq!(fresh.source(), "b.wav");

    assert!(!view.apply(&stale, Ok(tone())));
    assert!(matches!(view.state(), WaveformState::Loading));

    assert!(view.apply(&fresh, Ok(tone())));
    assert!(view.metadata().is_some());
}

#[test]
fn switching_back_to_an_old_source_still_rejects_old_tickets() {
    let mut view = WaveformView::new("a.wav");
    let first = view.ticket();
    view.set_source("b.wav");
    let again = view.set_source("a.wav");
    assert_ne!(first, again);
    assert!(!view.apply(&first, Ok(tone())));
    assert!(view.apply(&again, Ok(tone())));
}

#[test]
fn same_source_keeps_state_and_ticket() {
    let mut view = WaveformView::new("a.wav");
    let ticket = view.ticket();
    view.apply(&ticket, Ok(tone()));
    assert_eq!(view.set_source("a.wav"), ticket);
    assert!(view.metadata().is_some());
    // A second result for an already settled fetch is ignored.
    assert!(!view.apply(&ticket, Err(WaveformError::decode("late"))));
    assert!(view.metadata().is_some());
}

#[test]
fn reload_supersedes_and_restarts() {
    let mut view = WaveformView::new("a.wav");
    let old = view.ticket();
    view.apply(&old, Err(WaveformError::decode("flaky")));
    let next = view.reload();
    assert_ne!(old, next);
    assert!(matches!(view.state(), WaveformState::Loading));
    assert!(view.apply(&next, Ok(tone())));
}

#[tokio::test]
async fn load_through_cache() {
    let provider = InMemoryProvider::new().with("a.wav", (*tone()).clone());
    let cache = MetadataCache::new(provider);

    let mut view = WaveformView::new("a.wav");
    assert!(view.load(&cache).await);
    assert!(view.metadata().is_some());

    let mut missing = WaveformView::new("nope.wav");
    assert!(missing.load(&cache).await);
    assert!(matches!(missing.state(), WaveformState::Failed(_)));
}

use super::*;

fn metrics(top: f64) -> ScrollMetrics {
    ScrollMetrics {
        scroll_top: top,
        scroll_height: 1200.0,
        client_height: 200.0,
    }
}

#[test]
fn test_metrics_percentage() {
    assert_eq!(metrics(500.0).percentage(), 0.5);
    assert_eq!(metrics(500.0).offset_for(0.25), 250.0);

    let short = ScrollMetrics {
        scroll_top: 0.0,
        scroll_height: 100.0,
        client_height: 300.0,
    };
    assert_eq!(short.percentage(), 0.0);
    assert_eq!(short.offset_for(1.0), 0.0);
}

#[test]
fn test_editor_scroll_suppresses_preview_echo() {
    let t0 = Instant::now();
    let mut sync = ScrollSync::new(Duration::from_millis(20));

    assert_eq!(sync.on_editor_scroll(0.3, t0), Some(0.3));
    assert!(sync.is_editor_scrolling(t0));
    // the preview reacts to our programmatic scroll
    assert_eq!(sync.on_preview_scroll(metrics(300.0), t0 + Duration::from_millis(5)), None);

    let later = t0 + Duration::from_millis(25);
    assert!(!sync.is_editor_scrolling(later));
    assert_eq!(sync.on_preview_scroll(metrics(600.0), later), Some(0.6));
}

#[test]
fn test_preview_scroll_suppresses_editor_echo() {
    let t0 = Instant::now();
    let mut sync = ScrollSync::new(Duration::from_millis(20));

    assert!(sync.on_preview_scroll(metrics(1000.0), t0).is_some());
    assert_eq!(sync.on_editor_scroll(1.0, t0 + Duration::from_millis(10)), None);
    assert_eq!(sync.on_editor_scroll(1.0, t0 + Duration::from_millis(20)), Some(1.0));
}

#[test]
fn test_reset_clears_guards() {
    let t0 = Instant::now();
    let mut sync = ScrollSync::new(Duration::from_millis(20));
    sync.on_editor_scroll(0.5, t0);
    sync.reset();
    assert!(!sync.is_editor_scrolling(t0));
    assert!(sync.on_preview_scroll(metrics(0.0), t0).is_some());
}

#[test]
fn test_from_settings_uses_configured_delay() {
    let settings = PreviewSettings { scroll_guard_ms: 50 };
    let t0 = Instant::now();
    let mut sync = ScrollSync::from_settings(&settings);
    assert_eq!(sync.delay(), Duration::from_millis(50));

    sync.on_editor_scroll(0.5, t0);
    assert!(sync.is_editor_scrolling(t0 + Duration::from_millis(30)));
    assert!(!sync.is_editor_scrolling(t0 + Duration::from_millis(50)));

    let default = ScrollSync::from_settings(&PreviewSettings::default());
    assert_eq!(default.delay(), Duration::from_millis(20));
}

//! End-to-end session scenarios: link events in, snapshots out.

use std::cell::Cell;

use vyom_core::{
    FlightMode, HistoryPoint, LinkEvent, PathPoint, ReducerConfig, Session, TelemetrySample,
};

/// Clock that labels each sample `T0`, `T1`, ...
fn counting_clock() -> impl Fn() -> String {
    let next = Cell::new(0u32);
    move || {
        let n = next.get();
        next.set(n + 1);
        format!("T{}", n)
    }
}

fn alt_sample(alt: f64) -> LinkEvent {
    LinkEvent::Telemetry(TelemetrySample {
        alt: Some(alt),
        ..TelemetrySample::default()
    })
}

#[test]
fn connect_then_first_sample() {
    let mut session = Session::with_clock(ReducerConfig::default(), counting_clock());
    session.handle(LinkEvent::Connected);
    assert!(session.snapshot().connected);

    let sample = TelemetrySample::position(12.9, 77.6, 100.0)
        .with_speed(5.0)
        .with_battery(80.0);
    session.handle(LinkEvent::Telemetry(sample));

    let snapshot = session.snapshot();
    assert_eq!(snapshot.state.lat, 12.9);
    assert_eq!(snapshot.state.lon, 77.6);
    assert_eq!(snapshot.state.alt, 100.0);
    assert_eq!(snapshot.state.speed, 5.0);
    assert_eq!(snapshot.state.battery, 80.0);
    assert_eq!(snapshot.state.heading, 0.0);
    assert_eq!(snapshot.state.mode, FlightMode::Flying);
    assert_eq!(
        snapshot.history,
        vec![HistoryPoint {
            time: "T0".to_string(),
            alt: 100.0,
            speed: 5.0,
        }]
    );
    assert_eq!(snapshot.path.to_vec(), vec![PathPoint { lat: 12.9, lon: 77.6 }]);
}

#[test]
fn sixty_samples_keep_last_fifty() {
    let mut session = Session::with_clock(ReducerConfig::default(), counting_clock());
    for alt in 1..=60 {
        session.handle(alt_sample(alt as f64));
    }

    let snapshot = session.snapshot();
    let alts: Vec<f64> = snapshot.history.iter().map(|p| p.alt).collect();
    let expected: Vec<f64> = (11..=60).map(|a| a as f64).collect();
    assert_eq!(alts, expected);
    assert_eq!(snapshot.history.first().map(|p| p.time.as_str()), Some("T10"));
    assert_eq!(snapshot.samples, 60);
}

#[test]
fn history_length_is_min_of_samples_and_capacity() {
    for n in [0usize, 1, 49, 50, 51, 120] {
        let mut session = Session::with_clock(ReducerConfig::default(), counting_clock());
        for i in 0..n {
            session.handle(alt_sample(i as f64));
        }
        let history = session.snapshot().history;
        assert_eq!(history.len(), n.min(50));
        if let Some(last) = history.last() {
            assert_eq!(last.alt, (n - 1) as f64);
        }
    }
}

#[test]
fn disconnect_keeps_everything() {
    let mut session = Session::with_clock(ReducerConfig::default(), counting_clock());
    session.handle(LinkEvent::Connected);
    session.handle(LinkEvent::Telemetry(TelemetrySample::position(12.97, 77.59, 50.0)));
    session.handle(LinkEvent::Telemetry(TelemetrySample::position(12.98, 77.60, 55.0)));
    let before = session.snapshot();

    session.handle(LinkEvent::Disconnected);
    let after = session.snapshot();

    assert!(!after.connected);
    assert_eq!(after.state, before.state);
    assert_eq!(after.history, before.history);
    assert_eq!(after.path, before.path);
    assert_eq!(after.state.mode, FlightMode::Flying);
}

#[test]
fn replayed_sample_counts_twice() {
    let mut session = Session::with_clock(ReducerConfig::default(), counting_clock());
    let event = LinkEvent::Telemetry(TelemetrySample::position(12.9, 77.6, 10.0));
    session.handle(event.clone());
    session.handle(event);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.history.len(), 2);
    assert_eq!(snapshot.path.len(), 2);
}

#[test]
fn reconnect_after_loss() {
    let mut session = Session::with_clock(ReducerConfig::default(), counting_clock());
    session.handle(LinkEvent::Connected);
    session.handle(LinkEvent::Disconnected);
    session.handle(LinkEvent::Connected);
    assert!(session.snapshot().connected);
    assert_eq!(session.snapshot().state.mode, FlightMode::Disconnected);
}

#[test]
fn mistyped_battery_still_updates_position() {
    let mut session = Session::with_clock(ReducerConfig::default(), counting_clock());
    let sample: TelemetrySample =
        serde_json::from_str(r#"{"lat":12.9,"lon":77.6,"alt":100,"battery":"80"}"#).unwrap();
    session.handle(LinkEvent::Telemetry(sample));

    let snapshot = session.snapshot();
    assert_eq!(snapshot.state.mode, FlightMode::Flying);
    assert_eq!(snapshot.state.lat, 12.9);
    assert_eq!(snapshot.state.battery, 0.0);
    assert_eq!(snapshot.history.len(), 1);
    assert_eq!(snapshot.history[0].alt, 100.0);
    assert_eq!(snapshot.path.to_vec(), vec![PathPoint { lat: 12.9, lon: 77.6 }]);
}

//! Line-per-update output for terminals without the full UI.

use vyom_core::Snapshot;

pub fn render_line(snapshot: &Snapshot) -> String {
    let readouts = snapshot.readouts();
    let position = snapshot.current_position();
    format!(
        "[{}] mode={} pos=({:.6}, {:.6}) alt={} speed={} hdg={:.0} battery={} home={} history={} track={}",
        readouts.link,
        readouts.flight_mode,
        position.lat,
        position.lon,
        readouts.altitude,
        readouts.ground_speed,
        snapshot.state.heading,
        readouts.battery,
        readouts.distance_from_home,
        snapshot.history.len(),
        snapshot.path.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_line_uses_fallback_position() {
        let line = render_line(&Snapshot::default());
        assert_eq!(
            line,
            "[SEARCHING FOR LINK] mode=DISCONNECTED pos=(12.971600, 77.594600) alt=0.0 m \
             speed=0.0 m/s hdg=0 battery=0% home=0 m history=0 track=0"
        );
    }
}

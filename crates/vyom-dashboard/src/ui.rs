//! Terminal rendering of a [`Snapshot`].
//!
//! Layout:
//! - Left:   sidebar navigation (only Mission Control is live)
//! - Top:    header with link, radio and battery badges
//! - Middle: live tracking map and the video placeholder
//! - Below:  readout cards and the altitude profile chart

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as TrackSegment},
        Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph,
    },
    Frame,
};
use vyom_core::{HistoryPoint, PathPoint, Snapshot, TrackView, MAP_ATTRIBUTION};

const ACCENT: Color = Color::Rgb(0x21, 0x96, 0xF3);
const DRONE_ID: &str = "Sentinel-X1";

/// Smallest map span in degrees, roughly 200 m.
const MIN_MAP_SPAN_DEG: f64 = 0.002;

/// Upper bound on polyline segments painted per frame.
const MAX_MAP_SEGMENTS: usize = 1_000;

const NAV_ITEMS: [&str; 4] = [
    "Mission Control",
    "Waypoint Planning",
    "Secure Live Feed",
    "Drone Fleet",
];

pub fn draw(frame: &mut Frame, snapshot: &Snapshot) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(40)])
        .split(frame.area());

    draw_sidebar(frame, columns[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(4),
            Constraint::Length(12),
            Constraint::Length(1),
        ])
        .split(columns[1]);

    draw_header(frame, rows[0], snapshot);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);
    draw_map(frame, top[0], snapshot);
    draw_video_placeholder(frame, top[1]);

    draw_readouts(frame, rows[2], snapshot);
    draw_altitude_chart(frame, rows[3], &snapshot.history);

    let footer = Paragraph::new(Span::styled(
        format!("{}  |  q / Esc to quit", MAP_ATTRIBUTION),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(footer, rows[4]);
}

fn draw_sidebar(frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            "\u{2708} VYOMGARUD",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (i, item) in NAV_ITEMS.iter().enumerate() {
        let style = if i == 0 {
            Style::default().fg(Color::White).bg(ACCENT)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(format!(" {} ", item), style)));
    }

    let sidebar = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(sidebar, area);
}

fn draw_header(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let readouts = snapshot.readouts();
    let link_style = if snapshot.connected {
        Style::default().fg(Color::Black).bg(Color::Green)
    } else {
        Style::default().fg(Color::White).bg(Color::Red)
    };

    let line = Line::from(vec![
        Span::styled(
            format!("VyomGarud: {} Telemetry", DRONE_ID),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(format!(" {} ", readouts.link), link_style),
        Span::raw(" "),
        Span::styled(" Hybrid 4G/LoRa ", Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!(" Battery: {} ", readouts.battery),
            Style::default().fg(Color::Yellow),
        ),
    ]);

    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_map(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let position = snapshot.current_position();
    let (x_bounds, y_bounds) = map_bounds(snapshot.path.iter(), position);
    let polyline = track_polyline(&snapshot.path);
    let title = format!(
        "Live Tracking \u{b7} {} \u{b7} alt {:.2} m",
        DRONE_ID, snapshot.state.alt
    );

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(symbols::Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            for pair in polyline.windows(2) {
                ctx.draw(&TrackSegment::new(
                    pair[0].lon,
                    pair[0].lat,
                    pair[1].lon,
                    pair[1].lat,
                    ACCENT,
                ));
            }
            ctx.layer();
            ctx.print(
                position.lon,
                position.lat,
                Span::styled("\u{25c6}", Style::default().fg(Color::Cyan)),
            );
        });

    frame.render_widget(canvas, area);
}

fn draw_video_placeholder(frame: &mut Frame, area: Rect) {
    let placeholder = Paragraph::new(Span::styled(
        "Waiting for Video Stream...",
        Style::default().fg(Color::DarkGray),
    ))
    .alignment(ratatui::layout::Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Live Video (4G)"));
    frame.render_widget(placeholder, area);
}

fn draw_readouts(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let readouts = snapshot.readouts();
    let cards = [
        ("Altitude", readouts.altitude, Color::White),
        ("Ground Speed", readouts.ground_speed, Color::White),
        ("Distance from Home", readouts.distance_from_home, Color::White),
        ("Flight Mode", readouts.flight_mode, ACCENT),
    ];

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, value, color), cell) in cards.into_iter().zip(cells.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL).title(label));
        frame.render_widget(card, *cell);
    }
}

fn draw_altitude_chart(frame: &mut Frame, area: Rect, history: &[HistoryPoint]) {
    let points: Vec<(f64, f64)> = history
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.alt))
        .collect();
    let [y_min, y_max] = altitude_bounds(history);
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;

    let dataset = Dataset::default()
        .name("Altitude")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(ACCENT))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().borders(Borders::ALL).title("Altitude Profile"))
        .x_axis(Axis::default().bounds([0.0, x_max]))
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![format!("{:.0}", y_min), format!("{:.0}", y_max)]),
        );

    frame.render_widget(chart, area);
}

/// Track points to paint: every point for short tracks, an evenly strided
/// subset ending at the latest point for long ones.
pub fn track_polyline(path: &TrackView) -> Vec<PathPoint> {
    let stride = path.len().div_ceil(MAX_MAP_SEGMENTS).max(1);
    let mut points: Vec<PathPoint> = path.iter().step_by(stride).copied().collect();
    if let Some(last) = path.last() {
        if points.last() != Some(last) {
            points.push(*last);
        }
    }
    points
}

/// Longitude/latitude bounds that fit the track and the current position.
pub fn map_bounds<'a>(
    path: impl IntoIterator<Item = &'a PathPoint>,
    position: PathPoint,
) -> ([f64; 2], [f64; 2]) {
    let (mut lon_min, mut lon_max) = (position.lon, position.lon);
    let (mut lat_min, mut lat_max) = (position.lat, position.lat);
    for point in path {
        lon_min = lon_min.min(point.lon);
        lon_max = lon_max.max(point.lon);
        lat_min = lat_min.min(point.lat);
        lat_max = lat_max.max(point.lat);
    }

    let pad = |min: f64, max: f64| {
        let span = ((max - min) * 1.2).max(MIN_MAP_SPAN_DEG);
        let mid = (min + max) / 2.0;
        [mid - span / 2.0, mid + span / 2.0]
    };
    (pad(lon_min, lon_max), pad(lat_min, lat_max))
}

/// Y-axis range for the chart with a little headroom.
pub fn altitude_bounds(history: &[HistoryPoint]) -> [f64; 2] {
    let mut iter = history.iter().map(|p| p.alt).filter(|a| a.is_finite());
    let Some(first) = iter.next() else {
        return [0.0, 10.0];
    };
    let (min, max) = iter.fold((first, first), |(lo, hi), a| (lo.min(a), hi.max(a)));
    let pad = ((max - min) * 0.1).max(1.0);
    [min - pad, max + pad]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use vyom_core::{FlightMode, TelemetryState, DEFAULT_POSITION};

    fn render(snapshot: &Snapshot) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|frame| draw(frame, snapshot)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn renders_searching_badge_before_link() {
        let screen = render(&Snapshot::default());
        assert!(screen.contains("SEARCHING FOR LINK"));
        assert!(screen.contains("DISCONNECTED"));
        assert!(screen.contains("Waiting for Video Stream..."));
    }

    #[test]
    fn renders_live_readouts() {
        let snapshot = Snapshot {
            connected: true,
            state: TelemetryState {
                lat: 12.9716,
                lon: 77.5946,
                alt: 52.34,
                speed: 22.5,
                battery: 99.0,
                mode: FlightMode::Flying,
                ..TelemetryState::default()
            },
            history: vec![HistoryPoint {
                time: "10:00:00".to_string(),
                alt: 52.34,
                speed: 22.5,
            }],
            path: [DEFAULT_POSITION].into_iter().collect(),
            samples: 1,
        };

        let screen = render(&snapshot);
        assert!(screen.contains("LINK ESTABLISHED"));
        assert!(screen.contains("52.3 m"));
        assert!(screen.contains("22.5 m/s"));
        assert!(screen.contains("Battery: 99%"));
        assert!(screen.contains("FLYING"));
    }

    #[test]
    fn map_bounds_have_minimum_span() {
        let (x, y) = map_bounds(std::iter::empty(), DEFAULT_POSITION);
        assert!((x[1] - x[0] - MIN_MAP_SPAN_DEG).abs() < 1e-12);
        assert!((y[1] - y[0] - MIN_MAP_SPAN_DEG).abs() < 1e-12);
        assert!(x[0] < DEFAULT_POSITION.lon && DEFAULT_POSITION.lon < x[1]);
    }

    #[test]
    fn map_bounds_cover_track() {
        let path = [
            PathPoint { lat: 12.0, lon: 77.0 },
            PathPoint { lat: 12.1, lon: 77.2 },
        ];
        let (x, y) = map_bounds(&path, PathPoint { lat: 12.05, lon: 77.1 });
        assert!(x[0] < 77.0 && x[1] > 77.2);
        assert!(y[0] < 12.0 && y[1] > 12.1);
    }

    #[test]
    fn long_tracks_are_thinned_for_drawing() {
        let short: TrackView = (0..10)
            .map(|i| PathPoint { lat: 12.0 + i as f64 * 1e-4, lon: 77.0 })
            .collect();
        assert_eq!(track_polyline(&short), short.to_vec());

        let long: TrackView = (0..50_000)
            .map(|i| PathPoint { lat: 12.0 + i as f64 * 1e-6, lon: 77.0 })
            .collect();
        let polyline = track_polyline(&long);
        assert!(polyline.len() <= MAX_MAP_SEGMENTS + 2);
        assert_eq!(polyline.first(), long.first());
        assert_eq!(polyline.last(), long.last());
    }

    #[test]
    fn altitude_bounds_pad_range() {
        assert_eq!(altitude_bounds(&[]), [0.0, 10.0]);

        let history: Vec<HistoryPoint> = [40.0, 60.0]
            .iter()
            .map(|alt| HistoryPoint {
                time: String::new(),
                alt: *alt,
                speed: 0.0,
            })
            .collect();
        assert_eq!(altitude_bounds(&history), [38.0, 62.0]);
    }
}

//! Map track of visited positions.
//!
//! Points live in fixed-size shared chunks. Taking a [`TrackView`] clones a
//! few reference counts, never the points themselves, so a snapshot can be
//! published after every sample however long the flight runs.

use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::models::PathPoint;

/// Points per sealed chunk.
const CHUNK_LEN: usize = 256;

/// Ordered positions for the map polyline.
///
/// Unbounded unless a limit is set, in which case the oldest points are
/// dropped first.
#[derive(Debug, Clone, Default)]
pub struct FlightTrack {
    view: TrackView,
    limit: Option<usize>,
}

impl FlightTrack {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            view: TrackView::default(),
            limit: limit.map(|n| n.max(1)),
        }
    }

    pub fn push(&mut self, point: PathPoint) {
        self.view.push(point);
        if let Some(limit) = self.limit {
            while self.view.len > limit {
                self.view.evict_front();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// First retained point (the home position while nothing was evicted).
    pub fn first(&self) -> Option<&PathPoint> {
        self.view.first()
    }

    pub fn last(&self) -> Option<&PathPoint> {
        self.view.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathPoint> {
        self.view.iter()
    }

    /// Immutable copy of the current track sharing storage with it.
    pub fn view(&self) -> TrackView {
        self.view.clone()
    }
}

impl FromIterator<PathPoint> for FlightTrack {
    fn from_iter<I: IntoIterator<Item = PathPoint>>(iter: I) -> Self {
        let mut track = FlightTrack::default();
        for point in iter {
            track.push(point);
        }
        track
    }
}

/// Frozen track contents. Later pushes to the [`FlightTrack`] it came from
/// are not visible through it.
#[derive(Debug, Clone, Default)]
pub struct TrackView {
    sealed: Arc<Vec<Arc<[PathPoint]>>>,
    tail: Arc<Vec<PathPoint>>,
    /// Points already evicted from the front of `sealed[0]`
    skip: usize,
    len: usize,
}

impl TrackView {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn first(&self) -> Option<&PathPoint> {
        match self.sealed.first() {
            Some(chunk) => chunk.get(self.skip),
            None => self.tail.first(),
        }
    }

    pub fn last(&self) -> Option<&PathPoint> {
        self.tail
            .last()
            .or_else(|| self.sealed.last().and_then(|chunk| chunk.last()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathPoint> {
        self.sealed
            .iter()
            .flat_map(|chunk| chunk.iter())
            .skip(self.skip)
            .chain(self.tail.iter())
    }

    pub fn to_vec(&self) -> Vec<PathPoint> {
        self.iter().copied().collect()
    }

    fn push(&mut self, point: PathPoint) {
        Arc::make_mut(&mut self.tail).push(point);
        self.len += 1;

        if self.tail.len() == CHUNK_LEN {
            let chunk: Arc<[PathPoint]> = Arc::from(self.tail.as_slice());
            Arc::make_mut(&mut self.sealed).push(chunk);
            self.tail = Arc::default();
        }
    }

    fn evict_front(&mut self) {
        if self.len == 0 {
            return;
        }
        match self.sealed.first().map(|chunk| chunk.len()) {
            Some(chunk_len) => {
                self.skip += 1;
                if self.skip == chunk_len {
                    Arc::make_mut(&mut self.sealed).remove(0);
                    self.skip = 0;
                }
            }
            None => {
                Arc::make_mut(&mut self.tail).remove(0);
            }
        }
        self.len -= 1;
    }
}

impl FromIterator<PathPoint> for TrackView {
    fn from_iter<I: IntoIterator<Item = PathPoint>>(iter: I) -> Self {
        iter.into_iter().collect::<FlightTrack>().view
    }
}

impl PartialEq for TrackView {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Serialize for TrackView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(i: usize) -> PathPoint {
        PathPoint {
            lat: 12.0 + i as f64 * 1e-5,
            lon: 77.0,
        }
    }

    #[test]
    fn unbounded_by_default() {
        let track: FlightTrack = (0..1_000).map(point).collect();
        assert_eq!(track.len(), 1_000);
        assert_eq!(track.limit(), None);
        assert_eq!(track.first(), Some(&point(0)));
        assert_eq!(track.last(), Some(&point(999)));
        assert_eq!(track.iter().count(), 1_000);
    }

    #[test]
    fn limit_drops_oldest() {
        let mut track = FlightTrack::new(Some(2));
        track.push(PathPoint { lat: 1.0, lon: 1.0 });
        track.push(PathPoint { lat: 2.0, lon: 2.0 });
        track.push(PathPoint { lat: 3.0, lon: 3.0 });

        assert_eq!(track.len(), 2);
        assert_eq!(track.first().map(|p| p.lat), Some(2.0));
        assert_eq!(track.last().map(|p| p.lat), Some(3.0));
    }

    #[test]
    fn limit_spanning_sealed_chunks() {
        let limit = CHUNK_LEN + 10;
        let mut track = FlightTrack::new(Some(limit));
        for i in 0..3 * CHUNK_LEN + 7 {
            track.push(point(i));
        }

        let expected: Vec<PathPoint> = (2 * CHUNK_LEN - 3..3 * CHUNK_LEN + 7).map(point).collect();
        assert_eq!(track.len(), limit);
        assert_eq!(track.view().to_vec(), expected);
        assert_eq!(track.first(), expected.first());
        assert_eq!(track.last(), expected.last());
    }

    #[test]
    fn view_is_frozen_at_the_time_it_was_taken() {
        let mut track: FlightTrack = (0..10).map(point).collect();
        let before = track.view();
        track.push(point(10));

        assert_eq!(before.len(), 10);
        assert_eq!(before.last(), Some(&point(9)));
        assert_eq!(track.view().len(), 11);
    }

    #[test]
    fn views_share_sealed_points() {
        let mut track: FlightTrack = (0..2 * CHUNK_LEN).map(point).collect();
        let first = track.view();
        track.push(point(2 * CHUNK_LEN));
        let second = track.view();

        assert_eq!(first.sealed.len(), 2);
        for (a, b) in first.sealed.iter().zip(second.sealed.iter()) {
            assert!(Arc::ptr_eq(a, b));
        }
        // Cloning a view copies no points.
        let copy = second.clone();
        assert!(Arc::ptr_eq(&copy.sealed, &second.sealed));
        assert!(Arc::ptr_eq(&copy.tail, &second.tail));
    }

    #[test]
    fn serializes_as_flat_list() {
        let view: TrackView = [PathPoint { lat: 1.0, lon: 2.0 }].into_iter().collect();
        let json = serde_json::to_string(&view).unwrap();
        assert_eq!(json, r#"[{"lat":1.0,"lon":2.0}]"#);
    }
}

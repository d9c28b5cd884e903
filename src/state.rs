//! View state for the map page.
//!
//! One owned struct drives everything: the current fetch phase, the last
//! result set, and the two user selections. Each fetch cycle carries a
//! monotonically increasing token so a slow, superseded response can never
//! overwrite a fresher one.

use crate::data::{Feature, FeatureCollection, Metadata, TimeRange, FEED_ERROR_MESSAGE};
use crate::feed::FeedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
pub struct ViewState {
    pub records: Vec<Feature>,
    pub metadata: Option<Metadata>,
    pub phase: Phase,
    pub error: Option<String>,
    pub time_range: TimeRange,
    pub min_magnitude: f64,
    fetch_seq: u64,
}

impl ViewState {
    pub fn new(time_range: TimeRange, min_magnitude: f64) -> Self {
        Self {
            records: Vec::new(),
            metadata: None,
            phase: Phase::Loading,
            error: None,
            time_range,
            min_magnitude,
            fetch_seq: 0,
        }
    }

    /// Start a fetch cycle and return its token. Always issues a new token,
    /// including when the time range was re-selected unchanged.
    pub fn begin_fetch(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.phase = Phase::Loading;
        self.error = None;
        self.fetch_seq
    }

    /// Select a time range and start the fetch cycle it triggers.
    pub fn select_time_range(&mut self, range: TimeRange) -> u64 {
        self.time_range = range;
        self.begin_fetch()
    }

    /// Complete a fetch cycle. Returns `false` when `token` is stale, in
    /// which case state is untouched and the response must be discarded.
    pub fn finish_fetch(
        &mut self,
        token: u64,
        result: Result<FeatureCollection, FeedError>,
    ) -> bool {
        if token != self.fetch_seq {
            return false;
        }
        match result {
            Ok(feed) => {
                self.records = feed.features;
                self.metadata = Some(feed.metadata);
                self.phase = Phase::Ready;
                self.error = None;
            }
            Err(_) => {
                self.phase = Phase::Failed;
                self.error = Some(FEED_ERROR_MESSAGE.to_string());
            }
        }
        true
    }
}

/// The records that pass the magnitude threshold, recomputed each render
/// pass. A missing magnitude reads as 0.0, so such records show under the
/// "All" threshold and drop out above it.
pub fn visible_events(records: &[Feature], min_magnitude: f64) -> Vec<&Feature> {
    records
        .iter()
        .filter(|f| f.properties.mag.unwrap_or(0.0) >= min_magnitude)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Geometry, Properties};

    fn event(id: &str, mag: Option<f64>) -> Feature {
        Feature {
            id: id.to_string(),
            geometry: Geometry {
                coordinates: vec![-173.9, -16.2, 35.0],
            },
            properties: Properties {
                mag,
                place: Some("somewhere".to_string()),
                time: 1_754_392_800_000,
            },
        }
    }

    fn feed(features: Vec<Feature>) -> FeatureCollection {
        FeatureCollection {
            type_: "FeatureCollection".to_string(),
            metadata: Metadata {
                generated: 0,
                title: "USGS All Earthquakes, Past Day".to_string(),
                count: features.len(),
            },
            features,
        }
    }

    fn fetch_error() -> FeedError {
        FeedError::Malformed("unusable response".to_string())
    }

    #[test]
    fn threshold_keeps_exactly_the_strong_event() {
        let records = vec![event("a", Some(2.0)), event("b", Some(5.5))];
        let visible = visible_events(&records, 4.5);
        let ids: Vec<&str> = visible.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["b"]);
    }

    #[test]
    fn filtering_is_monotonic_in_the_threshold() {
        let records = vec![
            event("a", Some(-0.4)),
            event("b", Some(2.5)),
            event("c", Some(4.5)),
            event("d", Some(6.1)),
            event("e", None),
        ];
        let mut last = usize::MAX;
        for (_, threshold) in crate::data::MIN_MAGNITUDE_CHOICES {
            let count = visible_events(&records, threshold).len();
            assert!(count <= last);
            last = count;
        }
    }

    #[test]
    fn missing_magnitude_reads_as_zero() {
        let records = vec![event("a", None)];
        assert_eq!(visible_events(&records, 0.0).len(), 1);
        assert_eq!(visible_events(&records, 2.5).len(), 0);
    }

    #[test]
    fn reselecting_the_same_range_reissues_a_fetch() {
        let mut state = ViewState::new(TimeRange::PastDay, 0.0);
        let first = state.select_time_range(TimeRange::PastDay);
        let second = state.select_time_range(TimeRange::PastDay);
        assert!(second > first);
        assert_eq!(state.phase, Phase::Loading);
    }

    #[test]
    fn success_replaces_records_wholesale() {
        let mut state = ViewState::new(TimeRange::PastDay, 0.0);

        let token = state.begin_fetch();
        assert!(state.finish_fetch(token, Ok(feed(vec![event("a", Some(2.0))]))));
        assert_eq!(state.records.len(), 1);

        let token = state.begin_fetch();
        assert!(state.finish_fetch(token, Ok(feed(vec![event("b", Some(5.5))]))));
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.records[0].id, "b");
        assert_eq!(state.phase, Phase::Ready);
    }

    #[test]
    fn failure_sets_the_fixed_message() {
        let mut state = ViewState::new(TimeRange::PastDay, 0.0);
        let token = state.begin_fetch();
        assert!(state.finish_fetch(token, Err(fetch_error())));
        assert_eq!(state.phase, Phase::Failed);
        assert_eq!(state.error.as_deref(), Some(FEED_ERROR_MESSAGE));
    }

    #[test]
    fn empty_feed_is_ready_with_no_visible_events() {
        let mut state = ViewState::new(TimeRange::PastHour, 0.0);
        let token = state.begin_fetch();
        assert!(state.finish_fetch(token, Ok(feed(Vec::new()))));
        assert_eq!(state.phase, Phase::Ready);
        assert!(visible_events(&state.records, state.min_magnitude).is_empty());
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut state = ViewState::new(TimeRange::PastDay, 0.0);

        let stale = state.begin_fetch();
        let fresh = state.select_time_range(TimeRange::PastWeek);

        assert!(state.finish_fetch(fresh, Ok(feed(vec![event("fresh", Some(3.0))]))));
        assert_eq!(state.phase, Phase::Ready);

        // The superseded cycle resolves late; nothing may change.
        assert!(!state.finish_fetch(stale, Err(fetch_error())));
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.records[0].id, "fresh");
        assert!(state.error.is_none());
    }
}

//! USGS earthquake feed client.
//!
//! A stateless async fetch against the summary GeoJSON feeds. Failures are
//! categorized for the log line; the view collapses them all to one message.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::data::{FeatureCollection, TimeRange, USGS_FEED_BASE_URL};

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("quakescope/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse feed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("feed returned HTTP {status}")]
    Status { status: u16 },

    #[error("malformed feed: {0}")]
    Malformed(String),
}

/// Fetch one summary feed for the given time window.
pub async fn fetch_feed(range: TimeRange) -> Result<FeatureCollection, FeedError> {
    let url = format!("{}/{}.geojson", USGS_FEED_BASE_URL, range.as_str());
    debug!("fetching feed from {url}");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;

    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Status {
            status: status.as_u16(),
        });
    }

    let text = response.text().await?;
    let feed: FeatureCollection = serde_json::from_str(&text)?;
    validate(&feed)?;

    debug!("fetched {} events", feed.features.len());
    Ok(feed)
}

fn validate(feed: &FeatureCollection) -> Result<(), FeedError> {
    if feed.type_ != "FeatureCollection" {
        return Err(FeedError::Malformed(format!(
            "expected type 'FeatureCollection', got '{}'",
            feed.type_
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Metadata;

    fn feed_with_type(type_: &str) -> FeatureCollection {
        FeatureCollection {
            type_: type_.to_string(),
            metadata: Metadata {
                generated: 0,
                title: "USGS All Earthquakes, Past Day".to_string(),
                count: 0,
            },
            features: Vec::new(),
        }
    }

    #[test]
    fn accepts_feature_collection() {
        assert!(validate(&feed_with_type("FeatureCollection")).is_ok());
    }

    #[test]
    fn rejects_wrong_type_tag() {
        let err = validate(&feed_with_type("Feature")).unwrap_err();
        assert!(matches!(err, FeedError::Malformed(_)));
    }
}

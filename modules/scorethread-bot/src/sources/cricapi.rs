use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use cricapi_client::{CricApiClient, CurrentMatch};
use scorethread_engine::{ObservationSource, RawObservation};

/// Current matches from the CricketData JSON API.
pub struct CricApiSource {
    client: CricApiClient,
    team_filter: String,
}

impl CricApiSource {
    pub fn new(client: CricApiClient, team_filter: &str) -> Self {
        Self {
            client,
            team_filter: team_filter.to_string(),
        }
    }
}

#[async_trait]
impl ObservationSource for CricApiSource {
    fn name(&self) -> &str {
        "cricapi"
    }

    async fn fetch_observations(&self) -> Result<Vec<RawObservation>> {
        let matches = self.client.current_matches(0).await?;
        let today = Utc::now().date_naive();
        Ok(observations_from_matches(&matches, &self.team_filter, today))
    }
}

/// Started, unfinished matches of the team dated `today` or later. The API
/// keeps listing a finished match for hours, and a retired key that shows up
/// again is a new match, so ended matches are never passed on.
pub fn observations_from_matches(
    matches: &[CurrentMatch],
    team_filter: &str,
    today: NaiveDate,
) -> Vec<RawObservation> {
    let needle = team_filter.to_lowercase();
    matches
        .iter()
        .filter(|m| m.match_started && !m.match_ended)
        .filter(|m| m.match_date().is_some_and(|d| d >= today))
        .filter_map(|m| {
            let name = m.name.as_deref()?;
            if !name.to_lowercase().contains(&needle) {
                return None;
            }
            Some(RawObservation::new(name, m.status.as_str(), m.score_text()))
        })
        .collect()
}

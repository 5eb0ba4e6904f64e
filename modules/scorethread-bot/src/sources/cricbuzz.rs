//! Live-scores page scraper.
//!
//! Each match on the page is an anchor whose `title` names the fixture. Score
//! spans carry `font-medium`/`font-semibold` classes and the state line uses a
//! `cb*` class. The same match shows up in several anchors; the engine's
//! deduplicator sorts that out.

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use scorethread_engine::{ObservationSource, RawObservation};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; DiscordBot/1.0; +https://github.com/scorethread/scorethread)";

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[title]").unwrap());
static SPAN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").unwrap());
static STATUS_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"cb(Live|TextLive|TextInProgress|Text)").unwrap());

pub struct CricbuzzSource {
    client: reqwest::Client,
    url: String,
    team_filter: String,
}

impl CricbuzzSource {
    pub fn new(url: &str, team_filter: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
            team_filter: team_filter.to_string(),
        })
    }
}

#[async_trait]
impl ObservationSource for CricbuzzSource {
    fn name(&self) -> &str {
        "cricbuzz"
    }

    async fn fetch_observations(&self) -> Result<Vec<RawObservation>> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            bail!("live scores page returned {status}");
        }
        let html = resp.text().await?;
        Ok(parse_live_scores(&html, &self.team_filter))
    }
}

/// Extract one observation per match anchor mentioning `team_filter`.
pub fn parse_live_scores(html: &str, team_filter: &str) -> Vec<RawObservation> {
    let document = Html::parse_document(html);
    let needle = team_filter.to_lowercase();

    document
        .select(&ANCHOR)
        .filter_map(|anchor| {
            let title = anchor.value().attr("title")?.trim();
            if !title.to_lowercase().contains(&needle) {
                return None;
            }
            Some(RawObservation::new(
                title,
                status_text(&anchor),
                score_text(&anchor),
            ))
        })
        .collect()
}

fn score_text(anchor: &ElementRef) -> String {
    anchor
        .select(&SPAN)
        .filter(|span| {
            let class = span.value().attr("class").unwrap_or_default();
            class.contains("font-medium") || class.contains("font-semibold")
        })
        .map(|span| text_of(&span))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// The last `cb*`-classed span, falling back to the anchor's last span.
fn status_text(anchor: &ElementRef) -> String {
    let spans: Vec<ElementRef> = anchor.select(&SPAN).collect();
    spans
        .iter()
        .rev()
        .find(|span| STATUS_CLASS.is_match(span.value().attr("class").unwrap_or_default()))
        .or_else(|| spans.last())
        .map(text_of)
        .unwrap_or_default()
}

fn text_of(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

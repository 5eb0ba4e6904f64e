use chrono::NaiveDate;
use serde::Deserialize;

/// Envelope of every CricketData response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub status: Option<String>,
    /// Set when `status` is `"failure"`.
    pub reason: Option<String>,
}

/// One entry of `/v1/currentMatches`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentMatch {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub status: String,
    pub date: Option<String>,
    #[serde(rename = "matchStarted", default)]
    pub match_started: bool,
    #[serde(rename = "matchEnded", default)]
    pub match_ended: bool,
    #[serde(default)]
    pub score: Vec<InningScore>,
}

impl CurrentMatch {
    pub fn match_date(&self) -> Option<NaiveDate> {
        let date = self.date.as_deref()?;
        NaiveDate::parse_from_str(date.get(..10)?, "%Y-%m-%d").ok()
    }

    /// Innings summaries joined with ` | `; empty when no innings has started.
    pub fn score_text(&self) -> String {
        self.score
            .iter()
            .map(InningScore::summary)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Per-innings score. The API has shipped both short (`r`/`w`/`o`) and long
/// (`runs`/`wickets`/`overs`) field names.
#[derive(Debug, Clone, Deserialize)]
pub struct InningScore {
    pub r: Option<u32>,
    pub runs: Option<u32>,
    pub w: Option<u32>,
    pub wickets: Option<u32>,
    pub o: Option<f64>,
    pub overs: Option<f64>,
    #[serde(default)]
    pub inning: String,
}

impl InningScore {
    pub fn runs(&self) -> Option<u32> {
        self.r.or(self.runs)
    }

    pub fn wickets(&self) -> Option<u32> {
        self.w.or(self.wickets)
    }

    pub fn overs(&self) -> Option<f64> {
        self.o.or(self.overs)
    }

    /// `"{team}: {runs}/{wickets} ({overs} ov)"`. Team names listed as
    /// `"India, Australia Inning 1"` keep only the part before the comma.
    pub fn summary(&self) -> String {
        let team = self.inning.split(',').next().unwrap_or_default().trim();
        let show = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
        format!(
            "{}: {}/{} ({} ov)",
            team,
            show(self.runs().map(|n| n.to_string())),
            show(self.wickets().map(|n| n.to_string())),
            show(self.overs().map(|n| n.to_string())),
        )
    }
}

//! Data-driven text classification for scraped match records.
//!
//! Every rule that decides whether a title is noise, how a title is reduced to
//! its canonical key, or whether a status means the match is over lives in a
//! [`PatternTable`]. The canonicalizer and reconciler only ask the table.

use regex::{Regex, RegexBuilder};

use crate::error::Result;

/// Which text of an observation a deny rule is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Status,
    Both,
}

/// A single non-match content indicator.
#[derive(Debug, Clone)]
pub struct DenyRule {
    pub label: String,
    pub field: Field,
    pattern: Regex,
}

impl DenyRule {
    pub fn new(label: &str, pattern: &str, field: Field) -> Result<Self> {
        Ok(Self {
            label: label.to_string(),
            field,
            pattern: case_insensitive(pattern)?,
        })
    }

    fn matches(&self, title: &str, status: &str) -> bool {
        match self.field {
            Field::Title => self.pattern.is_match(title),
            Field::Status => self.pattern.is_match(status),
            Field::Both => self.pattern.is_match(title) || self.pattern.is_match(status),
        }
    }
}

/// Indicators of pages that share the scores listing but are not live matches.
/// Status text of a real match routinely mentions the toss, the series or the
/// commentary feed, so those only apply to titles.
const DEFAULT_DENY_RULES: &[(&str, &str, Field)] = &[
    ("news", r"\bnews\b", Field::Both),
    ("article", r"\barticles?\b", Field::Both),
    ("preview", r"preview", Field::Both),
    ("highlight", r"\bhighlights?\b", Field::Both),
    ("video", r"\bvideos?\b", Field::Both),
    ("blog", r"\bblogs?\b", Field::Both),
    ("photos", r"\bphotos?\b", Field::Both),
    ("report", r"\breports?\b", Field::Title),
    ("commentary", r"\bcommentary\b", Field::Title),
    ("pre-match", r"\bpre-match\b", Field::Title),
    ("toss", r"\btoss\b", Field::Title),
    ("tour", r"\btour\b", Field::Title),
    ("series", r"\bseries\b", Field::Title),
    ("season", r"\bseason\b", Field::Title),
];

/// Status phrases meaning the match has concluded.
pub const DEFAULT_TERMINAL_PATTERNS: &[&str] = &[
    r"\bresult\b",
    r"\bended\b",
    r"\bfinished\b",
    r"\bcompleted?\b",
    r"\bdrawn\b",
    r"\btied\b",
    r"\babandoned\b",
    r"\bcalled off\b",
    r"\bno result\b",
    r"\bfinal\b",
    r"\bwon by\b",
];

#[derive(Debug, Clone)]
pub struct PatternTable {
    team_filter: String,
    suffix: Regex,
    deny: Vec<DenyRule>,
    terminal: Vec<Regex>,
}

impl PatternTable {
    /// Default rules for one team. `team_filter` is the inclusion keyword
    /// ("india"), `team_code` the scoreboard abbreviation ("IND").
    pub fn for_team(team_filter: &str, team_code: &str) -> Result<Self> {
        let team = regex::escape(team_filter.trim());
        let code = regex::escape(team_code.trim());
        let suffix = case_insensitive(&format!(
            r"\s*-\s*(?:complete|preview|result|news|{team}\s+won|{code}w?a?\s+won|\d{{4,}})?\s*$"
        ))?;

        let deny = DEFAULT_DENY_RULES
            .iter()
            .map(|(label, pattern, field)| DenyRule::new(label, pattern, *field))
            .collect::<Result<Vec<_>>>()?;

        let terminal = DEFAULT_TERMINAL_PATTERNS
            .iter()
            .map(|p| case_insensitive(p))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            team_filter: team_filter.trim().to_lowercase(),
            suffix,
            deny,
            terminal,
        })
    }

    /// Replace the terminal-status list. An empty list keeps the defaults.
    pub fn with_terminal_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(self);
        }
        self.terminal = patterns
            .iter()
            .map(|p| case_insensitive(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    /// Reduce a display title to its canonical form.
    ///
    /// Suffixes are stripped until none remain, so the result is a fixpoint:
    /// `strip_suffix(strip_suffix(t)) == strip_suffix(t)`.
    pub fn strip_suffix(&self, title: &str) -> String {
        let mut current = collapse_whitespace(title);
        loop {
            let next = self.suffix.replace(&current, "").trim().to_string();
            if next == current {
                return current;
            }
            current = next;
        }
    }

    pub fn includes_team(&self, title: &str) -> bool {
        self.team_filter.is_empty() || title.to_lowercase().contains(&self.team_filter)
    }

    /// Label of the first deny rule the observation trips, if any.
    pub fn denied(&self, title: &str, status: &str) -> Option<&str> {
        self.deny
            .iter()
            .find(|rule| rule.matches(title, status))
            .map(|rule| rule.label.as_str())
    }

    pub fn is_terminal(&self, status: &str) -> bool {
        self.terminal.iter().any(|re| re.is_match(status))
    }
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn case_insensitive(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

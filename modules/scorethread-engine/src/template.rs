use crate::types::CanonicalRecord;

/// Longest thread name the platform accepts.
pub const THREAD_NAME_LIMIT: usize = 100;

const ELLIPSIS: &str = "...";

/// The starter-message body for a match. The only place user-facing match
/// text is built.
pub fn format_message(record: &CanonicalRecord) -> String {
    let score = if record.score.is_empty() {
        "No score info"
    } else {
        record.score.as_str()
    };
    format!("Live Match: {}\n{}\nStatus: {}", record.title, score, record.status)
}

pub fn thread_name(record: &CanonicalRecord) -> String {
    truncate_name(&format!("{} Live Updates", record.title), THREAD_NAME_LIMIT)
}

/// Cut `name` to at most `limit` characters, marking the cut with `...`.
pub fn truncate_name(name: &str, limit: usize) -> String {
    if name.chars().count() <= limit {
        return name.to_string();
    }
    let keep = limit.saturating_sub(ELLIPSIS.len());
    let mut out: String = name.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Format an ISO 8601 timestamp for display
pub fn format_timestamp(timestamp: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(timestamp) {
        dt.format("%b %d, %Y %H:%M").to_string()
    } else if timestamp.len() >= 10 {
        // Fall back to the date portion of YYYY-MM-DD...
        timestamp.chars().take(10).collect()
    } else {
        timestamp.to_string()
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

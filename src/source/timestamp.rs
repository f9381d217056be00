/// Field label carrying an event's creation time in `/f:text` output.
pub const DATE_FIELD: &str = "Date:";

/// Return the value of the first `Date:` line in `raw`.
///
/// The tool lists events newest first, so this is the newest event's timestamp.
/// The label must start the line once surrounding whitespace is trimmed and is
/// matched case-sensitively. `None` means the batch holds no events.
pub fn extract_latest_timestamp(raw: &str) -> Option<String> {
    raw.lines()
        .map(str::trim)
        .find(|line| line.starts_with(DATE_FIELD))
        .and_then(|line| line.split_once(':'))
        .map(|(_, value)| value.trim().to_string())
}

use regex::Regex;
use std::sync::LazyLock;

static FIELD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    // The greedy prefix swallows every `=` but the last one
    #[allow(clippy::unwrap_used)] // Safe because the regex is valid
    Regex::new(r"^.*=(.*)$").unwrap()
});

/// Returns the values of every `key=value` token on `line`, in order.
///
/// Tokens are separated by whitespace. Keys are discarded and tokens without
/// an `=` are skipped, so `info face="Arial" bold=0` yields `["\"Arial\"", "0"]`.
pub fn field_values(line: &str) -> Vec<&str> {
    line.split_whitespace()
        .filter_map(|token| FIELD_REGEX.captures(token))
        .filter_map(|caps| caps.get(1))
        .map(|value| value.as_str())
        .collect()
}

//! Input validation and display formatting

use regex::Regex;
use std::sync::OnceLock;

/// Longest accepted search input
pub const MAX_INPUT_LENGTH: usize = 100;

/// Check a free-text search query
///
/// Returns a message describing the problem, or `None` if the input is acceptable.
pub fn validate_search_input(input: &str) -> Option<String> {
    if input.chars().count() > MAX_INPUT_LENGTH {
        return Some(format!(
            "Search input is too long (max {MAX_INPUT_LENGTH} characters)"
        ));
    }

    let lowered = input.to_lowercase();
    if ["<script", "javascript:", "data:"]
        .iter()
        .any(|pattern| lowered.contains(pattern))
    {
        return Some("Search input contains invalid characters".to_string());
    }

    None
}

/// Strip tags and markup characters, trim, and cap the length
pub fn sanitize_input(input: &str) -> String {
    static RE_TAG: OnceLock<Regex> = OnceLock::new();
    let re_tag = RE_TAG.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());

    let without_tags = re_tag.replace_all(input, "");
    let cleaned: String = without_tags
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '\'' | '"' | '&'))
        .collect();

    cleaned.trim().chars().take(MAX_INPUT_LENGTH).collect()
}

/// Two or three ASCII letters
pub fn is_valid_country_code(code: &str) -> bool {
    (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Group the integer part of a number with commas
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Compact population figure: `1.4B`, `67.4M`, `39.0K`, or the grouped integer
pub fn format_population(population: Option<u64>) -> String {
    let Some(population) = population else {
        return "N/A".to_string();
    };

    let value = population as f64;
    if population >= 1_000_000_000 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if population >= 1_000_000 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if population >= 1_000 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        group_thousands(population)
    }
}

/// Area in km² with grouped digits and up to three decimals
pub fn format_area(area: Option<f64>) -> String {
    let area = match area {
        Some(a) if a.is_finite() && a >= 0.0 => a,
        _ => return "N/A".to_string(),
    };

    let rounded = (area * 1000.0).round() / 1000.0;
    let whole = rounded.trunc() as u64;
    let fraction = format!("{:.3}", rounded.fract());
    let fraction = fraction.trim_start_matches('0').trim_end_matches('0');
    let fraction = fraction.trim_end_matches('.');

    format!("{}{} km²", group_thousands(whole), fraction)
}

//! Display formatting for salary strings.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Shown wherever a salary is required but the listing has none.
pub const SALARY_NOT_SPECIFIED: &str = "Salary not specified";

/// A standalone run of four or more digits.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LONG_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4,})\b").expect("valid regex"));

/// Insert thousands separators into every standalone number of four or more
/// digits. Everything else passes through unchanged.
///
/// # Examples
/// ```
/// use remoteboard_harvester::html::format_salary;
///
/// assert_eq!(format_salary(Some("100000")), "100,000");
/// assert_eq!(format_salary(Some("$45000-$65000")), "$45,000-$65,000");
/// assert_eq!(format_salary(Some("500")), "500");
/// assert_eq!(format_salary(None), "Salary not specified");
/// ```
pub fn format_salary(salary: Option<&str>) -> String {
    match salary {
        None | Some("") => SALARY_NOT_SPECIFIED.to_string(),
        Some(text) => LONG_NUMBER
            .replace_all(text, |caps: &Captures<'_>| group_thousands(&caps[1]))
            .into_owned(),
    }
}

/// Group a run of digits in threes from the right.
fn group_thousands(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + chars.len() / 3);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    grouped
}

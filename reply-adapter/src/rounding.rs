//! Rounding of decimal numbers embedded in free text.

use regex::Regex;

/// Round every decimal with more than `places` fractional digits to exactly
/// `places` digits. Shorter decimals and integers are left untouched.
pub fn round_numbers_in_text(text: &str, places: usize) -> String {
    if text.is_empty() {
        return String::new();
    }
    let pattern = format!(r"\d+\.\d{{{},}}", places + 1);
    let Ok(re) = Regex::new(&pattern) else {
        return text.to_string();
    };
    re.replace_all(text, |caps: &regex::Captures<'_>| {
        let matched = &caps[0];
        match matched.parse::<f64>() {
            Ok(v) => format!("{:.*}", places, v),
            Err(_) => matched.to_string(),
        }
    })
    .into_owned()
}

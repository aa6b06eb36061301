//! Soft pastel palette shared with the charting front end.

pub const BLUE: &str = "#6B9BD1";
pub const GREEN: &str = "#7FBF7F";
pub const ORANGE: &str = "#F4A460";
pub const RED: &str = "#E69A9A";

/// Color of a PAMF discipline in the scatter view. Unknown disciplines are blue.
pub fn discipline_color(discipline: &str) -> &'static str {
    match discipline.trim().to_uppercase().as_str() {
        "SMT" => ORANGE,
        "LOGISTIC" => BLUE,
        "COVID" => RED,
        "PMT" => GREEN,
        _ => BLUE,
    }
}

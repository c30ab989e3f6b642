//! Measurement conversion constants
//!
//! Named constants to keep conversions out of handler code.

/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;

/// Inches per foot
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Pounds per kilogram
pub const LB_PER_KG: f64 = 2.20462;

/// Convert inches to centimeters
pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

/// Format a height in inches as feet and whole inches, e.g. `5'11"`
pub fn format_feet_inches(total_inches: f64) -> String {
    let rounded = total_inches.round() as i64;
    let feet = rounded / INCHES_PER_FOOT as i64;
    let inches = rounded % INCHES_PER_FOOT as i64;
    format!("{}'{}\"", feet, inches)
}

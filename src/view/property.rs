//! Single key/value property row.

use crate::tree::PropertyValue;

/// Values strictly above this are rendered with the "high" treatment.
pub const HIGH_VALUE_THRESHOLD: f64 = 10.0;

/// Whether a property value gets the highlight style.
///
/// Non-numeric text never qualifies.
pub fn is_high(value: &PropertyValue) -> bool {
    value
        .as_number()
        .map(|n| n > HIGH_VALUE_THRESHOLD)
        .unwrap_or(false)
}

/// `"{key}: {value}"`
pub fn property_text(key: &str, value: &PropertyValue) -> String {
    format!("{}: {}", key, value)
}

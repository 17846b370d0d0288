//! Fixed attribute color palette for event markers.

/// Fallback color for unknown or missing attributes.
pub const DEFAULT_COLOR: &str = "#d4af37";

/// Alpha suffix appended to derive the translucent bar variant.
const BAR_ALPHA: &str = "33";

/// Attribute key → marker color. Keys are the single-character element
/// names the event resources use.
const ATTRIBUTE_COLORS: &[(&str, &str)] = &[
    ("緑", "#28a745"),
    ("赤", "#dc3545"),
    ("青", "#007bff"),
    ("黄", "#ffc107"),
    ("白", "#e0e0e0"),
];

/// Resolve an event's attribute to its marker color. Unknown and missing
/// attributes both resolve to [`DEFAULT_COLOR`].
pub fn attribute_color(attribute: Option<&str>) -> &'static str {
    attribute
        .and_then(|a| {
            ATTRIBUTE_COLORS
                .iter()
                .find(|(key, _)| *key == a)
                .map(|(_, color)| *color)
        })
        .unwrap_or(DEFAULT_COLOR)
}

/// The translucent variant used for score bars.
pub fn bar_color(color: &str) -> String {
    format!("{}{}", color, BAR_ALPHA)
}

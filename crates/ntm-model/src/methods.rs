//! The fixed allow-list of laboratory identification methods.

/// Identification methods accepted when extraction runs in
/// recognized-methods-only mode. Anything else matched after a `BY`/`USING`
/// trigger is discarded in that mode.
pub const RECOGNIZED_METHODS: [&str; 7] = [
    "GEN",
    "GENPROBE",
    "BIOCHEMICAL",
    "BIOCHEMICALS",
    "RPOB",
    "16S",
    "MALDI-TOF",
];

/// Sentinel method assumed when the primary diagnosis column yields a
/// species but no explicit method.
pub const DEFAULT_METHOD: &str = "GENPROBE";

pub fn is_recognized_method(name: &str) -> bool {
    RECOGNIZED_METHODS.contains(&name)
}

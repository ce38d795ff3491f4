//! Facturae unit-of-measure codes.
//!
//! `<UnitOfMeasure>` takes a two-digit code from the Facturae catalog
//! rather than a UN/CEFACT Rec 20 code.

/// Units (default).
pub const UNIT_DEFAULT: &str = "01";
pub const UNIT_HOURS: &str = "02";
pub const UNIT_KILOGRAMS: &str = "03";
pub const UNIT_LITERS: &str = "04";
pub const UNIT_OTHER: &str = "05";
pub const UNIT_BOXES: &str = "06";
pub const UNIT_METERS: &str = "25";
pub const UNIT_WATT: &str = "35";

/// Check whether `code` is a known Facturae unit code.
pub fn is_known_unit_code(code: &str) -> bool {
    UNIT_CODES.binary_search(&code).is_ok()
}

/// Facturae unit codes (sorted for binary search).
static UNIT_CODES: &[&str] = &[
    "01", // Units
    "02", // Hours
    "03", // Kilograms
    "04", // Liters
    "05", // Other
    "06", // Boxes
    "07", // Trays
    "08", // Barrels
    "09", // Jerricans
    "10", // Bags
    "11", // Carboys
    "12", // Bottles
    "13", // Canisters
    "14", // Tetra Briks
    "15", // Centiliters
    "16", // Centimeters
    "17", // Bins
    "18", // Dozens
    "19", // Cases
    "20", // Demijohns
    "21", // Grams
    "22", // Kilometers
    "23", // Cans
    "24", // Bunches
    "25", // Meters
    "26", // Millimeters
    "27", // 6-Packs
    "28", // Packages
    "29", // Portions
    "30", // Rolls
    "31", // Envelopes
    "32", // Tubs
    "33", // Cubic meter
    "34", // Second
    "35", // Watt
];

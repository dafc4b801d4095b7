//! Price cell cleanup.

use amis_api::types::MISSING_VALUE;

/// Reduces a raw price cell to its leading price.
///
/// Prices are published as `"<price>/<unit>"` (e.g. `"45.00/Kg"`) or as a
/// dash placeholder. Missing, blank and dash cells become `"N/A"`; anything
/// else is cut at the first `/` and trimmed. The result is not parsed as a
/// number.
pub fn extract_price(raw: Option<&str>) -> String {
    let trimmed = match raw.map(str::trim) {
        Some(t) if !t.is_empty() && t != "-" => t,
        _ => return MISSING_VALUE.to_string(),
    };
    trimmed
        .split('/')
        .next()
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_placeholder_prices() {
        assert_eq!(extract_price(None), "N/A");
        assert_eq!(extract_price(Some("")), "N/A");
        assert_eq!(extract_price(Some("   ")), "N/A");
        assert_eq!(extract_price(Some("-")), "N/A");
        assert_eq!(extract_price(Some("  -  ")), "N/A");
    }

    #[test]
    fn strips_unit_after_first_slash() {
        assert_eq!(extract_price(Some("45.00/Kg")), "45.00");
        assert_eq!(extract_price(Some(" 120.00 /Kg ")), "120.00");
        assert_eq!(extract_price(Some("3,200/90Kg/bag")), "3,200");
    }

    #[test]
    fn matches_split_then_trim_for_slashed_input() {
        for p in ["1/2", " a / b / c ", "/Kg", "x/", "  7.5/ Kg"] {
            let expected = p.split('/').next().unwrap().trim();
            assert_eq!(extract_price(Some(p)), expected, "input {p:?}");
        }
    }

    #[test]
    fn leaves_plain_values_trimmed() {
        assert_eq!(extract_price(Some("  80.00 ")), "80.00");
        assert_eq!(extract_price(Some("--")), "--");
        assert_eq!(extract_price(Some("Ksh 50")), "Ksh 50");
    }
}

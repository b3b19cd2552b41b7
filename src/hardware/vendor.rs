/// Model-string prefixes and the vendor they belong to. Checked in order,
/// first match wins.
const VENDOR_PREFIXES: &[(&str, &str)] = &[
    ("PERC", "Dell"),
    ("SANDISK", "SanDisk"),
    ("DELL", "Dell"),
    ("ST", "Seagate"),
    ("CRUCIAL", "Crucial"),
    ("MICRON", "Micron"),
    ("INTEL", "Intel"),
    ("SAMSUNG", "Samsung"),
    ("EH0", "HP"),
    ("HGST", "HGST"),
    ("HUH", "HGST"),
    ("MB", "Toshiba"),
    ("MC", "Toshiba"),
    ("MD", "Toshiba"),
    ("MG", "Toshiba"),
    ("WD", "WDC"),
];

/// Map a model or vendor string to a canonical vendor name, or return it
/// unchanged when no prefix matches.
pub fn canonical_vendor(name: &str) -> String {
    let upper = name.to_uppercase();
    VENDOR_PREFIXES
        .iter()
        .find(|(prefix, _)| upper.starts_with(prefix))
        .map(|(_, vendor)| vendor.to_string())
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_prefixes() {
        assert_eq!(canonical_vendor("ST4000NM0035-1V4107"), "Seagate");
        assert_eq!(canonical_vendor("samsung MZ7LH960"), "Samsung");
        assert_eq!(canonical_vendor("WDC WD40EFRX"), "WDC");
        assert_eq!(canonical_vendor("MG04ACA400N"), "Toshiba");
    }

    #[test]
    fn test_declared_order_wins() {
        // "PERC" is listed before anything else that could match.
        assert_eq!(canonical_vendor("PERC H730P Mini"), "Dell");
        assert_eq!(canonical_vendor("HUH721212ALE600"), "HGST");
    }

    #[test]
    fn test_unknown_passthrough() {
        assert_eq!(canonical_vendor("Kingston SA400"), "Kingston SA400");
    }
}

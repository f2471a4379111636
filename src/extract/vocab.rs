//! Fixed vocabularies the remark extractors match against.

/// Drivers on the company roster, in match-precedence order.
pub const KNOWN_DRIVERS: &[&str] = &[
    "Edgardo Agapay",
    "Romel Bantilan",
    "Reynaldo Rizalda",
    "Francis Ariglado",
    "Roque Oling",
    "Pablo Hamo",
    "Albert Saavedra",
    "Jimmy Oclarit",
    "Nicanor",
    "Arnel Duhilag",
    "Benjamin Aloso",
    "Roger",
    "Joseph Bahan",
    "Doming",
    "Jun2x Campaña",
    "Jun2x Toledo",
    "Ronie Babanto",
];

/// Route codes in their canonical casing. Order matters for the substring
/// fallback: the first entry found in the remark wins.
pub const KNOWN_ROUTES: &[&str] = &[
    "PAG-CDO",
    "PAG-ILIGAN",
    "Strike Holcim",
    "PAG-ILIGAN STRIKE",
    "PAG-CDO (CARGILL)",
    "PAG-CDO STRIKE",
    "PAG-BUK",
    "PAG-DIPLAHAN",
    "PAG-MARANDING",
    "PAG-COTABATO",
    "PAG-ZMBGA",
    "Pag-COTABATO",
    "Pag-AURORA",
    "PAG-DIPOLOG",
    "PAG-MOLAVE",
    "PAGADIAN",
    "PAG-DIMATALING",
    "PAG-DINAS",
    "PAG-LABANGAN",
    "PAG-MIDSALIP",
    "PAG-OZAMIS",
    "PAG-OSMENIA",
    "PAG-DUMINGAG",
    "PAG-KUMALARANG",
    "PAG-MAHAYAG",
    "PAG-TAMBULIG",
    "PAG-SURIGAO",
    "PAG-BUYOGAN",
    "PAG-SAN PABLO",
    "PAGADIAN-OPEX",
    "CDO-OPEX",
    "PAG-BAYOG",
    "PAG-LAKEWOOD",
    "PAG-BUUG",
];

/// Load names accepted without any word-shape checks (lower-case).
pub const KNOWN_LOADS: &[&str] = &[
    "strike",
    "cement",
    "cemento",
    "rh holcim",
    "backload cdo",
    "humay",
    "bugas",
    "rice",
    "gravel",
    "sand",
];

/// Connective words, units and generic nouns that are never a load on
/// their own. Remarks mix English and Cebuano shorthand, hence "ug", "sa".
pub const NON_LOAD_WORDS: &[&str] = &[
    "sa", "hw", "on", "daily", "the", "and", "or", "but", "in", "at", "to", "for", "of", "with",
    "by", "from", "up", "down", "out", "off", "over", "under", "lro", "liters", "fuel", "oil",
    "ug", "ni", "mag", "para", "additional", "transport", "goods", "items", "load", "delivery",
    "pickup", "mao", "transfer", "pundo", "tangke", "bugas", "humay",
];

/// Canonical display forms, keyed by lower-case spelling.
pub const CANONICAL_LOADS: &[(&str, &str)] = &[
    ("backload cdo", "Backload CDO"),
    ("rh holcim", "RH Holcim"),
    ("strike holcim", "Strike Holcim"),
    ("strike", "Strike"),
    ("cement", "Cement"),
    ("cemento", "Cemento"),
];

/// Verbs and fillers stripped from a load candidate before re-validation.
pub const LOAD_FILLER_WORDS: &[&str] = &[
    "deliver",
    "backload",
    "kuha",
    "ug",
    "ni",
    "sa",
    "mag",
    "para",
    "additional",
    "pundo",
    "tangke",
];

/// Case-insensitive roster lookup returning the canonical spelling.
pub fn canonical_route(candidate: &str) -> Option<&'static str> {
    KNOWN_ROUTES
        .iter()
        .find(|route| route.eq_ignore_ascii_case(candidate))
        .copied()
}

pub fn is_non_load_word(word: &str) -> bool {
    NON_LOAD_WORDS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_route_restores_roster_casing() {
        assert_eq!(canonical_route("pag-iligan"), Some("PAG-ILIGAN"));
        assert_eq!(canonical_route("STRIKE HOLCIM"), Some("Strike Holcim"));
        assert_eq!(canonical_route("PAG-NOWHERE"), None);
    }

    #[test]
    fn test_case_variant_routes_resolve_to_first_entry() {
        // "PAG-COTABATO" and "Pag-COTABATO" are both on the roster.
        assert_eq!(canonical_route("pag-cotabato"), Some("PAG-COTABATO"));
    }

    #[test]
    fn test_vocabularies_are_lower_case() {
        for word in KNOWN_LOADS.iter().chain(NON_LOAD_WORDS).chain(LOAD_FILLER_WORDS) {
            assert_eq!(*word, word.to_lowercase(), "{word} should be lower-case");
        }
        for (key, _) in CANONICAL_LOADS {
            assert_eq!(*key, key.to_lowercase());
        }
    }
}

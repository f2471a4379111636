use regex::Regex;

use super::load::{is_valid_load, normalize_load};
use super::{regex, Cascade, Matcher};

/// Outbound and return cargo of a trip. Either side may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadPair {
    pub front: Option<String>,
    pub back: Option<String>,
}

impl LoadPair {
    pub fn is_empty(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }
}

/// Finds the front/back loads in a remark.
///
/// Callers only ask once driver and route are known for the row, otherwise
/// parts lists such as "Fan Belt/Grease" read as cargo.
pub struct LoadPairExtractor {
    cascade: Cascade<LoadPair>,
}

impl LoadPairExtractor {
    pub fn new() -> Self {
        Self {
            cascade: Cascade::new("load_pair")
                .then(SlashPair {
                    name: "colon_pair",
                    re: regex(r":\s*([A-Za-z\s]+)/([A-Za-z\s]+):"),
                })
                .then(SlashPair {
                    name: "trailing_pair",
                    re: regex(r":\s*([A-Za-z\s]+)/([A-Za-z\s]+)\s*$"),
                })
                .then(SlashPair {
                    name: "deliver_backload",
                    re: regex(r"(?i)deliver\s+([a-zA-Z]+)\s+backload\s+([a-zA-Z]+)"),
                })
                .then(SingleLoad {
                    name: "deliver",
                    side: Side::Front,
                    re: regex(r"(?i)deliver\s+(?:ug\s+)?([a-zA-Z]+)"),
                })
                .then(SingleLoad {
                    name: "pickup",
                    side: Side::Back,
                    re: regex(r"(?i)kuha\s+(?:ug\s+)?([a-zA-Z]+)"),
                })
                .then(SlashPair {
                    name: "after_route",
                    re: regex(r"(?i)(?:PAG-[A-Z]+|DIMATALING|DUMINGAG):\s*([A-Za-z\s]+)/([A-Za-z\s]+)"),
                }),
        }
    }

    pub fn extract(&self, remarks: Option<&str>) -> LoadPair {
        remarks
            .and_then(|text| self.cascade.first_match(text))
            .unwrap_or_default()
    }
}

impl Default for LoadPairExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate then canonicalize one captured load.
fn accept(candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    if !is_valid_load(candidate) {
        return None;
    }
    normalize_load(candidate)
}

/// Two loads captured together; both must be acceptable.
struct SlashPair {
    name: &'static str,
    re: Regex,
}

impl Matcher for SlashPair {
    type Output = LoadPair;

    fn name(&self) -> &'static str {
        self.name
    }

    fn attempt(&self, text: &str) -> Option<LoadPair> {
        let caps = self.re.captures(text)?;
        let front = accept(&caps[1])?;
        let back = accept(&caps[2])?;
        Some(LoadPair {
            front: Some(front),
            back: Some(back),
        })
    }
}

#[derive(Clone, Copy)]
enum Side {
    Front,
    Back,
}

/// A verb naming one side only: "deliver cemento" or "kuha ug humay".
struct SingleLoad {
    name: &'static str,
    side: Side,
    re: Regex,
}

impl Matcher for SingleLoad {
    type Output = LoadPair;

    fn name(&self) -> &'static str {
        self.name
    }

    fn attempt(&self, text: &str) -> Option<LoadPair> {
        let caps = self.re.captures(text)?;
        let load = accept(&caps[1])?;
        Some(match self.side {
            Side::Front => LoadPair {
                front: Some(load),
                back: None,
            },
            Side::Back => LoadPair {
                front: None,
                back: Some(load),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(remarks: &str) -> LoadPair {
        LoadPairExtractor::new().extract(Some(remarks))
    }

    fn pair(front: Option<&str>, back: Option<&str>) -> LoadPair {
        LoadPair {
            front: front.map(str::to_string),
            back: back.map(str::to_string),
        }
    }

    #[test]
    fn test_colon_delimited_pair() {
        assert_eq!(
            extract("Roque Oling: PAG-ILIGAN: Strike/Cement:"),
            pair(Some("Strike"), Some("Cement"))
        );
        assert_eq!(
            extract("Pablo Hamo: PAG-CDO: rh holcim/cemento:"),
            pair(Some("RH Holcim"), Some("Cemento"))
        );
    }

    #[test]
    fn test_trailing_pair() {
        assert_eq!(
            extract("Pablo Hamo: PAG-CDO: Copra/Rice  "),
            pair(Some("Copra"), Some("Rice"))
        );
    }

    #[test]
    fn test_deliver_backload() {
        assert_eq!(
            extract("PAG-CDO deliver cemento backload humay"),
            pair(Some("Cemento"), Some("humay"))
        );
    }

    #[test]
    fn test_deliver_front_only() {
        assert_eq!(extract("PAG-CDO Deliver ug cemento"), pair(Some("Cemento"), None));
    }

    #[test]
    fn test_pickup_back_only() {
        assert_eq!(extract("PAG-CDO kuha ug gravel"), pair(None, Some("gravel")));
    }

    #[test]
    fn test_pair_after_route() {
        assert_eq!(
            extract("Roque Oling PAG-ILIGAN: Strike/Cement, extra"),
            pair(Some("Strike"), Some("Cement"))
        );
    }

    #[test]
    fn test_invalid_pair_falls_through() {
        assert_eq!(
            extract("Roque Oling: PAG-CDO: sa/ug: deliver cemento"),
            pair(Some("Cemento"), None)
        );
    }

    #[test]
    fn test_no_match() {
        assert!(extract("change oil").is_empty());
        assert!(LoadPairExtractor::new().extract(None).is_empty());
    }
}

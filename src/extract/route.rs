use regex::Regex;

use super::vocab::{canonical_route, KNOWN_ROUTES};
use super::{regex, Cascade, Matcher};

/// Finds the route code named in a remark, in canonical roster casing.
pub struct RouteExtractor {
    cascade: Cascade<&'static str>,
}

impl RouteExtractor {
    pub fn new() -> Self {
        Self {
            cascade: Cascade::new("route")
                .then(RoutePattern {
                    name: "route_colon",
                    re: regex(
                        r"(?i)(PAG-[A-Z]+|DIMATALING|DUMINGAG|Strike\s+Holcim|CDO-OPEX|PAGADIAN-OPEX|PAGADIAN):",
                    ),
                })
                .then(RoutePattern {
                    name: "after_field",
                    re: regex(r"(?i):\s*(PAG-[A-Z]+|DIMATALING|DUMINGAG)[\s:]"),
                })
                .then(RosterScan),
        }
    }

    pub fn extract(&self, remarks: Option<&str>) -> Option<String> {
        self.cascade.first_match(remarks?).map(str::to_string)
    }
}

impl Default for RouteExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// A route-shaped token captured by `re`, accepted only if it is on the
/// roster. Only the first occurrence in the remark is considered.
struct RoutePattern {
    name: &'static str,
    re: Regex,
}

impl Matcher for RoutePattern {
    type Output = &'static str;

    fn name(&self) -> &'static str {
        self.name
    }

    fn attempt(&self, text: &str) -> Option<&'static str> {
        let caps = self.re.captures(text)?;
        canonical_route(caps[1].trim())
    }
}

/// Any roster route mentioned anywhere, first roster entry wins.
struct RosterScan;

impl Matcher for RosterScan {
    type Output = &'static str;

    fn name(&self) -> &'static str {
        "roster_scan"
    }

    fn attempt(&self, text: &str) -> Option<&'static str> {
        let upper = text.to_uppercase();
        KNOWN_ROUTES
            .iter()
            .find(|route| upper.contains(&route.to_uppercase()))
            .copied()
    }
}

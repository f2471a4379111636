use regex::Regex;

use super::vocab::KNOWN_DRIVERS;
use super::{regex, Cascade, Matcher};

const FUEL_LOG_NOISE: &[&str] = &["lro", "liters", "fuel", "oil"];
const ROUTE_TOKENS: &[&str] = &["PAG-", "CDO", "ILIGAN", "STRIKE"];
const NON_DRIVER_WORDS: &[&str] = &["lro", "liters", "fuel", "oil", "deliver", "transfer"];

/// Finds the driver named in a remark.
pub struct DriverExtractor {
    cascade: Cascade<String>,
}

impl DriverExtractor {
    pub fn new() -> Self {
        Self {
            cascade: Cascade::new("driver")
                .then(RosterName)
                .then(DriverPair::new())
                .then(FuelLogName::new())
                .then(TitleCaseName::new()),
        }
    }

    pub fn extract(&self, remarks: Option<&str>) -> Option<String> {
        self.cascade.first_match(remarks?)
    }
}

impl Default for DriverExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// A roster name appearing verbatim anywhere in the remark.
struct RosterName;

impl Matcher for RosterName {
    type Output = String;

    fn name(&self) -> &'static str {
        "roster"
    }

    fn attempt(&self, text: &str) -> Option<String> {
        KNOWN_DRIVERS
            .iter()
            .find(|driver| text.contains(*driver))
            .map(|driver| driver.to_string())
    }
}

/// Relay trips: "Jimmy/Romel Bantilan:". At least one side has to be part of
/// a roster name; the pair is kept exactly as written.
struct DriverPair {
    re: Regex,
}

impl DriverPair {
    fn new() -> Self {
        Self {
            re: regex(r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)/([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*):"),
        }
    }
}

impl Matcher for DriverPair {
    type Output = String;

    fn name(&self) -> &'static str {
        "driver_pair"
    }

    fn attempt(&self, text: &str) -> Option<String> {
        let caps = self.re.captures(text)?;
        let first = caps[1].trim();
        let second = caps[2].trim();
        KNOWN_DRIVERS
            .iter()
            .any(|driver| driver.contains(first) || driver.contains(second))
            .then(|| format!("{first}/{second}"))
    }
}

/// Fuel log entries: "LRO: 140Liters Fuel and Oil ABC-123 Roque Oling:".
struct FuelLogName {
    re: Regex,
}

impl FuelLogName {
    fn new() -> Self {
        Self {
            re: regex(
                r"LRO:\s*\d+Liters\s+Fuel\s+and\s+Oil\s+(?:[A-Z]+-\d+\s+)?([A-Za-z\s]+?)(?::|;)",
            ),
        }
    }
}

impl Matcher for FuelLogName {
    type Output = String;

    fn name(&self) -> &'static str {
        "fuel_log"
    }

    fn attempt(&self, text: &str) -> Option<String> {
        let caps = self.re.captures(text)?;
        let candidate = caps[1].trim();
        let lower = candidate.to_lowercase();
        if candidate.chars().count() <= 2 || FUEL_LOG_NOISE.iter().any(|w| lower.contains(w)) {
            return None;
        }
        if let Some(driver) = KNOWN_DRIVERS
            .iter()
            .find(|driver| lower.contains(&driver.to_lowercase()))
        {
            return Some(driver.to_string());
        }
        // Unverified, but two words read like a person's name.
        (word_count(candidate) >= 2).then(|| candidate.to_string())
    }
}

/// Any "Title Case Name:" that is not a route or a fuel/delivery note.
struct TitleCaseName {
    re: Regex,
}

impl TitleCaseName {
    fn new() -> Self {
        Self {
            re: regex(r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)+):"),
        }
    }
}

impl Matcher for TitleCaseName {
    type Output = String;

    fn name(&self) -> &'static str {
        "title_case"
    }

    fn attempt(&self, text: &str) -> Option<String> {
        self.re.captures_iter(text).find_map(|caps| {
            let candidate = caps[1].trim();
            let upper = candidate.to_uppercase();
            let lower = candidate.to_lowercase();
            if ROUTE_TOKENS.iter().any(|t| upper.contains(t))
                || NON_DRIVER_WORDS.iter().any(|w| lower.contains(w))
            {
                return None;
            }
            if let Some(driver) = KNOWN_DRIVERS
                .iter()
                .find(|driver| driver.to_lowercase() == lower)
            {
                return Some(driver.to_string());
            }
            (word_count(candidate) >= 2).then(|| candidate.to_string())
        })
    }
}

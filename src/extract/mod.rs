//! Remark parsing: ordered pattern cascades that pull a driver, a route and
//! a front/back load pair out of free-text ledger remarks.

mod driver;
mod load;
mod load_pair;
mod route;
pub mod vocab;

pub use driver::DriverExtractor;
pub use load_pair::LoadPairExtractor;
pub use route::RouteExtractor;

use regex::Regex;

/// One pattern in a cascade.
pub trait Matcher: Send + Sync {
    type Output;

    /// Short identifier used in trace output and tests.
    fn name(&self) -> &'static str;

    fn attempt(&self, text: &str) -> Option<Self::Output>;
}

/// An ordered list of matchers; the first one that succeeds wins.
pub struct Cascade<T> {
    label: &'static str,
    matchers: Vec<Box<dyn Matcher<Output = T>>>,
}

impl<T> Cascade<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            matchers: Vec::new(),
        }
    }

    pub fn then(mut self, matcher: impl Matcher<Output = T> + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    pub fn first_match(&self, text: &str) -> Option<T> {
        self.matchers.iter().find_map(|m| {
            let found = m.attempt(text);
            if found.is_some() {
                tracing::debug!(extractor = self.label, pattern = m.name(), "remark pattern matched");
            }
            found
        })
    }
}

/// Compile a pattern literal. Only called with constants, so a failure is a
/// programming error.
pub(crate) fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

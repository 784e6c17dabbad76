//! Runtime configuration.

use crate::gc::GcPolicy;

/// Default ceiling on eval/apply and reader nesting. Fits an 8 MiB native
/// stack in unoptimised builds.
pub const DEFAULT_MAX_DEPTH: usize = 2_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// When the collector runs.
    pub gc: GcPolicy,
    /// Most pairs the heap may hold at once. `None` lets it grow.
    pub max_pairs: Option<usize>,
    /// Deepest eval/apply or reader nesting before the session fails.
    pub max_depth: usize,
    /// Treat a blank input line as end of input.
    pub blank_line_ends_input: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gc: GcPolicy::TopLevel,
            max_pairs: None,
            max_depth: DEFAULT_MAX_DEPTH,
            blank_line_ends_input: true,
        }
    }
}

impl Config {
    pub fn with_gc(mut self, gc: GcPolicy) -> Self {
        self.gc = gc;
        self
    }

    pub fn with_max_pairs(mut self, max_pairs: Option<usize>) -> Self {
        self.max_pairs = max_pairs;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_blank_line_ends_input(mut self, enabled: bool) -> Self {
        self.blank_line_ends_input = enabled;
        self
    }
}

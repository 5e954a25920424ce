//! Engine configuration types.

use serde::Deserialize;

/// How `apply` treats variables bound by quantifiers and lambdas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinderPolicy {
    /// Rewrite inside binder scopes exactly like anywhere else, bound
    /// variable position included. Not capture-avoiding.
    #[default]
    Transparent,
    /// Inside a binder, drop the matchers whose pattern is the bound
    /// variable. Bound variables are never renamed, so capture is still
    /// possible through the replacement terms.
    Shadowing,
}

/// Limits and policies for a single engine call
///
/// Passed explicitly into every operation that recurses or iterates, so
/// independent callers can run with different bounds at the same time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum nesting depth `apply` descends before giving up
    pub max_depth: usize,
    /// Maximum number of `apply` passes the fixed-point driver makes
    pub max_iterations: usize,
    pub binder_policy: BinderPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_depth: 512,
            max_iterations: 100,
            binder_policy: BinderPolicy::Transparent,
        }
    }
}

impl EngineConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_binder_policy(mut self, binder_policy: BinderPolicy) -> Self {
        self.binder_policy = binder_policy;
        self
    }
}

//! Fresh name generation scoped to one function.
//!
//! Synthesized block names and SSA names must not collide with names the function
//! already uses. A [`NameGenerator`] is seeded with the names that are taken and hands
//! out new ones from there. Each transformation creates its own generator, so there is
//! no counter shared between functions or between runs.

use std::collections::HashSet;

/// Hands out names that are unique within one function.
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    taken: HashSet<String>,
}

impl NameGenerator {
    /// Creates a generator that avoids every name in `taken`.
    pub fn new<I, S>(taken: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            taken: taken.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if `name` is already in use.
    #[must_use]
    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Returns `<prefix><n>` for the smallest `n >= 1` that is free, and reserves it.
    pub fn fresh(&mut self, prefix: &str) -> String {
        let name = (1..)
            .map(|n| format!("{prefix}{n}"))
            .find(|candidate| !self.taken.contains(candidate))
            .unwrap_or_default();
        self.taken.insert(name.clone());
        name
    }

    /// Returns `prefix` itself when free, otherwise behaves like [`Self::fresh`].
    pub fn fresh_exact(&mut self, prefix: &str) -> String {
        if self.taken.insert(prefix.to_string()) {
            return prefix.to_string();
        }
        self.fresh(prefix)
    }
}

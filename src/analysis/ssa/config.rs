//! SSA transformation settings.

/// Configuration of the SSA constructor.
///
/// # Example
///
/// ```rust
/// use irflow::analysis::SsaConfig;
///
/// let config = SsaConfig {
///     separator: "@".to_string(),
/// };
/// assert_eq!(config.qualify("x", "loop"), "x@loop");
/// assert_eq!(SsaConfig::default().qualify("x", "loop"), "x.loop");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsaConfig {
    /// Text between a variable and the block name in a block-local name.
    pub separator: String,
}

impl Default for SsaConfig {
    fn default() -> Self {
        Self {
            separator: ".".to_string(),
        }
    }
}

impl SsaConfig {
    /// Returns the preferred block-local name of `var` in `block`.
    #[must_use]
    pub fn qualify(&self, var: &str, block: &str) -> String {
        format!("{var}{}{block}", self.separator)
    }
}

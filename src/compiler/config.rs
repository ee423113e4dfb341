//! Pipeline configuration.

use crate::analysis::{SsaConfig, WorklistOrder};

/// Settings shared by the passes and analyses a [`PassScheduler`] runs.
///
/// [`PassScheduler`]: crate::compiler::PassScheduler
///
/// # Example
///
/// ```rust
/// use irflow::analysis::WorklistOrder;
/// use irflow::compiler::CompilerConfig;
///
/// let config = CompilerConfig {
///     worklist_order: WorklistOrder::ReversePostorder,
///     parallel: false,
///     ..Default::default()
/// };
/// assert_eq!(config.ssa.separator, ".");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Naming of block-local SSA variables.
    pub ssa: SsaConfig,
    /// Initial worklist order of data flow analyses.
    pub worklist_order: WorklistOrder,
    /// Process functions of a program in parallel.
    pub parallel: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            ssa: SsaConfig::default(),
            worklist_order: WorklistOrder::default(),
            parallel: true,
        }
    }
}

//! The interface every function-level transformation implements.

use crate::{ir::Function, Result};

/// A transformation applied to one function at a time.
///
/// Passes must not keep state between functions: the
/// [`PassScheduler`](crate::compiler::PassScheduler) may run the same pass on several
/// functions concurrently.
///
/// # Example
///
/// ```rust
/// use irflow::compiler::FunctionPass;
/// use irflow::ir::{EffectOp, Function};
///
/// /// Removes `nop`s.
/// struct StripNops;
///
/// impl FunctionPass for StripNops {
///     fn name(&self) -> &'static str {
///         "strip-nops"
///     }
///
///     fn run_on_function(&self, function: &mut Function) -> irflow::Result<bool> {
///         let before = function.instrs.len();
///         function.instrs.retain(|instr| !instr.is_effect(EffectOp::Nop));
///         Ok(function.instrs.len() != before)
///     }
/// }
/// ```
pub trait FunctionPass: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// One-line description.
    fn description(&self) -> &'static str {
        ""
    }

    /// Rewrites `function` in place.
    ///
    /// Returns `true` if the instructions changed.
    ///
    /// # Errors
    ///
    /// An error aborts this pass for this function only. The scheduler restores the
    /// function's original instructions.
    fn run_on_function(&self, function: &mut Function) -> Result<bool>;
}

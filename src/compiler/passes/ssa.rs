//! Passes that move functions into and out of get/set SSA form.

use crate::{
    analysis::{SsaConfig, SsaConstructor, SsaDestructor},
    compiler::pass::FunctionPass,
    ir::Function,
    Result,
};

/// Converts a function into get/set SSA form.
#[derive(Debug, Clone, Default)]
pub struct IntoSsaPass {
    constructor: SsaConstructor,
}

impl IntoSsaPass {
    /// Creates the pass with the given naming configuration.
    #[must_use]
    pub fn new(config: SsaConfig) -> Self {
        Self {
            constructor: SsaConstructor::new(config),
        }
    }
}

impl FunctionPass for IntoSsaPass {
    fn name(&self) -> &'static str {
        "into-ssa"
    }

    fn description(&self) -> &'static str {
        "Rename variables per block and link blocks with get/set"
    }

    fn run_on_function(&self, function: &mut Function) -> Result<bool> {
        let instrs = self.constructor.construct(function)?;
        let changed = instrs != function.instrs;
        function.instrs = instrs;
        Ok(changed)
    }
}

/// Lowers a function out of get/set SSA form.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromSsaPass {
    destructor: SsaDestructor,
}

impl FromSsaPass {
    /// Creates the pass.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            destructor: SsaDestructor::new(),
        }
    }
}

impl FunctionPass for FromSsaPass {
    fn name(&self) -> &'static str {
        "from-ssa"
    }

    fn description(&self) -> &'static str {
        "Drop get and turn set into id"
    }

    fn run_on_function(&self, function: &mut Function) -> Result<bool> {
        let instrs = self.destructor.destruct(&function.instrs)?;
        let changed = instrs != function.instrs;
        function.instrs = instrs;
        Ok(changed)
    }
}

//! Pass scheduler for running passes over every function of a program.
//!
//! Functions are independent of each other, so the scheduler processes them in
//! parallel with `rayon` unless [`CompilerConfig::parallel`] is off. A failure in one
//! function never affects the others: the failing function keeps its original
//! instructions and the error is recorded in the [`SchedulerReport`].

use std::fmt;

use log::{debug, warn};
use rayon::prelude::*;

use crate::{
    analysis::{reaching_definitions_with, ReachingReport},
    compiler::{
        config::CompilerConfig,
        pass::FunctionPass,
        passes::{FromSsaPass, IntoSsaPass},
    },
    ir::{Function, Program},
    Error, Result,
};

/// What happened to one function during a [`PassScheduler::run`].
#[derive(Debug)]
pub struct FunctionOutcome {
    /// Function name.
    pub function: String,
    /// `Ok(changed)`, or the error that aborted the function.
    pub result: Result<bool>,
}

impl FunctionOutcome {
    /// Returns `true` if every pass succeeded and at least one changed the function.
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(self.result, Ok(true))
    }

    /// Returns the error, if the function failed.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.result.as_ref().err()
    }
}

/// Per-function results of a [`PassScheduler::run`], in program order.
#[derive(Debug, Default)]
pub struct SchedulerReport {
    outcomes: Vec<FunctionOutcome>,
}

impl SchedulerReport {
    /// Returns every outcome, in program order.
    #[must_use]
    pub fn outcomes(&self) -> &[FunctionOutcome] {
        &self.outcomes
    }

    /// Returns the outcome for `function`.
    #[must_use]
    pub fn outcome(&self, function: &str) -> Option<&FunctionOutcome> {
        self.outcomes.iter().find(|o| o.function == function)
    }

    /// Returns the names of the functions that changed.
    pub fn changed(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.changed())
            .map(|o| o.function.as_str())
    }

    /// Returns the functions that failed with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error().map(|err| (o.function.as_str(), err)))
    }

    /// Returns `true` if no function failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

impl fmt::Display for SchedulerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(true) => writeln!(f, "{}: changed", outcome.function)?,
                Ok(false) => writeln!(f, "{}: unchanged", outcome.function)?,
                Err(err) => writeln!(f, "{}: failed: {err}", outcome.function)?,
            }
        }
        Ok(())
    }
}

/// Runs a sequence of [`FunctionPass`]es over every function of a [`Program`].
///
/// # Example
///
/// ```rust
/// use irflow::compiler::{CompilerConfig, PassScheduler};
/// use irflow::ir::{Function, Instruction, Literal, Program, Type};
///
/// let mut program = Program {
///     functions: vec![Function::new(
///         "main",
///         vec![],
///         vec![
///             Instruction::constant("x", Type::Int, Literal::Int(1)),
///             Instruction::print(["x"]),
///         ],
///     )],
/// };
///
/// let report = PassScheduler::round_trip(CompilerConfig::default()).run(&mut program);
/// assert!(report.is_success());
/// ```
pub struct PassScheduler {
    /// Settings for passes and analyses.
    config: CompilerConfig,
    /// Passes, in execution order.
    passes: Vec<Box<dyn FunctionPass>>,
}

impl Default for PassScheduler {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

impl PassScheduler {
    /// Creates a scheduler without passes.
    #[must_use]
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            passes: Vec::new(),
        }
    }

    /// A scheduler that converts every function into SSA form.
    #[must_use]
    pub fn into_ssa(config: CompilerConfig) -> Self {
        let pass = IntoSsaPass::new(config.ssa.clone());
        Self::new(config).with_pass(pass)
    }

    /// A scheduler that lowers every function out of SSA form.
    #[must_use]
    pub fn from_ssa(config: CompilerConfig) -> Self {
        Self::new(config).with_pass(FromSsaPass::new())
    }

    /// A scheduler that converts into SSA form and straight back out.
    #[must_use]
    pub fn round_trip(config: CompilerConfig) -> Self {
        Self::into_ssa(config).with_pass(FromSsaPass::new())
    }

    /// Appends a pass.
    #[must_use]
    pub fn with_pass(mut self, pass: impl FunctionPass + 'static) -> Self {
        self.add_pass(Box::new(pass));
        self
    }

    /// Appends a boxed pass.
    pub fn add_pass(&mut self, pass: Box<dyn FunctionPass>) {
        self.passes.push(pass);
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Returns the names of the scheduled passes, in order.
    #[must_use]
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Runs every pass over every function of `program`.
    ///
    /// Passes run in order on each function. If a pass fails, the function's
    /// instructions are restored to what they were before the first pass and the
    /// remaining passes are skipped for that function.
    pub fn run(&self, program: &mut Program) -> SchedulerReport {
        let outcomes: Vec<FunctionOutcome> = if self.config.parallel {
            program
                .functions
                .par_iter_mut()
                .map(|function| self.run_function(function))
                .collect()
        } else {
            program
                .functions
                .iter_mut()
                .map(|function| self.run_function(function))
                .collect()
        };

        let report = SchedulerReport { outcomes };
        debug!(
            "Ran {} passes over {} functions: {} changed, {} failed",
            self.passes.len(),
            report.outcomes.len(),
            report.changed().count(),
            report.failures().count()
        );
        report
    }

    fn run_function(&self, function: &mut Function) -> FunctionOutcome {
        let original = function.instrs.clone();
        let mut changed = false;

        for pass in &self.passes {
            match pass.run_on_function(function) {
                Ok(pass_changed) => {
                    debug!(
                        "Pass '{}' on '{}': {}",
                        pass.name(),
                        function.name,
                        if pass_changed { "changed" } else { "unchanged" }
                    );
                    changed |= pass_changed;
                }
                Err(err) => {
                    warn!(
                        "Pass '{}' failed on '{}': {}",
                        pass.name(),
                        function.name,
                        err
                    );
                    function.instrs = original;
                    return FunctionOutcome {
                        function: function.name.clone(),
                        result: Err(err.in_function(function.name.as_str())),
                    };
                }
            }
        }

        FunctionOutcome {
            function: function.name.clone(),
            result: Ok(changed),
        }
    }

    /// Computes reaching definitions for every function of `program`.
    ///
    /// Uses the configured worklist order. Results are in program order.
    #[must_use]
    pub fn reaching_definitions(&self, program: &Program) -> Vec<(String, Result<ReachingReport>)> {
        let order = self.config.worklist_order;
        let analyze = |function: &Function| {
            let report = reaching_definitions_with(function, order)
                .map_err(|err| err.in_function(function.name.as_str()));
            (function.name.clone(), report)
        };

        if self.config.parallel {
            program.functions.par_iter().map(analyze).collect()
        } else {
            program.functions.iter().map(analyze).collect()
        }
    }
}

//! Naive SSA construction with `get`/`set` pseudo-operations.
//!
//! Instead of placing phi nodes at dominance frontiers, every non-entry block reads
//! every variable at its top and publishes every variable at its bottom:
//!
//! ```text
//! .L:
//!   x: int = get;          # current value of x
//!   x.L: int = id x;       # block-local copy
//!   ...                    # body, with x renamed to x.L
//!   set x x.L;             # publish
//!   jmp .M;
//! ```
//!
//! The entry block keeps plain names and publishes them before its terminator. A
//! bootstrap sequence ahead of the function body gives every non-parameter variable
//! an `undef` value, so every `get` observes a defined value on every path.

use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};

use crate::{
    analysis::{
        ssa::{config::SsaConfig, types::TypeTable},
        BasicBlock, BlockMap, ControlFlowGraph,
    },
    ir::{Function, Instruction},
    utils::NameGenerator,
    Result,
};

/// Block-local names of every variable, per block.
///
/// Built per function; nothing is shared between functions.
#[derive(Debug)]
struct RenameTable {
    names: HashMap<(String, String), String>,
}

impl RenameTable {
    fn new(
        config: &SsaConfig,
        blocks: &BlockMap,
        variables: &BTreeSet<String>,
        mut generator: NameGenerator,
    ) -> Self {
        let mut names = HashMap::new();
        for block in blocks {
            for var in variables {
                let unique = generator.fresh_exact(&config.qualify(var, block.name()));
                names.insert((var.clone(), block.name().to_string()), unique);
            }
        }
        Self { names }
    }

    fn unique(&self, var: &str, block: &str) -> Option<&str> {
        self.names
            .get(&(var.to_string(), block.to_string()))
            .map(String::as_str)
    }
}

/// Converts functions into get/set SSA form.
///
/// # Example
///
/// ```rust
/// use irflow::analysis::{SsaConfig, SsaConstructor};
/// use irflow::ir::{Function, Instruction, Literal, Type};
///
/// let function = Function::new(
///     "main",
///     vec![],
///     vec![
///         Instruction::constant("x", Type::Int, Literal::Int(1)),
///         Instruction::jmp("next"),
///         Instruction::label("next"),
///         Instruction::print(["x"]),
///     ],
/// );
///
/// let ssa = SsaConstructor::new(SsaConfig::default()).construct(&function)?;
/// assert!(ssa.contains(&Instruction::get("x", Some(Type::Int))));
/// assert!(ssa.contains(&Instruction::print(["x.next"])));
/// assert!(ssa.contains(&Instruction::set("x", "x.next")));
/// # Ok::<(), irflow::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SsaConstructor {
    config: SsaConfig,
}

impl SsaConstructor {
    /// Creates a constructor with the given configuration.
    #[must_use]
    pub fn new(config: SsaConfig) -> Self {
        Self { config }
    }

    /// Rewrites `function` into SSA form and returns its new instructions.
    ///
    /// # Errors
    ///
    /// Fails if the control flow graph cannot be built, for example when a jump
    /// targets an unknown label.
    pub fn construct(&self, function: &Function) -> Result<Vec<Instruction>> {
        let (mut blocks, _) = ControlFlowGraph::build(&function.instrs)?.into_parts();
        let Some(entry_name) = blocks.entry().map(|b| b.name().to_string()) else {
            return Ok(Vec::new());
        };

        let types = TypeTable::new(&function.args, &function.instrs);
        let params: BTreeSet<&str> = function.arg_names().collect();
        let variables: BTreeSet<String> = blocks
            .iter()
            .flat_map(BasicBlock::definitions)
            .map(str::to_string)
            .collect();

        let mut undefined = BTreeSet::new();
        let mut taken: Vec<String> = params.iter().map(|p| (*p).to_string()).collect();
        for block in &blocks {
            for instr in block.instructions() {
                taken.extend(instr.dest().map(str::to_string));
                for arg in instr.args() {
                    taken.push(arg.clone());
                    if !variables.contains(arg) && !params.contains(arg.as_str()) {
                        undefined.insert(arg.clone());
                    }
                }
            }
        }
        for var in &undefined {
            warn!(
                "Function '{}' reads '{}', which is never defined; binding it to undef",
                function.name, var
            );
        }

        let renames = RenameTable::new(
            &self.config,
            &blocks,
            &variables,
            NameGenerator::new(taken),
        );

        if let Some(entry) = blocks.block_mut(0) {
            Self::seed_entry(entry, &variables, &params, &types);
        }
        for idx in 1..blocks.len() {
            if let Some(block) = blocks.block_mut(idx) {
                Self::rewrite_block(block, &variables, &renames, &types);
            }
        }

        let mut instrs = Self::bootstrap(
            &entry_name,
            &variables,
            &params,
            &undefined,
            &renames,
            &types,
        );
        instrs.extend(blocks.reassemble());

        debug!(
            "SSA construction of '{}': {} variables over {} blocks, {} instructions",
            function.name,
            variables.len(),
            blocks.len(),
            instrs.len()
        );
        Ok(instrs)
    }

    /// Gives every variable the entry block leaves unassigned an `undef` value, then
    /// publishes every variable, right before the entry terminator.
    fn seed_entry(
        entry: &mut BasicBlock,
        variables: &BTreeSet<String>,
        params: &BTreeSet<&str>,
        types: &TypeTable,
    ) {
        let assigned: BTreeSet<&str> = entry.definitions().collect();
        let mut seeds: Vec<Instruction> = variables
            .iter()
            .filter(|var| !assigned.contains(var.as_str()) && !params.contains(var.as_str()))
            .map(|var| Instruction::undef(var.as_str(), types.get(var).cloned()))
            .collect();
        seeds.extend(
            variables
                .iter()
                .map(|var| Instruction::set(var.as_str(), var.as_str())),
        );

        let at = entry.end_position();
        entry.instructions_mut().splice(at..at, seeds);
    }

    fn rewrite_block(
        block: &mut BasicBlock,
        variables: &BTreeSet<String>,
        renames: &RenameTable,
        types: &TypeTable,
    ) {
        let name = block.name().to_string();
        let locals: Vec<(&str, &str)> = variables
            .iter()
            .filter_map(|var| {
                renames
                    .unique(var, &name)
                    .map(|unique| (var.as_str(), unique))
            })
            .collect();

        // Rename first so the inserted `get`s keep the plain name
        for instr in block.instructions_mut().iter_mut() {
            for &(var, unique) in &locals {
                instr.rename(var, unique);
            }
        }

        let mut reads = Vec::with_capacity(locals.len() * 2);
        let mut writes = Vec::with_capacity(locals.len());
        for &(var, unique) in &locals {
            let ty = types.get(var).cloned();
            reads.push(Instruction::get(var, ty.clone()));
            reads.push(Instruction::id(unique, ty, var));
            writes.push(Instruction::set(var, unique));
        }

        let at = block.end_position();
        let body = block.instructions_mut();
        body.splice(at..at, writes);
        body.splice(0..0, reads);
    }

    /// The sequence that runs before the entry block: `undef` for every variable that
    /// is not a parameter, under both its plain and its entry-local name, then a `set`
    /// of each.
    fn bootstrap(
        entry: &str,
        variables: &BTreeSet<String>,
        params: &BTreeSet<&str>,
        undefined: &BTreeSet<String>,
        renames: &RenameTable,
        types: &TypeTable,
    ) -> Vec<Instruction> {
        let mut prefix: Vec<Instruction> = undefined
            .iter()
            .map(|var| Instruction::undef(var.as_str(), None))
            .collect();

        let locals: Vec<(&str, &str)> = variables
            .iter()
            .filter(|var| !params.contains(var.as_str()))
            .filter_map(|var| {
                renames
                    .unique(var, entry)
                    .map(|unique| (var.as_str(), unique))
            })
            .collect();

        for &(var, unique) in &locals {
            let ty = types.get(var).cloned();
            prefix.push(Instruction::undef(var, ty.clone()));
            prefix.push(Instruction::undef(unique, ty));
        }
        prefix.extend(
            locals
                .iter()
                .map(|&(var, unique)| Instruction::set(var, unique)),
        );
        prefix
    }
}

/// Converts `function` into SSA form with the default configuration.
///
/// # Errors
///
/// Fails if the control flow graph cannot be built.
pub fn to_ssa(function: &Function) -> Result<Vec<Instruction>> {
    SsaConstructor::default().construct(function)
}

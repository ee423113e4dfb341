use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every transformation in this crate operates on a single function. An error therefore
/// aborts the transformation of that one function only; callers processing a whole
/// [`crate::ir::Program`] (see [`crate::compiler::PassScheduler`]) keep going with the
/// remaining functions.
///
/// # Error Categories
///
/// ## Control Flow Errors
/// - [`Error::MalformedControlFlow`] - A terminator targets a block that does not exist
///
/// ## Instruction Errors
/// - [`Error::Malformed`] - An instruction does not have the shape its opcode requires
///
/// ## Pipeline Errors
/// - [`Error::FunctionFailed`] - A pass failed on a specific function
///
/// Conditions that are recovered locally, such as fall-through materialization or reads of
/// variables that are never defined, are not errors. They are logged and handled in place.
///
/// # Examples
///
/// ```rust
/// use irflow::{analysis::ControlFlowGraph, ir::Instruction, Error};
///
/// let instrs = vec![Instruction::jmp("nowhere")];
/// match ControlFlowGraph::build(&instrs) {
///     Err(Error::MalformedControlFlow { block, target }) => {
///         assert_eq!(target, "nowhere");
///         println!("block {block} jumps to unknown label {target}");
///     }
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An instruction is structurally invalid.
    ///
    /// This error indicates that an instruction does not match the shape its opcode
    /// requires, for example a `set` that does not carry exactly two arguments. The
    /// error includes the source location where the malformation was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A terminator references a block name absent from the block map.
    ///
    /// This is the only checked failure of CFG construction. It is fatal for the
    /// function being processed.
    #[error("Block '{block}' jumps to unknown label '{target}'")]
    MalformedControlFlow {
        /// The block whose terminator holds the dangling reference
        block: String,
        /// The label that could not be resolved
        target: String,
    },

    /// A pass failed while transforming a specific function.
    #[error("Function '{function}': {source}")]
    FunctionFailed {
        /// Name of the function the pass was running on
        function: String,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wraps this error with the name of the function it occurred in.
    #[must_use]
    pub fn in_function(self, function: impl Into<String>) -> Self {
        Error::FunctionFailed {
            function: function.into(),
            source: Box::new(self),
        }
    }
}

//! A small reference interpreter used to check that transformations preserve behavior.
//!
//! It covers the arithmetic, comparison and logic operations, `const`, `id`, `undef`,
//! `get`/`set`, `print`, `nop` and the three terminators. Memory and calls are not
//! supported. Integer arithmetic wraps.

use std::{collections::HashMap, fmt};

use thiserror::Error;

use crate::ir::{EffectOp, Function, Instruction, Literal, ValueOp};

/// A runtime value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Float(f64),
    Char(char),
    /// Produced by `undef`.
    Undefined,
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Int(v) => Value::Int(v),
            Literal::Bool(v) => Value::Bool(v),
            Literal::Float(v) => Value::Float(v),
            Literal::Char(v) => Value::Char(v),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:.17}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::Undefined => write!(f, "undefined"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum InterpError {
    #[error("read of unbound variable '{0}'")]
    Unbound(String),
    #[error("get of '{0}' before any set")]
    NothingSet(String),
    #[error("unknown label '{0}'")]
    UnknownLabel(String),
    #[error("'{op}' got operands of the wrong type")]
    TypeMismatch { op: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("unsupported instruction '{0}'")]
    Unsupported(String),
    #[error("missing argument value for '{0}'")]
    MissingArgument(String),
    #[error("step limit of {0} exceeded")]
    StepLimit(usize),
}

/// Observable result of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    /// One line per executed `print`.
    pub output: Vec<String>,
    /// The value passed to `ret`, if any.
    pub returned: Option<Value>,
}

pub const DEFAULT_STEP_LIMIT: usize = 100_000;

/// Runs `function` with `args` bound to its parameters.
pub fn run(function: &Function, args: &[Value]) -> Result<Execution, InterpError> {
    run_instructions(function, &function.instrs, args)
}

/// Runs `instrs` as the body of `function` (its parameters are still taken from `function`).
pub fn run_instructions(
    function: &Function,
    instrs: &[Instruction],
    args: &[Value],
) -> Result<Execution, InterpError> {
    let mut env = HashMap::new();
    for (i, param) in function.args.iter().enumerate() {
        let value = args
            .get(i)
            .copied()
            .ok_or_else(|| InterpError::MissingArgument(param.name.clone()))?;
        env.insert(param.name.clone(), value);
    }

    let labels: HashMap<&str, usize> = instrs
        .iter()
        .enumerate()
        .filter_map(|(i, instr)| instr.as_label().map(|label| (label, i)))
        .collect();

    let mut machine = Machine {
        env,
        published: HashMap::new(),
        output: Vec::new(),
    };

    let mut pc = 0;
    let mut steps = 0;
    while pc < instrs.len() {
        steps += 1;
        if steps > DEFAULT_STEP_LIMIT {
            return Err(InterpError::StepLimit(DEFAULT_STEP_LIMIT));
        }

        match machine.step(&instrs[pc])? {
            Flow::Next => pc += 1,
            Flow::Jump(label) => {
                pc = *labels
                    .get(label.as_str())
                    .ok_or(InterpError::UnknownLabel(label))?;
            }
            Flow::Return(returned) => {
                return Ok(Execution {
                    output: machine.output,
                    returned,
                })
            }
        }
    }

    Ok(Execution {
        output: machine.output,
        returned: None,
    })
}

enum Flow {
    Next,
    Jump(String),
    Return(Option<Value>),
}

struct Machine {
    env: HashMap<String, Value>,
    published: HashMap<String, Value>,
    output: Vec<String>,
}

impl Machine {
    fn read(&self, name: &str) -> Result<Value, InterpError> {
        self.env
            .get(name)
            .copied()
            .ok_or_else(|| InterpError::Unbound(name.to_string()))
    }

    fn step(&mut self, instr: &Instruction) -> Result<Flow, InterpError> {
        match instr {
            Instruction::Label { .. } => Ok(Flow::Next),
            Instruction::Constant { dest, value, .. } => {
                self.env.insert(dest.clone(), Value::from(*value));
                Ok(Flow::Next)
            }
            Instruction::Value { op, dest, args, .. } => {
                let value = match op {
                    ValueOp::Get => self
                        .published
                        .get(dest)
                        .copied()
                        .ok_or_else(|| InterpError::NothingSet(dest.clone()))?,
                    ValueOp::Undef => Value::Undefined,
                    _ => {
                        let operands = args
                            .iter()
                            .map(|arg| self.read(arg))
                            .collect::<Result<Vec<_>, _>>()?;
                        evaluate(*op, &operands)?
                    }
                };
                self.env.insert(dest.clone(), value);
                Ok(Flow::Next)
            }
            Instruction::Effect {
                op, args, labels, ..
            } => self.effect(*op, args, labels),
        }
    }

    fn effect(
        &mut self,
        op: EffectOp,
        args: &[String],
        labels: &[String],
    ) -> Result<Flow, InterpError> {
        let label = |i: usize| {
            labels
                .get(i)
                .cloned()
                .ok_or_else(|| InterpError::Unsupported(format!("{op} without label")))
        };

        match op {
            EffectOp::Jmp => Ok(Flow::Jump(label(0)?)),
            EffectOp::Br => match args.first().map(|cond| self.read(cond)).transpose()? {
                Some(Value::Bool(true)) => Ok(Flow::Jump(label(0)?)),
                Some(Value::Bool(false)) => Ok(Flow::Jump(label(1)?)),
                _ => Err(InterpError::TypeMismatch { op: op.to_string() }),
            },
            EffectOp::Ret => {
                let returned = args.first().map(|arg| self.read(arg)).transpose()?;
                Ok(Flow::Return(returned))
            }
            EffectOp::Print => {
                let line = args
                    .iter()
                    .map(|arg| self.read(arg).map(|value| value.to_string()))
                    .collect::<Result<Vec<_>, _>>()?
                    .join(" ");
                self.output.push(line);
                Ok(Flow::Next)
            }
            EffectOp::Set => match args {
                [var, value] => {
                    let value = self.read(value)?;
                    self.published.insert(var.clone(), value);
                    Ok(Flow::Next)
                }
                _ => Err(InterpError::Unsupported("set arity".into())),
            },
            EffectOp::Nop => Ok(Flow::Next),
            EffectOp::Call | EffectOp::Store | EffectOp::Free => {
                Err(InterpError::Unsupported(op.to_string()))
            }
        }
    }
}

fn evaluate(op: ValueOp, operands: &[Value]) -> Result<Value, InterpError> {
    use Value::{Bool, Float, Int};

    let mismatch = || InterpError::TypeMismatch { op: op.to_string() };

    let value = match (op, operands) {
        (ValueOp::Id, [value]) => *value,
        (ValueOp::Add, [Int(a), Int(b)]) => Int(a.wrapping_add(*b)),
        (ValueOp::Sub, [Int(a), Int(b)]) => Int(a.wrapping_sub(*b)),
        (ValueOp::Mul, [Int(a), Int(b)]) => Int(a.wrapping_mul(*b)),
        (ValueOp::Div, [Int(_), Int(0)]) => return Err(InterpError::DivisionByZero),
        (ValueOp::Div, [Int(a), Int(b)]) => Int(a.wrapping_div(*b)),
        (ValueOp::Eq, [Int(a), Int(b)]) => Bool(a == b),
        (ValueOp::Lt, [Int(a), Int(b)]) => Bool(a < b),
        (ValueOp::Gt, [Int(a), Int(b)]) => Bool(a > b),
        (ValueOp::Le, [Int(a), Int(b)]) => Bool(a <= b),
        (ValueOp::Ge, [Int(a), Int(b)]) => Bool(a >= b),
        (ValueOp::Not, [Bool(a)]) => Bool(!a),
        (ValueOp::And, [Bool(a), Bool(b)]) => Bool(*a && *b),
        (ValueOp::Or, [Bool(a), Bool(b)]) => Bool(*a || *b),
        (ValueOp::Fadd, [Float(a), Float(b)]) => Float(a + b),
        (ValueOp::Fsub, [Float(a), Float(b)]) => Float(a - b),
        (ValueOp::Fmul, [Float(a), Float(b)]) => Float(a * b),
        (ValueOp::Fdiv, [Float(a), Float(b)]) => Float(a / b),
        (ValueOp::Feq, [Float(a), Float(b)]) => Bool(a == b),
        (ValueOp::Flt, [Float(a), Float(b)]) => Bool(a < b),
        (ValueOp::Fgt, [Float(a), Float(b)]) => Bool(a > b),
        (ValueOp::Fle, [Float(a), Float(b)]) => Bool(a <= b),
        (ValueOp::Fge, [Float(a), Float(b)]) => Bool(a >= b),
        (ValueOp::Call | ValueOp::Alloc | ValueOp::Load | ValueOp::PtrAdd, _) => {
            return Err(InterpError::Unsupported(op.to_string()))
        }
        _ => return Err(mismatch()),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Argument, Type};

    #[test]
    fn test_loop_sums() {
        // sum = 0; i = 0; while i < n { sum += i; i += 1 }; print sum
        let function = Function::new(
            "sum",
            vec![Argument::new("n", Type::Int)],
            vec![
                Instruction::constant("sum", Type::Int, Literal::Int(0)),
                Instruction::constant("i", Type::Int, Literal::Int(0)),
                Instruction::constant("one", Type::Int, Literal::Int(1)),
                Instruction::label("head"),
                Instruction::value(ValueOp::Lt, "c", Type::Bool, ["i", "n"]),
                Instruction::br("c", "body", "done"),
                Instruction::label("body"),
                Instruction::value(ValueOp::Add, "sum", Type::Int, ["sum", "i"]),
                Instruction::value(ValueOp::Add, "i", Type::Int, ["i", "one"]),
                Instruction::jmp("head"),
                Instruction::label("done"),
                Instruction::print(["sum"]),
                Instruction::ret(Some("sum")),
            ],
        );

        let execution = run(&function, &[Value::Int(5)]).unwrap();
        assert_eq!(execution.output, vec!["10"]);
        assert_eq!(execution.returned, Some(Value::Int(10)));
    }

    #[test]
    fn test_get_reads_published_value() {
        let function = Function::new(
            "main",
            vec![],
            vec![
                Instruction::constant("v", Type::Int, Literal::Int(7)),
                Instruction::set("x", "v"),
                Instruction::get("x", Some(Type::Int)),
                Instruction::print(["x"]),
            ],
        );
        assert_eq!(run(&function, &[]).unwrap().output, vec!["7"]);
    }

    #[test]
    fn test_errors() {
        let unbound = Function::new("f", vec![], vec![Instruction::print(["nope"])]);
        assert_eq!(
            run(&unbound, &[]),
            Err(InterpError::Unbound("nope".into()))
        );

        let spin = Function::new(
            "g",
            vec![],
            vec![Instruction::label("top"), Instruction::jmp("top")],
        );
        assert_eq!(
            run(&spin, &[]),
            Err(InterpError::StepLimit(DEFAULT_STEP_LIMIT))
        );
    }
}

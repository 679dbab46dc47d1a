//! Tree-walking evaluator.
//!
//! All output the program produces goes through the `output` writer, so
//! callers can capture it. Bare expression statements at the top level
//! echo their value, the way an interactive console would.

use std::io::Write;

use crate::ast::{BinaryOp, Expr, Stmt, UnaryOp};
use crate::environment::Environment;
use crate::error::{LangError, RuntimeError};
use crate::value::Value;

/// Execute a block of statements. `echo` controls whether bare
/// expression values are printed; it only holds at the top level.
pub fn exec_block(
    stmts: &[Stmt],
    env: &mut Environment,
    output: &mut dyn Write,
    echo: bool,
) -> Result<(), LangError> {
    for stmt in stmts {
        exec_stmt(stmt, env, output, echo).map_err(|e| LangError::runtime(e, stmt.line()))?;
    }
    Ok(())
}

fn exec_stmt(
    stmt: &Stmt,
    env: &mut Environment,
    output: &mut dyn Write,
    echo: bool,
) -> Result<(), RuntimeError> {
    match stmt {
        Stmt::Assign { name, expr, .. } => {
            let value = evaluate(expr, env, output)?;
            env.set(name, value);
            Ok(())
        }
        Stmt::Expr { expr, .. } => {
            let value = evaluate(expr, env, output)?;
            if echo && value != Value::Unit {
                writeln!(output, "{}", value)?;
            }
            Ok(())
        }
        Stmt::If {
            cond,
            then_body,
            else_body,
            ..
        } => {
            let body = if evaluate(cond, env, output)?.is_truthy() {
                then_body
            } else {
                else_body
            };
            for stmt in body {
                exec_stmt(stmt, env, output, false)?;
            }
            Ok(())
        }
        Stmt::While { cond, body, .. } => {
            while evaluate(cond, env, output)?.is_truthy() {
                for stmt in body {
                    exec_stmt(stmt, env, output, false)?;
                }
            }
            Ok(())
        }
    }
}

pub fn evaluate(
    expr: &Expr,
    env: &mut Environment,
    output: &mut dyn Write,
) -> Result<Value, RuntimeError> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Str(s) => Ok(Value::String(s.clone())),
        Expr::Bool(b) => Ok(Value::Boolean(*b)),
        Expr::List(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(evaluate(item, env, output)?);
            }
            Ok(Value::List(values))
        }
        Expr::Var(name) => env
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone())),
        Expr::Unary { op, operand } => {
            let value = evaluate(operand, env, output)?;
            match op {
                UnaryOp::Neg => match value {
                    Value::Number(n) => Ok(Value::Number(-n)),
                    other => Err(RuntimeError::TypeError {
                        expected: "number",
                        got: other.type_name(),
                    }),
                },
                UnaryOp::Not => Ok(Value::Boolean(value.is_falsy())),
            }
        }
        Expr::Binary { op, left, right } => binary(*op, left, right, env, output),
        Expr::Index { target, index } => {
            let target = evaluate(target, env, output)?;
            let index = evaluate(index, env, output)?;
            index_value(&target, &index)
        }
        Expr::Call { name, args } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(evaluate(arg, env, output)?);
            }
            call_builtin(name, values, output)
        }
    }
}

fn binary(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    env: &mut Environment,
    output: &mut dyn Write,
) -> Result<Value, RuntimeError> {
    // And/Or short-circuit on truthiness and yield a boolean.
    if op == BinaryOp::And {
        let left = evaluate(left, env, output)?;
        if left.is_falsy() {
            return Ok(Value::Boolean(false));
        }
        return Ok(Value::Boolean(evaluate(right, env, output)?.is_truthy()));
    }
    if op == BinaryOp::Or {
        let left = evaluate(left, env, output)?;
        if left.is_truthy() {
            return Ok(Value::Boolean(true));
        }
        return Ok(Value::Boolean(evaluate(right, env, output)?.is_truthy()));
    }

    let left = evaluate(left, env, output)?;
    let right = evaluate(right, env, output)?;

    match op {
        BinaryOp::Eq => Ok(Value::Boolean(left == right)),
        BinaryOp::Ne => Ok(Value::Boolean(left != right)),
        BinaryOp::Add => match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            (Value::Number(_), other) | (other, _) => Err(RuntimeError::TypeError {
                expected: "number or string",
                got: other.type_name(),
            }),
        },
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            let (a, b) = numeric_pair(&left, &right)?;
            match op {
                BinaryOp::Sub => Ok(Value::Number(a - b)),
                BinaryOp::Mul => Ok(Value::Number(a * b)),
                BinaryOp::Div => {
                    if b == 0.0 {
                        Err(RuntimeError::DivisionByZero)
                    } else {
                        Ok(Value::Number(a / b))
                    }
                }
                _ => {
                    if b == 0.0 {
                        Err(RuntimeError::DivisionByZero)
                    } else {
                        Ok(Value::Number(a % b))
                    }
                }
            }
        }
        BinaryOp::Gt | BinaryOp::Lt | BinaryOp::Ge | BinaryOp::Le => {
            let result = match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => compare(op, a.partial_cmp(b)),
                (Value::String(a), Value::String(b)) => compare(op, Some(a.cmp(b))),
                (_, other) => {
                    return Err(RuntimeError::TypeError {
                        expected: left.type_name(),
                        got: other.type_name(),
                    });
                }
            };
            Ok(Value::Boolean(result))
        }
        BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
    }
}

fn compare(op: BinaryOp, ordering: Option<std::cmp::Ordering>) -> bool {
    use std::cmp::Ordering::*;
    match (op, ordering) {
        (BinaryOp::Gt, Some(Greater)) => true,
        (BinaryOp::Lt, Some(Less)) => true,
        (BinaryOp::Ge, Some(Greater) | Some(Equal)) => true,
        (BinaryOp::Le, Some(Less) | Some(Equal)) => true,
        _ => false,
    }
}

fn numeric_pair(left: &Value, right: &Value) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        (Value::Number(_), other) | (other, _) => Err(RuntimeError::TypeError {
            expected: "number",
            got: other.type_name(),
        }),
    }
}

fn index_value(target: &Value, index: &Value) -> Result<Value, RuntimeError> {
    let items = match target {
        Value::List(items) => items,
        other => {
            return Err(RuntimeError::TypeError {
                expected: "list",
                got: other.type_name(),
            });
        }
    };
    let raw = match index {
        Value::Number(n) => *n as i64,
        other => {
            return Err(RuntimeError::TypeError {
                expected: "number",
                got: other.type_name(),
            });
        }
    };
    // Negative indices count from the end.
    let resolved = if raw < 0 { raw + items.len() as i64 } else { raw };
    if resolved < 0 || resolved as usize >= items.len() {
        return Err(RuntimeError::IndexOutOfBounds {
            index: raw,
            len: items.len(),
        });
    }
    Ok(items[resolved as usize].clone())
}

fn call_builtin(
    name: &str,
    args: Vec<Value>,
    output: &mut dyn Write,
) -> Result<Value, RuntimeError> {
    match name {
        "print" => {
            let rendered: Vec<String> = args.iter().map(|v| v.to_string()).collect();
            writeln!(output, "{}", rendered.join(" "))?;
            Ok(Value::Unit)
        }
        "len" => {
            let [arg] = take_args::<1>(name, args)?;
            match arg {
                Value::String(s) => Ok(Value::Number(s.chars().count() as f64)),
                Value::List(items) => Ok(Value::Number(items.len() as f64)),
                other => Err(RuntimeError::TypeError {
                    expected: "string or list",
                    got: other.type_name(),
                }),
            }
        }
        "str" => {
            let [arg] = take_args::<1>(name, args)?;
            Ok(Value::String(arg.to_string()))
        }
        "abs" => {
            let [arg] = take_args::<1>(name, args)?;
            match arg {
                Value::Number(n) => Ok(Value::Number(n.abs())),
                other => Err(RuntimeError::TypeError {
                    expected: "number",
                    got: other.type_name(),
                }),
            }
        }
        "min" | "max" => {
            if args.is_empty() {
                return Err(RuntimeError::WrongArgCount {
                    name: name.to_string(),
                    expected: 1,
                    got: 0,
                });
            }
            let mut best = None::<f64>;
            for arg in args {
                let n = match arg {
                    Value::Number(n) => n,
                    other => {
                        return Err(RuntimeError::TypeError {
                            expected: "number",
                            got: other.type_name(),
                        });
                    }
                };
                best = Some(match best {
                    None => n,
                    Some(b) if name == "min" => b.min(n),
                    Some(b) => b.max(n),
                });
            }
            match best {
                Some(n) => Ok(Value::Number(n)),
                None => unreachable!("args checked non-empty"),
            }
        }
        "range" => {
            let [arg] = take_args::<1>(name, args)?;
            let count = match arg {
                Value::Number(n) if n >= 0.0 => n as usize,
                Value::Number(_) => 0,
                other => {
                    return Err(RuntimeError::TypeError {
                        expected: "number",
                        got: other.type_name(),
                    });
                }
            };
            Ok(Value::List(
                (0..count).map(|i| Value::Number(i as f64)).collect(),
            ))
        }
        "append" => {
            let [list, value] = take_args::<2>(name, args)?;
            match list {
                Value::List(mut items) => {
                    items.push(value);
                    Ok(Value::List(items))
                }
                other => Err(RuntimeError::TypeError {
                    expected: "list",
                    got: other.type_name(),
                }),
            }
        }
        _ => Err(RuntimeError::UnknownFunction(name.to_string())),
    }
}

fn take_args<const N: usize>(name: &str, args: Vec<Value>) -> Result<[Value; N], RuntimeError> {
    let got = args.len();
    args.try_into().map_err(|_| RuntimeError::WrongArgCount {
        name: name.to_string(),
        expected: N,
        got,
    })
}

//! A whitelisted-AST expression evaluator for visibility, required, and
//! workflow trigger conditions.
//!
//! Parsing and evaluation are deliberately separate: [`parse`] rejects any
//! construct outside the approved grammar immediately (the condition is
//! rejected at form/workflow create time), while [`eval_bool`] only ever
//! sees an already-validated [`ast::Expr`] and treats a runtime type
//! mismatch as `false` rather than propagating an error.
//!
//! ```
//! use expr_eval::{parse, eval_bool, vars_from_json};
//! use serde_json::json;
//!
//! let expr = parse("answers.get('q_cat') == 'other'").unwrap();
//! let flat = json!({"q_cat": "other"});
//! let vars = vars_from_json(flat.as_object().unwrap());
//! assert!(eval_bool(&expr, &vars));
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::Expr;
pub use error::{ExprError, Result};
pub use eval::{eval_bool, evaluate, vars_from_json, Vars};
pub use parser::parse;
pub use value::Value;

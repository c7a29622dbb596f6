//! Tree nodes produced by the [`Parser`](crate::parser::Parser).
//!
//! Nodes borrow their tokens from the slice the parser was built over, so the
//! tree cannot outlive the token buffer.  A `None` entry in a statement list
//! marks a declaration that failed to parse and was skipped by recovery;
//! consumers walk past it.

use serde::Serialize;

use crate::token::Token;

/// A **literal constant** that appears directly in the source code.
///
/// The parser copies the value out of the token at parse‑time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LiteralValue {
    /// Numeric literal ‑ stored as IEEE‑754 `f64`.
    Number(f64),

    /// String literal without surrounding quotes.
    Str(String),

    True,

    False,

    Nil,
}

/// Statement list of a program, block or function body.
pub type StmtList<'a> = Vec<Option<Stmt<'a>>>;

/// **Abstract‑Syntax‑Tree node** representing every kind of *expression*.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr<'a> {
    /// A literal constant: number, string, `true`, `false`, or `nil`.
    Literal(LiteralValue),

    /// Prefix unary operator expression
    /// *Example:* `!isReady` or `-42`
    Unary {
        /// The operator token (`!` or `-`).
        operator: &'a Token,
        right: Box<Expr<'a>>,
    },

    /// Infix arithmetic, comparison or equality expression
    /// *Example:* `a + b`, `x <= y`
    Binary {
        left: Box<Expr<'a>>,
        operator: &'a Token,
        right: Box<Expr<'a>>,
    },

    /// Parenthesised sub‑expression: `"(" expression ")"`.
    Grouping(Box<Expr<'a>>),

    /// Variable access.
    Variable(&'a Token),

    /// Assignment expression: `identifier "=" expression`
    Assign {
        name: &'a Token,
        value: Box<Expr<'a>>,
    },

    /// Short‑circuiting logical operators `and` / `or`.
    Logical {
        left: Box<Expr<'a>>,
        operator: &'a Token, // `AND` or `OR`
        right: Box<Expr<'a>>,
    },

    /// Call expression, possibly chained: `f(1)(2)`.
    Call {
        callee: Box<Expr<'a>>,
        /// The closing `)` token ‑ retained for error reporting.
        paren: &'a Token,
        arguments: Vec<Expr<'a>>,
    },

    /// Anonymous function: `fun (a, b) { ... }`.
    Function {
        /// The `fun` keyword.
        keyword: &'a Token,
        params: Vec<&'a Token>,
        body: StmtList<'a>,
    },
}

/// **Abstract‑Syntax‑Tree node** for *statements*.  There is no `for` node:
/// `for` loops arrive already rewritten into blocks and `while`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt<'a> {
    /// Stand‑alone expression terminated by a semicolon.
    Expression(Expr<'a>),

    Print(Expr<'a>),

    /// Variable declaration: `"var" IDENT ("=" initializer)? ";"`.
    Var {
        name: &'a Token,
        initializer: Option<Expr<'a>>,
    },

    /// Braced scope containing zero or more declarations/statements.
    Block(StmtList<'a>),

    /// `if` / `else` conditional.
    If {
        condition: Expr<'a>,
        then_branch: Box<Stmt<'a>>,
        else_branch: Option<Box<Stmt<'a>>>,
    },

    While {
        condition: Expr<'a>,
        body: Box<Stmt<'a>>,
    },

    /// Named function declaration.
    Function {
        name: &'a Token,

        /// Parameter name tokens.
        params: Vec<&'a Token>,

        body: StmtList<'a>,
    },

    Return {
        /// The `return` keyword token (for runtime error locations).
        keyword: &'a Token,

        /// Absent ⇒ `nil` is returned.
        value: Option<Expr<'a>>,
    },

    Break {
        keyword: &'a Token,
    },

    Continue {
        keyword: &'a Token,
    },
}

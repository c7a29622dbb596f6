/*!
Time & Space Complexity: whole‑file overview
============================================

Definitions
-----------
* **n** = number of tokens (including the sole EOF).
* **m** = number of AST nodes (`m ≤ n`, plus a constant number of synthesized
  nodes per desugared `for`).

### Time

| Phase / function              | Cost | Rationale                                                             |
|-------------------------------|-----:|-----------------------------------------------------------------------|
| `Parser::parse` main loop     | Θ(n) | Each token is consumed once via `advance()`.                          |
| Individual productions        | O(1) per token | Recursive descent is stream‑oriented; no extra scans.       |
| Error recovery `synchronize()`| O(k) | Discards tokens ≤ next statement boundary ( `k ≤ n`).                 |

**Overall:** **Θ(n)**.

### Space

| Structure                | Asymptotic | Notes                                                         |
|--------------------------|-----------:|---------------------------------------------------------------|
| Borrowed token slice     | O(n)       | Zero‑copy; nodes hold `&Token`.                               |
| AST (`Vec`, `Box`)       | O(m) ≈ O(n)| One `Box` per interior node.                                  |
| Diagnostics              | O(e)       | One entry per recorded error.                                 |

Call‑stack depth grows with syntactic nesting and is capped by `MAX_DEPTH`.

### Logging Policy

| Location                     | Level  | Purpose                                   |
|------------------------------|--------|-------------------------------------------|
| `Parser::new`, `parse`       | `info` | Lifecycle milestones.                     |
| `declaration`, `statement`   | `debug`| High‑level descent into grammar branches. |
| Recovery, advisories         | `debug`| Context before and after resynchronizing. |

--------------------------------------------------------------------------------
Grammar (EBNF)
--------------

```text
program        → declaration* EOF ;
declaration    → lambdaCall | funDecl | varDecl | statement ;
lambdaCall     → funExpr ( "(" arguments? ")" )* ";" ;
funDecl        → "fun" IDENT "(" parameters? ")" block ;
varDecl        → "var" IDENT ( "=" expression )? ";" ;
statement      → breakStmt | continueStmt | forStmt | ifStmt
               | printStmt | returnStmt | whileStmt | block | exprStmt ;
breakStmt      → "break" ";" ;
continueStmt   → "continue" ";" ;
forStmt        → "for" "(" ( varDecl | exprStmt | ";" )
                 expression? ";" expression? ")" statement ;
ifStmt         → "if" "(" expression ")" statement ( "else" statement )? ;
printStmt      → "print" expression ";" ;
returnStmt     → "return" expression? ";" ;
whileStmt      → "while" "(" expression ")" statement ;
block          → "{" declaration* "}" ;
exprStmt       → expression ";" ;
parameters     → IDENT ( "," IDENT )* ;
expression     → funExpr | assignment ;
funExpr        → "fun" "(" parameters? ")" block ;
assignment     → IDENT "=" assignment | logic_or ;
logic_or       → logic_and ( "or" logic_and )* ;
logic_and      → equality  ( "and" equality )* ;
equality       → comparison ( ( "!=" | "==" ) comparison )* ;
comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
term           → factor ( ( "-" | "+" ) factor )* ;
factor         → unary ( ( "/" | "*" ) unary )* ;
unary          → ( "!" | "-" ) unary | call ;
call           → primary ( "(" arguments? ")" )* ;
arguments      → expression ( "," expression )* ;
primary        → NUMBER | STRING | "true" | "false" | "nil"
               | IDENT | "(" expression ")" ;
```

A fatal error travels up as `Err` through every rule until the nearest
`declaration`, which records it, resynchronizes and leaves `None` in the
statement list.  Advisory errors are recorded in place and the rule returns
its best‑effort node.
*/

use crate::ast::{Expr, LiteralValue, Stmt, StmtList};
use crate::error::{ParseError, Result, StreamError};
use crate::stream;
use crate::token::{Token, TokenType};

use log::{debug, info};

/// Ceiling shared by parameter and argument lists.
pub const MAX_ARITY: usize = 255;

/// Deepest statement/expression nesting accepted before the declaration is
/// abandoned with a fatal error, keeping recursion inside the call stack.
pub const MAX_DEPTH: usize = 128;

/// Everything one parse pass produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Program<'a> {
    /// Top‑level declarations; `None` where a declaration was unrecoverable.
    pub statements: StmtList<'a>,

    /// Fatal and advisory diagnostics, in the order they were raised.
    pub errors: Vec<ParseError>,
}

impl Program<'_> {
    /// A non‑empty error list means the tree is best‑effort only.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Top‑level parser over an immutable slice of tokens.
pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    errors: Vec<ParseError>,
    loop_depth: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Construct a new parser.  The stream must be terminated by exactly one
    /// `EOF` token.
    pub fn new(tokens: &'a [Token]) -> std::result::Result<Self, StreamError> {
        stream::validate(tokens)?;

        info!("Parser created with {} tokens", tokens.len());

        Ok(Self {
            tokens,
            current: 0,
            errors: Vec::new(),
            loop_depth: 0,
            depth: 0,
        })
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program.  Never fails: every problem ends up in
    /// [`Program::errors`].
    pub fn parse(mut self) -> Program<'a> {
        info!("Beginning parse phase");

        let mut statements: StmtList<'a> = Vec::new();

        while !self.is_at_end() {
            statements.push(self.declaration());
        }

        info!(
            "Parsed {} top-level declarations with {} error(s)",
            statements.len(),
            self.errors.len()
        );

        Program {
            statements,
            errors: self.errors,
        }
    }

    // ──────────────────────── declaration rules ───────────────────

    /// Recovery boundary: a fatal error inside is recorded and replaced by `None`.
    fn declaration(&mut self) -> Option<Stmt<'a>> {
        debug!("Entering declaration at token {}", self.current);

        match self.try_declaration() {
            Ok(stmt) => Some(stmt),

            Err(error) => {
                debug!("Declaration abandoned: {}", error);

                self.errors.push(error);
                self.synchronize();

                None
            }
        }
    }

    fn try_declaration(&mut self) -> Result<Stmt<'a>> {
        if self.matches(TokenType::FUN) {
            if self.check(TokenType::LEFT_PAREN) {
                self.lambda_call()
            } else {
                self.function()
            }
        } else if self.matches(TokenType::VAR) {
            self.var_declaration()
        } else {
            self.statement()
        }
    }

    /// `fun (..) { .. } (..)* ;`, an immediately invoked anonymous function.
    fn lambda_call(&mut self) -> Result<Stmt<'a>> {
        debug!("Parsing lambda call statement");

        let mut expr: Expr<'a> = self.function_expression()?;

        while self.matches(TokenType::LEFT_PAREN) {
            expr = self.finish_call(expr)?;
        }

        self.consume(
            TokenType::SEMICOLON,
            "expected ';' call to a function",
        )?;

        Ok(Stmt::Expression(expr))
    }

    fn function(&mut self) -> Result<Stmt<'a>> {
        let name: &'a Token = self.consume(TokenType::IDENTIFIER, "expected function name")?;

        self.consume(TokenType::LEFT_PAREN, "expected '(' after function name")?;
        let params: Vec<&'a Token> = self.parameters()?;
        self.consume(TokenType::RIGHT_PAREN, "expected ')' after parameters")?;

        self.consume(
            TokenType::LEFT_BRACE,
            "expected '{' after function signature",
        )?;
        let body: StmtList<'a> = self.block()?;

        Ok(Stmt::Function { name, params, body })
    }

    /// Anonymous function; the `fun` keyword has already been consumed.
    fn function_expression(&mut self) -> Result<Expr<'a>> {
        let keyword: &'a Token = self.previous();

        self.consume(TokenType::LEFT_PAREN, "expected '(' after 'fun'")?;
        let params: Vec<&'a Token> = self.parameters()?;
        self.consume(TokenType::RIGHT_PAREN, "expected ')' after parameters")?;

        self.consume(
            TokenType::LEFT_BRACE,
            "expected '{' after anonymous function signature",
        )?;
        let body: StmtList<'a> = self.block()?;

        Ok(Expr::Function {
            keyword,
            params,
            body,
        })
    }

    /// Comma separated identifiers up to (not including) the closing `)`.
    fn parameters(&mut self) -> Result<Vec<&'a Token>> {
        let mut params: Vec<&'a Token> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if params.len() >= MAX_ARITY {
                    self.advise(ParseError::limit(
                        self.peek(),
                        format!("can't have more than {} parameters", MAX_ARITY),
                    ));
                }

                params.push(self.consume(TokenType::IDENTIFIER, "expected parameter name")?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        Ok(params)
    }

    fn var_declaration(&mut self) -> Result<Stmt<'a>> {
        let name: &'a Token = self.consume(TokenType::IDENTIFIER, "expected variable name")?;

        let initializer: Option<Expr<'a>> = if self.matches(TokenType::EQUAL) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            TokenType::SEMICOLON,
            "expected ';' after variable declaration",
        )?;

        Ok(Stmt::Var { name, initializer })
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement(&mut self) -> Result<Stmt<'a>> {
        debug!("Parsing statement starting with {:?}", self.peek().token_type);

        self.nested(Self::statement_by_keyword)
    }

    fn statement_by_keyword(&mut self) -> Result<Stmt<'a>> {
        if self.matches(TokenType::BREAK) {
            self.break_statement()
        } else if self.matches(TokenType::CONTINUE) {
            self.continue_statement()
        } else if self.matches(TokenType::FOR) {
            self.for_statement()
        } else if self.matches(TokenType::IF) {
            self.if_statement()
        } else if self.matches(TokenType::PRINT) {
            self.print_statement()
        } else if self.matches(TokenType::RETURN) {
            self.return_statement()
        } else if self.matches(TokenType::WHILE) {
            self.while_statement()
        } else if self.matches(TokenType::LEFT_BRACE) {
            Ok(Stmt::Block(self.block()?))
        } else {
            self.expression_statement()
        }
    }

    fn break_statement(&mut self) -> Result<Stmt<'a>> {
        let keyword: &'a Token = self.previous();

        if self.loop_depth < 1 {
            return Err(ParseError::syntax(keyword, "expected inside the loop"));
        }

        self.consume(TokenType::SEMICOLON, "expected ';' after break")?;

        Ok(Stmt::Break { keyword })
    }

    fn continue_statement(&mut self) -> Result<Stmt<'a>> {
        let keyword: &'a Token = self.previous();

        if self.loop_depth < 1 {
            return Err(ParseError::syntax(keyword, "expected inside the loop"));
        }

        self.consume(TokenType::SEMICOLON, "expected ';' after continue")?;

        Ok(Stmt::Continue { keyword })
    }

    /// Parses the three clauses and the body, then rewrites the loop as
    /// `{ initializer; while (condition) { body; increment; } }`.
    fn for_statement(&mut self) -> Result<Stmt<'a>> {
        self.consume(TokenType::LEFT_PAREN, "expected '(' after 'for'")?;

        let initializer: Option<Stmt<'a>> = if self.matches(TokenType::SEMICOLON) {
            None
        } else if self.matches(TokenType::VAR) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition: Option<Expr<'a>> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenType::SEMICOLON, "expected ';' after for condition")?;

        let increment: Option<Expr<'a>> = if !self.check(TokenType::RIGHT_PAREN) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenType::RIGHT_PAREN, "expected ')' after for clauses")?;

        let mut body: Stmt<'a> = self.in_loop(Self::statement)?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![Some(body), Some(Stmt::Expression(increment))]);
        }

        // An omitted condition loops forever.
        body = Stmt::While {
            condition: condition.unwrap_or(Expr::Literal(LiteralValue::True)),
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![Some(initializer), Some(body)]);
        }

        debug!("Desugared for loop into {:?}", body);

        Ok(body)
    }

    fn if_statement(&mut self) -> Result<Stmt<'a>> {
        self.consume(TokenType::LEFT_PAREN, "expected '(' after 'if'")?;
        let condition: Expr<'a> = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "expected ')' after if condition")?;

        let then_branch: Box<Stmt<'a>> = Box::new(self.statement()?);

        // Taken eagerly, so a dangling `else` binds to the innermost `if`.
        let else_branch: Option<Box<Stmt<'a>>> = if self.matches(TokenType::ELSE) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn print_statement(&mut self) -> Result<Stmt<'a>> {
        let value: Expr<'a> = self.expression()?;

        self.consume(TokenType::SEMICOLON, "expected ';' after expression")?;

        Ok(Stmt::Print(value))
    }

    fn return_statement(&mut self) -> Result<Stmt<'a>> {
        let keyword: &'a Token = self.previous();

        let value: Option<Expr<'a>> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "expected ';' after return value")?;

        Ok(Stmt::Return { keyword, value })
    }

    fn while_statement(&mut self) -> Result<Stmt<'a>> {
        self.consume(TokenType::LEFT_PAREN, "expected '(' after while")?;
        let condition: Expr<'a> = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "expected ')' after while condition")?;

        let body: Box<Stmt<'a>> = Box::new(self.in_loop(Self::statement)?);

        Ok(Stmt::While { condition, body })
    }

    /// Declarations up to the closing `}`; the opening brace is already consumed.
    fn block(&mut self) -> Result<StmtList<'a>> {
        let mut statements: StmtList<'a> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            statements.push(self.declaration());
        }

        self.consume(TokenType::RIGHT_BRACE, "expected '}' after block")?;

        Ok(statements)
    }

    fn expression_statement(&mut self) -> Result<Stmt<'a>> {
        let expr: Expr<'a> = self.expression()?;

        self.consume(TokenType::SEMICOLON, "expected ';' after expression")?;

        Ok(Stmt::Expression(expr))
    }

    // ─────────────────────── expression rules ─────────────────────

    fn expression(&mut self) -> Result<Expr<'a>> {
        self.nested(|parser| {
            if parser.matches(TokenType::FUN) {
                return parser.function_expression();
            }

            parser.assignment()
        })
    }

    fn assignment(&mut self) -> Result<Expr<'a>> {
        let expr: Expr<'a> = self.logical_or()?;

        if self.matches(TokenType::EQUAL) {
            let equals: &'a Token = self.previous();
            let value: Expr<'a> = self.nested(Self::assignment)?;

            return match expr {
                Expr::Variable(name) => Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                }),

                other => {
                    self.advise(ParseError::target(equals, "invalid assignment target"));

                    Ok(other)
                }
            };
        }

        Ok(expr)
    }

    fn logical_or(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.logical_and()?;

        while self.matches(TokenType::OR) {
            let operator: &'a Token = self.previous();
            let right: Expr<'a> = self.logical_and()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.equality()?;

        while self.matches(TokenType::AND) {
            let operator: &'a Token = self.previous();
            let right: Expr<'a> = self.equality()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr<'a>> {
        self.binary(
            &[TokenType::BANG_EQUAL, TokenType::EQUAL_EQUAL],
            Self::comparison,
        )
    }

    fn comparison(&mut self) -> Result<Expr<'a>> {
        self.binary(
            &[
                TokenType::GREATER,
                TokenType::GREATER_EQUAL,
                TokenType::LESS,
                TokenType::LESS_EQUAL,
            ],
            Self::term,
        )
    }

    fn term(&mut self) -> Result<Expr<'a>> {
        self.binary(&[TokenType::MINUS, TokenType::PLUS], Self::factor)
    }

    fn factor(&mut self) -> Result<Expr<'a>> {
        self.binary(&[TokenType::STAR, TokenType::SLASH], Self::unary)
    }

    /// Left‑associative loop shared by the arithmetic/comparison levels.
    fn binary(
        &mut self,
        operators: &[TokenType],
        operand: fn(&mut Self) -> Result<Expr<'a>>,
    ) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = operand(self)?;

        while self.match_any(operators) {
            let operator: &'a Token = self.previous();
            let right: Expr<'a> = operand(self)?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr<'a>> {
        if self.match_any(&[TokenType::BANG, TokenType::MINUS]) {
            let operator: &'a Token = self.previous();
            let right: Expr<'a> = self.nested(Self::unary)?;

            return Ok(Expr::Unary {
                operator,
                right: Box::new(right),
            });
        }

        self.call()
    }

    fn call(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.primary()?;

        while self.matches(TokenType::LEFT_PAREN) {
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr<'a>) -> Result<Expr<'a>> {
        let mut arguments: Vec<Expr<'a>> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if arguments.len() >= MAX_ARITY {
                    self.advise(ParseError::limit(
                        self.peek(),
                        format!("can't have more than {} arguments", MAX_ARITY),
                    ));
                }

                arguments.push(self.expression()?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        let paren: &'a Token = self.consume(TokenType::RIGHT_PAREN, "expected ')' after arguments")?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    fn primary(&mut self) -> Result<Expr<'a>> {
        if self.matches(TokenType::FALSE) {
            return Ok(Expr::Literal(LiteralValue::False));
        }
        if self.matches(TokenType::TRUE) {
            return Ok(Expr::Literal(LiteralValue::True));
        }
        if self.matches(TokenType::NIL) {
            return Ok(Expr::Literal(LiteralValue::Nil));
        }

        if let TokenType::NUMBER(n) = self.peek().token_type {
            self.advance();
            return Ok(Expr::Literal(LiteralValue::Number(n)));
        }

        if let TokenType::STRING(ref s) = self.peek().token_type {
            self.advance();
            return Ok(Expr::Literal(LiteralValue::Str(s.clone())));
        }

        if self.matches(TokenType::IDENTIFIER) {
            return Ok(Expr::Variable(self.previous()));
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let expr: Expr<'a> = self.expression()?;

            self.consume(TokenType::RIGHT_PAREN, "expected enclosing ')' after expression")?;

            return Ok(Expr::Grouping(Box::new(expr)));
        }

        Err(ParseError::syntax(self.peek(), "expected expression"))
    }

    // ────────────────────── utility helpers ───────────────────────

    /// Runs `rule` one loop level deeper; the depth is restored on every exit path.
    fn in_loop<T>(&mut self, rule: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.loop_depth += 1;
        let result: Result<T> = rule(self);
        self.loop_depth -= 1;

        result
    }

    /// Runs `rule` one nesting level deeper, or fails once [`MAX_DEPTH`] is
    /// reached.  The depth is restored on every exit path.
    fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_DEPTH {
            debug!("Nesting ceiling reached at token {}", self.current);

            return Err(ParseError::syntax(self.peek(), "too much nesting"));
        }

        self.depth += 1;
        let result: Result<T> = rule(self);
        self.depth -= 1;

        result
    }

    /// Record a non‑fatal diagnostic and keep going.
    fn advise(&mut self, error: ParseError) {
        debug!("Advisory: {}", error);

        self.errors.push(error);
    }

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    #[inline(always)]
    fn match_any(&mut self, ttypes: &[TokenType]) -> bool {
        for ttype in ttypes {
            if self.check(ttype.clone()) {
                self.advance();

                return true;
            }
        }

        false
    }

    #[inline(always)]
    fn consume(&mut self, ttype: TokenType, message: &str) -> Result<&'a Token> {
        if self.check(ttype) {
            return Ok(self.advance());
        }

        Err(ParseError::syntax(self.peek(), message))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    #[inline(always)]
    fn advance(&mut self) -> &'a Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    #[inline(always)]
    fn peek(&self) -> &'a Token {
        &self.tokens[self.current]
    }

    #[inline(always)]
    fn previous(&self) -> &'a Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Discards tokens until it thinks it is at a statement boundary.
    fn synchronize(&mut self) {
        self.advance(); // skip the token that caused the error

        while !self.is_at_end() {
            if matches!(self.previous().token_type, TokenType::SEMICOLON) {
                break;
            }

            match self.peek().token_type {
                TokenType::CLASS
                | TokenType::FUN
                | TokenType::VAR
                | TokenType::FOR
                | TokenType::IF
                | TokenType::WHILE
                | TokenType::PRINT
                | TokenType::RETURN => break,
                _ => {}
            }

            self.advance();
        }

        debug!("Synchronized at token {}", self.current);
    }
}

use crate::ast::{ArithOp, BoolOp, CastFn, CompareOp, Expr};
use crate::error::{ExprError, Result};
use crate::lexer::{Lexer, Token};
use crate::value::Value;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

/// Parses `src` against the whitelisted grammar. Any construct outside it —
/// an unbound identifier, attribute access, subscript, function call other
/// than `int/float/str/len/answers.get` — fails here, at condition
/// create-time, per the parse-time-whitelist rule.
pub fn parse(src: &str) -> Result<Expr> {
    let tokens = Lexer::tokenize(src)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    parser.expect(Token::Eof)?;
    Ok(expr)
}

impl Parser {
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos).cloned().unwrap_or(Token::Eof);
        self.pos += 1;
        tok
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        let tok = self.advance();
        if tok == expected {
            Ok(())
        } else {
            Err(ExprError::UnexpectedToken(format!("{tok:?}")))
        }
    }

    fn eat_ident(&mut self, name: &str) -> bool {
        if matches!(self.peek(), Token::Ident(s) if s == name) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_and()?;
        while self.eat_ident("or") {
            let rhs = self.parse_and()?;
            lhs = Expr::BoolOp { op: BoolOp::Or, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_not()?;
        while self.eat_ident("and") {
            let rhs = self.parse_not()?;
            lhs = Expr::BoolOp { op: BoolOp::And, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Expr> {
        if self.eat_ident("not") {
            Ok(Expr::Not(Box::new(self.parse_not()?)))
        } else {
            self.parse_comparison()
        }
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let lhs = self.parse_membership()?;
        let op = match self.peek() {
            Token::Eq => CompareOp::Eq,
            Token::Ne => CompareOp::Ne,
            Token::Lt => CompareOp::Lt,
            Token::Le => CompareOp::Le,
            Token::Gt => CompareOp::Gt,
            Token::Ge => CompareOp::Ge,
            _ => return Ok(lhs),
        };
        self.advance();
        let rhs = self.parse_membership()?;
        Ok(Expr::Compare { op, lhs: Box::new(lhs), rhs: Box::new(rhs) })
    }

    fn parse_membership(&mut self) -> Result<Expr> {
        let lhs = self.parse_additive()?;
        if self.eat_ident("in") {
            let rhs = self.parse_additive()?;
            return Ok(Expr::In { lhs: Box::new(lhs), rhs: Box::new(rhs) });
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => ArithOp::Add,
                Token::Minus => ArithOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Arith { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => ArithOp::Mul,
                Token::Slash => ArithOp::Div,
                Token::Percent => ArithOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::Arith { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if matches!(self.peek(), Token::Minus) {
            self.advance();
            Ok(Expr::Neg(Box::new(self.parse_unary()?)))
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.advance() {
            Token::Number(n) => Ok(Expr::Literal(Value::Number(n))),
            Token::Str(s) => Ok(Expr::Literal(Value::Str(s))),
            Token::LParen => {
                let expr = self.parse_or()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::LBracket => self.parse_list(),
            Token::Ident(name) => self.parse_ident_expr(&name),
            other => Err(ExprError::UnexpectedToken(format!("{other:?}"))),
        }
    }

    fn parse_list(&mut self) -> Result<Expr> {
        let mut items = Vec::new();
        if !matches!(self.peek(), Token::RBracket) {
            loop {
                items.push(self.parse_or()?);
                if matches!(self.peek(), Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(Token::RBracket)?;
        Ok(Expr::List(items))
    }

    fn parse_ident_expr(&mut self, name: &str) -> Result<Expr> {
        match name {
            "True" => Ok(Expr::Literal(Value::Bool(true))),
            "False" => Ok(Expr::Literal(Value::Bool(false))),
            "None" => Ok(Expr::Literal(Value::Null)),
            "answers" => self.parse_answers_get(),
            "int" => self.parse_cast(CastFn::Int),
            "float" => self.parse_cast(CastFn::Float),
            "str" => self.parse_cast(CastFn::Str),
            "len" => self.parse_cast(CastFn::Len),
            other => Err(ExprError::DisallowedNode(format!(
                "bare identifier '{other}' — only answers.get(...), literals, and whitelisted casts are permitted"
            ))),
        }
    }

    fn parse_answers_get(&mut self) -> Result<Expr> {
        self.expect(Token::Dot)?;
        match self.advance() {
            Token::Ident(m) if m == "get" => {}
            other => {
                return Err(ExprError::DisallowedNode(format!(
                    "attribute access 'answers.{other:?}' is not permitted, only .get(...)"
                )))
            }
        }
        self.expect(Token::LParen)?;
        let id = match self.advance() {
            Token::Str(s) => s,
            other => return Err(ExprError::UnexpectedToken(format!("{other:?}"))),
        };
        let default = if matches!(self.peek(), Token::Comma) {
            self.advance();
            Some(Box::new(self.parse_or()?))
        } else {
            None
        };
        self.expect(Token::RParen)?;
        Ok(Expr::AnswersGet { id, default })
    }

    fn parse_cast(&mut self, func: CastFn) -> Result<Expr> {
        self.expect(Token::LParen)?;
        let arg = self.parse_or()?;
        self.expect(Token::RParen)?;
        Ok(Expr::Cast { func, arg: Box::new(arg) })
    }
}

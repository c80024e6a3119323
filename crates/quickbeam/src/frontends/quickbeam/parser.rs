//! Recursive descent parser producing the Quickbeam AST
//!
//! Semicolons are optional statement terminators and newlines carry no
//! meaning, so every statement form must be recognisable from its first
//! tokens.

use std::rc::Rc;

use super::lexer::{Token, TokenKind};
use crate::ast::{
    Block, ClassDecl, ClassMember, ClassRef, Expr, ExprKind, ForLoop, FunctionDecl, InfixOp,
    InterfaceDecl, Literal, MethodSignature, Modifiers, Param, PrefixOp, Program, Span, Stmt,
    StmtKind, TypeRef, Visibility,
};
use crate::frontend::{ParseError, SourceLocation};

type ParseResult<T> = Result<T, ParseError>;

pub(crate) struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    file: &'a str,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: Vec<Token>, file: &'a str) -> Self {
        Self {
            tokens,
            pos: 0,
            file,
        }
    }

    /// Parse a complete source file.
    pub(crate) fn parse_program(mut self) -> ParseResult<Program> {
        let mut stmts = Vec::new();
        self.skip_semicolons();
        while !self.at_end() {
            stmts.push(self.statement()?);
            self.skip_semicolons();
        }
        Ok(Program { stmts })
    }

    // ===== Token access =====

    fn current(&self) -> &Token {
        // The token list always ends with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek_kind(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn span(&self) -> Span {
        let token = self.current();
        Span::new(token.line, token.column)
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn skip_semicolons(&mut self) {
        while self.eat(&TokenKind::Semicolon) {}
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let token = self.current();
        ParseError::new(message).with_location(SourceLocation::new(
            self.file,
            token.line,
            token.column,
        ))
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        self.error(format!("expected {expected}, found {}", self.current_kind()))
    }

    // ===== Statements =====

    fn statement(&mut self) -> ParseResult<Stmt> {
        let span = self.span();
        let kind = match self.current_kind() {
            TokenKind::Namespace => {
                self.advance();
                StmtKind::Namespace(self.qualified_name()?)
            }
            TokenKind::Use => self.use_decl()?,
            TokenKind::Class => StmtKind::Class(Rc::new(self.class_decl()?)),
            TokenKind::Interface => StmtKind::Interface(Rc::new(self.interface_decl()?)),
            TokenKind::Func if matches!(self.peek_kind(1), TokenKind::Ident(_)) => {
                StmtKind::Function(Rc::new(self.function_decl()?))
            }
            TokenKind::Return => {
                self.advance();
                if matches!(
                    self.current_kind(),
                    TokenKind::RBrace | TokenKind::Semicolon | TokenKind::Eof
                ) {
                    StmtKind::Return(None)
                } else {
                    StmtKind::Return(Some(self.expression()?))
                }
            }
            TokenKind::If => return self.if_stmt(),
            TokenKind::For => StmtKind::For(self.for_loop()?),
            TokenKind::Break => {
                self.advance();
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.advance();
                StmtKind::Continue
            }
            TokenKind::LBrace => StmtKind::Block(self.block()?),
            TokenKind::Go => {
                self.advance();
                StmtKind::Go(self.expression()?)
            }
            _ => return self.simple_statement(),
        };
        Ok(Stmt::new(kind, span))
    }

    /// Statements allowed in `for` headers: declarations, assignments,
    /// increments and bare expressions.
    fn simple_statement(&mut self) -> ParseResult<Stmt> {
        let span = self.span();

        if matches!(self.peek_kind(1), TokenKind::ColonAssign) {
            let name = self.expect_ident()?;
            self.advance();
            let value = self.expression()?;
            return Ok(Stmt::new(StmtKind::ShortDeclare { name, value }, span));
        }

        if self.check(&TokenKind::Let) {
            return self.let_stmt();
        }

        let expr = self.expression()?;
        let op = match self.current_kind() {
            TokenKind::Assign => Some(None),
            TokenKind::PlusAssign => Some(Some(InfixOp::Add)),
            TokenKind::MinusAssign => Some(Some(InfixOp::Sub)),
            TokenKind::StarAssign => Some(Some(InfixOp::Mul)),
            TokenKind::SlashAssign => Some(Some(InfixOp::Div)),
            TokenKind::PercentAssign => Some(Some(InfixOp::Rem)),
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = if self.check(&TokenKind::PlusPlus) {
                    InfixOp::Add
                } else {
                    InfixOp::Sub
                };
                self.check_assignable(&expr)?;
                let one_span = self.span();
                self.advance();
                let one = Expr::new(ExprKind::Literal(Literal::Int(1)), one_span);
                return Ok(Stmt::new(
                    StmtKind::Expr(assign(expr, Some(op), one, span)),
                    span,
                ));
            }
            _ => None,
        };

        match op {
            Some(op) => {
                self.check_assignable(&expr)?;
                self.advance();
                let value = self.expression()?;
                Ok(Stmt::new(StmtKind::Expr(assign(expr, op, value, span)), span))
            }
            None => Ok(Stmt::new(StmtKind::Expr(expr), span)),
        }
    }

    fn check_assignable(&self, target: &Expr) -> ParseResult<()> {
        match target.kind {
            ExprKind::Ident(_)
            | ExprKind::Member { .. }
            | ExprKind::Index { .. }
            | ExprKind::StaticAccess { .. } => Ok(()),
            _ => Err(ParseError::new("invalid assignment target").with_location(
                SourceLocation::new(self.file, target.span.line, target.span.column),
            )),
        }
    }

    fn use_decl(&mut self) -> ParseResult<StmtKind> {
        self.expect(&TokenKind::Use)?;
        let path = self.qualified_name()?;
        let alias = if self.eat(&TokenKind::As) {
            Some(self.expect_ident()?)
        } else {
            None
        };
        Ok(StmtKind::Use { path, alias })
    }

    fn let_stmt(&mut self) -> ParseResult<Stmt> {
        let span = self.span();
        self.expect(&TokenKind::Let)?;
        let name = self.expect_ident()?;
        let ty = if self.eat(&TokenKind::Colon) {
            Some(self.type_ref()?)
        } else {
            None
        };
        let value = if self.eat(&TokenKind::Assign) {
            Some(self.expression()?)
        } else {
            None
        };
        Ok(Stmt::new(StmtKind::Let { name, ty, value }, span))
    }

    fn if_stmt(&mut self) -> ParseResult<Stmt> {
        let span = self.span();
        self.expect(&TokenKind::If)?;
        let condition = self.expression()?;
        let then_branch = self.block()?;
        let else_branch = if self.eat(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                Some(Box::new(self.if_stmt()?))
            } else {
                let block_span = self.span();
                Some(Box::new(Stmt::new(StmtKind::Block(self.block()?), block_span)))
            }
        } else {
            None
        };
        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    fn for_loop(&mut self) -> ParseResult<ForLoop> {
        self.expect(&TokenKind::For)?;

        // for { }
        if self.check(&TokenKind::LBrace) {
            return Ok(ForLoop {
                init: None,
                condition: None,
                post: None,
                body: self.block()?,
            });
        }

        let init = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.simple_statement()?)
        };

        if !self.eat(&TokenKind::Semicolon) {
            // for cond { }
            return match init {
                Some(Stmt {
                    kind: StmtKind::Expr(condition),
                    ..
                }) => Ok(ForLoop {
                    init: None,
                    condition: Some(condition),
                    post: None,
                    body: self.block()?,
                }),
                _ => Err(self.unexpected("`;` after for-loop initializer")),
            };
        }

        // for init; cond; post { }
        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(&TokenKind::Semicolon)?;
        let post = if self.check(&TokenKind::LBrace) {
            None
        } else {
            Some(Box::new(self.simple_statement()?))
        };
        Ok(ForLoop {
            init: init.map(Box::new),
            condition,
            post,
            body: self.block()?,
        })
    }

    fn block(&mut self) -> ParseResult<Block> {
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        self.skip_semicolons();
        while !self.check(&TokenKind::RBrace) {
            if self.at_end() {
                return Err(self.unexpected("`}`"));
            }
            stmts.push(self.statement()?);
            self.skip_semicolons();
        }
        self.advance();
        Ok(Block::new(stmts))
    }

    // ===== Declarations =====

    fn qualified_name(&mut self) -> ParseResult<String> {
        let mut name = self.expect_ident()?;
        while self.check(&TokenKind::Dot) && matches!(self.peek_kind(1), TokenKind::Ident(_)) {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_ident()?);
        }
        Ok(name)
    }

    fn qualified_name_list(&mut self) -> ParseResult<Vec<String>> {
        let mut names = vec![self.qualified_name()?];
        while self.eat(&TokenKind::Comma) {
            names.push(self.qualified_name()?);
        }
        Ok(names)
    }

    fn type_ref(&mut self) -> ParseResult<TypeRef> {
        let name = self.qualified_name()?;
        let is_array = if self.check(&TokenKind::LBracket)
            && matches!(self.peek_kind(1), TokenKind::RBracket)
        {
            self.advance();
            self.advance();
            true
        } else {
            false
        };
        Ok(TypeRef { name, is_array })
    }

    fn return_types(&mut self) -> ParseResult<Vec<TypeRef>> {
        if !self.eat(&TokenKind::Colon) {
            return Ok(vec![]);
        }
        if self.eat(&TokenKind::LParen) {
            let mut types = vec![self.type_ref()?];
            while self.eat(&TokenKind::Comma) {
                types.push(self.type_ref()?);
            }
            self.expect(&TokenKind::RParen)?;
            Ok(types)
        } else {
            Ok(vec![self.type_ref()?])
        }
    }

    fn params(&mut self) -> ParseResult<Vec<Param>> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) {
            let name = self.expect_ident()?;
            let ty = if self.eat(&TokenKind::Colon) {
                Some(self.type_ref()?)
            } else {
                None
            };
            let default = if self.eat(&TokenKind::Assign) {
                Some(self.expression()?)
            } else {
                None
            };
            params.push(Param { name, ty, default });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    /// `func [name](params)[: types] { body }`
    fn function_decl(&mut self) -> ParseResult<FunctionDecl> {
        self.expect(&TokenKind::Func)?;
        let name = match self.current_kind() {
            TokenKind::Ident(_) => Some(self.expect_ident()?),
            _ => None,
        };
        let params = self.params()?;
        let return_types = self.return_types()?;
        let body = Rc::new(self.block()?);
        Ok(FunctionDecl {
            name,
            params,
            return_types,
            body,
        })
    }

    fn modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        loop {
            match self.current_kind() {
                TokenKind::Public => modifiers.visibility = Visibility::Public,
                TokenKind::Protected => modifiers.visibility = Visibility::Protected,
                TokenKind::Private => modifiers.visibility = Visibility::Private,
                TokenKind::Static => modifiers.is_static = true,
                _ => return modifiers,
            }
            self.advance();
        }
    }

    fn class_decl(&mut self) -> ParseResult<ClassDecl> {
        self.expect(&TokenKind::Class)?;
        let name = self.expect_ident()?;
        let parent = if self.eat(&TokenKind::Extends) {
            Some(self.qualified_name()?)
        } else {
            None
        };
        let interfaces = if self.eat(&TokenKind::Implements) {
            self.qualified_name_list()?
        } else {
            vec![]
        };

        self.expect(&TokenKind::LBrace)?;
        let mut members = Vec::new();
        self.skip_semicolons();
        while !self.eat(&TokenKind::RBrace) {
            if self.at_end() {
                return Err(self.unexpected("`}`"));
            }
            members.push(self.class_member()?);
            self.skip_semicolons();
        }

        Ok(ClassDecl {
            name,
            parent,
            interfaces,
            members,
        })
    }

    fn class_member(&mut self) -> ParseResult<ClassMember> {
        let modifiers = self.modifiers();
        match self.current_kind() {
            TokenKind::Const => {
                self.advance();
                let name = self.expect_ident()?;
                self.expect(&TokenKind::Assign)?;
                let value = self.expression()?;
                Ok(ClassMember::Constant {
                    name,
                    value,
                    modifiers,
                })
            }
            TokenKind::Func => {
                if !matches!(self.peek_kind(1), TokenKind::Ident(_)) {
                    self.advance();
                    return Err(self.unexpected("method name"));
                }
                Ok(ClassMember::Method {
                    decl: Rc::new(self.function_decl()?),
                    modifiers,
                })
            }
            TokenKind::Ident(_) => {
                let name = self.expect_ident()?;
                let ty = if self.eat(&TokenKind::Colon) {
                    Some(self.type_ref()?)
                } else {
                    None
                };
                let default = if self.eat(&TokenKind::Assign) {
                    Some(self.expression()?)
                } else {
                    None
                };
                Ok(ClassMember::Field {
                    name,
                    ty,
                    default,
                    modifiers,
                })
            }
            _ => Err(self.unexpected("class member")),
        }
    }

    fn interface_decl(&mut self) -> ParseResult<InterfaceDecl> {
        self.expect(&TokenKind::Interface)?;
        let name = self.expect_ident()?;
        let parents = if self.eat(&TokenKind::Extends) {
            self.qualified_name_list()?
        } else {
            vec![]
        };

        self.expect(&TokenKind::LBrace)?;
        let mut methods = Vec::new();
        self.skip_semicolons();
        while !self.eat(&TokenKind::RBrace) {
            self.modifiers();
            self.expect(&TokenKind::Func)?;
            let name = self.expect_ident()?;
            let params = self.params()?;
            let return_types = self.return_types()?;
            methods.push(MethodSignature {
                name,
                params,
                return_types,
            });
            self.skip_semicolons();
        }

        Ok(InterfaceDecl {
            name,
            parents,
            methods,
        })
    }

    // ===== Expressions =====

    pub(crate) fn expression(&mut self) -> ParseResult<Expr> {
        self.ternary()
    }

    fn ternary(&mut self) -> ParseResult<Expr> {
        let condition = self.binary(0)?;
        if !self.eat(&TokenKind::Question) {
            return Ok(condition);
        }
        let span = condition.span;
        let then_branch = self.expression()?;
        self.expect(&TokenKind::Colon)?;
        let else_branch = self.expression()?;
        Ok(Expr::new(
            ExprKind::Ternary {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            span,
        ))
    }

    /// Precedence climbing over the left-associative binary operators.
    fn binary(&mut self, min_level: u8) -> ParseResult<Expr> {
        let mut left = self.unary()?;
        while let Some((op, level)) = infix_op(self.current_kind()) {
            if level < min_level {
                break;
            }
            self.advance();
            let right = self.binary(level + 1)?;
            let span = left.span;
            left = Expr::new(
                ExprKind::Infix {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        let span = self.span();
        let op = match self.current_kind() {
            TokenKind::Bang => PrefixOp::Not,
            TokenKind::Minus => PrefixOp::Neg,
            _ => return self.postfix(),
        };
        self.advance();
        let operand = self.unary()?;
        Ok(Expr::new(
            ExprKind::Prefix {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;
        loop {
            let span = expr.span;
            match self.current_kind() {
                TokenKind::LParen => {
                    let args = self.args()?;
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                TokenKind::Dot => {
                    self.advance();
                    let property = self.expect_ident()?;
                    expr = Expr::new(
                        ExprKind::Member {
                            object: Box::new(expr),
                            property,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.expression()?;
                    self.expect(&TokenKind::RBracket)?;
                    expr = Expr::new(
                        ExprKind::Index {
                            object: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                TokenKind::ColonColon => match expr.dotted_path() {
                    Some(path) => {
                        self.advance();
                        expr = self.static_member(ClassRef::Named(path), span)?;
                    }
                    None => return Err(self.error("`::` requires a class name on its left")),
                },
                _ => return Ok(expr),
            }
        }
    }

    /// The part after `Anchor::`.
    fn static_member(&mut self, class: ClassRef, span: Span) -> ParseResult<Expr> {
        let member = self.expect_ident()?;
        if self.check(&TokenKind::LParen) {
            let args = self.args()?;
            Ok(Expr::new(
                ExprKind::StaticCall {
                    class,
                    method: member,
                    args,
                },
                span,
            ))
        } else {
            Ok(Expr::new(ExprKind::StaticAccess { class, member }, span))
        }
    }

    fn args(&mut self) -> ParseResult<Vec<Expr>> {
        self.expect(&TokenKind::LParen)?;
        let args = self.expr_list(&TokenKind::RParen)?;
        Ok(args)
    }

    /// Comma-separated expressions up to and including `close`.
    fn expr_list(&mut self, close: &TokenKind) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();
        while !self.check(close) {
            items.push(self.expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(close)?;
        Ok(items)
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        let span = self.span();
        let kind = match self.current_kind().clone() {
            TokenKind::Int(n) => {
                self.advance();
                ExprKind::Literal(Literal::Int(n))
            }
            TokenKind::Float(n) => {
                self.advance();
                ExprKind::Literal(Literal::Float(n))
            }
            TokenKind::Str(s) => {
                self.advance();
                ExprKind::Literal(Literal::Str(s))
            }
            TokenKind::True => {
                self.advance();
                ExprKind::Literal(Literal::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                ExprKind::Literal(Literal::Bool(false))
            }
            TokenKind::Null => {
                self.advance();
                ExprKind::Literal(Literal::Null)
            }
            TokenKind::Ident(name) => {
                self.advance();
                ExprKind::Ident(name)
            }
            TokenKind::This => {
                self.advance();
                ExprKind::This
            }
            TokenKind::SelfKw => {
                self.advance();
                self.expect(&TokenKind::ColonColon)?;
                return self.static_member(ClassRef::SelfClass, span);
            }
            TokenKind::Static => {
                self.advance();
                self.expect(&TokenKind::ColonColon)?;
                return self.static_member(ClassRef::Static, span);
            }
            TokenKind::Super => {
                self.advance();
                if self.eat(&TokenKind::ColonColon) {
                    return self.static_member(ClassRef::Super, span);
                }
                ExprKind::Super
            }
            TokenKind::New => {
                self.advance();
                let class = self.qualified_name()?;
                let args = if self.check(&TokenKind::LParen) {
                    self.args()?
                } else {
                    vec![]
                };
                ExprKind::New { class, args }
            }
            TokenKind::Func => ExprKind::Function(Rc::new(self.function_decl()?)),
            TokenKind::LParen => {
                self.advance();
                let inner = self.expression()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::LBracket => {
                self.advance();
                ExprKind::Array(self.expr_list(&TokenKind::RBracket)?)
            }
            _ => return Err(self.unexpected("expression")),
        };
        Ok(Expr::new(kind, span))
    }
}

fn assign(target: Expr, op: Option<InfixOp>, value: Expr, span: Span) -> Expr {
    Expr::new(
        ExprKind::Assign {
            target: Box::new(target),
            op,
            value: Box::new(value),
        },
        span,
    )
}

/// Binary operator and its precedence level (higher binds tighter).
fn infix_op(kind: &TokenKind) -> Option<(InfixOp, u8)> {
    let entry = match kind {
        TokenKind::OrOr => (InfixOp::Or, 1),
        TokenKind::AndAnd => (InfixOp::And, 2),
        TokenKind::EqEq => (InfixOp::Eq, 3),
        TokenKind::BangEq => (InfixOp::Ne, 3),
        TokenKind::Lt => (InfixOp::Lt, 4),
        TokenKind::LtEq => (InfixOp::Le, 4),
        TokenKind::Gt => (InfixOp::Gt, 4),
        TokenKind::GtEq => (InfixOp::Ge, 4),
        TokenKind::Plus => (InfixOp::Add, 5),
        TokenKind::Minus => (InfixOp::Sub, 5),
        TokenKind::Star => (InfixOp::Mul, 6),
        TokenKind::Slash => (InfixOp::Div, 6),
        TokenKind::Percent => (InfixOp::Rem, 6),
        _ => return None,
    };
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::super::lexer::Lexer;
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> Program {
        let tokens = Lexer::new(src, "test.qb").tokenize().unwrap();
        Parser::new(tokens, "test.qb").parse_program().unwrap()
    }

    fn parse_err(src: &str) -> ParseError {
        let tokens = Lexer::new(src, "test.qb").tokenize().unwrap();
        Parser::new(tokens, "test.qb").parse_program().unwrap_err()
    }

    fn single_expr(src: &str) -> Expr {
        let mut program = parse(src);
        match program.stmts.remove(0).kind {
            StmtKind::Expr(expr) => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_precedence() {
        let expr = single_expr("1 + 2 * 3");
        let ExprKind::Infix { op, right, .. } = expr.kind else {
            panic!("expected infix");
        };
        assert_eq!(op, InfixOp::Add);
        assert!(matches!(right.kind, ExprKind::Infix { op: InfixOp::Mul, .. }));
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let expr = single_expr("10 - 3 - 2");
        let ExprKind::Infix { left, .. } = expr.kind else {
            panic!("expected infix");
        };
        assert!(matches!(left.kind, ExprKind::Infix { op: InfixOp::Sub, .. }));
    }

    #[test]
    fn test_static_call_on_dotted_path() {
        let expr = single_expr("App.Models.User::create(1)");
        match expr.kind {
            ExprKind::StaticCall {
                class, method, args, ..
            } => {
                assert_eq!(class, ClassRef::Named("App.Models.User".to_string()));
                assert_eq!(method, "create");
                assert_eq!(args.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_self_and_static_access() {
        assert!(matches!(
            single_expr("self::LIMIT").kind,
            ExprKind::StaticAccess {
                class: ClassRef::SelfClass,
                ..
            }
        ));
        assert!(matches!(
            single_expr("static::make()").kind,
            ExprKind::StaticCall {
                class: ClassRef::Static,
                ..
            }
        ));
    }

    #[test]
    fn test_increment_desugars_to_assignment() {
        let expr = single_expr("count++");
        assert!(matches!(
            expr.kind,
            ExprKind::Assign {
                op: Some(InfixOp::Add),
                ..
            }
        ));
    }

    #[test]
    fn test_three_for_forms() {
        let program = parse("for { break } for x < 3 { x++ } for i := 0; i < 3; i++ { }");
        let forms: Vec<(bool, bool, bool)> = program
            .stmts
            .iter()
            .map(|s| match &s.kind {
                StmtKind::For(l) => (l.init.is_some(), l.condition.is_some(), l.post.is_some()),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            forms,
            vec![(false, false, false), (false, true, false), (true, true, true)]
        );
    }

    #[test]
    fn test_class_members() {
        let program = parse(
            r#"
            class Dog extends Animal implements Named, Pet {
                const LEGS = 4
                private static count = 0
                name: string = "rex"
                public func speak(loud: bool = false): string { return "woof" }
            }
            "#,
        );
        let StmtKind::Class(decl) = &program.stmts[0].kind else {
            panic!("expected class");
        };
        assert_eq!(decl.name, "Dog");
        assert_eq!(decl.parent.as_deref(), Some("Animal"));
        assert_eq!(decl.interfaces, vec!["Named", "Pet"]);
        assert_eq!(decl.members.len(), 4);
        assert!(matches!(
            &decl.members[1],
            ClassMember::Field {
                modifiers: Modifiers {
                    visibility: Visibility::Private,
                    is_static: true
                },
                ..
            }
        ));
    }

    #[test]
    fn test_interface_with_tuple_return() {
        let program = parse("interface Pair extends Base { func split(s: string): (string, string) }");
        let StmtKind::Interface(decl) = &program.stmts[0].kind else {
            panic!("expected interface");
        };
        assert_eq!(decl.parents, vec!["Base"]);
        assert_eq!(decl.methods[0].return_types.len(), 2);
    }

    #[test]
    fn test_use_with_alias() {
        let program = parse("use App.Models.User as U");
        assert!(matches!(
            &program.stmts[0].kind,
            StmtKind::Use { path, alias: Some(alias) } if path == "App.Models.User" && alias == "U"
        ));
    }

    #[test]
    fn test_bare_return_before_brace() {
        let program = parse("func f() { return }");
        let StmtKind::Function(decl) = &program.stmts[0].kind else {
            panic!("expected function");
        };
        assert!(matches!(decl.body.stmts[0].kind, StmtKind::Return(None)));
    }

    #[test]
    fn test_invalid_assignment_target() {
        let err = parse_err("1 = 2");
        assert_eq!(err.message, "invalid assignment target");
    }

    #[test]
    fn test_error_location() {
        let err = parse_err("let x = )");
        assert_eq!(err.message, "expected expression, found `)`");
        assert_eq!(err.location, Some(SourceLocation::new("test.qb", 1, 9)));
    }
}

// ABOUTME: Recursive-descent parser: tokens to AST, with precedence cascade and error recovery

use crate::ast::{Expression, FunctionDecl, Statement, StringSegment, Token, TokenKind};
use crate::error::NyxError;
use crate::lexer::Lexer;
use crate::value::Value;
use std::rc::Rc;

const MAX_PARAMS: usize = 255;

pub fn parse(source: &str) -> Result<Vec<Statement>, Vec<NyxError>> {
    let tokens = Lexer::new(source).tokenize().map_err(|e| vec![e])?;
    Parser::new(tokens).parse_program()
}

/// Parses `source` the way the top-level driver does: every statement that
/// synchronizes cleanly after an error is still returned, alongside the
/// errors encountered along the way, so the caller can execute the partial
/// program — the evaluator will raise its own runtime errors against forms
/// a parser error dropped — rather than discarding it.
pub fn parse_recovering(source: &str) -> (Vec<Statement>, Vec<NyxError>) {
    match Lexer::new(source).tokenize() {
        Ok(tokens) => Parser::new(tokens).parse_program_permissive(),
        Err(e) => (Vec::new(), vec![e]),
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0 }
    }

    pub fn parse_program(&mut self) -> Result<Vec<Statement>, Vec<NyxError>> {
        let mut statements = Vec::new();
        let mut errors = Vec::new();
        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    errors.push(e);
                    self.synchronize();
                }
            }
        }
        if errors.is_empty() {
            Ok(statements)
        } else {
            Err(errors)
        }
    }

    /// Same recovery loop as [`Parser::parse_program`], but always returns
    /// the statements it managed to build alongside whatever errors it hit,
    /// rather than discarding them once any error occurs.
    pub fn parse_program_permissive(&mut self) -> (Vec<Statement>, Vec<NyxError>) {
        let mut statements = Vec::new();
        let mut errors = Vec::new();
        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    errors.push(e);
                    self.synchronize();
                }
            }
        }
        (statements, errors)
    }

    // ===== token-stream primitives =====

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn check(&self, kind: &TokenKind) -> bool {
        !self.is_at_end() && &self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    fn matches(&mut self, kinds: &[TokenKind]) -> bool {
        for kind in kinds {
            if self.check(kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token, NyxError> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(NyxError::parser(message, self.peek().line))
        }
    }

    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            match self.peek().kind {
                TokenKind::Func
                | TokenKind::Auto
                | TokenKind::Import
                | TokenKind::Output
                | TokenKind::Put
                | TokenKind::Typedef
                | TokenKind::If
                | TokenKind::For
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::RightBrace => return,
                _ => {}
            }
            self.advance();
        }
    }

    // ===== declarations and statements =====

    fn declaration(&mut self) -> Result<Statement, NyxError> {
        if self.check(&TokenKind::Func) {
            return self.function_declaration();
        }
        if self.check(&TokenKind::Import) {
            return self.import_statement();
        }
        if self.check(&TokenKind::Auto) {
            return self.var_declaration();
        }
        self.statement()
    }

    fn function_declaration(&mut self) -> Result<Statement, NyxError> {
        self.advance(); // 'func'
        let name = self.consume(TokenKind::Identifier, "Expect function name.")?;
        self.consume(TokenKind::LeftParen, "Expect '(' after function name.")?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                if params.len() >= MAX_PARAMS {
                    return Err(NyxError::parser(
                        format!("Can't have more than {MAX_PARAMS} parameters."),
                        self.peek().line,
                    ));
                }
                params.push(self.consume(TokenKind::Identifier, "Expect parameter name.")?);
                if !self.matches(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expect ')' after parameters.")?;
        self.consume(TokenKind::Equal, "Expect '=' before function body.")?;
        self.consume(TokenKind::LeftBrace, "Expect '{' to start function body.")?;
        let body = self.block_statements()?;
        Ok(Statement::FuncDecl(Rc::new(FunctionDecl {
            name: name.lexeme,
            params,
            body,
        })))
    }

    fn import_statement(&mut self) -> Result<Statement, NyxError> {
        self.advance(); // 'import'
        let path = self.consume(TokenKind::String, "Expect module path string.")?;
        self.consume(TokenKind::As, "Expect 'as' after import path.")?;
        let alias = self.consume(TokenKind::Identifier, "Expect alias name.")?;
        self.consume(TokenKind::Semicolon, "Expect ';' after import statement.")?;
        Ok(Statement::Import { path, alias })
    }

    fn var_declaration(&mut self) -> Result<Statement, NyxError> {
        self.advance(); // 'auto'
        self.parse_var_declaration_tail(true)
    }

    /// Parses `IDENT = expr` after the leading `auto` has been consumed by the
    /// caller. `require_semicolon` is false inside a for-loop initializer
    /// clause, which is terminated by `;` parsed by the caller instead.
    fn parse_var_declaration_tail(&mut self, require_semicolon: bool) -> Result<Statement, NyxError> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name.")?;
        let initializer = if self.matches(&[TokenKind::Equal]) {
            Some(self.expression()?)
        } else {
            None
        };
        if require_semicolon {
            self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration.")?;
        }
        Ok(Statement::VarDecl { name, initializer })
    }

    fn statement(&mut self) -> Result<Statement, NyxError> {
        if self.check(&TokenKind::If) {
            return self.if_statement();
        }
        if self.check(&TokenKind::For) {
            return self.for_statement();
        }
        if self.matches(&[TokenKind::Break]) {
            self.consume(TokenKind::Semicolon, "Expect ';' after 'break'.")?;
            return Ok(Statement::Break);
        }
        if self.matches(&[TokenKind::Continue]) {
            self.consume(TokenKind::Semicolon, "Expect ';' after 'continue'.")?;
            return Ok(Statement::Continue);
        }
        if self.matches(&[TokenKind::Return]) {
            let value = if self.check(&TokenKind::Semicolon) {
                None
            } else {
                Some(self.expression()?)
            };
            self.consume(TokenKind::Semicolon, "Expect ';' after return value.")?;
            return Ok(Statement::Return { value });
        }
        if self.check(&TokenKind::LeftBrace) {
            self.advance();
            return Ok(Statement::Block(self.block_statements()?));
        }
        if self.check(&TokenKind::Output) {
            return self.output_statement();
        }
        if self.check(&TokenKind::Put) {
            return self.put_statement();
        }
        if self.check(&TokenKind::Typedef) {
            return self.typedef_statement();
        }
        self.expression_statement()
    }

    fn block_statements(&mut self) -> Result<Vec<Statement>, NyxError> {
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    fn output_statement(&mut self) -> Result<Statement, NyxError> {
        self.advance();
        self.consume(TokenKind::LeftParen, "Expect '(' after 'output'.")?;
        let expr = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
        self.consume(TokenKind::Semicolon, "Expect ';' after output statement.")?;
        Ok(Statement::Output(expr))
    }

    fn put_statement(&mut self) -> Result<Statement, NyxError> {
        self.advance();
        self.consume(TokenKind::LeftParen, "Expect '(' after 'put'.")?;
        let expr = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
        self.consume(TokenKind::Semicolon, "Expect ';' after put statement.")?;
        Ok(Statement::Put(expr))
    }

    fn typedef_statement(&mut self) -> Result<Statement, NyxError> {
        self.advance();
        self.consume(TokenKind::LeftParen, "Expect '(' after '@Typedef'.")?;
        let expr = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
        self.consume(TokenKind::Semicolon, "Expect ';' after typedef statement.")?;
        Ok(Statement::Typedef(expr))
    }

    fn if_statement(&mut self) -> Result<Statement, NyxError> {
        self.advance();
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after condition.")?;
        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.matches(&[TokenKind::Else]) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Statement::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    /// `for ( init? ; cond? ; incr? ) body` — there is no semicolon after the
    /// increment clause; the close-paren terminates it, per the original
    /// parser's `forStatement`.
    fn for_statement(&mut self) -> Result<Statement, NyxError> {
        self.advance();
        self.consume(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.matches(&[TokenKind::Semicolon]) {
            None
        } else if self.check(&TokenKind::Auto) {
            self.advance();
            let decl = self.parse_var_declaration_tail(false)?;
            self.consume(TokenKind::Semicolon, "Expect ';' after loop initializer.")?;
            Some(Box::new(decl))
        } else {
            let expr = self.expression()?;
            self.consume(TokenKind::Semicolon, "Expect ';' after loop initializer.")?;
            Some(Box::new(Statement::Expression(expr)))
        };

        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if self.check(&TokenKind::RightParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::RightParen, "Expect ')' after for clauses.")?;

        let body = Box::new(self.statement()?);

        Ok(Statement::For {
            initializer,
            condition,
            increment,
            body,
        })
    }

    fn expression_statement(&mut self) -> Result<Statement, NyxError> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Statement::Expression(expr))
    }

    // ===== expressions: precedence cascade, low to high =====

    fn expression(&mut self) -> Result<Expression, NyxError> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expression, NyxError> {
        let target = self.logical_or()?;
        if self.matches(&[TokenKind::Equal]) {
            let equals_line = self.previous().line;
            let value = self.assignment()?;
            if is_valid_assignment_target(&target) {
                return Ok(Expression::Assignment {
                    target: Box::new(target),
                    value: Box::new(value),
                    equals_line,
                });
            }
            return Err(NyxError::parser("Invalid assignment target.", equals_line));
        }
        Ok(target)
    }

    fn logical_or(&mut self) -> Result<Expression, NyxError> {
        let mut expr = self.logical_and()?;
        while self.check(&TokenKind::Or) {
            let operator = self.advance();
            let right = self.logical_and()?;
            expr = Expression::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expression, NyxError> {
        let mut expr = self.equality()?;
        while self.check(&TokenKind::And) {
            let operator = self.advance();
            let right = self.equality()?;
            expr = Expression::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expression, NyxError> {
        let mut expr = self.comparison()?;
        while matches!(self.peek().kind, TokenKind::EqualEqual | TokenKind::BangEqual) {
            let operator = self.advance();
            let right = self.comparison()?;
            expr = Expression::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expression, NyxError> {
        let mut expr = self.term()?;
        while matches!(
            self.peek().kind,
            TokenKind::Less | TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual
        ) {
            let operator = self.advance();
            let right = self.term()?;
            expr = Expression::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expression, NyxError> {
        let mut expr = self.factor()?;
        while matches!(self.peek().kind, TokenKind::Plus | TokenKind::Minus) {
            let operator = self.advance();
            let right = self.factor()?;
            expr = Expression::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expression, NyxError> {
        let mut expr = self.unary()?;
        while matches!(self.peek().kind, TokenKind::Star | TokenKind::Slash | TokenKind::Percent) {
            let operator = self.advance();
            let right = self.unary()?;
            expr = Expression::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expression, NyxError> {
        if matches!(self.peek().kind, TokenKind::Minus | TokenKind::Not | TokenKind::Bang) {
            let operator = self.advance();
            let right = self.unary()?;
            return Ok(Expression::Unary {
                operator,
                right: Box::new(right),
            });
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expression, NyxError> {
        let mut expr = self.primary()?;
        loop {
            if self.matches(&[TokenKind::LeftParen]) {
                let paren_line = self.previous().line;
                let mut arguments = Vec::new();
                if !self.check(&TokenKind::RightParen) {
                    loop {
                        if arguments.len() >= MAX_PARAMS {
                            return Err(NyxError::parser(
                                format!("Can't have more than {MAX_PARAMS} arguments."),
                                self.peek().line,
                            ));
                        }
                        arguments.push(self.expression()?);
                        if !self.matches(&[TokenKind::Comma]) {
                            break;
                        }
                    }
                }
                self.consume(TokenKind::RightParen, "Expect ')' after arguments.")?;
                expr = Expression::Call {
                    callee: Box::new(expr),
                    arguments,
                    paren_line,
                };
            } else if self.matches(&[TokenKind::PlusPlus, TokenKind::MinusMinus]) {
                let operator = self.previous().clone();
                expr = Expression::PostfixUpdate {
                    operand: Box::new(expr),
                    operator,
                };
            } else if self.matches(&[TokenKind::LeftBracket]) {
                let index = self.expression()?;
                self.consume(TokenKind::RightBracket, "Expect ']' after index.")?;
                let closing_bracket_line = self.previous().line;
                expr = Expression::Subscript {
                    object: Box::new(expr),
                    index: Box::new(index),
                    closing_bracket_line,
                };
            } else if self.matches(&[TokenKind::Dot]) {
                let name = self.consume(TokenKind::Identifier, "Expect property name after '.'.")?;
                expr = Expression::MemberAccess {
                    object: Box::new(expr),
                    name,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expression, NyxError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::True => {
                self.advance();
                Ok(Expression::Literal {
                    value: Value::Bool(true),
                    line: token.line,
                })
            }
            TokenKind::False => {
                self.advance();
                Ok(Expression::Literal {
                    value: Value::Bool(false),
                    line: token.line,
                })
            }
            TokenKind::Number => {
                self.advance();
                let n: f64 = token.lexeme.parse().map_err(|_| {
                    NyxError::parser(format!("Invalid number literal '{}'.", token.lexeme), token.line)
                })?;
                Ok(Expression::Literal {
                    value: Value::Number(n),
                    line: token.line,
                })
            }
            TokenKind::String => {
                self.advance();
                self.string_literal_expression(&token)
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(Expression::Identifier {
                    name: token.lexeme,
                    token,
                })
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
                Ok(expr) // grouping parens are transparent: no wrapper node
            }
            TokenKind::Len => {
                self.advance();
                self.consume(TokenKind::LeftParen, "Expect '(' after 'len'.")?;
                let argument = self.expression()?;
                self.consume(TokenKind::RightParen, "Expect ')' after 'len' argument.")?;
                Ok(Expression::Len {
                    argument: Box::new(argument),
                    token,
                })
            }
            TokenKind::LeftBracket => {
                self.advance();
                let mut elements = Vec::new();
                if !self.check(&TokenKind::RightBracket) {
                    loop {
                        elements.push(self.expression()?);
                        if !self.matches(&[TokenKind::Comma]) {
                            break;
                        }
                    }
                }
                self.consume(TokenKind::RightBracket, "Expect ']' after list literal.")?;
                Ok(Expression::ListLiteral {
                    elements,
                    line: token.line,
                })
            }
            _ => Err(NyxError::parser(
                format!("Unexpected token '{}'.", token.lexeme),
                token.line,
            )),
        }
    }

    /// Splits a string lexeme on `#{...}` spans into literal/expression
    /// segments. Each span is lexed and parsed fresh via a nested Parser
    /// instance. Uses a plain first-`}` lookup (Nyx's grammar has no nested
    /// brace-delimited expression syntax to confuse this), matching the
    /// original parser's interpolation algorithm exactly.
    fn string_literal_expression(&mut self, token: &Token) -> Result<Expression, NyxError> {
        let lexeme = &token.lexeme;
        if !lexeme.contains("#{") {
            return Ok(Expression::Literal {
                value: Value::string(lexeme.clone()),
                line: token.line,
            });
        }

        let mut segments = Vec::new();
        let bytes: Vec<char> = lexeme.chars().collect();
        let mut i = 0;
        let mut text_buf = String::new();
        while i < bytes.len() {
            if bytes[i] == '#' && bytes.get(i + 1) == Some(&'{') {
                if !text_buf.is_empty() {
                    segments.push(StringSegment::Text(std::mem::take(&mut text_buf)));
                }
                let expr_start = i + 2;
                let mut j = expr_start;
                while j < bytes.len() && bytes[j] != '}' {
                    j += 1;
                }
                if j >= bytes.len() {
                    return Err(NyxError::parser("Unterminated interpolation.", token.line));
                }
                let sub_source: String = bytes[expr_start..j].iter().collect();
                if sub_source.trim().is_empty() {
                    return Err(NyxError::parser("Empty interpolation expression.", token.line));
                }
                let sub_tokens = Lexer::new(&sub_source)
                    .tokenize()
                    .map_err(|_| NyxError::parser("Invalid interpolation expression.", token.line))?;
                let mut sub_parser = Parser::new(sub_tokens);
                let sub_expr = sub_parser
                    .expression()
                    .map_err(|_| NyxError::parser("Invalid interpolation expression.", token.line))?;
                if !sub_parser.is_at_end() {
                    return Err(NyxError::parser(
                        "Unexpected trailing tokens in interpolation.",
                        token.line,
                    ));
                }
                segments.push(StringSegment::Expr(Box::new(sub_expr)));
                i = j + 1;
            } else {
                text_buf.push(bytes[i]);
                i += 1;
            }
        }
        if !text_buf.is_empty() {
            segments.push(StringSegment::Text(text_buf));
        }

        Ok(Expression::InterpolatedString {
            segments,
            line: token.line,
        })
    }
}

fn is_valid_assignment_target(expr: &Expression) -> bool {
    matches!(
        expr,
        Expression::Identifier { .. } | Expression::Subscript { .. } | Expression::MemberAccess { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Vec<Statement> {
        parse(src).unwrap_or_else(|e| panic!("parse failed: {e:?}"))
    }

    #[test]
    fn parses_var_decl_and_output() {
        let stmts = parse_ok("auto x = 1; output(x);");
        assert_eq!(stmts.len(), 2);
        assert!(matches!(stmts[0], Statement::VarDecl { .. }));
        assert!(matches!(stmts[1], Statement::Output(_)));
    }

    #[test]
    fn precedence_cascade_nests_correctly() {
        // 1 + 2 * 3 should parse as 1 + (2 * 3)
        let stmts = parse_ok("auto x = 1 + 2 * 3;");
        if let Statement::VarDecl {
            initializer: Some(Expression::Binary { operator, right, .. }),
            ..
        } = &stmts[0]
        {
            assert_eq!(operator.kind, TokenKind::Plus);
            assert!(matches!(**right, Expression::Binary { .. }));
        } else {
            panic!("expected binary expression");
        }
    }

    #[test]
    fn grouping_parens_produce_no_wrapper_node() {
        let stmts = parse_ok("auto x = (1 + 2) * 3;");
        if let Statement::VarDecl {
            initializer: Some(Expression::Binary { left, operator, .. }),
            ..
        } = &stmts[0]
        {
            assert_eq!(operator.kind, TokenKind::Star);
            assert!(matches!(**left, Expression::Binary { .. }));
        } else {
            panic!("expected binary expression");
        }
    }

    #[test]
    fn invalid_assignment_target_is_a_parser_error_at_equals_line() {
        let errs = parse("1 = 2;").unwrap_err();
        assert_eq!(errs[0].message(), "Invalid assignment target.");
    }

    #[test]
    fn for_loop_has_no_semicolon_after_increment() {
        let stmts = parse_ok("for (auto i = 0; i < 3; i++) { output(i); }");
        assert!(matches!(stmts[0], Statement::For { .. }));
    }

    #[test]
    fn string_interpolation_splits_text_and_expression_segments() {
        let stmts = parse_ok(r#"auto x = "v=#{1+2}";"#);
        if let Statement::VarDecl {
            initializer: Some(Expression::InterpolatedString { segments, .. }),
            ..
        } = &stmts[0]
        {
            assert_eq!(segments.len(), 2);
            assert!(matches!(segments[0], StringSegment::Text(_)));
            assert!(matches!(segments[1], StringSegment::Expr(_)));
        } else {
            panic!("expected interpolated string");
        }
    }

    #[test]
    fn plain_string_without_interpolation_is_a_literal() {
        let stmts = parse_ok(r#"auto x = "hello";"#);
        assert!(matches!(
            stmts[0],
            Statement::VarDecl {
                initializer: Some(Expression::Literal { .. }),
                ..
            }
        ));
    }

    #[test]
    fn parser_recovers_after_error_and_continues() {
        let errs = parse("1 = 2; auto x = 3;").unwrap_err();
        assert_eq!(errs.len(), 1);
    }

    #[test]
    fn parse_recovering_keeps_statements_that_synchronized_after_an_error() {
        let (stmts, errs) = parse_recovering("1 = 2; auto x = 3;");
        assert_eq!(errs.len(), 1);
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0], Statement::VarDecl { .. }));
    }

    #[test]
    fn too_many_function_parameters_is_a_parser_error() {
        let params: Vec<String> = (0..=MAX_PARAMS).map(|i| format!("p{i}")).collect();
        let src = format!("func f({}) = {{ }}", params.join(", "));
        let errs = parse(&src).unwrap_err();
        assert!(errs[0].message().contains("more than 255 parameters"));
    }
}

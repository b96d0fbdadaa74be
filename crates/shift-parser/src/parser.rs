//! Recursive-descent parser: top-level items, class bodies, statements, and
//! modifier bookkeeping. The expression precedence climber lives in
//! [`crate::expr_parser`] as a second `impl Parser` block over the same
//! struct.

use shift_common::{Diagnostic, DiagnosticSink, Severity, SourceMap, Span, Token, TokenCursor, TokenKind};

use crate::ast::{
    Class, ExprArena, Function, ModFlags, Module, Name, ParamList, ParsedFile, StmtArena, StmtId,
    StmtKind, Type, Variable,
};

pub struct Parser<'src> {
    pub(crate) cursor: TokenCursor<'src>,
    pub(crate) source_map: &'src SourceMap,
    pub(crate) path: String,
    pub(crate) module: Option<Module>,
    pub(crate) uses: Vec<Module>,
    pub(crate) classes: Vec<Class>,
    pub(crate) functions: Vec<Function>,
    pub(crate) variables: Vec<Variable>,
    pub(crate) exprs: ExprArena,
    pub(crate) stmts: StmtArena,
    /// Pending `(flag, token)` pairs accumulated while scanning modifier
    /// keywords, consumed wholesale when a declaration begins (4.3.1).
    pub(crate) pending_mods: Vec<(ModFlags, Token<'src>)>,
    /// Count of file-level `use` statements parsed so far; recorded on
    /// every declaration at the moment it is parsed (4.4.3 #3).
    pub(crate) implicit_use_count: usize,
}

impl<'src> Parser<'src> {
    pub fn new(tokens: Vec<Token<'src>>, source_map: &'src SourceMap, path: impl Into<String>) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            source_map,
            path: path.into(),
            module: None,
            uses: Vec::new(),
            classes: Vec::new(),
            functions: Vec::new(),
            variables: Vec::new(),
            exprs: ExprArena::new(),
            stmts: StmtArena::new(),
            pending_mods: Vec::new(),
            implicit_use_count: 0,
        }
    }

    pub fn parse(mut self, sink: &mut DiagnosticSink) -> ParsedFile {
        while !self.cursor.is_eof() {
            self.parse_top_item(sink);
        }
        if !self.pending_mods.is_empty() {
            let leftover: Vec<_> = self.pending_mods.drain(..).collect();
            for (_, tok) in leftover {
                self.error(sink, &tok, "modifier not attached to a declaration");
            }
        }
        ParsedFile {
            path: self.path,
            module: self.module,
            uses: self.uses,
            classes: self.classes,
            functions: self.functions,
            variables: self.variables,
            exprs: self.exprs,
            stmts: self.stmts,
        }
    }

    // -- token helpers -----------------------------------------------

    pub(crate) fn current(&self) -> Token<'src> {
        self.cursor.current()
    }

    pub(crate) fn peek(&self, n: usize) -> Token<'src> {
        self.cursor.peek(n)
    }

    pub(crate) fn bump(&mut self) -> Token<'src> {
        let tok = self.cursor.current();
        self.cursor.next(1);
        tok
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    pub(crate) fn at_keyword(&self, word: &str) -> bool {
        self.current().is_keyword(word)
    }

    /// Consume the current token if it matches `kind`, returning it.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        if self.at(kind) {
            Some(self.bump())
        } else {
            None
        }
    }

    pub(crate) fn eat_keyword(&mut self, word: &str) -> Option<Token<'src>> {
        if self.at_keyword(word) {
            Some(self.bump())
        } else {
            None
        }
    }

    /// Consume `kind`, emitting an error if the current token does not match.
    pub(crate) fn expect(&mut self, kind: TokenKind, sink: &mut DiagnosticSink) -> Token<'src> {
        if self.at(kind) {
            self.bump()
        } else {
            let tok = self.current();
            self.error(sink, &tok, format!("expected {kind}, found {}", describe(&tok)));
            tok
        }
    }

    pub(crate) fn error(&self, sink: &mut DiagnosticSink, tok: &Token<'src>, message: impl Into<String>) {
        sink.emit(Diagnostic::new(
            Severity::Error,
            message,
            self.path.clone(),
            tok.line,
            tok.col,
            tok.text.len().max(1) as u32,
            self.source_map.line_text(tok.line),
        ));
    }

    pub(crate) fn warn(&self, sink: &mut DiagnosticSink, tok: &Token<'src>, message: impl Into<String>) {
        sink.emit(Diagnostic::new(
            Severity::Warning,
            message,
            self.path.clone(),
            tok.line,
            tok.col,
            tok.text.len().max(1) as u32,
            self.source_map.line_text(tok.line),
        ));
    }

    /// Advance until (and through) a token of `kind`, or end of file.
    pub(crate) fn skip_until(&mut self, kind: TokenKind) {
        while !self.cursor.is_eof() && !self.at(kind) {
            self.bump();
        }
        if self.at(kind) {
            self.bump();
        }
    }

    /// Advance until just before a token of `kind` (does not consume it).
    pub(crate) fn skip_before(&mut self, kind: TokenKind) {
        while !self.cursor.is_eof() && !self.at(kind) {
            self.bump();
        }
    }

    // -- names / types -------------------------------------------------

    /// `name = IDENT { '.' IDENT }`
    pub(crate) fn parse_name(&mut self, sink: &mut DiagnosticSink) -> Name {
        let start = self.current();
        let begin = self.cursor.index() as u32;
        let mut text = String::new();
        if self.at(TokenKind::IDENTIFIER) {
            text.push_str(self.bump().text);
        } else {
            self.error(sink, &start, "expected identifier");
        }
        while self.at(TokenKind::DOT) && self.peek(1).kind == TokenKind::IDENTIFIER {
            self.bump();
            text.push('.');
            text.push_str(self.bump().text);
        }
        let end = self.cursor.index() as u32;
        let span = Span::new(start.span.start, self.cursor.reverse_peek(1).span.end);
        Name::new(begin, end, text, span)
    }

    /// `type = name { '[' ']' }`
    pub(crate) fn parse_type(&mut self, sink: &mut DiagnosticSink) -> Type {
        let is_const = self.eat_keyword("const").is_some();
        let name = self.parse_name(sink);
        let mut dims = 0;
        while self.at(TokenKind::LEFT_SQUARE_BRACKET) && self.peek(1).kind == TokenKind::RIGHT_SQUARE_BRACKET {
            self.bump();
            self.bump();
            dims += 1;
        }
        Type::new(name, is_const, dims)
    }

    // -- modifiers -------------------------------------------------------

    pub(crate) fn collect_modifiers(&mut self, sink: &mut DiagnosticSink) {
        loop {
            let flag = match self.current().text {
                "public" => ModFlags::PUBLIC,
                "protected" => ModFlags::PROTECTED,
                "private" => ModFlags::PRIVATE,
                "static" => ModFlags::STATIC,
                "const" => ModFlags::CONST,
                "extern" | "ext" => ModFlags::EXTERN,
                "binary" => ModFlags::BINARY,
                "explicit" => ModFlags::EXPLICIT,
                _ => break,
            };
            if !self.at(TokenKind::IDENTIFIER) {
                break;
            }
            let tok = self.bump();
            self.push_modifier(sink, flag, tok);
        }
    }

    fn push_modifier(&mut self, sink: &mut DiagnosticSink, flag: ModFlags, tok: Token<'src>) {
        let existing = self.pending_mods.iter().find(|(f, _)| *f == flag);
        if existing.is_some() {
            self.warn(sink, &tok, format!("redundant modifier '{}'", tok.text));
            return;
        }
        if flag.intersects(ModFlags::VISIBILITY) {
            if let Some((other, _)) = self
                .pending_mods
                .iter()
                .find(|(f, _)| f.intersects(ModFlags::VISIBILITY))
            {
                if *other != flag {
                    self.error(
                        sink,
                        &tok,
                        format!("conflicting visibility modifier '{}'", tok.text),
                    );
                    return;
                }
            }
        }
        self.pending_mods.push((flag, tok));
    }

    /// Consume the pending modifier list, validating each flag against
    /// `allowed` for this declaration kind (3.5, 4.3.1).
    pub(crate) fn take_modifiers(&mut self, sink: &mut DiagnosticSink, allowed: ModFlags) -> ModFlags {
        let mut mods = ModFlags::NONE;
        let pending: Vec<_> = self.pending_mods.drain(..).collect();
        for (flag, tok) in pending {
            if !allowed.contains(flag) {
                self.error(sink, &tok, format!("modifier '{}' is not allowed here", tok.text));
                continue;
            }
            mods = mods | flag;
        }
        mods
    }

    // -- top level ---------------------------------------------------

    pub(crate) fn parse_top_item(&mut self, sink: &mut DiagnosticSink) {
        if self.at_keyword("module") {
            self.parse_module_decl(sink);
            return;
        }
        if self.at_keyword("use") {
            let module = self.parse_use(sink);
            self.uses.push(module);
            self.implicit_use_count += 1;
            return;
        }
        self.collect_modifiers(sink);
        if self.at_keyword("class") {
            self.bump();
            self.parse_class(sink, None);
            return;
        }
        if self.cursor.is_eof() {
            return;
        }
        if self.at(TokenKind::IDENTIFIER) {
            self.parse_member_or_free_decl(sink, None);
            return;
        }
        let tok = self.current();
        self.error(sink, &tok, format!("unexpected token {}", describe(&tok)));
        self.bump();
    }

    fn parse_module_decl(&mut self, sink: &mut DiagnosticSink) {
        let kw = self.bump();
        let name = self.parse_name(sink);
        self.expect(TokenKind::SEMICOLON, sink);
        if self.module.is_some() {
            self.error(sink, &kw, "module already declared for this file");
            return;
        }
        self.module = Some(name);
    }

    fn parse_use(&mut self, sink: &mut DiagnosticSink) -> Module {
        self.bump();
        let name = self.parse_name(sink);
        self.expect(TokenKind::SEMICOLON, sink);
        name
    }

    /// Parses a class and appends it (and any nested member declarations)
    /// to `self.classes`. `enclosing_class` is the local index of the class
    /// this one is nested inside, or `None` at top level.
    pub(crate) fn parse_class(&mut self, sink: &mut DiagnosticSink, enclosing_class: Option<usize>) -> usize {
        let allowed = ModFlags::PUBLIC | ModFlags::PROTECTED | ModFlags::PRIVATE | ModFlags::STATIC;
        let mods = self.take_modifiers(sink, allowed);
        let name_tok = self.expect(TokenKind::IDENTIFIER, sink);
        let base_name = if self.at(TokenKind::COLON) {
            self.bump();
            Some(self.parse_name(sink))
        } else {
            None
        };

        let index = self.classes.len();
        self.classes.push(Class {
            name: name_tok.text.to_string(),
            name_span: name_tok.span,
            owner_module: self.module_name(),
            base_name,
            base_class: None,
            enclosing_class,
            mods,
            use_statements: Vec::new(),
            variables: Vec::new(),
            functions: Vec::new(),
            implicit_use_statements: self.implicit_use_count,
        });

        self.expect(TokenKind::LEFT_SCOPE_BRACKET, sink);
        while !self.at(TokenKind::RIGHT_SCOPE_BRACKET) && !self.cursor.is_eof() {
            self.parse_class_member(sink, index);
        }
        self.expect(TokenKind::RIGHT_SCOPE_BRACKET, sink);
        index
    }

    fn parse_class_member(&mut self, sink: &mut DiagnosticSink, class_index: usize) {
        if self.at_keyword("use") {
            let kw = self.bump();
            let name = self.parse_name(sink);
            self.expect(TokenKind::SEMICOLON, sink);
            if !self.classes[class_index].push_use(name.text.clone()) {
                self.warn(sink, &kw, "redundant 'use' statement");
            }
            return;
        }
        self.collect_modifiers(sink);
        if self.at_keyword("class") {
            self.bump();
            self.parse_class(sink, Some(class_index));
            return;
        }
        if self.at_keyword("constructor") {
            self.parse_constructor(sink, class_index);
            return;
        }
        if self.at_keyword("destructor") {
            self.parse_destructor(sink, class_index);
            return;
        }
        if self.at(TokenKind::IDENTIFIER) {
            self.parse_member_or_free_decl(sink, Some(class_index));
            return;
        }
        let tok = self.current();
        self.error(sink, &tok, format!("unexpected token in class body {}", describe(&tok)));
        self.bump();
    }

    fn parse_constructor(&mut self, sink: &mut DiagnosticSink, class_index: usize) {
        let allowed = ModFlags::PUBLIC | ModFlags::PROTECTED | ModFlags::PRIVATE | ModFlags::EXPLICIT;
        let mods = self.take_modifiers(sink, allowed);
        let kw = self.bump();
        let params = self.parse_param_list(sink);
        if mods.contains(ModFlags::EXPLICIT) && params.len() != 1 {
            self.warn(sink, &kw, "'explicit' is redundant on a constructor with this many parameters");
        }
        let body = self.parse_block_or_empty(sink);
        let owner_module = self.module_name();
        self.classes[class_index].functions.push(Function {
            name: "constructor".to_string(),
            name_span: kw.span,
            return_type: Type::new(Name::new(0, 0, "void", kw.span), false, 0),
            params,
            body,
            owner_module,
            owner_class: Some(class_index),
            mods,
            implicit_use_statements: self.implicit_use_count,
            is_constructor: true,
            is_destructor: false,
        });
    }

    fn parse_destructor(&mut self, sink: &mut DiagnosticSink, class_index: usize) {
        let allowed = ModFlags::PUBLIC | ModFlags::PROTECTED | ModFlags::PRIVATE;
        let mods = self.take_modifiers(sink, allowed);
        let kw = self.bump();
        self.expect(TokenKind::LEFT_BRACKET, sink);
        self.expect(TokenKind::RIGHT_BRACKET, sink);
        let body = self.parse_block_or_empty(sink);
        let owner_module = self.module_name();
        self.classes[class_index].functions.push(Function {
            name: "destructor".to_string(),
            name_span: kw.span,
            return_type: Type::new(Name::new(0, 0, "void", kw.span), false, 0),
            params: ParamList::new(),
            body,
            owner_module,
            owner_class: Some(class_index),
            mods,
            implicit_use_statements: self.implicit_use_count,
            is_constructor: false,
            is_destructor: true,
        });
    }

    /// `modifier* type ident var_or_fn`, at either module or class scope.
    fn parse_member_or_free_decl(&mut self, sink: &mut DiagnosticSink, class_index: Option<usize>) {
        let allowed = if class_index.is_some() {
            ModFlags::PUBLIC
                | ModFlags::PROTECTED
                | ModFlags::PRIVATE
                | ModFlags::STATIC
                | ModFlags::CONST
                | ModFlags::EXTERN
                | ModFlags::BINARY
        } else {
            ModFlags::STATIC | ModFlags::CONST | ModFlags::EXTERN
        };
        let mods = self.take_modifiers(sink, allowed);
        let ty = self.parse_type(sink);
        let name_tok = self.expect(TokenKind::IDENTIFIER, sink);

        if self.at(TokenKind::LEFT_BRACKET) {
            let params = self.parse_param_list(sink);
            let has_body = self.at(TokenKind::LEFT_SCOPE_BRACKET);
            if mods.contains(ModFlags::EXTERN) {
                if has_body {
                    self.error(sink, &name_tok, "extern function must not have a body");
                }
                self.expect(TokenKind::SEMICOLON, sink);
                self.finish_function(class_index, ty, name_tok, mods, params, Vec::new());
                return;
            }
            if !has_body {
                self.error(sink, &name_tok, "non-extern function must have a body");
                self.expect(TokenKind::SEMICOLON, sink);
                self.finish_function(class_index, ty, name_tok, mods, params, Vec::new());
                return;
            }
            let body = self.parse_block_or_empty(sink);
            self.finish_function(class_index, ty, name_tok, mods, params, body);
            return;
        }

        let init = if self.at(TokenKind::EQUALS) {
            self.bump();
            Some(self.parse_expression(sink, TokenKind::SEMICOLON))
        } else {
            None
        };
        self.expect(TokenKind::SEMICOLON, sink);
        let variable = Variable {
            ty,
            name: name_tok.text.to_string(),
            name_span: name_tok.span,
            init,
            owner_module: self.module_name(),
            owner_class: class_index,
            owner_function: None,
            implicit_use_statements: self.implicit_use_count,
        };
        match class_index {
            Some(idx) => self.classes[idx].variables.push(variable),
            None => self.variables.push(variable),
        }
    }

    fn finish_function(
        &mut self,
        class_index: Option<usize>,
        return_type: Type,
        name_tok: Token<'src>,
        mods: ModFlags,
        params: ParamList,
        body: Vec<StmtId>,
    ) {
        let func = Function {
            name: name_tok.text.to_string(),
            name_span: name_tok.span,
            return_type,
            params,
            body,
            owner_module: self.module_name(),
            owner_class: class_index,
            mods,
            implicit_use_statements: self.implicit_use_count,
            is_constructor: false,
            is_destructor: false,
        };
        match class_index {
            Some(idx) => self.classes[idx].functions.push(func),
            None => self.functions.push(func),
        }
    }

    fn parse_param_list(&mut self, sink: &mut DiagnosticSink) -> ParamList {
        self.expect(TokenKind::LEFT_BRACKET, sink);
        let mut params = ParamList::new();
        let mut index = 0;
        while !self.at(TokenKind::RIGHT_BRACKET) && !self.cursor.is_eof() {
            let ty = self.parse_type(sink);
            let name = if self.at(TokenKind::IDENTIFIER) {
                self.bump().text.to_string()
            } else {
                ParamList::synthetic_key(index)
            };
            let key = name.clone();
            params.push(
                key,
                Variable {
                    ty,
                    name,
                    name_span: self.cursor.reverse_peek(1).span,
                    init: None,
                    owner_module: self.module_name(),
                    owner_class: None,
                    owner_function: None,
                    implicit_use_statements: self.implicit_use_count,
                },
            );
            index += 1;
            if self.at(TokenKind::COMMA) {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RIGHT_BRACKET, sink);
        params
    }

    fn module_name(&self) -> String {
        self.module.as_ref().map(|m| m.text.clone()).unwrap_or_default()
    }

    // -- statements ----------------------------------------------------

    fn parse_block_or_empty(&mut self, sink: &mut DiagnosticSink) -> Vec<StmtId> {
        if self.at(TokenKind::LEFT_SCOPE_BRACKET) {
            self.parse_block(sink)
        } else {
            self.error(sink, &self.current(), "expected block");
            Vec::new()
        }
    }

    fn parse_block(&mut self, sink: &mut DiagnosticSink) -> Vec<StmtId> {
        self.expect(TokenKind::LEFT_SCOPE_BRACKET, sink);
        let mut stmts = Vec::new();
        while !self.at(TokenKind::RIGHT_SCOPE_BRACKET) && !self.cursor.is_eof() {
            stmts.push(self.parse_statement(sink));
        }
        self.expect(TokenKind::RIGHT_SCOPE_BRACKET, sink);
        stmts
    }

    pub(crate) fn parse_statement(&mut self, sink: &mut DiagnosticSink) -> StmtId {
        let start_span = self.current().span;
        if self.at(TokenKind::LEFT_SCOPE_BRACKET) {
            let body = self.parse_block(sink);
            return self.stmts.alloc(StmtKind::Block { body }, start_span);
        }
        if self.at_keyword("use") {
            self.bump();
            let module = self.parse_name(sink);
            self.expect(TokenKind::SEMICOLON, sink);
            return self.stmts.alloc(StmtKind::Use { module }, start_span);
        }
        if self.at_keyword("if") {
            return self.parse_if(sink);
        }
        if self.at_keyword("else") {
            let tok = self.bump();
            self.error(sink, &tok, "'else' with no preceding 'if'");
            let body = self.parse_single_or_block(sink);
            return self.stmts.alloc(StmtKind::Else { body }, start_span);
        }
        if self.at_keyword("while") {
            return self.parse_while(sink);
        }
        if self.at_keyword("for") {
            return self.parse_for(sink);
        }
        if self.at_keyword("return") {
            self.bump();
            let value = if self.at(TokenKind::SEMICOLON) {
                None
            } else {
                Some(self.parse_expression(sink, TokenKind::SEMICOLON))
            };
            self.expect(TokenKind::SEMICOLON, sink);
            return self.stmts.alloc(StmtKind::Return { value }, start_span);
        }
        if self.at_keyword("continue") {
            self.bump();
            self.expect(TokenKind::SEMICOLON, sink);
            return self.stmts.alloc(StmtKind::Continue { target: None }, start_span);
        }
        if self.at_keyword("break") {
            self.bump();
            self.expect(TokenKind::SEMICOLON, sink);
            return self.stmts.alloc(StmtKind::Break { target: None }, start_span);
        }
        self.parse_decl_or_expr_statement(sink, start_span)
    }

    fn parse_single_or_block(&mut self, sink: &mut DiagnosticSink) -> StmtId {
        if self.at(TokenKind::LEFT_SCOPE_BRACKET) {
            let span = self.current().span;
            let body = self.parse_block(sink);
            self.stmts.alloc(StmtKind::Block { body }, span)
        } else {
            self.parse_statement(sink)
        }
    }

    fn parse_if(&mut self, sink: &mut DiagnosticSink) -> StmtId {
        let span = self.bump().span; // 'if'
        self.expect(TokenKind::LEFT_BRACKET, sink);
        let condition = self.parse_expression(sink, TokenKind::RIGHT_BRACKET);
        self.expect(TokenKind::RIGHT_BRACKET, sink);
        let then_branch = self.parse_single_or_block(sink);
        let else_branch = if self.at_keyword("else") {
            self.bump();
            let else_span = self.current().span;
            let body = self.parse_single_or_block(sink);
            Some(self.stmts.alloc(StmtKind::Else { body }, else_span))
        } else {
            None
        };
        self.stmts.alloc(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span,
        )
    }

    fn parse_while(&mut self, sink: &mut DiagnosticSink) -> StmtId {
        let span = self.bump().span;
        self.expect(TokenKind::LEFT_BRACKET, sink);
        let condition = self.parse_expression(sink, TokenKind::RIGHT_BRACKET);
        self.expect(TokenKind::RIGHT_BRACKET, sink);
        let body = self.parse_single_or_block(sink);
        self.stmts.alloc(StmtKind::While { condition, body }, span)
    }

    fn parse_for(&mut self, sink: &mut DiagnosticSink) -> StmtId {
        let span = self.bump().span;
        self.expect(TokenKind::LEFT_BRACKET, sink);
        let init = if self.at(TokenKind::SEMICOLON) {
            self.bump();
            None
        } else {
            let s = self.parse_decl_or_expr_statement(sink, self.current().span);
            Some(s)
        };
        let condition = if self.at(TokenKind::SEMICOLON) {
            None
        } else {
            Some(self.parse_expression(sink, TokenKind::SEMICOLON))
        };
        self.expect(TokenKind::SEMICOLON, sink);
        let increment = if self.at(TokenKind::RIGHT_BRACKET) {
            None
        } else {
            Some(self.parse_expression(sink, TokenKind::RIGHT_BRACKET))
        };
        self.expect(TokenKind::RIGHT_BRACKET, sink);
        let body = self.parse_single_or_block(sink);
        self.stmts.alloc(
            StmtKind::For {
                init,
                condition,
                increment,
                body,
            },
            span,
        )
    }

    /// Disambiguates `Type name = ...;`/`Type name;` from an expression
    /// statement by speculatively parsing a type, mirroring mark/rollback
    /// on both the token cursor and the diagnostic sink (4.3.2).
    fn parse_decl_or_expr_statement(&mut self, sink: &mut DiagnosticSink, span: Span) -> StmtId {
        if self.at(TokenKind::IDENTIFIER) {
            self.cursor.mark();
            sink.mark();
            let _ty = self.parse_type(sink);
            if self.at(TokenKind::IDENTIFIER) {
                self.cursor.rollback();
                sink.rollback();
                return self.parse_variable_decl_statement(sink, span);
            }
            self.cursor.rollback();
            sink.rollback();
        }
        let expr = self.parse_expression(sink, TokenKind::SEMICOLON);
        self.expect(TokenKind::SEMICOLON, sink);
        self.stmts.alloc(StmtKind::Expression { expr }, span)
    }

    fn parse_variable_decl_statement(&mut self, sink: &mut DiagnosticSink, span: Span) -> StmtId {
        let ty = self.parse_type(sink);
        let name_tok = self.expect(TokenKind::IDENTIFIER, sink);
        let init = if self.at(TokenKind::EQUALS) {
            self.bump();
            Some(self.parse_expression(sink, TokenKind::SEMICOLON))
        } else {
            None
        };
        self.expect(TokenKind::SEMICOLON, sink);
        let variable = Variable {
            ty,
            name: name_tok.text.to_string(),
            name_span: name_tok.span,
            init,
            owner_module: self.module_name(),
            owner_class: None,
            owner_function: None,
            implicit_use_statements: self.implicit_use_count,
        };
        let index = self.variables.len();
        self.variables.push(variable);
        self.stmts.alloc(StmtKind::VariableDecl { variable: index }, span)
    }
}

fn describe(tok: &Token<'_>) -> String {
    if tok.is_null() {
        "end of file".to_string()
    } else {
        format!("'{}'", tok.text)
    }
}

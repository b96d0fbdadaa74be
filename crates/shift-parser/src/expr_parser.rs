//! The precedence-climbing expression parser (4.3.3): a second `impl Parser`
//! block kept in its own file since it is, on its own, the single hardest
//! piece of this crate.
//!
//! Unlike a textbook Pratt parser that recurses, this walks a single flat
//! token range while maintaining one "current insertion point" (`hole`) and
//! reaching up through parent back-pointers to find where a newly-seen
//! operator belongs. The tree shape this produces, and the associativity
//! rules encoded in `is_right_associative_use`, mirror the source
//! language's own `operator_priority`/insertion routine -- ported to a
//! signed priority so bare `=` (whose priority is defined as
//! `priority_of(NULL_TOKEN) - BASE`, i.e. negative) sorts as the loosest
//! operator instead of wrapping around to the tightest one.

use shift_common::{DiagnosticSink, Span, TokenKind};

use crate::ast::ExprId;
use crate::parser::Parser;

const BASE: i32 = 16;
const PREFIX: i32 = 100;

fn is_strictly_prefix_only(kind: TokenKind) -> bool {
    kind == TokenKind::NOT || kind == TokenKind::FLIP_BITS
}

/// `-`, `+`, `++`, `--` are ambiguous: the same token kind is used whether
/// the parser sees them as a prefix or a binary/suffix operator. We tell
/// them apart the same way the source language does: a node created via the
/// prefix branch always has an empty (`NULL_TOKEN`) first child; one
/// created via the binary/suffix branch always has a real node there.
fn is_ambiguous_prefix_candidate(kind: TokenKind) -> bool {
    kind == TokenKind::MINUS || kind == TokenKind::PLUS || kind == TokenKind::PLUS_PLUS || kind == TokenKind::MINUS_MINUS
}

fn priority_of(kind: TokenKind, prefix: bool) -> i32 {
    use TokenKind as K;
    if kind == K::AND || kind == K::OR || kind == K::XOR || kind == K::SHIFT_LEFT || kind == K::SHIFT_RIGHT {
        return BASE + 2;
    }
    if kind == K::AND_AND || kind == K::OR_OR {
        return BASE + 3;
    }
    if kind == K::GREATER_THAN
        || kind == K::LESS_THAN
        || kind == K::GREATER_THAN_OR_EQUAL
        || kind == K::LESS_THAN_OR_EQUAL
        || kind == K::EQUALS_EQUALS
        || kind == K::NOT_EQUAL
    {
        return BASE + 4;
    }
    if kind == K::PLUS || kind == K::MINUS {
        return BASE + if prefix { PREFIX } else { 5 };
    }
    if kind == K::MULTIPLY || kind == K::DIVIDE || kind == K::MODULO {
        return BASE + 6;
    }
    if kind == K::PLUS_PLUS || kind == K::MINUS_MINUS {
        return BASE + if prefix { PREFIX } else { 7 };
    }
    if is_strictly_prefix_only(kind) {
        return BASE + PREFIX;
    }
    if kind == K::LEFT_BRACKET || kind == K::LEFT_SQUARE_BRACKET || kind == K::IDENTIFIER {
        return BASE + PREFIX + 1;
    }
    if kind.has_equals() {
        return priority_of(kind.strip_equals(), false) - BASE;
    }
    0
}

fn is_binary_operator(kind: TokenKind) -> bool {
    use TokenKind as K;
    matches!(
        kind,
        K::AND
            | K::OR
            | K::XOR
            | K::SHIFT_LEFT
            | K::SHIFT_RIGHT
            | K::AND_AND
            | K::OR_OR
            | K::GREATER_THAN
            | K::LESS_THAN
            | K::GREATER_THAN_OR_EQUAL
            | K::LESS_THAN_OR_EQUAL
            | K::EQUALS_EQUALS
            | K::NOT_EQUAL
            | K::PLUS
            | K::MINUS
            | K::MULTIPLY
            | K::DIVIDE
            | K::MODULO
    ) || kind.has_equals()
}

fn is_unary_operator(kind: TokenKind) -> bool {
    use TokenKind as K;
    matches!(kind, K::NOT | K::FLIP_BITS | K::PLUS | K::MINUS | K::PLUS_PLUS | K::MINUS_MINUS)
}

impl<'src> Parser<'src> {
    /// Parses a full expression up to (but not consuming) `terminator`.
    pub(crate) fn parse_expression(&mut self, sink: &mut DiagnosticSink, terminator: TokenKind) -> ExprId {
        let start_span = self.current().span;
        let root = self.exprs.alloc_empty(start_span);
        let mut result_root = root;
        let mut hole = root;
        let mut comma_root: Option<ExprId> = None;

        loop {
            let tok = self.current();
            if tok.is_null() || tok.kind == terminator {
                break;
            }

            if tok.kind == TokenKind::COMMA {
                if self.exprs.get(hole).is_null() {
                    self.error(sink, &tok, "unexpected ',' inside expression");
                }
                self.bump();
                match comma_root {
                    Some(comma) => {
                        let fresh = self.exprs.alloc_empty(tok.span);
                        self.exprs.push_child(comma, fresh);
                        hole = fresh;
                    }
                    None => {
                        let comma = self.wrap_current(result_root, TokenKind::COMMA, ",", tok.span);
                        let fresh = self.exprs.alloc_empty(tok.span);
                        self.exprs.push_child(comma, fresh);
                        comma_root = Some(comma);
                        result_root = comma;
                        hole = fresh;
                    }
                }
                continue;
            }

            if tok.kind == TokenKind::LEFT_BRACKET {
                if !self.exprs.get(hole).is_null() && !self.exprs.get(hole).is_bracket() {
                    self.error(sink, &tok, "unexpected '(' inside expression");
                }
                self.bump();
                let inner = self.parse_expression(sink, TokenKind::RIGHT_BRACKET);
                self.exprs.get_mut(hole).kind = TokenKind::LEFT_BRACKET;
                self.exprs.get_mut(hole).span = tok.span;
                self.exprs.push_child(hole, inner);
                if self.at(TokenKind::RIGHT_BRACKET) {
                    self.bump();
                } else {
                    let cur = self.current();
                    self.error(sink, &cur, "expected ')' before end of file");
                }
                continue;
            }

            if tok.is_null() {
                break;
            }

            if tok.kind.is_number() || tok.kind == TokenKind::STRING_LITERAL || tok.kind == TokenKind::CHAR_LITERAL {
                if !self.exprs.get(hole).is_null() {
                    let kind_name = if tok.kind.is_number() {
                        "number"
                    } else if tok.kind == TokenKind::STRING_LITERAL {
                        "string"
                    } else {
                        "char"
                    };
                    self.error(sink, &tok, format!("unexpected {kind_name} literal in expression"));
                }
                self.bump();
                let node = self.exprs.get_mut(hole);
                node.kind = tok.kind;
                node.text = tok.text.to_string();
                node.span = tok.span;
                continue;
            }

            if tok.kind == TokenKind::IDENTIFIER {
                self.parse_identifier_operand(sink, hole);
                continue;
            }

            if tok.is_keyword("new") {
                self.parse_new_operand(sink, hole);
                continue;
            }

            if is_binary_operator(tok.kind) || is_unary_operator(tok.kind) {
                self.parse_operator(sink, &mut result_root, &mut hole, &mut comma_root, tok);
                continue;
            }

            let cur = self.current();
            self.error(sink, &cur, format!("unexpected token {} in expression", cur.kind));
            self.bump();
        }

        result_root
    }

    fn parse_identifier_operand(&mut self, sink: &mut DiagnosticSink, hole: ExprId) {
        if !self.exprs.get(hole).is_null() {
            let tok = self.current();
            self.error(sink, &tok, "unexpected identifier in expression");
        }
        let name = self.parse_name(sink);
        {
            let node = self.exprs.get_mut(hole);
            node.kind = TokenKind::IDENTIFIER;
            node.text = name.text.clone();
            node.span = name.span;
        }
        if self.at(TokenKind::LEFT_BRACKET) {
            let args = self.parse_arg_list(sink);
            let node = self.exprs.get_mut(hole);
            node.kind = TokenKind::LEFT_SCOPE_BRACKET;
            self.exprs.set_children(hole, args);
            return;
        }
        let mut indices = Vec::new();
        while self.at(TokenKind::LEFT_SQUARE_BRACKET) {
            self.bump();
            let idx = self.parse_expression(sink, TokenKind::RIGHT_SQUARE_BRACKET);
            if self.at(TokenKind::RIGHT_SQUARE_BRACKET) {
                self.bump();
            } else {
                let cur = self.current();
                self.error(sink, &cur, "expected ']' in array index");
            }
            indices.push(idx);
        }
        if !indices.is_empty() {
            self.exprs.get_mut(hole).kind = TokenKind::LEFT_SQUARE_BRACKET;
            self.exprs.set_children(hole, indices);
        }
    }

    /// `new` consumes the following expression, which must resolve to a
    /// call or an array form (4.3.3 operand recognition).
    fn parse_new_operand(&mut self, sink: &mut DiagnosticSink, hole: ExprId) {
        let kw = self.bump();
        if !self.exprs.get(hole).is_null() {
            self.error(sink, &kw, "unexpected 'new' in expression");
        }
        let inner_hole = self.exprs.alloc_empty(kw.span);
        self.parse_identifier_operand(sink, inner_hole);
        let inner = self.exprs.get(inner_hole);
        if !inner.is_function_call() && !inner.is_array() {
            self.error(sink, &kw, "'new' must be followed by a call or array form");
        }
        let node = self.exprs.get_mut(hole);
        node.kind = TokenKind::IDENTIFIER;
        node.text = "new".to_string();
        node.span = kw.span;
        self.exprs.set_children(hole, vec![inner_hole]);
    }

    fn parse_arg_list(&mut self, sink: &mut DiagnosticSink) -> Vec<ExprId> {
        self.expect(TokenKind::LEFT_BRACKET, sink);
        let mut args = Vec::new();
        while !self.at(TokenKind::RIGHT_BRACKET) && !self.cursor.is_eof() {
            args.push(self.parse_expression(sink, TokenKind::RIGHT_BRACKET));
            if self.at(TokenKind::COMMA) {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RIGHT_BRACKET, sink);
        args
    }

    fn node_used_as_prefix(&self, id: ExprId) -> bool {
        let node = self.exprs.get(id);
        if is_strictly_prefix_only(node.kind) {
            return true;
        }
        if is_ambiguous_prefix_candidate(node.kind) {
            return node.children.first().map(|&c| self.exprs.get(c).is_null()).unwrap_or(true);
        }
        false
    }

    fn is_right_associative_use(&self, id: ExprId) -> bool {
        let kind = self.exprs.get(id).kind;
        self.node_used_as_prefix(id) || kind.has_equals()
    }

    /// Rehomes `old` under a freshly allocated node of kind `new_kind`,
    /// taking over whatever parent slot `old` used to occupy. Returns the
    /// new node's id, which callers use as the new "current top" in place
    /// of `old`.
    fn wrap_current(&mut self, old: ExprId, new_kind: TokenKind, text: impl Into<String>, span: Span) -> ExprId {
        let new_id = self.exprs.alloc(new_kind, text, span);
        if let Some(parent) = self.exprs.parent_of(old) {
            let idx = self
                .exprs
                .get(parent)
                .children
                .iter()
                .position(|&c| c == old)
                .expect("old must be a child of its own parent");
            self.exprs.get_mut(parent).children[idx] = new_id;
            self.exprs.get_mut(new_id).parent = Some(parent);
        }
        self.exprs.push_child(new_id, old);
        new_id
    }

    fn parse_operator(
        &mut self,
        sink: &mut DiagnosticSink,
        result_root: &mut ExprId,
        hole: &mut ExprId,
        comma_root: &mut Option<ExprId>,
        tok: shift_common::Token<'src>,
    ) {
        let is_binary = is_binary_operator(tok.kind);
        let hole_is_empty = self.exprs.get(*hole).is_null();

        if is_binary {
            // unary-overloadable operators (+ - ++ --) are allowed with no
            // LHS (prefix use); pure binary operators are not.
            let prefix_capable = is_ambiguous_prefix_candidate(tok.kind);
            if hole_is_empty && !prefix_capable {
                self.error(sink, &tok, format!("unexpected operator '{}' inside expression", tok.text));
            }
        } else if hole_is_empty {
            // unary-only operator used with no LHS: fine, this is prefix use.
        } else if is_strictly_prefix_only(tok.kind) {
            self.error(sink, &tok, format!("unexpected operator '{}' inside expression", tok.text));
        }

        self.bump();
        let this_is_prefix = hole_is_empty && (is_ambiguous_prefix_candidate(tok.kind) || is_strictly_prefix_only(tok.kind));
        let priority = priority_of(tok.kind, this_is_prefix);

        // Genuine suffix `++`/`--` take only the operand to their left and
        // never open a slot for anything further: the node itself (already
        // complete) becomes the next insertion point, instead of leaving a
        // dangling empty hole that would wrongly read as "no operand yet"
        // to whatever operator comes next.
        let is_suffix_only = !this_is_prefix && (tok.kind == TokenKind::PLUS_PLUS || tok.kind == TokenKind::MINUS_MINUS);
        let new_hole = if is_suffix_only { None } else { Some(self.exprs.alloc_empty(tok.span)) };

        // `*hole` itself plays the role of the new operator's left child in
        // both cases: already-filled (binary/suffix combines with it) or
        // still empty (prefix leaves a NULL_TOKEN placeholder there, which
        // is how `node_used_as_prefix` recognizes this use later).
        let mut current_parent = self.exprs.parent_of(*hole);
        let mut spliced = false;
        while let Some(parent) = current_parent {
            if self.exprs.get(parent).kind == TokenKind::COMMA {
                current_parent = None;
                break;
            }
            let parent_is_prefix = self.node_used_as_prefix(parent);
            let parent_priority = priority_of(self.exprs.get(parent).kind, parent_is_prefix);
            let right_assoc = self.is_right_associative_use(parent);
            if priority > parent_priority || (right_assoc && priority == parent_priority) {
                let new_op = self.exprs.alloc(tok.kind, tok.text, tok.span);
                let old_right = *self
                    .exprs
                    .get(parent)
                    .children
                    .last()
                    .expect("operator ancestor must have a right child");
                let idx = self.exprs.get(parent).children.len() - 1;
                self.exprs.get_mut(parent).children[idx] = new_op;
                self.exprs.get_mut(new_op).parent = Some(parent);
                self.exprs.push_child(new_op, old_right);
                match new_hole {
                    Some(h) => {
                        self.exprs.push_child(new_op, h);
                        *hole = h;
                    }
                    None => *hole = new_op,
                }
                spliced = true;
                break;
            }
            current_parent = self.exprs.parent_of(parent);
        }

        if !spliced {
            // climbed all the way to the top: the new operator becomes the
            // new root (or the new last element of an active comma list),
            // taking the whole prior tree as its left child.
            let new_op = self.exprs.alloc(tok.kind, tok.text, tok.span);
            match *comma_root {
                Some(comma) => {
                    let idx = self.exprs.get(comma).children.len() - 1;
                    let top = self.exprs.get(comma).children[idx];
                    self.exprs.get_mut(comma).children[idx] = new_op;
                    self.exprs.get_mut(new_op).parent = Some(comma);
                    self.exprs.push_child(new_op, top);
                }
                None => {
                    self.exprs.push_child(new_op, *result_root);
                    *result_root = new_op;
                }
            }
            match new_hole {
                Some(h) => {
                    self.exprs.push_child(new_op, h);
                    *hole = h;
                }
                None => *hole = new_op,
            }
        }
    }
}

//! The AST node types produced by [`crate::parser::Parser`].
//!
//! Expressions live in a single arena ([`ExprArena`]) addressed by
//! [`ExprId`], and statements live in a second arena ([`StmtArena`])
//! addressed by [`StmtId`]. Both are backed by a plain `Vec`: nodes are
//! never removed or reordered once pushed, so indices stay stable for the
//! lifetime of the parsed file -- this is the arena the expression
//! precedence climber rewrites in place, and the indices `break`/`continue`
//! statements use to link back to their enclosing loop.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::{BitAnd, BitOr, BitXor, Not};

use shift_common::{Span, TokenKind};

/// `[begin, end)` token-index range naming a (possibly dotted) identifier
/// path. Equality and hashing are defined on the reconstructed dotted text,
/// not on the index range.
#[derive(Debug, Clone)]
pub struct Name {
    pub begin: u32,
    pub end: u32,
    pub text: String,
    pub span: Span,
}

impl Name {
    pub fn new(begin: u32, end: u32, text: impl Into<String>, span: Span) -> Self {
        debug_assert!(end >= begin, "name range end ({end}) must be >= begin ({begin})");
        Self {
            begin,
            end,
            text: text.into(),
            span,
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.text.split('.')
    }

    pub fn last_segment(&self) -> &str {
        self.text.rsplit('.').next().unwrap_or(&self.text)
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}
impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

/// A module identifier; structurally just a [`Name`].
pub type Module = Name;

/// Declaration-visibility and storage modifiers. A bit field, matching the
/// source language's own mutually-exclusive-visibility rule (invariant 5):
/// `PUBLIC`/`PROTECTED`/`PRIVATE` may not combine with each other but do
/// combine freely with `STATIC`/`CONST`/`EXTERN`/`BINARY`/`EXPLICIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModFlags(pub u8);

impl ModFlags {
    pub const NONE: ModFlags = ModFlags(0);
    pub const PUBLIC: ModFlags = ModFlags(0x1);
    pub const PROTECTED: ModFlags = ModFlags(0x2);
    pub const PRIVATE: ModFlags = ModFlags(0x4);
    pub const STATIC: ModFlags = ModFlags(0x8);
    pub const CONST: ModFlags = ModFlags(0x10);
    pub const BINARY: ModFlags = ModFlags(0x20);
    pub const EXTERN: ModFlags = ModFlags(0x40);
    pub const EXPLICIT: ModFlags = ModFlags(0x80);

    pub const VISIBILITY: ModFlags = ModFlags(Self::PUBLIC.0 | Self::PROTECTED.0 | Self::PRIVATE.0);

    pub fn contains(self, other: ModFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: ModFlags) -> bool {
        self.0 & other.0 != 0
    }

    pub fn visibility(self) -> ModFlags {
        self & Self::VISIBILITY
    }
}

impl BitOr for ModFlags {
    type Output = ModFlags;
    fn bitor(self, rhs: Self) -> Self {
        ModFlags(self.0 | rhs.0)
    }
}
impl BitAnd for ModFlags {
    type Output = ModFlags;
    fn bitand(self, rhs: Self) -> Self {
        ModFlags(self.0 & rhs.0)
    }
}
impl BitXor for ModFlags {
    type Output = ModFlags;
    fn bitxor(self, rhs: Self) -> Self {
        ModFlags(self.0 ^ rhs.0)
    }
}
impl Not for ModFlags {
    type Output = ModFlags;
    fn not(self) -> Self {
        ModFlags(!self.0)
    }
}

/// A type reference: a dotted [`Name`] plus `const`-ness, array dimensions,
/// and (after the analyzer runs) the resolved class it names.
#[derive(Debug, Clone)]
pub struct Type {
    pub name: Name,
    pub is_const: bool,
    pub array_dims: u32,
    pub resolved_class: Option<usize>,
}

impl Type {
    pub fn new(name: Name, is_const: bool, array_dims: u32) -> Self {
        Self {
            name,
            is_const,
            array_dims,
            resolved_class: None,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.resolved_class == other.resolved_class && self.array_dims == other.array_dims
    }
}

/// Index into an [`ExprArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(pub usize);

/// One node of an expression tree. `kind` doubles as the discriminant the
/// precedence climber inserts by (see [`crate::parser::expressions`]):
/// operators carry up to two children, literals and identifiers carry none,
/// and `LEFT_SCOPE_BRACKET`/`LEFT_SQUARE_BRACKET` are repurposed as
/// "function call" and "array index" node kinds.
#[derive(Debug, Clone)]
pub struct ExprNode {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    pub parent: Option<ExprId>,
    pub children: Vec<ExprId>,
    pub resolved_type: Option<Type>,
    pub resolved_variable: Option<usize>,
    pub resolved_function: Option<usize>,
    pub resolved_class: Option<usize>,
}

impl ExprNode {
    fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            parent: None,
            children: Vec::new(),
            resolved_type: None,
            resolved_variable: None,
            resolved_function: None,
            resolved_class: None,
        }
    }

    pub fn is_bracket(&self) -> bool {
        self.kind == TokenKind::LEFT_BRACKET
    }
    pub fn is_function_call(&self) -> bool {
        self.kind == TokenKind::LEFT_SCOPE_BRACKET
    }
    pub fn is_array(&self) -> bool {
        self.kind == TokenKind::LEFT_SQUARE_BRACKET
    }
    pub fn is_null(&self) -> bool {
        self.kind == TokenKind::NULL_TOKEN
    }
}

/// Owns every expression node parsed for one file. Parent links and tree
/// rewrites are index operations into `nodes`; nothing here ever
/// reallocates a node out from under a live `ExprId`.
#[derive(Debug, Default, Clone)]
pub struct ExprArena {
    nodes: Vec<ExprNode>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the canonical "empty" placeholder node (invariant 9): never a
    /// final parse result for a non-empty statement, only ever a scratch
    /// insertion point the precedence climber fills in.
    pub fn alloc_empty(&mut self, span: Span) -> ExprId {
        self.alloc(TokenKind::NULL_TOKEN, "", span)
    }

    pub fn alloc(&mut self, kind: TokenKind, text: impl Into<String>, span: Span) -> ExprId {
        let id = ExprId(self.nodes.len());
        self.nodes.push(ExprNode::new(kind, text, span));
        id
    }

    pub fn get(&self, id: ExprId) -> &ExprNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: ExprId) -> &mut ExprNode {
        &mut self.nodes[id.0]
    }

    pub fn parent_of(&self, id: ExprId) -> Option<ExprId> {
        self.nodes[id.0].parent
    }

    /// Append `child` to `parent`'s child list and set `child`'s parent
    /// link, preserving invariant 2 of the universal testable properties
    /// (`e.children[i].parent == e`).
    pub fn push_child(&mut self, parent: ExprId, child: ExprId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Replace `parent`'s entire child list with `children`, fixing up
    /// every new child's parent link. Used by the precedence climber when
    /// it detaches a subtree and re-attaches it lower in the tree.
    pub fn set_children(&mut self, parent: ExprId, children: Vec<ExprId>) {
        for &child in &children {
            self.nodes[child.0].parent = Some(parent);
        }
        self.nodes[parent.0].children = children;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Index into a [`StmtArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StmtId(pub usize);

#[derive(Debug, Clone)]
pub enum StmtKind {
    Expression {
        expr: ExprId,
    },
    VariableDecl {
        variable: usize,
    },
    Block {
        body: Vec<StmtId>,
    },
    Use {
        module: Module,
    },
    If {
        condition: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    Else {
        body: StmtId,
    },
    While {
        condition: ExprId,
        body: StmtId,
    },
    For {
        init: Option<StmtId>,
        condition: Option<ExprId>,
        increment: Option<ExprId>,
        body: StmtId,
    },
    Return {
        value: Option<ExprId>,
    },
    Continue {
        target: Option<StmtId>,
    },
    Break {
        target: Option<StmtId>,
    },
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Default, Clone)]
pub struct StmtArena {
    nodes: Vec<Stmt>,
}

impl StmtArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, kind: StmtKind, span: Span) -> StmtId {
        let id = StmtId(self.nodes.len());
        self.nodes.push(Stmt { kind, span });
        id
    }

    pub fn get(&self, id: StmtId) -> &Stmt {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: StmtId) -> &mut Stmt {
        &mut self.nodes[id.0]
    }
}

/// A function parameter or local/member/global variable.
#[derive(Debug, Clone)]
pub struct Variable {
    pub ty: Type,
    pub name: String,
    pub name_span: Span,
    pub init: Option<ExprId>,
    pub owner_module: String,
    pub owner_class: Option<usize>,
    pub owner_function: Option<usize>,
    pub implicit_use_statements: usize,
}


/// Insertion-ordered parameter map. Unnamed parameters (none occur in the
/// concrete grammar today, but the model supports them per the original
/// source) receive synthetic keys `@0`, `@1`, ... from `synthetic_key`.
#[derive(Debug, Clone, Default)]
pub struct ParamList {
    entries: Vec<(String, Variable)>,
}

impl ParamList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn synthetic_key(index: usize) -> String {
        format!("@{index}")
    }

    pub fn push(&mut self, key: String, variable: Variable) {
        self.entries.push((key, variable));
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Variable)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&Variable> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Mutable access by insertion-order index, for the analyzer's
    /// post-parse resolution pass (it walks params positionally, not by key).
    pub fn get_index_mut(&mut self, index: usize) -> &mut Variable {
        &mut self.entries[index].1
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.iter().any(|(_, v)| v.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub name_span: Span,
    pub return_type: Type,
    pub params: ParamList,
    pub body: Vec<StmtId>,
    pub owner_module: String,
    pub owner_class: Option<usize>,
    pub mods: ModFlags,
    pub implicit_use_statements: usize,
    pub is_constructor: bool,
    pub is_destructor: bool,
}

impl Function {
    /// `fqn@i`, the overload-disambiguation key (see the GLOSSARY).
    pub fn overload_key(fqn: &str, index: usize) -> String {
        format!("{fqn}@{index}")
    }

    pub fn signature_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.name.hash(&mut hasher);
        for (_, param) in self.params.iter() {
            param.ty.name.text.hash(&mut hasher);
            param.ty.array_dims.hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[derive(Debug, Clone)]
pub struct Class {
    pub name: String,
    pub name_span: Span,
    pub owner_module: String,
    /// The `: Base` clause, if any -- inheritance, not nesting.
    pub base_name: Option<Name>,
    /// Global class id of the resolved base class, filled by the analyzer.
    pub base_class: Option<usize>,
    /// Index (local to this file's `classes` vec) of the class this one is
    /// nested inside, if it was declared as a class-body member rather than
    /// a top-level item.
    pub enclosing_class: Option<usize>,
    pub mods: ModFlags,
    /// Insertion-ordered, duplicate-suppressed `use` modules declared
    /// inside the class body.
    pub use_statements: Vec<String>,
    pub variables: Vec<Variable>,
    pub functions: Vec<Function>,
    pub implicit_use_statements: usize,
}

impl Class {
    pub fn fqn(&self) -> String {
        format!("{}.{}", self.owner_module, self.name)
    }

    pub fn push_use(&mut self, module: String) -> bool {
        if self.use_statements.contains(&module) {
            false
        } else {
            self.use_statements.push(module);
            true
        }
    }
}

/// The parse result for one source file: its (optional) module
/// declaration, file-level `use` imports, and top-level declarations.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: String,
    pub module: Option<Module>,
    pub uses: Vec<Module>,
    pub classes: Vec<Class>,
    pub functions: Vec<Function>,
    pub variables: Vec<Variable>,
    pub exprs: ExprArena,
    pub stmts: StmtArena,
}

impl ParsedFile {
    pub fn module_name(&self) -> &str {
        self.module.as_ref().map(|m| m.text.as_str()).unwrap_or("")
    }
}

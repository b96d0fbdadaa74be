//! The lookup algorithm (4.4.2, 4.4.3): given the declaration site a name
//! occurs at, collect every class/variable/function that name could mean,
//! in priority order, with duplicates suppressed by identity.
//!
//! The source models a `Scope` as a literal chain of frames
//! `(parent, parser, class?, function?, variable?, analyzer-base)`, where
//! resolving a name at an inner frame recurses into its parent and merges
//! the parent's candidates at the end. Shift's only real frame nesting is
//! class-within-class (there is no block-scoped `use`), so this
//! implementation flattens that recursion into one pass that walks the
//! `enclosing_class` chain directly instead of building a chain of boxed
//! `Scope` frame objects -- the visible behavior (nearer `use` sets
//! outrank farther ones, first-seen wins on duplicates) is identical.

use shift_parser::ParsedFile;

use crate::tables::{self, GlobalTables};

/// The declaration site a lookup is performed on behalf of: which file,
/// which (possibly nested) class it sits in, which `use` statements were
/// visible to it at the point it was declared, and its module.
pub struct Scope<'a> {
    tables: &'a GlobalTables,
    files: &'a [ParsedFile],
    file_index: usize,
    /// Global class ids from innermost to outermost, or empty at file scope.
    class_chain: Vec<usize>,
    current_module: String,
    implicit_use_statements: usize,
    /// Whether the declaration this scope was built for sits in a `static`
    /// member context. `this`/`base` never resolve when set (4.4.2).
    is_static: bool,
}

impl<'a> Scope<'a> {
    /// Scope for a declaration made directly inside `class_index` of
    /// `file_index` (a field, method, or nested class), recorded with the
    /// `implicit_use_statements` count captured at that declaration's
    /// parse time. `is_static` is the enclosing member's own
    /// `ModFlags::STATIC` bit, not this scope's class -- it governs whether
    /// `this`/`base` resolve from inside that member's own signature/body.
    pub fn for_class_member(tables: &'a GlobalTables, files: &'a [ParsedFile], file_index: usize, class_index: usize, implicit_use_statements: usize, is_static: bool) -> Self {
        Self {
            tables,
            files,
            file_index,
            class_chain: tables::class_chain(tables, files, file_index, class_index),
            current_module: files[file_index].module_name().to_string(),
            implicit_use_statements,
            is_static,
        }
    }

    /// Scope for a top-level (module-scope, not inside any class)
    /// declaration. `this`/`base` never apply here regardless of
    /// `is_static` since `class_chain` is empty.
    pub fn for_top_level(tables: &'a GlobalTables, files: &'a [ParsedFile], file_index: usize, implicit_use_statements: usize) -> Self {
        Self {
            tables,
            files,
            file_index,
            class_chain: Vec::new(),
            current_module: files[file_index].module_name().to_string(),
            implicit_use_statements,
            is_static: true,
        }
    }

    fn file(&self) -> &'a ParsedFile {
        &self.files[self.file_index]
    }

    /// 4.4.3: ordered, de-duplicated candidate classes for a (possibly
    /// dotted) name reference.
    pub fn find_classes(&self, name: &str) -> Vec<usize> {
        let mut seen = std::collections::HashSet::new();
        let mut candidates = Vec::new();
        let mut push = |id: usize, seen: &mut std::collections::HashSet<usize>, candidates: &mut Vec<usize>| {
            if seen.insert(id) {
                candidates.push(id);
            }
        };

        // 1 & 2: the declaration's own class use set, then each enclosing
        // class's use set, nearest first.
        for &class_id in &self.class_chain {
            let class = tables::class_at(self.tables, self.files, class_id);
            for module in &class.use_statements {
                if let Some(&id) = self.tables.class_by_fqn.get(&format!("{module}.{name}")) {
                    push(id, &mut seen, &mut candidates);
                }
            }
        }

        // 3: file-level `use` statements, truncated to what was visible at
        // this declaration's parse time.
        for module in self.file().uses.iter().take(self.implicit_use_statements) {
            if let Some(&id) = self.tables.class_by_fqn.get(&format!("{}.{name}", module.text)) {
                push(id, &mut seen, &mut candidates);
            }
        }

        // 4: current-module-qualified.
        if let Some(&id) = self.tables.class_by_fqn.get(&format!("{}.{name}", self.current_module)) {
            push(id, &mut seen, &mut candidates);
        }

        // 5: bare name, any module.
        if let Some(ids) = self.tables.class_by_bare.get(name) {
            for &id in ids {
                push(id, &mut seen, &mut candidates);
            }
        }

        candidates
    }

    /// `Some(id)` iff exactly one candidate; `None` for both "unresolved"
    /// and "ambiguous" -- the caller distinguishes those by re-inspecting
    /// `find_classes` when it needs to report which one occurred.
    pub fn find_class(&self, name: &str) -> Option<usize> {
        let candidates = self.find_classes(name);
        (candidates.len() == 1).then(|| candidates[0])
    }

    /// 4.4.2: fields visible from this scope, including `this`/`base`
    /// pseudo-entries and fields inherited through the `base_class` chain.
    /// Variables are identified by `(class_id, field_index)` rather than a
    /// flat id, since fields are not registered in [`GlobalTables`] (only
    /// module-level globals are, per 4.4.1).
    pub fn find_variables(&self, name: &str) -> Vec<FieldRef> {
        let mut results = Vec::new();
        let Some(&innermost) = self.class_chain.first() else {
            return results;
        };
        if name == "this" {
            if !self.is_static {
                results.push(FieldRef::This(innermost));
            }
            return results;
        }
        if name == "base" {
            if !self.is_static {
                if let Some(base) = tables::class_at(self.tables, self.files, innermost).base_class {
                    results.push(FieldRef::This(base));
                }
            }
            return results;
        }
        let mut class_id = Some(innermost);
        let mut seen = std::collections::HashSet::new();
        while let Some(id) = class_id {
            if !seen.insert(id) {
                break; // cycle guard; a well-formed base chain never needs this
            }
            let class = tables::class_at(self.tables, self.files, id);
            if let Some(index) = class.variables.iter().position(|v| v.name == name) {
                results.push(FieldRef::Field(id, index));
            }
            class_id = class.base_class;
        }
        results
    }

    pub fn find_variable(&self, name: &str) -> Option<FieldRef> {
        let results = self.find_variables(name);
        (results.len() == 1).then(|| results[0])
    }

    /// 4.4.3: overload set for a method name, walking the `base_class`
    /// chain for inherited methods. Keys are `fqn@i` as registered by
    /// [`GlobalTables`].
    pub fn find_functions(&self, name: &str) -> Vec<usize> {
        let mut results = Vec::new();
        let mut class_id = self.class_chain.first().copied();
        let mut seen = std::collections::HashSet::new();
        while let Some(id) = class_id {
            if !seen.insert(id) {
                break;
            }
            let class = tables::class_at(self.tables, self.files, id);
            let fqn = class.fqn() + "." + name;
            if let Some(&dupe_count) = self.tables.func_dupe_count.get(&fqn) {
                for i in 0..dupe_count {
                    if let Some(&fid) = self.tables.function_by_key.get(&shift_parser::Function::overload_key(&fqn, i)) {
                        results.push(fid);
                    }
                }
            }
            class_id = class.base_class;
        }
        results
    }

    pub fn find_function(&self, name: &str) -> Option<usize> {
        let results = self.find_functions(name);
        (results.len() == 1).then(|| results[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shift_common::{DiagnosticSink, SourceMap};

    fn build(source: &str) -> (Vec<ParsedFile>, GlobalTables) {
        let map = SourceMap::new(source.to_string());
        let mut sink = DiagnosticSink::new();
        let mut files = vec![shift_parser::parse_file(&map, "f.sh", &mut sink)];
        let tables = crate::analyze(&mut files, &[map], &mut sink);
        let (rendered, has_error) = sink.print_exit_clear();
        assert!(!has_error, "{rendered:?}");
        (files, tables)
    }

    #[test]
    fn find_variable_resolves_own_field() {
        let (files, tables) = build("module m; class C { int x; void f() {} }");
        let scope = Scope::for_class_member(&tables, &files, 0, 0, 0, false);
        assert_eq!(scope.find_variable("x"), Some(FieldRef::Field(0, 0)));
        assert_eq!(scope.find_variable("missing"), None);
    }

    #[test]
    fn this_resolves_only_in_non_static_context() {
        let (files, tables) = build("module m; class C { int x; }");
        let instance_scope = Scope::for_class_member(&tables, &files, 0, 0, 0, false);
        assert_eq!(instance_scope.find_variables("this"), vec![FieldRef::This(0)]);

        let static_scope = Scope::for_class_member(&tables, &files, 0, 0, 0, true);
        assert!(static_scope.find_variables("this").is_empty());
    }

    #[test]
    fn base_resolves_to_base_class_only_when_non_static() {
        let (files, tables) = build("module m; class Base {} class Derived : Base {}");
        let base_id = tables.class_id_at(0, 0).unwrap();

        let instance_scope = Scope::for_class_member(&tables, &files, 0, 1, 0, false);
        assert_eq!(instance_scope.find_variables("base"), vec![FieldRef::This(base_id)]);

        let static_scope = Scope::for_class_member(&tables, &files, 0, 1, 0, true);
        assert!(static_scope.find_variables("base").is_empty());

        // a class with no base never produces a `base` hit regardless.
        let rootless_scope = Scope::for_class_member(&tables, &files, 0, 0, 0, false);
        assert!(rootless_scope.find_variables("base").is_empty());
    }

    #[test]
    fn find_function_sees_inherited_methods() {
        let (files, tables) = build("module m; class Base { void f() {} } class Derived : Base {}");
        let scope = Scope::for_class_member(&tables, &files, 0, 1, 0, false);
        assert!(scope.find_function("f").is_some());
        assert!(scope.find_function("missing").is_none());
    }

    #[test]
    fn find_functions_collects_every_overload() {
        let (files, tables) = build("module m; class C { void f() {} void f(int x) {} }");
        let scope = Scope::for_class_member(&tables, &files, 0, 0, 0, false);
        assert_eq!(scope.find_functions("f").len(), 2);
    }

    #[test]
    fn top_level_scope_never_resolves_this_or_base() {
        let (files, tables) = build("module m; int g;");
        let scope = Scope::for_top_level(&tables, &files, 0, 0);
        assert!(scope.find_variables("this").is_empty());
        assert!(scope.find_variables("base").is_empty());
    }
}

/// One variable lookup hit: a named field on some class, or the `this`
/// pseudo-variable denoting that class's own instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef {
    This(usize),
    Field(usize, usize),
}

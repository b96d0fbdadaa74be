//! Cross-file symbol tables (4.4.1): one flat arena each for classes,
//! functions, and variables, built by scanning every file's parsed AST once.
//!
//! `ast::Type::resolved_class` and the `resolved_*` fields on expression
//! nodes and on [`shift_parser::Class`] (`base_class`, `enclosing_class`)
//! are plain `usize`, not `(file, local)` tuples, so this module assigns one
//! flat id per class/function/variable up front and keeps a reverse map
//! from a class's file-local location back to that id.

use rustc_hash::{FxHashMap, FxHashSet};

use shift_common::{DiagnosticSink, SourceMap};
use shift_parser::{Class, Function, ParsedFile};

use crate::diag;

/// Locates one class: which file it came from and its index in that file's
/// `classes` vec.
#[derive(Debug, Clone, Copy)]
pub struct GlobalClass {
    pub file_index: usize,
    pub local_index: usize,
}

/// Locates one function: its file, the local class index if it is a
/// method (`None` for a module-level free function), and its index in the
/// owning `functions` vec.
#[derive(Debug, Clone, Copy)]
pub struct GlobalFunction {
    pub file_index: usize,
    pub class_index: Option<usize>,
    pub local_index: usize,
}

/// Locates one global (module-level) variable.
#[derive(Debug, Clone, Copy)]
pub struct GlobalVariable {
    pub file_index: usize,
    pub local_index: usize,
}

/// The analyzer's cross-file symbol tables, built once from every parsed
/// file before any resolution runs.
#[derive(Debug, Default)]
pub struct GlobalTables {
    pub modules: FxHashSet<String>,

    pub classes: Vec<GlobalClass>,
    pub functions: Vec<GlobalFunction>,
    pub variables: Vec<GlobalVariable>,

    pub class_by_fqn: FxHashMap<String, usize>,
    pub class_by_bare: FxHashMap<String, Vec<usize>>,
    pub function_by_key: FxHashMap<String, usize>,
    pub func_dupe_count: FxHashMap<String, usize>,
    pub variable_by_fqn: FxHashMap<String, usize>,

    /// `(file_index, local_class_index) -> global class id`. Used to turn
    /// the parser's file-local `enclosing_class` index into a global one,
    /// and to resolve a class's own global id when walking `base_class`.
    pub(crate) class_id_by_location: FxHashMap<(usize, usize), usize>,
}

impl GlobalTables {
    /// Global id of the class declared at `(file_index, local_index)`, or
    /// `None` if that location is out of range (should not happen for
    /// indices produced by the parser itself).
    pub fn class_id_at(&self, file_index: usize, local_index: usize) -> Option<usize> {
        self.class_id_by_location.get(&(file_index, local_index)).copied()
    }

    pub fn build(files: &[ParsedFile], source_maps: &[SourceMap], sink: &mut DiagnosticSink) -> Self {
        let mut tables = GlobalTables::default();

        for file in files {
            if let Some(module) = &file.module {
                tables.modules.insert(module.text.clone());
            }
        }

        register_classes(&mut tables, files, source_maps, sink);
        register_functions(&mut tables, files, source_maps, sink);
        register_variables(&mut tables, files, source_maps, sink);

        tables
    }
}

fn register_classes(tables: &mut GlobalTables, files: &[ParsedFile], source_maps: &[SourceMap], sink: &mut DiagnosticSink) {
    for (file_index, file) in files.iter().enumerate() {
        for (local_index, class) in file.classes.iter().enumerate() {
            let id = tables.classes.len();
            tables.classes.push(GlobalClass { file_index, local_index });
            tables.class_id_by_location.insert((file_index, local_index), id);

            let fqn = class.fqn();
            if tables.class_by_fqn.contains_key(&fqn) {
                diag::error(sink, &source_maps[file_index], &file.path, class.name_span, format!("duplicate class '{fqn}'"));
            } else {
                tables.class_by_fqn.insert(fqn, id);
            }
            tables.class_by_bare.entry(class.name.clone()).or_default().push(id);
        }
    }
}

fn register_functions(tables: &mut GlobalTables, files: &[ParsedFile], source_maps: &[SourceMap], sink: &mut DiagnosticSink) {
    // fqn -> signature hashes already registered under that name, purely to
    // detect a true duplicate (identical parameter types) among overloads.
    let mut seen_signatures: FxHashMap<String, Vec<u64>> = FxHashMap::default();

    for (file_index, file) in files.iter().enumerate() {
        for (class_index, class) in file.classes.iter().enumerate() {
            for (local_index, func) in class.functions.iter().enumerate() {
                let fqn = format!("{}.{}", class.fqn(), func.name);
                register_one_function(tables, &mut seen_signatures, source_maps, sink, file, file_index, Some(class_index), local_index, func, &fqn);
            }
        }
        for (local_index, func) in file.functions.iter().enumerate() {
            let fqn = format!("{}.{}", func.owner_module, func.name);
            register_one_function(tables, &mut seen_signatures, source_maps, sink, file, file_index, None, local_index, func, &fqn);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn register_one_function(
    tables: &mut GlobalTables,
    seen_signatures: &mut FxHashMap<String, Vec<u64>>,
    source_maps: &[SourceMap],
    sink: &mut DiagnosticSink,
    file: &ParsedFile,
    file_index: usize,
    class_index: Option<usize>,
    local_index: usize,
    func: &Function,
    fqn: &str,
) {
    let overload_index = *tables.func_dupe_count.entry(fqn.to_string()).or_insert(0);
    tables.func_dupe_count.insert(fqn.to_string(), overload_index + 1);

    let signature = func.signature_hash();
    let sigs = seen_signatures.entry(fqn.to_string()).or_default();
    if sigs.contains(&signature) {
        diag::error(sink, &source_maps[file_index], &file.path, func.name_span, format!("duplicate function signature '{fqn}'"));
    }
    sigs.push(signature);

    let id = tables.functions.len();
    tables.functions.push(GlobalFunction { file_index, class_index, local_index });
    tables.function_by_key.insert(Function::overload_key(fqn, overload_index), id);
}

fn register_variables(tables: &mut GlobalTables, files: &[ParsedFile], source_maps: &[SourceMap], sink: &mut DiagnosticSink) {
    for (file_index, file) in files.iter().enumerate() {
        for (local_index, var) in file.variables.iter().enumerate() {
            let fqn = format!("{}.{}", var.owner_module, var.name);
            let id = tables.variables.len();
            tables.variables.push(GlobalVariable { file_index, local_index });
            if tables.variable_by_fqn.contains_key(&fqn) {
                diag::error(sink, &source_maps[file_index], &file.path, var.name_span, format!("duplicate variable '{fqn}'"));
            } else {
                tables.variable_by_fqn.insert(fqn, id);
            }
        }
    }
}

/// Walks a class's `enclosing_class` chain (innermost first, i.e. starting
/// at `class_index` itself) to a global class id sequence, for callers that
/// need every frame a nested class passes through.
pub(crate) fn class_chain(tables: &GlobalTables, files: &[ParsedFile], file_index: usize, class_index: usize) -> Vec<usize> {
    let mut chain = Vec::new();
    let mut current = Some(class_index);
    while let Some(idx) = current {
        let Some(id) = tables.class_id_at(file_index, idx) else { break };
        chain.push(id);
        current = files[file_index].classes[idx].enclosing_class;
    }
    chain
}

/// Returns the [`Class`] a global class id names.
pub(crate) fn class_at<'a>(tables: &GlobalTables, files: &'a [ParsedFile], id: usize) -> &'a Class {
    let loc = tables.classes[id];
    &files[loc.file_index].classes[loc.local_index]
}

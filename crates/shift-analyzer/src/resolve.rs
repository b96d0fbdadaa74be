//! Post-parse resolution (4.4.4): fills in every type occurrence's
//! `resolved_class`, resolves each class's `base_class`, and reports the
//! semantic problems that fall out of table construction and name lookup
//! (duplicate parameters, redundant/unknown `use`, missing `module`).
//!
//! Expression-level name resolution (`resolved_variable`/`resolved_function`
//! on [`shift_parser::ExprNode`]) belongs to a later typing pass and is not
//! attempted here, per 4.4.4.

use shift_common::{DiagnosticSink, SourceMap, Span};
use shift_parser::{Function, ParsedFile, Type, Variable};

use crate::diag;
use crate::scope::Scope;
use crate::tables::GlobalTables;

/// `void` is the one builtin type sentinel the parser itself synthesizes
/// (constructor/destructor return types); it never resolves to a class.
const VOID: &str = "void";

pub fn resolve(tables: &GlobalTables, files: &mut [ParsedFile], source_maps: &[SourceMap], sink: &mut DiagnosticSink) {
    check_modules_and_uses(files, tables, source_maps, sink);

    let base_patches = resolve_base_classes(tables, files, source_maps, sink);
    for (file_index, local_index, base_class) in base_patches {
        files[file_index].classes[local_index].base_class = base_class;
    }

    let type_patches = resolve_types(tables, files, source_maps, sink);
    apply_type_patches(files, type_patches);

    for (file_index, file) in files.iter().enumerate() {
        let source_map = &source_maps[file_index];
        for class in &file.classes {
            for func in &class.functions {
                report_duplicate_params(func, file, source_map, sink);
            }
        }
        for func in &file.functions {
            report_duplicate_params(func, file, source_map, sink);
        }
    }
}

fn check_modules_and_uses(files: &[ParsedFile], tables: &GlobalTables, source_maps: &[SourceMap], sink: &mut DiagnosticSink) {
    for (file_index, file) in files.iter().enumerate() {
        let source_map = &source_maps[file_index];
        let Some(module) = &file.module else {
            // There is no token to anchor a missing declaration on; report
            // at the start of the file.
            diag::error(sink, source_map, &file.path, Span::new(0, 0), "file has no module declaration");
            continue;
        };

        let mut seen = std::collections::HashSet::new();
        for used in &file.uses {
            if !tables.modules.contains(&used.text) {
                diag::error(sink, source_map, &file.path, used.span, format!("use of unknown module '{}'", used.text));
            } else if used.text == module.text {
                diag::warn(sink, source_map, &file.path, used.span, "redundant 'use' statement");
            } else if !seen.insert(used.text.clone()) {
                diag::warn(sink, source_map, &file.path, used.span, "redundant 'use' statement");
            }
        }
    }
}

/// `(file_index, local_class_index, resolved base_class)`.
type BasePatch = (usize, usize, Option<usize>);

fn resolve_base_classes(tables: &GlobalTables, files: &[ParsedFile], source_maps: &[SourceMap], sink: &mut DiagnosticSink) -> Vec<BasePatch> {
    let mut patches = Vec::new();
    for (file_index, file) in files.iter().enumerate() {
        for (local_index, class) in file.classes.iter().enumerate() {
            let Some(base_name) = &class.base_name else { continue };
            let scope = Scope::for_class_member(tables, files, file_index, local_index, class.implicit_use_statements, false);
            let resolved = resolve_type_name(tables, &scope, &base_name.text, base_name.span, file, &source_maps[file_index], sink);
            patches.push((file_index, local_index, resolved));
        }
    }
    patches
}

/// Where a resolved type occurrence should be written back: a class field,
/// a function parameter, a function return type, or a module-level global.
enum TypeSite {
    ClassField { class_index: usize, field_index: usize },
    ClassMethodReturn { class_index: usize, func_index: usize },
    ClassMethodParam { class_index: usize, func_index: usize, param_index: usize },
    FreeFunctionReturn { func_index: usize },
    FreeFunctionParam { func_index: usize, param_index: usize },
    GlobalVariable { var_index: usize },
}

type TypePatch = (usize, TypeSite, Option<usize>);

fn resolve_types(tables: &GlobalTables, files: &[ParsedFile], source_maps: &[SourceMap], sink: &mut DiagnosticSink) -> Vec<TypePatch> {
    let mut patches = Vec::new();
    for (file_index, file) in files.iter().enumerate() {
        let source_map = &source_maps[file_index];

        for (class_index, class) in file.classes.iter().enumerate() {
            for (field_index, var) in class.variables.iter().enumerate() {
                // Fields carry no `ModFlags` of their own (the parser
                // discards a field's modifier list after validation), so
                // there is no static-ness to thread here yet.
                let scope = Scope::for_class_member(tables, files, file_index, class_index, var.implicit_use_statements, false);
                let resolved = resolve_variable_type(tables, &scope, var, file, source_map, sink);
                patches.push((file_index, TypeSite::ClassField { class_index, field_index }, resolved));
            }
            for (func_index, func) in class.functions.iter().enumerate() {
                let scope = Scope::for_class_member(tables, files, file_index, class_index, func.implicit_use_statements, func.mods.contains(shift_parser::ModFlags::STATIC));
                let resolved = resolve_function_return(tables, &scope, func, file, source_map, sink);
                patches.push((file_index, TypeSite::ClassMethodReturn { class_index, func_index }, resolved));
                for (param_index, (_, param)) in func.params.iter().enumerate() {
                    let resolved = resolve_variable_type(tables, &scope, param, file, source_map, sink);
                    patches.push((file_index, TypeSite::ClassMethodParam { class_index, func_index, param_index }, resolved));
                }
            }
        }

        for (func_index, func) in file.functions.iter().enumerate() {
            let scope = Scope::for_top_level(tables, files, file_index, func.implicit_use_statements);
            let resolved = resolve_function_return(tables, &scope, func, file, source_map, sink);
            patches.push((file_index, TypeSite::FreeFunctionReturn { func_index }, resolved));
            for (param_index, (_, param)) in func.params.iter().enumerate() {
                let resolved = resolve_variable_type(tables, &scope, param, file, source_map, sink);
                patches.push((file_index, TypeSite::FreeFunctionParam { func_index, param_index }, resolved));
            }
        }

        for (var_index, var) in file.variables.iter().enumerate() {
            let scope = Scope::for_top_level(tables, files, file_index, var.implicit_use_statements);
            let resolved = resolve_variable_type(tables, &scope, var, file, source_map, sink);
            patches.push((file_index, TypeSite::GlobalVariable { var_index }, resolved));
        }
    }
    patches
}

fn resolve_variable_type(tables: &GlobalTables, scope: &Scope, var: &Variable, file: &ParsedFile, source_map: &SourceMap, sink: &mut DiagnosticSink) -> Option<usize> {
    resolve_type(tables, scope, &var.ty, file, source_map, sink)
}

fn resolve_function_return(tables: &GlobalTables, scope: &Scope, func: &Function, file: &ParsedFile, source_map: &SourceMap, sink: &mut DiagnosticSink) -> Option<usize> {
    resolve_type(tables, scope, &func.return_type, file, source_map, sink)
}

fn resolve_type(tables: &GlobalTables, scope: &Scope, ty: &Type, file: &ParsedFile, source_map: &SourceMap, sink: &mut DiagnosticSink) -> Option<usize> {
    if ty.name.text == VOID {
        return None;
    }
    resolve_type_name(tables, scope, &ty.name.text, ty.name.span, file, source_map, sink)
}

fn resolve_type_name(tables: &GlobalTables, scope: &Scope, name_text: &str, span: Span, file: &ParsedFile, source_map: &SourceMap, sink: &mut DiagnosticSink) -> Option<usize> {
    if name_text.contains('.') {
        return tables.class_by_fqn.get(name_text).copied();
    }
    match scope.find_classes(name_text).as_slice() {
        [] => {
            diag::error(sink, source_map, &file.path, span, format!("unable to resolve class '{name_text}'"));
            None
        }
        [id] => Some(*id),
        _ => {
            diag::error(sink, source_map, &file.path, span, format!("ambiguous class reference to '{name_text}'"));
            None
        }
    }
}

fn apply_type_patches(files: &mut [ParsedFile], patches: Vec<TypePatch>) {
    for (file_index, site, resolved) in patches {
        let file = &mut files[file_index];
        let ty: &mut Type = match site {
            TypeSite::ClassField { class_index, field_index } => &mut file.classes[class_index].variables[field_index].ty,
            TypeSite::ClassMethodReturn { class_index, func_index } => &mut file.classes[class_index].functions[func_index].return_type,
            TypeSite::ClassMethodParam { class_index, func_index, param_index } => {
                &mut file.classes[class_index].functions[func_index].params.get_index_mut(param_index).ty
            }
            TypeSite::FreeFunctionReturn { func_index } => &mut file.functions[func_index].return_type,
            TypeSite::FreeFunctionParam { func_index, param_index } => &mut file.functions[func_index].params.get_index_mut(param_index).ty,
            TypeSite::GlobalVariable { var_index } => &mut file.variables[var_index].ty,
        };
        ty.resolved_class = resolved;
    }
}

fn report_duplicate_params(func: &Function, file: &ParsedFile, source_map: &SourceMap, sink: &mut DiagnosticSink) {
    let mut seen = std::collections::HashSet::new();
    for (_, param) in func.params.iter() {
        if !seen.insert(param.name.clone()) {
            diag::error(sink, source_map, &file.path, param.name_span, format!("duplicate parameter name '{}'", param.name));
        }
    }
}

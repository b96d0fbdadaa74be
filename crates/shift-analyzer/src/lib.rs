//! Cross-file symbol tables and name resolution for the Shift compiler
//! front end (4.4). Runs once every file has been independently tokenized
//! and parsed: builds one flat set of tables across all files, then walks
//! every file resolving type occurrences and reporting the semantic
//! problems that only become visible with whole-program knowledge.

mod diag;
pub mod resolve;
pub mod scope;
pub mod tables;

use shift_common::{DiagnosticSink, SourceMap};
use shift_parser::ParsedFile;

pub use scope::{FieldRef, Scope};
pub use tables::{GlobalClass, GlobalFunction, GlobalTables, GlobalVariable};

/// Builds the global tables from every file and resolves their type
/// occurrences and cross-file `use`/`module` problems in place. `files` and
/// `source_maps` must be the same length and in the same order (the file a
/// parser produced `files[i]` from must be the one whose bytes live in
/// `source_maps[i]`).
pub fn analyze(files: &mut [ParsedFile], source_maps: &[SourceMap], sink: &mut DiagnosticSink) -> GlobalTables {
    debug_assert_eq!(files.len(), source_maps.len(), "files and source_maps must be parallel");
    let tables = GlobalTables::build(files, source_maps, sink);
    resolve::resolve(&tables, files, source_maps, sink);
    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_sources(sources: &[&str]) -> (Vec<ParsedFile>, GlobalTables, DiagnosticSink) {
        let maps: Vec<SourceMap> = sources.iter().map(|s| SourceMap::new(s.to_string())).collect();
        let mut sink = DiagnosticSink::new();
        let mut files: Vec<ParsedFile> = maps
            .iter()
            .enumerate()
            .map(|(i, map)| shift_parser::parse_file(map, format!("f{i}.sh"), &mut sink))
            .collect();
        let tables = analyze(&mut files, &maps, &mut sink);
        (files, tables, sink)
    }

    #[test]
    fn resolves_field_type_within_same_module() {
        let (files, _tables, mut sink) = analyze_sources(&["module m; class X {} class Y { X field; }"]);
        let (rendered, has_error) = sink.print_exit_clear();
        assert!(!has_error, "{rendered:?}");
        let y = &files[0].classes[1];
        assert!(y.variables[0].ty.resolved_class.is_some());
    }

    #[test]
    fn unresolved_type_is_reported() {
        let (_files, _tables, mut sink) = analyze_sources(&["module m; class Y { Missing field; }"]);
        let (rendered, has_error) = sink.print_exit_clear();
        assert!(has_error);
        assert!(rendered.iter().any(|l| l.contains("unable to resolve class 'Missing'")));
    }

    #[test]
    fn ambiguous_type_across_used_modules() {
        let (_files, _tables, mut sink) = analyze_sources(&[
            "module a; class X {}",
            "module b; class X {}",
            "module c; use a; use b; class Y { X field; }",
        ]);
        let (rendered, has_error) = sink.print_exit_clear();
        assert!(has_error);
        assert!(rendered.iter().any(|l| l.contains("ambiguous class reference to 'X'")));
    }

    #[test]
    fn resolves_base_class_across_files() {
        let (files, _tables, mut sink) = analyze_sources(&["module a; class Base {}", "module b; use a; class Derived : Base {}"]);
        let (rendered, has_error) = sink.print_exit_clear();
        assert!(!has_error, "{rendered:?}");
        assert!(files[1].classes[0].base_class.is_some());
    }

    #[test]
    fn nested_class_inherits_enclosing_use_set() {
        let (files, _tables, mut sink) = analyze_sources(&[
            "module a; class Thing {}",
            "module b; class Outer { use a; class Inner { Thing field; } }",
        ]);
        let (rendered, has_error) = sink.print_exit_clear();
        assert!(!has_error, "{rendered:?}");
        let inner = &files[1].classes[1];
        assert_eq!(inner.enclosing_class, Some(0));
        assert!(inner.variables[0].ty.resolved_class.is_some());
    }

    #[test]
    fn redundant_self_use_warns() {
        let maps = [SourceMap::new("module m; use m; class C {}".to_string())];
        let mut sink = DiagnosticSink::new();
        sink.set_print_warnings(true);
        let mut files = vec![shift_parser::parse_file(&maps[0], "f.sh", &mut sink)];
        analyze(&mut files, &maps, &mut sink);
        let (rendered, has_error) = sink.print_exit_clear();
        assert!(!has_error);
        assert!(rendered.iter().any(|l| l.contains("redundant 'use' statement")));
    }

    #[test]
    fn duplicate_class_is_reported() {
        let (_files, _tables, mut sink) = analyze_sources(&["module m; class C {} class C {}"]);
        let (rendered, has_error) = sink.print_exit_clear();
        assert!(has_error);
        assert!(rendered.iter().any(|l| l.contains("duplicate class 'm.C'")));
    }

    #[test]
    fn overloads_get_distinct_dupe_indices() {
        let (_files, tables, mut sink) = analyze_sources(&["module m; class C { void f() {} void f(int x) {} }"]);
        let (rendered, has_error) = sink.print_exit_clear();
        assert!(!has_error, "{rendered:?}");
        assert_eq!(tables.func_dupe_count.get("m.C.f"), Some(&2));
        assert!(tables.function_by_key.contains_key("m.C.f@0"));
        assert!(tables.function_by_key.contains_key("m.C.f@1"));
    }

    #[test]
    fn duplicate_parameter_name_is_reported() {
        let (_files, _tables, mut sink) = analyze_sources(&["module m; class C { void f(int x, int x) {} }"]);
        let (rendered, has_error) = sink.print_exit_clear();
        assert!(has_error);
        assert!(rendered.iter().any(|l| l.contains("duplicate parameter name 'x'")));
    }

    #[test]
    fn missing_module_declaration_is_reported() {
        let (_files, _tables, mut sink) = analyze_sources(&["class C {}"]);
        let (rendered, has_error) = sink.print_exit_clear();
        assert!(has_error);
        assert!(rendered.iter().any(|l| l.contains("no module declaration")));
    }
}

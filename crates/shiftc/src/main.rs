//! The Shift compiler front-end driver: reads source files named on the
//! command line, tokenizes and parses each one independently, then hands
//! the whole set to the analyzer for cross-file resolution.
//!
//! This binary is the "argument parsing, filesystem access, console output"
//! collaborator the front end itself stays free of (§6). The flag names
//! below match the documented vocabulary exactly; they are spelled with
//! clap's standard double-dash `long` convention rather than the original
//! single-dash style, since clap's derive only generates `--name` flags.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use shift_common::{DiagnosticSink, SourceMap};
use shift_parser::ParsedFile;

#[derive(Parser)]
#[command(name = "shiftc", version, about = "Tokenize, parse, and analyze Shift source files.")]
struct Cli {
    /// Print warning diagnostics (suppressed by default).
    #[arg(long = "warnings")]
    warnings: bool,

    /// Promote warnings to errors.
    #[arg(long = "warnings-as-errors")]
    warnings_as_errors: bool,

    /// Request a C++ back end. Out of scope for this front end; recognized
    /// and ignored rather than rejected as unknown.
    #[arg(long = "cpp", alias = "c++")]
    cpp: bool,

    /// Skip implicit standard-library class resolution. There is no bundled
    /// standard library in this front end, so this is currently a no-op
    /// kept for flag-vocabulary compatibility.
    #[arg(long = "no-std")]
    no_std: bool,

    /// Additional directory to search for library sources. Not yet
    /// consulted by anything (there is no module-to-path search in this
    /// front end); accepted so a caller's existing invocation still parses.
    #[arg(long = "lib-path")]
    lib_path: Option<PathBuf>,

    /// An additional library source file, compiled alongside the inputs
    /// but listed separately from them.
    #[arg(long = "lib")]
    lib: Vec<PathBuf>,

    /// Source files to compile.
    sources: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if cli.cpp {
        eprintln!("warning: -cpp/-c++ back end is out of scope for this front end; ignored");
    }
    let _ = &cli.no_std;
    let _ = &cli.lib_path;

    match run(&cli) {
        Ok(had_error) => process::exit(i32::from(had_error)),
        Err(message) => {
            eprintln!("error: {message}");
            process::exit(1);
        }
    }
}

/// Reads every input file, runs the tokenizer/parser/analyzer pipeline, and
/// prints committed diagnostics. Returns whether any error was committed;
/// `Err` is reserved for the file-system I/O boundary (§7).
fn run(cli: &Cli) -> Result<bool, String> {
    let mut paths = cli.lib.clone();
    paths.extend(cli.sources.iter().cloned());
    if paths.is_empty() {
        return Err("no input files".to_string());
    }

    let mut sink = DiagnosticSink::new();
    sink.set_print_warnings(cli.warnings);
    sink.set_werror(cli.warnings_as_errors);

    let mut source_maps = Vec::with_capacity(paths.len());
    let mut display_paths = Vec::with_capacity(paths.len());
    for path in &paths {
        let text = std::fs::read_to_string(path).map_err(|e| format!("failed to read '{}': {e}", path.display()))?;
        source_maps.push(SourceMap::new(text));
        display_paths.push(path.display().to_string());
    }

    let mut files: Vec<ParsedFile> = source_maps
        .iter()
        .zip(display_paths.iter())
        .map(|(map, path)| shift_parser::parse_file(map, path.clone(), &mut sink))
        .collect();

    shift_analyzer::analyze(&mut files, &source_maps, &mut sink);

    let (rendered, has_error) = sink.print_exit_clear();
    for diagnostic in rendered {
        println!("{diagnostic}");
    }
    Ok(has_error)
}

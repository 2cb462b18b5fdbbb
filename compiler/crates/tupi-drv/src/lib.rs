//! tupi-drv - the `tupi` binary: wires the scanner, parser, and semantic
//! analyzer into the six-stage console pipeline.
//!
//! Each stage shares one [`DiagnosticBag`] and one [`MemoryAccountant`],
//! mirroring the original driver's single-pass structure: lex the whole
//! file once to confirm it's lexically clean, then hand the same source to
//! the parser (which drives its own internal lexer), then to the analyzer.
//! A fatal diagnostic at any stage halts the pipeline after that stage's
//! banner prints; a memory report always prints before the process exits,
//! even when an earlier stage failed.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use tracing::{info_span, Level};
use tracing_subscriber::EnvFilter;

use tupi_lex::Lexer;
use tupi_par::{validate_declaration_sequence, validate_spacing_rules, validate_variable_usage};
use tupi_sem::Analyzer;
use tupi_util::{DiagnosticBag, MemoryAccountant, Severity, Stage};

pub const DEFAULT_MEMORY_LIMIT: usize = tupi_util::DEFAULT_MEMORY_LIMIT;

const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_BLUE: &str = "\x1b[34m";
const ANSI_RESET: &str = "\x1b[0m";

/// Command-line surface: one positional source file, an optional memory
/// ceiling override for testing, kept off the happy path most users take.
#[derive(Debug, ClapParser)]
#[command(name = "tupi", about = "Compiler front end for the Tupi language")]
pub struct Cli {
    /// Path to the `.tupi` source file to compile.
    pub source: PathBuf,

    /// Memory ceiling in bytes; 0 means unbounded. Defaults to the same
    /// 2 MiB ceiling the original tool used.
    #[arg(long, default_value_t = DEFAULT_MEMORY_LIMIT)]
    pub memory_limit: usize,
}

/// Installs a `tracing` subscriber that writes to stderr under the `tupi`
/// target, controlled by `RUST_LOG`, so stage spans never interleave with
/// the fixed banner output on stdout.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tupi=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Runs the full pipeline against `source_path` and returns the process
/// exit code. Never panics on malformed input — only a host-environment
/// failure (the file can't be read, isn't valid UTF-8) becomes an `Err`.
pub fn run(source_path: &Path, memory_limit: usize) -> Result<i32> {
    let source = fs::read_to_string(source_path)
        .with_context(|| format!("não foi possível ler o arquivo-fonte '{}'", source_path.display()))?;

    let mut accountant = MemoryAccountant::init(memory_limit);
    let mut diagnostics = DiagnosticBag::new();

    eprintln!("{ANSI_GREEN}Limite máximo de memória: {memory_limit} bytes{ANSI_RESET}");

    // Lexical analysis: a standalone pass over the whole file, independent
    // of the parser's own internal lexer, purely to confirm the source is
    // lexically well-formed before any syntax tree is built.
    println!("{ANSI_BLUE}=== ANÁLISE LÉXICA ==={ANSI_RESET}");
    let lex_ok = {
        let _span = info_span!("lexing").entered();
        lex_pass(&source, &mut diagnostics, &mut accountant)
    };
    if !lex_ok {
        println!("{ANSI_RED}Erros encontrados durante a análise léxica.{ANSI_RESET}");
        return Ok(finish(&diagnostics, &accountant, 1));
    }
    println!("{ANSI_GREEN}Análise léxica concluída com sucesso!{ANSI_RESET}\n");

    // Syntactic analysis.
    println!("{ANSI_BLUE}=== ANÁLISE SINTÁTICA ==={ANSI_RESET}");
    let (mut arena, root, had_error) = {
        let _span = info_span!("parsing").entered();
        tupi_par::parse(&source, &mut diagnostics)
    };
    if had_error {
        println!("{ANSI_RED}Erros encontrados durante a análise sintática.{ANSI_RESET}");
        return Ok(finish(&diagnostics, &accountant, 1));
    }
    println!("{ANSI_GREEN}Análise sintática concluída com sucesso!{ANSI_RESET}\n");

    println!("{ANSI_BLUE}=== VALIDAÇÕES SINTÁTICAS ==={ANSI_RESET}");
    if !validate_declaration_sequence(&arena, root, &mut diagnostics) {
        println!("{ANSI_RED}Erro: sequência de declarações inválida{ANSI_RESET}");
        return Ok(finish(&diagnostics, &accountant, 1));
    }
    println!("{ANSI_GREEN}✓ Sequência de declarações válida{ANSI_RESET}");

    if !validate_spacing_rules(&arena, root) {
        println!("{ANSI_RED}Erro: regras de espaçamento não respeitadas{ANSI_RESET}");
        return Ok(finish(&diagnostics, &accountant, 1));
    }
    println!("{ANSI_GREEN}✓ Regras de espaçamento respeitadas{ANSI_RESET}");

    if !validate_variable_usage(&arena, root) {
        println!("{ANSI_RED}Erro: uso inválido de variáveis{ANSI_RESET}");
        return Ok(finish(&diagnostics, &accountant, 1));
    }
    println!("{ANSI_GREEN}✓ Uso de variáveis válido{ANSI_RESET}\n");

    println!("{ANSI_BLUE}=== ÁRVORE SINTÁTICA ABSTRATA ==={ANSI_RESET}");
    let mut tree = String::new();
    arena.print_tree(root, &mut tree).expect("writing to a String never fails");
    print!("{tree}");

    // Semantic analysis never aborts the pipeline on its own account; it
    // only halts if the shared accountant is exhausted mid-walk.
    println!("\n{ANSI_BLUE}=== ANÁLISE SEMÂNTICA ==={ANSI_RESET}");
    let mut analyzer = Analyzer::new(&mut arena, &mut diagnostics, &mut accountant);
    {
        let _span = info_span!("analyzing").entered();
        analyzer.analyze(root);
    }
    let semantic_failed = analyzer
        .diagnostics()
        .iter()
        .any(|d| d.stage == Stage::Semantic || (d.stage == Stage::Memory && d.severity == Severity::Fatal));
    if semantic_failed {
        println!("{ANSI_RED}Erros encontrados durante a análise semântica.{ANSI_RESET}");
    } else {
        println!("{ANSI_GREEN}Análise semântica concluída com sucesso!{ANSI_RESET}");
    }

    println!("\n{ANSI_BLUE}=== TABELA DE SÍMBOLOS ==={ANSI_RESET}");
    let mut symbols = String::new();
    analyzer.dump_symbols(&mut symbols).expect("writing to a String never fails");
    print!("{symbols}");

    Ok(finish(&diagnostics, &accountant, 0))
}

/// Scans `source` token by token purely to surface a fatal lexical
/// diagnostic; charges each lexeme's bytes against `accountant`, the same
/// place the original scanner's own allocator call sat.
fn lex_pass(source: &str, diagnostics: &mut DiagnosticBag, accountant: &mut MemoryAccountant) -> bool {
    let mut lexer = Lexer::new(source, diagnostics);
    for token in &mut lexer {
        if accountant.alloc(token.lexeme.len()).is_err() {
            break;
        }
    }
    !lexer.halted
}

/// Prints every collected diagnostic, the memory report banner, and
/// returns the exit code the caller should propagate. Runs regardless of
/// which stage halted the pipeline, matching the original tool always
/// emitting its memory report before `mm_cleanup`.
fn finish(diagnostics: &DiagnosticBag, accountant: &MemoryAccountant, exit_on_success: i32) -> i32 {
    let has_fatal = diagnostics.has_fatal();
    let mut rendered = String::new();
    for diag in diagnostics.iter() {
        if diag.severity == Severity::Note {
            continue;
        }
        let _ = writeln!(rendered, "{diag}");
    }
    if !rendered.is_empty() {
        print!("{rendered}");
    }

    println!("\n{ANSI_BLUE}=== RELATÓRIO DE MEMÓRIA ==={ANSI_RESET}");
    println!("Uso atual: {} bytes", accountant.current_usage());
    // The original tool's "peak usage" line is really the configured
    // ceiling, not the high-water mark — `max_usage` preserves that quirk.
    println!("Pico de uso: {} bytes", accountant.max_usage());

    if has_fatal { 1 } else { exit_on_success }
}

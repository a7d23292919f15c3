use std::process::ExitCode;

use quill_lang::{compile, parse, tokenize, to_source, Error, SymbolKind, TreePrinter};

const USAGE: &str = "usage: quill [--tokens | --ast | --source | --symbols] <file>";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode { Run, Tokens, Ast, Source, Symbols }

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((mode, path)) = parse_args(&args) else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("quill: cannot read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!(?mode, path, bytes = source.len(), "starting");
    match run(mode, &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{path}:{e}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: &[String]) -> Option<(Mode, &str)> {
    match args {
        [path] if !path.starts_with("--") => Some((Mode::Run, path.as_str())),
        [flag, path] => {
            let mode = match flag.as_str() {
                "--tokens"  => Mode::Tokens,
                "--ast"     => Mode::Ast,
                "--source"  => Mode::Source,
                "--symbols" => Mode::Symbols,
                _ => return None,
            };
            Some((mode, path.as_str()))
        }
        _ => None,
    }
}

fn run(mode: Mode, source: &str) -> Result<(), Error> {
    match mode {
        Mode::Tokens => {
            for tok in tokenize(source)? {
                println!("{:>4}:{:<3} {}", tok.line, tok.column, tok.kind);
            }
        }
        Mode::Ast => print!("{}", TreePrinter.print(&parse(source)?)),
        Mode::Source => print!("{}", to_source(&parse(source)?)?),
        Mode::Symbols => {
            let program = compile(source)?;
            for sym in program.symbols().global_symbols() {
                if sym.kind == SymbolKind::Intrinsic { continue; }
                println!("{:<10} {:<16} {}", sym.kind, sym.name, sym.span);
            }
        }
        Mode::Run => {
            let program = compile(source)?;
            let mut interp = program.interpreter();
            let value = interp.execute()?;
            println!("Result: {value}");
        }
    }
    Ok(())
}

/// Logs go to stderr, filtered by `QUILL_LOG` (or `RUST_LOG`). Nothing is
/// installed when neither is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match std::env::var("QUILL_LOG").or_else(|_| std::env::var("RUST_LOG")) {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) => return,
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
        .with(filter)
        .init();
}

use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

#[derive(Parser)]
#[command(name = "marq", version, about = "Marq markup parser")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a file and report diagnostics (exit 0 if valid)
    Check(CheckArgs),

    /// Parse a file and dump the document tree
    Ast(AstArgs),

    /// Parse a file and print the canonical source form
    Fmt(CheckArgs),
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Marq source file
    file: String,
}

#[derive(clap::Args)]
struct AstArgs {
    /// Marq source file
    file: String,

    /// Emit the tree as JSON instead of the debug format
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    match cli.command {
        Command::Check(args) => {
            let document = parse_or_exit(&args.file, color_choice);
            let nodes = document.nodes.len();
            eprintln!("ok: {} parsed successfully ({} top-level nodes)", args.file, nodes);
        }
        Command::Ast(args) => {
            let document = parse_or_exit(&args.file, color_choice);
            if args.json {
                match serde_json::to_string_pretty(&document.nodes) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("error: cannot serialize tree: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                println!("{:#?}", document);
            }
        }
        Command::Fmt(args) => {
            let document = parse_or_exit(&args.file, color_choice);
            print!("{}", document);
        }
    }
}

/// Read and parse a file, emitting diagnostics and exiting on failure.
fn parse_or_exit(path: &str, color_choice: ColorChoice) -> marq::Document {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path, e);
            process::exit(1);
        }
    };

    // Set up codespan file database
    let mut files = SimpleFiles::new();
    let file_id = files.add(path.to_string(), source.clone());

    let parser = marq::parser::Parser::new(source, file_id);
    match parser.parse() {
        Ok(document) => document,
        Err(errors) => {
            let writer = StandardStream::stderr(color_choice);
            let config = term::Config::default();
            for error in &errors {
                let diagnostic = error.to_diagnostic();
                let _ =
                    term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
            }
            process::exit(1);
        }
    }
}

use std::{fs, process};

use clap::{ArgAction, Parser, ValueEnum};
use log::{LevelFilter, debug};
use opreduce::{OutputFormat, render_with, symbols::SymbolMap};

/// opreduce reduces calculator expressions by operator precedence and renders
/// them as text, MathML or a syntax tree.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells opreduce to read expressions from a file, one per line, instead
    /// of treating the argument as an expression.
    #[arg(short, long)]
    file: bool,

    /// What to render.
    #[arg(short = 'o', long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Indents markup and prints trees in full.
    #[arg(short, long)]
    pretty: bool,

    /// Logs more; repeat for more detail. `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    contents: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Markup,
    Tree,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => Self::Text,
            Format::Markup => Self::Markup,
            Format::Tree => Self::Tree,
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level)
                              .parse_default_env()
                              .init();

    let expressions: Vec<String> = if args.file {
        let script = fs::read_to_string(&args.contents).unwrap_or_else(|_| {
                         eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                                   &args.contents);
                         process::exit(1);
                     });
        script.lines()
              .map(str::trim)
              .filter(|line| !line.is_empty() && !line.starts_with('#'))
              .map(str::to_string)
              .collect()
    } else {
        vec![args.contents]
    };

    let mut symbols = SymbolMap::standard();
    let mut failed = false;

    for expression in &expressions {
        match render_with(expression, &mut symbols, args.format.into(), args.pretty) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("{e}");
                failed = true;
            },
        }
    }

    let forward: Vec<&str> = symbols.forward_references()
                                    .iter()
                                    .map(|operation| operation.name.as_str())
                                    .collect();
    if !forward.is_empty() {
        debug!("forward references: {}", forward.join(", "));
    }

    if failed {
        process::exit(1);
    }
}

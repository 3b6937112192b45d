//! sassafras CLI
//!
//! Compiles SCSS from stdin to CSS on stdout, or runs an interactive
//! expression shell.

use std::io::{BufRead, Read, Write};

use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;

use sassafras_css::{Compiler, CssOptions, Expression};

/// sassafras - SCSS compiler
#[derive(Parser, Debug)]
#[command(name = "sassafras")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Compile a stylesheet
    sassafras < input.scss > output.css

    # Compile and minimize
    sassafras --minimize < input.scss > output.css

    # Explore expressions interactively
    sassafras --interactive
"#)]
struct Cli {
    /// Colorize the output
    #[arg(long)]
    color: bool,

    /// Run an interactive SassScript shell
    #[arg(short, long)]
    interactive: bool,

    /// Add a sass import path
    #[arg(short = 'I', long, value_name = "PATH")]
    load_path: Option<String>,

    /// Minimize the output (strip whitespace, comments, and extra
    /// semicolons; fold values)
    #[arg(long)]
    minimize: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = CssOptions {
        strip_white_space: cli.minimize,
        strip_comments: cli.minimize,
        minimize_values: cli.minimize,
        strip_extra_semicolons: cli.minimize,
        colorize: cli.color,
        compile_scss: true,
        ..CssOptions::default()
    };

    let mut compiler = Compiler::new();
    if let Some(path) = cli.load_path {
        compiler.importer_mut().add_path(path);
    }

    if cli.interactive {
        run_console(&compiler, options)
    } else {
        let mut source = String::new();
        let _ = std::io::stdin().read_to_string(&mut source)?;

        let mut tree = sassafras_css::parse(&source, options)?;
        compiler.compile(&mut tree, options)?;
        println!("{}", sassafras_css::to_css(&tree, options));
        Ok(())
    }
}

/// Read-evaluate-print loop over SCSS expressions; errors print and the
/// loop continues.
fn run_console(compiler: &Compiler, options: CssOptions) -> Result<()> {
    let scope = compiler.global_scope();
    let stdin = std::io::stdin();
    loop {
        print!(">> ");
        std::io::stdout().flush()?;

        let mut statement = String::new();
        if stdin.lock().read_line(&mut statement)? == 0 {
            return Ok(());
        }
        let statement = statement.trim_end();
        if statement == "\\q" || statement == "exit()" {
            println!("Bye.");
            return Ok(());
        }

        match evaluate_statement(statement, scope, options) {
            Ok(output) => println!("{output}"),
            Err(err) => {
                if options.colorize {
                    eprintln!("{}", err.to_string().red());
                } else {
                    eprintln!("{err}");
                }
            }
        }
    }
}

fn evaluate_statement(
    statement: &str,
    scope: &sassafras_css::Scope,
    options: CssOptions,
) -> Result<String> {
    let mut expression = Expression::from_string(statement, options)?;
    expression.evaluate(scope)?;
    Ok(expression.to_css(options))
}

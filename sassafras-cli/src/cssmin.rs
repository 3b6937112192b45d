//! cssmin - CSS minifier
//!
//! Reads CSS from stdin and writes the minimized form to stdout. Parsing
//! runs with the SCSS tokens enabled so `//` comments in hand-written
//! sources minify away too, but nothing is compiled.

use std::io::Read;

use anyhow::Result;
use clap::Parser;

use sassafras_css::CssOptions;

/// cssmin - CSS minifier
#[derive(Parser, Debug)]
#[command(name = "cssmin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Colorize the output
    #[arg(long)]
    color: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = CssOptions {
        strip_white_space: true,
        strip_comments: true,
        minimize_values: true,
        strip_extra_semicolons: true,
        colorize: cli.color,
        compile_scss: true,
        ..CssOptions::default()
    };

    let mut source = String::new();
    let _ = std::io::stdin().read_to_string(&mut source)?;

    let tree = sassafras_css::parse(&source, options)?;
    println!("{}", sassafras_css::to_css(&tree, options));
    Ok(())
}

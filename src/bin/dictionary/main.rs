//! Runs the keyword dictionary menu on stdin and stdout.

mod logger;

use std::io;

use anyhow::Context;
use clap::Parser;

use avl_dictionary::menu::Menu;

/// An interactive keyword dictionary backed by an AVL tree.
#[derive(Parser, Debug)]
#[command(name = "dictionary", version)]
struct CliOpts {
    /// Don't print the menu or prompts, only results. Useful when piping a
    /// script of choices into the dictionary.
    #[arg(long, env = "DICTIONARY_NO_PROMPT")]
    no_prompt: bool,
    /// Log more. Repeat for even more (`-vvv` logs every rotation). The
    /// `RUST_LOG` environment variable overrides this.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let options = CliOpts::parse();
    logger::initialize_logger(options.verbose);
    log::debug!("{:?}", options);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(stdin.lock(), stdout.lock()).with_prompts(!options.no_prompt);
    menu.run().context("dictionary session failed")?;

    Ok(())
}

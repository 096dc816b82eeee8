//! A menu driven session over a keyword [`Dictionary`]. The session reads choices and their
//! arguments line by line and writes results back, so it can run on a terminal or on scripted
//! input.
//!
//! # Examples
//!
//! ```
//! use avl_dictionary::menu::Menu;
//!
//! let script = "1\ndog\nanimal\n5\ndog\n6\n";
//! let mut output = Vec::new();
//!
//! let mut menu = Menu::new(script.as_bytes(), &mut output).with_prompts(false);
//! menu.run().unwrap();
//! assert_eq!(menu.dictionary().len(), 1);
//! drop(menu);
//!
//! let output = String::from_utf8(output).unwrap();
//! assert!(output.contains("Meaning: animal"));
//! ```

use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use log::{debug, info};

use crate::avl::Dictionary;

/// One entry of the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    /// Insert a keyword or replace its meaning.
    AddOrUpdate,
    /// Remove a keyword.
    Delete,
    /// List every keyword from smallest to largest.
    Ascending,
    /// List every keyword from largest to smallest.
    Descending,
    /// Look a keyword up and report how many comparisons it took.
    Search,
    /// End the session.
    Exit,
}

impl Choice {
    /// Every choice in the order the menu lists them.
    pub const ALL: [Choice; 6] = [
        Choice::AddOrUpdate,
        Choice::Delete,
        Choice::Ascending,
        Choice::Descending,
        Choice::Search,
        Choice::Exit,
    ];

    /// The number a user types to pick this choice.
    pub fn number(self) -> usize {
        match self {
            Self::AddOrUpdate => 1,
            Self::Delete => 2,
            Self::Ascending => 3,
            Self::Descending => 4,
            Self::Search => 5,
            Self::Exit => 6,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::AddOrUpdate => "Add/Update Keyword",
            Self::Delete => "Delete Keyword",
            Self::Ascending => "Display Ascending",
            Self::Descending => "Display Descending",
            Self::Search => "Search Keyword",
            Self::Exit => "Exit",
        }
    }
}

/// Returned when a line doesn't name any [`Choice`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidChoice(pub String);

impl fmt::Display for InvalidChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is not a menu choice", self.0)
    }
}

impl Error for InvalidChoice {}

impl FromStr for Choice {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || InvalidChoice(s.to_string());
        let number: usize = s.parse().map_err(|_| invalid())?;
        Self::ALL
            .iter()
            .copied()
            .find(|choice| choice.number() == number)
            .ok_or_else(invalid)
    }
}

/// An interactive session reading from `R` and writing to `W`. The session owns the dictionary
/// it edits; the dictionary starts empty and lives as long as the session.
pub struct Menu<R, W> {
    input: R,
    output: W,
    dictionary: Dictionary,
    prompts: bool,
}

impl<R, W> Menu<R, W>
where
    R: BufRead,
    W: Write,
{
    /// Creates a session with an empty dictionary that prints the menu and prompts.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            dictionary: Dictionary::new(),
            prompts: true,
        }
    }

    /// Whether to print the menu and the `Enter ...:` prompts. Results are printed either way.
    pub fn with_prompts(mut self, prompts: bool) -> Self {
        self.prompts = prompts;
        self
    }

    /// The dictionary as edited so far.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Runs the menu until the user picks [`Choice::Exit`] or the input ends.
    pub fn run(&mut self) -> io::Result<()> {
        info!("dictionary session started");
        loop {
            self.print_menu()?;
            let Some(line) = self.ask("Enter choice: ")? else {
                break;
            };
            let choice = match line.parse::<Choice>() {
                Ok(choice) => choice,
                Err(e) => {
                    debug!("{}", e);
                    writeln!(self.output, "Invalid choice!")?;
                    continue;
                }
            };
            if !self.step(choice)? {
                break;
            }
        }
        info!(
            "dictionary session ended with {} entries",
            self.dictionary.len()
        );
        Ok(())
    }

    /// Carries out a single choice, reading whatever arguments it needs. Returns `false` once the
    /// session is over, either because of [`Choice::Exit`] or because the input ended.
    pub fn step(&mut self, choice: Choice) -> io::Result<bool> {
        debug!("menu choice {:?}", choice);
        match choice {
            Choice::AddOrUpdate => {
                let Some((keyword, rest)) = self.ask_keyword("Enter keyword: ")? else {
                    return Ok(false);
                };
                // Like `keyword meaning...` on one line, otherwise the meaning gets its own line.
                let meaning = match rest {
                    Some(rest) => rest,
                    None => match self.ask("Enter meaning: ")? {
                        Some(meaning) => meaning,
                        None => return Ok(false),
                    },
                };
                match self.dictionary.insert(keyword.clone(), meaning) {
                    Some(_) => writeln!(self.output, "Updated {:?}.", keyword)?,
                    None => writeln!(self.output, "Added {:?}.", keyword)?,
                }
            }
            Choice::Delete => {
                let Some(keyword) = self.ask_single_keyword("Enter keyword to delete: ")? else {
                    return Ok(false);
                };
                match self.dictionary.delete(&keyword) {
                    Some(_) => writeln!(self.output, "Deleted {:?}.", keyword)?,
                    None => writeln!(self.output, "Keyword not found.")?,
                }
            }
            Choice::Ascending => {
                writeln!(self.output, "\nDictionary (Ascending Order):")?;
                let entries = self.dictionary.ascending();
                write_entries(&mut self.output, entries)?;
            }
            Choice::Descending => {
                writeln!(self.output, "\nDictionary (Descending Order):")?;
                let entries = self.dictionary.descending();
                write_entries(&mut self.output, entries)?;
            }
            Choice::Search => {
                let Some(keyword) = self.ask_single_keyword("Enter keyword to search: ")? else {
                    return Ok(false);
                };
                let search = self.dictionary.search(&keyword);
                match search.value {
                    Some(meaning) => writeln!(self.output, "Meaning: {}", meaning)?,
                    None => writeln!(self.output, "Keyword not found.")?,
                }
                writeln!(self.output, "Comparisons: {}", search.comparisons)?;
            }
            Choice::Exit => {
                writeln!(self.output, "Exiting...")?;
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn print_menu(&mut self) -> io::Result<()> {
        if !self.prompts {
            return Ok(());
        }
        writeln!(self.output, "\n--- AVL Tree Dictionary ---")?;
        for choice in Choice::ALL {
            writeln!(self.output, "{}. {}", choice.number(), choice.label())?;
        }
        Ok(())
    }

    /// Prompts and reads one trimmed line. `None` means the input has ended. Bytes that aren't
    /// UTF-8 become `U+FFFD` rather than ending the session.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if self.prompts {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;
        }

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&line);
        if let Cow::Owned(_) = line {
            debug!("replaced invalid UTF-8 in {:?}", line);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like [`Menu::ask`] but splits off the first word of the line as the keyword. The rest of
    /// the line, if there is any, comes back too. Blank lines are asked again.
    fn ask_keyword(&mut self, prompt: &str) -> io::Result<Option<(String, Option<String>)>> {
        loop {
            let Some(line) = self.ask(prompt)? else {
                return Ok(None);
            };
            let mut words = line.splitn(2, char::is_whitespace);
            match words.next().filter(|keyword| !keyword.is_empty()) {
                Some(keyword) => {
                    let rest = words.next().map(str::trim).filter(|rest| !rest.is_empty());
                    return Ok(Some((keyword.to_string(), rest.map(str::to_string))));
                }
                None => writeln!(self.output, "Keyword cannot be empty.")?,
            }
        }
    }

    /// [`Menu::ask_keyword`] for choices that take nothing but the keyword. Anything after it is
    /// reported and skipped.
    fn ask_single_keyword(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let Some((keyword, rest)) = self.ask_keyword(prompt)? else {
            return Ok(None);
        };
        if let Some(rest) = rest {
            writeln!(self.output, "Ignoring {:?} after the keyword.", rest)?;
        }
        Ok(Some(keyword))
    }
}

fn write_entries<'a, W, I>(output: &mut W, entries: I) -> io::Result<()>
where
    W: Write,
    I: Iterator<Item = (&'a String, &'a String)>,
{
    let mut empty = true;
    for (keyword, meaning) in entries {
        writeln!(output, "{} : {}", keyword, meaning)?;
        empty = false;
    }
    if empty {
        writeln!(output, "(empty)")?;
    }
    Ok(())
}

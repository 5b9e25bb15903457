// UI layer: terminal output and prompts for the `mochi` binary.
// Results go to stdout; spinners and prompts go to the terminal through
// stderr so that piping the output stays clean.

use crate::model::{Card, Deck};
use anyhow::{Context, Result};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;

/// One line per deck: id, name and, for nested decks, the parent id.
pub fn write_decks<W: Write>(out: &mut W, decks: &[Deck]) -> io::Result<()> {
    for deck in decks {
        match &deck.parent_id {
            Some(parent) => writeln!(out, "{}\t{}\t(parent {})", deck.id, deck.name, parent)?,
            None => writeln!(out, "{}\t{}", deck.id, deck.name)?,
        }
    }
    Ok(())
}

/// Front and back of every card, separated by a blank line.
pub fn write_cards<W: Write>(out: &mut W, cards: &[Card]) -> io::Result<()> {
    for (i, card) in cards.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        let (front, back) = card.sides();
        writeln!(out, "[{}]", card.id.as_deref().unwrap_or("-"))?;
        writeln!(out, "  front: {}", front)?;
        writeln!(out, "  back:  {}", back)?;
    }
    Ok(())
}

/// Output of `mochi cards`: front/back text by default, the full card
/// records as pretty JSON when `json` is set.
pub fn write_card_listing<W: Write>(out: &mut W, cards: &[Card], json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(cards).context("Formatting cards as JSON")?;
        writeln!(out, "{}", text).context("Writing card list")?;
    } else {
        write_cards(out, cards).context("Writing card list")?;
    }
    Ok(())
}

pub fn print_decks(decks: &[Deck]) -> Result<()> {
    write_decks(&mut io::stdout().lock(), decks).context("Writing deck list")
}

pub fn print_card_listing(cards: &[Card], json: bool) -> Result<()> {
    write_card_listing(&mut io::stdout().lock(), cards, json)
}

/// Pretty-print any API payload as JSON on stdout.
pub fn print_json<S: Serialize>(value: &S) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Formatting response as JSON")?;
    println!("{}", text);
    Ok(())
}

/// Use `given` if the user passed it on the command line, otherwise ask.
pub fn prompt_side(label: &str, given: Option<String>) -> Result<String> {
    match given {
        Some(text) => Ok(text),
        None => Input::<String>::new()
            .with_prompt(label)
            .interact_text()
            .with_context(|| format!("Reading card {} from terminal", label.to_lowercase())),
    }
}

/// Show a spinner with `message` while `work` runs. The spinner is cleared
/// before returning, whatever the outcome.
pub fn with_spinner<R>(message: &str, work: impl FnOnce() -> R) -> R {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = work();
    spinner.finish_and_clear();
    result
}

// Entrypoint for the `mochi` command.
// - Keeps `main` small: parse arguments, build the client, run one command.
// - Returns `anyhow::Result` so every failure reaches the user with context.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mochi_cli::{logging, ui, Config, MochiClient};

#[derive(Parser)]
#[command(name = "mochi", version, about = "Find Mochi decks and add flashcards to them")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List decks (first page only)
    Decks,
    /// Print the id of a deck, looked up by name
    Find {
        /// Deck name, compared case-insensitively
        name: String,
        /// Only match decks nested under this parent deck id
        #[arg(long)]
        parent: Option<String>,
    },
    /// List the cards in a deck (first page only)
    Cards {
        deck_id: String,
        /// Print the raw card records instead of front/back
        #[arg(long)]
        json: bool,
    },
    /// Add a card to a deck found by name
    Add {
        #[arg(long, default_value = "Vocabulary")]
        deck: String,
        #[arg(long)]
        parent: Option<String>,
        /// Front of the card; prompted for when omitted
        #[arg(long)]
        front: Option<String>,
        /// Back of the card; prompted for when omitted
        #[arg(long)]
        back: Option<String>,
    },
}

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    // Credentials come from MOCHI_API_KEY (or .env / ~/.mochi_api_key).
    let config = Config::from_env()?;
    let api = MochiClient::new(config).context("Failed to build HTTP client")?;

    match cli.command {
        Command::Decks => {
            let decks = ui::with_spinner("Fetching decks...", || api.list_decks())
                .context("Listing decks")?;
            ui::print_decks(&decks)?;
        }
        Command::Find { name, parent } => {
            let deck_id = api
                .find_deck_id(&name, parent.as_deref())
                .context("Looking up deck")?;
            match deck_id {
                Some(id) => println!("{}", id),
                None => not_found(&name),
            }
        }
        Command::Cards { deck_id, json } => {
            let cards = ui::with_spinner("Fetching cards...", || api.list_cards(&deck_id))
                .context("Listing cards")?;
            ui::print_card_listing(&cards, json)?;
        }
        Command::Add {
            deck,
            parent,
            front,
            back,
        } => {
            let deck_id = api
                .find_deck_id(&deck, parent.as_deref())
                .context("Looking up deck")?;
            let Some(deck_id) = deck_id else {
                not_found(&deck);
            };
            println!("Found deck id: {}", deck_id);

            let front = ui::prompt_side("Front", front)?;
            let back = ui::prompt_side("Back", back)?;
            let card = ui::with_spinner("Creating card...", || {
                api.create_card(&deck_id, &front, &back)
            })
            .context("Creating card")?;
            ui::print_json(&card)?;
        }
    }
    Ok(())
}

fn not_found(name: &str) -> ! {
    eprintln!("Could not find deck with name: {}", name);
    std::process::exit(1);
}

// Library root
// -----------
// A small client for the Mochi flashcard API. The binary (`main.rs`) is a
// thin command line over these modules.
//
// Module responsibilities:
// - `config`: gathers the API key, base URL and page size into a value
//   handed to the client.
// - `transport`: the HTTP seam; a reqwest blocking client in production.
// - `api`: the operations (list decks, find a deck, list cards, add a card).
// - `model`: deck and card shapes plus the deck filter.
// - `error`: the `ApiError` every operation fails with.
// - `ui` / `logging`: terminal output and tracing setup for the binary.
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod transport;
pub mod ui;

pub use api::MochiClient;
pub use config::Config;
pub use error::ApiError;
pub use model::{format_card_content, Card, Deck, DeckFilter};

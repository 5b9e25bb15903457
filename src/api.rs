// API client module: a small blocking client for the Mochi flashcard API.
//
// Every operation is one synchronous round-trip. The client owns its
// configuration (API key, base URL, page size) and a `Transport`, which is
// the reqwest blocking client in production and a stub in tests.

use crate::config::Config;
use crate::error::ApiError;
use crate::model::{Card, Deck, DeckFilter, NewCard, Page};
use crate::transport::{BasicAuth, HttpTransport, Method, Request, Transport};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Client for the Mochi API. Generic over the transport so tests can run
/// without a network.
#[derive(Clone)]
pub struct MochiClient<T = HttpTransport> {
    config: Config,
    transport: T,
}

impl MochiClient<HttpTransport> {
    /// Create a client that talks to the real service.
    pub fn new(config: Config) -> Result<Self, ApiError> {
        Ok(Self::with_transport(config, HttpTransport::new()?))
    }
}

impl<T: Transport> MochiClient<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        MochiClient { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one authenticated request to `base_url + path` and decode the
    /// JSON answer.
    ///
    /// `body` must be a flat JSON object; it is sent form-encoded. Any
    /// non-2xx status becomes `ApiError::Status` with the body untouched.
    pub fn issue_request(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.config.base_url, path);
        self.send(url, method, body)
    }

    fn send(&self, url: String, method: Method, body: Option<&Value>) -> Result<Value, ApiError> {
        let request = Request {
            method,
            url,
            auth: BasicAuth {
                username: self.config.api_key.clone(),
                password: String::new(),
            },
            form: body.map(form_fields).transpose()?,
        };
        debug!(method = %request.method, url = %request.url, "sending request");

        let res = self.transport.send(&request)?;
        if !res.is_success() {
            warn!(status = res.status, url = %request.url, "request rejected");
            return Err(ApiError::Status {
                status: res.status,
                body: res.body,
            });
        }

        if res.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&res.body).map_err(|source| ApiError::Decode {
            source,
            body: res.body,
        })
    }

    /// First page of decks, in the order the service returns them.
    pub fn list_decks(&self) -> Result<Vec<Deck>, ApiError> {
        let page: Page<Deck> = self.fetch_page("decks", Vec::new())?;
        log_unfollowed_bookmark(&page);
        Ok(page.docs)
    }

    /// First deck on the listing that satisfies `filter`.
    pub fn find_deck(&self, filter: &DeckFilter) -> Result<Option<Deck>, ApiError> {
        let deck = self.list_decks()?.into_iter().find(|d| filter.matches(d));
        match &deck {
            Some(d) => debug!(id = %d.id, name = filter.name(), "deck found"),
            None => debug!(name = filter.name(), "no matching deck"),
        }
        Ok(deck)
    }

    /// Id of the first deck called `name` (any case), optionally restricted
    /// to children of `parent_id`. Deck names are not unique, so passing the
    /// parent is the way to disambiguate.
    pub fn find_deck_id(
        &self,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Option<String>, ApiError> {
        let filter = DeckFilter::by_name(name).with_parent(parent_id);
        Ok(self.find_deck(&filter)?.map(|d| d.id))
    }

    /// First page of cards in a deck.
    pub fn list_cards(&self, deck_id: &str) -> Result<Vec<Card>, ApiError> {
        let query = vec![("deck-id", deck_id.to_string())];
        let page: Page<Card> = self.fetch_page("cards/", query)?;
        log_unfollowed_bookmark(&page);
        Ok(page.docs)
    }

    /// Create a card whose content is `front`, a `---` line, then `back`.
    pub fn create_card(&self, deck_id: &str, front: &str, back: &str) -> Result<Card, ApiError> {
        let body = serde_json::to_value(NewCard::new(deck_id, front, back))
            .map_err(|e| ApiError::Encode(e.to_string()))?;
        let value = self.issue_request("cards", Method::POST, Some(&body))?;
        let card: Card = decode(value)?;
        info!(id = ?card.id, deck_id, "card created");
        Ok(card)
    }

    /// GET a listing endpoint. Query values are percent-encoded, and the
    /// configured page limit is appended last.
    fn fetch_page<R: DeserializeOwned>(
        &self,
        path: &str,
        mut query: Vec<(&str, String)>,
    ) -> Result<R, ApiError> {
        if let Some(limit) = self.config.page_limit {
            query.push(("limit", limit.to_string()));
        }
        let url = endpoint(&self.config.base_url, path, &query)?;
        decode(self.send(url, Method::GET, None)?)
    }
}

fn endpoint(base_url: &str, path: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
    let mut url = Url::parse(&format!("{}{}", base_url, path))
        .map_err(|e| ApiError::Encode(format!("invalid URL {}{}: {}", base_url, path, e)))?;
    if !query.is_empty() {
        // Only touch the query when there is one, or the URL gains a bare `?`.
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url.into())
}

fn decode<R: DeserializeOwned>(value: Value) -> Result<R, ApiError> {
    // Re-serializing only happens on the error path, to keep the body around.
    R::deserialize(&value).map_err(|source| ApiError::Decode {
        source,
        body: value.to_string(),
    })
}

fn log_unfollowed_bookmark<D>(page: &Page<D>) {
    if let Some(bookmark) = &page.bookmark {
        debug!(count = page.docs.len(), %bookmark, "only the first page is used");
    }
}

/// Flatten a JSON object into form fields. Strings go as-is, other scalars
/// as their JSON text.
fn form_fields(body: &Value) -> Result<Vec<(String, String)>, ApiError> {
    let object = body
        .as_object()
        .ok_or_else(|| ApiError::Encode(format!("body must be a JSON object, got {}", body)))?;
    object
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Bool(_) | Value::Number(_) => value.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => {
                    return Err(ApiError::Encode(format!(
                        "field {:?} cannot be sent as a form value",
                        key
                    )))
                }
            };
            Ok((key.clone(), text))
        })
        .collect()
}

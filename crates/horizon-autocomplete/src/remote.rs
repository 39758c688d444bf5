//! Remote endpoint source.
//!
//! Queries an HTTP endpoint with `GET <endpoint>?query=<text>` and expects a
//! JSON array of strings or `{label, value}` records. At most one request per
//! source is outstanding: starting a fetch aborts the previous one. Every
//! failure (connection, status, payload) is logged and delivered as an empty
//! candidate sequence.

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use url::Url;

use horizon_autocomplete_core::logging::targets;

use crate::candidate::RawItem;
use crate::error::{AutocompleteError, Result, SourceError};
use crate::source::{CandidateSource, Responder};

/// Name of the query-string parameter carrying the lookup text.
pub const QUERY_PARAM: &str = "query";

/// A [`CandidateSource`] backed by an HTTP endpoint.
pub struct RemoteSource {
    client: reqwest::Client,
    endpoint: Url,
    runtime: Handle,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl RemoteSource {
    /// Create a source on the current tokio runtime.
    ///
    /// Fails if `endpoint` is not a valid URL or no runtime is running.
    pub fn new(endpoint: &str) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| AutocompleteError::NoRuntime)?;
        Self::with_runtime(endpoint, runtime)
    }

    /// Create a source that spawns its requests on `runtime`.
    pub fn with_runtime(endpoint: &str, runtime: Handle) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: Url::parse(endpoint)?,
            runtime,
            in_flight: Mutex::new(None),
        })
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, headers).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The endpoint being queried.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Whether a request is currently outstanding.
    pub fn is_fetching(&self) -> bool {
        self.in_flight
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

async fn fetch_items(
    client: &reqwest::Client,
    endpoint: Url,
    query: &str,
) -> std::result::Result<Vec<RawItem>, SourceError> {
    let response = client
        .get(endpoint)
        .query(&[(QUERY_PARAM, query)])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status(status.as_u16()));
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

impl CandidateSource for RemoteSource {
    fn fetch(&self, query: &str, responder: Responder) {
        let mut in_flight = self.in_flight.lock();
        if let Some(previous) = in_flight.take() {
            if !previous.is_finished() {
                tracing::debug!(target: targets::SOURCE, "aborting superseded remote fetch");
                previous.abort();
            }
        }

        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let query = query.to_owned();
        *in_flight = Some(self.runtime.spawn(async move {
            let items = match fetch_items(&client, endpoint, &query).await {
                Ok(items) => items,
                Err(err) => {
                    tracing::debug!(target: targets::SOURCE, %err, query = %query, "remote fetch failed, delivering no suggestions");
                    Vec::new()
                }
            };
            responder.respond(items);
        }));
    }
}

impl std::fmt::Debug for RemoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSource")
            .field("endpoint", &self.endpoint.as_str())
            .field("fetching", &self.is_fetching())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_without_runtime_fails() {
        assert!(matches!(
            RemoteSource::new("http://localhost/suggest"),
            Err(AutocompleteError::NoRuntime)
        ));
    }

    #[tokio::test]
    async fn test_invalid_endpoint() {
        assert!(matches!(
            RemoteSource::new("not a url"),
            Err(AutocompleteError::InvalidEndpoint(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_new_fetch_aborts_previous() {
        use crate::source::{response_pair, SlotState};
        use std::time::Duration;
        use wiremock::matchers::query_param;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(query_param(QUERY_PARAM, "ap"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!(["apple"]))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
        Mock::given(query_param(QUERY_PARAM, "apr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["apricot"])))
            .mount(&server)
            .await;

        let source = RemoteSource::new(&format!("{}/suggest", server.uri())).unwrap();
        let (first, mut first_slot) = response_pair();
        source.fetch("ap", first);
        assert!(source.is_fetching());

        let (second, mut second_slot) = response_pair();
        source.fetch("apr", second);

        // The aborted task drops its responder, which reads as a null delivery.
        let mut superseded = None;
        for _ in 0..100 {
            if let SlotState::Ready(delivery) = first_slot.try_take() {
                superseded = Some(delivery);
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(superseded, Some(None));

        let mut current = None;
        for _ in 0..100 {
            if let SlotState::Ready(delivery) = second_slot.try_take() {
                current = Some(delivery);
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(current, Some(Some(vec![RawItem::text("apricot")])));
    }

    #[tokio::test]
    async fn test_endpoint_is_parsed() {
        let source = RemoteSource::new("http://localhost:9/suggest").unwrap();
        assert_eq!(source.endpoint().path(), "/suggest");
        assert!(!source.is_fetching());
    }
}

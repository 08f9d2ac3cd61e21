//! Invocation contract — one action in, one callback out

use anyhow::Result;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::action;
use crate::config::FetcherConfig;
use crate::error::FetchError;
use crate::http::HttpFetcher;
use crate::outcome::Outcome;

/// Terminal callback. `FnOnce` rules out a second delivery.
pub type Callback = Box<dyn FnOnce(Outcome) + Send + 'static>;

/// A single request: which endpoint to hit and where to deliver the outcome.
pub struct Invocation {
    /// `None` selects the legacy ersttermin search.
    pub action: Option<String>,
    pub callback: Callback,
}

impl Invocation {
    pub fn new<F>(action: Option<&str>, callback: F) -> Self
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        Self {
            action: action.map(str::to_string),
            callback: Box::new(callback),
        }
    }

    /// An invocation whose outcome arrives on the returned receiver.
    pub fn channel(action: Option<&str>) -> (Self, oneshot::Receiver<Outcome>) {
        let (tx, rx) = oneshot::channel();
        let invocation = Self::new(action, move |outcome| {
            // The receiver may have been dropped; nothing left to notify.
            let _ = tx.send(outcome);
        });
        (invocation, rx)
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

/// Composes the action resolver and the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct Client {
    fetcher: HttpFetcher,
}

impl Client {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self { fetcher }
    }

    pub fn from_config(config: &FetcherConfig) -> Result<Self> {
        let credential = config.credential()?;
        let fetcher = HttpFetcher::new(
            &config.service.base_url,
            &credential,
            config.request.timeout(),
        )?;
        Ok(Self::new(fetcher))
    }

    pub fn fetcher(&self) -> &HttpFetcher {
        &self.fetcher
    }

    /// Resolve `action` against `page_path` and perform the request.
    /// An unknown action fails before anything is sent.
    pub async fn fetch(&self, action: Option<&str>, page_path: &str) -> Result<String, FetchError> {
        let path = action::resolve(action, page_path)?;
        self.fetcher.get(&path).await
    }

    /// Run `invocation` and call its callback exactly once.
    pub async fn invoke(&self, page_path: &str, invocation: Invocation) {
        let Invocation { action, callback } = invocation;
        let result = self.fetch(action.as_deref(), page_path).await;
        deliver(action.as_deref(), result, callback);
    }

    /// Like [`invoke`](Self::invoke); `token` aborts the in-flight request and
    /// the callback then receives `Cancelled`.
    pub async fn invoke_cancellable(
        &self,
        page_path: &str,
        invocation: Invocation,
        token: &CancellationToken,
    ) {
        let Invocation { action, callback } = invocation;
        let result = match action::resolve(action.as_deref(), page_path) {
            Ok(path) => self.fetcher.get_cancellable(&path, token).await,
            Err(e) => Err(e),
        };
        deliver(action.as_deref(), result, callback);
    }
}

fn deliver(action: Option<&str>, result: Result<String, FetchError>, callback: Callback) {
    match &result {
        Ok(body) => debug!(action = ?action, bytes = body.len(), "invocation resolved"),
        Err(e) => debug!(action = ?action, "invocation rejected: {e}"),
    }
    callback(Outcome::from(result));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Credential;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn unreachable_client() -> Client {
        let fetcher =
            HttpFetcher::new("http://127.0.0.1:1", &Credential::from_code("CODE"), None).unwrap();
        Client::new(fetcher)
    }

    #[tokio::test]
    async fn test_unknown_action_delivered_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let invocation = Invocation::new(Some("get_nothing"), move |outcome| {
            seen.fetch_add(1, Ordering::SeqCst);
            assert_eq!(
                outcome,
                Outcome::Failure(FetchError::UnknownAction("get_nothing".into()))
            );
        });

        unreachable_client().invoke("/", invocation).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_channel_receives_transport_failure() {
        let (invocation, rx) = Invocation::channel(Some("get_version"));
        unreachable_client().invoke("/", invocation).await;
        let outcome = rx.await.unwrap();
        assert!(matches!(
            outcome,
            Outcome::Failure(FetchError::Transport { status: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_channel_dropped_receiver_does_not_panic() {
        let (invocation, rx) = Invocation::channel(Some("get_unknown"));
        drop(rx);
        unreachable_client().invoke("/", invocation).await;
    }

    #[tokio::test]
    async fn test_cancelled_invocation() {
        let token = CancellationToken::new();
        token.cancel();
        let (invocation, rx) = Invocation::channel(None);
        unreachable_client()
            .invoke_cancellable("/terminservice/suche/A/B/C", invocation, &token)
            .await;
        assert_eq!(rx.await.unwrap(), Outcome::Failure(FetchError::Cancelled));
    }

    #[test]
    fn test_from_config_requires_credential() {
        assert!(Client::from_config(&FetcherConfig::default()).is_err());
    }

    #[test]
    fn test_invocation_debug_omits_callback() {
        let invocation = Invocation::new(Some("get_version"), |_| {});
        let dbg = format!("{invocation:?}");
        assert!(dbg.contains("get_version"));
    }
}

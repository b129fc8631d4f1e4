use std::future::Future;

use tracing::{debug, warn};

use crate::errors::ApiError;

/// Which failures mean "this path is not here, try the next one".
///
/// Only not-found/method-not-allowed advance; auth errors, server errors and
/// network failures end the walk immediately.
#[derive(Clone, Debug)]
pub struct FallbackPolicy {
    advance_on: Vec<u16>,
}

impl Default for FallbackPolicy {
    fn default() -> Self { Self { advance_on: vec![404, 405] } }
}

impl FallbackPolicy {
    pub fn should_advance(&self, error: &ApiError) -> bool {
        error.status().is_some_and(|s| self.advance_on.contains(&s))
    }
}

/// Run `attempt` against each candidate in order, strictly one at a time.
/// The first success wins; exhausting the list yields `NoEndpointAvailable`.
pub async fn first_available<S, F, Fut, T>(
    policy: &FallbackPolicy,
    candidates: &[S],
    mut attempt: F,
) -> Result<T, ApiError>
where
    S: AsRef<str>,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut tried = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let path = candidate.as_ref().to_string();
        tried.push(path.clone());

        match attempt(path.clone()).await {
            Ok(value) => {
                if tried.len() > 1 {
                    debug!(%path, attempts = tried.len(), "endpoint resolved after fallback");
                }
                return Ok(value);
            }
            Err(error) if policy.should_advance(&error) => {
                debug!(%path, status = ?error.status(), "endpoint unavailable, trying next candidate");
            }
            Err(error) => {
                warn!(%path, error = %error, "request failed");
                return Err(error);
            }
        }
    }

    Err(ApiError::NoEndpointAvailable { tried })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn status(code: u16) -> ApiError { ApiError::Status { status: code, body: None } }

    #[tokio::test]
    async fn advances_past_404_and_405() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let result = first_available(&FallbackPolicy::default(), &["/a", "/b", "/c"], |path| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push(path.clone());
                match path.as_str() {
                    "/a" => Err(status(404)),
                    "/b" => Err(status(405)),
                    _ => Ok(path),
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "/c");
        assert_eq!(*seen.lock().unwrap(), vec!["/a", "/b", "/c"]);
    }

    #[tokio::test]
    async fn stops_on_auth_error() {
        let seen = Arc::new(Mutex::new(0u32));
        let counter = seen.clone();
        let result: Result<(), _> = first_available(&FallbackPolicy::default(), &["/a", "/b"], |_| {
            let counter = counter.clone();
            async move {
                *counter.lock().unwrap() += 1;
                Err(status(401))
            }
        })
        .await;

        assert_eq!(result.unwrap_err().status(), Some(401));
        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn network_failure_is_terminal() {
        let result: Result<(), _> = first_available(&FallbackPolicy::default(), &["/a", "/b"], |_| async {
            Err(ApiError::Network("connection refused".into()))
        })
        .await;
        assert!(matches!(result, Err(ApiError::Network(_))));
    }

    #[tokio::test]
    async fn exhaustion_reports_every_path() {
        let result: Result<(), _> = first_available(&FallbackPolicy::default(), &["/a", "/b"], |_| async {
            Err(status(404))
        })
        .await;
        match result {
            Err(ApiError::NoEndpointAvailable { tried }) => assert_eq!(tried, vec!["/a", "/b"]),
            other => panic!("unexpected: {other:?}"),
        }

        let empty: [&str; 0] = [];
        let result: Result<(), _> = first_available(&FallbackPolicy::default(), &empty, |_| async { Ok(()) }).await;
        assert!(matches!(result, Err(ApiError::NoEndpointAvailable { .. })));
    }
}

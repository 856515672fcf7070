//! Browser-based social sign-in.
//!
//! The login API answers a social sign-in with a provider URL instead of a
//! token. A `WebAuthFlow` opens that URL and watches the redirects; once the
//! browser lands on the callback URL, the flow hands the token back through
//! the one-shot `SocialCompletion` it was given. The caller's future stays
//! pending until then.

use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::login::types::{token_from_url, AuthToken};

/// Opens a URL for the user and reports how the sign-in ended.
///
/// `start` must return promptly. The flow either calls one of the
/// completion methods or drops `completion`, which ends the sign-in as
/// cancelled.
pub trait WebAuthFlow: Send + Sync {
    fn start(&self, url: &str, callback_url: &str, completion: SocialCompletion);
}

/// One-shot channel back to the waiting sign-in.
#[derive(Debug)]
pub struct SocialCompletion {
    tx: oneshot::Sender<String>,
    callback_url: String,
}

impl SocialCompletion {
    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    /// Finish the sign-in with `token`.
    pub fn complete(self, token: impl Into<String>) {
        // The waiter may have timed out already.
        let _ = self.tx.send(token.into());
    }

    /// Finish the sign-in from a redirect the browser followed.
    ///
    /// Hands the completion back when `redirect_url` is not the callback
    /// or carries no token, so the flow can keep watching.
    pub fn complete_with_redirect(self, redirect_url: &str) -> Result<(), Self> {
        match token_from_redirect(redirect_url, &self.callback_url) {
            Some(token) => {
                self.complete(token);
                Ok(())
            }
            None => Err(self),
        }
    }

    /// `true` once the waiting side is gone.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Token from a redirect to `callback_url`, `None` for any other URL.
pub fn token_from_redirect(redirect_url: &str, callback_url: &str) -> Option<String> {
    if !redirect_url.starts_with(callback_url) {
        return None;
    }
    token_from_url(redirect_url)
}

/// Hand `url` to `flow` and wait for the token, at most `timeout`.
pub async fn run_web_flow(
    flow: &dyn WebAuthFlow,
    url: &str,
    callback_url: &str,
    timeout: Option<Duration>,
) -> ApiResult<AuthToken> {
    let (tx, rx) = oneshot::channel();
    debug!(url, "starting social sign-in");
    flow.start(
        url,
        callback_url,
        SocialCompletion {
            tx,
            callback_url: callback_url.to_string(),
        },
    );

    let received = match timeout {
        Some(limit) => tokio::time::timeout(limit, rx).await.map_err(|_| {
            warn!(?limit, "social sign-in timed out");
            ApiError::SocialAuthTimeout(limit)
        })?,
        None => rx.await,
    };

    match received {
        Ok(token) => Ok(AuthToken { token }),
        Err(_) => {
            warn!("social sign-in abandoned");
            Err(ApiError::SocialAuthCancelled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const CALLBACK: &str = "https://login.xsolla.com/api/blank";

    /// Completes as soon as it is started.
    struct ImmediateFlow(&'static str);

    impl WebAuthFlow for ImmediateFlow {
        fn start(&self, _url: &str, _callback_url: &str, completion: SocialCompletion) {
            completion.complete(self.0);
        }
    }

    /// Drops the completion.
    struct ClosedFlow;

    impl WebAuthFlow for ClosedFlow {
        fn start(&self, _url: &str, _callback_url: &str, _completion: SocialCompletion) {}
    }

    /// Keeps the completion until the test decides.
    #[derive(Default)]
    struct HeldFlow {
        opened: Mutex<Option<String>>,
        pending: Mutex<Option<SocialCompletion>>,
    }

    impl WebAuthFlow for HeldFlow {
        fn start(&self, url: &str, _callback_url: &str, completion: SocialCompletion) {
            *self.opened.lock().unwrap() = Some(url.to_string());
            *self.pending.lock().unwrap() = Some(completion);
        }
    }

    #[test]
    fn redirect_must_target_the_callback() {
        assert_eq!(
            token_from_redirect(&format!("{CALLBACK}?token=abc"), CALLBACK).as_deref(),
            Some("abc")
        );
        assert_eq!(
            token_from_redirect("https://evil.test/api/blank?token=abc", CALLBACK),
            None
        );
        assert_eq!(token_from_redirect(CALLBACK, CALLBACK), None);
    }

    #[tokio::test]
    async fn immediate_completion_resolves() {
        let token = run_web_flow(&ImmediateFlow("tok"), "https://provider.test", CALLBACK, None)
            .await
            .unwrap();
        assert_eq!(token.token, "tok");
    }

    #[tokio::test]
    async fn dropped_completion_is_cancelled() {
        let err = run_web_flow(&ClosedFlow, "https://provider.test", CALLBACK, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::SocialAuthCancelled));
    }

    #[tokio::test]
    async fn resolves_only_after_completion_fires() {
        let flow = Arc::new(HeldFlow::default());
        let running = flow.clone();
        let handle = tokio::spawn(async move {
            run_web_flow(running.as_ref(), "https://provider.test/auth", CALLBACK, None).await
        });

        while flow.pending.lock().unwrap().is_none() {
            tokio::task::yield_now().await;
        }
        assert_eq!(
            flow.opened.lock().unwrap().as_deref(),
            Some("https://provider.test/auth")
        );
        tokio::task::yield_now().await;
        assert!(!handle.is_finished());

        let completion = flow.pending.lock().unwrap().take().unwrap();
        let completion = completion
            .complete_with_redirect("https://provider.test/consent")
            .unwrap_err();
        completion
            .complete_with_redirect(&format!("{CALLBACK}?token=late"))
            .unwrap();

        let token = handle.await.unwrap().unwrap();
        assert_eq!(token.token, "late");
    }

    #[tokio::test(start_paused = true)]
    async fn pending_flow_times_out() {
        let flow = HeldFlow::default();
        let err = run_web_flow(
            &flow,
            "https://provider.test",
            CALLBACK,
            Some(Duration::from_secs(600)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::SocialAuthTimeout(d) if d == Duration::from_secs(600)));

        let completion = flow.pending.lock().unwrap().take().unwrap();
        assert!(completion.is_abandoned());
        completion.complete("too late");
    }
}

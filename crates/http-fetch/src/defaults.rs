//! Request defaults and per-call options
//!
//! Every request starts from a [`RequestInit`] read out of a [`Defaults`]
//! cell at call time, then per-call [`RequestOptions`] are laid on top.
//! Replacing the defaults swaps the whole value, so a call never observes a
//! half-updated configuration; requests already built keep what they read.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock, RwLock};

use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::headers::{merge_headers, IntoHeaders};
use crate::request::{Credentials, RequestMode};

/// Baseline options applied to every request
#[derive(Debug, Clone, Default)]
pub struct RequestInit {
    /// Headers sent with every request
    pub headers: HeaderMap,
    /// Credentials policy, `same-origin` unless changed
    pub credentials: Credentials,
    /// Request mode, left to the executor when unset
    pub mode: Option<RequestMode>,
    /// Signal shared by every request
    pub signal: Option<CancellationToken>,
}

impl RequestInit {
    /// Set the default headers
    pub fn with_headers<H: IntoHeaders>(mut self, headers: H) -> Result<Self> {
        self.headers = headers.into_headers()?;
        Ok(self)
    }

    /// Set the credentials policy
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set the request mode
    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Lay per-call options on top of these defaults
    ///
    /// Per-call values win; headers are merged name by name.
    pub fn merge(&self, options: &RequestOptions) -> RequestInit {
        RequestInit {
            headers: merge_headers(&self.headers, &options.headers),
            credentials: options.credentials.unwrap_or(self.credentials),
            mode: options.mode.or(self.mode),
            signal: options.signal.clone().or_else(|| self.signal.clone()),
        }
    }
}

/// Per-call request options
///
/// Method and body are not options: the dispatcher sets them.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Headers overriding the defaults
    pub headers: HeaderMap,
    /// Credentials policy override
    pub credentials: Option<Credentials>,
    /// Request mode override
    pub mode: Option<RequestMode>,
    /// Cancellation signal for this call
    pub signal: Option<CancellationToken>,
}

impl RequestOptions {
    /// Empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the headers
    pub fn headers<H: IntoHeaders>(mut self, headers: H) -> Result<Self> {
        self.headers = headers.into_headers()?;
        Ok(self)
    }

    /// Add one header
    pub fn header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::from_bytes(key.as_ref().as_bytes())?;
        self.headers
            .append(name, HeaderValue::from_str(value.as_ref())?);
        Ok(self)
    }

    /// Override the credentials policy
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Override the request mode
    pub fn mode(mut self, mode: RequestMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Attach a cancellation signal
    pub fn signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }
}

/// Shared, replaceable [`RequestInit`]
///
/// Clones point at the same cell. Use [`Defaults::global`] for the
/// process-wide instance, or [`Defaults::new`] for an injected one.
#[derive(Debug, Clone, Default)]
pub struct Defaults {
    inner: Arc<RwLock<Arc<RequestInit>>>,
}

static GLOBAL: LazyLock<Defaults> = LazyLock::new(Defaults::default);

impl Defaults {
    /// Independent cell holding `init`
    pub fn new(init: RequestInit) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(init))),
        }
    }

    /// Process-wide cell used by the free functions and [`Fetch::new`](crate::Fetch::new)
    pub fn global() -> Self {
        GLOBAL.clone()
    }

    /// Current defaults
    pub fn get(&self) -> Arc<RequestInit> {
        self.inner
            .read()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }

    /// Replace the defaults, returning the previous ones
    pub fn set(&self, init: RequestInit) -> Arc<RequestInit> {
        let mut current = self.inner.write().unwrap_or_else(|err| err.into_inner());
        std::mem::replace(&mut *current, Arc::new(init))
    }
}

/// Current process-wide defaults
pub fn init() -> Arc<RequestInit> {
    GLOBAL.get()
}

/// Replace the process-wide defaults, returning the previous ones
pub fn set_init(init: RequestInit) -> Arc<RequestInit> {
    tracing::debug!(credentials = ?init.credentials, mode = ?init.mode, "Replacing request defaults");
    GLOBAL.set(init)
}

/// Serializable description of [`RequestInit`], for loading defaults from
/// configuration files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Credentials policy
    pub credentials: Credentials,
    /// Request mode
    pub mode: Option<RequestMode>,
    /// Default headers
    pub headers: BTreeMap<String, String>,
}

impl TryFrom<DefaultsConfig> for RequestInit {
    type Error = Error;

    fn try_from(config: DefaultsConfig) -> Result<Self> {
        Ok(RequestInit {
            headers: config.headers.into_headers()?,
            credentials: config.credentials,
            mode: config.mode,
            signal: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use http::header::ACCEPT;

    use super::*;

    #[test]
    fn test_default_credentials_same_origin() {
        let init = RequestInit::default();
        assert_eq!(init.credentials, Credentials::SameOrigin);
        assert!(init.headers.is_empty());
        assert!(init.mode.is_none());
    }

    #[test]
    fn test_merge_options_win() {
        let defaults = RequestInit::default()
            .with_headers([("accept", "text/plain"), ("x-app", "demo")])
            .expect("valid headers")
            .with_mode(RequestMode::SameOrigin);
        let options = RequestOptions::new()
            .header("Accept", "application/json")
            .expect("valid header")
            .credentials(Credentials::Include);

        let merged = defaults.merge(&options);

        assert_eq!(merged.headers.get(ACCEPT).expect("accept"), "application/json");
        assert_eq!(merged.headers.get("x-app").expect("x-app"), "demo");
        assert_eq!(merged.credentials, Credentials::Include);
        assert_eq!(merged.mode, Some(RequestMode::SameOrigin));

        assert_eq!(defaults.headers.get(ACCEPT).expect("accept"), "text/plain");
        assert_eq!(defaults.credentials, Credentials::SameOrigin);
        assert!(options.mode.is_none());
    }

    #[test]
    fn test_merge_signal() {
        let shared = CancellationToken::new();
        let defaults = RequestInit {
            signal: Some(shared.clone()),
            ..Default::default()
        };

        let merged = defaults.merge(&RequestOptions::new());
        shared.cancel();
        assert!(merged.signal.expect("signal").is_cancelled());

        let own = CancellationToken::new();
        let merged = defaults.merge(&RequestOptions::new().signal(own));
        assert!(!merged.signal.expect("signal").is_cancelled());
    }

    #[test]
    fn test_defaults_swap() {
        let defaults = Defaults::new(RequestInit::default());
        let clone = defaults.clone();
        let before = defaults.get();

        let previous = clone.set(
            RequestInit::default()
                .with_credentials(Credentials::Include)
                .with_mode(RequestMode::Cors),
        );

        assert_eq!(previous.credentials, Credentials::SameOrigin);
        assert_eq!(before.credentials, Credentials::SameOrigin);
        assert_eq!(defaults.get().credentials, Credentials::Include);
        assert_eq!(defaults.get().mode, Some(RequestMode::Cors));
    }

    #[test]
    fn test_config_into_request_init() {
        let config: DefaultsConfig = serde_json::from_str(
            r#"{
                "credentials": "include",
                "mode": "cors",
                "headers": { "X-Requested-With": "XMLHttpRequest" }
            }"#,
        )
        .expect("valid config");

        let init = RequestInit::try_from(config).expect("valid init");
        assert_eq!(init.credentials, Credentials::Include);
        assert_eq!(init.mode, Some(RequestMode::Cors));
        assert_eq!(
            init.headers.get("x-requested-with").expect("header"),
            "XMLHttpRequest"
        );
    }

    #[test]
    fn test_config_defaults_and_unknown_fields() {
        let config: DefaultsConfig = serde_json::from_str("{}").expect("empty config");
        assert_eq!(config, DefaultsConfig::default());

        let result: std::result::Result<DefaultsConfig, _> =
            serde_json::from_str(r#"{ "retries": 3 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_rejects_invalid_header() {
        let config = DefaultsConfig {
            headers: BTreeMap::from([("bad header".to_string(), "x".to_string())]),
            ..Default::default()
        };
        assert!(matches!(
            RequestInit::try_from(config),
            Err(Error::InvalidHeader(_))
        ));
    }
}

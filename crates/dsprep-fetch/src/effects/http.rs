use std::io::Read;

/// An open response whose body has not been read yet.
pub struct Response {
    /// Value of `Content-Length`, if the server sent one.
    pub content_length: Option<u64>,
    pub body: Box<dyn Read + Send>,
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Blocking HTTP client abstraction.
///
/// This is the minimal interface the [`crate::Fetcher`] needs. Implementations
/// follow redirects and apply their own timeouts.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest::blocking`
/// - Mock implementations for testing
pub trait HttpClient {
    /// Error type for HTTP operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue a GET request and hand back the unread body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (DNS failure, connection error,
    /// etc.) or the server answers with a 4xx/5xx status.
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> std::result::Result<Response, Self::Error>;
}

impl<C: HttpClient + ?Sized> HttpClient for &C {
    type Error = C::Error;

    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> std::result::Result<Response, Self::Error> {
        (**self).get(url, headers)
    }
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use crate::data::Timeouts;
    use crate::error::{FetchError, Result};

    const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

    /// Production HTTP client implementation using `reqwest::blocking`.
    ///
    /// Must not be created or used from inside an async runtime.
    pub struct ReqwestClient {
        client: reqwest::blocking::Client,
    }

    impl ReqwestClient {
        /// Create a client with [`Timeouts::default`].
        pub fn new() -> Result<Self> {
            Self::with_timeouts(Timeouts::default())
        }

        pub fn with_timeouts(timeouts: Timeouts) -> Result<Self> {
            let client = reqwest::blocking::Client::builder()
                .user_agent(USER_AGENT)
                .connect_timeout(timeouts.connect)
                .timeout(timeouts.total)
                .build()
                .map_err(|e| FetchError::Client(Box::new(e)))?;
            Ok(Self { client })
        }

        /// Wrap a preconfigured client (proxies, TLS roots, ...).
        pub fn from_client(client: reqwest::blocking::Client) -> Self {
            Self { client }
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        fn get(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> std::result::Result<Response, Self::Error> {
            let mut request = self.client.get(url);

            for (key, value) in headers {
                request = request.header(key.as_str(), value.as_str());
            }

            let response = request.send()?.error_for_status()?;
            let content_length = response.content_length();

            Ok(Response {
                content_length,
                body: Box::new(response),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;

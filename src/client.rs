//! Address validation client.
//!
//! The [`Client`] type is the main entry point for lookups. Use
//! [`ClientBuilder`] to configure and create clients.

use crate::{
    address::{AddressInput, AddressOptional, Credentials},
    candidate::AddressCandidate,
    request::{build_get_request, build_post_request},
    response::parse_response,
    transport::{PreparedRequest, ReqwestTransport, Transport},
    Error, Response, Result,
};
use http::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// The provider's street-address endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.smartystreets.com/street-address";

/// A client for the US street-address API.
///
/// The client is cheap to clone and can be shared between tasks; every
/// lookup is a single, independent HTTP call.
///
/// # Examples
///
/// ```no_run
/// use smarty_street::{AddressInput, AddressOptional, Client, Credentials};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), smarty_street::Error> {
/// let client = Client::builder()
///     .credentials(Credentials::new("my-auth-id", "my-auth-token"))
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// // Single lookup over GET
/// let input = AddressInput::new()
///     .street("1600 Amphitheatre Pkwy")
///     .city("Mountain View")
///     .state("CA");
/// let response = client.get_address(&input, None).await?;
/// println!("Found {} candidates", response.data.len());
///
/// // Batch lookup over POST
/// let inputs = vec![
///     input,
///     AddressInput::new().freeform("1 Rosedale, Baltimore, MD"),
/// ];
/// let optionals = vec![None, Some(AddressOptional::new().input_id("row-2"))];
/// let response = client.post_addresses(&inputs, Some(&optionals)).await?;
/// for candidate in response.for_input(1) {
///     println!("{}", candidate.delivery_line_1);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Client<T = ReqwestTransport> {
    inner: Arc<ClientInner<T>>,
}

struct ClientInner<T> {
    transport: T,
    base_url: Url,
    credentials: Option<Credentials>,
    default_headers: HeaderMap,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl<T: Transport> Client<T> {
    /// Validates and serializes a single lookup without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for unusable address fields and
    /// [`Error::MissingCredentials`] when neither the input nor the client
    /// carries credentials.
    pub fn prepare_get(
        &self,
        input: &AddressInput,
        optional: Option<&AddressOptional>,
    ) -> Result<PreparedRequest> {
        let request = build_get_request(
            &self.inner.base_url,
            self.inner.credentials.as_ref(),
            input,
            optional,
        )?;
        Ok(self.with_default_headers(request))
    }

    /// Validates and serializes a batch lookup without sending it.
    ///
    /// `optionals` is either `None` or holds exactly one entry per input.
    pub fn prepare_post(
        &self,
        inputs: &[AddressInput],
        optionals: Option<&[Option<AddressOptional>]>,
    ) -> Result<PreparedRequest> {
        let request = build_post_request(
            &self.inner.base_url,
            self.inner.credentials.as_ref(),
            inputs,
            optionals,
        )?;
        Ok(self.with_default_headers(request))
    }

    /// Looks up a single address with a GET request.
    ///
    /// Nothing is sent when the input fails validation.
    pub async fn get_address(
        &self,
        input: &AddressInput,
        optional: Option<&AddressOptional>,
    ) -> Result<Response<Vec<AddressCandidate>>> {
        let request = self.prepare_get(input, optional)?;
        self.execute(request, 1).await
    }

    /// Looks up a batch of addresses with one POST request.
    ///
    /// Every entry is validated first; if any entry is invalid the whole
    /// batch fails with [`Error::InvalidBatch`] and nothing is sent.
    pub async fn post_addresses(
        &self,
        inputs: &[AddressInput],
        optionals: Option<&[Option<AddressOptional>]>,
    ) -> Result<Response<Vec<AddressCandidate>>> {
        let request = self.prepare_post(inputs, optionals)?;
        self.execute(request, inputs.len()).await
    }

    /// Sends an already prepared request and parses the answer.
    pub async fn send(&self, request: PreparedRequest) -> Result<Response<Vec<AddressCandidate>>> {
        self.execute(request, 1).await
    }

    async fn execute(
        &self,
        request: PreparedRequest,
        entries: usize,
    ) -> Result<Response<Vec<AddressCandidate>>> {
        tracing::debug!(
            method = %request.method,
            url = %request.redacted_url(),
            entries = entries,
            "Executing HTTP request"
        );

        let start_time = Instant::now();
        let method = request.method.clone();
        let raw = match self.inner.transport.send(request).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, method = %method, "Request failed");
                return Err(e);
            }
        };

        parse_response(raw, start_time.elapsed())
    }

    fn with_default_headers(&self, mut request: PreparedRequest) -> PreparedRequest {
        for (name, value) in &self.inner.default_headers {
            if !request.headers.contains_key(name) {
                request.headers.insert(name.clone(), value.clone());
            }
        }
        request
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use smarty_street::{ClientBuilder, Credentials};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), smarty_street::Error> {
/// let client = ClientBuilder::new()
///     .credentials(Credentials::new("my-auth-id", "my-auth-token"))
///     .timeout(Duration::from_secs(30))
///     .default_header("User-Agent", "my-app/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    credentials: Option<Credentials>,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` pointing at the provider's endpoint.
    pub fn new() -> Self {
        Self {
            base_url: None,
            credentials: None,
            default_headers: HeaderMap::new(),
            timeout: None,
        }
    }

    /// Overrides the endpoint URL, e.g. for a proxy or a test server.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the credentials used for inputs that carry none of their own.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the request timeout of the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds a client backed by `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<Client> {
        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        let mut transport = ReqwestTransport::new(http_client);
        if let Some(timeout) = self.timeout {
            transport = transport.with_timeout(timeout);
        }

        self.build_with_transport(transport)
    }

    /// Builds a client that sends requests through `transport`.
    ///
    /// The configured timeout only applies to the default transport.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Result<Client<T>> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        Ok(Client {
            inner: Arc::new(ClientInner {
                transport,
                base_url,
                credentials: self.credentials,
                default_headers: self.default_headers,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RawResponse;
    use http::{Method, StatusCode};

    struct StaticTransport(&'static str);

    impl Transport for StaticTransport {
        async fn send(&self, _request: PreparedRequest) -> Result<RawResponse> {
            Ok(RawResponse {
                status: StatusCode::OK,
                headers: HeaderMap::new(),
                body: self.0.to_string(),
            })
        }
    }

    fn client() -> Client<StaticTransport> {
        Client::builder()
            .credentials(Credentials::new("id", "token"))
            .default_header("User-Agent", "test-agent")
            .unwrap()
            .build_with_transport(StaticTransport("[]"))
            .unwrap()
    }

    #[test]
    fn test_default_base_url() {
        let request = client()
            .prepare_get(&AddressInput::new().freeform("x"), None)
            .unwrap();
        assert_eq!(request.url.host_str(), Some("api.smartystreets.com"));
        assert_eq!(request.url.path(), "/street-address");
    }

    #[test]
    fn test_default_headers_are_applied() {
        let inputs = vec![AddressInput::new().freeform("x")];
        let request = client().prepare_post(&inputs, None).unwrap();

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.headers.get("user-agent").unwrap(), "test-agent");
        assert_eq!(request.headers.get("content-type").unwrap(), "application/json");
    }

    #[test]
    fn test_invalid_header_is_configuration_error() {
        let result = Client::builder().default_header("bad header", "x");
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = Client::builder().base_url("not a url");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_get_address_through_transport() {
        let response = client()
            .get_address(&AddressInput::new().freeform("x"), None)
            .await
            .unwrap();
        assert!(response.data.is_empty());
        assert_eq!(response.status, StatusCode::OK);
    }
}

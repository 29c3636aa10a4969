//! Response wrapper and the parser that turns raw responses into candidates.
//!
//! The [`Response`] type wraps the decoded candidates along with metadata
//! about the HTTP exchange, so latency, headers and the raw body stay
//! available for debugging.

use crate::transport::RawResponse;
use crate::{AddressCandidate, Error, Result, StatusKind};
use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A wrapper around a successful HTTP response.
///
/// # Examples
///
/// ```no_run
/// use smarty_street::{AddressInput, Client, Credentials};
///
/// # async fn example() -> Result<(), smarty_street::Error> {
/// let client = Client::builder()
///     .credentials(Credentials::new("id", "token"))
///     .build()?;
///
/// let input = AddressInput::new().street("1 Rosedale").zipcode("21229");
/// let response = client.get_address(&input, None).await?;
///
/// for candidate in response.iter() {
///     println!("{} / {}", candidate.delivery_line_1, candidate.last_line);
/// }
/// println!("Request took {:?}", response.latency);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded response data.
    pub data: T,

    /// The raw response body as a string.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from sending the request until the response body was read.
    pub latency: Duration,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
        }
    }

    /// Maps the response data to a different type using the provided function.
    ///
    /// # Examples
    ///
    /// ```
    /// # use smarty_street::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     vec![1, 2, 3],
    ///     "[1,2,3]".to_string(),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(100),
    /// );
    ///
    /// let count = response.map(|v| v.len());
    /// assert_eq!(count.data, 3);
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw_body: self.raw_body,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
        }
    }

    /// Returns a reference to a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl Response<Vec<AddressCandidate>> {
    /// Candidates produced for the input at `input_index`, in response order.
    ///
    /// Batch lookups return the candidates of every input in one flat array;
    /// an input without any match has no entries at all.
    pub fn for_input(&self, input_index: usize) -> impl Iterator<Item = &AddressCandidate> {
        self.data
            .iter()
            .filter(move |c| c.input_index == input_index)
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Interprets a raw response from the street-address endpoint.
///
/// A 200 body is decoded as a JSON array of candidates, preserving the order
/// the provider returned them in. Any other status becomes
/// [`Error::HttpError`] with its [`StatusKind`].
///
/// # Errors
///
/// - [`Error::HttpError`] for every non-200 status
/// - [`Error::DeserializationFailed`] when a 200 body is not a candidate array
pub fn parse_response(
    raw: RawResponse,
    latency: Duration,
) -> Result<Response<Vec<AddressCandidate>>> {
    let RawResponse {
        status,
        headers,
        body,
    } = raw;

    tracing::info!(
        status = status.as_u16(),
        latency_ms = latency.as_millis(),
        "Received HTTP response"
    );

    if let Some(kind) = StatusKind::classify(status) {
        if kind == StatusKind::Unexpected {
            tracing::warn!(
                status = status.as_u16(),
                response = %body,
                "Unexpected status from address API"
            );
        } else {
            tracing::error!(
                status = status.as_u16(),
                kind = %kind,
                response = %body,
                "Address API rejected the request"
            );
        }

        return Err(Error::HttpError {
            status,
            kind,
            raw_response: body,
            headers,
        });
    }

    match serde_json::from_str::<Vec<AddressCandidate>>(&body) {
        Ok(data) => Ok(Response::new(data, body, status, headers, latency)),
        Err(e) => {
            tracing::error!(
                error = %e,
                raw_response = %body,
                "Failed to deserialize response"
            );

            Err(Error::DeserializationFailed {
                raw_response: body,
                serde_error: e.to_string(),
                status,
            })
        }
    }
}

//! Error types for address validation calls.
//!
//! Every failure is returned to the caller as a value. Nothing is retried or
//! recovered internally, and the raw response is preserved whenever the
//! provider sent one.

use http::{HeaderMap, StatusCode};
use std::fmt;

/// The main error type for address validation calls.
///
/// # Examples
///
/// ```no_run
/// use smarty_street::{AddressInput, Client, Credentials, Error, StatusKind};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder()
///     .credentials(Credentials::new("id", "token"))
///     .build()?;
///
/// let input = AddressInput::new().freeform("1600 Amphitheatre Pkwy, Mountain View, CA");
///
/// match client.get_address(&input, None).await {
///     Ok(response) => println!("{} candidates", response.data.len()),
///     Err(Error::Validation(reason)) => eprintln!("Bad input: {}", reason),
///     Err(Error::HttpError { kind: StatusKind::PaymentRequired, .. }) => {
///         eprintln!("Subscription exhausted");
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The address fields do not form a combination the provider accepts.
    #[error("Invalid address input: {0}")]
    Validation(#[from] ValidationError),

    /// One or more entries of a batch failed validation.
    ///
    /// Every entry is checked, so `failures` lists all invalid entries rather
    /// than only the first one.
    #[error("{} of {total} batch entries failed validation", .failures.len())]
    InvalidBatch {
        /// The invalid entries, in input order.
        failures: Vec<BatchFailure>,
        /// The number of entries in the batch.
        total: usize,
    },

    /// A batch was submitted without any entries.
    #[error("Batch contains no addresses")]
    EmptyBatch,

    /// A batch holds more entries than a single POST may carry.
    #[error("Batch of {len} addresses exceeds the limit of {max}")]
    BatchTooLarge {
        /// The number of entries submitted.
        len: usize,
        /// The provider's per-request limit.
        max: usize,
    },

    /// Neither the input(s) nor the client carry an auth id and auth token.
    #[error("Authentication parameters required")]
    MissingCredentials,

    /// The optional-field slice was given but does not pair up with the inputs.
    #[error("Lengths of inputs ({inputs}) and optional fields ({optionals}) must match")]
    LengthMismatch {
        /// The number of inputs.
        inputs: usize,
        /// The number of optional-field entries.
        optionals: usize,
    },

    /// A network-level error occurred (connection failed, DNS lookup failed, etc.).
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The provider answered with a status other than 200.
    ///
    /// `kind` carries the provider's meaning for the status code.
    #[error("HTTP error {status} ({kind}): {raw_response}")]
    HttpError {
        /// The HTTP status code
        status: StatusCode,
        /// What the status code means for this API
        kind: StatusKind,
        /// The raw response body
        raw_response: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// Failed to deserialize the response body into candidates.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// Failed to serialize the batch body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// Invalid configuration was provided, such as an invalid header value.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(err)
        }
    }
}

impl Error {
    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError { status, .. } => Some(*status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the provider's classification of the status code, if any.
    pub fn status_kind(&self) -> Option<StatusKind> {
        match self {
            Error::HttpError { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpError { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns `true` if the failure was caused by the caller's input and
    /// was detected before any request was sent.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::InvalidBatch { .. }
                | Error::EmptyBatch
                | Error::BatchTooLarge { .. }
                | Error::MissingCredentials
                | Error::LengthMismatch { .. }
        )
    }
}

/// Why an address input was rejected before sending.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Neither a street nor a free-form address was given.
    #[error("street address or freeform address required")]
    MissingAddress,

    /// A street was given without city + state or zipcode, and there is no
    /// free-form address to fall back on.
    #[error("either street + city + state or street + zipcode required when not using freeform addressing")]
    IncompleteStreet,
}

/// A single rejected entry of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Position of the entry in the submitted batch.
    pub index: usize,
    /// Why the entry was rejected.
    pub reason: ValidationError,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry {}: {}", self.index, self.reason)
    }
}

/// The provider's meaning for a non-200 status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// 400: the payload was malformed.
    BadRequest,
    /// 401: the auth id / auth token pair was rejected.
    Unauthorized,
    /// 402: no active subscription covers the request.
    PaymentRequired,
    /// 413: the request body exceeded the size limit.
    RequestTooLarge,
    /// 429: too many requests.
    TooManyRequests,
    /// Any other non-200 status.
    Unexpected,
}

impl StatusKind {
    /// Classifies a response status.
    ///
    /// Returns `None` for 200, the only status the API uses for success.
    /// Every other code maps to a kind, with codes the provider does not
    /// document landing in [`StatusKind::Unexpected`].
    ///
    /// # Examples
    ///
    /// ```
    /// use http::StatusCode;
    /// use smarty_street::StatusKind;
    ///
    /// assert_eq!(StatusKind::classify(StatusCode::OK), None);
    /// assert_eq!(
    ///     StatusKind::classify(StatusCode::UNAUTHORIZED),
    ///     Some(StatusKind::Unauthorized)
    /// );
    /// assert_eq!(
    ///     StatusKind::classify(StatusCode::BAD_GATEWAY),
    ///     Some(StatusKind::Unexpected)
    /// );
    /// ```
    pub fn classify(status: StatusCode) -> Option<StatusKind> {
        match status.as_u16() {
            200 => None,
            400 => Some(StatusKind::BadRequest),
            401 => Some(StatusKind::Unauthorized),
            402 => Some(StatusKind::PaymentRequired),
            413 => Some(StatusKind::RequestTooLarge),
            429 => Some(StatusKind::TooManyRequests),
            _ => Some(StatusKind::Unexpected),
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StatusKind::BadRequest => "Bad Request (Malformed Payload)",
            StatusKind::Unauthorized => "Unauthorized",
            StatusKind::PaymentRequired => "Payment Required",
            StatusKind::RequestTooLarge => "Request Entity Too Large",
            StatusKind::TooManyRequests => "Too Many Requests",
            StatusKind::Unexpected => "Unexpected Status",
        };
        f.write_str(text)
    }
}

/// A specialized `Result` type for address validation calls.
pub type Result<T> = std::result::Result<T, Error>;

//! Serialization of address inputs for the GET and POST endpoints.
//!
//! GET lookups put every field in the query string; POST batches send a JSON
//! array of [`BatchEntry`] objects and keep only the credentials in the URL.
//! Free-form addresses travel in the same `street` field as discrete
//! street lines.

use crate::address::{present, AddressInput, AddressOptional, Addressing, Credentials};
use crate::transport::PreparedRequest;
use crate::{BatchFailure, Error, Result, ValidationError};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;
use url::form_urlencoded::byte_serialize;
use url::Url;

/// The largest number of addresses a single POST may carry.
pub const MAX_BATCH_SIZE: usize = 100;

/// One element of the POST body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    /// The street line, or the free-form address.
    pub street: String,
    /// The city, sent only together with the state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// The state, sent only together with the city.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// The ZIP code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    /// Maximum number of candidates, already clamped to `1..=10`.
    pub candidates: u8,
    /// Name of the recipient, firm or company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addressee: Option<String>,
    /// Correlation id echoed back in every candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_id: Option<String>,
    /// City, state and ZIP code combined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastline: Option<String>,
    /// Apartment, suite, or office number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    /// Extra address line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    /// Urbanization name (Puerto Rico only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urbanization: Option<String>,
}

impl BatchEntry {
    /// Builds the entry for a validated input.
    pub fn new(input: &AddressInput) -> std::result::Result<Self, ValidationError> {
        let addressing = input.addressing()?;
        let mut entry = BatchEntry {
            street: addressing.street_line().to_string(),
            candidates: input.candidate_count(),
            ..Default::default()
        };

        if let Addressing::Street {
            city_state,
            zipcode,
            ..
        } = addressing
        {
            if let Some((city, state)) = city_state {
                entry.city = Some(city.to_string());
                entry.state = Some(state.to_string());
            }
            entry.zipcode = zipcode.map(str::to_string);
        }

        Ok(entry)
    }

    /// Copies every present optional field onto the entry.
    pub fn apply_optional(&mut self, optional: &AddressOptional) {
        self.addressee = present(&optional.addressee).map(str::to_string);
        self.input_id = present(&optional.input_id).map(str::to_string);
        self.lastline = present(&optional.lastline).map(str::to_string);
        self.secondary = present(&optional.secondary).map(str::to_string);
        self.street2 = present(&optional.street2).map(str::to_string);
        self.urbanization = present(&optional.urbanization).map(str::to_string);
    }
}

/// Builds the address part of a GET query string.
///
/// The result starts with `&street=` and is followed by `&city=…&state=…`
/// and/or `&zipcode=…` for street-based inputs.
///
/// # Examples
///
/// ```
/// use smarty_street::{request::address_query, AddressInput};
///
/// let input = AddressInput::new()
///     .street("1 Main St")
///     .city("Springfield")
///     .state("IL");
/// assert_eq!(
///     address_query(&input).unwrap(),
///     "&street=1+Main+St&city=Springfield&state=IL"
/// );
/// ```
///
/// # Errors
///
/// Returns a [`ValidationError`] when the input satisfies none of the
/// accepted field combinations.
pub fn address_query(input: &AddressInput) -> std::result::Result<String, ValidationError> {
    let addressing = input.addressing()?;
    let mut query = String::new();
    push_param(&mut query, "street", addressing.street_line());

    if let Addressing::Street {
        city_state,
        zipcode,
        ..
    } = addressing
    {
        if let Some((city, state)) = city_state {
            push_param(&mut query, "city", city);
            push_param(&mut query, "state", state);
        }
        if let Some(zipcode) = zipcode {
            push_param(&mut query, "zipcode", zipcode);
        }
    }

    Ok(query)
}

/// Appends `&candidates=N`, with `N` clamped to `1..=10`.
pub fn append_candidates(input: &AddressInput, query: &mut String) {
    query.push_str("&candidates=");
    query.push_str(&input.candidate_count().to_string());
}

/// Builds the query string for the present optional fields.
///
/// Absent fields contribute nothing, so an empty [`AddressOptional`] yields
/// an empty string.
pub fn optional_query(optional: &AddressOptional) -> String {
    let mut query = String::new();
    for (name, value) in optional.fields() {
        push_param(&mut query, name, value);
    }
    query
}

/// Validates and serializes a batch for the POST endpoint.
///
/// `optionals` must either be `None` or pair up one-to-one with `inputs`;
/// individual pairs may still be `None`. Every entry is validated even after
/// a failure, so the returned error lists all invalid entries.
///
/// # Errors
///
/// - [`Error::LengthMismatch`] when `optionals` has a different length
/// - [`Error::InvalidBatch`] when any entry fails validation
pub fn build_batch(
    inputs: &[AddressInput],
    optionals: Option<&[Option<AddressOptional>]>,
) -> Result<Vec<BatchEntry>> {
    if let Some(optionals) = optionals {
        if optionals.len() != inputs.len() {
            return Err(Error::LengthMismatch {
                inputs: inputs.len(),
                optionals: optionals.len(),
            });
        }
    }

    let mut entries = Vec::with_capacity(inputs.len());
    let mut failures = Vec::new();

    for (index, input) in inputs.iter().enumerate() {
        match BatchEntry::new(input) {
            Ok(mut entry) => {
                if let Some(Some(optional)) = optionals.map(|o| &o[index]) {
                    entry.apply_optional(optional);
                }
                entries.push(entry);
            }
            Err(reason) => {
                tracing::warn!(index = index, reason = %reason, "Invalid batch entry");
                failures.push(BatchFailure { index, reason });
            }
        }
    }

    if failures.is_empty() {
        Ok(entries)
    } else {
        Err(Error::InvalidBatch {
            failures,
            total: inputs.len(),
        })
    }
}

/// Picks the credentials for a batch: the first entry that carries a
/// complete pair, else `fallback`.
pub fn batch_credentials<'a>(
    inputs: &'a [AddressInput],
    fallback: Option<&'a Credentials>,
) -> Option<&'a Credentials> {
    inputs
        .iter()
        .find_map(AddressInput::complete_credentials)
        .or_else(|| fallback.filter(|c| c.is_complete()))
}

/// Builds the GET request for a single lookup.
pub fn build_get_request(
    base_url: &Url,
    credentials: Option<&Credentials>,
    input: &AddressInput,
    optional: Option<&AddressOptional>,
) -> Result<PreparedRequest> {
    let credentials = input
        .complete_credentials()
        .or_else(|| credentials.filter(|c| c.is_complete()))
        .ok_or(Error::MissingCredentials)?;

    let mut query = auth_query(credentials);
    query.push_str(&address_query(input)?);
    append_candidates(input, &mut query);
    if let Some(optional) = optional {
        query.push_str(&optional_query(optional));
    }

    let url = with_query(base_url, &query);

    Ok(PreparedRequest {
        method: Method::GET,
        url,
        headers: HeaderMap::new(),
        body: None,
    })
}

/// Builds the POST request for a batch lookup.
///
/// # Errors
///
/// Besides the errors of [`build_batch`], fails with [`Error::EmptyBatch`],
/// [`Error::BatchTooLarge`] or [`Error::MissingCredentials`].
pub fn build_post_request(
    base_url: &Url,
    credentials: Option<&Credentials>,
    inputs: &[AddressInput],
    optionals: Option<&[Option<AddressOptional>]>,
) -> Result<PreparedRequest> {
    if inputs.is_empty() {
        return Err(Error::EmptyBatch);
    }
    if inputs.len() > MAX_BATCH_SIZE {
        return Err(Error::BatchTooLarge {
            len: inputs.len(),
            max: MAX_BATCH_SIZE,
        });
    }

    let entries = build_batch(inputs, optionals)?;
    let credentials = batch_credentials(inputs, credentials).ok_or(Error::MissingCredentials)?;

    let body =
        serde_json::to_string(&entries).map_err(|e| Error::SerializationFailed(e.to_string()))?;

    let url = with_query(base_url, &auth_query(credentials));

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(PreparedRequest {
        method: Method::POST,
        url,
        headers,
        body: Some(body),
    })
}

/// Appends `query` after any query already present on `base_url`.
fn with_query(base_url: &Url, query: &str) -> Url {
    let mut url = base_url.clone();
    match base_url.query().filter(|q| !q.is_empty()) {
        Some(existing) => url.set_query(Some(&format!("{}&{}", existing, query))),
        None => url.set_query(Some(query)),
    }
    url
}

fn auth_query(credentials: &Credentials) -> String {
    format!(
        "auth-id={}&auth-token={}",
        encode(&credentials.auth_id),
        encode(&credentials.auth_token)
    )
}

fn push_param(query: &mut String, name: &str, value: &str) {
    query.push('&');
    query.push_str(name);
    query.push('=');
    query.push_str(&encode(value));
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

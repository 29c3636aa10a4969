//! Address input types and the field-combination rules the provider enforces.
//!
//! An [`AddressInput`] is accepted when it carries one of:
//!
//! - street + city + state
//! - street + zipcode
//! - a free-form address
//!
//! Empty strings count as absent everywhere in this module.

use crate::ValidationError;

/// The largest number of candidates the provider returns for one input.
pub const MAX_CANDIDATES: u8 = 10;

/// The auth id / auth token pair identifying the account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The account's auth id.
    pub auth_id: String,
    /// The account's auth token.
    pub auth_token: String,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(auth_id: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            auth_id: auth_id.into(),
            auth_token: auth_token.into(),
        }
    }

    /// Returns `true` when both halves are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.auth_id.is_empty() && !self.auth_token.is_empty()
    }
}

// Keep the token out of logs and panics.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_id", &self.auth_id)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// The address fields of a single lookup.
///
/// # Examples
///
/// ```
/// use smarty_street::{AddressInput, Credentials};
///
/// let input = AddressInput::new()
///     .credentials(Credentials::new("id", "token"))
///     .street("1600 Amphitheatre Pkwy")
///     .city("Mountain View")
///     .state("CA")
///     .candidates(3);
///
/// assert!(input.is_valid());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressInput {
    /// Credentials sent with this input, overriding the client default.
    pub credentials: Option<Credentials>,
    /// The street line, e.g. `"1600 Amphitheatre Pkwy"`.
    pub street: Option<String>,
    /// The city name.
    pub city: Option<String>,
    /// The state name or abbreviation.
    pub state: Option<String>,
    /// The ZIP code.
    pub zipcode: Option<String>,
    /// The entire address in one line, without country.
    pub freeform: Option<String>,
    /// Maximum number of candidates to return, clamped to `1..=10`.
    pub candidates: Option<i32>,
}

impl AddressInput {
    /// Creates an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the credentials carried by this input.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the street line.
    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    /// Sets the city.
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Sets the state.
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Sets the ZIP code.
    pub fn zipcode(mut self, zipcode: impl Into<String>) -> Self {
        self.zipcode = Some(zipcode.into());
        self
    }

    /// Sets a free-form, single-line address.
    pub fn freeform(mut self, freeform: impl Into<String>) -> Self {
        self.freeform = Some(freeform.into());
        self
    }

    /// Sets the requested number of candidates.
    pub fn candidates(mut self, candidates: i32) -> Self {
        self.candidates = Some(candidates);
        self
    }

    /// Returns `true` if the input satisfies one of the accepted field
    /// combinations.
    pub fn is_valid(&self) -> bool {
        self.addressing().is_ok()
    }

    /// Resolves which addressing mode this input uses.
    ///
    /// A complete street-based address wins over a free-form one. A street
    /// that lacks both city + state and zipcode falls back to the free-form
    /// address when there is one.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompleteStreet`] for an incomplete street
    /// without a free-form fallback, and [`ValidationError::MissingAddress`]
    /// when neither a street nor a free-form address is present.
    pub fn addressing(&self) -> Result<Addressing<'_>, ValidationError> {
        let street = present(&self.street);
        let freeform = present(&self.freeform);

        if let Some(street) = street {
            let city_state = present(&self.city).zip(present(&self.state));
            let zipcode = present(&self.zipcode);
            if city_state.is_some() || zipcode.is_some() {
                return Ok(Addressing::Street {
                    street,
                    city_state,
                    zipcode,
                });
            }
        }

        match (street, freeform) {
            (_, Some(text)) => Ok(Addressing::FreeForm(text)),
            (Some(_), None) => Err(ValidationError::IncompleteStreet),
            (None, None) => Err(ValidationError::MissingAddress),
        }
    }

    /// Returns the carried credentials when both halves are present.
    pub fn complete_credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref().filter(|c| c.is_complete())
    }

    /// The candidate count that will be sent for this input.
    pub fn candidate_count(&self) -> u8 {
        candidate_count(self.candidates)
    }
}

/// Fields that refine a lookup but are never required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressOptional {
    /// Name of the recipient, firm or company.
    pub addressee: Option<String>,
    /// Caller-supplied id copied into every candidate for this input.
    pub input_id: Option<String>,
    /// City, state and ZIP code combined.
    pub lastline: Option<String>,
    /// Apartment, suite, or office number.
    pub secondary: Option<String>,
    /// Extra information such as delivery instructions.
    pub street2: Option<String>,
    /// Urbanization name; only meaningful for Puerto Rico.
    pub urbanization: Option<String>,
}

impl AddressOptional {
    /// Creates an empty set of optional fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the addressee.
    pub fn addressee(mut self, addressee: impl Into<String>) -> Self {
        self.addressee = Some(addressee.into());
        self
    }

    /// Sets the correlation id.
    pub fn input_id(mut self, input_id: impl Into<String>) -> Self {
        self.input_id = Some(input_id.into());
        self
    }

    /// Sets the combined city/state/ZIP line.
    pub fn lastline(mut self, lastline: impl Into<String>) -> Self {
        self.lastline = Some(lastline.into());
        self
    }

    /// Sets the secondary unit designator.
    pub fn secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary = Some(secondary.into());
        self
    }

    /// Sets the extra address line.
    pub fn street2(mut self, street2: impl Into<String>) -> Self {
        self.street2 = Some(street2.into());
        self
    }

    /// Sets the urbanization.
    pub fn urbanization(mut self, urbanization: impl Into<String>) -> Self {
        self.urbanization = Some(urbanization.into());
        self
    }

    /// Present fields as `(transport name, value)` pairs, in a fixed order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("addressee", &self.addressee),
            ("input_id", &self.input_id),
            ("lastline", &self.lastline),
            ("secondary", &self.secondary),
            ("street2", &self.street2),
            ("urbanization", &self.urbanization),
        ]
        .into_iter()
        .filter_map(|(name, value)| present(value).map(|v| (name, v)))
    }
}

/// How a valid input identifies its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing<'a> {
    /// A discrete street line with city + state and/or a ZIP code.
    Street {
        /// The street line.
        street: &'a str,
        /// City and state, only when both are present.
        city_state: Option<(&'a str, &'a str)>,
        /// The ZIP code.
        zipcode: Option<&'a str>,
    },
    /// A single unparsed address line.
    FreeForm(&'a str),
}

impl<'a> Addressing<'a> {
    /// The value sent in the `street` transport field.
    pub fn street_line(&self) -> &'a str {
        match *self {
            Addressing::Street { street, .. } => street,
            Addressing::FreeForm(text) => text,
        }
    }
}

/// Clamps a requested candidate count to what the provider accepts.
///
/// Missing or non-positive requests become 1 and anything above 10 becomes 10.
///
/// ```
/// use smarty_street::address::candidate_count;
///
/// assert_eq!(candidate_count(Some(0)), 1);
/// assert_eq!(candidate_count(Some(5)), 5);
/// assert_eq!(candidate_count(Some(15)), 10);
/// assert_eq!(candidate_count(None), 1);
/// ```
pub fn candidate_count(requested: Option<i32>) -> u8 {
    match requested {
        Some(n) if n > i32::from(MAX_CANDIDATES) => MAX_CANDIDATES,
        Some(n) if n > 0 => n as u8,
        _ => 1,
    }
}

pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

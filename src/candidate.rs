//! Output records of the street-address API.
//!
//! Each lookup yields zero or more [`AddressCandidate`]s. Fields the provider
//! leaves out for a given match decode as empty strings or `None`.

use serde::{Deserialize, Deserializer, Serialize};

/// One standardized-address match for an input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressCandidate {
    /// The caller-supplied correlation id, echoed back.
    #[serde(deserialize_with = "null_as_default")]
    pub input_id: String,
    /// Position of the originating input within the request.
    #[serde(deserialize_with = "null_as_default")]
    pub input_index: usize,
    /// Position of this candidate among the input's candidates.
    #[serde(deserialize_with = "null_as_default")]
    pub candidate_index: usize,
    /// Recipient, firm or company.
    #[serde(deserialize_with = "null_as_default")]
    pub addressee: String,
    #[serde(deserialize_with = "null_as_default")]
    pub delivery_line_1: String,
    #[serde(deserialize_with = "null_as_default")]
    pub delivery_line_2: String,
    /// City, state and ZIP+4 on one line.
    #[serde(deserialize_with = "null_as_default")]
    pub last_line: String,
    #[serde(deserialize_with = "null_as_default")]
    pub delivery_point_barcode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub components: Components,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: Metadata,
    #[serde(deserialize_with = "null_as_default")]
    pub analysis: Analysis,
}

/// The parsed parts of the standardized address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Components {
    #[serde(deserialize_with = "null_as_default")]
    pub urbanization: String,
    #[serde(deserialize_with = "null_as_default")]
    pub primary_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub street_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub street_predirection: String,
    #[serde(deserialize_with = "null_as_default")]
    pub street_postdirection: String,
    #[serde(deserialize_with = "null_as_default")]
    pub street_suffix: String,
    #[serde(deserialize_with = "null_as_default")]
    pub secondary_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub secondary_designator: String,
    #[serde(deserialize_with = "null_as_default")]
    pub extra_secondary_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub extra_secondary_designator: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pmb_designator: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pmb_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub default_city_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state_abbreviation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub zipcode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub plus4_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub delivery_point: String,
    #[serde(deserialize_with = "null_as_default")]
    pub delivery_point_check_digit: String,
}

/// Postal and geographic metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    #[serde(deserialize_with = "null_as_default")]
    pub record_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub zip_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub county_fips: String,
    #[serde(deserialize_with = "null_as_default")]
    pub county_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub carrier_route: String,
    #[serde(deserialize_with = "null_as_default")]
    pub congressional_district: String,
    #[serde(deserialize_with = "null_as_default")]
    pub building_default_indicator: String,
    /// Residential delivery indicator: `"Residential"` or `"Commercial"`.
    #[serde(deserialize_with = "null_as_default")]
    pub rdi: String,
    #[serde(deserialize_with = "null_as_default")]
    pub elot_sequence: String,
    #[serde(deserialize_with = "null_as_default")]
    pub elot_sort: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Geocode precision, e.g. `"Zip9"`.
    #[serde(deserialize_with = "null_as_default")]
    pub precision: String,
    #[serde(deserialize_with = "null_as_default")]
    pub time_zone: String,
    /// Hours from UTC.
    pub utc_offset: Option<f32>,
    /// Whether the time zone observes daylight saving time.
    pub dst: Option<bool>,
}

impl Metadata {
    /// Latitude and longitude, when the match was geocoded.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Delivery-point validation results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Analysis {
    /// DPV match code: `Y`, `S`, `D`, `N` or empty.
    #[serde(deserialize_with = "null_as_default")]
    pub dpv_match_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dpv_footnotes: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dpv_cmra: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dpv_vacant: String,
    #[serde(deserialize_with = "null_as_default")]
    pub active: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ews_match: String,
    #[serde(deserialize_with = "null_as_default")]
    pub footnotes: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lacslink_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lacslink_indicator: String,
    #[serde(deserialize_with = "null_as_default")]
    pub suitelink_match: String,
}

impl Analysis {
    /// How confidently the address matched a deliverable point.
    pub fn dpv_match(&self) -> DpvMatch {
        match self.dpv_match_code.as_str() {
            "Y" => DpvMatch::Confirmed,
            "S" => DpvMatch::SecondaryIgnored,
            "D" => DpvMatch::SecondaryMissing,
            "N" => DpvMatch::NotConfirmed,
            _ => DpvMatch::NotAttempted,
        }
    }
}

/// The meaning of [`Analysis::dpv_match_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpvMatch {
    /// `Y`: confirmed down to the secondary number, if any.
    Confirmed,
    /// `S`: the primary number matched; the secondary number did not.
    SecondaryIgnored,
    /// `D`: the primary number matched; a required secondary number is missing.
    SecondaryMissing,
    /// `N`: not confirmed as deliverable.
    NotConfirmed,
    /// Empty: the address was not submitted for DPV.
    NotAttempted,
}

impl DpvMatch {
    /// Returns `true` for the codes the provider treats as deliverable.
    pub fn is_deliverable(&self) -> bool {
        matches!(
            self,
            DpvMatch::Confirmed | DpvMatch::SecondaryIgnored | DpvMatch::SecondaryMissing
        )
    }
}

// An explicit `null` decodes like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

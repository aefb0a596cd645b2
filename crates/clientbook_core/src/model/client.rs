//! Client domain model.
//!
//! # Responsibility
//! - Define the client record and its short projection.
//! - Enforce per-field validation on construction and mutation.
//!
//! # Invariants
//! - Name fields hold 1..=50 letters of any script and nothing else.
//! - `address` is non-blank and at most 100 characters.
//! - `phone` is `+` followed by exactly 11 digits.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Repository-assigned client identity.
pub type ClientId = i64;

const NAME_MAX_CHARS: usize = 50;
const ADDRESS_MAX_CHARS: usize = 100;

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{L}{1,50}$").expect("valid name regex"));
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[0-9]{11}$").expect("valid phone regex"));

/// Client field validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientValidationError {
    InvalidLastName(String),
    InvalidFirstName(String),
    InvalidMiddleName(String),
    InvalidAddress,
    InvalidPhone(String),
}

impl Display for ClientValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLastName(value) => write!(
                f,
                "invalid last name `{value}`: expected 1..={NAME_MAX_CHARS} letters"
            ),
            Self::InvalidFirstName(value) => write!(
                f,
                "invalid first name `{value}`: expected 1..={NAME_MAX_CHARS} letters"
            ),
            Self::InvalidMiddleName(value) => write!(
                f,
                "invalid middle name `{value}`: expected 1..={NAME_MAX_CHARS} letters"
            ),
            Self::InvalidAddress => write!(
                f,
                "invalid address: expected 1..={ADDRESS_MAX_CHARS} characters"
            ),
            Self::InvalidPhone(value) => write!(
                f,
                "invalid phone `{value}`: expected `+` followed by 11 digits"
            ),
        }
    }
}

impl Error for ClientValidationError {}

/// Client field selector used by filters, sorting and text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientField {
    Id,
    LastName,
    FirstName,
    MiddleName,
    Address,
    Phone,
}

impl ClientField {
    pub const ALL: [ClientField; 6] = [
        ClientField::Id,
        ClientField::LastName,
        ClientField::FirstName,
        ClientField::MiddleName,
        ClientField::Address,
        ClientField::Phone,
    ];

    /// Canonical snake_case name, also the SQLite column name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "client_id",
            Self::LastName => "last_name",
            Self::FirstName => "first_name",
            Self::MiddleName => "middle_name",
            Self::Address => "address",
            Self::Phone => "phone",
        }
    }
}

impl Display for ClientField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "id" | "client_id" | "ClientID" | "ClientId" => Ok(Self::Id),
            "last_name" | "LastName" => Ok(Self::LastName),
            "first_name" | "FirstName" => Ok(Self::FirstName),
            "middle_name" | "MiddleName" => Ok(Self::MiddleName),
            "address" | "Address" => Ok(Self::Address),
            "phone" | "Phone" => Ok(Self::Phone),
            other => Err(format!(
                "unknown client field `{other}`; expected one of client_id|last_name|first_name|middle_name|address|phone"
            )),
        }
    }
}

/// Client input without identity, used by add/replace paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewClient {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub address: String,
    pub phone: String,
}

impl NewClient {
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        middle_name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            middle_name: middle_name.into(),
            address: address.into(),
            phone: phone.into(),
        }
    }

    /// Validates every field without assigning identity.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        validate_last_name(&self.last_name)?;
        validate_first_name(&self.first_name)?;
        validate_middle_name(&self.middle_name)?;
        validate_address(&self.address)?;
        validate_phone(&self.phone)?;
        Ok(())
    }
}

/// Canonical client record.
///
/// Fields are private so that setters can keep the record valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Client {
    #[serde(rename = "ClientID")]
    id: ClientId,
    last_name: String,
    first_name: String,
    middle_name: String,
    address: String,
    phone: String,
}

impl Client {
    /// Builds a validated client from input fields and an assigned id.
    pub fn new(id: ClientId, data: NewClient) -> Result<Self, ClientValidationError> {
        data.validate()?;
        Ok(Self {
            id,
            last_name: data.last_name,
            first_name: data.first_name,
            middle_name: data.middle_name,
            address: data.address,
            phone: data.phone,
        })
    }

    /// Parses one client from a JSON object and validates it.
    pub fn from_json_str(text: &str) -> Result<Self, ClientParseError> {
        let client: Client = serde_json::from_str(text)
            .map_err(|err| ClientParseError::Syntax(format!("json: {err}")))?;
        client.validate()?;
        Ok(client)
    }

    /// Parses one client from a YAML mapping and validates it.
    pub fn from_yaml_str(text: &str) -> Result<Self, ClientParseError> {
        let client: Client = serde_yaml::from_str(text)
            .map_err(|err| ClientParseError::Syntax(format!("yaml: {err}")))?;
        client.validate()?;
        Ok(client)
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn middle_name(&self) -> &str {
        &self.middle_name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) -> Result<(), ClientValidationError> {
        let value = value.into();
        validate_last_name(&value)?;
        self.last_name = value;
        Ok(())
    }

    pub fn set_first_name(
        &mut self,
        value: impl Into<String>,
    ) -> Result<(), ClientValidationError> {
        let value = value.into();
        validate_first_name(&value)?;
        self.first_name = value;
        Ok(())
    }

    pub fn set_middle_name(
        &mut self,
        value: impl Into<String>,
    ) -> Result<(), ClientValidationError> {
        let value = value.into();
        validate_middle_name(&value)?;
        self.middle_name = value;
        Ok(())
    }

    pub fn set_address(&mut self, value: impl Into<String>) -> Result<(), ClientValidationError> {
        let value = value.into();
        validate_address(&value)?;
        self.address = value;
        Ok(())
    }

    pub fn set_phone(&mut self, value: impl Into<String>) -> Result<(), ClientValidationError> {
        let value = value.into();
        validate_phone(&value)?;
        self.phone = value;
        Ok(())
    }

    /// Re-checks every field. Used on read paths where data came from storage.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        validate_last_name(&self.last_name)?;
        validate_first_name(&self.first_name)?;
        validate_middle_name(&self.middle_name)?;
        validate_address(&self.address)?;
        validate_phone(&self.phone)?;
        Ok(())
    }

    /// Returns input fields without identity, e.g. to prefill an edit form.
    pub fn to_new_client(&self) -> NewClient {
        NewClient {
            last_name: self.last_name.clone(),
            first_name: self.first_name.clone(),
            middle_name: self.middle_name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
        }
    }

    /// Text value of one field; ids render in decimal.
    pub fn field_text(&self, field: ClientField) -> std::borrow::Cow<'_, str> {
        use std::borrow::Cow;
        match field {
            ClientField::Id => Cow::Owned(self.id.to_string()),
            ClientField::LastName => Cow::Borrowed(&self.last_name),
            ClientField::FirstName => Cow::Borrowed(&self.first_name),
            ClientField::MiddleName => Cow::Borrowed(&self.middle_name),
            ClientField::Address => Cow::Borrowed(&self.address),
            ClientField::Phone => Cow::Borrowed(&self.phone),
        }
    }

    pub fn short(&self) -> ClientShort {
        ClientShort {
            id: self.id,
            last_name: self.last_name.clone(),
            initials: format!(
                "{}.{}.",
                first_char(&self.first_name),
                first_char(&self.middle_name)
            ),
            phone: self.phone.clone(),
        }
    }
}

impl Display for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} {} {}, {}, {}",
            self.id, self.last_name, self.first_name, self.middle_name, self.address, self.phone
        )
    }
}

/// Short projection returned by paged listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientShort {
    pub id: ClientId,
    pub last_name: String,
    /// First letters of first and middle name, e.g. `I.I.`.
    pub initials: String,
    pub phone: String,
}

impl Display for ClientShort {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} {}, {}",
            self.id, self.last_name, self.initials, self.phone
        )
    }
}

/// Failure while parsing a single client document.
#[derive(Debug)]
pub enum ClientParseError {
    Syntax(String),
    Validation(ClientValidationError),
}

impl Display for ClientParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax(message) => write!(f, "malformed client document ({message})"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ClientParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Syntax(_) => None,
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<ClientValidationError> for ClientParseError {
    fn from(value: ClientValidationError) -> Self {
        Self::Validation(value)
    }
}

fn is_valid_name(value: &str) -> bool {
    NAME_PATTERN.is_match(value)
}

fn validate_last_name(value: &str) -> Result<(), ClientValidationError> {
    if is_valid_name(value) {
        Ok(())
    } else {
        Err(ClientValidationError::InvalidLastName(value.to_string()))
    }
}

fn validate_first_name(value: &str) -> Result<(), ClientValidationError> {
    if is_valid_name(value) {
        Ok(())
    } else {
        Err(ClientValidationError::InvalidFirstName(value.to_string()))
    }
}

fn validate_middle_name(value: &str) -> Result<(), ClientValidationError> {
    if is_valid_name(value) {
        Ok(())
    } else {
        Err(ClientValidationError::InvalidMiddleName(value.to_string()))
    }
}

fn validate_address(value: &str) -> Result<(), ClientValidationError> {
    if value.trim().is_empty() || value.chars().count() > ADDRESS_MAX_CHARS {
        return Err(ClientValidationError::InvalidAddress);
    }
    Ok(())
}

fn validate_phone(value: &str) -> Result<(), ClientValidationError> {
    if PHONE_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(ClientValidationError::InvalidPhone(value.to_string()))
    }
}

fn first_char(value: &str) -> char {
    value.chars().next().unwrap_or('?')
}

#[cfg(test)]
mod tests {
    use super::{is_valid_name, validate_address, validate_phone, ClientField};

    #[test]
    fn names_accept_any_script_letters() {
        assert!(is_valid_name("Ivanov"));
        assert!(is_valid_name("Иванов"));
        assert!(!is_valid_name("Ivan0v"));
        assert!(!is_valid_name("Ivan Ivanov"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name(&"a".repeat(51)));
    }

    #[test]
    fn phone_requires_plus_and_eleven_digits() {
        assert!(validate_phone("+12345678901").is_ok());
        assert!(validate_phone("12345678901").is_err());
        assert!(validate_phone("+1234567890").is_err());
        assert!(validate_phone("+1234567890a").is_err());
    }

    #[test]
    fn address_rejects_blank_and_overlong_values() {
        assert!(validate_address("123 Main St").is_ok());
        assert!(validate_address("   ").is_err());
        assert!(validate_address(&"x".repeat(101)).is_err());
    }

    #[test]
    fn field_names_parse_from_both_casings() {
        for field in ClientField::ALL {
            assert_eq!(field.as_str().parse::<ClientField>().unwrap(), field);
        }
        assert_eq!(
            "LastName".parse::<ClientField>().unwrap(),
            ClientField::LastName
        );
        assert_eq!("id".parse::<ClientField>().unwrap(), ClientField::Id);
        assert!("age".parse::<ClientField>().is_err());
    }
}

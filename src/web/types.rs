//! The signup payload structs: the deserializable form that may be invalid,
//! and the validated form the upstream call works with.

use serde::Deserialize;

// ###################################
// ->   STRUCTS
// ###################################
/// Deserializable signup payload.
/// Whatever JSON the caller sent; the `email` field may be missing.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
}

/// A signup email that is known to be present and non-empty.
/// No format validation happens here; the upstream API is the authority on
/// what counts as a deliverable address.
#[derive(Debug, Clone)]
pub struct SignupEmail(String);

// ###################################
// ->   IMPLS
// ###################################
impl AsRef<str> for SignupEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SignupEmail {
    /// Rejects only the absent / empty-string case. Whitespace-only input
    /// passes, matching the behavior callers already depend on.
    pub fn parse(value: Option<String>) -> Result<Self, DataParsingError> {
        match value {
            Some(email) if !email.is_empty() => Ok(SignupEmail(email)),
            _ => Err(DataParsingError::EmailMissing),
        }
    }
}

impl TryFrom<SignupRequest> for SignupEmail {
    type Error = DataParsingError;

    fn try_from(req: SignupRequest) -> Result<Self, Self::Error> {
        SignupEmail::parse(req.email)
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug)]
pub enum DataParsingError {
    EmailMissing,
}
// Error Boilerplate
impl core::fmt::Display for DataParsingError {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for DataParsingError {}

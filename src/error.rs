//! Error types for material profile operations
//!
//! Two classes of failure exist in this crate. Malformed documents and misuse
//! of the API surface as an [`Error`]; unresolvable references inside an
//! otherwise valid document (unknown machine products, unregistered variants,
//! unmapped setting keys) are never errors — they are logged through the `log`
//! facade and the offending sub-element is skipped.

use thiserror::Error;

/// Result type for material profile operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when serializing or deserializing material profiles
#[derive(Error, Debug)]
pub enum Error {
    /// XML parsing error
    ///
    /// The document is not well-formed XML. Fatal to the whole deserialize
    /// call; profiles already registered before the failure stay registered.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Structurally invalid document
    ///
    /// The XML is well-formed but does not match the material profile dialect,
    /// e.g. the root element is not `<fdmmaterial>`.
    #[error("invalid material XML: {0}")]
    InvalidXml(String),

    /// Parse error for numeric values
    #[error("parse error: {0}")]
    Parse(String),

    /// Serialize was invoked on a profile that is not the root of its family
    ///
    /// Only the family member without a `base_file` back-reference (or whose
    /// `base_file` equals its own id) can be serialized; it emits the machine
    /// and hotend specializations itself. Calling serialize on any other
    /// member is programmer misuse.
    #[error("cannot serialize non-root material profile '{id}' (base file is '{base_file}')")]
    NotRootProfile {
        /// Id of the profile serialize was called on
        id: String,
        /// The `base_file` back-reference it carries
        base_file: String,
    },

    /// An operation referenced a profile id that is not registered
    #[error("no material profile registered with id '{0}'")]
    UnknownProfile(String),

    /// A machine definition required by the operation is not registered
    ///
    /// Raised only for the generic `fdmprinter` definition the base profile
    /// must bind to; per-machine definitions that cannot be found are logged
    /// and skipped instead.
    #[error("no machine definition registered with id '{0}'")]
    MissingDefinition(String),
}

impl From<std::num::ParseFloatError> for Error {
    fn from(err: std::num::ParseFloatError) -> Self {
        Error::Parse(format!("failed to parse floating-point number: {}", err))
    }
}

impl Error {
    /// Create an InvalidXml error with element context
    pub fn invalid_xml_element(element: &str, message: &str) -> Self {
        Error::InvalidXml(format!("element '<{}>': {}", element, message))
    }
}

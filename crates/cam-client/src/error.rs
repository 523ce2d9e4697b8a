//! CAM client errors

use crate::content_type::ContentType;
use thiserror::Error;

/// A caller-supplied value was rejected before anything was sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid argument: {0}")]
pub struct InvalidArgument(pub String);

impl InvalidArgument {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors raised while turning a response body into rows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The declared charset has no known decoder
    #[error("Unsupported charset: {0}")]
    UnsupportedCharset(String),

    /// The body contains bytes that are not valid in the declared charset
    #[error("Body is not valid {0}")]
    Malformed(String),

    /// A cell could not be keyed because it has no `name` attribute
    #[error("Cell {cell} in row {row} has no name attribute")]
    UnnamedCell { row: usize, cell: usize },

    /// The markup selectors could not be built
    #[error("Markup error: {0}")]
    Markup(String),
}

/// Errors that can occur while exchanging a request with the appliance
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// DNS, connect, TLS or timeout failure in the transport
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The appliance answered with a non-2xx status
    #[error("Appliance rejected request: {status} - {body}")]
    Status { status: u16, body: String },

    /// The response carried no Content-Type header
    #[error("Response has no Content-Type header")]
    MissingContentType,

    /// The Content-Type header could not be parsed
    #[error("Invalid Content-Type header: {0}")]
    InvalidContentType(InvalidArgument),

    /// The Content-Type is not one the decoder understands
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(ContentType),

    /// The body could not be decoded into rows
    #[error("Response decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Errors raised by the domain parsers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A required column is absent from the row
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A column holds a value outside its allowed set
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    /// The response has fewer rows than the operation promises
    #[error("Missing row {0}")]
    MissingRow(usize),
}

/// Errors returned by [`CamClient`](crate::CamClient) operations
#[derive(Debug, Error)]
pub enum CamError {
    /// A request argument was rejected locally
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    /// Transport or protocol failure
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// The appliance processed the request and reported a failure
    #[error("{context}: {message}")]
    Api { context: &'static str, message: String },

    /// The response rows did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

use thiserror::Error;

/// Failure talking to an external Google Maps service.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("service reported {status}: {message}")]
    Api { status: String, message: String },
}

/// Fatal failures of an optimization call. No partial result is returned.
#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("failed to geocode origin address: {origin}")]
    OriginUnresolved { origin: String },

    #[error("route service error: {0}")]
    RouteService(#[from] ServiceError),

    #[error("no routes returned from the route service")]
    NoRouteReturned,
}

/// Map link generation failures. Never fatal to the optimization.
#[derive(Error, Debug, PartialEq)]
pub enum MapLinkError {
    #[error("non-finite coordinates for '{address}'")]
    NonFiniteCoordinate { address: String },

    #[error("generated link '{url}' is not a valid URL: {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{var} is not set")]
    MissingApiKey { var: &'static str },

    #[error("{var} has an invalid value '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Error, Debug, PartialEq)]
pub enum PolylineError {
    #[error("polyline ends in the middle of a value at offset {offset}")]
    Truncated { offset: usize },

    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte { offset: usize, byte: u8 },

    #[error("polyline coordinate overflows at offset {offset}")]
    Overflow { offset: usize },
}

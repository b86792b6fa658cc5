use std::fmt;


// Failure of a single round-trip to the remote authority.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AuthorityError {
    // Network exception: connection refused, timeout, broken body stream etc.
    Transport(String),
    // The authority answered with a non-success HTTP status.
    HttpStatus(u16),
    // Successful status, but the body is not a payload of the expected shape.
    MalformedPayload(String),
}

impl fmt::Display for AuthorityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorityError::Transport(message) => write!(f, "transport error: {message}"),
            AuthorityError::HttpStatus(status) => write!(f, "HTTP error! status: {status}"),
            AuthorityError::MalformedPayload(message) => write!(f, "malformed payload: {message}"),
        }
    }
}

impl std::error::Error for AuthorityError {}

impl From<serde_json::Error> for AuthorityError {
    fn from(err: serde_json::Error) -> Self { AuthorityError::MalformedPayload(err.to_string()) }
}

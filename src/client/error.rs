use std::fmt;

#[derive(Debug)]
pub enum ClientError {
    /// Transport or decoding failure
    Http(reqwest::Error),
    /// The API answered with a non-success status
    Api { status: u16, message: String },
    /// Index outside the local contact list
    InvalidIndex(usize),
    /// Reading a local image file failed
    Io(std::io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "HTTP error: {}", e),
            ClientError::Api { status, message } => write!(f, "API error {}: {}", status, message),
            ClientError::InvalidIndex(index) => write!(f, "No contact at index {}", index),
            ClientError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e)
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Io(e)
    }
}

use serde::Deserialize;
use serde::Serialize;

/// Fields sent to the creation endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LinkRequest {
    /// Url the short link will redirect to, as entered
    pub destination: String,

    /// Expiry in milliseconds since the Unix epoch
    pub expires: i64,
}

/// A link as created by the creation endpoint
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LinkRecord {
    /// Server assigned ID, the path of the short link
    pub id: String,

    /// Url the short link redirects to
    pub destination: String,
}

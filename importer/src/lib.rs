pub mod convert;
pub mod credentials;
pub mod opendota_api;
pub mod steam_api;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("sending request: {0}")]
    Request(#[source] reqwest::Error),
    #[error("unexpected response status {0}")]
    Status(reqwest::StatusCode),
    #[error("decoding response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("response is missing '{0}'")]
    Missing(&'static str),
}

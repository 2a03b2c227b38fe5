//! REST client for the foundation backend

mod client;
mod endpoint;
mod error;
mod media;
mod payload;
mod reply;
mod traits;

pub use client::ApiClient;
pub use endpoint::Endpoint;
pub use error::SubmissionError;
pub use media::resolve_image_url;
pub use payload::Payload;
pub use reply::ApiReply;
pub use traits::ApiClientTrait;

#[cfg(test)]
pub use error::FALLBACK_MESSAGE;
#[cfg(test)]
pub use payload::PayloadPart;
#[cfg(test)]
pub use traits::MockApiClientTrait;

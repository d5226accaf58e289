//! Collaborator interfaces built on [`Task`](crate::Task): media uploads and
//! message sending, plus the composed upload chain.
//!
//! - [`MediaClient`] - upload destination + image transfer with progress
//! - [`MessageClient`] / [`MessageInput`] - message delivery
//! - [`send_image`] - the url → upload → message chain with injected clients

mod media;
mod messaging;
mod upload;

pub use media::{DownloadUrl, MediaClient};
pub use messaging::{MessageClient, MessageId, MessageInput};
pub use upload::send_image;

//! Image upload pipeline: url → upload → message.
//!
//! [`send_image`] is the canonical dependent-step chain in this crate: obtain
//! an upload destination, push the bytes (reporting progress), then send a
//! message referencing the uploaded asset. Each step runs only after the
//! previous one succeeded; any failure short-circuits the rest of the chain
//! and reaches the final observer unchanged.
//!
//! ```text
//! media.upload_url(name)
//!   └─flat_map─► media.upload_image(data, url) ── on_progress ─► caller
//!                   └─flat_map─► chat.send_message(Image { url }) ─► MessageId
//! ```
//!
//! Clients are injected explicitly; nothing here reads ambient global state.

use std::sync::Arc;

use crate::error::TaskError;
use crate::tasks::Task;

use super::media::MediaClient;
use super::messaging::{MessageClient, MessageId, MessageInput};

/// Uploads an image and sends it as a message to a conversation.
///
/// Succeeds with the id of the delivered message. Upload progress (`0..=100`)
/// is reported through `progress` while the transfer runs; if any step fails,
/// later steps never run and the chain's error observer receives the failure
/// unchanged.
pub fn send_image(
    media: Arc<dyn MediaClient>,
    chat: Arc<dyn MessageClient>,
    name: &str,
    data: Vec<u8>,
    sender_id: &str,
    conversation_id: &str,
    progress: impl Fn(u8) + Send + Sync + 'static,
) -> Task<MessageId, TaskError> {
    let sender_id = sender_id.to_string();
    let conversation_id = conversation_id.to_string();
    let uploader = Arc::clone(&media);

    media
        .upload_url(name)
        .flat_map(move |url| uploader.upload_image(data, &url).on_progress(progress))
        .flat_map(move |url| {
            chat.send_message(MessageInput::image(sender_id, conversation_id, url))
        })
}

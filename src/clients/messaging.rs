//! Messaging collaborator interface and message input model.

use crate::error::TaskError;
use crate::tasks::Task;

use super::media::DownloadUrl;

/// Identifier the messaging backend assigns to a delivered message.
pub type MessageId = String;

/// Send operations exposed by the messaging backend.
pub trait MessageClient: Send + Sync {
    /// Sends one message; succeeds with the id assigned by the backend.
    fn send_message(&self, input: MessageInput) -> Task<MessageId, TaskError>;
}

/// Outgoing message payload.
///
/// The free-text body is the one genuinely optional field and defaults to
/// empty; everything else is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageInput {
    /// Plain text message.
    Text {
        /// Id of the sender.
        sender_id: String,
        /// Id of the conversation the message goes to.
        conversation_id: String,
        /// Free-text body; empty when the sender typed nothing.
        text: String,
    },
    /// Image message referencing an uploaded asset.
    Image {
        /// Id of the sender.
        sender_id: String,
        /// Id of the conversation the message goes to.
        conversation_id: String,
        /// Download URL of the uploaded image.
        image_url: DownloadUrl,
    },
}

impl MessageInput {
    /// Builds a text message; a `None` body falls back to the empty default.
    pub fn text(
        sender_id: impl Into<String>,
        conversation_id: impl Into<String>,
        text: Option<String>,
    ) -> Self {
        MessageInput::Text {
            sender_id: sender_id.into(),
            conversation_id: conversation_id.into(),
            text: text.unwrap_or_default(),
        }
    }

    /// Builds an image message referencing an uploaded asset.
    pub fn image(
        sender_id: impl Into<String>,
        conversation_id: impl Into<String>,
        image_url: impl Into<DownloadUrl>,
    ) -> Self {
        MessageInput::Image {
            sender_id: sender_id.into(),
            conversation_id: conversation_id.into(),
            image_url: image_url.into(),
        }
    }

    /// Id of the sender.
    pub fn sender_id(&self) -> &str {
        match self {
            MessageInput::Text { sender_id, .. } | MessageInput::Image { sender_id, .. } => {
                sender_id
            }
        }
    }

    /// Id of the target conversation.
    pub fn conversation_id(&self) -> &str {
        match self {
            MessageInput::Text {
                conversation_id, ..
            }
            | MessageInput::Image {
                conversation_id, ..
            } => conversation_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_body_falls_back_to_empty() {
        let input = MessageInput::text("user-1", "conv-1", None);
        assert_eq!(
            input,
            MessageInput::Text {
                sender_id: "user-1".into(),
                conversation_id: "conv-1".into(),
                text: String::new(),
            }
        );
    }

    #[test]
    fn test_accessors_cover_both_variants() {
        let image = MessageInput::image("user-2", "conv-9", "https://host/a.jpg");
        assert_eq!(image.sender_id(), "user-2");
        assert_eq!(image.conversation_id(), "conv-9");
    }
}

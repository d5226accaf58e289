//! Media/upload collaborator interface.
//!
//! The concrete client (cloud storage SDK, HTTP uploader, test fake) lives
//! outside this crate; consumers receive it by explicit injection, never from
//! ambient global state.

use crate::error::TaskError;
use crate::tasks::Task;

/// Public download URL of an uploaded asset.
pub type DownloadUrl = String;

/// Upload operations exposed by the media backend.
pub trait MediaClient: Send + Sync {
    /// Resolves the storage destination for a file name.
    fn upload_url(&self, name: &str) -> Task<DownloadUrl, TaskError>;

    /// Uploads raw image bytes to the given destination.
    ///
    /// The returned task reports progress (`0..=100`) while the transfer runs
    /// and succeeds with the asset's download URL.
    fn upload_image(&self, data: Vec<u8>, url: &str) -> Task<DownloadUrl, TaskError>;
}

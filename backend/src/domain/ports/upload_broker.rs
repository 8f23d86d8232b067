//! Driving port for the photo upload broker.
//!
//! Validation happens here, at the contract level, so every implementation
//! (including fixtures) rejects bad uploads before any storage interaction.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::account::AccountId;
use crate::domain::wash::{ImageSlot, StorageKey};
use crate::domain::Error;

/// Content types accepted for wash photos.
pub const ALLOWED_CONTENT_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/heic",
    "image/heif",
];

/// Maximum accepted upload size after client-side compression.
pub const MAX_UPLOAD_BYTES: u64 = 1024 * 1024;

/// Request to mint a presigned upload/view URL pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueUploadRequest {
    /// Authenticated washer namespacing the generated key.
    pub user_id: AccountId,
    /// Declared MIME type of the photo.
    pub file_type: String,
    /// Slot the photo will fill.
    pub image_type: ImageSlot,
    /// Declared size in bytes.
    pub file_size: u64,
}

/// Presigned URL pair plus the key the client stores on the wash record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadGrant {
    /// Short-lived PUT URL for the upload itself.
    pub upload_url: String,
    /// Generated storage key.
    pub key: StorageKey,
    /// Longer-lived GET URL for immediate preview.
    pub view_url: String,
}

/// Reject disallowed content types and oversized files.
///
/// Runs before any storage call; both violations are plain validation
/// failures from the client's point of view.
pub fn validate_upload(file_type: &str, file_size: u64) -> Result<(), Error> {
    if !ALLOWED_CONTENT_TYPES.contains(&file_type) {
        return Err(Error::invalid_request(format!(
            "invalid file type; allowed types: {}",
            ALLOWED_CONTENT_TYPES.join(", ")
        ))
        .with_details(json!({
            "field": "fileType",
            "value": file_type,
            "code": "invalid_file_type",
        })));
    }
    if file_size > MAX_UPLOAD_BYTES {
        return Err(Error::invalid_request(format!(
            "file too large; maximum size: {MAX_UPLOAD_BYTES} bytes"
        ))
        .with_details(json!({
            "field": "fileSize",
            "value": file_size,
            "code": "file_too_large",
        })));
    }
    Ok(())
}

/// Driving port minting presigned upload grants.
#[async_trait]
pub trait UploadBroker: Send + Sync {
    /// Validate the request and mint an upload/view URL pair.
    async fn issue_upload(&self, request: IssueUploadRequest) -> Result<UploadGrant, Error>;
}

/// Fixture broker for handler tests without storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUploadBroker;

#[async_trait]
impl UploadBroker for FixtureUploadBroker {
    async fn issue_upload(&self, request: IssueUploadRequest) -> Result<UploadGrant, Error> {
        validate_upload(&request.file_type, request.file_size)?;
        let key = StorageKey::new(format!(
            "washes/{}/2026-06-12/{}/fixture.jpeg",
            request.user_id,
            request.image_type.as_str()
        ))
        .map_err(|err| Error::internal(format!("invalid fixture key: {err}")))?;
        Ok(UploadGrant {
            upload_url: format!("https://storage.invalid/upload/{key}"),
            view_url: format!("https://storage.invalid/view/{key}"),
            key,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for upload validation.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case("image/jpeg")]
    #[case("image/png")]
    #[case("image/webp")]
    #[case("image/heic")]
    #[case("image/heif")]
    fn allowed_types_pass(#[case] file_type: &str) {
        validate_upload(file_type, 1024).expect("allowed type passes");
    }

    #[rstest]
    #[case("text/plain")]
    #[case("image/gif")]
    #[case("")]
    fn disallowed_types_fail_before_storage(#[case] file_type: &str) {
        let err = validate_upload(file_type, 1024).expect_err("disallowed type fails");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details()
                .and_then(|details| details.get("code"))
                .and_then(serde_json::Value::as_str),
            Some("invalid_file_type")
        );
    }

    #[rstest]
    fn oversized_files_fail() {
        let err = validate_upload("image/jpeg", MAX_UPLOAD_BYTES + 1)
            .expect_err("oversized file fails");
        assert_eq!(
            err.details()
                .and_then(|details| details.get("code"))
                .and_then(serde_json::Value::as_str),
            Some("file_too_large")
        );
    }

    #[rstest]
    fn boundary_size_is_accepted() {
        validate_upload("image/jpeg", MAX_UPLOAD_BYTES).expect("limit itself passes");
    }
}

//! S3-compatible object store adapter.
//!
//! Photos are uploaded and viewed by clients through presigned URLs, so this
//! adapter never proxies image bytes. It signs requests with SigV4 query
//! parameters and speaks the minimal slice of the S3 HTTP API the domain
//! needs: presign, delete, and ListObjectsV2.

mod s3_object_store;
pub(crate) mod sigv4;

pub use s3_object_store::{S3ObjectStore, StorageSettings};

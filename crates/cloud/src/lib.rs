//! Media storage boundary.
//!
//! The rest of the system only sees [`store::MediaStore`]: upload a local
//! file, get back a durable URL plus a deletion handle (and, for video, a
//! probed duration); delete by handle. The S3 implementation lives in
//! [`s3`], the ffprobe duration probe in [`ffprobe`].

pub mod ffprobe;
pub mod s3;
pub mod store;

pub use s3::S3MediaStore;
pub use store::{MediaKind, MediaStore, MediaStoreError, StoredMedia};

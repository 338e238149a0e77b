pub mod content_store;

pub use content_store::{
    validate_sha1, write_atomic, Acquisition, AcquisitionFailure, AcquisitionReport,
    AcquisitionTarget, ContentStore, ProgressCallback, TransferProgress,
};

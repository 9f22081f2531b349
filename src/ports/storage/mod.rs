mod blob_store;

pub use blob_store::{BlobStat, BlobStore, PutOutcome, SignReadRequest};

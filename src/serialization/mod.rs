//! Artifact serialization.
//!
//! Scaler and model artifacts are stored in the `SafeTensors` format:
//! ```text
//! [8-byte header: u64 metadata length (little-endian)]
//! [JSON metadata: tensor names, dtypes, shapes, data_offsets]
//! [Raw tensor data: F32 values in little-endian]
//! ```
//!
//! Only F32 tensors are produced or accepted; a `__metadata__` section
//! written by other tooling is tolerated and ignored.

pub mod safetensors;

pub use safetensors::{SafeTensorsMetadata, TensorMetadata};

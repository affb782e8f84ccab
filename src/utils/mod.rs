//! Small self-contained helpers shared across parsing layers: checksums,
//! the two on-disc datetime encodings, sector arithmetic, and string
//! decoding.

pub mod checksum;
pub mod datetime;
pub mod sector;
pub mod string;

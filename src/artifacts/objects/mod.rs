pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a hex-encoded object ID
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a raw (binary) object ID
pub const OBJECT_ID_RAW_LENGTH: usize = 20;

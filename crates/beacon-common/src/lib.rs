pub mod errors;
pub mod status;
pub mod types;

pub use errors::{BeaconError, ConfigError};
pub use status::{ErrorCode, SubmitResult};
pub use types::{
    ActivityKind, DEFAULT_ACTIVE_STATE, MAX_ASSET_TEXT_LEN, MAX_IMAGE_KEY_LEN, MAX_TEXT_LEN,
};

pub type Result<T> = std::result::Result<T, BeaconError>;

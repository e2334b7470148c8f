//! Validation for the published activity: field lengths and timestamps.

use beacon_common::{MAX_ASSET_TEXT_LEN, MAX_IMAGE_KEY_LEN, MAX_TEXT_LEN};

use crate::schema::BeaconConfig;

use super::helpers::validate_len;

pub(crate) fn validate_presence(errors: &mut Vec<String>, config: &BeaconConfig) {
    let p = &config.presence;

    validate_len(errors, "presence.details", &p.details, MAX_TEXT_LEN);
    validate_len(errors, "presence.state", &p.state, MAX_TEXT_LEN);
    validate_len(errors, "presence.active_state", &p.active_state, MAX_TEXT_LEN);
    validate_len(errors, "presence.large_image", &p.large_image, MAX_IMAGE_KEY_LEN);
    validate_len(errors, "presence.small_image", &p.small_image, MAX_IMAGE_KEY_LEN);
    validate_len(errors, "presence.large_text", &p.large_text, MAX_ASSET_TEXT_LEN);
    validate_len(errors, "presence.small_text", &p.small_text, MAX_ASSET_TEXT_LEN);

    if let Some(end) = p.end {
        if end <= 0 {
            errors.push(format!("presence.end = {end} must be a positive epoch time"));
        }
    }
}

//! Shared validation helpers used by all domain validators.

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is longer than `max` bytes.
pub(crate) fn validate_len(errors: &mut Vec<String>, name: &str, value: &str, max: usize) {
    if value.len() > max {
        errors.push(format!("{name} is {} bytes, limit is {max}", value.len()));
    }
}

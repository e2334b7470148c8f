//! The activity record published to the platform.

use beacon_common::{ActivityKind, MAX_ASSET_TEXT_LEN, MAX_IMAGE_KEY_LEN, MAX_TEXT_LEN};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("{field} is {len} bytes, limit is {max}")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("end timestamp {end} precedes start {start}")]
    EndBeforeStart { start: i64, end: i64 },
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), RecordError> {
    if value.len() > max {
        return Err(RecordError::TooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}

/// Activity start and optional end, epoch seconds.
///
/// `end`, when present, is never before `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamps {
    start: i64,
    end: Option<i64>,
}

impl Timestamps {
    pub fn new(start: i64, end: Option<i64>) -> Result<Self, RecordError> {
        if let Some(end) = end {
            if end < start {
                return Err(RecordError::EndBeforeStart { start, end });
            }
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> Option<i64> {
        self.end
    }
}

/// Image keys and hover texts. Fixed once the record is built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assets {
    pub large_image: String,
    pub large_text: String,
    pub small_image: String,
    pub small_text: String,
}

impl Assets {
    fn validate(&self) -> Result<(), RecordError> {
        check_len("large_image", &self.large_image, MAX_IMAGE_KEY_LEN)?;
        check_len("small_image", &self.small_image, MAX_IMAGE_KEY_LEN)?;
        check_len("large_text", &self.large_text, MAX_ASSET_TEXT_LEN)?;
        check_len("small_text", &self.small_text, MAX_ASSET_TEXT_LEN)?;
        Ok(())
    }
}

/// The single activity this process publishes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresenceRecord {
    details: String,
    state: String,
    kind: ActivityKind,
    timestamps: Timestamps,
    assets: Assets,
}

impl PresenceRecord {
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn timestamps(&self) -> Timestamps {
        self.timestamps
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn set_details(&mut self, details: &str) -> Result<(), RecordError> {
        check_len("details", details, MAX_TEXT_LEN)?;
        details.clone_into(&mut self.details);
        Ok(())
    }

    pub fn set_state(&mut self, state: &str) -> Result<(), RecordError> {
        check_len("state", state, MAX_TEXT_LEN)?;
        state.clone_into(&mut self.state);
        Ok(())
    }

    /// Move `start` to `now`. An `end` that now lies before `start` is
    /// dropped.
    pub fn restart_at(&mut self, now: i64) {
        let end = self.timestamps.end.filter(|end| *end >= now);
        self.timestamps = Timestamps { start: now, end };
    }
}

/// Builds a validated [`PresenceRecord`].
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    details: String,
    state: String,
    kind: ActivityKind,
    end: Option<i64>,
    assets: Assets,
}

impl RecordBuilder {
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn kind(mut self, kind: ActivityKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn end(mut self, end: Option<i64>) -> Self {
        self.end = end;
        self
    }

    pub fn assets(mut self, assets: Assets) -> Self {
        self.assets = assets;
        self
    }

    pub fn build(self, start: i64) -> Result<PresenceRecord, RecordError> {
        check_len("details", &self.details, MAX_TEXT_LEN)?;
        check_len("state", &self.state, MAX_TEXT_LEN)?;
        self.assets.validate()?;
        let timestamps = Timestamps::new(start, self.end)?;

        Ok(PresenceRecord {
            details: self.details,
            state: self.state,
            kind: self.kind,
            timestamps,
            assets: self.assets,
        })
    }
}

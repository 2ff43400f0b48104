use time::{OffsetDateTime, UtcOffset};

/// Source of "now" for billing-cycle calculations.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// Wall clock, viewed from the household's UTC offset.
    System { offset: UtcOffset },
    Fixed(OffsetDateTime),
}

impl Clock {
    pub fn now(&self) -> OffsetDateTime {
        match self {
            Self::System { offset } => OffsetDateTime::now_utc().to_offset(*offset),
            Self::Fixed(at) => *at,
        }
    }

    pub fn offset(&self) -> UtcOffset {
        match self {
            Self::System { offset } => *offset,
            Self::Fixed(at) => at.offset(),
        }
    }
}

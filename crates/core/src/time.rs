use chrono::{DateTime, TimeZone, Utc};

/// Where round timestamps come from.
///
/// Services hold a `Clock` by value; tests pin it with [`fixed_clock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// 2024-01-01 12:00 UTC, the timestamp every fixed test clock reports.
///
/// # Panics
///
/// Panics if the date does not map to exactly one UTC instant.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .expect("2024-01-01 12:00 UTC is unambiguous")
}

/// A `Clock` pinned at [`fixed_now`].
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

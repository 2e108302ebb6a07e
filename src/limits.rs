/// Width of one bookable slot; also the cursor step.
pub const SLOT_MINUTES: i64 = 30;

/// Hard cap on slots returned by one availability query.
pub const MAX_SLOTS: usize = 1000;

/// First bookable hour of the day (inclusive).
pub const BUSINESS_OPEN_HOUR: u32 = 8;

/// Last hour in which a slot may start (inclusive): 16:00 and 16:30 are bookable.
pub const BUSINESS_LAST_HOUR: u32 = 16;

/// Largest accepted booking request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

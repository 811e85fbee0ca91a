/// Identifier assigned to a history entry when a generation completes.
pub type HistoryId = u64;

/// Identifier of a single generation attempt (one `start` call).
pub type AttemptId = u64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

use serde::{Deserialize, Serialize};

/// Trading-session state for an instrument. Presentation code uses this to
/// decide whether a quote should be treated as live.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MarketSession {
    Pre,
    Regular,
    Post,
    Closed,
}

/// A recognized exchange: a fixed trading window in UTC-equivalent
/// minutes-of-day plus its own fixed-date holidays. Deliberately ignores
/// daylight-saving shifts and movable holidays.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub code: &'static str,
    /// Window open, minutes after midnight UTC
    pub open_minutes: u32,
    /// Window close, minutes after midnight UTC
    pub close_minutes: u32,
    /// (month, day) pairs on top of the global holidays
    pub holidays: &'static [(u32, u32)],
}

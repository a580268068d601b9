//! Market session predicate.

use chrono::{Datelike, Local, NaiveTime, Timelike, Weekday};

const OPEN_HOUR: u32 = 9;
const OPEN_MINUTE: u32 = 15;
const CLOSE_HOUR: u32 = 15;
const CLOSE_MINUTE: u32 = 30;

/// Whether the market is open at the given weekday and wall-clock time.
///
/// The session runs 09:15 to 15:30 on weekdays; the close boundary is
/// exclusive.
pub fn is_open_at(weekday: Weekday, time: NaiveTime) -> bool {
    if matches!(weekday, Weekday::Sat | Weekday::Sun) {
        return false;
    }
    let minutes = time.hour() * 60 + time.minute();
    let open = OPEN_HOUR * 60 + OPEN_MINUTE;
    let close = CLOSE_HOUR * 60 + CLOSE_MINUTE;
    minutes >= open && minutes < close
}

/// Whether the market is open right now, in local time.
pub fn is_market_open() -> bool {
    let now = Local::now();
    is_open_at(now.weekday(), now.time())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_weekday_session() {
        assert!(is_open_at(Weekday::Mon, at(10, 0)));
        assert!(is_open_at(Weekday::Fri, at(15, 29)));
    }

    #[test]
    fn test_session_boundaries() {
        assert!(!is_open_at(Weekday::Tue, at(9, 14)));
        assert!(is_open_at(Weekday::Tue, at(9, 15)));
        assert!(!is_open_at(Weekday::Tue, at(15, 30)));
    }

    #[test]
    fn test_weekend_closed() {
        assert!(!is_open_at(Weekday::Sat, at(10, 0)));
        assert!(!is_open_at(Weekday::Sun, at(12, 0)));
    }

    #[test]
    fn test_overnight_closed() {
        assert!(!is_open_at(Weekday::Wed, at(3, 0)));
        assert!(!is_open_at(Weekday::Wed, at(22, 0)));
    }
}

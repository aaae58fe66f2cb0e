//! Wall-clock helpers for the dashboard clock

use chrono::{DateTime, Local, Timelike};

/// Current local time
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Clock text shown on the dashboard (`HH:MM:SS`)
pub fn clock_text<T: Timelike>(time: &T) -> String {
    format!("{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_clock_text_zero_padded() {
        let t = NaiveTime::from_hms_opt(7, 5, 3).unwrap();
        assert_eq!(clock_text(&t), "07:05:03");
    }

    #[test]
    fn test_clock_text_end_of_day() {
        let t = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
        assert_eq!(clock_text(&t), "23:59:59");
    }

    #[test]
    fn test_now_clock_text_shape() {
        let text = clock_text(&now());
        assert_eq!(text.len(), 8);
        assert_eq!(text.as_bytes()[2], b':');
        assert_eq!(text.as_bytes()[5], b':');
    }
}

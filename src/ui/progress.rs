//! Elapsed-time formatting for the run summary.

use std::time::Duration;

/// `250ms`, `4.5s`, or `12m 05s` for long interpreter builds.
pub fn format_duration(d: Duration) -> String {
    let millis = d.as_millis();
    match d.as_secs() {
        0 => format!("{}ms", millis),
        secs if secs < 60 => format!("{:.1}s", d.as_secs_f64()),
        secs => format!("{}m {:02}s", secs / 60, secs % 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_second_in_millis() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
    }

    #[test]
    fn seconds_with_one_decimal() {
        assert_eq!(format_duration(Duration::from_millis(4500)), "4.5s");
    }

    #[test]
    fn minutes_and_padded_seconds() {
        assert_eq!(format_duration(Duration::from_secs(150)), "2m 30s");
        assert_eq!(format_duration(Duration::from_secs(725)), "12m 05s");
    }
}

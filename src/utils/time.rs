use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Humanized elapsed time for dashboard rows.
pub fn format_time_ago(then: DateTime<Utc>) -> String {
    let diff = (Utc::now() - then).num_seconds().max(0);

    if diff < 60 {
        format!("{} sec ago", diff)
    } else if diff < 3600 {
        format!("{} min ago", diff / 60)
    } else if diff < 86400 {
        format!("{} hours ago", diff / 3600)
    } else {
        format!("{} days ago", diff / 86400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn formats_each_band() {
        let now = Utc::now();
        assert_eq!(format_time_ago(now - Duration::seconds(30)), "30 sec ago");
        assert_eq!(format_time_ago(now - Duration::minutes(5)), "5 min ago");
        assert_eq!(format_time_ago(now - Duration::hours(3)), "3 hours ago");
        assert_eq!(format_time_ago(now - Duration::days(2)), "2 days ago");
    }

    #[test]
    fn future_timestamps_clamp_to_now() {
        let soon = Utc::now() + Duration::seconds(90);
        assert_eq!(format_time_ago(soon), "0 sec ago");
    }
}

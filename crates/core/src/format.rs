use crate::types::VideoRecord;

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0).floor() as i64;
    let secs = seconds.rem_euclid(60.0).floor() as i64;
    format!("{:02}:{:02}", mins, secs)
}

/// Format a plain number the short way: `10`, `2.5`, `0.05`.
pub fn format_number(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let s = format!("{:.6}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// How horizontal (time) tick labels are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLabels {
    Seconds,
    Clock,
}

impl TimeLabels {
    /// Clock labels kick in once the axis runs past a minute.
    pub fn for_max_time(max_time: f64) -> Self {
        if max_time > 60.0 {
            TimeLabels::Clock
        } else {
            TimeLabels::Seconds
        }
    }

    pub fn format(self, seconds: f64) -> String {
        match self {
            TimeLabels::Seconds => format_number(seconds),
            TimeLabels::Clock => format_timestamp(seconds),
        }
    }
}

/// One-line summary of a record for terminal output.
pub fn format_record_summary(record: &VideoRecord) -> String {
    let title = record.title.as_deref().unwrap_or(&record.video_id);
    let mut out = title.to_string();
    if let Some(uploader) = &record.uploader {
        out.push_str(&format!(" by {uploader}"));
    }
    if let Some(duration) = record.duration {
        out.push_str(&format!(" ({})", format_timestamp(duration)));
    }
    out
}

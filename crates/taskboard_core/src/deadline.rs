//! Deadline text handling: parsing user input, rendering labels and the
//! upcoming-window test.

use crate::model::Task;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

const DEADLINE_SEPARATORS: [char; 4] = ['-', 'T', ':', ' '];

/// Parses `YYYY-MM-DDTHH:MM` style input into a local point in time.
///
/// The text is split on `-`, `T`, `:` and spaces. Fewer than five components,
/// or components that are not integers or do not form a valid calendar date
/// and time of day, yield `None`. Anything after the minute is ignored.
pub fn parse_deadline(raw: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
    let parts: Vec<&str> = raw.trim().split(DEADLINE_SEPARATORS).collect();
    if parts.len() < 5 {
        return None;
    }

    let year: i32 = parts[0].trim().parse().ok()?;
    let month: u8 = parts[1].trim().parse().ok()?;
    let day: u8 = parts[2].trim().parse().ok()?;
    let hour: u8 = parts[3].trim().parse().ok()?;
    let minute: u8 = parts[4].trim().parse().ok()?;

    let month = Month::try_from(month).ok()?;
    let date = Date::from_calendar_date(year, month, day).ok()?;
    let time = Time::from_hms(hour, minute, 0).ok()?;
    Some(PrimitiveDateTime::new(date, time).assume_offset(offset))
}

pub fn format_timestamp(value: OffsetDateTime, offset: UtcOffset) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]");
    value
        .to_offset(offset)
        .format(format)
        .unwrap_or_else(|_| value.to_string())
}

/// Label shown on every rendered copy of a task.
pub fn compose_display_text(task: &Task, offset: UtcOffset) -> String {
    match task.deadline {
        Some(deadline) => format!(
            "{} (Deadline: {})",
            task.text,
            format_timestamp(deadline, offset)
        ),
        None => task.text.clone(),
    }
}

/// True when `deadline` is strictly after `now` and no further than `window`.
pub fn within_window(deadline: OffsetDateTime, now: OffsetDateTime, window: Duration) -> bool {
    let remaining = deadline - now;
    remaining > Duration::ZERO && remaining <= window
}

#[cfg(test)]
mod tests {
    use super::{compose_display_text, parse_deadline, within_window};
    use crate::model::{Section, Task, TaskId};
    use time::macros::datetime;
    use time::{Duration, UtcOffset};

    #[test]
    fn parses_datetime_local_input() {
        let parsed = parse_deadline("2026-10-18T14:30", UtcOffset::UTC).unwrap();
        assert_eq!(parsed, datetime!(2026-10-18 14:30 UTC));
    }

    #[test]
    fn parses_space_separated_input_and_ignores_seconds() {
        let parsed = parse_deadline(" 2026-10-18 14:30:59 ", UtcOffset::UTC).unwrap();
        assert_eq!(parsed, datetime!(2026-10-18 14:30 UTC));
    }

    #[test]
    fn applies_the_local_offset() {
        let offset = UtcOffset::from_hms(2, 0, 0).unwrap();
        let parsed = parse_deadline("2026-10-18T14:30", offset).unwrap();
        assert_eq!(parsed, datetime!(2026-10-18 12:30 UTC));
    }

    #[test]
    fn rejects_incomplete_or_malformed_input() {
        assert!(parse_deadline("", UtcOffset::UTC).is_none());
        assert!(parse_deadline("2026-10-18", UtcOffset::UTC).is_none());
        assert!(parse_deadline("2026-10-18T14", UtcOffset::UTC).is_none());
        assert!(parse_deadline("2026-13-18T14:30", UtcOffset::UTC).is_none());
        assert!(parse_deadline("2026-02-30T14:30", UtcOffset::UTC).is_none());
        assert!(parse_deadline("2026-10-18T25:30", UtcOffset::UTC).is_none());
        assert!(parse_deadline("soon-ish-or-later-maybe", UtcOffset::UTC).is_none());
    }

    #[test]
    fn display_text_appends_deadline_when_set() {
        let mut task = Task {
            id: TaskId::new(1),
            text: "Submit report".to_string(),
            section: Section::Morning,
            deadline: None,
            completed: false,
            handled: false,
        };
        assert_eq!(compose_display_text(&task, UtcOffset::UTC), "Submit report");

        task.deadline = Some(datetime!(2026-10-18 09:05 UTC));
        assert_eq!(
            compose_display_text(&task, UtcOffset::UTC),
            "Submit report (Deadline: 2026-10-18 09:05)"
        );
    }

    #[test]
    fn window_excludes_elapsed_and_distant_deadlines() {
        let now = datetime!(2026-10-18 12:00 UTC);
        let day = Duration::hours(24);

        assert!(within_window(now + Duration::minutes(10), now, day));
        assert!(within_window(now + day, now, day));
        assert!(!within_window(now, now, day));
        assert!(!within_window(now - Duration::minutes(1), now, day));
        assert!(!within_window(now + day + Duration::minutes(1), now, day));
    }
}

use clap::{Parser, Subcommand};
use taskboard_core::config::{ConfigOverrides, MAX_UPCOMING_WINDOW_HOURS};
use taskboard_core::error::AppError;
use taskboard_core::model::{Section, SurfaceId, TaskId};

/// Interactive task board with deadline reminders.
///
/// Starts a session that reads commands from stdin. Type `help` inside the
/// session for the command list.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output JSON when printing surfaces
    #[arg(long)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE")]
    pub config_override: Vec<String>,
}

/// One command typed into the session.
#[derive(Parser, Debug)]
#[command(name = "taskboard", no_binary_name = true, disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Add a new task
    ///
    /// Example: add "Submit report" --section evening --deadline 2026-10-18T17:00
    Add {
        text: Option<String>,
        #[arg(short, long)]
        section: Option<Section>,
        #[arg(short, long, value_name = "YYYY-MM-DDTHH:MM")]
        deadline: Option<String>,
    },
    /// Mark a task as completed
    ///
    /// Example: done task-1
    Done { id: TaskId },
    /// Reveal the delete control on a completed task's copy
    ///
    /// Example: reveal task-1 --surface upcoming
    Reveal {
        id: TaskId,
        #[arg(long, default_value = "all")]
        surface: SurfaceId,
    },
    /// Delete a task through a revealed delete control
    ///
    /// Example: delete task-1
    Delete {
        id: TaskId,
        #[arg(long, default_value = "all")]
        surface: SurfaceId,
    },
    /// Change a task's deadline
    ///
    /// Example: deadline task-1 2026-10-19T09:00
    Deadline { id: TaskId, datetime: String },
    /// Switch to a surface and print it (all, upcoming or a section)
    ///
    /// Example: show morning
    Show { surface: Option<SurfaceId> },
    /// Print the current surface again
    List,
    /// Check deadlines now instead of waiting for the next tick
    Tick,
    /// Print the current time
    Clock,
}

/// Flag name used to identify config override arguments by the runtime.
pub const CONFIG_OVERRIDE_FLAG: &str = "--config-override";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    Alias(String),
    DefaultSection,
    TickIntervalSecs,
    UpcomingWindowHours,
    DesktopNotifications,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = key_raw
        .split_once('.')
        .map(|(field, rest)| (field.trim(), Some(rest.trim())))
        .unwrap_or((key_raw.trim(), None));

    let canonical_field =
        canonicalize_flag_name(field).ok_or_else(|| "override key cannot be empty".to_string())?;

    let scalar = |target: ConfigOverrideTarget| {
        if remainder.is_some() {
            Err(format!("{canonical_field} override cannot have subfields"))
        } else {
            Ok(ParsedConfigOverride {
                target,
                value: value.clone(),
            })
        }
    };

    match canonical_field.as_str() {
        "theme" => scalar(ConfigOverrideTarget::Theme),
        "default_section" | "section" => scalar(ConfigOverrideTarget::DefaultSection),
        "tick_interval_secs" | "tick_interval" => scalar(ConfigOverrideTarget::TickIntervalSecs),
        "upcoming_window_hours" | "upcoming_window" => {
            scalar(ConfigOverrideTarget::UpcomingWindowHours)
        }
        "desktop_notifications" | "notifications" => {
            scalar(ConfigOverrideTarget::DesktopNotifications)
        }
        "aliases" | "alias" => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| "aliases override requires an alias name".to_string())?;
            Ok(ParsedConfigOverride {
                target: ConfigOverrideTarget::Alias(alias_name.to_string()),
                value: value.clone(),
            })
        }
        other => Err(format!("unknown config field '{other}'")),
    }
}

/// Folds every `--config-override` value into one set of overrides.
pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();

    for entry in raw {
        let parsed = parse_config_override(entry)
            .map_err(|err| AppError::invalid_input(format!("{CONFIG_OVERRIDE_FLAG}: {err}")))?;
        let value = parsed.value;
        let invalid = |expected: &str| {
            AppError::invalid_input(format!(
                "{CONFIG_OVERRIDE_FLAG}: '{value}' is not {expected}"
            ))
        };

        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(value.clone()),
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, value.clone());
            }
            ConfigOverrideTarget::DefaultSection => {
                let section = value
                    .parse::<Section>()
                    .map_err(|_| invalid("a section"))?;
                overrides.default_section = Some(section);
            }
            ConfigOverrideTarget::TickIntervalSecs => {
                let secs = value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| invalid("a positive number of seconds"))?;
                overrides.tick_interval_secs = Some(secs);
            }
            ConfigOverrideTarget::UpcomingWindowHours => {
                let hours = value
                    .parse::<i64>()
                    .ok()
                    .filter(|hours| (1..=MAX_UPCOMING_WINDOW_HOURS).contains(hours))
                    .ok_or_else(|| {
                        invalid(&format!("between 1 and {MAX_UPCOMING_WINDOW_HOURS} hours"))
                    })?;
                overrides.upcoming_window_hours = Some(hours);
            }
            ConfigOverrideTarget::DesktopNotifications => {
                let enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => return Err(invalid("a boolean")),
                };
                overrides.desktop_notifications = Some(enabled);
            }
        }
    }

    Ok(overrides)
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

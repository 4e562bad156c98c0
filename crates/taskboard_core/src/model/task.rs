use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

const TASK_ID_PREFIX: &str = "task-";

/// Identifier of a task, rendered as `task-N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    pub fn sequence(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{TASK_ID_PREFIX}{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim()
            .strip_prefix(TASK_ID_PREFIX)
            .and_then(|digits| digits.parse::<u64>().ok())
            .filter(|sequence| *sequence > 0)
            .map(TaskId)
            .ok_or_else(|| format!("'{}' is not a task id (expected task-N)", raw.trim()))
    }
}

/// Category list a task is filed under.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Early,
    #[default]
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Early,
        Section::Morning,
        Section::Afternoon,
        Section::Evening,
        Section::Night,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Early => "early",
            Section::Morning => "morning",
            Section::Afternoon => "afternoon",
            Section::Evening => "evening",
            Section::Night => "night",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.trim().to_ascii_lowercase();
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == lowered)
            .ok_or_else(|| format!("unknown section '{}'", raw.trim()))
    }
}

/// A display surface that can hold rendered task copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SurfaceId {
    All,
    Section(Section),
    Upcoming,
}

impl SurfaceId {
    /// Every surface in navigation order.
    pub fn all_surfaces() -> Vec<SurfaceId> {
        let mut surfaces = vec![SurfaceId::All];
        surfaces.extend(Section::ALL.into_iter().map(SurfaceId::Section));
        surfaces.push(SurfaceId::Upcoming);
        surfaces
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SurfaceId::All => "all",
            SurfaceId::Section(section) => section.as_str(),
            SurfaceId::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurfaceId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(SurfaceId::All),
            "upcoming" => Ok(SurfaceId::Upcoming),
            other => other
                .parse::<Section>()
                .map(SurfaceId::Section)
                .map_err(|_| format!("unknown surface '{}'", raw.trim())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub section: Section,
    pub deadline: Option<OffsetDateTime>,
    pub completed: bool,
    /// Set once the deadline monitor has resolved the current elapsed deadline.
    pub handled: bool,
}

impl Task {
    pub fn deadline_elapsed(&self, now: OffsetDateTime) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}

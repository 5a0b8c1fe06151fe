use std::fmt;

use uuid::Uuid;

/// Opaque identity an admission decision and its cooldown are keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectId(Uuid);

impl SubjectId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for SubjectId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A player as seen by the admission controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: SubjectId,
    /// Display name, substituted into broadcast templates
    pub name: String,
}

impl Subject {
    pub fn new(id: SubjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Whoever issued the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// Server console. Holds every permission but cannot perform the action itself.
    Console,
    Player(Subject),
}

impl Caller {
    pub fn subject(&self) -> Option<&Subject> {
        match self {
            Self::Console => None,
            Self::Player(subject) => Some(subject),
        }
    }
}

/// Block coordinates inside a named world
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLocation {
    pub world: String,
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl BlockLocation {
    pub fn new(world: impl Into<String>, x: i64, y: i64, z: i64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }
}

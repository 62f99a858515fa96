//! Data model for the signup registry.
//!
//! The external row store knows nothing about types: every row is three
//! strings `{name, day, session}`. This module owns the mapping between
//! that wire shape ([`RawRow`]) and the typed records the engine works
//! with. Per-day After-School enablement travels over the same channel as
//! a sentinel row (`name = "__AFTER__"`, `session = "ENABLED"`), but in
//! the typed model it is a separate entity ([`RegistryRecord::AfterSchoolFlag`]),
//! never a fake signup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseRecordError;

/// Sentinel name marking a row as an After-School feature flag.
pub const AFTER_FLAG_NAME: &str = "__AFTER__";

/// Sentinel session value marking a flag row as enabled.
pub const AFTER_FLAG_SESSION: &str = "ENABLED";

/// A weekday the program runs on (Monday through Friday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// All weekdays in calendar order.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// The wire string for this day, as stored in the registry.
    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = ParseRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Monday" => Ok(Weekday::Monday),
            "Tuesday" => Ok(Weekday::Tuesday),
            "Wednesday" => Ok(Weekday::Wednesday),
            "Thursday" => Ok(Weekday::Thursday),
            "Friday" => Ok(Weekday::Friday),
            other => Err(ParseRecordError::UnknownDay(other.to_string())),
        }
    }
}

/// One of the three tutoring time-slots on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Ep1,
    Ep2,
    After,
}

impl SessionKind {
    /// All session kinds, in the order signups are checked and written.
    pub const ALL: [SessionKind; 3] = [SessionKind::Ep1, SessionKind::Ep2, SessionKind::After];

    /// The wire string for this session, as stored in the registry.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::Ep1 => "EP1",
            SessionKind::Ep2 => "EP2",
            SessionKind::After => "After",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = ParseRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EP1" => Ok(SessionKind::Ep1),
            "EP2" => Ok(SessionKind::Ep2),
            "After" => Ok(SessionKind::After),
            other => Err(ParseRecordError::UnknownSession(other.to_string())),
        }
    }
}

/// A single signup: one person, one day, one session.
///
/// Identity is the full triple. The store enforces no uniqueness, so the
/// engine check-then-inserts to keep at most one row per triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRecord {
    pub name: String,
    pub day: Weekday,
    pub session: SessionKind,
}

impl SignupRecord {
    pub fn new(name: impl Into<String>, day: Weekday, session: SessionKind) -> Self {
        Self {
            name: name.into(),
            day,
            session,
        }
    }
}

/// A typed registry row: either an ordinary signup or an After-School
/// enablement flag for a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryRecord {
    Signup(SignupRecord),
    AfterSchoolFlag(Weekday),
}

impl RegistryRecord {
    /// The signup record, if this is one.
    pub fn as_signup(&self) -> Option<&SignupRecord> {
        match self {
            RegistryRecord::Signup(record) => Some(record),
            RegistryRecord::AfterSchoolFlag(_) => None,
        }
    }
}

/// The raw wire row exchanged with the row store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub name: String,
    pub day: String,
    pub session: String,
}

impl RawRow {
    /// Decode a wire row into a typed record.
    ///
    /// Flag rows are recognized by the sentinel name/session pair. Rows
    /// with unknown day or session strings are decode errors; callers
    /// skip them rather than failing a whole read.
    pub fn decode(&self) -> Result<RegistryRecord, ParseRecordError> {
        let day: Weekday = self.day.parse()?;
        if self.name == AFTER_FLAG_NAME {
            if self.session == AFTER_FLAG_SESSION {
                return Ok(RegistryRecord::AfterSchoolFlag(day));
            }
            return Err(ParseRecordError::UnknownSession(self.session.clone()));
        }
        let session: SessionKind = self.session.parse()?;
        Ok(RegistryRecord::Signup(SignupRecord {
            name: self.name.clone(),
            day,
            session,
        }))
    }

    /// Encode a typed record as a wire row.
    pub fn encode(record: &RegistryRecord) -> RawRow {
        match record {
            RegistryRecord::Signup(signup) => RawRow {
                name: signup.name.clone(),
                day: signup.day.as_str().to_string(),
                session: signup.session.as_str().to_string(),
            },
            RegistryRecord::AfterSchoolFlag(day) => RawRow {
                name: AFTER_FLAG_NAME.to_string(),
                day: day.as_str().to_string(),
                session: AFTER_FLAG_SESSION.to_string(),
            },
        }
    }
}

/// Per-day After-School enablement, derived from flag rows on each read.
///
/// Wednesday is permanently enabled regardless of stored flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AfterSchoolFlags {
    stored: Vec<Weekday>,
}

impl AfterSchoolFlags {
    /// Derive flag state from a full record set.
    pub fn from_records(records: &[RegistryRecord]) -> Self {
        let stored = records
            .iter()
            .filter_map(|record| match record {
                RegistryRecord::AfterSchoolFlag(day) => Some(*day),
                RegistryRecord::Signup(_) => None,
            })
            .collect();
        Self { stored }
    }

    /// Is After School offered on this day?
    pub fn is_enabled(&self, day: Weekday) -> bool {
        day == Weekday::Wednesday || self.stored.contains(&day)
    }

    /// Does a stored flag row exist for this day? (Wednesday's hard-coded
    /// enablement does not count.)
    pub fn has_stored_flag(&self, day: Weekday) -> bool {
        self.stored.contains(&day)
    }
}

/// The per-day roster: who is signed up for each session.
///
/// A pure projection of the record set, recomputed on every read. Names
/// keep registry read order (treated as insertion order); nothing here is
/// ever persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    pub ep1: Vec<String>,
    pub ep2: Vec<String>,
    pub after: Vec<String>,
}

impl Roster {
    /// Project the roster for one day out of a full record set.
    pub fn project(records: &[RegistryRecord], day: Weekday) -> Self {
        let mut roster = Roster::default();
        for signup in records.iter().filter_map(RegistryRecord::as_signup) {
            if signup.day != day {
                continue;
            }
            match signup.session {
                SessionKind::Ep1 => roster.ep1.push(signup.name.clone()),
                SessionKind::Ep2 => roster.ep2.push(signup.name.clone()),
                SessionKind::After => roster.after.push(signup.name.clone()),
            }
        }
        roster
    }
}

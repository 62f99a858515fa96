//! The scheduling engine: signup, removal, roster projection, and
//! After-School enablement.
//!
//! Each operation is a single synchronous decision over one fresh read of
//! the record set, followed by a bounded sequence of writes. Dependent
//! calls are awaited in order; no mutation is pipelined before the checks
//! that gate it.
//!
//! There is no locking and no transaction support in the row store, so
//! two concurrent users can both pass the duplicate check for the same
//! slot before either writes. That read-then-write race is an accepted
//! limitation of the design, not something the engine coordinates around.
//! Removal is naturally idempotent, and a re-attempted signup hits the
//! duplicate check for rows that did land, so a failed or raced operation
//! is recovered by simply running it again.

use tracing::{debug, info};

use crate::confirm::Confirmer;
use crate::error::{EngineError, ValidationError};
use crate::record::{AfterSchoolFlags, RegistryRecord, Roster, SessionKind, SignupRecord, Weekday};
use crate::registry::Registry;

/// Confirmation shown before EP2 is auto-added alongside an EP1 signup.
pub const AUTO_EP2_PROMPT: &str = "There are not enough tutors for EP2. By signing up for EP1 \
    today, you will automatically be signed up for EP2. You can remove yourself later.\n\nContinue?";

/// Confirmation shown before any removal is applied.
pub const REMOVAL_PROMPT: &str = "Are you sure you want to remove yourself from the selected days?";

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// EP2 headcount below which an EP1-only signup triggers the
    /// auto-enrollment gate.
    pub ep2_auto_enroll_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ep2_auto_enroll_threshold: 5,
        }
    }
}

/// A signup request: one name, one day, any subset of sessions.
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub name: String,
    pub day: Weekday,
    pub want_ep1: bool,
    pub want_ep2: bool,
    pub want_after: bool,
}

impl SignupRequest {
    /// Explicitly requested sessions, in the fixed EP1, EP2, After order.
    fn wanted(&self) -> Vec<SessionKind> {
        let mut wanted = Vec::new();
        if self.want_ep1 {
            wanted.push(SessionKind::Ep1);
        }
        if self.want_ep2 {
            wanted.push(SessionKind::Ep2);
        }
        if self.want_after {
            wanted.push(SessionKind::After);
        }
        wanted
    }
}

/// Result of a signup attempt that did not error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    /// Enrolled sessions, in the order their rows were written.
    Enrolled(Vec<SessionKind>),
    /// The confirmation gate was declined; nothing was written.
    Cancelled,
}

/// Result of a removal attempt that did not error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// All matching rows were deleted.
    Removed { deleted: usize },
    /// The confirmation gate was declined; nothing was deleted.
    Cancelled,
}

/// Result of an After-School enablement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableOutcome {
    Enabled,
    AlreadyEnabled,
}

/// The scheduling engine, generic over the registry backend and the
/// confirmation oracle.
#[derive(Debug)]
pub struct SchedulingEngine<R, C> {
    registry: R,
    confirmer: C,
    config: EngineConfig,
}

impl<R: Registry, C: Confirmer> SchedulingEngine<R, C> {
    pub fn new(registry: R, confirmer: C) -> Self {
        Self::with_config(registry, confirmer, EngineConfig::default())
    }

    pub fn with_config(registry: R, confirmer: C, config: EngineConfig) -> Self {
        Self {
            registry,
            confirmer,
            config,
        }
    }

    /// The registry backend (mainly for inspection in tests).
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// The confirmation oracle (mainly for inspection in tests).
    pub fn confirmer(&self) -> &C {
        &self.confirmer
    }

    /// Sign a person up for one or more sessions on a day.
    ///
    /// Checks run in order: input validation (no registry traffic),
    /// session offering for the day, duplicate triples, then the EP2
    /// auto-enrollment gate. Only after every gate resolves are rows
    /// written, auto-added EP2 first, then the explicit sessions in
    /// EP1, EP2, After order.
    pub async fn signup(&self, request: &SignupRequest) -> Result<SignupOutcome, EngineError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let wanted = request.wanted();
        if wanted.is_empty() {
            return Err(ValidationError::NoSessionSelected.into());
        }

        let records = self.registry.fetch_all().await?;
        let flags = AfterSchoolFlags::from_records(&records);

        for &session in &wanted {
            if !session_offered(request.day, session, &flags) {
                return Err(EngineError::NotOffered {
                    day: request.day,
                    session,
                });
            }
        }

        let holds = |session: SessionKind| {
            records.iter().filter_map(RegistryRecord::as_signup).any(|r| {
                r.name == name && r.day == request.day && r.session == session
            })
        };
        for &session in &wanted {
            if holds(session) {
                return Err(EngineError::Duplicate(session));
            }
        }

        // EP1 without explicit EP2: below the headcount threshold, EP2 is
        // added too, but only behind the confirmation gate and only if
        // this person does not already hold EP2 for the day.
        let mut enrolled = Vec::with_capacity(wanted.len() + 1);
        if request.want_ep1 && !request.want_ep2 {
            let ep2_count = records
                .iter()
                .filter_map(RegistryRecord::as_signup)
                .filter(|r| r.day == request.day && r.session == SessionKind::Ep2)
                .count();
            debug!(day = %request.day, ep2_count, "checked EP2 headcount");

            if ep2_count < self.config.ep2_auto_enroll_threshold && !holds(SessionKind::Ep2) {
                if !self.confirmer.confirm(AUTO_EP2_PROMPT) {
                    info!(%name, day = %request.day, "signup cancelled at EP2 gate");
                    return Ok(SignupOutcome::Cancelled);
                }
                enrolled.push(SessionKind::Ep2);
            }
        }
        enrolled.extend(wanted);

        for &session in &enrolled {
            self.registry
                .insert(&RegistryRecord::Signup(SignupRecord::new(
                    name,
                    request.day,
                    session,
                )))
                .await?;
        }
        info!(%name, day = %request.day, sessions = ?enrolled, "signup complete");
        Ok(SignupOutcome::Enrolled(enrolled))
    }

    /// Remove every signup for `name` across the given days.
    ///
    /// The confirmation gate resolves before anything is read or deleted.
    /// Deletions are applied one row at a time with no rollback: if one
    /// fails, rows already deleted stay deleted and retrying the same
    /// removal finishes the job.
    pub async fn remove(
        &self,
        name: &str,
        days: &[Weekday],
    ) -> Result<RemovalOutcome, EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if days.is_empty() {
            return Err(ValidationError::NoDaysSelected.into());
        }

        if !self.confirmer.confirm(REMOVAL_PROMPT) {
            info!(%name, "removal cancelled");
            return Ok(RemovalOutcome::Cancelled);
        }

        let records = self.registry.fetch_all().await?;
        let mut deleted = 0;
        for &day in days {
            for signup in records
                .iter()
                .filter_map(RegistryRecord::as_signup)
                .filter(|r| r.name == name && r.day == day)
            {
                self.registry.delete(name, day, signup.session).await?;
                deleted += 1;
            }
        }
        info!(%name, ?days, deleted, "removal complete");
        Ok(RemovalOutcome::Removed { deleted })
    }

    /// Project the per-session roster for a day from a fresh read.
    pub async fn compute_roster(&self, day: Weekday) -> Result<Roster, EngineError> {
        let records = self.registry.fetch_all().await?;
        Ok(Roster::project(&records, day))
    }

    /// Is After School offered on this day? Wednesday is always on;
    /// other days follow the stored flag rows, re-derived per call.
    pub async fn after_school_enabled(&self, day: Weekday) -> Result<bool, EngineError> {
        if day == Weekday::Wednesday {
            return Ok(true);
        }
        let records = self.registry.fetch_all().await?;
        Ok(AfterSchoolFlags::from_records(&records).is_enabled(day))
    }

    /// Enable After School for a day. Idempotent: an already-enabled day
    /// (Wednesday included) reports `AlreadyEnabled` without writing.
    pub async fn enable_after_school(&self, day: Weekday) -> Result<EnableOutcome, EngineError> {
        if self.after_school_enabled(day).await? {
            return Ok(EnableOutcome::AlreadyEnabled);
        }
        self.registry
            .insert(&RegistryRecord::AfterSchoolFlag(day))
            .await?;
        info!(%day, "After School enabled");
        Ok(EnableOutcome::Enabled)
    }

    /// Sessions that may be requested for a day: Wednesday offers only
    /// After School; other days always offer EP1 and EP2, plus After
    /// School when enabled.
    pub async fn selectable_sessions(&self, day: Weekday) -> Result<Vec<SessionKind>, EngineError> {
        if day == Weekday::Wednesday {
            return Ok(vec![SessionKind::After]);
        }
        let mut sessions = vec![SessionKind::Ep1, SessionKind::Ep2];
        if self.after_school_enabled(day).await? {
            sessions.push(SessionKind::After);
        }
        Ok(sessions)
    }
}

/// Offering rule shared by signup validation and `selectable_sessions`.
fn session_offered(day: Weekday, session: SessionKind, flags: &AfterSchoolFlags) -> bool {
    match session {
        SessionKind::Ep1 | SessionKind::Ep2 => day != Weekday::Wednesday,
        SessionKind::After => flags.is_enabled(day),
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use shared_models::error::ValidationError;
use shared_models::UniqueId;

use crate::error::{InvalidStatusTransition, LifecycleError, ProviderRequired};

pub const MIN_APPOINTMENT_MINUTES: i64 = 15;
pub const DEFAULT_LOCALE: &str = "pt-BR";

// ==============================================================================
// TIME SLOT
// ==============================================================================

/// Half-open interval `[start, end)` of at least fifteen minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeSlot {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl TimeSlot {
    pub fn create(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<Self, ValidationError> {
        if start_time >= end_time {
            return Err(ValidationError::new("time_slot", "Start time must be before end time"));
        }

        if (end_time - start_time).num_seconds() < MIN_APPOINTMENT_MINUTES * 60 {
            return Err(ValidationError::new(
                "time_slot",
                format!("Appointment must be at least {} minutes", MIN_APPOINTMENT_MINUTES),
            ));
        }

        Ok(Self { start_time, end_time })
    }

    /// Builds a slot from RFC 3339 timestamps as they arrive over the wire.
    pub fn parse(start_time: &str, end_time: &str) -> Result<Self, ValidationError> {
        let start = DateTime::parse_from_rfc3339(start_time.trim())
            .map_err(|_| ValidationError::new("start_time", "Invalid start time"))?;
        let end = DateTime::parse_from_rfc3339(end_time.trim())
            .map_err(|_| ValidationError::new("end_time", "Invalid end time"))?;

        Self::create(start.with_timezone(&Utc), end.with_timezone(&Utc))
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn duration_in_minutes(&self) -> i64 {
        let millis = (self.end_time - self.start_time).num_milliseconds();
        (millis + 30_000) / 60_000
    }

    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start_time < other.end_time && self.end_time > other.start_time
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start_time && instant <= self.end_time
    }

    pub fn is_before(&self, other: &TimeSlot) -> bool {
        self.end_time <= other.start_time
    }

    pub fn is_after(&self, other: &TimeSlot) -> bool {
        self.start_time >= other.end_time
    }

    /// Wall-clock range in UTC, e.g. `09:00 - 09:30`. `en-US` uses a 12-hour clock.
    pub fn formatted(&self, locale: &str) -> String {
        let pattern = if locale.eq_ignore_ascii_case("en-US") {
            "%I:%M %p"
        } else {
            "%H:%M"
        };

        format!("{} - {}", self.start_time.format(pattern), self.end_time.format(pattern))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start_time.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.end_time.to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }
}

// ==============================================================================
// APPOINTMENT STATUS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn valid_transitions(&self) -> &'static [AppointmentStatus] {
        match self {
            AppointmentStatus::Scheduled => &[AppointmentStatus::InProgress, AppointmentStatus::Cancelled],
            AppointmentStatus::InProgress => &[AppointmentStatus::Completed, AppointmentStatus::Cancelled],
            AppointmentStatus::Completed | AppointmentStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, target: AppointmentStatus) -> bool {
        self.valid_transitions().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::InProgress => "in_progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::new("status", format!("Invalid appointment status: {}", s)))
    }
}

// ==============================================================================
// APPOINTMENT ENTITY
// ==============================================================================

/// Status and time slot only change through the methods below.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appointment {
    id: UniqueId,
    patient_id: UniqueId,
    provider_id: UniqueId,
    clinic_id: UniqueId,
    time_slot: TimeSlot,
    status: AppointmentStatus,
    reason: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub id: Option<UniqueId>,
    pub patient_id: UniqueId,
    pub provider_id: UniqueId,
    pub clinic_id: UniqueId,
    pub time_slot: TimeSlot,
    pub reason: String,
}

/// Full stored state, for rebuilding an appointment from a backing store.
#[derive(Debug, Clone)]
pub struct AppointmentRecord {
    pub id: UniqueId,
    pub patient_id: UniqueId,
    pub provider_id: UniqueId,
    pub clinic_id: UniqueId,
    pub time_slot: TimeSlot,
    pub status: AppointmentStatus,
    pub reason: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn create(props: NewAppointment) -> Self {
        let now = Utc::now();
        Self {
            id: props.id.unwrap_or_else(UniqueId::generate),
            patient_id: props.patient_id,
            provider_id: props.provider_id,
            clinic_id: props.clinic_id,
            time_slot: props.time_slot,
            status: AppointmentStatus::Scheduled,
            reason: props.reason.trim().to_string(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn reconstitute(record: AppointmentRecord) -> Self {
        Self {
            id: record.id,
            patient_id: record.patient_id,
            provider_id: record.provider_id,
            clinic_id: record.clinic_id,
            time_slot: record.time_slot,
            status: record.status,
            reason: record.reason,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    pub fn id(&self) -> &UniqueId {
        &self.id
    }

    pub fn patient_id(&self) -> &UniqueId {
        &self.patient_id
    }

    pub fn provider_id(&self) -> &UniqueId {
        &self.provider_id
    }

    pub fn clinic_id(&self) -> &UniqueId {
        &self.clinic_id
    }

    pub fn time_slot(&self) -> &TimeSlot {
        &self.time_slot
    }

    pub fn status(&self) -> AppointmentStatus {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Double-booking check. Cancelled appointments never block a slot.
    pub fn overlaps(&self, other: &Appointment) -> bool {
        if self.provider_id != other.provider_id {
            return false;
        }

        if self.status == AppointmentStatus::Cancelled || other.status == AppointmentStatus::Cancelled {
            return false;
        }

        self.time_slot.overlaps(&other.time_slot)
    }

    pub fn start_appointment(&mut self, actor_provider_id: &UniqueId) -> Result<(), LifecycleError> {
        self.ensure_assigned_provider(actor_provider_id)?;
        self.transition_to(AppointmentStatus::InProgress)?;
        Ok(())
    }

    /// Blank notes leave any existing notes untouched.
    pub fn complete_appointment(
        &mut self,
        actor_provider_id: &UniqueId,
        notes: Option<&str>,
    ) -> Result<(), LifecycleError> {
        self.ensure_assigned_provider(actor_provider_id)?;
        self.transition_to(AppointmentStatus::Completed)?;

        if let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) {
            self.notes = Some(notes.to_string());
        }

        Ok(())
    }

    /// No ownership check here; callers must authorize first.
    pub fn cancel(&mut self) -> Result<(), InvalidStatusTransition> {
        self.transition_to(AppointmentStatus::Cancelled)
    }

    pub fn reschedule(&mut self, new_time_slot: TimeSlot) -> Result<(), InvalidStatusTransition> {
        if self.status != AppointmentStatus::Scheduled {
            return Err(InvalidStatusTransition {
                from: self.status,
                to: AppointmentStatus::Scheduled,
            });
        }

        self.time_slot = new_time_slot;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn ensure_assigned_provider(&self, actor_provider_id: &UniqueId) -> Result<(), ProviderRequired> {
        if actor_provider_id != &self.provider_id {
            return Err(ProviderRequired);
        }
        Ok(())
    }

    fn transition_to(&mut self, target: AppointmentStatus) -> Result<(), InvalidStatusTransition> {
        if !self.status.can_transition_to(target) {
            return Err(InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }

        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }
}

// ==============================================================================
// REQUEST/QUERY MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleAppointmentRequest {
    pub patient_id: String,
    pub provider_id: String,
    pub clinic_id: String,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompleteAppointmentRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentFilters {
    pub patient_id: Option<String>,
    pub provider_id: Option<String>,
    pub clinic_id: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl AppointmentFilters {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.patient_id.as_deref().map_or(true, |id| appointment.patient_id().as_str() == id)
            && self.provider_id.as_deref().map_or(true, |id| appointment.provider_id().as_str() == id)
            && self.clinic_id.as_deref().map_or(true, |id| appointment.clinic_id().as_str() == id)
            && self.status.map_or(true, |status| appointment.status() == status)
            && self.start_date.map_or(true, |start| appointment.time_slot().start_time() >= start)
            && self.end_date.map_or(true, |end| appointment.time_slot().end_time() <= end)
    }
}

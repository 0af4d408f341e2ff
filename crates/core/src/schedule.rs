//! A doctor's view of their appointments.

use crate::constants::{
    ANY_APPOINTMENT_STATUS, DEFAULT_APPOINTMENT_STATUS, DEFAULT_APPOINTMENT_WINDOW_DAYS,
};
use crate::models::AppointmentRecord;
use crate::repositories::{appointments, catalog};
use crate::{CoreError, CoreResult, Database};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Optional query parameters for a doctor's appointment list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<String>,
}

/// An [`AppointmentFilter`] with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFilter {
    /// Inclusive lower bound.
    pub from: NaiveDateTime,
    /// Exclusive upper bound: midnight after the end date.
    pub until: NaiveDateTime,
    /// `None` matches every status.
    pub status: Option<String>,
}

impl AppointmentFilter {
    /// Apply defaults relative to `today`: start today, end 90 days later, only `Scheduled`.
    pub fn resolve(&self, today: NaiveDate) -> ResolvedFilter {
        let start = self.start_date.unwrap_or(today);
        let end = self.end_date.unwrap_or_else(|| {
            today
                .checked_add_days(Days::new(DEFAULT_APPOINTMENT_WINDOW_DAYS as u64))
                .unwrap_or(NaiveDate::MAX)
        });
        let until = end
            .checked_add_days(Days::new(1))
            .map(|d| d.and_time(NaiveTime::MIN))
            .unwrap_or(NaiveDateTime::MAX);

        let status = match self.status.as_deref() {
            None => Some(DEFAULT_APPOINTMENT_STATUS.to_owned()),
            Some(ANY_APPOINTMENT_STATUS) => None,
            Some(name) => Some(name.to_owned()),
        };

        ResolvedFilter {
            from: start.and_time(NaiveTime::MIN),
            until,
            status,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScheduleService {
    db: Database,
}

impl ScheduleService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Appointments of `doctor_id` matching `filter`, ordered by date.
    ///
    /// # Errors
    ///
    /// `UnknownAppointmentStatus` when the status name is neither `Any` nor a known status.
    pub async fn doctor_appointments(
        &self,
        doctor_id: i64,
        filter: &AppointmentFilter,
        today: NaiveDate,
    ) -> CoreResult<Vec<AppointmentRecord>> {
        let resolved = filter.resolve(today);

        let status_id = match &resolved.status {
            None => None,
            Some(name) => Some(
                catalog::appointment_status_by_name(self.db.pool(), name)
                    .await?
                    .ok_or_else(|| CoreError::UnknownAppointmentStatus(name.clone()))?
                    .id,
            ),
        };

        appointments::list_for_doctor(
            self.db.pool(),
            doctor_id,
            resolved.from,
            resolved.until,
            status_id,
        )
        .await
    }
}

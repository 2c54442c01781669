// libs/appointment-cell/src/services/availability.rs
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime, Weekday};
use tracing::debug;

use crate::models::{Appointment, AppointmentError, AvailableSlot};
use crate::repository::AppointmentRepository;

/// Number of calendar days scanned, starting at tomorrow.
pub const HORIZON_DAYS: i64 = 30;

/// Hourly slot start times on a regular working day: 09:00 .. 17:00.
const WORKING_HOURS: [u32; 9] = [9, 10, 11, 12, 13, 14, 15, 16, 17];

/// Saturdays keep the same template truncated to slots starting at or
/// before this hour.
const SATURDAY_LAST_HOUR: u32 = 14;

/// Computes the ordered sequence of free one-hour slots over the booking
/// horizon. Advisory and read-only: the authoritative conflict guard lives
/// in the booking transaction, not here. No caching; every call recomputes
/// against the current appointment set.
pub struct AvailabilityEngine<'a> {
    repo: &'a AppointmentRepository,
}

impl<'a> AvailabilityEngine<'a> {
    pub fn new(repo: &'a AppointmentRepository) -> Self {
        Self { repo }
    }

    /// Free slots for the next `HORIZON_DAYS` days starting tomorrow,
    /// day-ascending then time-ascending.
    pub async fn available_slots(&self) -> Result<Vec<AvailableSlot>, AppointmentError> {
        let start_date = Local::now().date_naive() + Duration::days(1);
        self.available_slots_from(start_date).await
    }

    async fn available_slots_from(
        &self,
        start_date: NaiveDate,
    ) -> Result<Vec<AvailableSlot>, AppointmentError> {
        let range_start = start_date.and_hms_opt(0, 0, 0).expect("midnight is valid");
        let range_end = (start_date + Duration::days(HORIZON_DAYS))
            .and_hms_opt(0, 0, 0)
            .expect("midnight is valid");

        // One range query for the whole horizon; conflicts resolve in memory.
        let booked = self.repo.find_active_in_range(range_start, range_end).await?;
        debug!(
            "Computing availability from {} over {} days against {} active appointments",
            start_date,
            HORIZON_DAYS,
            booked.len()
        );

        let mut slots = Vec::new();
        for day_offset in 0..HORIZON_DAYS {
            let date = start_date + Duration::days(day_offset);
            for &hour in day_template(date.weekday()) {
                let time = NaiveTime::from_hms_opt(hour, 0, 0).expect("template hour is valid");
                let slot = AvailableSlot::new(date, time);
                if !is_slot_taken(&slot, &booked) {
                    slots.push(slot);
                }
            }
        }

        Ok(slots)
    }
}

/// Working-hours template for one weekday class. Sundays are closed.
pub fn day_template(weekday: Weekday) -> &'static [u32] {
    match weekday {
        Weekday::Sun => &[],
        Weekday::Sat => &WORKING_HOURS[..=(SATURDAY_LAST_HOUR - WORKING_HOURS[0]) as usize],
        _ => &WORKING_HOURS,
    }
}

/// A slot is taken when an active appointment's instant falls inside the
/// half-open interval `[start, end)`. An appointment starting exactly at
/// the slot's end does not conflict.
fn is_slot_taken(slot: &AvailableSlot, booked: &[Appointment]) -> bool {
    booked
        .iter()
        .any(|apt| apt.appointment_date >= slot.datetime && apt.appointment_date < slot.end())
}

// libs/admin-cell/src/services.rs
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use appointment_cell::{Appointment, AppointmentStatus};
use catalog_cell::Service;

/// Aggregated dashboard figures. Computed on demand from the full
/// appointment and catalog listings; nothing here is persisted.
#[derive(Debug, Serialize)]
pub struct AdminSummary {
    pub appointments: AppointmentCounts,
    pub services: ServiceCounts,
    pub potential_revenue: Decimal,
}

#[derive(Debug, Serialize)]
pub struct AppointmentCounts {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    pub upcoming: usize,
    pub today: usize,
}

#[derive(Debug, Serialize)]
pub struct ServiceCounts {
    pub total: usize,
    pub active: usize,
    pub average_price: Decimal,
}

pub fn build_summary(
    appointments: &[Appointment],
    services: &[Service],
    now: NaiveDateTime,
) -> AdminSummary {
    AdminSummary {
        appointments: count_appointments(appointments, now),
        services: count_services(services),
        potential_revenue: potential_revenue(appointments, services),
    }
}

fn count_appointments(appointments: &[Appointment], now: NaiveDateTime) -> AppointmentCounts {
    let today = now.date();
    let mut counts = AppointmentCounts {
        total: appointments.len(),
        pending: 0,
        confirmed: 0,
        cancelled: 0,
        upcoming: 0,
        today: 0,
    };

    for appointment in appointments {
        match appointment.status {
            AppointmentStatus::Pending => counts.pending += 1,
            AppointmentStatus::Confirmed => counts.confirmed += 1,
            AppointmentStatus::Cancelled => counts.cancelled += 1,
        }
        if appointment.status.is_active() {
            if appointment.appointment_date >= now {
                counts.upcoming += 1;
            }
            if appointment.appointment_date.date() == today {
                counts.today += 1;
            }
        }
    }

    counts
}

fn count_services(services: &[Service]) -> ServiceCounts {
    let active = services.iter().filter(|s| s.is_active).count();
    let average_price = if services.is_empty() {
        Decimal::ZERO
    } else {
        let sum: Decimal = services.iter().map(|s| s.price).sum();
        (sum / Decimal::from(services.len())).round_dp(2)
    };

    ServiceCounts {
        total: services.len(),
        active,
        average_price,
    }
}

/// Sum of active-service prices for confirmed appointments, matching the
/// booked free-text service name against the catalog case-insensitively.
/// Appointments whose name matches no active service contribute zero.
fn potential_revenue(appointments: &[Appointment], services: &[Service]) -> Decimal {
    appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Confirmed)
        .filter_map(|a| {
            services
                .iter()
                .find(|s| s.is_active && s.name.eq_ignore_ascii_case(a.service.trim()))
                .map(|s| s.price)
        })
        .sum()
}

// libs/shared/models/src/lib.rs
//! Shared record and ride types used across the reconciliation cells.

pub mod records;
pub mod ride;

pub use records::{Appointment, IngestionLog, Patient, Provider, Setting, STATUS_BOOKED};
pub use ride::{GeoPoint, Ride};

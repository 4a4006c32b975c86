// models/src/lib.rs
//
// Shared domain records for the hospital front-desk engine: patients,
// doctors, availability slots, the appointment request/appointment pair, the
// session identity, the error taxonomy, and identifier generation.

pub mod appointment;
pub mod availability;
pub mod doctor;
pub mod errors;
pub mod identifiers;
pub mod patient;
pub mod session;

pub use appointment::{
    AppointmentRequest, AppointmentStatus, ApprovedAppointment, NewAppointmentRequest,
    RequestStatus,
};
pub use availability::{AvailabilitySlot, NewSlot};
pub use doctor::Doctor;
pub use errors::{HospitalError, HospitalResult};
pub use identifiers::{ClockIdGenerator, IdGenerator, IdKind, SequentialIdGenerator};
pub use patient::{NewPatient, PatientOrigin, PatientPatch, PatientRecord};
pub use session::{AdminAccount, Credentials, Role, Session};

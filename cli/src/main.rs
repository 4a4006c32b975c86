// cli/src/main.rs
//
// Thin presentation collaborator over the engine: each subcommand maps onto
// one facade operation and prints the result. All business rules live in the
// engine; this binary only parses arguments and renders values.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use lib::{load_config_from_yaml, HospitalConfig, HospitalDatabase};
use models::{
    Credentials, NewAppointmentRequest, NewPatient, NewSlot, PatientOrigin, PatientPatch, Role,
};

#[derive(Parser)]
#[command(name = "hospital-desk", about = "Hospital front-desk engine", version)]
struct Cli {
    /// Directory for the sled database.
    #[arg(long, default_value = "hospital_data", global = true)]
    data_dir: PathBuf,

    /// Optional YAML configuration; overrides --data-dir when set.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Admin,
    Doctor,
    Patient,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => Role::Admin,
            RoleArg::Doctor => Role::Doctor,
            RoleArg::Patient => Role::Patient,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Authenticate and print the resulting session.
    Login {
        #[arg(value_enum)]
        role: RoleArg,
        /// Username (admin/doctor) or email (patient).
        login: String,
        password: String,
    },
    /// Print the doctor roster.
    ListDoctors,
    /// Register a patient record.
    RegisterPatient {
        /// Register into the front-desk collection instead of the portal.
        #[arg(long)]
        front_desk: bool,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        gender: String,
        #[arg(long)]
        blood_group: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        mobile_number: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        zip_code: Option<String>,
        #[arg(long)]
        medical_history: Option<String>,
        #[arg(long)]
        allergies: Option<String>,
        #[arg(long)]
        medications: Option<String>,
    },
    /// List patient records of one collection.
    ListPatients {
        #[arg(long)]
        front_desk: bool,
    },
    /// Fetch one patient by id.
    ShowPatient { id: String },
    /// Case-insensitive search on name or id.
    SearchPatients { term: String },
    /// Patch contact fields of a patient record.
    UpdatePatient {
        id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        mobile_number: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        medical_history: Option<String>,
    },
    /// Delete a patient record.
    DeletePatient { id: String },
    /// Declare a bookable window for a doctor.
    AddSlot {
        #[arg(long)]
        doctor: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long, default_value_t = 1)]
        slots_per_hour: u32,
    },
    /// List a doctor's availability slots.
    ListSlots { doctor: String },
    /// Remove an availability slot.
    RemoveSlot { id: String },
    /// Submit an appointment request.
    RequestAppointment {
        #[arg(long)]
        patient_id: String,
        #[arg(long)]
        patient_name: String,
        #[arg(long)]
        patient_email: String,
        #[arg(long)]
        patient_mobile: String,
        #[arg(long)]
        doctor: String,
        #[arg(long)]
        reason: String,
        #[arg(long, default_value = "")]
        notes: String,
        /// Repeatable preferred date (YYYY-MM-DD).
        #[arg(long = "date")]
        dates: Vec<String>,
        /// Repeatable preferred time (HH:MM).
        #[arg(long = "time")]
        times: Vec<String>,
    },
    /// List appointment requests, optionally scoped.
    ListRequests {
        #[arg(long)]
        doctor: Option<String>,
        #[arg(long)]
        patient: Option<String>,
    },
    /// Approve a pending request, optionally pinning a date and time.
    Approve {
        request_id: String,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
    },
    /// Reject a pending request.
    Reject {
        request_id: String,
        #[arg(long)]
        reason: String,
    },
    /// Cancel a pending request.
    CancelRequest { request_id: String },
    /// Cancel a scheduled appointment.
    CancelAppointment {
        appointment_id: String,
        #[arg(long, default_value = "Cancelled by patient")]
        reason: String,
    },
    /// Mark a scheduled appointment completed.
    Complete {
        appointment_id: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List approved appointments, optionally scoped to a patient.
    ListAppointments {
        #[arg(long)]
        patient: Option<String>,
    },
    /// A doctor's upcoming schedule, sorted by date.
    Schedule { doctor: String },
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from_yaml(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => HospitalConfig::sled_at(&cli.data_dir),
    };

    let db = HospitalDatabase::open(config)
        .await
        .context("Failed to open the hospital database")?;

    match cli.command {
        Command::Login {
            role,
            login,
            password,
        } => {
            let session = db
                .authenticate(role.into(), &Credentials { login, password })
                .await?;
            print_json(&session)?;
        }
        Command::ListDoctors => print_json(&db.all_doctors().await?)?,
        Command::RegisterPatient {
            front_desk,
            full_name,
            age,
            gender,
            blood_group,
            email,
            mobile_number,
            password,
            address,
            city,
            state,
            zip_code,
            medical_history,
            allergies,
            medications,
        } => {
            let origin = if front_desk {
                PatientOrigin::FrontDesk
            } else {
                PatientOrigin::Portal
            };
            let id = db
                .register_patient(
                    origin,
                    NewPatient {
                        full_name,
                        age,
                        gender,
                        blood_group,
                        email,
                        mobile_number,
                        password,
                        address,
                        city,
                        state,
                        zip_code,
                        medical_history,
                        allergies,
                        medications,
                        surgeries: None,
                        emergency_contact: None,
                        emergency_phone: None,
                    },
                )
                .await?;
            println!("Registered patient {}", id);
        }
        Command::ListPatients { front_desk } => {
            let origin = if front_desk {
                PatientOrigin::FrontDesk
            } else {
                PatientOrigin::Portal
            };
            print_json(&db.all_patients(origin).await?)?;
        }
        Command::ShowPatient { id } => match db.patient_by_id(&id).await? {
            Some(patient) => print_json(&patient)?,
            None => println!("Patient not found"),
        },
        Command::SearchPatients { term } => print_json(&db.search_patients(&term).await?)?,
        Command::UpdatePatient {
            id,
            email,
            mobile_number,
            address,
            medical_history,
        } => {
            db.update_patient(
                &id,
                PatientPatch {
                    email,
                    mobile_number,
                    address,
                    medical_history,
                    ..PatientPatch::default()
                },
            )
            .await?;
            println!("Patient {} updated", id);
        }
        Command::DeletePatient { id } => {
            db.delete_patient(&id).await?;
            println!("Patient {} deleted", id);
        }
        Command::AddSlot {
            doctor,
            date,
            start,
            end,
            slots_per_hour,
        } => {
            let id = db
                .add_availability_slot(
                    &doctor,
                    NewSlot {
                        date,
                        start_time: start,
                        end_time: end,
                        slots_per_hour,
                    },
                )
                .await?;
            println!("Added slot {}", id);
        }
        Command::ListSlots { doctor } => print_json(&db.availability_for_doctor(&doctor).await?)?,
        Command::RemoveSlot { id } => {
            db.remove_availability_slot(&id).await?;
            println!("Slot {} removed", id);
        }
        Command::RequestAppointment {
            patient_id,
            patient_name,
            patient_email,
            patient_mobile,
            doctor,
            reason,
            notes,
            dates,
            times,
        } => {
            let id = db
                .submit_appointment_request(NewAppointmentRequest {
                    patient_user_id: patient_id,
                    patient_name,
                    patient_email,
                    patient_mobile,
                    doctor_username: doctor,
                    reason,
                    notes,
                    preferred_dates: dates,
                    preferred_times: times,
                })
                .await?;
            println!("Request submitted (ID: {})", id);
        }
        Command::ListRequests { doctor, patient } => {
            let requests = match (doctor, patient) {
                (Some(doctor), _) => db.appointment_requests_for_doctor(&doctor).await?,
                (None, Some(patient)) => db.appointment_requests_for_patient(&patient).await?,
                (None, None) => db.all_appointment_requests().await?,
            };
            print_json(&requests)?;
        }
        Command::Approve {
            request_id,
            notes,
            date,
            time,
        } => {
            let id = db
                .approve_appointment_request(&request_id, &notes, date.as_deref(), time.as_deref())
                .await?;
            println!("Appointment approved (ID: {})", id);
        }
        Command::Reject { request_id, reason } => {
            db.reject_appointment_request(&request_id, &reason).await?;
            println!("Request {} rejected", request_id);
        }
        Command::CancelRequest { request_id } => {
            db.cancel_appointment_request(&request_id).await?;
            println!("Request {} cancelled", request_id);
        }
        Command::CancelAppointment {
            appointment_id,
            reason,
        } => {
            db.cancel_appointment(&appointment_id, &reason).await?;
            println!("Appointment {} cancelled", appointment_id);
        }
        Command::Complete {
            appointment_id,
            notes,
        } => {
            db.complete_appointment(&appointment_id, &notes).await?;
            println!("Appointment {} completed", appointment_id);
        }
        Command::ListAppointments { patient } => {
            let appointments = match patient {
                Some(patient) => db.appointments_for_patient(&patient).await?,
                None => db.all_appointments().await?,
            };
            print_json(&appointments)?;
        }
        Command::Schedule { doctor } => print_json(&db.schedule_for_doctor(&doctor).await?)?,
    }

    db.flush().await?;
    Ok(())
}

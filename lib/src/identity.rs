// lib/src/identity.rs
//
// Credential lookup and the single current session. Credentials are compared
// verbatim against the stored records; there is no hashing or lockout in
// this system.

use std::sync::Arc;

use log::{debug, info};
use models::errors::{HospitalError, HospitalResult};
use models::{Credentials, Role, Session};
use tokio::sync::RwLock;

use crate::collections::Store;

/// Holds the one current session. Authenticating replaces any prior session
/// silently; there is no expiry and no multi-session support.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn replace(&self, session: Session) {
        let mut current = self.current.write().await;
        *current = Some(session);
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn end(&self) {
        let mut current = self.current.write().await;
        *current = None;
    }
}

pub struct IdentityStore {
    store: Arc<Store>,
    sessions: SessionStore,
}

impl IdentityStore {
    pub fn new(store: Arc<Store>) -> Self {
        IdentityStore {
            store,
            sessions: SessionStore::new(),
        }
    }

    /// Exact-match credential check for the given role. On success the new
    /// session becomes current, replacing whatever was there.
    pub async fn authenticate(
        &self,
        role: Role,
        credentials: &Credentials,
    ) -> HospitalResult<Session> {
        let session = match role {
            Role::Admin => self.authenticate_admin(credentials).await?,
            Role::Doctor => self.authenticate_doctor(credentials).await?,
            Role::Patient => self.authenticate_patient(credentials).await?,
        };
        info!("{} login successful for {}", role, session.name);
        self.sessions.replace(session.clone()).await;
        Ok(session)
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.sessions.current().await
    }

    pub async fn end_session(&self) {
        debug!("Ending current session");
        self.sessions.end().await;
    }

    async fn authenticate_admin(&self, credentials: &Credentials) -> HospitalResult<Session> {
        let admin = self.store.admin.load().await?;
        match admin {
            Some(admin)
                if admin.username == credentials.login
                    && admin.password == credentials.password =>
            {
                Ok(Session::admin(&admin.name))
            }
            _ => Err(HospitalError::Authentication(
                "Invalid admin credentials".to_string(),
            )),
        }
    }

    async fn authenticate_doctor(&self, credentials: &Credentials) -> HospitalResult<Session> {
        let doctors = self.store.doctors.load().await?;
        doctors
            .iter()
            .find(|d| d.username == credentials.login && d.password == credentials.password)
            .map(|d| Session::doctor(&d.name, &d.username, &d.specialization))
            .ok_or_else(|| {
                HospitalError::Authentication("Invalid doctor credentials".to_string())
            })
    }

    async fn authenticate_patient(&self, credentials: &Credentials) -> HospitalResult<Session> {
        let patients = self.store.portal_patients.load().await?;
        patients
            .iter()
            .find(|p| {
                p.email == credentials.login
                    && p.password.as_deref() == Some(credentials.password.as_str())
            })
            .map(|p| {
                Session::patient(
                    &p.full_name,
                    &p.email,
                    p.patient_user_id.as_deref().unwrap_or_default(),
                    &p.mobile_number,
                )
            })
            .ok_or_else(|| {
                HospitalError::Authentication("Invalid email or password".to_string())
            })
    }
}

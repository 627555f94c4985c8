//! # Student Service
//!
//! Lifecycle of student records. The only kind with a generated identifying field: a create
//! without an enrollment code gets one from the [`EnrollmentCodeGenerator`].

use super::lifecycle::RecordLifecycle;
use crate::enrollment::EnrollmentCodeGenerator;
use crate::error::ServiceError;
use crate::model::{CreateStudentRequest, Student, StudentCreate, StudentId, StudentUpdate};
use crate::validation::{non_blank, require, require_if_present};
use record_framework::{EventEmitter, ListQuery, Page, PageRequest, StoreClient};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Generated codes tried before a create gives up with `Conflict`.
const CODE_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct StudentService {
    store: StoreClient<Student>,
    events: EventEmitter,
    codes: Arc<EnrollmentCodeGenerator>,
}

impl RecordLifecycle<Student> for StudentService {
    fn store(&self) -> &StoreClient<Student> {
        &self.store
    }

    fn events(&self) -> &EventEmitter {
        &self.events
    }
}

impl StudentService {
    pub fn new(
        store: StoreClient<Student>,
        events: EventEmitter,
        codes: Arc<EnrollmentCodeGenerator>,
    ) -> Self {
        Self {
            store,
            events,
            codes,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn create(&self, request: CreateStudentRequest) -> Result<Student, ServiceError> {
        debug!(?request, "create_student called");
        require("name", &request.name)?;
        require("class_group", &request.class_group)?;
        require("contact", &request.contact)?;

        if let Some(code) = non_blank(request.enrollment_code.clone()) {
            self.ensure_available(&code, None).await?;
            let student = self
                .insert_and_announce(StudentCreate::from_request(request, code))
                .await?;
            info!(id = %student.id, code = %student.enrollment_code, "Student created");
            return Ok(student);
        }

        let mut last_code = String::new();
        for attempt in 1..=CODE_ATTEMPTS {
            let code = self.codes.generate();
            if let Err(e) = self.ensure_available(&code, None).await {
                if matches!(e, ServiceError::Conflict { .. }) {
                    warn!(%code, attempt, "Generated enrollment code taken");
                    last_code = code;
                    continue;
                }
                return Err(e);
            }
            match self
                .insert_and_announce(StudentCreate::from_request(request.clone(), code.clone()))
                .await
            {
                Ok(student) => {
                    info!(id = %student.id, code = %student.enrollment_code, "Student created");
                    return Ok(student);
                }
                Err(ServiceError::Conflict { .. }) => {
                    warn!(%code, attempt, "Generated enrollment code taken at commit");
                    last_code = code;
                }
                Err(e) => return Err(e),
            }
        }

        Err(ServiceError::Conflict {
            kind: "student",
            value: last_code,
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: StudentId) -> Result<Student, ServiceError> {
        self.fetch(id).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_enrollment_code(&self, code: &str) -> Result<Student, ServiceError> {
        self.fetch_by_key(code).await
    }

    /// `query.category` filters on the class group.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: &ListQuery,
        page: PageRequest,
    ) -> Result<Page<Student>, ServiceError> {
        self.find_page(query, page).await
    }

    #[instrument(skip(self, update))]
    pub async fn update(
        &self,
        id: StudentId,
        mut update: StudentUpdate,
    ) -> Result<Student, ServiceError> {
        debug!(?update, "update_student called");
        require_if_present("name", update.name.as_deref())?;
        require_if_present("enrollment_code", update.enrollment_code.as_deref())?;
        require_if_present("class_group", update.class_group.as_deref())?;
        require_if_present("contact", update.contact.as_deref())?;

        let current = self.fetch(id).await?;
        update.enrollment_code = non_blank(update.enrollment_code);
        if let Some(code) = &update.enrollment_code {
            self.ensure_available(code, Some(&current)).await?;
        }
        let student = self.update_and_announce(id, update).await?;
        info!(%id, "Student updated");
        Ok(student)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: StudentId) -> Result<(), ServiceError> {
        self.remove(id).await?;
        info!(%id, "Student deleted");
        Ok(())
    }
}

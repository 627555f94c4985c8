use super::lifecycle::RecordLifecycle;
use crate::error::ServiceError;
use crate::model::{Professor, ProfessorCreate, ProfessorId, ProfessorUpdate};
use crate::validation::{non_blank, require, require_if_present};
use record_framework::{EventEmitter, ListQuery, Page, PageRequest, StoreClient};
use tracing::{debug, info, instrument};

/// Lifecycle of professor records, keyed by email (case-insensitive).
#[derive(Clone)]
pub struct ProfessorService {
    store: StoreClient<Professor>,
    events: EventEmitter,
}

impl RecordLifecycle<Professor> for ProfessorService {
    fn store(&self) -> &StoreClient<Professor> {
        &self.store
    }

    fn events(&self) -> &EventEmitter {
        &self.events
    }
}

impl ProfessorService {
    pub fn new(store: StoreClient<Professor>, events: EventEmitter) -> Self {
        Self { store, events }
    }

    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn create(&self, mut params: ProfessorCreate) -> Result<Professor, ServiceError> {
        debug!(?params, "create_professor called");
        require("name", &params.name)?;
        require("email", &params.email)?;

        params.email = params.email.trim().to_owned();
        params.specialty = non_blank(params.specialty);
        self.ensure_available(&params.email, None).await?;

        let professor = self.insert_and_announce(params).await?;
        info!(id = %professor.id, "Professor created");
        Ok(professor)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ProfessorId) -> Result<Professor, ServiceError> {
        self.fetch(id).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_email(&self, email: &str) -> Result<Professor, ServiceError> {
        self.fetch_by_key(email).await
    }

    /// `query.category` filters on the specialty.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: &ListQuery,
        page: PageRequest,
    ) -> Result<Page<Professor>, ServiceError> {
        self.find_page(query, page).await
    }

    #[instrument(skip(self, update))]
    pub async fn update(
        &self,
        id: ProfessorId,
        mut update: ProfessorUpdate,
    ) -> Result<Professor, ServiceError> {
        debug!(?update, "update_professor called");
        require_if_present("name", update.name.as_deref())?;
        require_if_present("email", update.email.as_deref())?;

        let current = self.fetch(id).await?;
        update.email = update.email.map(|e| e.trim().to_owned());
        update.specialty = non_blank(update.specialty);
        if let Some(email) = &update.email {
            self.ensure_available(email, Some(&current)).await?;
        }

        let professor = self.update_and_announce(id, update).await?;
        info!(%id, "Professor updated");
        Ok(professor)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProfessorId) -> Result<(), ServiceError> {
        self.remove(id).await?;
        info!(%id, "Professor deleted");
        Ok(())
    }
}

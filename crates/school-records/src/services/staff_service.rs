use super::lifecycle::RecordLifecycle;
use crate::error::ServiceError;
use crate::model::{StaffCreate, StaffId, StaffMember, StaffUpdate};
use crate::validation::{require, require_if_present};
use record_framework::{EventEmitter, ListQuery, Page, PageRequest, StoreClient};
use tracing::{debug, info, instrument};

/// Lifecycle of administrative staff records, keyed by email (case-insensitive).
#[derive(Clone)]
pub struct StaffService {
    store: StoreClient<StaffMember>,
    events: EventEmitter,
}

impl RecordLifecycle<StaffMember> for StaffService {
    fn store(&self) -> &StoreClient<StaffMember> {
        &self.store
    }

    fn events(&self) -> &EventEmitter {
        &self.events
    }
}

impl StaffService {
    pub fn new(store: StoreClient<StaffMember>, events: EventEmitter) -> Self {
        Self { store, events }
    }

    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn create(&self, mut params: StaffCreate) -> Result<StaffMember, ServiceError> {
        debug!(?params, "create_staff called");
        require("name", &params.name)?;
        require("email", &params.email)?;
        require("position", &params.position)?;

        params.email = params.email.trim().to_owned();
        self.ensure_available(&params.email, None).await?;

        let member = self.insert_and_announce(params).await?;
        info!(id = %member.id, "Staff member created");
        Ok(member)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: StaffId) -> Result<StaffMember, ServiceError> {
        self.fetch(id).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_email(&self, email: &str) -> Result<StaffMember, ServiceError> {
        self.fetch_by_key(email).await
    }

    /// `query.category` filters on the position.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: &ListQuery,
        page: PageRequest,
    ) -> Result<Page<StaffMember>, ServiceError> {
        self.find_page(query, page).await
    }

    #[instrument(skip(self, update))]
    pub async fn update(
        &self,
        id: StaffId,
        mut update: StaffUpdate,
    ) -> Result<StaffMember, ServiceError> {
        debug!(?update, "update_staff called");
        require_if_present("name", update.name.as_deref())?;
        require_if_present("email", update.email.as_deref())?;
        require_if_present("position", update.position.as_deref())?;

        let current = self.fetch(id).await?;
        update.email = update.email.map(|e| e.trim().to_owned());
        if let Some(email) = &update.email {
            self.ensure_available(email, Some(&current)).await?;
        }

        let member = self.update_and_announce(id, update).await?;
        info!(%id, "Staff member updated");
        Ok(member)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: StaffId) -> Result<(), ServiceError> {
        self.remove(id).await?;
        info!(%id, "Staff member deleted");
        Ok(())
    }
}

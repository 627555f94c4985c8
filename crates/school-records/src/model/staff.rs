use chrono::{DateTime, NaiveDate, Utc};
use record_framework::RecordEntity;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

super::record_id!(
    /// Store-assigned staff member id.
    StaffId
);

/// A member of the administrative staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub email: String,
    pub position: String,
    pub hire_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffCreate {
    pub name: String,
    pub email: String,
    pub position: String,
    pub hire_date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

impl RecordEntity for StaffMember {
    const KIND: &'static str = "staff";
    type Id = StaffId;
    type Create = StaffCreate;
    type Update = StaffUpdate;
    type Snapshot = StaffMember;

    fn from_create_params(id: StaffId, params: StaffCreate, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: params.name,
            email: params.email,
            position: params.position,
            hire_date: params.hire_date,
        }
    }

    fn id(&self) -> StaffId {
        self.id
    }

    fn identifying_field(&self) -> &str {
        &self.email
    }

    fn normalize_key(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    fn apply_update(&mut self, update: StaffUpdate, _now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(hire_date) = update.hire_date {
            self.hire_date = hire_date;
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Option<&str> {
        Some(&self.position)
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["id", "name", "email", "position", "hire_date"]
    }

    fn compare_by(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "id" => Some(self.id.cmp(&other.id)),
            "name" => Some(self.name.cmp(&other.name)),
            "email" => Some(self.email.to_lowercase().cmp(&other.email.to_lowercase())),
            "position" => Some(self.position.cmp(&other.position)),
            "hire_date" => Some(self.hire_date.cmp(&other.hire_date)),
            _ => None,
        }
    }

    fn snapshot(&self) -> StaffMember {
        self.clone()
    }
}

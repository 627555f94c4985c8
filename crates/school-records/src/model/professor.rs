use chrono::{DateTime, NaiveDate, Utc};
use record_framework::RecordEntity;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

super::record_id!(
    /// Store-assigned professor id.
    ProfessorId
);

/// A teaching professor. The email is unique, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub id: ProfessorId,
    pub name: String,
    pub email: String,
    pub specialty: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessorCreate {
    pub name: String,
    pub email: String,
    pub specialty: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessorUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

impl RecordEntity for Professor {
    const KIND: &'static str = "professor";
    type Id = ProfessorId;
    type Create = ProfessorCreate;
    type Update = ProfessorUpdate;
    type Snapshot = Professor;

    fn from_create_params(id: ProfessorId, params: ProfessorCreate, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: params.name,
            email: params.email,
            specialty: params.specialty,
            hire_date: params.hire_date,
        }
    }

    fn id(&self) -> ProfessorId {
        self.id
    }

    fn identifying_field(&self) -> &str {
        &self.email
    }

    fn normalize_key(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    fn apply_update(&mut self, update: ProfessorUpdate, _now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if update.specialty.is_some() {
            self.specialty = update.specialty;
        }
        if update.hire_date.is_some() {
            self.hire_date = update.hire_date;
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Option<&str> {
        self.specialty.as_deref()
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["id", "name", "email", "specialty", "hire_date"]
    }

    fn compare_by(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "id" => Some(self.id.cmp(&other.id)),
            "name" => Some(self.name.cmp(&other.name)),
            "email" => Some(self.email.to_lowercase().cmp(&other.email.to_lowercase())),
            "specialty" => Some(self.specialty.cmp(&other.specialty)),
            "hire_date" => Some(self.hire_date.cmp(&other.hire_date)),
            _ => None,
        }
    }

    fn snapshot(&self) -> Professor {
        self.clone()
    }
}

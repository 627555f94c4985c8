use chrono::{DateTime, NaiveDate, Utc};
use record_framework::RecordEntity;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

super::record_id!(
    /// Store-assigned student id.
    StudentId
);

/// Postal address embedded in a student record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub postal_code: String,
    pub city: String,
    pub state: String,
}

/// An enrolled student. Identified by a unique enrollment code.
///
/// See [`impl RecordEntity for Student`](#impl-RecordEntity-for-Student) for the create and
/// update payloads ([`StudentCreate`], [`StudentUpdate`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub enrollment_code: String,
    pub birth_date: NaiveDate,
    pub class_group: String,
    pub contact: String,
    pub address: Address,
}

/// A create request as callers send it; the enrollment code may be left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
    pub enrollment_code: Option<String>,
    pub birth_date: NaiveDate,
    pub class_group: String,
    pub contact: String,
    pub address: Address,
}

/// Store payload for a new student. The enrollment code is always resolved by now.
#[derive(Debug, Clone)]
pub struct StudentCreate {
    pub name: String,
    pub enrollment_code: String,
    pub birth_date: NaiveDate,
    pub class_group: String,
    pub contact: String,
    pub address: Address,
}

impl StudentCreate {
    pub fn from_request(request: CreateStudentRequest, enrollment_code: String) -> Self {
        Self {
            name: request.name,
            enrollment_code,
            birth_date: request.birth_date,
            class_group: request.class_group,
            contact: request.contact,
            address: request.address,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub enrollment_code: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub class_group: Option<String>,
    pub contact: Option<String>,
    pub address: Option<Address>,
}

impl RecordEntity for Student {
    const KIND: &'static str = "student";
    type Id = StudentId;
    type Create = StudentCreate;
    type Update = StudentUpdate;
    type Snapshot = Student;

    fn from_create_params(id: StudentId, params: StudentCreate, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: params.name,
            enrollment_code: params.enrollment_code,
            birth_date: params.birth_date,
            class_group: params.class_group,
            contact: params.contact,
            address: params.address,
        }
    }

    fn id(&self) -> StudentId {
        self.id
    }

    fn identifying_field(&self) -> &str {
        &self.enrollment_code
    }

    fn apply_update(&mut self, update: StudentUpdate, _now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(code) = update.enrollment_code {
            self.enrollment_code = code;
        }
        if let Some(birth_date) = update.birth_date {
            self.birth_date = birth_date;
        }
        if let Some(class_group) = update.class_group {
            self.class_group = class_group;
        }
        if let Some(contact) = update.contact {
            self.contact = contact;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Option<&str> {
        Some(&self.class_group)
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["id", "name", "enrollment_code", "birth_date", "class_group"]
    }

    fn compare_by(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "id" => Some(self.id.cmp(&other.id)),
            "name" => Some(self.name.cmp(&other.name)),
            "enrollment_code" => Some(self.enrollment_code.cmp(&other.enrollment_code)),
            "birth_date" => Some(self.birth_date.cmp(&other.birth_date)),
            "class_group" => Some(self.class_group.cmp(&other.class_group)),
            _ => None,
        }
    }

    fn snapshot(&self) -> Student {
        self.clone()
    }
}

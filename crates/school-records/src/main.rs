//! Demo run: starts the system on an in-process bus, walks each record kind through its
//! lifecycle and prints every event the bus carried.

use chrono::NaiveDate;
use record_framework::tracing::setup_tracing;
use record_framework::{ListQuery, PageRequest, Sort};
use school_records::config::SystemConfig;
use school_records::lifecycle::SchoolSystem;
use school_records::model::{
    Address, CreateStudentRequest, CreateUserRequest, ProfessorCreate, Role, StaffCreate,
    StudentUpdate, UpdateUserRequest,
};
use std::error::Error;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_tracing();

    let system = SchoolSystem::new(SystemConfig::from_env()?)?;
    let mut feed = match system.bus() {
        Some(bus) => bus.subscribe(),
        None => return Err("school system started without a bus".into()),
    };

    let span = tracing::info_span!("user_lifecycle");
    async {
        let admin = system
            .users
            .create(CreateUserRequest {
                name: "Ada Admin".into(),
                email: "ada@school.edu".into(),
                role: Role::Admin,
                password: "correct horse".into(),
            })
            .await?;
        info!(id = %admin.id, "Admin registered");

        if let Err(e) = system
            .users
            .create(CreateUserRequest {
                name: "Impostor".into(),
                email: "ADA@school.edu".into(),
                role: Role::Student,
                password: "guess".into(),
            })
            .await
        {
            info!(error = %e, "Duplicate rejected");
        }

        system
            .users
            .update(
                admin.id,
                UpdateUserRequest {
                    email: Some("ada.lovelace@school.edu".into()),
                    ..Default::default()
                },
            )
            .await?;
        let ok = system
            .users
            .verify_password("ada.lovelace@school.edu", "correct horse")
            .await?;
        info!(ok, "Password check");
        Ok::<_, Box<dyn Error>>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("student_lifecycle");
    async {
        let student = system
            .students
            .create(CreateStudentRequest {
                name: "Bruno Lima".into(),
                enrollment_code: None,
                birth_date: NaiveDate::from_ymd_opt(2010, 3, 14).ok_or("bad date")?,
                class_group: "7A".into(),
                contact: "+55 11 99999-0000".into(),
                address: Address {
                    street: "Rua das Flores".into(),
                    number: "42".into(),
                    postal_code: "01000-000".into(),
                    city: "Sao Paulo".into(),
                    state: "SP".into(),
                },
            })
            .await?;
        info!(id = %student.id, code = %student.enrollment_code, "Student enrolled");

        let found = system
            .students
            .get_by_enrollment_code(&student.enrollment_code)
            .await?;
        system
            .students
            .update(
                found.id,
                StudentUpdate {
                    class_group: Some("7B".into()),
                    ..Default::default()
                },
            )
            .await?;

        let page = system
            .students
            .list(
                &ListQuery::by_category("7b"),
                PageRequest::default().sorted_by(Sort::asc("name")),
            )
            .await?;
        info!(total = page.total_elements, "Students in 7B");

        system.students.delete(student.id).await?;
        Ok::<_, Box<dyn Error>>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("faculty_lifecycle");
    async {
        let professor = system
            .professors
            .create(ProfessorCreate {
                name: "Carla Souza".into(),
                email: "carla@school.edu".into(),
                specialty: Some("Mathematics".into()),
                hire_date: NaiveDate::from_ymd_opt(2019, 2, 1),
            })
            .await?;
        info!(id = %professor.id, "Professor hired");

        let clerk = system
            .staff
            .create(StaffCreate {
                name: "Diego Alves".into(),
                email: "diego@school.edu".into(),
                position: "Secretary".into(),
                hire_date: NaiveDate::from_ymd_opt(2021, 8, 16).ok_or("bad date")?,
            })
            .await?;
        system.staff.delete(clerk.id).await?;
        Ok::<_, Box<dyn Error>>(())
    }
    .instrument(span)
    .await?;

    let dead_letters = system.shutdown().await?;
    if !dead_letters.is_empty() {
        error!(count = dead_letters.len(), "Undelivered events");
    }

    while let Ok(message) = feed.try_recv() {
        println!("{} {} {}", message.exchange, message.routing_key, message.body);
    }

    info!("Demo completed");
    Ok(())
}

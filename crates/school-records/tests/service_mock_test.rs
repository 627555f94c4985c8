use chrono::NaiveDate;
use record_framework::mock::{MockPublisher, MockStore};
use record_framework::{
    EmitSettings, EventEmitter, FrameworkError, ListFilter, ListQuery, Page, PageRequest,
};
use school_records::enrollment::EnrollmentCodeGenerator;
use school_records::error::ServiceError;
use school_records::model::{
    Address, CreateStudentRequest, ProfessorCreate, ProfessorId, ProfessorUpdate, Student,
    StudentId,
};
use school_records::services::{ProfessorService, StudentService};
use std::sync::Arc;
use std::time::Duration;

fn emitter(publisher: Arc<MockPublisher>) -> EventEmitter {
    EventEmitter::new(
        publisher,
        EmitSettings {
            timeout: Duration::from_millis(50),
            attempts: 1,
        },
    )
}

fn request(code: Option<&str>) -> CreateStudentRequest {
    CreateStudentRequest {
        name: "Ana".into(),
        enrollment_code: code.map(str::to_owned),
        birth_date: NaiveDate::from_ymd_opt(2012, 9, 1).unwrap(),
        class_group: "6C".into(),
        contact: "555-0101".into(),
        address: Address::default(),
    }
}

fn stored(id: u64, code: &str) -> Student {
    Student {
        id: StudentId(id),
        name: "Ana".into(),
        enrollment_code: code.into(),
        birth_date: NaiveDate::from_ymd_opt(2012, 9, 1).unwrap(),
        class_group: "6C".into(),
        contact: "555-0101".into(),
        address: Address::default(),
    }
}

#[tokio::test]
async fn test_duplicate_slipping_past_guard_is_still_a_conflict() {
    let mut mock = MockStore::<Student>::new();
    let publisher = Arc::new(MockPublisher::new());
    let service = StudentService::new(
        mock.client(),
        emitter(publisher.clone()),
        Arc::new(EnrollmentCodeGenerator::new()),
    );

    // The guard sees the code as free, but a racing writer commits first.
    mock.expect_exists_by_key("2024111111").return_ok(false);
    mock.expect_insert().return_err(FrameworkError::UniqueViolation {
        kind: "student",
        key: "2024111111".into(),
    });

    let result = service.create(request(Some("2024111111"))).await;

    assert_eq!(
        result,
        Err(ServiceError::Conflict {
            kind: "student",
            value: "2024111111".into()
        })
    );
    assert!(publisher.events().is_empty());
    mock.verify();
}

#[tokio::test]
async fn test_generated_code_collision_at_commit_retries() {
    let mut mock = MockStore::<Student>::new();
    let publisher = Arc::new(MockPublisher::new());
    let service = StudentService::new(
        mock.client(),
        emitter(publisher.clone()),
        Arc::new(EnrollmentCodeGenerator::seeded(3).with_fixed_year(2025)),
    );
    let expected = EnrollmentCodeGenerator::seeded(3).with_fixed_year(2025);
    let first = expected.generate();
    let second = expected.generate();

    mock.expect_exists_by_key(first.clone()).return_ok(false);
    mock.expect_insert().return_err(FrameworkError::UniqueViolation {
        kind: "student",
        key: first.clone(),
    });
    mock.expect_exists_by_key(second.clone()).return_ok(false);
    mock.expect_insert().return_ok(stored(1, &second));

    let created = service.create(request(None)).await.unwrap();

    assert_eq!(created.enrollment_code, second);
    assert_eq!(publisher.routing_keys(), vec!["student.created".to_string()]);
    mock.verify();
}

#[tokio::test]
async fn test_store_failure_surfaces_as_storage_error() {
    let mut mock = MockStore::<Student>::new();
    let service = StudentService::new(
        mock.client(),
        emitter(Arc::new(MockPublisher::new())),
        Arc::new(EnrollmentCodeGenerator::new()),
    );

    mock.expect_get(StudentId(4))
        .return_err(FrameworkError::StoreDropped);

    let result = service.get(StudentId(4)).await;
    assert!(matches!(result, Err(ServiceError::Storage(_))));
    mock.verify();
}

#[tokio::test]
async fn test_category_filter_reaches_store() {
    let mut mock = MockStore::<Student>::new();
    let service = StudentService::new(
        mock.client(),
        emitter(Arc::new(MockPublisher::new())),
        Arc::new(EnrollmentCodeGenerator::new()),
    );

    mock.expect_list(Some(ListFilter::Category("6C".into())))
        .return_ok(Page::from_ordered(
            vec![stored(1, "2024123456")],
            &PageRequest::default(),
        ));

    let page = service
        .list(
            &ListQuery {
                name: Some("  ".into()),
                category: Some("6C".into()),
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total_elements, 1);
    mock.verify();
}

#[tokio::test]
async fn test_professor_update_of_missing_record() {
    let mut mock = MockStore::<school_records::model::Professor>::new();
    let publisher = Arc::new(MockPublisher::new());
    let service = ProfessorService::new(mock.client(), emitter(publisher.clone()));

    mock.expect_get(ProfessorId(9)).return_ok(None);

    let result = service
        .update(
            ProfessorId(9),
            ProfessorUpdate {
                name: Some("Nobody".into()),
                ..Default::default()
            },
        )
        .await;
    assert_eq!(
        result,
        Err(ServiceError::NotFound {
            kind: "professor",
            id: "9".into()
        })
    );
    assert!(publisher.events().is_empty());
    mock.verify();
}

#[tokio::test]
async fn test_professor_create_guard_rejects_before_insert() {
    let mut mock = MockStore::<school_records::model::Professor>::new();
    let service = ProfessorService::new(mock.client(), emitter(Arc::new(MockPublisher::new())));

    mock.expect_exists_by_key("carla@school.edu").return_ok(true);

    let result = service
        .create(ProfessorCreate {
            name: "Carla".into(),
            email: " carla@school.edu ".into(),
            specialty: None,
            hire_date: None,
        })
        .await;
    assert!(matches!(result, Err(ServiceError::Conflict { .. })));
    mock.verify();
}

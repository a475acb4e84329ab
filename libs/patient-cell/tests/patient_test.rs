use std::sync::Arc;

use assert_matches::assert_matches;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use patient_cell::services::PatientService;
use patient_cell::{create_patient_router, CreatePatientRequest, Gender, InMemoryPatientRepository, PatientError, PatientFilters, PatientRepository, UpdateContactRequest};
use shared_models::UniqueId;
use shared_utils::test_utils::{TestConfig, TestUser};

fn request(id: &str, first: &str, email: &str) -> CreatePatientRequest {
    CreatePatientRequest {
        id: Some(id.to_string()),
        first_name: first.to_string(),
        last_name: "Silva".to_string(),
        email: email.to_string(),
        phone: "11999990000".to_string(),
        date_of_birth: "1985-07-01".to_string(),
        gender: Gender::Other,
    }
}

fn service() -> (PatientService, Arc<InMemoryPatientRepository>) {
    let repo = Arc::new(InMemoryPatientRepository::new());
    (PatientService::new(repo.clone()), repo)
}

#[tokio::test]
async fn admin_registers_patient() {
    let (service, repo) = service();
    let admin = TestUser::admin().to_user();

    let patient = service
        .register_patient(request("patient-1", "Joao", "joao@example.com"), &admin)
        .await
        .unwrap();

    assert_eq!(patient.id().as_str(), "patient-1");
    assert!(repo.exists(patient.id()).await.unwrap());
}

#[tokio::test]
async fn patient_cannot_register_patients() {
    let (service, _) = service();
    let actor = TestUser::patient("patient-1").to_user();

    let result = service
        .register_patient(request("patient-2", "Lia", "lia@example.com"), &actor)
        .await;

    assert_matches!(result, Err(PatientError::Authorization(_)));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let (service, _) = service();
    let admin = TestUser::admin().to_user();

    service
        .register_patient(request("patient-1", "Joao", "joao@example.com"), &admin)
        .await
        .unwrap();
    let result = service
        .register_patient(request("patient-2", "Outro", "JOAO@example.com"), &admin)
        .await;

    assert_matches!(result, Err(PatientError::Validation(e)) if e.field == "email");
}

#[tokio::test]
async fn patients_only_see_themselves() {
    let (service, _) = service();
    let admin = TestUser::admin().to_user();
    service
        .register_patient(request("patient-1", "Joao", "joao@example.com"), &admin)
        .await
        .unwrap();

    let id = UniqueId::new("patient-1");
    assert!(service.get_patient(&id, &TestUser::patient("patient-1").to_user()).await.is_ok());
    assert!(service.get_patient(&id, &TestUser::provider("provider-1").to_user()).await.is_ok());
    assert_matches!(
        service.get_patient(&id, &TestUser::patient("patient-2").to_user()).await,
        Err(PatientError::Authorization(_))
    );
    assert_matches!(
        service.get_patient(&UniqueId::new("missing"), &admin).await,
        Err(PatientError::NotFound(e)) if e.entity == "Patient"
    );
}

#[tokio::test]
async fn search_filters_and_sorts_by_name() {
    let (service, _) = service();
    let admin = TestUser::admin().to_user();
    for (id, name, email) in [
        ("p1", "Zelia", "zelia@example.com"),
        ("p2", "Ana", "ana@example.com"),
        ("p3", "Bruno", "bruno@other.org"),
    ] {
        service.register_patient(request(id, name, email), &admin).await.unwrap();
    }

    let all = service.search_patients(PatientFilters::default(), &admin).await.unwrap();
    let names: Vec<_> = all.iter().map(|p| p.first_name().to_string()).collect();
    assert_eq!(names, vec!["Ana", "Bruno", "Zelia"]);

    let filtered = service
        .search_patients(PatientFilters { email: Some("example.com".into()), name: None }, &admin)
        .await
        .unwrap();
    assert_eq!(filtered.len(), 2);
}

#[tokio::test]
async fn patient_updates_own_contact_info() {
    let (service, _) = service();
    let admin = TestUser::admin().to_user();
    service
        .register_patient(request("patient-1", "Joao", "joao@example.com"), &admin)
        .await
        .unwrap();

    let update = UpdateContactRequest {
        email: "joao.novo@example.com".to_string(),
        phone: "(21) 98888-1111".to_string(),
    };
    let updated = service
        .update_contact_info(&UniqueId::new("patient-1"), update.clone(), &TestUser::patient("patient-1").to_user())
        .await
        .unwrap();
    assert_eq!(updated.phone().as_str(), "21988881111");

    let denied = service
        .update_contact_info(&UniqueId::new("patient-1"), update, &TestUser::patient("patient-2").to_user())
        .await;
    assert_matches!(denied, Err(PatientError::Authorization(_)));
}

#[tokio::test]
async fn router_requires_token_and_registers() {
    let config = TestConfig::default();
    let repo: Arc<dyn PatientRepository> = Arc::new(InMemoryPatientRepository::new());
    let app = create_patient_router(config.to_arc(), repo);

    let unauthenticated = app
        .clone()
        .oneshot(Request::builder().uri("/patient-1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);

    let body = json!({
        "id": "patient-1",
        "first_name": "Joao",
        "last_name": "Silva",
        "email": "joao@example.com",
        "phone": "11999990000",
        "date_of_birth": "1985-07-01",
        "gender": "male"
    });
    let created = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("Authorization", TestUser::admin().bearer(&config.jwt_secret))
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(created.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["id"], "patient-1");
    assert_eq!(json["email"], "joao@example.com");
}

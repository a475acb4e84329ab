mod common;

use assert_matches::assert_matches;
use futures::future::join_all;

use appointment_cell::{
    AppointmentError, AppointmentFilters, AppointmentRepository, AppointmentStatus, InvalidStatusTransition,
    RescheduleAppointmentRequest,
};
use shared_config::AppConfig;
use shared_models::UniqueId;
use shared_utils::test_utils::TestUser;

use common::{booking, clinic, clinic_with};

#[tokio::test]
async fn overlapping_booking_conflicts_but_touching_one_does_not() {
    let clinic = clinic().await;
    let patient = TestUser::patient("patient-1").to_user();
    let scheduling = &clinic.state.scheduling;

    scheduling
        .schedule_appointment(
            booking("patient-1", "provider-1", "2030-03-15T09:00:00Z", "2030-03-15T09:30:00Z"),
            &patient,
        )
        .await
        .unwrap();

    let overlapping = scheduling
        .schedule_appointment(
            booking("patient-1", "provider-1", "2030-03-15T09:15:00Z", "2030-03-15T09:45:00Z"),
            &patient,
        )
        .await;
    assert_matches!(overlapping, Err(AppointmentError::Conflict));

    scheduling
        .schedule_appointment(
            booking("patient-1", "provider-1", "2030-03-15T09:30:00Z", "2030-03-15T10:00:00Z"),
            &patient,
        )
        .await
        .unwrap();

    // Same window with another provider is fine.
    scheduling
        .schedule_appointment(
            booking("patient-1", "provider-2", "2030-03-15T09:15:00Z", "2030-03-15T09:45:00Z"),
            &patient,
        )
        .await
        .unwrap();

    let all = clinic.appointments.find_all(&AppointmentFilters::default()).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn cancelled_bookings_free_the_slot() {
    let clinic = clinic().await;
    let patient = TestUser::patient("patient-1").to_user();

    let first = clinic
        .state
        .scheduling
        .schedule_appointment(
            booking("patient-1", "provider-1", "2030-03-15T09:00:00Z", "2030-03-15T09:30:00Z"),
            &patient,
        )
        .await
        .unwrap();
    clinic.state.lifecycle.cancel_appointment(first.id(), &patient).await.unwrap();

    let range = clinic
        .appointments
        .find_by_provider_and_date_range(
            &UniqueId::new("provider-1"),
            first.time_slot().start_time(),
            first.time_slot().end_time(),
        )
        .await
        .unwrap();
    assert!(range.is_empty());

    clinic
        .state
        .scheduling
        .schedule_appointment(
            booking("patient-1", "provider-1", "2030-03-15T09:00:00Z", "2030-03-15T09:30:00Z"),
            &patient,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn patients_cannot_book_for_others() {
    let clinic = clinic().await;

    let result = clinic
        .state
        .scheduling
        .schedule_appointment(
            booking("patient-2", "provider-1", "2030-03-15T09:00:00Z", "2030-03-15T09:30:00Z"),
            &TestUser::patient("patient-1").to_user(),
        )
        .await;

    assert_matches!(result, Err(AppointmentError::Authorization(_)));
    assert!(clinic.appointments.find_all(&AppointmentFilters::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn inactive_provider_cannot_be_booked() {
    let clinic = clinic().await;

    let result = clinic
        .state
        .scheduling
        .schedule_appointment(
            booking("patient-1", "provider-3", "2030-03-15T09:00:00Z", "2030-03-15T09:30:00Z"),
            &TestUser::admin().to_user(),
        )
        .await;

    assert_matches!(result, Err(AppointmentError::Validation(e)) if e.field == "provider");
}

#[tokio::test]
async fn cancelling_another_patients_appointment_needs_admin() {
    let clinic = clinic().await;
    let owner = TestUser::patient("patient-1").to_user();

    let appointment = clinic
        .state
        .scheduling
        .schedule_appointment(
            booking("patient-1", "provider-1", "2030-03-15T09:00:00Z", "2030-03-15T09:30:00Z"),
            &owner,
        )
        .await
        .unwrap();

    let denied = clinic
        .state
        .lifecycle
        .cancel_appointment(appointment.id(), &TestUser::patient("patient-2").to_user())
        .await;
    assert_matches!(denied, Err(AppointmentError::Authorization(_)));

    let cancelled = clinic
        .state
        .lifecycle
        .cancel_appointment(appointment.id(), &TestUser::admin().to_user())
        .await
        .unwrap();
    assert_eq!(cancelled.status(), AppointmentStatus::Cancelled);

    let again = clinic.state.lifecycle.cancel_appointment(appointment.id(), &owner).await;
    assert_matches!(
        again,
        Err(AppointmentError::InvalidStatusTransition(InvalidStatusTransition {
            from: AppointmentStatus::Cancelled,
            to: AppointmentStatus::Cancelled
        }))
    );
}

#[tokio::test]
async fn unassigned_provider_cannot_start_and_status_is_unchanged() {
    let clinic = clinic().await;

    let appointment = clinic
        .state
        .scheduling
        .schedule_appointment(
            booking("patient-1", "provider-1", "2030-03-15T09:00:00Z", "2030-03-15T09:30:00Z"),
            &TestUser::admin().to_user(),
        )
        .await
        .unwrap();

    let result = clinic
        .state
        .lifecycle
        .start_appointment(appointment.id(), &TestUser::provider("provider-2").to_user())
        .await;
    assert_matches!(result, Err(AppointmentError::ProviderRequired(_)));

    let stored = clinic.appointments.find_by_id(appointment.id()).await.unwrap().unwrap();
    assert_eq!(stored.status(), AppointmentStatus::Scheduled);
}

#[tokio::test]
async fn full_visit_with_blank_notes() {
    let clinic = clinic().await;
    let provider = TestUser::provider("provider-1").to_user();

    let appointment = clinic
        .state
        .scheduling
        .schedule_appointment(
            booking("patient-1", "provider-1", "2030-03-15T09:00:00Z", "2030-03-15T09:30:00Z"),
            &TestUser::patient("patient-1").to_user(),
        )
        .await
        .unwrap();

    clinic.state.lifecycle.start_appointment(appointment.id(), &provider).await.unwrap();
    let completed = clinic
        .state
        .lifecycle
        .complete_appointment(appointment.id(), Some("  \t ".to_string()), &provider)
        .await
        .unwrap();

    assert_eq!(completed.status(), AppointmentStatus::Completed);
    assert!(completed.notes().is_none());

    let stored = clinic.appointments.find_by_id(appointment.id()).await.unwrap().unwrap();
    assert_eq!(stored, completed);
}

#[tokio::test]
async fn reschedule_checks_conflicts_with_other_bookings() {
    let clinic = clinic().await;
    let patient = TestUser::patient("patient-1").to_user();
    let scheduling = &clinic.state.scheduling;

    let first = scheduling
        .schedule_appointment(
            booking("patient-1", "provider-1", "2030-03-15T09:00:00Z", "2030-03-15T09:30:00Z"),
            &patient,
        )
        .await
        .unwrap();
    scheduling
        .schedule_appointment(
            booking("patient-1", "provider-1", "2030-03-15T10:00:00Z", "2030-03-15T10:30:00Z"),
            &patient,
        )
        .await
        .unwrap();

    let clash = scheduling
        .reschedule_appointment(
            first.id(),
            RescheduleAppointmentRequest {
                start_time: "2030-03-15T10:15:00Z".to_string(),
                end_time: "2030-03-15T10:45:00Z".to_string(),
            },
            &patient,
        )
        .await;
    assert_matches!(clash, Err(AppointmentError::Conflict));

    let moved = scheduling
        .reschedule_appointment(
            first.id(),
            RescheduleAppointmentRequest {
                start_time: "2030-03-15T09:10:00Z".to_string(),
                end_time: "2030-03-15T09:40:00Z".to_string(),
            },
            &patient,
        )
        .await
        .unwrap();
    assert_eq!(moved.time_slot().formatted("pt-BR"), "09:10 - 09:40");
}

#[tokio::test]
async fn listing_is_scoped_by_role_and_sorted() {
    let clinic = clinic().await;
    let admin = TestUser::admin().to_user();
    let scheduling = &clinic.state.scheduling;

    for (patient, provider, start, end) in [
        ("patient-1", "provider-1", "2030-03-15T11:00:00Z", "2030-03-15T11:30:00Z"),
        ("patient-2", "provider-1", "2030-03-15T09:00:00Z", "2030-03-15T09:30:00Z"),
        ("patient-1", "provider-2", "2030-03-15T10:00:00Z", "2030-03-15T10:30:00Z"),
    ] {
        scheduling
            .schedule_appointment(booking(patient, provider, start, end), &admin)
            .await
            .unwrap();
    }

    let queries = &clinic.state.queries;

    let everything = queries.appointments_for_actor(AppointmentFilters::default(), &admin).await.unwrap();
    let starts: Vec<_> = everything.iter().map(|a| a.time_slot().start_time().to_rfc3339()).collect();
    assert_eq!(
        starts,
        vec!["2030-03-15T09:00:00+00:00", "2030-03-15T10:00:00+00:00", "2030-03-15T11:00:00+00:00"]
    );

    let mine = queries
        .appointments_for_actor(AppointmentFilters::default(), &TestUser::patient("patient-1").to_user())
        .await
        .unwrap();
    assert_eq!(mine.len(), 2);

    let booked_with_me = queries
        .appointments_for_actor(AppointmentFilters::default(), &TestUser::provider("provider-1").to_user())
        .await
        .unwrap();
    assert_eq!(booked_with_me.len(), 2);
    assert!(booked_with_me.iter().all(|a| a.provider_id().as_str() == "provider-1"));

    let other = &everything[0];
    assert_matches!(
        queries.get_appointment(other.id(), &TestUser::patient("patient-1").to_user()).await,
        Err(AppointmentError::Authorization(_))
    );
    assert!(queries
        .get_appointment(other.id(), &TestUser::provider("provider-1").to_user())
        .await
        .is_ok());
}

#[tokio::test]
async fn concurrent_overlapping_requests_book_exactly_once() {
    let config = AppConfig {
        simulated_latency_ms: 5,
        ..AppConfig::default()
    };
    let clinic = clinic_with(&config).await;
    let admin = TestUser::admin().to_user();

    let attempts = (0..8).map(|i| {
        let scheduling = clinic.state.scheduling.clone();
        let admin = admin.clone();
        let start = format!("2030-03-15T09:{:02}:00Z", i);
        let end = format!("2030-03-15T09:{:02}:00Z", 30 + i);
        async move {
            scheduling
                .schedule_appointment(booking("patient-1", "provider-1", &start, &end), &admin)
                .await
        }
    });

    let results = join_all(attempts).await;

    let booked = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppointmentError::Conflict)))
        .count();
    assert_eq!(booked, 1);
    assert_eq!(conflicts, 7);

    let stored = clinic
        .appointments
        .find_by_provider(&UniqueId::new("provider-1"))
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

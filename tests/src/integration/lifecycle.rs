//! # Case Lifecycle Flows
//!
//! A case from creation to transplant, across Identity, Donor Registry,
//! Cases and the Funding Ledger:
//!
//! ```text
//! patient ──create──→ waiting ──match──→ matched ──contribute──→ funded ──→ transplanted
//! ```

#[cfg(test)]
mod tests {
    use care_runtime::RuntimeConfig;
    use hc_03_cases::{
        CaseConfig, CaseFilter, CaseStatus, CaseUpdate, FileCategory, FileUpload, MatchRequest,
        ANONYMOUS,
    };
    use shared_types::{AuditOutcome, ErrorKind, Organ, Role};

    use crate::integration::fixtures::{new_case, World};

    #[tokio::test]
    async fn test_case_runs_from_waiting_to_transplanted() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let hospital = world.join(Role::Hospital, "General").await;
        let sponsor = world.join(Role::Sponsor, "Foundation").await;
        let donor = world.consenting_donor("Dana", &["kidney"]).await;

        let case = world.open_case(&patient, "kidney", 1_000).await;
        assert_eq!(case.status, CaseStatus::Waiting);
        assert_eq!(case.patient_name, "Pat");

        // An approved hospital sees unassigned cases and claims one by matching.
        let visible = world.api.list_cases(&hospital, CaseFilter::default()).await.unwrap();
        assert_eq!(visible.len(), 1);

        let matched = world
            .api
            .match_donor(&hospital, case.id, MatchRequest::donor(donor.user_id))
            .await
            .unwrap();
        assert_eq!(matched.value.status, CaseStatus::Matched);
        assert_eq!(matched.value.assigned_hospital_id, Some(hospital.user_id));
        assert_eq!(matched.value.matched_donor_id, Some(donor.user_id));

        let receipt = world
            .api
            .contribute(&sponsor, case.id, 1_000)
            .await
            .unwrap()
            .value;
        assert_eq!(receipt.status, CaseStatus::Funded);
        assert_eq!(receipt.flipped_from, Some(CaseStatus::Matched));

        let done = world
            .api
            .set_case_status(&hospital, case.id, CaseStatus::Transplanted)
            .await
            .unwrap();
        assert_eq!(done.value.status, CaseStatus::Transplanted);

        let err = world
            .api
            .set_case_status(&hospital, case.id, CaseStatus::Waiting)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = world
            .api
            .update_case(
                &patient,
                case.id,
                CaseUpdate {
                    description: Some("late edit".into()),
                    ..CaseUpdate::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_waiting_case_cannot_jump_to_transplanted() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let case = world.open_case(&patient, "liver", 0).await;

        let err = world
            .api
            .set_case_status(&world.admin, case.id, CaseStatus::Transplanted)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_repeated_status_is_a_skipped_noop() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let case = world.open_case(&patient, "heart", 0).await;

        let same = world
            .api
            .set_case_status(&world.admin, case.id, CaseStatus::Waiting)
            .await
            .unwrap();
        assert_eq!(same.audit, AuditOutcome::Skipped);
        assert_eq!(same.value.updated_at, case.updated_at);
    }

    #[tokio::test]
    async fn test_manual_funded_respects_goal_switch() {
        let mut config = RuntimeConfig::default();
        config.cases.require_funding_for_funded = true;
        let world = World::with_config(config).await;
        let patient = world.join(Role::Patient, "Pat").await;
        let sponsor = world.join(Role::Sponsor, "Foundation").await;
        let case = world.open_case(&patient, "kidney", 500).await;

        let err = world
            .api
            .set_case_status(&world.admin, case.id, CaseStatus::Funded)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        // Reaching the goal flips the status without a manual move.
        let receipt = world.api.contribute(&sponsor, case.id, 500).await.unwrap();
        assert_eq!(receipt.value.status, CaseStatus::Funded);
    }

    #[tokio::test]
    async fn test_donor_sees_redacted_patient() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let donor = world.consenting_donor("Dana", &["kidney"]).await;
        let case = world.open_case(&patient, "kidney", 0).await;
        world
            .api
            .match_donor(&world.admin, case.id, MatchRequest::donor(donor.user_id))
            .await
            .unwrap();

        let seen = world.api.get_case(&donor, case.id).await.unwrap();
        assert_eq!(seen.patient_id, None);
        assert_eq!(seen.patient_name, ANONYMOUS);
        assert_eq!(seen.matched_donor_id, Some(donor.user_id));

        let own = world.api.get_case(&patient, case.id).await.unwrap();
        assert_eq!(own.patient_id, Some(patient.user_id));
    }

    #[tokio::test]
    async fn test_attachments_are_stored_and_capped() {
        let mut config = RuntimeConfig::default();
        config.cases = CaseConfig::for_testing();
        let world = World::with_config(config).await;
        let patient = world.join(Role::Patient, "Pat").await;
        let case = world.open_case(&patient, "cornea", 0).await;

        for i in 0..3 {
            let file = world
                .api
                .attach_file(
                    &patient,
                    case.id,
                    FileUpload::new(
                        FileCategory::LabResults,
                        &format!("panel-{}.pdf", i),
                        "application/pdf",
                        vec![7; 64],
                    ),
                )
                .await
                .unwrap()
                .value;
            assert!(file
                .path
                .starts_with(&format!("{}/{}/lab_results/", patient.user_id, case.id)));
            assert!(world.api.container().file_store.contains(&file.path));
        }

        let err = world
            .api
            .attach_file(
                &patient,
                case.id,
                FileUpload::new(FileCategory::Other, "extra.pdf", "application/pdf", vec![1]),
            )
            .await
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains("files"));

        let oversized = world
            .api
            .attach_file(
                &patient,
                case.id,
                FileUpload::new(FileCategory::Imaging, "scan.dcm", "application/dicom", vec![0; 2048]),
            )
            .await
            .unwrap_err();
        assert_eq!(oversized.kind(), ErrorKind::Validation);

        let stored = world.api.get_case(&patient, case.id).await.unwrap();
        assert_eq!(stored.files.len(), 3);
    }

    #[tokio::test]
    async fn test_list_orders_by_urgency_then_age() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;

        world.clock.advance(10);
        let low = world
            .api
            .create_case(&patient, new_case("skin", "low", 0))
            .await
            .unwrap()
            .value;
        world.clock.advance(10);
        let critical = world
            .api
            .create_case(&patient, new_case("heart", "critical", 0))
            .await
            .unwrap()
            .value;

        let listed = world
            .api
            .list_cases(&world.admin, CaseFilter::default())
            .await
            .unwrap();
        let ids: Vec<_> = listed.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![critical.id, low.id]);

        let hearts = world
            .api
            .list_cases(
                &world.admin,
                CaseFilter {
                    organ: Some(Organ::Heart),
                    ..CaseFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(hearts.len(), 1);
        assert_eq!(hearts[0].id, critical.id);
    }
}

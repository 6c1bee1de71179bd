//! # Access Control Flows
//!
//! Role and approval checks as seen through the facade. Every denial must
//! surface as `Forbidden` and leave state untouched.

#[cfg(test)]
mod tests {
    use hc_03_cases::{CaseFilter, CaseStatus, CaseUpdate, MatchRequest};
    use hc_06_audit_log::AuditQuery;
    use shared_types::{ErrorKind, Role};

    use crate::integration::fixtures::{credentials, new_case, World};

    #[tokio::test]
    async fn test_unapproved_accounts_see_nothing() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let case = world.open_case(&patient, "kidney", 100).await;

        let hospital = world.join_pending(Role::Hospital, "General").await;
        let sponsor = world.join_pending(Role::Sponsor, "Foundation").await;
        assert!(!hospital.approved);
        assert!(!sponsor.approved);

        let err = world.api.list_cases(&hospital, CaseFilter::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = world.api.get_case(&hospital, case.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = world.api.available_donors(&hospital).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = world.api.contribute(&sponsor, case.id, 10).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let pending = world.api.list_pending_approvals(&world.admin).await.unwrap();
        assert_eq!(pending.len(), 2);

        world.api.approve_user(&world.admin, sponsor.user_id).await.unwrap();
        let sponsor = world.api.refresh_actor(sponsor.user_id).await.unwrap();
        assert!(sponsor.approved);
        world.api.contribute(&sponsor, case.id, 10).await.unwrap();

        let pending = world.api.list_pending_approvals(&world.admin).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, hospital.user_id);
    }

    #[tokio::test]
    async fn test_only_admins_approve() {
        let world = World::new().await;
        let hospital = world.join_pending(Role::Hospital, "General").await;
        let patient = world.join(Role::Patient, "Pat").await;

        let err = world.api.approve_user(&patient, hospital.user_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let actor = world.api.authenticate(credentials("General")).await.unwrap();
        assert!(!actor.approved);
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let world = World::new().await;
        world.join(Role::Patient, "Pat").await;
        let mut wrong = credentials("Pat");
        wrong.password = "not-the-password".into();
        let err = world.api.authenticate(wrong).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_patients_only_touch_their_own_cases() {
        let world = World::new().await;
        let alice = world.join(Role::Patient, "Alice").await;
        let bob = world.join(Role::Patient, "Bob").await;
        let case = world.open_case(&alice, "kidney", 0).await;
        world.open_case(&bob, "liver", 0).await;

        let err = world.api.get_case(&bob, case.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = world
            .api
            .update_case(
                &bob,
                case.id,
                CaseUpdate {
                    description: Some("hijack".into()),
                    ..CaseUpdate::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let own = world.api.list_cases(&bob, CaseFilter::default()).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].patient_id, Some(bob.user_id));

        // Patients cannot drive the lifecycle of their own case either.
        let err = world
            .api
            .set_case_status(&alice, case.id, CaseStatus::Matched)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_only_patients_create_cases() {
        let world = World::new().await;
        let donor = world.join(Role::Donor, "Dana").await;
        let sponsor = world.join(Role::Sponsor, "Foundation").await;
        for actor in [&donor, &sponsor, &world.admin] {
            let err = world
                .api
                .create_case(actor, new_case("kidney", "high", 0))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Forbidden);
        }
    }

    #[tokio::test]
    async fn test_assigned_case_is_closed_to_other_hospitals() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let general = world.join(Role::Hospital, "General").await;
        let mercy = world.join(Role::Hospital, "Mercy").await;
        let case = world.open_case(&patient, "kidney", 0).await;

        let err = world
            .api
            .assign_hospital(&mercy, case.id, general.user_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        world
            .api
            .assign_hospital(&general, case.id, general.user_id)
            .await
            .unwrap();

        let err = world.api.get_case(&mercy, case.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = world
            .api
            .match_donor(
                &mercy,
                case.id,
                MatchRequest {
                    donor_id: None,
                    hospital_id: Some(mercy.user_id),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let listed = world.api.list_cases(&mercy, CaseFilter::default()).await.unwrap();
        assert!(listed.is_empty());
        let listed = world.api.list_cases(&general, CaseFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_donor_records_stay_with_donor_and_admin() {
        let world = World::new().await;
        let dana = world.consenting_donor("Dana", &["kidney"]).await;
        let dave = world.join(Role::Donor, "Dave").await;
        let hospital = world.join(Role::Hospital, "General").await;

        let err = world.api.donor_record(&dave, dana.user_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = world.api.donor_record(&hospital, dana.user_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = world.api.emergency_contacts(&hospital, dana.user_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        world.api.donor_record(&world.admin, dana.user_id).await.unwrap();

        // Hospitals get summaries without medical detail.
        let summaries = world.api.available_donors(&hospital).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].donor_id, dana.user_id);
    }

    #[tokio::test]
    async fn test_audit_log_is_admin_only() {
        let world = World::new().await;
        let hospital = world.join(Role::Hospital, "General").await;
        let err = world
            .api
            .audit_log(&hospital, AuditQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert!(!world
            .api
            .audit_log(&world.admin, AuditQuery::default())
            .await
            .unwrap()
            .is_empty());
    }
}

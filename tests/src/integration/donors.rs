//! # Donor Registration Flows
//!
//! Registration rules by donor type, consent transitions, and how consent
//! and organ allocation gate matching in the Cases subsystem.

#[cfg(test)]
mod tests {
    use hc_02_donor_registry::{ContactInput, DonorType, OrganStatus};
    use hc_03_cases::{CaseStatus, MatchRequest};
    use shared_types::{Actor, AuditOutcome, ErrorKind, Organ, Role};

    use crate::integration::fixtures::{deceased_registration, living_registration, World};

    async fn kidney_status(world: &World, donor: &Actor) -> OrganStatus {
        let record = world.api.donor_record(&world.admin, donor.user_id).await.unwrap();
        record
            .organs
            .iter()
            .find(|o| o.organ == Organ::Kidney)
            .map(|o| o.status)
            .unwrap()
    }

    #[tokio::test]
    async fn test_living_donor_cannot_offer_heart() {
        let world = World::new().await;
        let donor = world.join(Role::Donor, "Dana").await;

        let err = world
            .api
            .register_donor(&donor, living_registration(&["kidney", "heart"], true))
            .await
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains("organs"));

        let record = world.api.donor_record(&donor, donor.user_id).await.unwrap();
        assert!(record.organs.is_empty());
        assert!(!record.profile.consent_given);
    }

    #[tokio::test]
    async fn test_living_donor_needs_medical_basics() {
        let world = World::new().await;
        let donor = world.join(Role::Donor, "Dana").await;

        let mut form = living_registration(&["kidney"], true);
        form.age = None;
        form.gender = None;
        form.blood_type = None;
        let err = world.api.register_donor(&donor, form).await.unwrap_err();
        let fields = err.field_errors().unwrap();
        assert!(fields.contains("age"));
        assert!(fields.contains("gender"));
        assert!(fields.contains("blood_type"));

        let mut form = living_registration(&["kidney"], true);
        form.age = Some(16);
        let err = world.api.register_donor(&donor, form).await.unwrap_err();
        assert!(err.field_errors().unwrap().contains("age"));
    }

    #[tokio::test]
    async fn test_short_history_registers_with_advisory() {
        let world = World::new().await;
        let donor = world.join(Role::Donor, "Dana").await;

        let mut form = living_registration(&["kidney", "kidney"], true);
        form.medical_history = Some("none".into());
        let registered = world.api.register_donor(&donor, form).await.unwrap().value;
        assert_eq!(registered.record.organs.len(), 1);
        assert!(registered.record.profile.consent_given);
        assert!(registered
            .advisories
            .iter()
            .any(|a| a.field == "medical_history"));
    }

    #[tokio::test]
    async fn test_deceased_donor_needs_primary_contact() {
        let world = World::new().await;
        let donor = world.join(Role::Donor, "Dana").await;

        let err = world
            .api
            .register_donor(&donor, deceased_registration(&["heart"], None))
            .await
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains("emergency_contact"));

        let contact = ContactInput::primary("Sam Doe", "sibling", "+1 555 0100");
        let registered = world
            .api
            .register_donor(&donor, deceased_registration(&["heart", "cornea"], Some(contact)))
            .await
            .unwrap()
            .value;
        assert_eq!(registered.record.profile.donor_type, Some(DonorType::Deceased));
        assert!(registered.record.profile.consent_given);

        let contacts = world
            .api
            .emergency_contacts(&donor, donor.user_id)
            .await
            .unwrap();
        assert_eq!(contacts.len(), 1);
        assert!(contacts[0].is_primary);
        assert_eq!(contacts[0].full_name, "Sam Doe");
    }

    #[tokio::test]
    async fn test_consent_give_and_withdraw() {
        let world = World::new().await;
        let donor = world.join(Role::Donor, "Dana").await;
        let hospital = world.join(Role::Hospital, "General").await;

        world
            .api
            .register_donor(&donor, living_registration(&["kidney"], false))
            .await
            .unwrap();
        assert!(world.api.available_donors(&hospital).await.unwrap().is_empty());

        let given = world.api.give_consent(&donor, None).await.unwrap();
        assert!(given.value.consent_given);
        assert!(given.value.consent_date.is_some());
        assert!(given.audit.is_recorded());

        let again = world.api.give_consent(&donor, None).await.unwrap();
        assert_eq!(again.audit, AuditOutcome::Skipped);

        let listed = world.api.available_donors(&hospital).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].organs.iter().any(|(organ, _)| *organ == Organ::Kidney));

        let withdrawn = world.api.withdraw_consent(&donor).await.unwrap();
        assert!(!withdrawn.value.consent_given);
        assert!(withdrawn.value.consent_date.is_none());
        assert!(world.api.available_donors(&hospital).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_consent_without_registration_is_rejected() {
        let world = World::new().await;
        let donor = world.join(Role::Donor, "Dana").await;
        let err = world.api.give_consent(&donor, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = world
            .api
            .give_consent(&donor, Some(DonorType::Living))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_matching_requires_consent_for_the_needed_organ() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let hospital = world.join(Role::Hospital, "General").await;
        let donor = world.consenting_donor("Dana", &["kidney"]).await;

        let heart_case = world.open_case(&patient, "heart", 0).await;
        let err = world
            .api
            .match_donor(&hospital, heart_case.id, MatchRequest::donor(donor.user_id))
            .await
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains("donor_id"));

        let kidney_case = world.open_case(&patient, "kidney", 0).await;
        world.api.withdraw_consent(&donor).await.unwrap();
        let err = world
            .api
            .match_donor(&hospital, kidney_case.id, MatchRequest::donor(donor.user_id))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let untouched = world.api.get_case(&hospital, kidney_case.id).await.unwrap();
        assert_eq!(untouched.status, CaseStatus::Waiting);
        assert_eq!(untouched.matched_donor_id, None);
    }

    #[tokio::test]
    async fn test_reregistration_replaces_organs() {
        let world = World::new().await;
        let donor = world.consenting_donor("Dana", &["kidney", "blood"]).await;

        let registered = world
            .api
            .register_donor(&donor, living_registration(&["bone_marrow"], false))
            .await
            .unwrap()
            .value;
        let organs: Vec<_> = registered.record.organs.iter().map(|o| o.organ).collect();
        assert_eq!(organs, vec![Organ::BoneMarrow]);
        // Registering again never withdraws consent.
        assert!(registered.record.profile.consent_given);
    }

    #[tokio::test]
    async fn test_withdrawing_twice_is_harmless() {
        let world = World::new().await;
        let donor = world.consenting_donor("Dana", &["kidney"]).await;

        let first = world.api.withdraw_consent(&donor).await.unwrap();
        assert!(first.audit.is_recorded());
        let second = world.api.withdraw_consent(&donor).await.unwrap();
        assert_eq!(second.audit, AuditOutcome::Skipped);
        assert!(!second.value.consent_given);

        // Medical data survives withdrawal.
        let record = world.api.donor_record(&donor, donor.user_id).await.unwrap();
        assert!(record.medical.is_some());
        assert_eq!(record.organs.len(), 1);
    }

    #[tokio::test]
    async fn test_organ_is_held_by_one_case_at_a_time() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let hospital = world.join(Role::Hospital, "General").await;
        let dana = world.consenting_donor("Dana", &["kidney"]).await;
        let first = world.open_case(&patient, "kidney", 0).await;
        let second = world.open_case(&patient, "kidney", 0).await;

        world
            .api
            .match_donor(&hospital, first.id, MatchRequest::donor(dana.user_id))
            .await
            .unwrap();
        assert_eq!(kidney_status(&world, &dana).await, OrganStatus::Matched);

        let err = world
            .api
            .match_donor(&hospital, second.id, MatchRequest::donor(dana.user_id))
            .await
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains("donor_id"));
        let untouched = world.api.get_case(&hospital, second.id).await.unwrap();
        assert_eq!(untouched.status, CaseStatus::Waiting);
        assert_eq!(untouched.matched_donor_id, None);

        let listed = world.api.available_donors(&hospital).await.unwrap();
        assert_eq!(listed[0].organs, vec![(Organ::Kidney, OrganStatus::Matched)]);

        // Matching the same donor to the same case again is allowed.
        world
            .api
            .match_donor(&hospital, first.id, MatchRequest::donor(dana.user_id))
            .await
            .unwrap();

        world
            .api
            .set_case_status(&hospital, first.id, CaseStatus::Transplanted)
            .await
            .unwrap();
        assert_eq!(kidney_status(&world, &dana).await, OrganStatus::Donated);

        let err = world
            .api
            .match_donor(&hospital, second.id, MatchRequest::donor(dana.user_id))
            .await
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains("donor_id"));
    }

    #[tokio::test]
    async fn test_replaced_donor_gets_organ_back() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let dana = world.consenting_donor("Dana", &["kidney"]).await;
        let dave = world.consenting_donor("Dave", &["kidney"]).await;
        let case = world.open_case(&patient, "kidney", 0).await;

        world
            .api
            .match_donor(&world.admin, case.id, MatchRequest::donor(dana.user_id))
            .await
            .unwrap();
        let swapped = world
            .api
            .match_donor(&world.admin, case.id, MatchRequest::donor(dave.user_id))
            .await
            .unwrap();
        assert_eq!(swapped.value.matched_donor_id, Some(dave.user_id));
        assert_eq!(kidney_status(&world, &dana).await, OrganStatus::Available);
        assert_eq!(kidney_status(&world, &dave).await, OrganStatus::Matched);
    }

    #[tokio::test]
    async fn test_failed_match_releases_the_organ() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let dana = world.consenting_donor("Dana", &["kidney"]).await;
        let dave = world.consenting_donor("Dave", &["kidney"]).await;
        let case = world.open_case(&patient, "kidney", 0).await;

        world
            .api
            .match_donor(&world.admin, case.id, MatchRequest::donor(dana.user_id))
            .await
            .unwrap();
        world
            .api
            .set_case_status(&world.admin, case.id, CaseStatus::Transplanted)
            .await
            .unwrap();

        let err = world
            .api
            .match_donor(&world.admin, case.id, MatchRequest::donor(dave.user_id))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(kidney_status(&world, &dave).await, OrganStatus::Available);
        assert_eq!(kidney_status(&world, &dana).await, OrganStatus::Donated);
    }

    #[tokio::test]
    async fn test_switching_to_deceased_clears_living_flags() {
        let world = World::new().await;
        let donor = world.join(Role::Donor, "Dana").await;
        let mut form = living_registration(&["kidney", "blood"], true);
        form.contacts = vec![ContactInput::primary("Sam Doe", "sibling", "+1 555 0100")];
        world.api.register_donor(&donor, form).await.unwrap();

        world
            .api
            .give_consent(&donor, Some(DonorType::Deceased))
            .await
            .unwrap();
        let record = world.api.donor_record(&donor, donor.user_id).await.unwrap();
        assert_eq!(record.profile.donor_type, Some(DonorType::Deceased));
        assert!(record.organs.iter().all(|o| !o.is_living_donation));
    }
}

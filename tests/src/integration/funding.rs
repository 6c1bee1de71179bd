//! # Funding Flows
//!
//! Contributions race each other on one case; the aggregate, the ledger
//! rows and the funded flip must all agree afterwards.

#[cfg(test)]
mod tests {
    use hc_03_cases::CaseStatus;
    use hc_06_audit_log::AuditQuery;
    use shared_types::{AuditAction, ErrorKind, Role};

    use crate::integration::fixtures::World;

    const SPONSORS: usize = 5;
    const PER_SPONSOR: usize = 20;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_contributions_flip_once() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let goal = 500;
        let case = world.open_case(&patient, "kidney", goal).await;

        let mut sponsors = Vec::new();
        for i in 0..SPONSORS {
            sponsors.push(world.join(Role::Sponsor, &format!("Sponsor {}", i)).await);
        }

        let mut tasks = tokio::task::JoinSet::new();
        for sponsor in &sponsors {
            for _ in 0..PER_SPONSOR {
                let api = world.api.clone();
                let sponsor = *sponsor;
                let case_id = case.id;
                tasks.spawn(async move { api.contribute(&sponsor, case_id, 10).await });
            }
        }

        let mut flips = 0;
        while let Some(joined) = tasks.join_next().await {
            let receipt = joined.unwrap().unwrap().value;
            if receipt.flipped_from.is_some() {
                flips += 1;
            }
        }
        assert_eq!(flips, 1);

        let total = (SPONSORS * PER_SPONSOR * 10) as i64;
        let stored = world.api.get_case(&patient, case.id).await.unwrap();
        assert_eq!(stored.funding_amount, total);
        assert_eq!(stored.status, CaseStatus::Funded);

        let rows = world.api.case_funding(&patient, case.id).await.unwrap();
        assert_eq!(rows.len(), SPONSORS * PER_SPONSOR);
        assert_eq!(rows.iter().map(|r| r.amount).sum::<i64>(), total);

        for sponsor in &sponsors {
            let ledger = world.api.sponsor_funding(sponsor, sponsor.user_id).await.unwrap();
            assert_eq!(ledger.totals.total_funded, (PER_SPONSOR * 10) as i64);
            assert_eq!(ledger.totals.funded_count as usize, PER_SPONSOR);
        }

        let audited = world
            .api
            .audit_log(
                &world.admin,
                AuditQuery {
                    action: Some(AuditAction::FundingContributed),
                    case_id: Some(case.id),
                    limit: Some(1_000),
                    ..AuditQuery::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(audited.len(), SPONSORS * PER_SPONSOR);
        assert_eq!(
            audited
                .iter()
                .filter(|e| e.metadata.contains_key("status_from"))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_zero_goal_never_flips() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let sponsor = world.join(Role::Sponsor, "Foundation").await;
        let case = world.open_case(&patient, "liver", 0).await;

        let receipt = world.api.contribute(&sponsor, case.id, 250).await.unwrap().value;
        assert_eq!(receipt.status, CaseStatus::Waiting);
        assert_eq!(receipt.flipped_from, None);
        assert_eq!(receipt.funding_amount, 250);
    }

    #[tokio::test]
    async fn test_contributions_continue_after_funded() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let sponsor = world.join(Role::Sponsor, "Foundation").await;
        let case = world.open_case(&patient, "kidney", 100).await;

        world.api.contribute(&sponsor, case.id, 100).await.unwrap();
        let extra = world.api.contribute(&sponsor, case.id, 40).await.unwrap().value;
        assert_eq!(extra.status, CaseStatus::Funded);
        assert_eq!(extra.flipped_from, None);
        assert_eq!(extra.funding_amount, 140);
    }

    #[tokio::test]
    async fn test_rejected_contributions_leave_no_trace() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let sponsor = world.join(Role::Sponsor, "Foundation").await;
        let case = world.open_case(&patient, "kidney", 100).await;

        for amount in [0, -5] {
            let err = world.api.contribute(&sponsor, case.id, amount).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        let err = world
            .api
            .contribute(&patient, case.id, 10)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let stored = world.api.get_case(&patient, case.id).await.unwrap();
        assert_eq!(stored.funding_amount, 0);
        assert!(world.api.case_funding(&patient, case.id).await.unwrap().is_empty());
        let ledger = world.api.sponsor_funding(&sponsor, sponsor.user_id).await.unwrap();
        assert_eq!(ledger.totals.funded_count, 0);
    }

    #[tokio::test]
    async fn test_overflowing_contribution_is_rejected_whole() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let sponsor = world.join(Role::Sponsor, "Foundation").await;
        let case = world.open_case(&patient, "kidney", 0).await;

        world.api.contribute(&sponsor, case.id, 10).await.unwrap();
        let err = world
            .api
            .contribute(&sponsor, case.id, i64::MAX)
            .await
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains("amount"));

        let stored = world.api.get_case(&patient, case.id).await.unwrap();
        assert_eq!(stored.funding_amount, 10);
        let rows = world.api.case_funding(&patient, case.id).await.unwrap();
        assert_eq!(rows.iter().map(|c| c.amount).sum::<i64>(), stored.funding_amount);
        let ledger = world.api.sponsor_funding(&sponsor, sponsor.user_id).await.unwrap();
        assert_eq!(ledger.totals.total_funded, 10);
        assert_eq!(ledger.totals.funded_count, 1);
    }

    #[tokio::test]
    async fn test_funding_visibility() {
        let world = World::new().await;
        let patient = world.join(Role::Patient, "Pat").await;
        let sponsor = world.join(Role::Sponsor, "Foundation").await;
        let other = world.join(Role::Sponsor, "Trust").await;
        let donor = world.join(Role::Donor, "Dana").await;
        let case = world.open_case(&patient, "kidney", 100).await;
        world.api.contribute(&sponsor, case.id, 30).await.unwrap();

        let err = world.api.case_funding(&donor, case.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = world
            .api
            .sponsor_funding(&other, sponsor.user_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        // Sponsors may browse any case's ledger.
        assert_eq!(world.api.case_funding(&other, case.id).await.unwrap().len(), 1);
        let ledger = world
            .api
            .sponsor_funding(&world.admin, sponsor.user_id)
            .await
            .unwrap();
        assert_eq!(ledger.totals.total_funded, 30);
    }
}

//! Policy predicates, one per (entity, operation).
//!
//! Hospitals and sponsors are checked for approval before anything else;
//! an unapproved account sees nothing.

use shared_types::{Actor, Role, UserId};

use super::decision::{Decision, DenyReason, Redaction};
use super::scope::CaseScope;

fn approved_or_deny(actor: &Actor) -> Option<Decision> {
    if matches!(actor.role, Role::Hospital | Role::Sponsor) && !actor.approved {
        Some(Decision::Deny(DenyReason::NotApproved))
    } else {
        None
    }
}

fn owner_only(actor: &Actor, owner: UserId) -> Decision {
    if actor.user_id == owner {
        Decision::ALLOW
    } else {
        Decision::Deny(DenyReason::NotOwner)
    }
}

/// Case rows and their children (files, funding aggregate).
pub mod case {
    use super::*;

    /// Whether the actor may list cases at all. Rows are then filtered
    /// through [`read`].
    pub fn list(actor: &Actor) -> Decision {
        if let Some(denied) = approved_or_deny(actor) {
            return denied;
        }
        Decision::ALLOW
    }

    pub fn read(actor: &Actor, scope: &CaseScope) -> Decision {
        if let Some(denied) = approved_or_deny(actor) {
            return denied;
        }
        match actor.role {
            Role::Patient => owner_only(actor, scope.patient_id),
            Role::Donor => {
                let own_match = scope.matched_donor_id == Some(actor.user_id);
                Decision::allow_redacted(Redaction {
                    patient_identity: true,
                    donor_identity: !own_match,
                })
            }
            Role::Hospital => {
                if scope.open_to_hospital(actor.user_id) {
                    Decision::ALLOW
                } else {
                    Decision::Deny(DenyReason::AssignedElsewhere)
                }
            }
            // Sponsors see the patient's identity; only the donor is hidden.
            Role::Sponsor => Decision::allow_redacted(Redaction {
                patient_identity: false,
                donor_identity: true,
            }),
            Role::Admin => Decision::ALLOW,
        }
    }

    pub fn create(actor: &Actor) -> Decision {
        match actor.role {
            Role::Patient => Decision::ALLOW,
            _ => Decision::Deny(DenyReason::RoleNotPermitted),
        }
    }

    /// Medical details, funding goal and file attachments.
    pub fn update_details(actor: &Actor, scope: &CaseScope) -> Decision {
        match actor.role {
            Role::Patient => owner_only(actor, scope.patient_id),
            _ => Decision::Deny(DenyReason::RoleNotPermitted),
        }
    }

    /// Status transitions, donor matching and hospital assignment.
    pub fn manage(actor: &Actor, scope: &CaseScope) -> Decision {
        if let Some(denied) = approved_or_deny(actor) {
            return denied;
        }
        match actor.role {
            Role::Hospital => {
                if scope.open_to_hospital(actor.user_id) {
                    Decision::ALLOW
                } else {
                    Decision::Deny(DenyReason::AssignedElsewhere)
                }
            }
            Role::Admin => Decision::ALLOW,
            _ => Decision::Deny(DenyReason::RoleNotPermitted),
        }
    }
}

/// Donor profile, organs, emergency contacts and medical info.
pub mod donor {
    use super::*;

    pub fn read_record(actor: &Actor, donor_id: UserId) -> Decision {
        match actor.role {
            Role::Donor => owner_only(actor, donor_id),
            Role::Admin => Decision::ALLOW,
            _ => Decision::Deny(DenyReason::RoleNotPermitted),
        }
    }

    /// Only the donor edits their own registration and consent.
    pub fn write_record(actor: &Actor, donor_id: UserId) -> Decision {
        match actor.role {
            Role::Donor => owner_only(actor, donor_id),
            _ => Decision::Deny(DenyReason::RoleNotPermitted),
        }
    }

    /// Raw medical info. Hospitals never qualify.
    pub fn read_medical(actor: &Actor, donor_id: UserId) -> Decision {
        read_record(actor, donor_id)
    }

    /// Consenting-donor summaries used for matching.
    pub fn list_summaries(actor: &Actor) -> Decision {
        if let Some(denied) = approved_or_deny(actor) {
            return denied;
        }
        match actor.role {
            Role::Hospital | Role::Admin => Decision::ALLOW,
            _ => Decision::Deny(DenyReason::RoleNotPermitted),
        }
    }

    /// Moving an offered organ through matched and donated.
    pub fn allocate_organ(actor: &Actor) -> Decision {
        list_summaries(actor)
    }
}

/// Funding ledger rows.
pub mod funding {
    use super::*;

    pub fn contribute(actor: &Actor) -> Decision {
        if let Some(denied) = approved_or_deny(actor) {
            return denied;
        }
        match actor.role {
            Role::Sponsor => Decision::ALLOW,
            _ => Decision::Deny(DenyReason::RoleNotPermitted),
        }
    }

    /// Contributions toward one case follow the case read rule, without
    /// redaction of sponsor ids for anyone but donors.
    pub fn read_case_ledger(actor: &Actor, scope: &CaseScope) -> Decision {
        match actor.role {
            Role::Donor => Decision::Deny(DenyReason::RoleNotPermitted),
            _ => super::case::read(actor, scope),
        }
    }

    pub fn read_sponsor_history(actor: &Actor, sponsor_id: UserId) -> Decision {
        if let Some(denied) = approved_or_deny(actor) {
            return denied;
        }
        match actor.role {
            Role::Sponsor => owner_only(actor, sponsor_id),
            Role::Admin => Decision::ALLOW,
            _ => Decision::Deny(DenyReason::RoleNotPermitted),
        }
    }
}

/// Users and profiles.
pub mod identity {
    use super::*;

    pub fn approve(actor: &Actor) -> Decision {
        match actor.role {
            Role::Admin => Decision::ALLOW,
            _ => Decision::Deny(DenyReason::RoleNotPermitted),
        }
    }

    pub fn read_profile(actor: &Actor, user_id: UserId) -> Decision {
        match actor.role {
            Role::Admin => Decision::ALLOW,
            _ => owner_only(actor, user_id),
        }
    }

    pub fn update_profile(actor: &Actor, user_id: UserId) -> Decision {
        owner_only(actor, user_id)
    }

    pub fn list_users(actor: &Actor) -> Decision {
        approve(actor)
    }
}

/// Audit log.
pub mod audit {
    use super::*;

    pub fn query(actor: &Actor) -> Decision {
        match actor.role {
            Role::Admin => Decision::ALLOW,
            _ => Decision::Deny(DenyReason::RoleNotPermitted),
        }
    }
}

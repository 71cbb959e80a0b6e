#![allow(dead_code)]

extern crate std;

use soroban_sdk::Address;

use crate::{FundraiserClient, Project};

/// INV-1: before settlement, the raised amount equals the sum of stakes.
///
/// `contributors` must list every address that ever contributed.
pub fn assert_raised_matches_stakes(client: &FundraiserClient, id: u64, contributors: &[Address]) {
    let total: i128 = contributors
        .iter()
        .map(|c| client.get_contribution_of(&id, c))
        .sum();
    let raised = client.get_amount_raised_of(&id);
    assert_eq!(
        raised, total,
        "INV-1 violated: project {} raised {} but stakes sum to {}",
        id, raised, total
    );
}

/// INV-2: project goal must always be positive.
pub fn assert_goal_positive(project: &Project) {
    assert!(
        project.goal > 0,
        "INV-2 violated: project {} has non-positive goal ({})",
        project.id,
        project.goal
    );
}

/// INV-3: raised amount is never negative.
pub fn assert_raised_non_negative(project: &Project) {
    assert!(
        project.amount_raised >= 0,
        "INV-3 violated: project {} has negative amount raised ({})",
        project.id,
        project.amount_raised
    );
}

/// INV-4: a claimed project holds nothing.
pub fn assert_claimed_is_empty(project: &Project) {
    if project.funds_claimed {
        assert_eq!(
            project.amount_raised, 0,
            "INV-4 violated: project {} claimed but still holds {}",
            project.id, project.amount_raised
        );
    }
}

/// INV-5: a project at or above its goal has been notified.
pub fn assert_target_flag_consistent(project: &Project) {
    if project.amount_raised >= project.goal {
        assert!(
            project.target_reached_notified,
            "INV-5 violated: project {} reached its goal without notification",
            project.id
        );
    }
}

/// INV-6: project IDs are sequential starting from 0.
pub fn assert_sequential_ids(projects: &[Project]) {
    for (i, project) in projects.iter().enumerate() {
        assert_eq!(
            project.id, i as u64,
            "INV-6 violated: expected id {}, got {}",
            i, project.id
        );
    }
}

/// INV-7: fields fixed at creation never change.
pub fn assert_project_immutable_fields(original: &Project, current: &Project) {
    assert_eq!(original.id, current.id, "INV-7 violated: project id changed");
    assert_eq!(
        original.owner, current.owner,
        "INV-7 violated: project owner changed"
    );
    assert_eq!(
        original.name, current.name,
        "INV-7 violated: project name changed"
    );
    assert_eq!(
        original.goal, current.goal,
        "INV-7 violated: project goal changed"
    );
    assert_eq!(
        original.deadline, current.deadline,
        "INV-7 violated: project deadline changed"
    );
}

/// INV-8: the registry holds at least what every project still owes.
pub fn assert_registry_solvent(client: &FundraiserClient) {
    let owed: i128 = (0..client.get_project_count())
        .map(|id| client.get_amount_raised_of(&id))
        .sum();
    let held = client.get_registry_balance();
    assert!(
        held >= owed,
        "INV-8 violated: registry holds {} but projects are owed {}",
        held,
        owed
    );
}

/// Run all stateless project invariants.
pub fn assert_all_project_invariants(project: &Project) {
    assert_goal_positive(project);
    assert_raised_non_negative(project);
    assert_claimed_is_empty(project);
    assert_target_flag_consistent(project);
}

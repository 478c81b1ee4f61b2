use crate::invariants;
use crate::{
    Address, ErrorKind, LedgerConfig, LedgerError, MemoryTreasury, ProjectStatus, QuadraticLedger,
};

fn addr(raw: &str) -> Address {
    Address::new(raw)
}

fn setup() -> (QuadraticLedger, MemoryTreasury, Address) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let treasury = MemoryTreasury::new();
    let admin = addr("GADMIN");
    let ledger = QuadraticLedger::new(admin.clone(), Box::new(treasury.clone()));
    (ledger, treasury, admin)
}

#[test]
fn test_create_assigns_sequential_ids_from_one() {
    let (ledger, _, _) = setup();
    let creator = addr("GCREATOR");

    let first = ledger
        .create_project(&creator, "Clean Water", "wells in the valley")
        .unwrap();
    let second = ledger
        .create_project(&creator, "Open Atlas", "community mapping")
        .unwrap();

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(ledger.project_count(), 2);
    assert_eq!(first.creator, creator);
    assert_eq!(first.total_funding, 0);
    assert_eq!(first.contributor_count, 0);
    assert!(first.is_active());
    invariants::assert_all_ledger_invariants(&ledger);
}

#[test]
fn test_create_rejects_empty_fields() {
    let (ledger, _, _) = setup();
    let creator = addr("GCREATOR");

    let err = ledger.create_project(&creator, "", "desc").unwrap_err();
    assert_eq!(err, LedgerError::EmptyProjectField { field: "name" });
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = ledger.create_project(&creator, "name", "").unwrap_err();
    assert_eq!(err, LedgerError::EmptyProjectField { field: "description" });

    // Nothing was allocated for the rejected calls.
    assert_eq!(ledger.project_count(), 0);
}

#[test]
fn test_unknown_project_id_is_not_found() {
    let (ledger, _, _) = setup();
    let creator = addr("GCREATOR");
    ledger.create_project(&creator, "A", "desc").unwrap();

    for id in [0u64, 2, 99] {
        let err = ledger.get_project(id).unwrap_err();
        assert_eq!(err, LedgerError::ProjectNotFound { id });
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            ledger.contribute(id, &addr("GDONOR"), 5).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ledger.calculate_quadratic_match(id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}

#[test]
fn test_contributor_count_counts_distinct_addresses() {
    let (ledger, _, _) = setup();
    let creator = addr("GCREATOR");
    let donor_a = addr("GDONORA");
    let donor_b = addr("GDONORB");
    ledger.create_project(&creator, "A", "desc").unwrap();

    // First contribution from a new address.
    ledger.contribute(1, &donor_a, 500).unwrap();
    let project = ledger.get_project(1).unwrap();
    assert_eq!(project.contributor_count, 1);
    assert_eq!(project.total_funding, 500);

    // Repeat donor: totals grow, count stays.
    ledger.contribute(1, &donor_a, 300).unwrap();
    let project = ledger.get_project(1).unwrap();
    assert_eq!(project.contributor_count, 1);
    assert_eq!(project.total_funding, 800);
    assert_eq!(ledger.get_user_contribution(1, &donor_a).unwrap(), 800);

    // Second distinct donor.
    ledger.contribute(1, &donor_b, 200).unwrap();
    let project = ledger.get_project(1).unwrap();
    assert_eq!(project.contributor_count, 2);
    assert_eq!(project.total_funding, 1000);

    invariants::assert_all_ledger_invariants(&ledger);
}

#[test]
fn test_contributors_keep_first_contribution_order() {
    let (ledger, _, _) = setup();
    let creator = addr("GCREATOR");
    ledger.create_project(&creator, "A", "desc").unwrap();

    ledger.contribute(1, &addr("GDONORB"), 4).unwrap();
    ledger.contribute(1, &addr("GDONORA"), 1).unwrap();
    ledger.contribute(1, &addr("GDONORB"), 5).unwrap();

    let records = ledger.get_project_contributors(1).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].contributor, addr("GDONORB"));
    assert_eq!(records[0].amount, 9);
    assert_eq!(records[1].contributor, addr("GDONORA"));
    assert_eq!(records[1].amount, 1);
}

#[test]
fn test_contribute_rejects_non_positive_amounts() {
    let (ledger, _, _) = setup();
    let creator = addr("GCREATOR");
    ledger.create_project(&creator, "A", "desc").unwrap();

    for amount in [0i128, -5] {
        let err = ledger.contribute(1, &addr("GDONOR"), amount).unwrap_err();
        assert_eq!(err, LedgerError::NonPositiveAmount { amount });
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
    assert_eq!(ledger.get_project(1).unwrap().total_funding, 0);
}

#[test]
fn test_user_contribution_defaults_to_zero() {
    let (ledger, _, _) = setup();
    let creator = addr("GCREATOR");
    ledger.create_project(&creator, "A", "desc").unwrap();

    assert_eq!(ledger.get_user_contribution(1, &addr("GSTRANGER")).unwrap(), 0);
    assert_eq!(
        ledger
            .get_user_contribution(7, &addr("GSTRANGER"))
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn test_invariants_hold_across_contribution_sequences() {
    let (ledger, _, _) = setup();
    let creator = addr("GCREATOR");
    ledger.create_project(&creator, "A", "desc").unwrap();
    ledger.create_project(&creator, "B", "desc").unwrap();

    let donors = [addr("GD1"), addr("GD2"), addr("GD3"), addr("GD4")];
    let script: [(u64, usize, i128); 9] = [
        (1, 0, 7),
        (1, 1, 3),
        (2, 0, 11),
        (1, 0, 2),
        (2, 2, 5),
        (2, 2, 1),
        (1, 3, 100),
        (2, 1, 42),
        (1, 2, 9),
    ];
    for (project_id, donor, amount) in script {
        ledger.contribute(project_id, &donors[donor], amount).unwrap();
        invariants::assert_all_ledger_invariants(&ledger);
    }

    assert_eq!(ledger.get_project(1).unwrap().total_funding, 121);
    assert_eq!(ledger.get_project(1).unwrap().contributor_count, 4);
    assert_eq!(ledger.get_project(2).unwrap().total_funding, 59);
    assert_eq!(ledger.get_project(2).unwrap().contributor_count, 3);
}

#[test]
fn test_admin_and_pool_accessors() {
    let (ledger, _, admin) = setup();
    assert_eq!(ledger.admin(), &admin);
    assert_eq!(ledger.matching_pool(), 0);
    assert_eq!(ledger.project_count(), 0);

    ledger.add_matching_pool(&admin, 75).unwrap();
    assert_eq!(ledger.matching_pool(), 75);
}

#[test]
fn test_from_config_seeds_the_pool() {
    let treasury = MemoryTreasury::new();
    let config = LedgerConfig {
        admin: addr("GADMIN"),
        initial_pool: 400,
    };
    let ledger = QuadraticLedger::from_config(config, Box::new(treasury));
    assert_eq!(ledger.matching_pool(), 400);
    assert_eq!(ledger.admin(), &addr("GADMIN"));
}

#[test]
fn test_settled_projects_reject_contributions() {
    let (ledger, _, admin) = setup();
    let creator = addr("GCREATOR");
    ledger.create_project(&creator, "A", "desc").unwrap();
    ledger.contribute(1, &addr("GDONOR"), 9).unwrap();
    ledger.add_matching_pool(&admin, 10).unwrap();
    ledger.distribute_matching_funds(&admin, 1).unwrap();

    let before = ledger.get_project(1).unwrap();
    assert_eq!(before.status, ProjectStatus::Settled);

    let err = ledger.contribute(1, &addr("GDONOR"), 1).unwrap_err();
    assert_eq!(err, LedgerError::ProjectSettled { id: 1 });
    assert_eq!(err.kind(), ErrorKind::State);

    let after = ledger.get_project(1).unwrap();
    invariants::assert_valid_status_transition(&before.status, &after.status);
    assert_eq!(after.total_funding, before.total_funding);
}

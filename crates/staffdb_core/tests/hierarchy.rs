use chrono::NaiveDate;
use rusqlite::Connection;
use staffdb_core::db::open_db_in_memory;
use staffdb_core::{
    EmployeeId, EmployeeService, NewEmployee, ServiceError, SqliteEmployeeRepository,
};
use std::collections::BTreeSet;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn hire(
    service: &EmployeeService<SqliteEmployeeRepository<'_>>,
    name: &str,
    position: &str,
    manager_id: Option<EmployeeId>,
) -> EmployeeId {
    service
        .create(&NewEmployee {
            full_name: name.to_string(),
            position: position.to_string(),
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            salary: 100000,
            manager_id,
        })
        .unwrap()
}

/// CEO(1) <- Manager(2) <- Dev(3)
fn seed_chain(service: &EmployeeService<SqliteEmployeeRepository<'_>>) -> [EmployeeId; 3] {
    let ceo = hire(service, "CEO", "Chief Executive", None);
    let manager = hire(service, "Manager", "Engineering Manager", Some(ceo));
    let dev = hire(service, "Dev", "Developer", Some(manager));
    [ceo, manager, dev]
}

#[test]
fn subordinate_ids_are_transitive() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [ceo, manager, dev] = seed_chain(&service);

    let resolver = service.hierarchy();
    assert_eq!(
        resolver.subordinate_ids(ceo).unwrap(),
        BTreeSet::from([manager, dev])
    );
    assert_eq!(resolver.subordinate_ids(manager).unwrap(), BTreeSet::from([dev]));
    assert!(resolver.subordinate_ids(dev).unwrap().is_empty());
}

#[test]
fn subordinate_ids_of_unknown_manager_is_not_found() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    seed_chain(&service);

    let err = service.hierarchy().subordinate_ids(999).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(999)));
}

#[test]
fn roots_never_appear_among_subordinates() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [ceo, manager, _] = seed_chain(&service);
    let other_root = hire(&service, "Founder", "Advisor", None);
    hire(&service, "Assistant", "Assistant", Some(other_root));

    let resolver = service.hierarchy();
    for id in [ceo, manager, other_root] {
        let subordinates = resolver.subordinate_ids(id).unwrap();
        assert!(!subordinates.contains(&ceo));
        assert!(!subordinates.contains(&other_root));
    }
}

#[test]
fn hierarchy_tree_reports_levels_from_root() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [ceo, manager, dev] = seed_chain(&service);

    let tree = service.hierarchy().hierarchy_tree(ceo).unwrap();
    let shape: Vec<(EmployeeId, u32)> = tree.iter().map(|entry| (entry.id, entry.level)).collect();
    assert_eq!(shape, vec![(ceo, 1), (manager, 2), (dev, 3)]);
    assert_eq!(tree[2].full_name, "Dev");
    assert_eq!(tree[2].manager_id, Some(manager));
}

#[test]
fn hierarchy_tree_orders_by_level_then_id() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let root = hire(&service, "Root", "Director", None);
    let a = hire(&service, "A", "Lead", Some(root));
    let b = hire(&service, "B", "Lead", Some(root));
    let b1 = hire(&service, "B1", "Engineer", Some(b));
    let a1 = hire(&service, "A1", "Engineer", Some(a));

    let tree = service.hierarchy().hierarchy_tree(root).unwrap();
    let ids: Vec<EmployeeId> = tree.iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![root, a, b, b1, a1]);

    assert_eq!(tree.iter().filter(|entry| entry.level == 1).count(), 1);
    for (index, entry) in tree.iter().enumerate().skip(1) {
        let manager_id = entry.manager_id.unwrap();
        let manager_pos = tree.iter().position(|m| m.id == manager_id).unwrap();
        assert!(manager_pos < index);
        assert_eq!(tree[manager_pos].level + 1, entry.level);
    }
}

#[test]
fn hierarchy_tree_of_leaf_is_single_entry() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [_, _, dev] = seed_chain(&service);

    let tree = service.hierarchy().hierarchy_tree(dev).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].level, 1);

    let err = service.hierarchy().hierarchy_tree(999).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(999)));
}

#[test]
fn hierarchy_nodes_nest_children() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [ceo, manager, dev] = seed_chain(&service);

    let node = service.hierarchy().hierarchy_nodes(ceo).unwrap();
    assert_eq!(node.entry.id, ceo);
    assert_eq!(node.node_count(), 3);
    assert_eq!(node.depth(), 3);
    assert_eq!(node.children[0].entry.id, manager);
    assert_eq!(node.children[0].children[0].entry.id, dev);
}

#[test]
fn management_chain_walks_up_to_root() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [ceo, manager, dev] = seed_chain(&service);

    let chain: Vec<EmployeeId> = service
        .hierarchy()
        .management_chain(dev)
        .unwrap()
        .into_iter()
        .map(|employee| employee.id)
        .collect();
    assert_eq!(chain, vec![manager, ceo]);
    assert!(service.hierarchy().management_chain(ceo).unwrap().is_empty());
}

#[test]
fn cycle_in_stored_data_is_detected_instead_of_looping() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [ceo, manager, dev] = seed_chain(&service);

    conn.execute(
        "UPDATE employees SET manager_id = ?1 WHERE id = ?2;",
        [dev, ceo],
    )
    .unwrap();

    let resolver = service.hierarchy();
    assert!(matches!(
        resolver.subordinate_ids(ceo).unwrap_err(),
        ServiceError::CycleDetected(_)
    ));
    assert!(matches!(
        resolver.hierarchy_tree(manager).unwrap_err(),
        ServiceError::CycleDetected(_)
    ));
    assert!(matches!(
        resolver.management_chain(dev).unwrap_err(),
        ServiceError::CycleDetected(_)
    ));
    assert_eq!(
        service.hierarchy().subordinate_ids(ceo).unwrap_err().code(),
        "cycle_detected"
    );
}

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use staffdb_core::db::open_db_in_memory;
use staffdb_core::{
    parse_raw_filters, EmployeeFilter, EmployeeId, EmployeeRow, EmployeeService, FilterKind,
    ListState, NewEmployee, QueryError, ServiceError, SortDirection, SortField, SortSpec,
    SqliteEmployeeRepository,
};

type Service<'conn> = EmployeeService<SqliteEmployeeRepository<'conn>>;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn hire(
    service: &Service<'_>,
    name: &str,
    position: &str,
    hire_date: &str,
    salary: i64,
    manager_id: Option<EmployeeId>,
) -> EmployeeId {
    service
        .create(&NewEmployee {
            full_name: name.to_string(),
            position: position.to_string(),
            hire_date: NaiveDate::parse_from_str(hire_date, "%Y-%m-%d").unwrap(),
            salary,
            manager_id,
        })
        .unwrap()
}

/// a <- (b, c), c <- d
fn seed(service: &Service<'_>) -> [EmployeeId; 4] {
    let a = hire(service, "Alice", "Senior DEVELOPER", "2019-12-31", 250000, None);
    let b = hire(service, "Boris", "Ведущий Разработчик", "2020-01-01", 40000, Some(a));
    let c = hire(service, "Chloe", "Designer", "2020-05-17", 150000, Some(a));
    let d = hire(service, "Dmitri", "developer advocate", "2021-03-10", 60000, Some(c));
    [a, b, c, d]
}

fn ids(rows: &[EmployeeRow]) -> Vec<EmployeeId> {
    rows.iter().map(|row| row.id).collect()
}

fn list_for(service: &Service<'_>, kind: FilterKind, input: &str) -> Vec<EmployeeId> {
    let state = ListState::new().with_filter(EmployeeFilter::parse(kind, input).unwrap());
    ids(&service.list(&state).unwrap())
}

#[test]
fn unfiltered_list_is_ordered_by_id_with_manager_names() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [a, b, c, d] = seed(&service);

    let rows = service.list(&ListState::new()).unwrap();
    assert_eq!(ids(&rows), vec![a, b, c, d]);
    assert_eq!(rows[0].manager_name, None);
    assert_eq!(rows[1].manager_name.as_deref(), Some("Alice"));
    assert_eq!(rows[3].manager_name.as_deref(), Some("Chloe"));
}

#[test]
fn salary_between_is_inclusive_and_order_independent() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [_, _, c, d] = seed(&service);

    let forward = list_for(&service, FilterKind::SalaryBetween, "50000,200000");
    let reversed = list_for(&service, FilterKind::SalaryBetween, "200000, 50000");
    assert_eq!(forward, vec![c, d]);
    assert_eq!(forward, reversed);

    let edges = list_for(&service, FilterKind::SalaryBetween, "60000,150000");
    assert_eq!(edges, vec![c, d]);
}

#[test]
fn salary_above_and_below_are_strict() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [a, b, c, d] = seed(&service);

    assert_eq!(list_for(&service, FilterKind::SalaryAbove, "150000"), vec![a]);
    assert_eq!(list_for(&service, FilterKind::SalaryBelow, "60000"), vec![b]);
    assert_eq!(
        list_for(&service, FilterKind::SalaryAbove, "0"),
        vec![a, b, c, d]
    );
}

#[test]
fn position_search_is_unicode_case_insensitive() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [a, b, _, d] = seed(&service);

    assert_eq!(
        list_for(&service, FilterKind::PositionContains, "Developer"),
        vec![a, d]
    );
    assert_eq!(
        list_for(&service, FilterKind::PositionContains, "РАЗРАБ"),
        vec![b]
    );
    assert!(list_for(&service, FilterKind::PositionContains, "%").is_empty());
}

#[test]
fn hired_after_is_inclusive_for_partial_dates_and_strict_for_full_dates() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [_, b, c, d] = seed(&service);

    assert_eq!(list_for(&service, FilterKind::HiredAfter, "2020"), vec![b, c, d]);
    assert_eq!(list_for(&service, FilterKind::HiredAfter, "2020-05"), vec![c, d]);
    assert_eq!(list_for(&service, FilterKind::HiredAfter, "2020-05-17"), vec![d]);
}

#[test]
fn hired_before_excludes_the_boundary_period_start() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [a, b, c, _] = seed(&service);

    assert_eq!(list_for(&service, FilterKind::HiredBefore, "2020"), vec![a, b, c]);
    assert_eq!(list_for(&service, FilterKind::HiredBefore, "2020-05-17"), vec![a, b]);
    assert_eq!(list_for(&service, FilterKind::HiredBefore, "2019"), vec![a]);
    assert!(list_for(&service, FilterKind::HiredBefore, "2019-12-31").is_empty());
}

#[test]
fn hired_between_covers_whole_periods_in_either_order() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [_, b, c, _] = seed(&service);

    assert_eq!(list_for(&service, FilterKind::HiredBetween, "2020,2020-05"), vec![b, c]);
    assert_eq!(list_for(&service, FilterKind::HiredBetween, "2020-05,2020"), vec![b, c]);
}

#[test]
fn manager_filter_matches_transitive_subordinates() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [a, b, c, d] = seed(&service);

    assert_eq!(list_for(&service, FilterKind::Manager, &a.to_string()), vec![b, c, d]);
    assert_eq!(list_for(&service, FilterKind::Manager, &c.to_string()), vec![d]);
    assert!(list_for(&service, FilterKind::Manager, &d.to_string()).is_empty());
}

#[test]
fn manager_filter_handles_teams_beyond_sqlite_variable_limit() {
    // Above SQLite's default SQLITE_MAX_VARIABLE_NUMBER (32766).
    const TEAM_SIZE: i64 = 33_000;

    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let manager = hire(&service, "Big Boss", "Director", "2015-01-01", 300000, None);
    let outsider = hire(&service, "Outsider", "Auditor", "2015-01-01", 90000, None);

    let tx = conn.unchecked_transaction().unwrap();
    {
        let mut stmt = tx
            .prepare(
                "INSERT INTO employees (full_name, position, hire_date, salary, manager_id)
                 VALUES (?1, 'Engineer', '2021-01-01', 50000, ?2);",
            )
            .unwrap();
        for n in 0..TEAM_SIZE {
            stmt.execute(params![format!("Report {n}"), manager]).unwrap();
        }
    }
    tx.commit().unwrap();
    let first_report = outsider + 1;
    let grandchild = hire(
        &service,
        "Grandchild",
        "Intern",
        "2022-01-01",
        20000,
        Some(first_report),
    );

    let state = ListState::new().with_filter(EmployeeFilter::Subordinates(manager));
    let rows = service.list(&state).unwrap();
    assert_eq!(rows.len() as i64, TEAM_SIZE + 1);
    assert_eq!(rows.first().map(|row| row.id), Some(first_report));
    assert_eq!(rows.last().map(|row| row.id), Some(grandchild));
    assert!(rows.iter().all(|row| row.id != manager && row.id != outsider));
}

#[test]
fn list_where_narrows_named_filter_with_raw_conditions() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [a, _, c, d] = seed(&service);

    let state = ListState::new()
        .with_filter(EmployeeFilter::Subordinates(a))
        .with_sort(SortSpec::desc(SortField::Salary));
    let raw = parse_raw_filters(&["salary>=60000"]).unwrap();
    assert_eq!(ids(&service.list_where(&state, &raw).unwrap()), vec![c, d]);

    let unknown = ListState::new().with_filter(EmployeeFilter::Subordinates(999));
    assert!(matches!(
        service.list_where(&unknown, &raw).unwrap_err(),
        ServiceError::NotFound(999)
    ));
}

#[test]
fn manager_filter_with_unknown_manager_is_not_found() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    seed(&service);

    let state = ListState::new().with_filter(EmployeeFilter::Subordinates(999));
    let err = service.list(&state).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(999)));
}

#[test]
fn malformed_filter_input_is_rejected_before_querying() {
    assert!(matches!(
        EmployeeFilter::parse(FilterKind::SalaryAbove, "a lot"),
        Err(QueryError::InvalidNumber { .. })
    ));
    assert!(matches!(
        EmployeeFilter::parse(FilterKind::HiredAfter, "2020-13"),
        Err(QueryError::InvalidMonth(_)) | Err(QueryError::InvalidDate(_))
    ));
    assert!(EmployeeFilter::parse(FilterKind::SalaryBetween, "100").is_err());
    assert!(EmployeeFilter::parse_spec("bonus-above:5").is_err());
}

#[test]
fn toggling_sort_twice_restores_original_order() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [a, b, c, d] = seed(&service);

    let mut state = ListState::new();
    assert_eq!(state.toggle_sort(SortField::Salary), SortSpec::asc(SortField::Salary));
    let ascending = ids(&service.list(&state).unwrap());
    assert_eq!(ascending, vec![b, d, c, a]);

    assert_eq!(state.toggle_sort(SortField::Salary).direction, SortDirection::Desc);
    let descending = ids(&service.list(&state).unwrap());
    assert_eq!(descending, vec![a, c, d, b]);

    state.toggle_sort(SortField::Salary);
    assert_eq!(ids(&service.list(&state).unwrap()), ascending);
}

#[test]
fn sort_by_manager_name_keeps_roots_first_and_ties_by_id() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [a, b, c, d] = seed(&service);

    let state = ListState::new().with_sort(SortSpec::asc(SortField::ManagerName));
    assert_eq!(ids(&service.list(&state).unwrap()), vec![a, b, c, d]);
}

#[test]
fn filter_and_sort_combine() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [a, _, c, d] = seed(&service);

    let state = ListState::new()
        .with_filter(EmployeeFilter::salary_between(50000, 300000))
        .with_sort(SortSpec::desc(SortField::FullName));
    assert_eq!(ids(&service.list(&state).unwrap()), vec![d, c, a]);
}

#[test]
fn raw_filters_are_and_combined() {
    let conn = setup();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let [a, _, c, d] = seed(&service);

    let condition = parse_raw_filters(&["salary>=60000", "hire_date<=2020-12-31"]).unwrap();
    let rows = service.list_with(&condition, None).unwrap();
    assert_eq!(ids(&rows), vec![a, c]);

    let roots = parse_raw_filters(&["boss_id=null"]).unwrap();
    assert_eq!(ids(&service.list_with(&roots, None).unwrap()), vec![a]);

    let managed = parse_raw_filters(&["manager_id!=null"]).unwrap();
    let rows = service
        .list_with(&managed, Some(SortSpec::desc(SortField::Id)))
        .unwrap();
    assert_eq!(ids(&rows)[0], d);
    assert_eq!(rows.len(), 3);
}

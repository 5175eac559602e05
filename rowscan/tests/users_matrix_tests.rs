use rowscan::{Error, MemCursor, Scanner, Value};
use rowscan_test_utils::{User, check_users_matrix, users_cursor, users_query_cursor};

#[test]
fn users_matrix_over_memory_rows() {
    check_users_matrix(users_query_cursor);
}

#[test]
fn scanning_twice_yields_equal_values() {
    let mut first: Vec<User> = Vec::new();
    let mut second: Vec<User> = Vec::new();
    rowscan::scan(users_cursor(&["id", "name", "password"]), &mut first).expect("first scan");
    rowscan::scan(users_cursor(&["id", "name", "password"]), &mut second).expect("second scan");
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn zero_rows_into_a_record_is_no_rows() {
    let cursor = MemCursor::from_rows(&["id", "name", "password"], Vec::new());
    let mut user = User::default();
    let err = rowscan::scan(cursor, &mut user).unwrap_err();
    assert!(matches!(err, Error::NoRows));
    assert_eq!(err.to_string(), "no rows in result set");
}

#[test]
fn zero_rows_into_a_sequence_is_empty() {
    let cursor = MemCursor::from_rows(&["id", "name", "password"], Vec::new());
    let mut users: Vec<User> = Vec::new();
    rowscan::scan(cursor, &mut users).expect("empty scan");
    assert!(users.is_empty());
}

#[test]
fn selected_subset_leaves_other_fields_alone() {
    let mut user = User {
        password: "unchanged".into(),
        ..User::default()
    };
    rowscan::scan(users_cursor(&["name", "id"]), &mut user).expect("scan subset");
    assert_eq!(user.id, 1);
    assert_eq!(user.name, "avalchev94");
    assert_eq!(user.password, "unchanged");
}

#[test]
fn map_keys_are_validated_before_reading() {
    let mut scanner = Scanner::new(users_cursor(&["id", "name", "password"]));
    let mut bad: std::collections::HashMap<i32, Value> = Default::default();
    let err = scanner.scan(&mut bad).unwrap_err();
    assert!(matches!(err, Error::InvalidKeyType("i32")));
    assert!(bad.is_empty());

    // The first row is still available.
    let mut user = User::default();
    scanner.scan(&mut user).expect("scan after rejected destination");
    assert_eq!(user.id, 1);
}

//! The `users` scan matrix, run against any row cursor.
//!
//! Each case opens a fresh cursor for its query, scans it into a fresh
//! destination of the case's type, and compares the result with the
//! expected value.

use std::collections::HashMap;

use rowscan::{RowCursor, Scanner, Value, record};

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct User {
        pub id: i32 => "id",
        pub name: String => "name",
        pub password: String => "password",
    }
}

/// Queries the matrix issues against the `users` fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// `SELECT <columns> FROM users`.
    Select(&'static [&'static str]),
    /// `SELECT COUNT(*) FROM users`.
    Count,
}

const ALL: Query = Query::Select(&["id", "name", "password"]);
const NAME: Query = Query::Select(&["name"]);
const NAME_PASSWORD: Query = Query::Select(&["name", "password"]);
const ID: Query = Query::Select(&["id"]);

fn user(id: i32, name: &str, password: &str) -> User {
    User {
        id,
        name: name.to_string(),
        password: password.to_string(),
    }
}

fn user_map(id: i64, name: &str, password: &str) -> HashMap<String, Value> {
    HashMap::from([
        ("id".to_string(), Value::Int(id)),
        ("name".to_string(), Value::from(name)),
        ("password".to_string(), Value::from(password)),
    ])
}

fn run<C, D>(open: &impl Fn(Query) -> C, case: usize, query: Query) -> D
where
    C: RowCursor,
    D: rowscan::Destination + Default,
{
    let mut dest = D::default();
    if let Err(err) = Scanner::new(open(query)).scan(&mut dest) {
        panic!("case {case}: scan failed: {err}");
    }
    dest
}

/// Runs every case, opening cursors with `open`.
pub fn check_users_matrix<C: RowCursor>(open: impl Fn(Query) -> C) {
    let first = user(1, "avalchev94", "github");
    let second = user(2, "avalchev", "linkedin");

    let got: User = run(&open, 1, ALL);
    assert_eq!(got, first, "case 1");

    let got: HashMap<String, Value> = run(&open, 2, ALL);
    assert_eq!(got, user_map(1, "avalchev94", "github"), "case 2");

    let got: HashMap<usize, String> = run(&open, 3, NAME_PASSWORD);
    assert_eq!(
        got,
        HashMap::from([(0, "avalchev94".to_string()), (1, "github".to_string())]),
        "case 3"
    );

    let got: i64 = run(&open, 4, Query::Count);
    assert_eq!(got, 2, "case 4");

    let got: String = run(&open, 5, NAME);
    assert_eq!(got, "avalchev94", "case 5");

    let got: Value = run(&open, 6, NAME);
    assert_eq!(got, Value::from("avalchev94"), "case 6");

    let got: Vec<Value> = run(&open, 7, ALL);
    assert_eq!(
        got,
        vec![Value::Int(1), Value::from("avalchev94"), Value::from("github")],
        "case 7"
    );

    let got: Vec<String> = run(&open, 8, NAME_PASSWORD);
    assert_eq!(got, vec!["avalchev94", "github"], "case 8");

    let got: Vec<i32> = run(&open, 9, ID);
    assert_eq!(got, vec![1], "case 9");

    let got: Vec<User> = run(&open, 10, ALL);
    assert_eq!(got, vec![first.clone(), second.clone()], "case 10");

    let got: Vec<Vec<Value>> = run(&open, 11, ALL);
    assert_eq!(
        got,
        vec![
            vec![Value::Int(1), Value::from("avalchev94"), Value::from("github")],
            vec![Value::Int(2), Value::from("avalchev"), Value::from("linkedin")],
        ],
        "case 11"
    );

    let got: Vec<HashMap<String, Value>> = run(&open, 12, ALL);
    assert_eq!(
        got,
        vec![
            user_map(1, "avalchev94", "github"),
            user_map(2, "avalchev", "linkedin"),
        ],
        "case 12"
    );

    let got: Vec<Vec<String>> = run(&open, 13, NAME_PASSWORD);
    assert_eq!(
        got,
        vec![vec!["avalchev94", "github"], vec!["avalchev", "linkedin"]],
        "case 13"
    );

    let got: Vec<Vec<i32>> = run(&open, 14, ID);
    assert_eq!(got, vec![vec![1], vec![2]], "case 14");
}

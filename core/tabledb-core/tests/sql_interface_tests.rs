// SQL 인터페이스 통합 테스트

use tabledb_core::{Database, ErrorKind, ExecutionResult, TdbResult, Value};

fn setup() -> TdbResult<Database> {
    let mut db = Database::open_in_memory()?;
    db.execute_sql(
        "CREATE TABLE A (id INT PRIMARY KEY, x INT);
         CREATE TABLE B (id INT PRIMARY KEY, a_id INT);
         CREATE TABLE P (id INT PRIMARY KEY, name STRING, price FLOAT);
         INSERT INTO A VALUES (1, 10), (2, 20);
         INSERT INTO B VALUES (1, 1), (2, 2);
         INSERT INTO P VALUES (3, 'pear', 1.5), (1, 'apple', 0.75), (2, 'fig', 3)",
    )?;
    Ok(db)
}

fn rows(results: &[ExecutionResult]) -> Vec<Vec<Value>> {
    results
        .last()
        .and_then(ExecutionResult::rows)
        .map(|rs| rs.rows.clone())
        .unwrap_or_default()
}

#[test]
fn test_select_where_storage_order() -> TdbResult<()> {
    let mut db = setup()?;
    let results = db.execute_sql("SELECT id, name FROM P WHERE id >= 2")?;
    assert_eq!(
        rows(&results),
        vec![
            vec![Value::Integer(3), Value::from("pear")],
            vec![Value::Integer(2), Value::from("fig")],
        ]
    );
    Ok(())
}

#[test]
fn test_join_sql() -> TdbResult<()> {
    let mut db = setup()?;
    let results = db.execute_sql("SELECT * FROM A INNER JOIN B ON A.id = B.a_id")?;
    let rs = results[0].rows().unwrap();
    assert_eq!(rs.headers, vec!["A.id", "A.x", "B.id", "B.a_id"]);
    assert_eq!(rs.rows.len(), 2);
    assert_eq!(rs.rows[1], vec![2.into(), 20.into(), 2.into(), 2.into()]);

    // reversed ON, qualified projection, WHERE on the left table
    let results = db.execute_sql("SELECT B.id, x FROM A JOIN B ON B.a_id = A.id WHERE x > 10")?;
    assert_eq!(rows(&results), vec![vec![Value::Integer(2), Value::Integer(20)]]);
    Ok(())
}

#[test]
fn test_where_left_fold_without_precedence() -> TdbResult<()> {
    let mut db = setup()?;
    // folds as ((id = 1 OR id = 2) AND price > 1), not id = 1 OR (id = 2 AND price > 1)
    let results = db.execute_sql("SELECT id FROM P WHERE id = 1 OR id = 2 AND price > 1")?;
    assert_eq!(rows(&results), vec![vec![Value::Integer(2)]]);
    Ok(())
}

#[test]
fn test_update_and_delete_sql() -> TdbResult<()> {
    let mut db = setup()?;
    let results = db.execute_sql("UPDATE P SET price = 2 WHERE name = 'apple'")?;
    assert_eq!(results[0].affected(), Some(1));

    let results = db.execute_sql("SELECT price FROM P WHERE id = 1")?;
    assert_eq!(rows(&results), vec![vec![Value::Float(2.0)]]);

    let results = db.execute_sql("DELETE FROM P WHERE price < 2.5")?;
    assert_eq!(results[0].affected(), Some(2));

    let results = db.execute_sql("SELECT * FROM P")?;
    assert_eq!(
        rows(&results),
        vec![vec![Value::Integer(2), Value::from("fig"), Value::Float(3.0)]]
    );
    assert_eq!(db.table("P")?.index().search(2), Some(0));
    Ok(())
}

#[test]
fn test_update_primary_key_sql() -> TdbResult<()> {
    let mut db = setup()?;
    db.execute_sql("UPDATE P SET id = 30 WHERE id = 3")?;
    let t = db.table("P")?;
    assert_eq!(t.index().search(3), None);
    assert_eq!(t.index().search(30), Some(0));

    let err = db.execute_sql("UPDATE P SET id = 1 WHERE id = 2").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Constraint);
    Ok(())
}

#[test]
fn test_sql_errors() -> TdbResult<()> {
    let mut db = setup()?;
    let kind = |db: &mut Database, sql: &str| db.execute_sql(sql).unwrap_err().kind();

    assert_eq!(kind(&mut db, "SELEKT * FROM P"), ErrorKind::Sql);
    assert_eq!(kind(&mut db, "SELECT * FROM P ORDER BY id"), ErrorKind::Sql);
    assert_eq!(
        kind(&mut db, "SELECT * FROM P WHERE id = 1 AND (id = 2 OR id = 3)"),
        ErrorKind::Sql
    );
    assert_eq!(kind(&mut db, "SELECT * FROM Missing"), ErrorKind::Schema);
    assert_eq!(kind(&mut db, "SELECT nope FROM P"), ErrorKind::Schema);
    assert_eq!(kind(&mut db, "INSERT INTO P VALUES (9, 'x')"), ErrorKind::Schema);
    assert_eq!(kind(&mut db, "INSERT INTO P VALUES ('x', 'y', 1.0)"), ErrorKind::Type);
    assert_eq!(kind(&mut db, "INSERT INTO P VALUES (1, 'dup', 1.0)"), ErrorKind::Constraint);
    assert_eq!(kind(&mut db, "CREATE TABLE P (id INT)"), ErrorKind::Schema);
    Ok(())
}

#[test]
fn test_result_rendering() -> TdbResult<()> {
    let mut db = setup()?;
    let results = db.execute_sql("SELECT name, price FROM P WHERE id = 1")?;
    let rs = results[0].rows().unwrap();
    assert_eq!(rs.rendered_rows(), vec![vec!["apple", "0.75"]]);
    let table = rs.pretty()?;
    assert!(table.contains("apple"));
    assert!(table.contains("price"));
    let json = rs.to_json()?;
    assert!(json.contains("apple"));
    Ok(())
}

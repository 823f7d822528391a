//! 기본 CRUD 작업 예제
//!
//! 실행: cargo run --example basic_crud

use tabledb_core::{Assignment, Column, DataType, Database, Predicate, Projection};

fn main() -> tabledb_core::TdbResult<()> {
    println!("=== tabledb 기본 CRUD 예제 ===\n");

    // 1. 인메모리 데이터베이스 + 테이블 생성
    println!("1. 테이블 생성...");
    let mut db = Database::open_in_memory()?;
    db.create_table(
        "users",
        vec![
            Column::primary_key("id", DataType::Integer),
            Column::new("name", DataType::Text),
            Column::new("score", DataType::Float),
        ],
    )?;
    println!("   ✓ users(id INT PRIMARY KEY, name STRING, score FLOAT)\n");

    // 2. 데이터 삽입 (Create)
    println!("2. 데이터 삽입...");
    db.insert_into("users", vec![3.into(), "Charlie".into(), 71.5.into()])?;
    db.insert_into("users", vec![1.into(), "Alice".into(), 88.0.into()])?;
    db.insert_into("users", vec![2.into(), "Bob".into(), 93.25.into()])?;
    println!("   ✓ 3개 행 삽입 완료");
    let dup = db.insert_into("users", vec![2.into(), "Bobby".into(), 0.0.into()]);
    if let Err(e) = dup {
        println!("   ✓ 중복 키 거부: {e}\n");
    }

    // 3. 데이터 조회 (Read), 저장 순서 유지
    println!("3. 데이터 조회 (id >= 2)...");
    let rs = db.select("users", &[Predicate::gt_eq("id", 2)], &Projection::All)?;
    println!("{}\n", rs.pretty()?);

    // 4. 데이터 수정 (Update)
    println!("4. 데이터 수정...");
    let summary = db.update(
        "users",
        &[Assignment::new("score", 90.0)],
        &[Predicate::eq("name", "Alice")],
    )?;
    println!("   ✓ {}개 행 수정됨\n", summary.affected);

    // 5. 데이터 삭제 (Delete)
    println!("5. 데이터 삭제...");
    let summary = db.delete_rows("users", &[Predicate::eq("id", 3)])?;
    println!("   ✓ {}개 행 삭제됨", summary.affected);
    if let Some(row) = db.table("users")?.lookup(1) {
        println!("   ✓ 인덱스 조회 id=1 → {row:?}\n");
    }

    // 6. SQL로 조회
    println!("6. SQL 조회...");
    for result in db.execute_sql("SELECT name, score FROM users WHERE score > 89")? {
        if let Some(rs) = result.rows() {
            println!("{}", rs.pretty()?);
        }
    }

    println!("\n=== 예제 완료 ===");
    Ok(())
}

//! 대화형 SQL 셸
//!
//! 실행: cargo run --example repl
//! 로그 출력: RUST_LOG=debug cargo run --example repl --features logging
//!
//! 한 줄에 SQL 문 하나 이상(`;` 구분)을 입력합니다. `EXIT`로 종료합니다.

use std::io::{self, BufRead, Write};
use std::time::Instant;
use tabledb_core::{Database, ExecutionResult};

const PROMPT: &str = "\x1b[34mNexusPrime > \x1b[0m";

fn main() -> tabledb_core::TdbResult<()> {
    tabledb_core::logging::init();

    let mut db = Database::from_env()?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("{PROMPT}");
    let _ = stdout.flush();
    for line in stdin.lock().lines() {
        let Ok(input) = line else { break };
        let input = input.trim();
        if input == "EXIT" {
            break;
        }
        if !input.is_empty() {
            let started = Instant::now();
            match db.execute_sql(input) {
                Ok(results) => results.iter().for_each(print_result),
                Err(e) => eprintln!("Error: {e}"),
            }
            let micros = started.elapsed().as_micros();
            println!("\x1b[38;5;208mTotal time: {micros} µs\x1b[0m");
        }
        print!("{PROMPT}");
        let _ = stdout.flush();
    }
    Ok(())
}

fn print_result(result: &ExecutionResult) {
    match result {
        ExecutionResult::Created { table } => println!("Table '{table}' created."),
        ExecutionResult::Mutated(summary) => {
            println!("{} row(s) affected.", summary.affected);
            for err in &summary.index_errors {
                eprintln!("Index warning: {err}");
            }
        }
        ExecutionResult::Rows(rs) => match rs.pretty() {
            Ok(table) => println!("{table}\n{} row(s).", rs.row_count()),
            Err(e) => eprintln!("Error: {e}"),
        },
    }
}

use crate::error::{TdbError, TdbResult};
use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

/// SQL 파서 — sqlparser-rs
#[derive(Debug)]
pub struct SqlParser {
    dialect: GenericDialect,
}

impl SqlParser {
    /// 새 SQL 파서 생성
    pub fn new() -> Self {
        Self {
            dialect: GenericDialect {},
        }
    }

    /// SQL 문자열을 AST로 파싱
    pub fn parse(&self, sql: &str) -> TdbResult<Vec<Statement>> {
        Parser::parse_sql(&self.dialect, sql).map_err(|e| TdbError::SqlParse {
            message: e.to_string(),
            sql: sql.to_string(),
        })
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlparser::ast::{SelectItem, SetExpr};

    #[test]
    fn test_parse_simple_select() {
        let parser = SqlParser::new();
        let statements = parser.parse("SELECT * FROM T").unwrap();
        assert_eq!(statements.len(), 1);

        match &statements[0] {
            Statement::Query(query) => {
                if let SetExpr::Select(select) = query.body.as_ref() {
                    assert_eq!(select.projection.len(), 1);
                    assert!(matches!(select.projection[0], SelectItem::Wildcard(_)));
                }
            }
            _ => panic!("Expected Query"),
        }
    }

    #[test]
    fn test_parse_create_with_primary_key() {
        let parser = SqlParser::new();
        let statements = parser
            .parse("CREATE TABLE T (id INT PRIMARY KEY, name STRING)")
            .unwrap();
        assert!(matches!(statements[0], Statement::CreateTable(_)));
    }

    #[test]
    fn test_parse_multiple_statements() {
        let parser = SqlParser::new();
        let statements = parser
            .parse("INSERT INTO T VALUES (1, 'a'); DELETE FROM T WHERE id = 1")
            .unwrap();
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_parse_error() {
        let parser = SqlParser::new();
        let err = parser.parse("SELEC * FROM T").unwrap_err();
        assert!(matches!(err, TdbError::SqlParse { .. }));
    }
}

use compositekey::{driver::Capability, stmt::Value, Connection, Result};

use std::collections::VecDeque;

/// A statement that reached the connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub query: bool,
    pub sql: String,
    pub params: Vec<Value>,
}

/// Records every statement and answers queries with canned rows, in order.
#[derive(Debug)]
pub struct MockConnection {
    capability: Capability,
    rows: VecDeque<Vec<Vec<Value>>>,
    log: Vec<Executed>,
}

impl MockConnection {
    pub fn new(capability: Capability) -> MockConnection {
        MockConnection {
            capability,
            rows: VecDeque::new(),
            log: vec![],
        }
    }

    /// Queues the result of the next query.
    pub fn returning(mut self, rows: Vec<Vec<Value>>) -> MockConnection {
        self.rows.push_back(rows);
        self
    }

    pub fn log(&self) -> &[Executed] {
        &self.log
    }
}

impl Connection for MockConnection {
    fn capability(&self) -> &Capability {
        &self.capability
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Vec<Value>>> {
        self.log.push(Executed {
            query: true,
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        Ok(self.rows.pop_front().unwrap_or_default())
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        self.log.push(Executed {
            query: false,
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        Ok(1)
    }
}

use compositekey_core::{
    stmt::{CompositeKey, InsertQuery, Query, UpdateQuery, Value},
    Connection, Error, Result,
};
use compositekey_sql::Serializer;

use tracing::debug;

/// Compiles statements and runs them on a connection.
#[derive(Debug)]
pub struct Executor<'a, C> {
    serializer: Serializer<'a>,
    conn: C,
}

impl<'a, C: Connection> Executor<'a, C> {
    /// Compiles against the connection's capabilities.
    pub fn new(serializer: Serializer<'a>, conn: C) -> Executor<'a, C> {
        let capability = conn.capability().clone();

        Executor {
            serializer: serializer.with_capability(capability),
            conn,
        }
    }

    pub fn serializer(&self) -> &Serializer<'a> {
        &self.serializer
    }

    pub fn connection(&mut self) -> &mut C {
        &mut self.conn
    }

    pub fn into_connection(self) -> C {
        self.conn
    }

    pub fn fetch(&mut self, query: &mut Query) -> Result<Vec<Vec<Value>>> {
        let stmt = self.serializer.select(query)?;
        self.conn.query(&stmt.sql, &stmt.params)
    }

    /// Runs every statement of the update and returns the rows affected by
    /// the first one.
    pub fn update(&mut self, update: &mut UpdateQuery) -> Result<u64> {
        let stmts = self.serializer.update(update, &mut self.conn)?;

        let mut affected = None;
        for stmt in stmts {
            let count = self.conn.execute(&stmt.sql, &stmt.params)?;
            debug!(sql = %stmt.sql, rows = count, "executed UPDATE");
            affected.get_or_insert(count);
        }

        Ok(affected.unwrap_or(0))
    }

    /// Runs the insert. With `return_id` on a backend that returns generated
    /// keys, yields the new primary key.
    pub fn insert(&mut self, insert: &InsertQuery) -> Result<Option<Value>> {
        let stmts = self.serializer.insert(insert)?;
        let cx = self.serializer.context();

        if insert.return_id && cx.capability.can_return_id_from_insert {
            let Some(stmt) = stmts.first() else {
                return Ok(None);
            };

            let pk = cx.schema.pk(insert.query.model);
            let Some(row) = self.conn.query(&stmt.sql, &stmt.params)?.into_iter().next() else {
                return Ok(None);
            };

            return if pk.column.is_composite() {
                Ok(Some(Value::Composite(CompositeKey::assemble(pk, row)?)))
            } else {
                let [id] = <[Value; 1]>::try_from(row).map_err(|row| Error::arity(1, row.len()))?;
                Ok(Some(id))
            };
        }

        for stmt in stmts {
            let count = self.conn.execute(&stmt.sql, &stmt.params)?;
            debug!(sql = %stmt.sql, rows = count, "executed INSERT");
        }

        Ok(None)
    }
}

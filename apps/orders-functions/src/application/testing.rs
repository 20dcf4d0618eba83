//! Scripted session provider for unit tests.
//!
//! Records every statement and table read, and answers `execute` calls from
//! a queue of prepared results.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::application::ports::{ResultSet, Session, SessionProvider, Statement, StoreError};
use crate::domain::{ColumnSpec, Row};

#[derive(Debug, Default)]
struct Script {
    acquired: usize,
    closed: usize,
    shutdowns: usize,
    acquire_error: Option<StoreError>,
    results: VecDeque<Result<ResultSet, StoreError>>,
    table: TableScript,
    executed: Vec<Statement>,
    tables_read: Vec<String>,
}

/// Session provider answering from a script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    script: Arc<Mutex<Script>>,
}

#[derive(Debug, Clone)]
enum TableScript {
    Rows(Vec<Row>),
    Fail(StoreError),
}

impl Default for TableScript {
    fn default() -> Self {
        Self::Rows(Vec::new())
    }
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue the result of the next `execute`.
    pub fn push_result(&self, result: Result<ResultSet, StoreError>) -> &Self {
        self.script().results.push_back(result);
        self
    }

    /// Rows returned by `stream_read_table`.
    pub fn with_table(&self, rows: Vec<Row>) -> &Self {
        self.script().table = TableScript::Rows(rows);
        self
    }

    /// Make `stream_read_table` fail.
    pub fn failing_table(&self, err: StoreError) -> &Self {
        self.script().table = TableScript::Fail(err);
        self
    }

    /// Make every `acquire` fail.
    pub fn failing_acquire(&self, err: StoreError) -> &Self {
        self.script().acquire_error = Some(err);
        self
    }

    pub fn acquired(&self) -> usize {
        self.script().acquired
    }

    pub fn closed(&self) -> usize {
        self.script().closed
    }

    pub fn shutdowns(&self) -> usize {
        self.script().shutdowns
    }

    pub fn executed(&self) -> Vec<Statement> {
        self.script().executed.clone()
    }

    pub fn tables_read(&self) -> Vec<String> {
        self.script().tables_read.clone()
    }
}

/// Session handed out by [`ScriptedProvider`].
#[derive(Debug)]
pub struct ScriptedSession {
    script: Arc<Mutex<Script>>,
}

impl ScriptedSession {
    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Session for ScriptedSession {
    async fn execute(&mut self, statement: &Statement) -> Result<ResultSet, StoreError> {
        let mut script = self.script();
        script.executed.push(statement.clone());
        script
            .results
            .pop_front()
            .unwrap_or_else(|| Ok(ResultSet::default()))
    }

    async fn stream_read_table(
        &mut self,
        table: &str,
        _columns: &[ColumnSpec],
    ) -> Result<Vec<Row>, StoreError> {
        let mut script = self.script();
        script.tables_read.push(table.to_string());
        match &script.table {
            TableScript::Rows(rows) => Ok(rows.clone()),
            TableScript::Fail(err) => Err(err.clone()),
        }
    }

    async fn close(self) -> Result<(), StoreError> {
        self.script().closed += 1;
        Ok(())
    }
}

#[async_trait]
impl SessionProvider for ScriptedProvider {
    type Session = ScriptedSession;

    async fn acquire(&self) -> Result<Self::Session, StoreError> {
        let mut script = self.script();
        if let Some(err) = script.acquire_error.clone() {
            return Err(err);
        }
        script.acquired += 1;
        Ok(ScriptedSession {
            script: Arc::clone(&self.script),
        })
    }

    async fn shutdown(&self) {
        self.script().shutdowns += 1;
    }
}

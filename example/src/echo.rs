//! In process collaborator which returns every parameter as a column of a single row.
use std::ffi::CStr;

use ppq::{
    Connect, ExecStatus, Execute, Marshaled, Result, ResultSet,
    postgres::PgFormat,
};
use tracing::debug;

pub struct Echo {
    statements: Vec<(Box<CStr>, Box<CStr>)>,
}

/// Single row result, every cell is stored followed by a nul byte.
pub struct EchoResult {
    status: ExecStatus,
    message: Option<String>,
    row: Vec<Option<Vec<u8>>>,
}

impl Echo {
    fn echo(&self, sql: &CStr, params: Option<&Marshaled<'_>>) -> EchoResult {
        let Some(params) = params else {
            debug!(?sql, "no parameters");
            return EchoResult { status: ExecStatus::CommandOk, message: None, row: vec![] };
        };

        debug!(?sql, lengths = ?params.lengths(), formats = ?params.formats(), "echo");

        let row = params
            .iter()
            .map(|(bytes, _)| {
                // stored with a trailing nul, like libpq does
                let mut value = Vec::with_capacity(bytes.len() + 1);
                value.extend_from_slice(bytes);
                value.push(b'\0');
                Some(value)
            })
            .collect();

        EchoResult { status: ExecStatus::TuplesOk, message: None, row }
    }
}

impl Execute for Echo {
    type Result = EchoResult;

    fn exec_params(&mut self, sql: &CStr, params: Option<&Marshaled<'_>>, _: PgFormat) -> Result<EchoResult> {
        Ok(self.echo(sql, params))
    }

    fn exec_prepared(&mut self, name: &CStr, params: Option<&Marshaled<'_>>, _: PgFormat) -> Result<EchoResult> {
        let Some((_, sql)) = self.statements.iter().find(|(n, _)| **n == *name) else {
            return Ok(EchoResult {
                status: ExecStatus::FatalError,
                message: Some(format!("prepared statement {name:?} does not exist")),
                row: vec![],
            });
        };
        Ok(self.echo(sql, params))
    }

    fn prepare(&mut self, name: &CStr, sql: &CStr) -> Result<EchoResult> {
        self.statements.push((name.into(), sql.into()));
        Ok(EchoResult { status: ExecStatus::CommandOk, message: None, row: vec![] })
    }
}

impl Connect for Echo {
    fn connect(conninfo: &CStr) -> Result<Self> {
        debug!(?conninfo, "connect");
        Ok(Echo { statements: vec![] })
    }
}

impl ResultSet for EchoResult {
    fn status(&self) -> ExecStatus {
        self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn rows(&self) -> usize {
        match self.row.is_empty() {
            true => 0,
            false => 1,
        }
    }

    fn columns(&self) -> usize {
        self.row.len()
    }

    fn value(&self, row: usize, column: usize) -> Option<&[u8]> {
        self.value_with_nul(row, column).map(|cell| &cell[..cell.len() - 1])
    }

    fn value_with_nul(&self, _: usize, column: usize) -> Option<&[u8]> {
        self.row[column].as_deref()
    }
}

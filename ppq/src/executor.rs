//! Execution collaborator boundary.
//!
//! The session, statement execution and result storage are owned by an external
//! client library. This module defines what the library must provide:
//!
//! - [`Connect`], open a session from a conninfo string
//! - [`Execute`], run a statement with marshaled parameters
//! - [`ResultSet`], status and raw cell access of a result
use std::{ffi::CStr, fmt};

use crate::{Result, params::Marshaled, postgres::PgFormat};

/// Results are always requested in binary.
pub const RESULT_FORMAT: PgFormat = PgFormat::Binary;

/// Status of a result.
///
/// <https://www.postgresql.org/docs/current/libpq-exec.html#LIBPQ-PQRESULTSTATUS>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStatus {
    /// The string sent to the server was empty.
    EmptyQuery,
    /// Successful completion of a command returning no data.
    CommandOk,
    /// Successful completion of a command returning data.
    TuplesOk,
    /// The server's response was not understood.
    BadResponse,
    /// A nonfatal error (a notice or warning) occurred.
    NonfatalError,
    /// A fatal error occurred.
    FatalError,
}

impl ExecStatus {
    /// Returns `true` for [`CommandOk`][ExecStatus::CommandOk] and [`TuplesOk`][ExecStatus::TuplesOk].
    pub const fn is_ok(&self) -> bool {
        matches!(self, ExecStatus::CommandOk | ExecStatus::TuplesOk)
    }
}

impl fmt::Display for ExecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExecStatus::EmptyQuery => "empty query",
            ExecStatus::CommandOk => "command ok",
            ExecStatus::TuplesOk => "tuples ok",
            ExecStatus::BadResponse => "bad response",
            ExecStatus::NonfatalError => "nonfatal error",
            ExecStatus::FatalError => "fatal error",
        })
    }
}

/// A result handle returned by the execution primitive.
pub trait ResultSet {
    /// Result status.
    fn status(&self) -> ExecStatus;

    /// Error message associated with the result, if any.
    fn error_message(&self) -> Option<&str>;

    /// Number of rows.
    fn rows(&self) -> usize;

    /// Number of columns.
    fn columns(&self) -> usize;

    /// Raw cell bytes, [`None`] for `NULL`.
    ///
    /// The slice length is the length reported by the server.
    ///
    /// Caller guarantees `row < self.rows()` and `column < self.columns()`.
    fn value(&self, row: usize, column: usize) -> Option<&[u8]>;

    /// Raw cell bytes followed by the nul terminator, [`None`] for `NULL`.
    ///
    /// libpq keeps a nul byte after every value, collaborators backed by such
    /// storage should return the slice including it, which is one byte longer
    /// than [`value`][ResultSet::value]. This is what borrowed
    /// [`&CStr`][std::ffi::CStr] decoding reads.
    ///
    /// Defaults to [`value`][ResultSet::value], so borrowed [`&CStr`][std::ffi::CStr]
    /// decoding fails unless the cell itself ends with nul.
    ///
    /// Caller guarantees `row < self.rows()` and `column < self.columns()`.
    fn value_with_nul(&self, row: usize, column: usize) -> Option<&[u8]> {
        self.value(row, column)
    }

    /// Number of rows affected by the command, if reported.
    fn rows_affected(&self) -> Option<u64> {
        None
    }
}

/// The execution primitive.
///
/// `params` is [`None`] when the statement has no parameters, implementor
/// should forward it as zero count with null arrays, see
/// [`RawParams`][crate::params::RawParams].
pub trait Execute {
    /// The returned result handle.
    type Result: ResultSet;

    /// Execute sql string with parameters.
    fn exec_params(
        &mut self,
        sql: &CStr,
        params: Option<&Marshaled<'_>>,
        result_format: PgFormat,
    ) -> Result<Self::Result>;

    /// Execute named prepared statement with parameters.
    fn exec_prepared(
        &mut self,
        name: &CStr,
        params: Option<&Marshaled<'_>>,
        result_format: PgFormat,
    ) -> Result<Self::Result>;

    /// Prepare named statement, parameter types are inferred by the server.
    fn prepare(&mut self, name: &CStr, sql: &CStr) -> Result<Self::Result>;
}

impl<E: Execute> Execute for &mut E {
    type Result = E::Result;

    fn exec_params(
        &mut self,
        sql: &CStr,
        params: Option<&Marshaled<'_>>,
        result_format: PgFormat,
    ) -> Result<Self::Result> {
        E::exec_params(self, sql, params, result_format)
    }

    fn exec_prepared(
        &mut self,
        name: &CStr,
        params: Option<&Marshaled<'_>>,
        result_format: PgFormat,
    ) -> Result<Self::Result> {
        E::exec_prepared(self, name, params, result_format)
    }

    fn prepare(&mut self, name: &CStr, sql: &CStr) -> Result<Self::Result> {
        E::prepare(self, name, sql)
    }
}

/// A session which can be opened from conninfo string.
pub trait Connect: Execute + Sized {
    /// Open a session.
    fn connect(conninfo: &CStr) -> Result<Self>;
}

/// Error reported by the server in a result.
pub struct DatabaseError {
    status: ExecStatus,
    message: String,
}

impl DatabaseError {
    pub(crate) fn new(status: ExecStatus, message: Option<&str>) -> Self {
        Self {
            status,
            message: message.map(|m| m.trim_end().to_owned()).unwrap_or_default(),
        }
    }

    /// Status of the failed result.
    pub fn status(&self) -> ExecStatus {
        self.status
    }

    /// Server error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::error::Error for DatabaseError { }

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message.is_empty() {
            true => write!(f, "query failed: {}", self.status),
            false => write!(f, "query failed: {}: {}", self.status, self.message),
        }
    }
}

impl fmt::Debug for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

/// Returns the result if its status is ok.
pub(crate) fn check<R: ResultSet>(result: R) -> Result<R, DatabaseError> {
    let status = result.status();
    match status.is_ok() {
        true => Ok(result),
        false => Err(DatabaseError::new(status, result.error_message())),
    }
}

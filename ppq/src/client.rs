//! The [`Client`] facade.
use std::ffi::CStr;

use crate::{
    Result,
    common::{span, verbose},
    connection::Config,
    executor::{Connect, Execute, RESULT_FORMAT, check},
    params::ToParams,
};

/// Drive an execution collaborator with typed parameters.
///
/// Every statement is executed with binary results, and its result status
/// is checked before returned.
///
/// The encoded parameters of a call are dropped as soon as the collaborator returns.
#[derive(Debug)]
pub struct Client<E> {
    inner: E,
}

impl<E: Connect> Client<E> {
    /// Open a session using [`Config`].
    pub fn connect(config: &Config) -> Result<Self> {
        span!("connect", host = config.host(), port = config.port());
        let conninfo = config.conninfo()?;
        let inner = E::connect(&conninfo).map_err(|e| e.context("failed to connect"))?;
        verbose!("connected");
        Ok(Self::new(inner))
    }
}

impl<E: Execute> Client<E> {
    /// Wrap an already opened session.
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    /// Returns the underlying session.
    pub fn get_ref(&self) -> &E {
        &self.inner
    }

    /// Returns the underlying session.
    pub fn get_mut(&mut self) -> &mut E {
        &mut self.inner
    }

    /// Returns the underlying session.
    pub fn into_inner(self) -> E {
        self.inner
    }

    /// Prepare a named statement.
    pub fn prepare(&mut self, name: &CStr, sql: &CStr) -> Result<()> {
        span!("prepare", ?name);
        let result = self.inner.prepare(name, sql)?;
        check(result).map_err(|e| {
            let context = format!("failed to prepare {:?}", name);
            crate::Error::from(e).context(context)
        })?;
        Ok(())
    }

    /// Execute sql string with positional parameters.
    ///
    /// ```no_run
    /// # use ppq::{Client, executor::Execute, ResultSetExt};
    /// # fn app<E: Execute>(client: &mut Client<E>) -> ppq::Result<()> {
    /// let ids = vec![1i64, 2, 3];
    /// let result = client.execute(c"SELECT id, name FROM t WHERE id = ANY($1) AND kind = $2", (&ids, 4i16))?;
    ///
    /// for row in result.iter() {
    ///     let (id, name) = row.decode::<(i64, &str)>()?;
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn execute<'q, P: ToParams<'q>>(&mut self, sql: &CStr, params: P) -> Result<E::Result> {
        span!("execute", ?sql);
        let params = params.to_params();
        let result = self.inner.exec_params(sql, params.marshal().as_ref(), RESULT_FORMAT)?;
        drop(params);
        Ok(check(result)?)
    }

    /// Execute named prepared statement with positional parameters.
    pub fn execute_prepared<'q, P: ToParams<'q>>(&mut self, name: &CStr, params: P) -> Result<E::Result> {
        span!("execute_prepared", ?name);
        let params = params.to_params();
        let result = self.inner.exec_prepared(name, params.marshal().as_ref(), RESULT_FORMAT)?;
        drop(params);
        Ok(check(result)?)
    }
}

#[cfg(test)]
mod test {
    use std::ffi::{CString, c_int};

    use super::*;
    use crate::{
        Error, ErrorKind, ResultSetExt,
        array::HEADER_SIZE,
        executor::ExecStatus,
        network::Network,
        params::{Marshaled, RawParams},
        postgres::PgFormat,
        row::test::Table,
    };

    /// Call as seen by the collaborator.
    #[derive(Debug, Default)]
    struct Call {
        target: String,
        no_params: bool,
        lengths: Vec<c_int>,
        formats: Vec<c_int>,
        values: Vec<Vec<u8>>,
    }

    /// Records every call, and echo binary parameters back as a single row.
    #[derive(Default)]
    struct Echo {
        calls: Vec<Call>,
        fail: Option<&'static str>,
        conninfo: Option<CString>,
    }

    impl Echo {
        fn record(&mut self, target: &CStr, params: Option<&Marshaled<'_>>, format: PgFormat) -> Result<Table> {
            assert_eq!(format, PgFormat::Binary);
            let raw = RawParams::new(params);
            let mut call = Call {
                target: target.to_str().unwrap().to_owned(),
                no_params: raw.is_none(),
                ..Default::default()
            };
            let mut row = vec![];
            if let Some(m) = params {
                call.lengths = m.lengths().to_vec();
                call.formats = m.formats().to_vec();
                for (i, &ptr) in m.values().iter().enumerate() {
                    // read through the raw pointer, as a C client library would
                    let bytes = match m.formats()[i] {
                        0 => unsafe { CStr::from_ptr(ptr) }.to_bytes().to_vec(),
                        _ => unsafe {
                            std::slice::from_raw_parts(ptr.cast::<u8>(), m.lengths()[i] as usize)
                        }.to_vec(),
                    };
                    row.push(Some(bytes.clone()));
                    call.values.push(bytes);
                }
            }
            self.calls.push(call);

            Ok(match self.fail {
                Some(message) => Table {
                    status: ExecStatus::FatalError,
                    message: Some(message.to_owned()),
                    columns: 0,
                    rows: vec![],
                },
                None if row.is_empty() => Table {
                    status: ExecStatus::CommandOk,
                    message: None,
                    columns: 0,
                    rows: vec![],
                },
                None => Table::ok(row.len(), vec![row]),
            })
        }
    }

    impl Execute for Echo {
        type Result = Table;

        fn exec_params(&mut self, sql: &CStr, params: Option<&Marshaled<'_>>, format: PgFormat) -> Result<Table> {
            self.record(sql, params, format)
        }

        fn exec_prepared(&mut self, name: &CStr, params: Option<&Marshaled<'_>>, format: PgFormat) -> Result<Table> {
            self.record(name, params, format)
        }

        fn prepare(&mut self, name: &CStr, sql: &CStr) -> Result<Table> {
            self.calls.push(Call {
                target: format!("{}={}", name.to_str().unwrap(), sql.to_str().unwrap()),
                no_params: true,
                ..Default::default()
            });
            Ok(match self.fail {
                Some(message) => Table {
                    status: ExecStatus::FatalError,
                    message: Some(message.to_owned()),
                    columns: 0,
                    rows: vec![],
                },
                None => Table { status: ExecStatus::CommandOk, message: None, columns: 0, rows: vec![] },
            })
        }
    }

    impl Connect for Echo {
        fn connect(conninfo: &CStr) -> Result<Self> {
            if conninfo.to_bytes().is_empty() {
                return Err(Error::collaborator("empty conninfo"));
            }
            Ok(Echo { conninfo: Some(conninfo.to_owned()), ..Default::default() })
        }
    }

    #[test]
    fn execute_without_params() {
        let mut client = Client::new(Echo::default());
        let result = client.execute(c"SELECT 1", ()).unwrap();
        assert_eq!(result.status, ExecStatus::CommandOk);

        let call = &client.get_ref().calls[0];
        assert_eq!(call.target, "SELECT 1");
        assert!(call.no_params);
        assert!(call.lengths.is_empty());
    }

    #[test]
    fn borrowed_session() {
        let mut echo = Echo::default();
        Client::new(&mut echo).execute(c"SELECT $1", (c"x",)).unwrap();
        assert_eq!(echo.calls[0].formats, [0]);
        assert_eq!(echo.calls[0].values[0], b"x");
    }

    #[test]
    fn execute_roundtrip() {
        let mut client = Client::new(Echo::default());
        let name = CString::new("deez").unwrap();
        let result = client
            .execute(c"SELECT $1,$2,$3,$4,$5", (0x1234u16, -7i64, 1.25f32, &name, u64::MAX))
            .unwrap();

        let call = &client.get_ref().calls[0];
        assert!(!call.no_params);
        assert_eq!(call.formats, [1, 1, 1, 0, 1]);
        assert_eq!(call.lengths, [2, 8, 4, 0, 8]);
        assert_eq!(call.values[0], [0x12, 0x34]);
        assert_eq!(call.values[3], b"deez");

        let row = result.row(0).unwrap();
        let (a, b, c, d, e) = row.decode::<(u16, i64, f32, &CStr, u64)>().unwrap();
        assert_eq!(a, 0x1234);
        assert_eq!(b, -7);
        assert_eq!(c, 1.25);
        assert_eq!(d, c"deez");
        assert_eq!(e, u64::MAX);
    }

    #[test]
    fn execute_array() {
        let mut client = Client::new(Echo::default());
        let ids = vec![1i64, 2, 3];
        let result = client.execute(c"SELECT $1", (&ids,)).unwrap();

        let call = &client.get_mut().calls[0];
        assert_eq!(call.formats, [1]);
        assert_eq!(call.lengths, [(HEADER_SIZE + 3 * 12) as c_int]);

        let raw = result.row(0).unwrap().try_get::<&[u8]>(0).unwrap();
        assert_eq!(i32::read_network(&raw[12..16]).unwrap(), 3);
        assert_eq!(i64::read_network(&raw[HEADER_SIZE + 4..HEADER_SIZE + 12]).unwrap(), 1);
    }

    #[test]
    fn empty_array_is_a_parameter() {
        let mut client = Client::new(Echo::default());
        let ids: Vec<i64> = vec![];
        client.execute(c"SELECT $1", (ids,)).unwrap();
        client.execute(c"SELECT 1", ()).unwrap();

        let calls = &client.into_inner().calls;
        assert!(!calls[0].no_params);
        assert_eq!(calls[0].lengths, [HEADER_SIZE as c_int]);
        assert!(calls[1].no_params);
    }

    #[test]
    fn prepared_statement() {
        let mut client = Client::new(Echo::default());
        client.prepare(c"find", c"SELECT $1").unwrap();
        let result = client.execute_prepared(c"find", (42i32,)).unwrap();

        let calls = &client.get_ref().calls;
        assert_eq!(calls[0].target, "find=SELECT $1");
        assert_eq!(calls[1].target, "find");
        assert_eq!(result.row(0).unwrap().try_get::<i32>(0).unwrap(), 42);
    }

    #[test]
    fn failed_status_is_error() {
        let mut client = Client::new(Echo { fail: Some("relation \"t\" does not exist\n"), ..Default::default() });
        let err = client.execute(c"SELECT * FROM t", (1i32,)).unwrap_err();
        match err.kind() {
            ErrorKind::Database(db) => {
                assert_eq!(db.status(), ExecStatus::FatalError);
                assert_eq!(db.message(), "relation \"t\" does not exist");
            },
            _ => panic!("unexpected error kind {err:?}"),
        }

        let err = client.prepare(c"p", c"SELECT * FROM t").unwrap_err();
        assert!(err.to_string().starts_with("failed to prepare \"p\": query failed: fatal error"));
    }

    #[test]
    fn connect_with_config() {
        let config = Config::parse("postgres://u:p@db:5433/app").unwrap();
        let client = Client::<Echo>::connect(&config).unwrap();
        assert_eq!(
            client.get_ref().conninfo.as_deref(),
            Some(c"host=db port=5433 user=u password=p dbname=app")
        );
    }
}

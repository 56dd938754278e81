//! Postgres binary parameter codec.
//!
//! Encode typed rust values into the exact bytes, length and format code the
//! extended query protocol expects for bound parameters, and decode binary
//! result columns back.
//!
//! The session itself is provided by an external client library through the
//! [`Execute`][executor::Execute] trait.
//!
//! # Examples
//!
//! Marshal parameters:
//!
//! ```
//! use ppq::{Params, ToParams};
//!
//! let ids = [1i64, 2, 3];
//! let params = (0x1234u16, c"name", &ids[..]).to_params();
//! let marshaled = params.marshal().unwrap();
//!
//! assert_eq!(marshaled.formats(), &[1, 0, 1]);
//! assert_eq!(marshaled.lengths(), &[2, 0, 20 + 3 * 12]);
//!
//! // empty parameter list is forwarded as "no parameters"
//! assert!(Params::new().marshal().is_none());
//! ```
//!
//! Execute with a collaborator:
//!
//! ```no_run
//! use ppq::{Client, Config, ResultSetExt, executor::Connect};
//!
//! # fn app<E: Connect>() -> ppq::Result<()> {
//! let mut client = Client::<E>::connect(&Config::from_env())?;
//!
//! client.prepare(c"by_id", c"SELECT id, score FROM t WHERE id = $1")?;
//! let result = client.execute_prepared(c"by_id", (420i64,))?;
//!
//! for row in result.iter() {
//!     let (id, score) = row.decode::<(i64, f64)>()?;
//!     assert_eq!(id, 420);
//! }
//! # Ok(())
//! # }
//! ```

mod common;
mod ext;

// Protocol
pub mod postgres;

// Codec
pub mod swap;
pub mod network;
mod value;
pub mod encode;
pub mod array;
pub mod params;
pub mod row;

// Operation
pub mod executor;
pub mod client;

// Connection
pub mod connection;

mod error;


pub use encode::{Encode, Encoded};
pub use params::{Marshaled, Params, RawParams, ToParams};
pub use row::{Decode, DecodeError, FromRow, ResultSetExt, Row, Rows};

pub use executor::{Connect, ExecStatus, Execute, ResultSet};
pub use client::Client;
pub use connection::Config;
pub use error::{BoxError, Error, ErrorKind, Result};

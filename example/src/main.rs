use tracing::{info, trace_span};
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use ppq::{Client, Config, ResultSet, ResultSetExt, Result};

mod echo;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::Registry::default()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::from_env();
    let mut client = Client::<echo::Echo>::connect(&config)?;

    let _s = trace_span!("echo").entered();

    let result = client.execute(c"SELECT $1, $2, $3, $4", (420i32, -1.5f64, c"Deez", u16::MAX))?;

    for row in result.iter() {
        let (id, score, name, port) = row.decode::<(i32, f64, &std::ffi::CStr, u16)>()?;
        info!(id, score, ?name, port, "decoded row");
    }

    let ids = vec![1i64, 2, 3];
    let result = client.execute(c"SELECT $1", (&ids,))?;
    let array = result.row(0).and_then(|row| row.try_get::<&[u8]>(0).ok()).unwrap_or_default();
    info!(len = array.len(), "encoded int8 array");

    client.prepare(c"by_id", c"SELECT $1")?;
    let result = client.execute_prepared(c"by_id", (7u64,))?;
    let id = result.row(0).map(|row| row.try_get::<u64>(0)).transpose()?;
    info!(?id, "prepared statement");

    let result = client.execute(c"SELECT 1", ())?;
    info!(rows = result.rows(), status = %result.status(), "no parameters");

    Ok(())
}

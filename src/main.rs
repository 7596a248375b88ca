use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use campaigns_server::{run, Config, Error};

#[actix_web::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_span_events(FmtSpan::NEW)
        .compact()
        .init();

    run(Config::from_env()).await
}

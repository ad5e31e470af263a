use tokio::net::TcpListener;
use tourism_analytics::{build_app, cli, config::Config, db};

const USAGE: &str = "usage: tourism-analytics [import <file>]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let pool = db::init_pool(&config.database_url).await?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {}
        [command, path] if command == "import" => {
            let summary = cli::import_data(&pool, path).await?;
            println!(
                "Imported {} tourists, {} destinations, {} visits",
                summary.tourists, summary.destinations, summary.visits
            );
            return Ok(());
        }
        _ => return Err(USAGE.into()),
    }

    let app = build_app(pool, config.secure_cookies).await?;

    let addr = config.addr();
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

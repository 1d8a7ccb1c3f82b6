use sqlx::SqlitePool;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use wedding_desk::{cli, config::Config, db};

const USAGE: &str = "usage: wedding-desk [serve | import <file> | analytics]";

async fn serve(pool: SqlitePool, addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    let app = wedding_desk::build_app(pool);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let pool = db::init_pool(&config.database_url).await?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        [] | ["serve"] => serve(pool, config.bind_addr).await?,
        ["import", path] => cli::import_parties(&pool, path).await?,
        ["analytics"] => cli::print_analytics(&pool).await?,
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}

use std::io::{self, Write};

use clap::Parser;
use watchlist::{
    AppState,
    cli::{self, Cli, Command},
    config::Config,
    db,
    store::Store,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,watchlist=debug,sqlx=warn".to_string()),
        )
        .init();

    let args = Cli::parse();
    let config = Config::from_env()?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Initdb { drop } => {
            let store = Store::new(db::connect(&config.database_url).await?);
            cli::initdb(&store, drop, &mut io::stdout()).await
        },
        Command::Forge => {
            let store = Store::new(db::connect(&config.database_url).await?);
            cli::forge(&store, &mut io::stdout()).await
        },
        Command::Admin { username, password } => {
            let mut stdin = io::stdin().lock();
            let mut stdout = io::stdout();

            let username = match username {
                Some(u) => u,
                None => cli::prompt("Username", &mut stdin, &mut stdout)?,
            };
            let password = match password {
                Some(p) => p,
                None => cli::prompt_hidden_password(&mut stdout)?,
            };
            stdout.flush()?;

            let store = Store::new(db::connect(&config.database_url).await?);
            cli::admin(&store, &username, &password, &mut stdout).await
        },
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = config.addr;
    let db = db::connect_and_migrate(&config.database_url).await?;
    let state = AppState::new(config, db)?;

    if state.store.count_users().await? == 0 {
        tracing::warn!("no admin account yet; create one with `watchlist admin`");
    }

    let app = watchlist::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

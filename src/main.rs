use clap::Parser;
use tutor_proxy::{app, cli, config, paths};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = cli::Args::parse();

    let config_path = match args.config.clone() {
        Some(p) => p,
        None => paths::default_config_path()?,
    };
    let cfg = config::Config::load_optional(&config_path)?.unwrap_or_default();
    tracing::debug!(?config_path, ?cfg.bind, ?cfg.timeout_secs, "resolved config");

    let http = app::build_http(&cfg)?;
    let state = app::build_state(&http, &cfg)?;

    match args.cmd {
        Some(cli::Command::Status { provider }) => app::cmd_status(&state, provider).await,
        Some(cli::Command::Ask { message }) => app::cmd_ask(&state, message.join(" ")).await,
        Some(cli::Command::Serve) | None => {
            let addr = args.bind.unwrap_or_else(|| cfg.bind_addr());
            app::cmd_serve(state, addr, &cfg).await
        }
    }
}

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Drivers must be registered before any database is configured.
    memdb::register();

    let args = server::Args::parse_args();
    if let Err(err) = server::serve(args.config()).await {
        tracing::error!(%err, "server exited");
        std::process::exit(1);
    }
}

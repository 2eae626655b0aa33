use clap::Parser;
use tokengate::cli::{Args, build_config, init_logging, load_token_secret};
use tokengate::run_server;
use tracing::{error, info};

fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    // Read before the runtime exists: loading clears the environment variable.
    let Some(token_secret) = load_token_secret(args.token_secret_file.as_deref()) else {
        std::process::exit(1);
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            error!(error = %e, "Failed to start async runtime");
            std::process::exit(1);
        });

    runtime.block_on(serve(args.port, token_secret));
}

async fn serve(port: u16, token_secret: String) {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    match listener.local_addr() {
        Ok(local_addr) => info!(address = %local_addr, "Listening"),
        Err(e) => info!(address = %addr, error = %e, "Listening"),
    }

    let config = build_config(token_secret);
    if let Err(e) = run_server(config, listener).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

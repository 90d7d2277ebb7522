use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use labhook::config::Config;
use labhook::platform::client::HttpNotifier;
use labhook::{create_app, AppState, VERSION};

fn print_banner(addr: &SocketAddr) {
    let ip = addr.ip().to_string();
    let display_host = if addr.ip().is_unspecified() {
        "localhost"
    } else {
        ip.as_str()
    };
    println!();
    println!("  \x1b[36m╔══════════════════════════════════════════╗\x1b[0m");
    println!("  \x1b[36m║\x1b[0m  \x1b[1;35m⚡ labhook\x1b[0m                              \x1b[36m║\x1b[0m");
    println!("  \x1b[36m║\x1b[0m  \x1b[90mGitLab → WeCom / Feishu\x1b[0m                 \x1b[36m║\x1b[0m");
    println!("  \x1b[36m╚══════════════════════════════════════════╝\x1b[0m");
    println!();
    println!(
        "  \x1b[32m→\x1b[0m Server running at \x1b[1;4mhttp://{}:{}\x1b[0m",
        display_host,
        addr.port()
    );
    println!("  \x1b[32m→\x1b[0m Version: \x1b[33m{}\x1b[0m", VERSION);
    println!();
    println!("  \x1b[90mEndpoints:\x1b[0m");
    println!("    \x1b[32mGET \x1b[0m /                  \x1b[90m← Banner\x1b[0m");
    println!("    \x1b[32mGET \x1b[0m /health             \x1b[90m← JSON status\x1b[0m");
    println!("    \x1b[34mPOST\x1b[0m /                  \x1b[90m← GitLab events (WEBHOOK_URL)\x1b[0m");
    println!("    \x1b[34mPOST\x1b[0m /{{path}}            \x1b[90m← GitLab events (WEBHOOK_URL_<PATH>)\x1b[0m");
    println!();
    println!("  \x1b[90mPress Ctrl+C to stop\x1b[0m");
    println!();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    let notifier = HttpNotifier::new(config.delivery_timeout)?;

    let state = AppState {
        config: config.clone(),
        notifier: Arc::new(notifier),
    };

    let app = create_app(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    print_banner(&addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Board Game Market 服务入口
//!
//! Usage:
//! - Normal mode: `boardgame-market`
//! - With custom port: `boardgame-market --port 8080`

use boardgame_market::RuntimeConfig;

/// 解析命令行参数
fn parse_args() -> RuntimeConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = RuntimeConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" if i + 1 < args.len() => {
                config.port_override = args[i + 1].parse().ok();
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    config
}

fn print_help() {
    println!("Board Game Market - 桌游交易市场服务");
    println!();
    println!("USAGE:");
    println!("    boardgame-market [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --port <PORT>    Override the listening port");
    println!("    -h, --help       Print help information");
    println!();
    println!("ENVIRONMENT:");
    println!("    CRON_SECRET, PUBLIC_DATA_URL, PUBLIC_DATA_ANON_KEY, SERVICE_ROLE_KEY,");
    println!("    APP_ENV, APP_VERSION, PORT, BIND_ADDR, RUST_LOG");
}

#[tokio::main]
async fn main() {
    let config = parse_args();
    boardgame_market::init_tracing();

    if let Err(e) = boardgame_market::run_with_config(config).await {
        tracing::error!(error = %e, "Server exited with error");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

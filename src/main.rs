use clap::Parser;

/// Telegram bot answering Phigros song and chart queries.
#[derive(Parser)]
#[command(name = "phigros-bot", version, about)]
struct Args {
    /// Telegram bot access token.
    token: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    phigros_bot::run(&args.token).await
}

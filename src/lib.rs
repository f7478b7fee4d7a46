use std::sync::Arc;

use bot::Bot;
use tracing_subscriber::fmt::time::ChronoLocal;

mod bot;
mod catalog;
mod cmd;
mod fuzzy;

pub use catalog::{Catalog, Chart, Context, Lookup, Song, Tips};
pub use fuzzy::token_sort_ratio;

pub async fn run(token: &str) -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_timer(ChronoLocal::rfc_3339()).with_max_level(tracing::Level::INFO).init();

    let ctx = Arc::new(Context::load()?);

    let bot = Bot::new(token, ctx);
    bot.run_active().await
}

use std::sync::Arc;

use md5::{Digest, Md5};
use teloxide::{
    dispatching::UpdateFilterExt,
    payloads,
    prelude::*,
    requests::JsonRequest,
    types::{
        InlineQuery, InlineQueryResult, InlineQueryResultArticle, InputMessageContent,
        InputMessageContentText, Me, Message, ReplyParameters,
    },
    utils::command::BotCommands,
};
use url::Url;

use crate::{
    catalog::{Context, Lookup, Song},
    cmd::Command,
};

const WELCOME: &str = "Hi!\n欢迎使用该 Bot! 请使用 inline 调用。\n";

#[derive(Clone)]
pub struct Bot {
    bot: teloxide::Bot,
    ctx: Arc<Context>,
}

type SendMessage = JsonRequest<payloads::SendMessage>;

impl Bot {
    pub fn new(token: &str, ctx: Arc<Context>) -> Self {
        let http_client = reqwest::Client::builder()
            .https_only(true)
            .http2_adaptive_window(true)
            .build()
            .expect("failed to build http client");

        let bot = teloxide::Bot::with_client(token, http_client);

        Self { bot, ctx }
    }

    pub async fn run_active(&self) -> anyhow::Result<()> {
        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint({
                let bot = self.clone();

                move |_: teloxide::Bot, msg: Message, me: Me| {
                    let bot = bot.clone();

                    async move { bot.handle_message(msg, me).await }
                }
            }))
            .branch(Update::filter_inline_query().endpoint({
                let bot = self.clone();

                move |_: teloxide::Bot, query: InlineQuery| {
                    let bot = bot.clone();

                    async move { bot.handle_inline_query(query).await }
                }
            }));

        tracing::info!("Bot is running...");

        Dispatcher::builder(self.bot.clone(), handler)
            .build()
            .dispatch()
            .await;

        Err(anyhow::anyhow!("Bot is stopped"))
    }

    fn reply<T>(&self, msg: &Message, text: T) -> SendMessage
    where
        T: Into<String>,
    {
        self.bot
            .send_message(msg.chat.id, text)
            .reply_parameters(ReplyParameters::new(msg.id))
    }

    async fn handle_message(&self, msg: Message, me: Me) -> anyhow::Result<()> {
        tracing::debug!("Received message: {:?}", msg);

        // Non-command messages and unknown commands are ignored.
        let Some(cmd) = msg
            .text()
            .and_then(|text| Command::parse(text, me.username()).ok())
        else {
            return Ok(());
        };

        match cmd {
            Command::Start | Command::Help => self.send_welcome(msg).await,
            Command::Random => self.send_random_song(msg).await,
            Command::Tip => self.send_random_tip(msg).await,
        }
    }

    async fn send_welcome(&self, msg: Message) -> anyhow::Result<()> {
        self.reply(&msg, WELCOME).send().await?;
        Ok(())
    }

    async fn send_random_song(&self, msg: Message) -> anyhow::Result<()> {
        let Some((_, song)) = self.ctx.catalog.random_song() else {
            return Ok(());
        };

        self.reply(&msg, song.full_info()).send().await?;
        Ok(())
    }

    async fn send_random_tip(&self, msg: Message) -> anyhow::Result<()> {
        let Some(tip) = self.ctx.tips.random_tip() else {
            return Ok(());
        };

        self.reply(&msg, tip).send().await?;
        Ok(())
    }

    async fn handle_inline_query(&self, query: InlineQuery) -> anyhow::Result<()> {
        let results = match self.ctx.catalog.lookup(&query.query) {
            Lookup::Found { name, song, score } => {
                tracing::debug!("inline query {:?} matched {:?} ({})", query.query, name, score);
                song_articles(name, song)
            }
            Lookup::NotFound { score } => vec![not_found_article(&query.query, score)],
        };

        self.bot
            .answer_inline_query(query.id, results)
            .cache_time(1)
            .send()
            .await?;

        Ok(())
    }
}

/// One selectable article per chart difficulty of the matched song. The
/// song illustration becomes the thumbnail when it parses as a URL.
fn song_articles(name: &str, song: &Song) -> Vec<InlineQueryResult> {
    let basic_info = song.basic_info();

    song.chart
        .iter()
        .map(|(difficulty, chart)| {
            let content = format!(
                "{basic_info}\n\n选择的难度：{difficulty}\n{}",
                chart.info()
            );

            let mut article = InlineQueryResultArticle::new(
                result_id(difficulty),
                format!("{name} - {difficulty}"),
                InputMessageContent::Text(InputMessageContentText::new(content)),
            );

            if let Ok(url) = Url::parse(&song.illustration) {
                article = article.thumbnail_url(url);
            }

            InlineQueryResult::Article(article)
        })
        .collect()
}

fn not_found_article(query: &str, score: u8) -> InlineQueryResult {
    let content = format!("输入的文本：{query}\n解析的歌曲：未找到\n匹配率：{score}");

    InlineQueryResult::Article(InlineQueryResultArticle::new(
        result_id(query),
        "未找到",
        InputMessageContent::Text(InputMessageContentText::new(content)),
    ))
}

fn result_id(text: &str) -> String {
    format!("{:x}", Md5::digest(text.as_bytes()))
}

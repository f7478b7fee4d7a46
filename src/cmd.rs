use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "开始使用")]
    Start,
    #[command(description = "查看帮助")]
    Help,
    #[command(description = "随机一首歌曲")]
    Random,
    #[command(description = "随机一条 Tip")]
    Tip,
}

use crate::CommandMeta;
use crate::leveling::embeds::usage_message;
use xp_core::{Context, Error};
use xp_database::impls::formula::xp_for_input;
use xp_utils::formatting::format_xp;

pub const META: CommandMeta = CommandMeta {
    name: "xpfor",
    desc: "XP threshold for reaching a level.",
    category: "leveling",
    usage: "!xpfor <level>",
};

#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn xpfor(
    ctx: Context<'_>,
    #[description = "Target level"] level: Option<String>,
) -> Result<(), Error> {
    let Some(level) = level else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let reply = match xp_for_input(&level) {
        Ok(xp) => format!(
            "Reaching level **{}** takes **{}** XP.",
            level.trim(),
            format_xp(xp)
        ),
        Err(e) if e.is_argument_error() => format!("{e}\n{}", usage_message(META.usage)),
        Err(e) => return Err(e.into()),
    };

    ctx.say(reply).await?;
    Ok(())
}

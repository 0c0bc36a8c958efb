use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::leveling::embeds::{guild_only_message, rank_embed};
use crate::leveling::identity::display_name;
use xp_core::{Context, Error};
use xp_database::impls::accrual::now_unix_millis;
use xp_database::impls::formula::xp_to_next_level;

pub const META: CommandMeta = CommandMeta {
    name: "rank",
    desc: "Show level, XP progress and server rank.",
    category: "leveling",
    usage: "!rank [user]",
};

#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn rank(
    ctx: Context<'_>,
    #[description = "Member to look up"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let target = user.as_ref().unwrap_or_else(|| ctx.author());
    let name = display_name(target);

    let leveling = &ctx.data().leveling;
    let Some(standing) = leveling.fetch(guild_id.get(), target.id.get(), true).await? else {
        ctx.say(format!("**{}** has not earned any XP yet.", name))
            .await?;
        return Ok(());
    };

    let next_level_xp = xp_to_next_level(standing.record.level)?;
    let cooldown_secs = leveling
        .policy()
        .cooldown_remaining(&standing.record, now_unix_millis())
        .div_ceil(1_000);

    let avatar = target.face();
    let embed = rank_embed(&name, Some(avatar.as_str()), &standing, next_level_xp, cooldown_secs);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

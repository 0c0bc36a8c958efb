use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::info;

use crate::CommandMeta;
use crate::leveling::embeds::{guild_only_message, usage_message};
use crate::leveling::identity::display_name;
use xp_core::{Context, Error};
use xp_utils::confirmation::{Confirmation, ConfirmationTexts, prompt_confirm_decline};
use xp_utils::embed::DEFAULT_EMBED_COLOR;
use xp_utils::formatting::format_xp;

pub const META: CommandMeta = CommandMeta {
    name: "resetxp",
    desc: "Delete a member's leveling record (requires Manage Server).",
    category: "leveling",
    usage: "!resetxp <user>",
};

const RESET_CONFIRM_TIMEOUT_SECS: u64 = 30;

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD",
    category = "Leveling"
)]
pub async fn resetxp(
    ctx: Context<'_>,
    #[description = "Member to reset"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let name = display_name(&user);
    let prompt = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .title("Reset XP?")
        .description(format!(
            "This permanently deletes the level and XP of <@{}>.",
            user.id.get()
        ));

    let confirmation = prompt_confirm_decline(
        ctx,
        prompt,
        Duration::from_secs(RESET_CONFIRM_TIMEOUT_SECS),
        ConfirmationTexts {
            timed_out: "Reset timed out.",
            declined: "Reset cancelled.",
            processing: "Resetting...",
        },
    )
    .await?;

    if confirmation != Confirmation::Confirmed {
        return Ok(());
    }

    let reply = match ctx
        .data()
        .leveling
        .delete_user(guild_id.get(), user.id.get())
        .await?
    {
        Some(previous) => {
            info!(
                guild_id = guild_id.get(),
                user_id = user.id.get(),
                moderator_id = ctx.author().id.get(),
                level = previous.level,
                total_xp = previous.total_xp,
                "leveling record reset"
            );
            format!(
                "Reset **{}** (was level {} with {} total XP).",
                name,
                previous.level,
                format_xp(previous.total_xp)
            )
        }
        None => format!("**{}** has no leveling record.", name),
    };

    ctx.say(reply).await?;
    Ok(())
}

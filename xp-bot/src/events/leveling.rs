use poise::serenity_prelude as serenity;
use tracing::{debug, error};

use xp_core::Data;

/// Grant message XP to the author and announce level-ups in the same channel.
pub async fn handle_message_xp(ctx: &serenity::Context, data: &Data, message: &serenity::Message) {
    if message.author.bot || message.webhook_id.is_some() {
        return;
    }

    let Some(guild_id) = message.guild_id else {
        return;
    };

    // Commands do not earn XP.
    if message.content.starts_with(xp_utils::COMMAND_PREFIX) {
        return;
    }

    let amount = data.message_xp.roll();
    let accrual = match data
        .leveling
        .accrue(guild_id.get(), message.author.id.get(), amount)
        .await
    {
        Ok(accrual) => accrual,
        Err(source) => {
            error!(
                ?source,
                guild_id = guild_id.get(),
                user_id = message.author.id.get(),
                "failed to accrue message xp"
            );
            return;
        }
    };

    debug!(
        guild_id = guild_id.get(),
        user_id = message.author.id.get(),
        amount,
        outcome = ?accrual.outcome,
        "message xp processed"
    );

    if !accrual.leveled_up() || !data.message_xp.announce_level_ups {
        return;
    }

    let announcement = format!(
        "GG <@{}>, you reached level **{}**!",
        message.author.id.get(),
        accrual.record.level
    );
    if let Err(source) = message.channel_id.say(&ctx.http, announcement).await {
        error!(?source, "failed to announce level-up");
    }
}

/// Give new members an empty record so they show up on the leaderboard.
pub async fn handle_member_join(data: &Data, member: &serenity::Member) {
    if member.user.bot {
        return;
    }

    match data
        .leveling
        .create_user(member.guild_id.get(), member.user.id.get())
        .await
    {
        Ok(Some(_)) => debug!(
            guild_id = member.guild_id.get(),
            user_id = member.user.id.get(),
            "created leveling record for new member"
        ),
        Ok(None) => {}
        Err(source) => error!(?source, "failed to create leveling record for new member"),
    }
}

use std::time::Duration;

use poise::serenity_prelude as serenity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
    TimedOut,
}

/// Ask the invoking author to confirm a destructive action.
///
/// The prompt message is rewritten to the matching status text once the
/// author answers or the timeout passes.
pub async fn prompt_confirm_decline<U, E>(
    ctx: poise::Context<'_, U, E>,
    embed: serenity::CreateEmbed,
    timeout: Duration,
    texts: ConfirmationTexts<'_>,
) -> Result<Confirmation, serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    let ctx_id = ctx.id();
    let confirm_id = format!("{ctx_id}_confirm");
    let decline_id = format!("{ctx_id}_decline");

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(embed)
                .components(vec![serenity::CreateActionRow::Buttons(vec![
                    serenity::CreateButton::new(&confirm_id)
                        .label("Confirm")
                        .style(serenity::ButtonStyle::Danger),
                    serenity::CreateButton::new(&decline_id)
                        .label("Decline")
                        .style(serenity::ButtonStyle::Secondary),
                ])]),
        )
        .await?;

    let message = reply.message().await?.into_owned();
    let Some(interaction) = message
        .await_component_interaction(ctx)
        .author_id(ctx.author().id)
        .timeout(timeout)
        .await
    else {
        message
            .channel_id
            .edit_message(
                ctx.http(),
                message.id,
                serenity::EditMessage::new()
                    .content(texts.timed_out)
                    .embeds(vec![])
                    .components(vec![]),
            )
            .await?;
        return Ok(Confirmation::TimedOut);
    };

    let (outcome, text) = if interaction.data.custom_id == decline_id {
        (Confirmation::Declined, texts.declined)
    } else {
        (Confirmation::Confirmed, texts.processing)
    };

    interaction
        .create_response(
            ctx.http(),
            serenity::CreateInteractionResponse::UpdateMessage(
                serenity::CreateInteractionResponseMessage::new()
                    .content(text)
                    .embeds(vec![])
                    .components(vec![]),
            ),
        )
        .await?;

    Ok(outcome)
}

/// Status lines written over the prompt.
#[derive(Clone, Copy, Debug)]
pub struct ConfirmationTexts<'a> {
    pub timed_out: &'a str,
    pub declined: &'a str,
    pub processing: &'a str,
}

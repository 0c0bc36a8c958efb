use std::time::Duration;

use poise::serenity_prelude as serenity;

use crate::embed::build_page_embed;

pub const PAGINATION_TIMEOUT_SECS: u64 = 60 * 3;

fn page_buttons(
    prev_id: &str,
    next_id: &str,
    current_page: usize,
    total_pages: usize,
) -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(prev_id)
            .label("Prev")
            .disabled(current_page == 0)
            .style(serenity::ButtonStyle::Secondary),
        serenity::CreateButton::new(next_id)
            .label("Next")
            .disabled(current_page + 1 >= total_pages)
            .style(serenity::ButtonStyle::Secondary),
    ])]
}

/// Send `pages` as one embed with Prev/Next buttons for the invoking author.
///
/// Buttons are removed once nobody has pressed one for
/// [`PAGINATION_TIMEOUT_SECS`].
pub async fn paginate_embed_pages<U, E>(
    ctx: poise::Context<'_, U, E>,
    title: &str,
    pages: &[String],
    start_page: usize,
    footer_note: Option<&str>,
) -> Result<(), serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    if pages.is_empty() {
        return Ok(());
    }

    let total_pages = pages.len();
    let mut current_page = start_page.clamp(1, total_pages) - 1;
    let render = |page: usize| {
        build_page_embed(title, &pages[page], page + 1, total_pages, footer_note)
    };

    if total_pages == 1 {
        ctx.send(poise::CreateReply::default().embed(render(current_page)))
            .await?;
        return Ok(());
    }

    let ctx_id = ctx.id();
    let prev_id = format!("{ctx_id}_prev");
    let next_id = format!("{ctx_id}_next");

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(render(current_page))
                .components(page_buttons(&prev_id, &next_id, current_page, total_pages)),
        )
        .await?;
    let message = reply.message().await?.into_owned();

    while let Some(press) = message
        .await_component_interaction(ctx)
        .author_id(ctx.author().id)
        .timeout(Duration::from_secs(PAGINATION_TIMEOUT_SECS))
        .await
    {
        if press.data.custom_id == next_id {
            current_page = (current_page + 1).min(total_pages - 1);
        } else if press.data.custom_id == prev_id {
            current_page = current_page.saturating_sub(1);
        } else {
            continue;
        }

        press
            .create_response(
                ctx.http(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .embed(render(current_page))
                        .components(page_buttons(&prev_id, &next_id, current_page, total_pages)),
                ),
            )
            .await?;
    }

    let _ = message
        .channel_id
        .edit_message(
            ctx.http(),
            message.id,
            serenity::EditMessage::new()
                .embed(render(current_page))
                .components(vec![]),
        )
        .await;

    Ok(())
}

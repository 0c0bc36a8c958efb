use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0xE0_8A_2C;

/// Embed for one page of a multi-page listing.
pub fn build_page_embed(
    title: &str,
    description: &str,
    page: usize,
    total_pages: usize,
    footer_note: Option<&str>,
) -> serenity::CreateEmbed {
    let mut footer = if total_pages > 1 {
        format!("Page {}/{}", page.max(1), total_pages)
    } else {
        String::new()
    };

    if let Some(note) = footer_note.filter(|note| !note.is_empty()) {
        if !footer.is_empty() {
            footer.push_str(" • ");
        }
        footer.push_str(note);
    }

    let embed = serenity::CreateEmbed::new()
        .title(title.to_owned())
        .color(DEFAULT_EMBED_COLOR)
        .description(description.to_owned());

    if footer.is_empty() {
        embed
    } else {
        embed.footer(serenity::CreateEmbedFooter::new(footer))
    }
}

/// Split `total_items` into pages and return the `[start, end)` window of `page`.
pub fn page_window(total_items: usize, per_page: usize, page: usize) -> (usize, usize) {
    let per_page = per_page.max(1);
    let start = (page.max(1) - 1).saturating_mul(per_page).min(total_items);
    let end = (start + per_page).min(total_items);
    (start, end)
}

pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    total_items.div_ceil(per_page.max(1)).max(1)
}

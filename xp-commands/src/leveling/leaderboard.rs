use crate::CommandMeta;
use crate::leveling::embeds::{guild_only_message, leaderboard_page};
use crate::leveling::identity::DiscordIdentity;
use xp_core::{Context, Error};
use xp_utils::embed::{page_window, total_pages};
use xp_utils::leaderboard::{ResolveMode, compute_leaderboard};
use xp_utils::pagination::paginate_embed_pages;

pub const META: CommandMeta = CommandMeta {
    name: "leaderboard",
    desc: "Top members of this server by total XP.",
    category: "leveling",
    usage: "!leaderboard [page] [cached]",
};

const LEADERBOARD_LIMIT: usize = 50;
const ENTRIES_PER_PAGE: usize = 10;

#[poise::command(
    prefix_command,
    slash_command,
    aliases("lb", "top"),
    category = "Leveling"
)]
pub async fn leaderboard(
    ctx: Context<'_>,
    #[description = "Page number, add `cached` to skip name lookups"]
    #[rest]
    query: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let (page, mode) = parse_query(query.as_deref());
    let records = ctx
        .data()
        .leveling
        .fetch_leaderboard(guild_id.get(), LEADERBOARD_LIMIT)
        .await?;

    if records.is_empty() {
        ctx.say("Nobody has earned XP in this server yet.").await?;
        return Ok(());
    }

    let total = total_pages(records.len(), ENTRIES_PER_PAGE);
    if page > total {
        ctx.say(format!(
            "Page {} does not exist. Available pages: 1-{}.",
            page, total
        ))
        .await?;
        return Ok(());
    }

    if mode == ResolveMode::ResolveAll {
        ctx.defer().await?;
    }

    let identity = DiscordIdentity::new(ctx.serenity_context(), ctx.data().db.cache().clone());
    let entries = compute_leaderboard(&identity, &records, mode).await;

    let pages = (1..=total)
        .map(|current| {
            let (start, end) = page_window(entries.len(), ENTRIES_PER_PAGE, current);
            leaderboard_page(&entries[start..end], mode)
        })
        .collect::<Vec<_>>();

    let footer = match mode {
        ResolveMode::ResolveAll => None,
        ResolveMode::CacheOnly => Some("cached names"),
    };
    paginate_embed_pages(ctx, "Leaderboard", &pages, page, footer).await?;
    Ok(())
}

/// Read `[page] [cached]` in either order; unknown tokens are ignored.
fn parse_query(query: Option<&str>) -> (usize, ResolveMode) {
    let mut page = 1;
    let mut mode = ResolveMode::ResolveAll;

    for token in query.unwrap_or_default().split_whitespace() {
        if token.eq_ignore_ascii_case("cached") || token.eq_ignore_ascii_case("fast") {
            mode = ResolveMode::CacheOnly;
        } else if let Some(requested) = token.parse::<usize>().ok().filter(|value| *value >= 1) {
            page = requested;
        }
    }

    (page, mode)
}

#[cfg(test)]
mod tests {
    use xp_utils::leaderboard::ResolveMode;

    use super::parse_query;

    #[test]
    fn defaults_to_first_page_with_live_names() {
        assert_eq!(parse_query(None), (1, ResolveMode::ResolveAll));
        assert_eq!(parse_query(Some("0")), (1, ResolveMode::ResolveAll));
    }

    #[test]
    fn reads_page_and_mode_in_any_order() {
        assert_eq!(parse_query(Some("3")), (3, ResolveMode::ResolveAll));
        assert_eq!(parse_query(Some("cached 2")), (2, ResolveMode::CacheOnly));
        assert_eq!(parse_query(Some("2 FAST")), (2, ResolveMode::CacheOnly));
    }
}

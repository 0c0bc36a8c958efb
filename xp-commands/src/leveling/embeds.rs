use poise::serenity_prelude as serenity;

use xp_database::model::leveling::LevelStanding;
use xp_utils::embed::DEFAULT_EMBED_COLOR;
use xp_utils::formatting::{
    NameLayout, format_compact_duration, format_leaderboard_name, format_progress_bar, format_xp,
};
use xp_utils::leaderboard::{LeaderboardEntry, ResolveMode};

const PROGRESS_SLOTS: usize = 20;

pub fn guild_only_message() -> &'static str {
    "This command only works in servers."
}

pub fn usage_message(usage: &str) -> String {
    format!("Usage: `{}`", usage)
}

pub fn rank_embed(
    display_name: &str,
    avatar_url: Option<&str>,
    standing: &LevelStanding,
    next_level_xp: u64,
    cooldown_remaining_secs: u64,
) -> serenity::CreateEmbed {
    let record = &standing.record;
    let position = standing
        .position
        .map_or_else(|| "unranked".to_owned(), |position| format!("#{position}"));

    let mut description = format!(
        "**Level :** {}\n**Rank :** {}\n**Progress :** {} / {} XP\n`{}`\n**Total XP :** {}",
        record.level,
        position,
        format_xp(record.xp),
        format_xp(next_level_xp),
        format_progress_bar(record.xp, next_level_xp, PROGRESS_SLOTS),
        format_xp(record.total_xp),
    );
    if cooldown_remaining_secs > 0 {
        description.push_str(&format!(
            "\n**Next XP in :** {}",
            format_compact_duration(cooldown_remaining_secs)
        ));
    }

    let title = format!("{display_name}'s rank");
    let embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .description(description);

    match avatar_url {
        Some(url) => embed.author(serenity::CreateEmbedAuthor::new(title).icon_url(url)),
        None => embed.title(title),
    }
}

/// Page body for a slice of leaderboard entries.
///
/// Resolved boards use a monospace block with padded names; cache-only
/// boards list bold names since many of them may be placeholders.
pub fn leaderboard_page(entries: &[LeaderboardEntry], mode: ResolveMode) -> String {
    match mode {
        ResolveMode::ResolveAll => {
            let rows = entries
                .iter()
                .map(|entry| {
                    let name = format_leaderboard_name(
                        &entry.username.replace('`', "'"),
                        entry.position,
                        NameLayout::default(),
                    );
                    format!(
                        "{}{:>2}. Lvl {:>3}  {} XP",
                        name,
                        entry.position,
                        entry.level,
                        format_xp(entry.total_xp)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("```\n{rows}\n```")
        }
        ResolveMode::CacheOnly => entries
            .iter()
            .map(|entry| {
                format!(
                    "`#{}` **{}** • Level {} • {} XP",
                    entry.position,
                    entry.username.replace('*', "\\*"),
                    entry.level,
                    format_xp(entry.total_xp)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

use xp_core::{Context, Error};
use xp_utils::embed::DEFAULT_EMBED_COLOR;

use crate::{COMMANDS, CommandMeta};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help [category]",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Only show this category"] category: Option<String>,
) -> Result<(), Error> {
    let wanted = category.as_deref().map(str::trim).map(str::to_ascii_lowercase);

    let Some(description) = help_description(COMMANDS, wanted.as_deref()) else {
        ctx.say(format!(
            "Unknown category: {}\nValid categories: {}",
            wanted.as_deref().map(display_category).unwrap_or_default(),
            categories(COMMANDS)
                .iter()
                .map(|name| display_category(name))
                .collect::<Vec<_>>()
                .join(", ")
        ))
        .await?;
        return Ok(());
    };

    let embed = poise::serenity_prelude::CreateEmbed::new()
        .title("Available Commands")
        .color(DEFAULT_EMBED_COLOR)
        .description(description);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn categories(commands: &[CommandMeta]) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = commands.iter().map(|meta| meta.category).collect();
    names.sort_unstable();
    names.dedup();
    names
}

/// Commands grouped under bold category headings, `None` for an unknown category.
fn help_description(commands: &[CommandMeta], category: Option<&str>) -> Option<String> {
    if let Some(wanted) = category
        && !categories(commands).iter().any(|name| *name == wanted)
    {
        return None;
    }

    let mut selected: Vec<&CommandMeta> = commands
        .iter()
        .filter(|meta| category.is_none_or(|wanted| meta.category == wanted))
        .collect();
    selected.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    let mut out = String::new();
    let mut current: Option<&str> = None;
    for meta in selected {
        if current != Some(meta.category) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", display_category(meta.category)));
            current = Some(meta.category);
        }
        out.push_str(&format!("`{}`: {}\n", meta.name, meta.desc));
    }

    Some(out.trim_end().to_owned())
}

fn display_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{display_category, help_description};
    use crate::COMMANDS;

    #[test]
    fn groups_by_category() {
        let text = help_description(COMMANDS, None).unwrap();
        let leveling = text.find("**Leveling**").unwrap();
        let utility = text.find("**Utility**").unwrap();
        assert!(leveling < utility);
        assert!(text.contains("`rank`"));
    }

    #[test]
    fn filters_and_rejects_categories() {
        let text = help_description(COMMANDS, Some("utility")).unwrap();
        assert!(text.contains("`help`"));
        assert!(!text.contains("`rank`"));
        assert!(help_description(COMMANDS, Some("music")).is_none());
    }

    #[test]
    fn capitalizes_category_names() {
        assert_eq!(display_category("leveling"), "Leveling");
        assert_eq!(display_category(""), "");
    }
}

use xp_core::{Context, Error};

use crate::{COMMANDS, CommandMeta};

pub const META: CommandMeta = CommandMeta {
    name: "usage",
    desc: "Show usage syntax for a specific command.",
    category: "utility",
    usage: "!usage <command>",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn usage(
    ctx: Context<'_>,
    #[description = "Command name"] command: Option<String>,
) -> Result<(), Error> {
    let reply = match command.as_deref() {
        None => format!("Usage: `{}`", META.usage),
        Some(raw) => match find_command(raw) {
            Some(meta) => format!("Usage: `{}`", meta.usage),
            None => format!("Unknown command: `{}`", normalize(raw)),
        },
    };

    ctx.say(reply).await?;
    Ok(())
}

fn normalize(raw: &str) -> String {
    raw.trim()
        .trim_start_matches(xp_utils::COMMAND_PREFIX)
        .to_ascii_lowercase()
}

fn find_command(raw: &str) -> Option<&'static CommandMeta> {
    let name = normalize(raw);
    COMMANDS.iter().find(|meta| meta.name == name)
}

#[cfg(test)]
mod tests {
    use super::find_command;

    #[test]
    fn lookup_ignores_prefix_and_case() {
        assert_eq!(find_command("!Rank").map(|meta| meta.name), Some("rank"));
        assert_eq!(find_command(" xpfor ").map(|meta| meta.name), Some("xpfor"));
        assert!(find_command("dance").is_none());
    }
}

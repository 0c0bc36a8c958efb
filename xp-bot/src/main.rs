mod events;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use xp_core::{BotConfig, Data, Error};
use xp_database::{CacheService, Database, Leveling, MIGRATOR, PgUserRecordStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        if *metadata.level() > tracing::Level::INFO {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();
    let config = BotConfig::from_env()?;

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    info!("PostgreSQL connection established.");

    let cache = build_cache(&config);
    if cache.is_redis_enabled() {
        match cache.ping().await {
            Ok(()) => info!("Redis cache health check passed."),
            Err(err) => warn!(
                ?err,
                "Redis cache ping failed; name lookups will fall back to the Discord API."
            ),
        }
    }

    let db = Database::with_cache(db_pool, cache);

    if config.auto_run_migrations {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    let leveling = Leveling::new(PgUserRecordStore::new(db.clone()), config.accrual);
    info!(
        cooldown_secs = config.accrual.cooldown_secs,
        level_up_mode = ?config.accrual.level_up_mode,
        message_xp_min = config.message_xp.min,
        message_xp_max = config.message_xp.max,
        "Leveling configured."
    );

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let guild_id = config.guild_id;
    let message_xp = config.message_xp;
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: xp_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(xp_utils::COMMAND_PREFIX.to_string()),
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            let db = db.clone();
            let leveling = leveling.clone();
            Box::pin(async move {
                info!("Leveling bot is online.");

                poise::builtins::register_in_guild(
                    ctx,
                    &framework.options().commands,
                    serenity::GuildId::new(guild_id),
                )
                .await?;

                Ok(Data {
                    db,
                    leveling,
                    message_xp,
                })
            })
        })
        .build();

    info!("Connecting to Discord...");

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

fn build_cache(config: &BotConfig) -> CacheService {
    let prefix = config.redis_key_prefix.clone();

    let Some(redis) = &config.redis else {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        return CacheService::disabled(prefix);
    };

    let Some(url) = redis.url.as_deref() else {
        warn!(key_prefix = %prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing without cache.");
        return CacheService::disabled(prefix);
    };

    match CacheService::redis(url, prefix.clone()) {
        Ok(cache) => {
            info!(key_prefix = %prefix, "Redis cache enabled.");
            cache
        }
        Err(err) => {
            warn!(?err, key_prefix = %prefix, "Failed to initialize Redis cache; continuing without cache.");
            CacheService::disabled(prefix)
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, command = %ctx.command().qualified_name, "command error");

            let embed = serenity::CreateEmbed::new()
                .title("Command Error")
                .description("Something went wrong while running this command.")
                .color(xp_utils::embed::DEFAULT_EMBED_COLOR);

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = xp_commands::COMMANDS
                .iter()
                .find(|meta| meta.name == ctx.command().name)
                .map_or_else(
                    || format!("!{}", ctx.command().qualified_name),
                    |meta| meta.usage.to_owned(),
                );
            let description = match input {
                Some(input) => format!("Invalid argument: `{}`\nUsage: `{}`", input, usage),
                None => format!("Missing required argument.\nUsage: `{}`", usage),
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            let _ = ctx
                .say("You need the Manage Server permission to use this command.")
                .await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            if let Err(err) = poise::builtins::on_error(other).await {
                error!(?err, "framework error");
            }
        }
    }
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            events::leveling::handle_message_xp(ctx, data, new_message).await;
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            events::leveling::handle_member_join(data, new_member).await;
        }
        _ => {}
    }

    Ok(())
}

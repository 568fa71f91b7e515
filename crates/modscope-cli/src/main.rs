//! modscope command line
//!
//! Loads a world fixture into in-memory stores and runs scope checks and
//! assignments against it.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use modscope_core::{ModerationConfig, ModerationService};
use modscope_store::World;
use modscope_types::{EntityId, ScopeKind, ScopePayload, UserId};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

fn cli() -> Command {
    Command::new("modscope")
        .version(modscope_core::VERSION)
        .about("Moderator scope authorization over an entity graph")
        .subcommand_required(true)
        .arg(
            Arg::new("world")
                .long("world")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("World fixture (YAML, or JSON by .json extension)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("check")
                .about("Decide whether a moderator may edit an entity")
                .arg(moderator_arg())
                .arg(
                    Arg::new("entity")
                        .long("entity")
                        .required(true)
                        .help("Target entity id"),
                ),
        )
        .subcommand(
            Command::new("describe")
                .about("Describe a moderator's scope")
                .arg(moderator_arg()),
        )
        .subcommand(Command::new("list").about("List every assigned scope"))
        .subcommand(
            Command::new("assign")
                .about("Validate and assign a scope")
                .arg(moderator_arg())
                .arg(
                    Arg::new("scope-type")
                        .long("scope-type")
                        .required(true)
                        .value_parser(ScopeKind::ALL.map(|k| k.as_str()))
                        .help("Selector strategy"),
                )
                .arg(Arg::new("state").long("state").help("State name"))
                .arg(Arg::new("city").long("city").help("City name"))
                .arg(Arg::new("entity").long("entity").help("Scoped entity id"))
                .arg(
                    Arg::new("promote")
                        .long("promote")
                        .action(ArgAction::SetTrue)
                        .help("Promote a plain user to moderator first"),
                ),
        )
}

fn moderator_arg() -> Arg {
    Arg::new("moderator")
        .long("moderator")
        .required(true)
        .help("Moderator user id")
}

fn init_tracing(default_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a String> {
    args.get_one::<String>(name)
        .with_context(|| format!("missing --{name}"))
}

fn payload_from(args: &ArgMatches) -> Result<ScopePayload> {
    let mut payload = ScopePayload::new(required(args, "scope-type")?.as_str());
    payload.state = args.get_one::<String>("state").cloned();
    payload.city = args.get_one::<String>("city").cloned();
    payload.entity_id = args.get_one::<String>("entity").cloned();
    Ok(payload)
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ModerationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ModerationConfig::default(),
    };
    init_tracing(&config.log_level, matches.get_flag("log-json"));

    let world_path = matches
        .get_one::<PathBuf>("world")
        .context("missing --world")?;
    let world = World::load(world_path)
        .with_context(|| format!("loading world {}", world_path.display()))?;
    let service = ModerationService::from_world(config, &world)
        .await
        .context("seeding world")?;

    let output = match matches.subcommand() {
        Some(("check", args)) => {
            let moderator = UserId::new(required(args, "moderator")?.as_str());
            let entity = EntityId::new(required(args, "entity")?.as_str());
            commands::check(&service, &moderator, &entity).await
        }
        Some(("describe", args)) => {
            let moderator = UserId::new(required(args, "moderator")?.as_str());
            commands::describe(&service, &moderator).await?
        }
        Some(("list", _)) => commands::list(&service).await?,
        Some(("assign", args)) => {
            let moderator = UserId::new(required(args, "moderator")?.as_str());
            let payload = payload_from(args)?;
            commands::assign(&service, &moderator, &payload, args.get_flag("promote")).await?
        }
        Some((other, _)) => anyhow::bail!("unknown command: {other}"),
        None => anyhow::bail!("no command given"),
    };

    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn assign_args_become_payload() {
        let matches = cli()
            .try_get_matches_from([
                "modscope",
                "--world",
                "world.yaml",
                "assign",
                "--moderator",
                "mod-1",
                "--scope-type",
                "city",
                "--state",
                "Maharashtra",
                "--city",
                "Mumbai",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(
            payload_from(args).unwrap(),
            ScopePayload::city("Maharashtra", "Mumbai")
        );
    }

    #[test]
    fn unknown_scope_type_is_refused_by_parser() {
        let result = cli().try_get_matches_from([
            "modscope",
            "--world",
            "w.yaml",
            "assign",
            "--moderator",
            "m",
            "--scope-type",
            "galaxy",
        ]);
        assert!(result.is_err());
    }
}

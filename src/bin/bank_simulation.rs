//! Command-line front end for the cashier race simulation.
//!
//! Without `--variant` an interactive menu is shown.
//! Logging: `BANK_SIM_LOG=debug` (style via `BANK_SIM_LOG_STYLE`).

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use log::debug;

use cashier_race::{run_variant, ConsoleReporter, Menu, MenuChoice, Settings, SimulationError, Variant};

fn make_command() -> Command {
    Command::new("bank_simulation")
        .about("Cashier threads racing over one shared bank account")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("variant")
                .short('v')
                .long("variant")
                .value_name("VARIANT")
                .help("Run without the menu")
                .value_parser(["unsafe", "safe", "both"]),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML settings file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .value_name("N")
                .help("Seed for reproducible denomination draws")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("pacing-ms")
                .short('p')
                .long("pacing-ms")
                .value_name("MS")
                .help("Pause after every cashier request")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Plain output")
                .action(ArgAction::SetTrue),
        )
}

/// Settings file first, then command-line overrides.
fn resolve_settings(matches: &ArgMatches) -> Result<Settings, SimulationError> {
    let mut settings = match matches.get_one::<PathBuf>("config") {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    if let Some(seed) = matches.get_one::<u64>("seed") {
        settings.seed = Some(*seed);
    }
    if let Some(pacing_ms) = matches.get_one::<u64>("pacing-ms") {
        settings.pacing_ms = *pacing_ms;
    }
    if matches.get_flag("no-color") {
        settings.color = false;
    }

    settings.validate()?;
    Ok(settings)
}

fn selected_variants(matches: &ArgMatches) -> Result<Vec<Variant>, SimulationError> {
    let variants = match matches.get_one::<String>("variant").map(String::as_str) {
        Some("unsafe") => vec![Variant::Unsynchronized],
        Some("safe") => vec![Variant::Synchronized],
        Some(_) => Variant::ALL.to_vec(),
        None => {
            println!("\t\t\tMultithreading Demonstrations with and without Synchronization");
            let mut menu = Menu::new(io::stdin().lock(), io::stdout());
            match menu.choose()? {
                MenuChoice::Run(variant) => vec![variant],
                MenuChoice::Exit => Vec::new(),
            }
        }
    };
    Ok(variants)
}

fn run(matches: &ArgMatches) -> Result<(), SimulationError> {
    let settings = resolve_settings(matches)?;
    if !settings.color {
        colored::control::set_override(false);
    }
    debug!("settings: {settings:?}");

    let mut reporter = ConsoleReporter::stdout(settings.color);
    for variant in selected_variants(matches)? {
        run_variant(variant, &settings, &mut reporter)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let env = env_logger::Env::new()
        .filter_or("BANK_SIM_LOG", "warn")
        .write_style("BANK_SIM_LOG_STYLE");
    env_logger::init_from_env(env);

    let matches = make_command().get_matches();
    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> ArgMatches {
        make_command()
            .try_get_matches_from(std::iter::once("bank_simulation").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_command_is_well_formed() {
        make_command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let matches = parse(&["--seed", "3", "--pacing-ms", "0", "--no-color"]);
        let settings = resolve_settings(&matches).unwrap();
        assert_eq!(
            settings,
            Settings {
                pacing_ms: 0,
                seed: Some(3),
                color: false,
            }
        );
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "pacing_ms = 5\nseed = 1").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let matches = parse(&["--config", &path, "--seed", "9"]);
        let settings = resolve_settings(&matches).unwrap();
        assert_eq!(settings.pacing_ms, 5);
        assert_eq!(settings.seed, Some(9));
    }

    #[test]
    fn test_pacing_override_is_validated() {
        let matches = parse(&["--pacing-ms", "60000"]);
        assert!(matches!(resolve_settings(&matches), Err(SimulationError::Config(_))));
    }

    #[test]
    fn test_variant_selection() {
        let both = selected_variants(&parse(&["--variant", "both"])).unwrap();
        assert_eq!(both, vec![Variant::Unsynchronized, Variant::Synchronized]);

        let safe = selected_variants(&parse(&["-v", "safe"])).unwrap();
        assert_eq!(safe, vec![Variant::Synchronized]);
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let result = make_command().try_get_matches_from(["bank_simulation", "--variant", "fast"]);
        assert!(result.is_err());
    }
}

//! Knoblomat settings tool for Linux.
//!
//! Works on the same settings contract as the firmware, backed by JSON files
//! instead of flash, so settings documents can be prepared and checked on a
//! host.
//!
//! ```text
//! knoblomat-settings show
//! knoblomat-settings set '{"WiFiSettings": {"SSID": "HomeNet", "PASS": "secret"}}'
//! knoblomat-settings set - < settings.json
//! knoblomat-settings record win
//! knoblomat-settings clear
//! knoblomat-settings info
//! ```

mod config;
mod file_store;

use anyhow::{bail, Context};
use config::HostConfig;
use file_store::FileStore;
use knoblomat_core::config::DEFAULT_HTTP_PORT;
use knoblomat_core::info::ServerInfo;
use knoblomat_core::{DeviceSettings, Outcome, Settings};
use std::io::Read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: knoblomat-settings <show | set <json|-> | clear | record <tie|win|loss> | info>";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Show,
    Set(String),
    Clear,
    Record(Outcome),
    Info,
}

fn parse_outcome(text: &str) -> anyhow::Result<Outcome> {
    match text.to_ascii_lowercase().as_str() {
        "tie" => Ok(Outcome::Tie),
        "win" => Ok(Outcome::Win),
        "loss" => Ok(Outcome::Loss),
        other => bail!("unknown outcome '{}' (expected tie, win or loss)", other),
    }
}

fn parse_command(args: &[String]) -> anyhow::Result<Command> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        ["show"] => Ok(Command::Show),
        ["clear"] => Ok(Command::Clear),
        ["info"] => Ok(Command::Info),
        ["set", "-"] => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read settings from stdin")?;
            Ok(Command::Set(text))
        }
        ["set", text] => Ok(Command::Set(text.to_string())),
        ["record", outcome] => Ok(Command::Record(parse_outcome(outcome)?)),
        _ => bail!("{}", USAGE),
    }
}

/// Execute `command` and return the text to print.
fn run(command: Command, config: &HostConfig) -> anyhow::Result<String> {
    let store = FileStore::new(&config.data_dir);
    let mut settings = DeviceSettings::new(config.ap_defaults.clone());
    settings
        .init(&store)
        .with_context(|| format!("failed to load settings from {}", store.dir().display()))?;

    match command {
        Command::Show => {}
        Command::Set(text) => {
            settings
                .deserialize(text.trim())
                .context("settings update rejected, nothing was saved")?;
            settings.save(&store).context("failed to save settings")?;
            tracing::info!("Settings saved to {}", store.dir().display());
        }
        Command::Clear => {
            settings.clear(&store).context("failed to clear settings")?;
            settings = DeviceSettings::new(config.ap_defaults.clone());
            settings.init(&store)?;
            tracing::info!("Settings cleared");
        }
        Command::Record(outcome) => {
            settings.game.record(outcome);
            settings.game.save(&store).context("failed to save game score")?;
            tracing::info!("Recorded {:?}, {} games played", outcome, settings.game.total());
        }
        Command::Info => {
            let info = ServerInfo::new(&settings.wifi.hostname, DEFAULT_HTTP_PORT, "", "");
            tracing::debug!("\n{}", info);
            return Ok(info.serialize()?);
        }
    }

    Ok(settings.serialize())
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for JSON output
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,knoblomat_core=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_command(&args)?;
    let config = HostConfig::from_env();
    tracing::debug!("Using data directory {}", config.data_dir.display());

    let output = run(command, &config)?;
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use knoblomat_core::ApDefaults;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use std::path::PathBuf;

    fn test_config(name: &str) -> HostConfig {
        let data_dir: PathBuf = std::env::temp_dir().join(format!(
            "knoblomat-settings-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&data_dir);
        HostConfig {
            data_dir,
            ap_defaults: ApDefaults::new("Knob-AP", "knob"),
        }
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn json(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command(&args(&["show"])).unwrap(), Command::Show);
        assert_eq!(parse_command(&args(&["clear"])).unwrap(), Command::Clear);
        assert_eq!(
            parse_command(&args(&["set", "{}"])).unwrap(),
            Command::Set("{}".to_string())
        );
        assert_eq!(
            parse_command(&args(&["record", "WIN"])).unwrap(),
            Command::Record(Outcome::Win)
        );
        assert!(parse_command(&args(&["record", "draw"])).is_err());
        assert!(parse_command(&args(&[])).is_err());
        assert!(parse_command(&args(&["show", "extra"])).is_err());
    }

    #[test]
    fn test_show_on_empty_store() {
        let config = test_config("show");
        let value = json(&run(Command::Show, &config).unwrap());
        assert_eq!(value["ApSettings"]["SSID"], "Knob-AP");
        assert_eq!(value["WiFiSettings"]["DHCP"], true);
        assert_eq!(value["GameSettings"]["Ties"], 0);
    }

    #[test]
    fn test_set_persists_and_rejects_malformed() {
        let config = test_config("set");
        run(
            Command::Set(r#"{"WiFiSettings": {"SSID": "HomeNet"}}"#.to_string()),
            &config,
        )
        .unwrap();

        assert!(run(Command::Set("{\"WiFiSettings\":".to_string()), &config).is_err());
        assert!(run(Command::Set(String::new()), &config).is_err());

        let value = json(&run(Command::Show, &config).unwrap());
        assert_eq!(value["WiFiSettings"]["SSID"], "HomeNet");
        std::fs::remove_dir_all(&config.data_dir).unwrap();
    }

    #[test]
    fn test_record_and_clear() {
        let config = test_config("record");
        run(Command::Record(Outcome::Win), &config).unwrap();
        let value = json(&run(Command::Record(Outcome::Win), &config).unwrap());
        assert_eq!(value["GameSettings"]["Wins"], 2);

        let value = json(&run(Command::Clear, &config).unwrap());
        assert_eq!(value["GameSettings"]["Wins"], 0);
        std::fs::remove_dir_all(&config.data_dir).unwrap();
    }

    #[test]
    fn test_info_uses_station_hostname() {
        let config = test_config("info");
        run(
            Command::Set(r#"{"WiFiSettings": {"Hostname": "knob-host"}}"#.to_string()),
            &config,
        )
        .unwrap();

        let value = json(&run(Command::Info, &config).unwrap());
        assert_eq!(value["Name"], "knob-host");
        assert_eq!(value["Port"], 80);
        assert_eq!(value["Url"], "http://knob-host");
        std::fs::remove_dir_all(&config.data_dir).unwrap();
    }
}

//! `nexus [config.json] [--gestures recording.json]`

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use nexus::input::{GestureSource, ReplayGestures};
use nexus::NexusConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nexus=info")),
        )
        .init();

    let mut config_path = None;
    let mut gestures_path = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--gestures" => match args.next() {
                Some(path) => gestures_path = Some(path),
                None => bail!("--gestures needs a recording path"),
            },
            "-h" | "--help" => {
                println!("usage: nexus [config.json] [--gestures recording.json]");
                return Ok(());
            }
            _ if config_path.is_none() => config_path = Some(arg),
            _ => bail!("unexpected argument `{arg}`"),
        }
    }

    let config = match &config_path {
        Some(path) => {
            tracing::info!("config: {path}");
            NexusConfig::load(path).with_context(|| format!("loading {path}"))?
        }
        None => {
            tracing::info!("config: defaults");
            NexusConfig::default()
        }
    };

    let gestures: Option<Box<dyn GestureSource>> = match gestures_path {
        Some(path) => match ReplayGestures::load(&path) {
            Ok(replay) => Some(Box::new(replay.looping(true))),
            Err(err) => {
                tracing::warn!("gesture recording unusable ({err}); using pointer input");
                None
            }
        },
        None => None,
    };

    nexus::window::run(config, gestures)?;
    Ok(())
}

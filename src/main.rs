//! Terminal tetris client (default binary).
//!
//! Plays a replayed session (`TETRIS_REPLAY_PATH`) on a crossterm terminal.
//! Configuration comes from the environment, see [`ClientConfig`].

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use simplelog::{ConfigBuilder, WriteLogger};
use tokio::runtime::Runtime;

use tetris_client::session::{ReplaySession, SessionHandle};
use tetris_client::term::{CrosstermEvents, CrosstermSurface};
use tetris_client::ui::{ClientConfig, TetrisUi};

const SESSION_CAPACITY: usize = 16;

fn main() -> Result<()> {
    let config = ClientConfig::from_env()?;
    init_logging(&config);

    let Some(replay_path) = config.replay_path.as_ref() else {
        bail!("TETRIS_REPLAY_PATH is not set; there is no session to play");
    };
    let replay = ReplaySession::from_path(replay_path, config.replay_interval)?;
    log::info!(
        "replaying {} snapshots from {}",
        replay.snapshots().len(),
        replay_path.display()
    );

    let rt = Runtime::new().context("failed to create tokio runtime")?;
    let result = rt.block_on(async {
        let (session, peer) = SessionHandle::channel(config.player_name.clone(), SESSION_CAPACITY);
        let replay_task = replay.spawn(peer);

        let ui = TetrisUi::new(
            CrosstermSurface::new(),
            CrosstermEvents,
            session,
            config.geometry(),
        );
        let summary = ui.start_game().await;
        replay_task.abort();
        summary
    });

    // A stray key read may still be parked on the blocking pool.
    rt.shutdown_timeout(Duration::from_millis(200));

    let summary = result?;
    log::info!("{:?}", summary);
    println!(
        "{}: {} frames, ended by {:?}",
        summary.player_name, summary.frames, summary.end
    );
    Ok(())
}

fn init_logging(config: &ClientConfig) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    // The terminal belongs to the game, so logs only ever go to a file.
    match open_log(&config.log_path) {
        Ok(log_file) => {
            let _ = WriteLogger::init(config.log_level, log_config, log_file);
        }
        // Printed before the game takes over the terminal.
        Err(warning) => eprintln!("{warning}"),
    }
}

fn open_log(path: &Path) -> std::result::Result<File, String> {
    File::create(path)
        .map_err(|e| format!("warning: logging disabled, cannot create {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritable_log_path_yields_a_warning() {
        let path = std::env::temp_dir()
            .join("tetris-client-no-such-dir")
            .join("nested")
            .join("client.log");
        let warning = open_log(&path).unwrap_err();
        assert!(warning.starts_with("warning: logging disabled"));
        assert!(warning.contains("client.log"));
    }

    #[test]
    fn writable_log_path_opens() {
        let path = std::env::temp_dir().join(format!("tetris-client-{}.log", std::process::id()));
        assert!(open_log(&path).is_ok());
        let _ = std::fs::remove_file(&path);
    }
}

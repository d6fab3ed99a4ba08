use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::combat::BattleOutcome;

#[derive(Debug, Error)]
pub enum LogSinkError {
    #[error("failed to create log directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write battle log '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write a finished battle's log lines to `{dir}/battle-{utc}-{uuid}.log`.
/// Called once per battle, after the engine has returned.
pub fn write_battle_log(dir: &Path, outcome: &BattleOutcome) -> Result<PathBuf, LogSinkError> {
    fs::create_dir_all(dir).map_err(|source| LogSinkError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let stamp = Utc::now().format("%Y%m%dT%H%M%S");
    let path = dir.join(format!("battle-{stamp}-{}.log", Uuid::new_v4()));

    let mut body = outcome.log.join("\n");
    body.push('\n');
    fs::write(&path, body).map_err(|source| LogSinkError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::debug!(path = %path.display(), lines = outcome.log.len(), "battle log written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;
    use crate::combat::Verdict;

    #[test]
    fn writes_one_line_per_log_entry() {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("skirmish-logs-{stamp}"));
        let outcome = BattleOutcome {
            log: vec![
                "Round 1:".to_string(),
                "A uses Attack Solo on B for 450 damage.".to_string(),
                "B is defeated!".to_string(),
                "Result: Victory".to_string(),
            ],
            result: Verdict::Victory,
            rounds: 1,
            events: Vec::new(),
        };

        let path = write_battle_log(&dir, &outcome).expect("log should be written");
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert!(name.starts_with("battle-") && name.ends_with(".log"), "{name}");

        let written = fs::read_to_string(&path).expect("log should be readable");
        assert_eq!(written.lines().collect::<Vec<_>>(), outcome.log);

        let _ = fs::remove_dir_all(dir);
    }
}

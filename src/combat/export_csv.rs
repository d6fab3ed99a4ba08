//! Flatten battle events into CSV rows for spreadsheet review.
//!
//! Columns: round, kind, actor, action, target, amount, critical. Cells that do
//! not apply to an event kind are left empty.

use std::string::FromUtf8Error;

use serde::Serialize;
use thiserror::Error;

use crate::combat::engine::Verdict;
use crate::combat::log::BattleEvent;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv flush failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv output was not utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

#[derive(Debug, Serialize)]
struct EventRow<'a> {
    round: Option<u32>,
    kind: &'static str,
    actor: Option<&'a str>,
    action: Option<&'static str>,
    target: Option<&'a str>,
    amount: Option<i64>,
    critical: Option<bool>,
}

fn to_row(event: &BattleEvent) -> EventRow<'_> {
    let round = event.round();
    match event {
        BattleEvent::RoundStarted { .. } => EventRow {
            round,
            kind: "round",
            actor: None,
            action: None,
            target: None,
            amount: None,
            critical: None,
        },
        BattleEvent::Action {
            actor,
            action,
            target,
            amount,
            critical,
            ..
        } => EventRow {
            round,
            kind: "action",
            actor: Some(actor),
            action: Some(action.label()),
            target: Some(target),
            amount: Some(*amount),
            critical: Some(*critical),
        },
        BattleEvent::Defeated { name, .. } => EventRow {
            round,
            kind: "defeated",
            actor: None,
            action: None,
            target: Some(name),
            amount: None,
            critical: None,
        },
        BattleEvent::Concluded { verdict } => EventRow {
            round,
            kind: match verdict {
                Verdict::Victory => "victory",
                Verdict::Defeat => "defeat",
                Verdict::Ongoing => "ongoing",
            },
            actor: None,
            action: None,
            target: None,
            amount: None,
            critical: None,
        },
    }
}

pub fn export_events_csv(events: &[BattleEvent]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for event in events {
        writer.serialize(to_row(event))?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

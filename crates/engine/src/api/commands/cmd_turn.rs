//! Turn, mode and action commands.

use gamenight_domain::{ActionKind, AutoAdvanceOutcome, CharacterName, GameMode, ViewerId};
use gamenight_shared::{CommandResponse, SkipView, TimerView, TurnView};

use super::parse_characters;
use crate::app::App;
use crate::error::EngineError;

pub(super) async fn set_mode(app: &App, mode: String) -> Result<CommandResponse, EngineError> {
    let mode: GameMode = mode.parse()?;
    let changed = app.use_cases.turn.set_mode.execute(mode).await?;
    Ok(CommandResponse::ModeChanged {
        from: changed.from,
        to: changed.to,
    })
}

pub(super) async fn initiative(
    app: &App,
    characters: Vec<String>,
    timeout_seconds: Option<u64>,
) -> Result<CommandResponse, EngineError> {
    let order = parse_characters(characters)?;
    let started = app
        .use_cases
        .turn
        .start_initiative
        .execute(order, timeout_seconds)
        .await?;
    Ok(CommandResponse::CombatStarted {
        initiative: started.order.into_iter().map(String::from).collect(),
        current: started.current.into(),
        round: started.round,
        deadline: started.deadline,
        map_switched_to: started.map_switched_to.map(String::from),
    })
}

pub(super) async fn next_turn(app: &App) -> Result<CommandResponse, EngineError> {
    let advanced = app.use_cases.turn.next_turn.execute().await?;
    Ok(CommandResponse::TurnAdvanced {
        turn: advanced.into(),
    })
}

pub(super) async fn end_combat(app: &App) -> Result<CommandResponse, EngineError> {
    let ended = app.use_cases.turn.end_combat.execute().await?;
    Ok(CommandResponse::CombatEnded {
        cleared: ended.cleared,
        mode: ended.mode,
    })
}

pub(super) async fn auto_advance(app: &App) -> Result<CommandResponse, EngineError> {
    let report = app.use_cases.turn.auto_advance.execute().await?;
    let timer = TimerView::from(report.timer);
    Ok(match report.outcome {
        AutoAdvanceOutcome::Advanced { advance, skipped } => {
            let skipped = skipped.map(|s| SkipView::new(advance.previous.as_str(), s));
            CommandResponse::AutoAdvanced {
                advanced: true,
                timer,
                turn: Some(TurnView::from(advance)),
                skipped,
            }
        }
        AutoAdvanceOutcome::NotExpired { .. } | AutoAdvanceOutcome::NotInCombat => {
            CommandResponse::AutoAdvanced {
                advanced: false,
                timer,
                turn: None,
                skipped: None,
            }
        }
    })
}

pub(super) async fn check_timer(app: &App) -> Result<CommandResponse, EngineError> {
    let status = app.use_cases.turn.check_timer.execute().await?;
    Ok(CommandResponse::Timer {
        timer: status.into(),
    })
}

pub(super) async fn log_action(
    app: &App,
    viewer_id: String,
    character: String,
    text: String,
    kind: Option<String>,
) -> Result<CommandResponse, EngineError> {
    let actor = app.actor(ViewerId::new(viewer_id)?);
    let character = CharacterName::new(character)?;
    let kind = match kind {
        Some(kind) => kind.parse::<ActionKind>()?,
        None => ActionKind::default(),
    };
    let entry = app
        .use_cases
        .turn
        .log_action
        .execute(actor, character, kind, text)
        .await?;
    Ok(CommandResponse::ActionLogged { entry })
}

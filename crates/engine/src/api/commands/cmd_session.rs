//! Session lifecycle, participant control and activity reports.

use gamenight_domain::{AdventureId, CharacterName, DomainError, ViewerId};
use gamenight_shared::{ActivityView, CommandResponse, IdleView};

use super::parse_characters;
use crate::app::App;
use crate::error::EngineError;

pub(super) async fn init(
    app: &App,
    adventure_id: String,
    bot_characters: Vec<String>,
    turn_timeout_secs: Option<u64>,
) -> Result<CommandResponse, EngineError> {
    let adventure = AdventureId::new(adventure_id)?;
    let bots = parse_characters(bot_characters)?;
    let record = app
        .use_cases
        .session
        .init
        .execute(adventure, bots, turn_timeout_secs)
        .await?;
    Ok(CommandResponse::SessionStarted {
        session: record.session().clone(),
        participants: record.participants().to_vec(),
    })
}

pub(super) async fn end(app: &App, canon: bool) -> Result<CommandResponse, EngineError> {
    let archived = app.use_cases.session.end.execute(canon).await?;
    Ok(CommandResponse::SessionEnded {
        session: archived.record.session().clone(),
        archived_to: archived.archived_to,
    })
}

pub(super) async fn join(
    app: &App,
    viewer_id: String,
    character: String,
) -> Result<CommandResponse, EngineError> {
    let viewer = ViewerId::new(viewer_id)?;
    if app.actor(viewer.clone()).is_narrator() {
        return Err(DomainError::validation("The narrator cannot take a character").into());
    }
    let character = CharacterName::new(character)?;
    let joined = app
        .use_cases
        .activity
        .join
        .execute(viewer, character)
        .await?;
    Ok(CommandResponse::Joined {
        character: joined.character.into(),
        viewer: joined.viewer.into(),
        previous_controller: joined.previous_controller.map(|c| c.to_string()),
        released: joined.released.map(String::from),
    })
}

pub(super) async fn leave(app: &App, viewer_id: String) -> Result<CommandResponse, EngineError> {
    let viewer = ViewerId::new(viewer_id)?;
    let left = app.use_cases.activity.leave.execute(viewer).await?;
    Ok(CommandResponse::Left {
        character: left.character.into(),
        viewer: left.viewer.into(),
    })
}

pub(super) async fn check_idle(app: &App) -> Result<CommandResponse, EngineError> {
    let idle = app.use_cases.activity.check_idle.execute().await?;
    Ok(CommandResponse::IdleReport {
        idle: idle.into_iter().map(IdleView::from).collect(),
    })
}

pub(super) async fn activity_summary(app: &App) -> Result<CommandResponse, EngineError> {
    let entries = app.use_cases.activity.activity_summary.execute().await?;
    Ok(CommandResponse::ActivitySummary {
        characters: entries.into_iter().map(ActivityView::from).collect(),
    })
}

//! Character data and narrative commands.

use gamenight_domain::{CharacterName, OpeningCrawl, SceneUpdate, WoundLevel};
use gamenight_shared::CommandResponse;

use crate::app::App;
use crate::error::EngineError;
use crate::use_cases::narrative::{DiceRoll, PointChange};

async fn adjust(
    app: &App,
    character: String,
    change: PointChange,
) -> Result<CommandResponse, EngineError> {
    let character = CharacterName::new(character)?;
    let participant = app
        .use_cases
        .narrative
        .adjust_points
        .execute(character, change)
        .await?;
    Ok(CommandResponse::Points {
        character: participant.character_name().to_string(),
        character_points: participant.character_points(),
        force_points: participant.force_points(),
    })
}

pub(super) async fn award_cp(
    app: &App,
    character: String,
    points: u32,
) -> Result<CommandResponse, EngineError> {
    adjust(app, character, PointChange::AwardCharacterPoints(points)).await
}

pub(super) async fn spend_cp(
    app: &App,
    character: String,
    points: u32,
) -> Result<CommandResponse, EngineError> {
    adjust(app, character, PointChange::SpendCharacterPoints(points)).await
}

pub(super) async fn spend_fp(app: &App, character: String) -> Result<CommandResponse, EngineError> {
    adjust(app, character, PointChange::SpendForcePoint).await
}

pub(super) async fn wound(
    app: &App,
    character: String,
    level: u8,
) -> Result<CommandResponse, EngineError> {
    let character = CharacterName::new(character)?;
    let level = WoundLevel::from_level(level)?;
    let recorded = app
        .use_cases
        .narrative
        .record_wound
        .execute(character, level)
        .await?;
    Ok(CommandResponse::Wound {
        character: recorded.character.into(),
        level: recorded.level,
        npc: recorded.npc,
    })
}

pub(super) async fn log_dice(
    app: &App,
    character: String,
    skill: String,
    total: i32,
    detail: String,
    difficulty: Option<i32>,
    success: Option<bool>,
) -> Result<CommandResponse, EngineError> {
    let character = CharacterName::new(character)?;
    let kept = app
        .use_cases
        .narrative
        .log_dice
        .execute(DiceRoll {
            character: character.clone(),
            skill,
            total,
            detail,
            difficulty,
            success,
        })
        .await?;
    Ok(CommandResponse::DiceLogged {
        character: character.into(),
        total,
        kept,
    })
}

pub(super) async fn update_scene(
    app: &App,
    act: Option<String>,
    scene: Option<String>,
    narration: Option<String>,
) -> Result<CommandResponse, EngineError> {
    let session = app
        .use_cases
        .narrative
        .update_scene
        .execute(SceneUpdate {
            act,
            scene,
            narration,
        })
        .await?;
    Ok(CommandResponse::SceneUpdated {
        act: session.act,
        scene: session.scene,
        narration: session.narration,
    })
}

pub(super) async fn set_crawl(
    app: &App,
    title: String,
    episode_title: String,
    paragraphs: Vec<String>,
) -> Result<CommandResponse, EngineError> {
    let crawl = OpeningCrawl::new(title, episode_title, paragraphs)?;
    let crawl = app.use_cases.narrative.set_crawl.execute(crawl).await?;
    Ok(CommandResponse::CrawlSet { crawl })
}

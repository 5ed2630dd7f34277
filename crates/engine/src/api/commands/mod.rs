//! Command dispatcher.
//!
//! Turns a [`Command`] from a transport into a use case call. Arguments
//! arrive as raw strings and are parsed into domain types here, so a bad name
//! fails the same way as any other validation error.

mod cmd_movement;
mod cmd_narrative;
mod cmd_session;
mod cmd_turn;

use gamenight_domain::{CharacterName, DomainError};
use gamenight_shared::{Command, CommandFailure, CommandResponse, ErrorKind};

use crate::app::App;
use crate::error::EngineError;

/// Run one command. Failures come back classified and chat-ready.
pub async fn dispatch(app: &App, command: Command) -> Result<CommandResponse, CommandFailure> {
    let name = command.name();
    match route(app, command).await {
        Ok(response) => {
            tracing::debug!(command = name, "Command handled");
            Ok(response)
        }
        Err(e) => {
            match e.kind() {
                ErrorKind::StateInvariantViolation => {
                    tracing::error!(command = name, error = %e, "Session record is inconsistent")
                }
                ErrorKind::StorageError => {
                    tracing::warn!(command = name, error = %e, "Command not persisted")
                }
                _ if e.is_expected() => {
                    tracing::debug!(command = name, error = %e, "Command rejected by game rules")
                }
                _ => tracing::debug!(command = name, error = %e, "Command rejected"),
            }
            Err(CommandFailure::from(e))
        }
    }
}

async fn route(app: &App, command: Command) -> Result<CommandResponse, EngineError> {
    match command {
        // Session lifecycle and participants
        Command::Init {
            adventure_id,
            bot_characters,
            turn_timeout_secs,
        } => cmd_session::init(app, adventure_id, bot_characters, turn_timeout_secs).await,
        Command::EndSession { canon } => cmd_session::end(app, canon).await,
        Command::Join {
            viewer_id,
            character,
        } => cmd_session::join(app, viewer_id, character).await,
        Command::Leave { viewer_id } => cmd_session::leave(app, viewer_id).await,
        Command::CheckIdle => cmd_session::check_idle(app).await,
        Command::ActivitySummary => cmd_session::activity_summary(app).await,
        Command::Status => Ok(CommandResponse::Status(
            app.use_cases.status.status.execute().await,
        )),
        Command::Context => Ok(CommandResponse::Context(
            app.use_cases.status.context.execute().await?,
        )),

        // Turn & mode
        Command::SetMode { mode } => cmd_turn::set_mode(app, mode).await,
        Command::Initiative {
            characters,
            timeout_seconds,
        } => cmd_turn::initiative(app, characters, timeout_seconds).await,
        Command::NextTurn => cmd_turn::next_turn(app).await,
        Command::EndCombat => cmd_turn::end_combat(app).await,
        Command::AutoAdvance => cmd_turn::auto_advance(app).await,
        Command::CheckTimer => cmd_turn::check_timer(app).await,
        Command::LogAction {
            viewer_id,
            character,
            text,
            kind,
        } => cmd_turn::log_action(app, viewer_id, character, text, kind).await,

        // Positions
        Command::MoveToken {
            character,
            map,
            position,
            color,
            hidden,
            kind,
        } => cmd_movement::move_token(app, character, map, position, color, hidden, kind).await,
        Command::RemoveToken { character } => cmd_movement::remove_token(app, character).await,
        Command::SetMap {
            image,
            name,
            clear_tokens,
        } => cmd_movement::set_map(app, image, name, clear_tokens).await,
        Command::SwitchScene { map, name } => cmd_movement::switch_scene(app, map, name).await,
        Command::TransferToken {
            character,
            to_map,
            position,
        } => cmd_movement::transfer_token(app, character, to_map, position).await,
        Command::ListPositions { map } => cmd_movement::list_positions(app, map).await,
        Command::SetCamera {
            position,
            preset,
            x,
            y,
            zoom,
            follow_party,
        } => cmd_movement::set_camera(app, position, preset, x, y, zoom, follow_party).await,

        // Character data and narrative
        Command::AwardCp { character, points } => {
            cmd_narrative::award_cp(app, character, points).await
        }
        Command::SpendCp { character, points } => {
            cmd_narrative::spend_cp(app, character, points).await
        }
        Command::SpendFp { character } => cmd_narrative::spend_fp(app, character).await,
        Command::Wound { character, level } => cmd_narrative::wound(app, character, level).await,
        Command::LogDice {
            character,
            skill,
            total,
            detail,
            difficulty,
            success,
        } => {
            cmd_narrative::log_dice(app, character, skill, total, detail, difficulty, success)
                .await
        }
        Command::UpdateScene {
            act,
            scene,
            narration,
        } => cmd_narrative::update_scene(app, act, scene, narration).await,
        Command::SetCrawl {
            title,
            episode_title,
            paragraphs,
        } => cmd_narrative::set_crawl(app, title, episode_title, paragraphs).await,
    }
}

fn parse_characters(names: Vec<String>) -> Result<Vec<CharacterName>, DomainError> {
    names.into_iter().map(CharacterName::new).collect()
}

#[cfg(test)]
mod tests;

//! Token and map commands.

use gamenight_domain::{
    CameraAim, CharacterName, DomainError, EntryResolution, MapId, PositionName, TokenKind,
    TokenStyle,
};
use gamenight_shared::CommandResponse;

use crate::app::App;
use crate::error::EngineError;

pub(super) async fn move_token(
    app: &App,
    character: String,
    map: String,
    position: String,
    color: Option<String>,
    hidden: bool,
    kind: Option<String>,
) -> Result<CommandResponse, EngineError> {
    let character = CharacterName::new(character)?;
    let map = MapId::new(map)?;
    let position = PositionName::new(position)?;
    let style = TokenStyle {
        kind: kind.map(|k| k.parse::<TokenKind>()).transpose()?,
        color,
        hidden,
    };
    let token = app
        .use_cases
        .movement
        .move_token
        .execute(character, map, position, style)
        .await?;
    Ok(CommandResponse::TokenPlaced { token })
}

pub(super) async fn remove_token(
    app: &App,
    character: String,
) -> Result<CommandResponse, EngineError> {
    let character = CharacterName::new(character)?;
    let token = app
        .use_cases
        .movement
        .remove_token
        .execute(character)
        .await?;
    Ok(CommandResponse::TokenRemoved { token })
}

pub(super) async fn set_map(
    app: &App,
    image: String,
    name: Option<String>,
    clear_tokens: bool,
) -> Result<CommandResponse, EngineError> {
    let map = MapId::new(image)?;
    let active_map = app
        .use_cases
        .movement
        .set_map
        .execute(map, name, clear_tokens)
        .await?;
    Ok(CommandResponse::MapChanged {
        active_map,
        tokens_cleared: clear_tokens,
    })
}

pub(super) async fn switch_scene(
    app: &App,
    map: String,
    name: Option<String>,
) -> Result<CommandResponse, EngineError> {
    let map = MapId::new(map)?;
    let active_map = app
        .use_cases
        .movement
        .switch_scene
        .execute(map, name)
        .await?;
    Ok(CommandResponse::MapChanged {
        active_map,
        tokens_cleared: false,
    })
}

pub(super) async fn transfer_token(
    app: &App,
    character: String,
    to_map: String,
    position: Option<String>,
) -> Result<CommandResponse, EngineError> {
    let character = CharacterName::new(character)?;
    let to_map = MapId::new(to_map)?;
    let position = position.map(PositionName::new).transpose()?;
    let moved = app
        .use_cases
        .movement
        .transfer_token
        .execute(character, to_map, position)
        .await?;
    Ok(CommandResponse::TokenTransferred {
        token: moved.token,
        from_map: moved.from_map.into(),
        from_position: moved.from_position.into(),
        resolved_via: resolved_via(&moved.resolution),
    })
}

pub(super) async fn list_positions(
    app: &App,
    map: Option<String>,
) -> Result<CommandResponse, EngineError> {
    let map = map.map(MapId::new).transpose()?;
    let (map, groups) = app
        .use_cases
        .movement
        .list_positions
        .execute(map)
        .await?;
    Ok(CommandResponse::Positions {
        map: map.into(),
        groups,
    })
}

pub(super) async fn set_camera(
    app: &App,
    position: Option<String>,
    preset: Option<String>,
    x: Option<i32>,
    y: Option<i32>,
    zoom: Option<f64>,
    follow_party: bool,
) -> Result<CommandResponse, EngineError> {
    let aim = camera_aim(position, preset, x, y, follow_party)?;
    let camera = app
        .use_cases
        .movement
        .set_camera
        .execute(aim, zoom)
        .await?;
    Ok(CommandResponse::CameraSet { camera })
}

/// The first aim given wins: follow-party, position, preset, coordinates.
fn camera_aim(
    position: Option<String>,
    preset: Option<String>,
    x: Option<i32>,
    y: Option<i32>,
    follow_party: bool,
) -> Result<CameraAim, DomainError> {
    if follow_party {
        return Ok(CameraAim::FollowParty);
    }
    if let Some(position) = position {
        return Ok(CameraAim::Position(PositionName::new(position)?));
    }
    if let Some(preset) = preset {
        return Ok(CameraAim::Preset(preset));
    }
    match (x, y) {
        (Some(x), Some(y)) => Ok(CameraAim::Point { x, y }),
        (None, None) => Ok(CameraAim::Keep),
        _ => Err(DomainError::validation("Camera coordinates need both x and y")),
    }
}

fn resolved_via(resolution: &EntryResolution) -> String {
    match resolution {
        EntryResolution::Explicit => "explicit".to_string(),
        EntryResolution::Exit { exit } => format!("exit:{exit}"),
        EntryResolution::NearestExit { exit } => format!("nearest-exit:{exit}"),
        EntryResolution::ReturnConnection { exit } => format!("return-connection:{exit}"),
        EntryResolution::DefaultEntry => "default-entry".to_string(),
    }
}

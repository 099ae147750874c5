pub mod actors;
pub mod command_log;
pub mod config;
pub mod cues;
pub mod error;
pub mod game;
pub mod pathmap;
pub mod replay;
pub mod room;
pub mod snapshot;
pub mod tiles;
pub mod types;

pub use actors::{Actor, ActorKind, ActorRegistry, ActorState};
pub use command_log::{CommandLog, CommandRecord};
pub use config::EngineConfig;
pub use cues::{CueEvents, CueKind, CuePayload};
pub use error::{CommandLogError, GameError, ReplayError, ReplayMismatch, SnapshotError};
pub use game::{Game, Player, Visit};
pub use pathmap::InfluenceMap;
pub use replay::*;
pub use room::Room;
pub use snapshot::{ActorSpawn, DoorAction, OrbAgent, OrbDef, PlayerStart, RoomSnapshot};
pub use tiles::{OpaqueTile, TransparentTile};
pub use types::*;

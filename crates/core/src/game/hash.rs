//! Stable state hashing for deterministic verification.
//! This module exists to keep hashing concerns separate from simulation control code.
//! It does not own replay execution or command recording.

use std::hash::Hasher;

use super::*;
use xxhash_rust::xxh3::Xxh3;

impl Game {
    /// Folds every replay-relevant field; equal checksums mean equal outcomes.
    pub fn checksum(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u32(self.room.cols() as u32);
        hasher.write_u32(self.room.rows() as u32);
        hasher.write_u32(self.turn);
        for tile in self.room.opaque_layer() {
            hasher.write_u8(tile.code());
        }
        for tile in self.room.transparent_layer() {
            hasher.write_u8(tile.code());
        }
        hasher.write_i32(self.player.pos.x);
        hasher.write_i32(self.player.pos.y);
        hasher.write_u8(self.player.orientation.code());
        hasher.write_u8(u8::from(self.player.alive));
        for actor in self.actors.iter() {
            hasher.write_u8(actor.kind.code());
            hasher.write_i32(actor.pos.x);
            hasher.write_i32(actor.pos.y);
            hasher.write_u8(actor.orientation.code());
            hasher.write_u16(actor.rank);
            match actor.state {
                ActorState::Plain => hasher.write_u8(0),
                ActorState::Eye { awake } => {
                    hasher.write_u8(1);
                    hasher.write_u8(u8::from(awake));
                }
                ActorState::Egg { age } => {
                    hasher.write_u8(2);
                    hasher.write_u32(age);
                }
            }
        }
        hasher.write_u8(u8::from(self.room_cleared));
        hasher.finish()
    }
}

//! Ordered record of accepted player commands with playback pacing.
//!
//! Packed form is a byte stream of `(action, elapsed)` pairs closed by a
//! zero action byte. The action byte stores the command code plus one so
//! that zero stays free as the terminator; elapsed is in 10 ms units.

use serde::{Deserialize, Serialize};

use crate::error::CommandLogError;
use crate::types::Command;

const PACKED_TERMINATOR: u8 = 0;
const ELAPSED_UNIT_MS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub command: Command,
    /// Time since the previous command in 10 ms units, saturated at 255.
    /// Pacing only; never read by the simulation.
    pub elapsed: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLog {
    records: Vec<CommandRecord>,
    #[serde(skip)]
    frozen: bool,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_commands(commands: impl IntoIterator<Item = Command>) -> Self {
        let records =
            commands.into_iter().map(|command| CommandRecord { command, elapsed: 0 }).collect();
        Self { records, frozen: false }
    }

    pub fn append(&mut self, command: Command, elapsed_ms: u32) -> Result<(), CommandLogError> {
        if self.frozen {
            return Err(CommandLogError::Frozen);
        }
        let units = (elapsed_ms / ELAPSED_UNIT_MS).min(u32::from(u8::MAX)) as u8;
        self.records.push(CommandRecord { command, elapsed: units });
        Ok(())
    }

    /// Keeps only the first `keep` commands.
    pub fn truncate(&mut self, keep: usize) -> Result<(), CommandLogError> {
        if self.frozen {
            return Err(CommandLogError::Frozen);
        }
        if keep > self.records.len() {
            return Err(CommandLogError::TruncateBeyondEnd { keep, len: self.records.len() });
        }
        self.records.truncate(keep);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<CommandRecord> {
        self.records.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CommandRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn to_packed(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.records.len() * 2 + 1);
        for record in &self.records {
            bytes.push(record.command.code() + 1);
            bytes.push(record.elapsed);
        }
        bytes.push(PACKED_TERMINATOR);
        bytes
    }

    pub fn from_packed(bytes: &[u8]) -> Result<Self, CommandLogError> {
        let mut records = Vec::with_capacity(bytes.len() / 2);
        let mut offset = 0;
        loop {
            let Some(&action) = bytes.get(offset) else {
                return Err(CommandLogError::MissingTerminator);
            };
            if action == PACKED_TERMINATOR {
                break;
            }
            let command = Command::from_code(action - 1)
                .ok_or(CommandLogError::UnknownAction { offset, byte: action })?;
            let &elapsed = bytes.get(offset + 1).ok_or(CommandLogError::Truncated { offset })?;
            records.push(CommandRecord { command, elapsed });
            offset += 2;
        }
        Ok(Self { records, frozen: false })
    }
}

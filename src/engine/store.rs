use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::board::{Board, Card, Score, MAX_TILE};
use super::game::{GameState, Snapshot};
use crate::error::{Error, Result};

/// Storage holds a single serialized game under one named slot.
pub(crate) trait Storage {
    /// Return the stored blob, or None if nothing has been saved yet.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored blob.
    fn save(&mut self, blob: &str) -> Result<()>;
}

/// Storage backed by a single file on disk.
pub(crate) struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, blob: &str) -> Result<()> {
        // write next to the target and rename so a crash never leaves half a snapshot behind
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &self.path)?;
        log::trace!("saved {} bytes to {}", blob.len(), self.path.display());
        Ok(())
    }
}

/// Storage that lives only as long as the process.
#[derive(Default)]
pub(crate) struct MemoryStorage {
    blob: Option<String>,
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.blob.clone())
    }

    fn save(&mut self, blob: &str) -> Result<()> {
        self.blob = Some(blob.to_string());
        Ok(())
    }
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedSnapshot {
    board: Vec<Vec<Card>>,
    score: Score,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedState {
    board: Vec<Vec<Card>>,
    score: Score,
    #[serde(default)]
    game_over: bool,
    previous_states: Vec<SavedSnapshot>,
    #[serde(default)]
    has_won: bool,
}

fn rows_of<const N: usize>(board: &Board<N>) -> Vec<Vec<Card>> {
    board.rows().iter().map(|row| row.to_vec()).collect()
}

fn board_from_rows<const N: usize>(rows: &[Vec<Card>]) -> Result<Board<N>> {
    if rows.len() != N {
        return Err(Error::InvalidSnapshot(format!(
            "expected {} rows, found {}",
            N,
            rows.len()
        )));
    }
    let mut slots = [[0; N]; N];
    for (y, (slot_row, row)) in slots.iter_mut().zip(rows).enumerate() {
        if row.len() != N {
            return Err(Error::InvalidSnapshot(format!(
                "row {} has {} cells, expected {}",
                y,
                row.len(),
                N
            )));
        }
        for (x, (slot, card)) in slot_row.iter_mut().zip(row).enumerate() {
            if *card != 0 && (*card < 2 || *card > MAX_TILE || !card.is_power_of_two()) {
                return Err(Error::InvalidSnapshot(format!(
                    "cell ({}, {}) holds {}, which is not a tile",
                    y, x, card
                )));
            }
            *slot = *card;
        }
    }
    Ok(Board::from_rows(slots))
}

impl GameState {
    /// Encode the state as the JSON snapshot format.
    pub(crate) fn to_json(&self) -> Result<String> {
        let saved = SavedState {
            board: rows_of(&self.board),
            score: self.score,
            game_over: self.game_over,
            previous_states: self
                .previous_states()
                .map(|s| SavedSnapshot {
                    board: rows_of(&s.board),
                    score: s.score,
                })
                .collect(),
            has_won: self.has_won,
        };
        Ok(serde_json::to_string(&saved)?)
    }

    /// Decode and validate a JSON snapshot.
    pub(crate) fn from_json(blob: &str) -> Result<Self> {
        let saved: SavedState = serde_json::from_str(blob)?;
        let mut history = saved
            .previous_states
            .iter()
            .map(|s| {
                Ok(Snapshot {
                    board: board_from_rows(&s.board)?,
                    score: s.score,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        history.reverse();
        Ok(Self {
            board: board_from_rows(&saved.board)?,
            score: saved.score,
            game_over: saved.game_over,
            has_won: saved.has_won,
            history,
        })
    }
}

/// Restore the saved session, or start a fresh one when there is nothing usable to restore.
pub(crate) fn load_or_seed(storage: &dyn Storage, rng: &mut dyn RngCore) -> GameState {
    let restored = storage
        .load()
        .and_then(|blob| blob.map(|b| GameState::from_json(&b)).transpose());
    match restored {
        Ok(Some(state)) => {
            log::info!(
                "restored saved game with score {} and {} undo steps",
                state.score,
                state.history.len()
            );
            state
        }
        Ok(None) => {
            log::info!("no saved game found, starting a new one");
            GameState::new(rng)
        }
        Err(e) => {
            log::warn!("discarding saved game: {}", e);
            GameState::new(rng)
        }
    }
}

/// Write the state to storage.
pub(crate) fn persist(storage: &mut dyn Storage, state: &GameState) -> Result<()> {
    storage.save(&state.to_json()?)
}

//! In-memory song catalog with a small seeded library.

use rand::seq::SliceRandom;

use crate::domain::error::CatalogError;
use crate::domain::game::{Difficulty, Song, SongLanguage};
use crate::domain::ports::SongCatalog;

#[derive(Debug, Clone)]
pub struct SongRecord {
    pub song: Song,
    pub difficulty: Difficulty,
    pub language: SongLanguage,
}

/// Catalog backed by a fixed song list. Selection is uniform over the
/// records matching the requested difficulty and language.
pub struct InMemorySongCatalog {
    records: Vec<SongRecord>,
}

impl InMemorySongCatalog {
    pub fn from_records(records: Vec<SongRecord>) -> Self {
        Self { records }
    }

    /// A starter library so a standalone server is playable out of the box.
    pub fn with_default_library() -> Self {
        let seed = [
            (1, "Volare", "Domenico Modugno", "pop", Difficulty::Easy, SongLanguage::Italian),
            (2, "Azzurro", "Adriano Celentano", "pop", Difficulty::Easy, SongLanguage::Italian),
            (3, "Citta Vuota", "Mina", "pop", Difficulty::Medium, SongLanguage::Italian),
            (4, "Sere Nere", "Tiziano Ferro", "pop", Difficulty::Medium, SongLanguage::Italian),
            (5, "Caruso", "Lucio Dalla", "ballad", Difficulty::Hard, SongLanguage::Italian),
            (6, "Yellow Submarine", "The Beatles", "rock", Difficulty::Easy, SongLanguage::English),
            (7, "Hotel California", "Eagles", "rock", Difficulty::Medium, SongLanguage::English),
            (8, "Bohemian Rhapsody", "Queen", "rock", Difficulty::Hard, SongLanguage::English),
        ];
        let records = seed
            .into_iter()
            .map(|(id, title, artist, genre, difficulty, language)| SongRecord {
                song: Song {
                    id,
                    title: title.to_string(),
                    artist: artist.to_string(),
                    genre: genre.to_string(),
                },
                difficulty,
                language,
            })
            .collect();
        Self::from_records(records)
    }
}

impl SongCatalog for InMemorySongCatalog {
    fn pick_song(
        &self,
        difficulty: Difficulty,
        language: SongLanguage,
    ) -> Result<Song, CatalogError> {
        let candidates: Vec<&SongRecord> = self
            .records
            .iter()
            .filter(|r| r.difficulty == difficulty)
            .filter(|r| language == SongLanguage::Any || r.language == language)
            .collect();
        let mut rng = rand::thread_rng();
        candidates
            .choose(&mut rng)
            .map(|record| record.song.clone())
            .ok_or(CatalogError::NoSongAvailable)
    }

    fn song_by_id(&self, id: u32) -> Option<Song> {
        self.records
            .iter()
            .find(|r| r.song.id == id)
            .map(|r| r.song.clone())
    }
}

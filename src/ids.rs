// Identifier source for tiles and pair keys
//
// Ids are UUIDs built from 128 random bits of the session RNG, so a seeded
// session reproduces the same ids. The source remembers every id it issued
// and redraws on collision; uniqueness holds per source (one per board).

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::types::{DotMergeError, Result};

/// Unique identifier of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(Uuid);

/// Identifier shared by the two tiles of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairKey(Uuid);

macro_rules! uuid_newtype {
    ($name:ident, $what:literal) => {
        impl $name {
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl FromStr for $name {
            type Err = DotMergeError;

            fn from_str(s: &str) -> Result<Self> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| DotMergeError::InvalidId(format!("{} '{}': {}", $what, s, e)))
            }
        }
    };
}

uuid_newtype!(TileId, "tile id");
uuid_newtype!(PairKey, "pair key");

/// Issues ids that never repeat within this source
#[derive(Debug, Default, Clone)]
pub struct IdSource {
    issued: HashSet<Uuid>,
}

impl IdSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tile_id<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TileId {
        TileId(self.next_uuid(rng))
    }

    pub fn pair_key<R: Rng + ?Sized>(&mut self, rng: &mut R) -> PairKey {
        PairKey(self.next_uuid(rng))
    }

    /// Number of ids issued so far
    pub fn issued(&self) -> usize {
        self.issued.len()
    }

    fn next_uuid<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Uuid {
        loop {
            let bytes: [u8; 16] = rng.gen();
            let id = uuid::Builder::from_random_bytes(bytes).into_uuid();
            if self.issued.insert(id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::seeded_rng;

    /// Yields a constant word `stuck` times, then distinct words
    struct StuckThenCounting {
        stuck: u32,
        counter: u64,
    }

    impl rand::RngCore for StuckThenCounting {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        fn next_u64(&mut self) -> u64 {
            if self.stuck > 0 {
                self.stuck -= 1;
                return 42;
            }
            self.counter += 1;
            self.counter
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for byte in dest.iter_mut() {
                *byte = self.next_u32() as u8;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut rng = seeded_rng("ids");
        let mut source = IdSource::new();
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(*source.tile_id(&mut rng).as_uuid()));
            assert!(seen.insert(*source.pair_key(&mut rng).as_uuid()));
        }
        assert_eq!(source.issued(), 2000);
    }

    #[test]
    fn test_collision_is_redrawn() {
        // One uuid takes 16 words, so the first two draws are identical.
        let mut rng = StuckThenCounting { stuck: 32, counter: 0 };
        let mut source = IdSource::new();

        let first = source.tile_id(&mut rng);
        let second = source.tile_id(&mut rng);
        assert_ne!(first, second);
        assert_eq!(source.issued(), 2);
    }

    #[test]
    fn test_seeded_ids_are_reproducible() {
        let a = IdSource::new().tile_id(&mut seeded_rng("same"));
        let b = IdSource::new().tile_id(&mut seeded_rng("same"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_ids_are_v4_uuids() {
        let id = IdSource::new().pair_key(&mut seeded_rng("v4"));
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        let id = IdSource::new().tile_id(&mut seeded_rng("display"));
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(text.parse::<TileId>().unwrap(), id);

        let err = "not-a-tile".parse::<TileId>().unwrap_err();
        assert!(matches!(err, DotMergeError::InvalidId(_)));
    }

    #[test]
    fn test_serializes_as_string() {
        let id = IdSource::new().tile_id(&mut seeded_rng("json"));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}

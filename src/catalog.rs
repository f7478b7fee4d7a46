use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context as _;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::fuzzy;

const CATALOG_FILE: &str = "data/Phigros.json";
const TIPS_FILE: &str = "data/tips.json";

/// One playable chart of a song. Every field is display text taken
/// verbatim from the catalog document.
#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub level: String,
    pub difficulty: String,
    pub combo: String,
    pub charter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Song {
    pub song: String,
    pub illustration: String,
    pub illustration_big: String,
    pub bpm: String,
    pub composer: String,
    pub length: String,
    pub illustrator: String,
    pub chart: BTreeMap<String, Chart>,
}

impl Song {
    /// `"{label}: {value}"` lines for the song-level fields.
    pub fn basic_info(&self) -> String {
        let fields: [(&str, &str); 7] = [
            ("歌名", &self.song),
            ("曲绘", &self.illustration),
            ("高清曲绘", &self.illustration_big),
            ("BPM", &self.bpm),
            ("曲师", &self.composer),
            ("长度", &self.length),
            ("画师", &self.illustrator),
        ];

        fields
            .iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Basic fields plus one block per difficulty, blank-line separated.
    pub fn full_info(&self) -> String {
        let mut blocks = vec![self.basic_info()];
        for (difficulty, chart) in &self.chart {
            blocks.push(format!("{difficulty}\n{}", chart.info()));
        }
        blocks.join("\n\n")
    }
}

impl Chart {
    pub fn info(&self) -> String {
        let fields: [(&str, &str); 4] = [
            ("等级", &self.level),
            ("定数", &self.difficulty),
            ("Max Combo", &self.combo),
            ("谱师", &self.charter),
        ];

        fields
            .iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Outcome of a fuzzy song lookup. A miss is a reply, not an error.
pub enum Lookup<'a> {
    Found {
        name: &'a str,
        song: &'a Song,
        score: u8,
    },
    NotFound {
        score: u8,
    },
}

/// The song catalog, keyed by song name. Loaded once, read-only after.
#[derive(Debug, Deserialize)]
pub struct Catalog(BTreeMap<String, Song>);

impl Catalog {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(CATALOG_FILE)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read song catalog {}", path.display()))?;
        let catalog = serde_json::from_str(&raw)
            .with_context(|| format!("malformed song catalog {}", path.display()))?;
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn random_song(&self) -> Option<(&str, &Song)> {
        if self.0.is_empty() {
            return None;
        }

        let idx = rand::thread_rng().gen_range(0..self.0.len());
        self.0.iter().nth(idx).map(|(name, song)| (name.as_str(), song))
    }

    /// Scores every song name against `query` and keeps the single best.
    ///
    /// Ties keep the first hit in key order, so equal top scores resolve to
    /// the lexicographically smallest name. A top score of 0 (including an
    /// empty catalog) is a miss.
    pub fn lookup(&self, query: &str) -> Lookup<'_> {
        let mut best: Option<(&str, &Song, u8)> = None;

        for (name, song) in &self.0 {
            let score = fuzzy::token_sort_ratio(query, name);
            if best.is_none_or(|(_, _, top)| score > top) {
                best = Some((name, song, score));
            }
        }

        match best {
            Some((name, song, score)) if score > 0 => Lookup::Found { name, song, score },
            _ => Lookup::NotFound { score: 0 },
        }
    }
}

/// All tips flattened into one list; category grouping is discarded.
#[derive(Debug)]
pub struct Tips(Vec<String>);

impl Tips {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(TIPS_FILE)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read tips {}", path.display()))?;
        let by_category: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw)
            .with_context(|| format!("malformed tips {}", path.display()))?;
        Ok(Self(by_category.into_values().flatten().collect()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn random_tip(&self) -> Option<&str> {
        self.0.choose(&mut rand::thread_rng()).map(String::as_str)
    }
}

/// Immutable per-process state shared with every handler.
pub struct Context {
    pub catalog: Catalog,
    pub tips: Tips,
}

impl Context {
    pub fn load() -> anyhow::Result<Self> {
        let catalog = Catalog::load()?;
        tracing::info!("song catalog loaded, {} songs", catalog.len());

        let tips = Tips::load()?;
        tracing::info!("tips loaded, {} entries", tips.len());

        Ok(Self { catalog, tips })
    }
}

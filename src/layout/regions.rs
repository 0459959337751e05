use serde::Serialize;

use crate::ir::Category;

/// Semantic container on the 3x3 layout grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Region {
    Attentional,
    Cognitive,
    SelfConcept,
    Affective,
    Context,
    Motivational,
    Biophysiological,
    Behavioral,
    Sociocultural,
}

impl Region {
    /// Row-major order: top row first, left to right.
    pub const ALL: [Region; 9] = [
        Region::Attentional,
        Region::Cognitive,
        Region::SelfConcept,
        Region::Affective,
        Region::Context,
        Region::Motivational,
        Region::Biophysiological,
        Region::Behavioral,
        Region::Sociocultural,
    ];

    pub fn index(self) -> usize {
        match self {
            Region::Attentional => 0,
            Region::Cognitive => 1,
            Region::SelfConcept => 2,
            Region::Affective => 3,
            Region::Context => 4,
            Region::Motivational => 5,
            Region::Biophysiological => 6,
            Region::Behavioral => 7,
            Region::Sociocultural => 8,
        }
    }

    pub fn row(self) -> usize {
        self.index() / 3
    }

    pub fn column(self) -> usize {
        self.index() % 3
    }

    /// Stable container id handed to the renderer.
    pub fn container_id(self) -> &'static str {
        match self {
            Region::Attentional => "region-attentional",
            Region::Cognitive => "region-cognitive",
            Region::SelfConcept => "region-self",
            Region::Affective => "region-affective",
            Region::Context => "region-context",
            Region::Motivational => "region-motivational",
            Region::Biophysiological => "region-biophysiological",
            Region::Behavioral => "region-behavioral",
            Region::Sociocultural => "region-sociocultural",
        }
    }

    /// Category the region is titled after.
    pub fn category(self) -> Category {
        match self {
            Region::Attentional => Category::Attentional,
            Region::Cognitive => Category::Cognitive,
            Region::SelfConcept => Category::SelfConcept,
            Region::Affective => Category::Affective,
            Region::Context => Category::Context,
            Region::Motivational => Category::Motivational,
            Region::Biophysiological => Category::Biophysiological,
            Region::Behavioral => Category::Behavioral,
            Region::Sociocultural => Category::Sociocultural,
        }
    }
}

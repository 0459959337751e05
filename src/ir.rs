use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::layout::Region;

/// Word list used when categories and enum tokens are written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vocabulary {
    #[default]
    Portuguese,
    English,
}

/// Clinical domain of a process.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Cognitive,
    Affective,
    Behavioral,
    SelfConcept,
    Context,
    Motivational,
    Sociocultural,
    Attentional,
    Biophysiological,
    Intervention,
    /// Unrecognised category string, kept verbatim so it can be exported again.
    Other(String),
}

static CATEGORY_ALIASES: Lazy<HashMap<&'static str, Category>> = Lazy::new(|| {
    [
        ("cognitiva", Category::Cognitive),
        ("cognitivo", Category::Cognitive),
        ("cognitive", Category::Cognitive),
        ("afetiva", Category::Affective),
        ("afetivo", Category::Affective),
        ("affective", Category::Affective),
        ("comportamento", Category::Behavioral),
        ("comportamental", Category::Behavioral),
        ("behavioral", Category::Behavioral),
        ("behavioural", Category::Behavioral),
        ("self", Category::SelfConcept),
        ("eu", Category::SelfConcept),
        ("contexto", Category::Context),
        ("context", Category::Context),
        ("motivacional", Category::Motivational),
        ("motivational", Category::Motivational),
        ("sociocultural", Category::Sociocultural),
        ("atencional", Category::Attentional),
        ("attentional", Category::Attentional),
        ("biofisiologica", Category::Biophysiological),
        ("biofisiologico", Category::Biophysiological),
        ("biophysiological", Category::Biophysiological),
        ("intervencao", Category::Intervention),
        ("intervention", Category::Intervention),
    ]
    .into_iter()
    .collect()
});

impl Category {
    pub const KNOWN: [Category; 10] = [
        Category::Cognitive,
        Category::Affective,
        Category::Behavioral,
        Category::SelfConcept,
        Category::Context,
        Category::Motivational,
        Category::Sociocultural,
        Category::Attentional,
        Category::Biophysiological,
        Category::Intervention,
    ];

    /// Parses a category name in either vocabulary. Never fails: anything
    /// unrecognised becomes `Category::Other` with the original text.
    pub fn parse(raw: &str) -> Self {
        let key = normalize_token(raw);
        CATEGORY_ALIASES
            .get(key.as_str())
            .cloned()
            .unwrap_or_else(|| Category::Other(raw.trim().to_string()))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }

    pub fn label(&self, vocabulary: Vocabulary) -> &str {
        use Vocabulary::*;
        match (self, vocabulary) {
            (Category::Cognitive, Portuguese) => "Cognitiva",
            (Category::Cognitive, English) => "Cognitive",
            (Category::Affective, Portuguese) => "Afetiva",
            (Category::Affective, English) => "Affective",
            (Category::Behavioral, Portuguese) => "Comportamento",
            (Category::Behavioral, English) => "Behavioral",
            (Category::SelfConcept, _) => "Self",
            (Category::Context, Portuguese) => "Contexto",
            (Category::Context, English) => "Context",
            (Category::Motivational, Portuguese) => "Motivacional",
            (Category::Motivational, English) => "Motivational",
            (Category::Sociocultural, _) => "Sociocultural",
            (Category::Attentional, Portuguese) => "Atencional",
            (Category::Attentional, English) => "Attentional",
            (Category::Biophysiological, Portuguese) => "Biofisiológica",
            (Category::Biophysiological, English) => "Biophysiological",
            (Category::Intervention, Portuguese) => "Intervenção",
            (Category::Intervention, English) => "Intervention",
            (Category::Other(raw), _) => raw.as_str(),
        }
    }

    /// Layout region the category lives in. Intervention shares the
    /// Behavioral region; unknown categories land in Context.
    pub fn region(&self) -> Region {
        match self {
            Category::Cognitive => Region::Cognitive,
            Category::Affective => Region::Affective,
            Category::Behavioral | Category::Intervention => Region::Behavioral,
            Category::SelfConcept => Region::SelfConcept,
            Category::Context | Category::Other(_) => Region::Context,
            Category::Motivational => Region::Motivational,
            Category::Sociocultural => Region::Sociocultural,
            Category::Attentional => Region::Attentional,
            Category::Biophysiological => Region::Biophysiological,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChangeStatus {
    Increased,
    Decreased,
    #[default]
    Stable,
    New,
}

impl ChangeStatus {
    pub fn from_token(token: &str) -> Option<Self> {
        match normalize_token(token).as_str() {
            "increased" | "aumentou" | "aumentado" | "aumento" => Some(Self::Increased),
            "decreased" | "diminuiu" | "diminuido" | "diminuicao" => Some(Self::Decreased),
            "stable" | "estavel" | "mantido" => Some(Self::Stable),
            "new" | "novo" | "nova" => Some(Self::New),
            _ => None,
        }
    }

    pub fn token(self, vocabulary: Vocabulary) -> &'static str {
        match (self, vocabulary) {
            (Self::Increased, Vocabulary::Portuguese) => "aumentou",
            (Self::Increased, Vocabulary::English) => "increased",
            (Self::Decreased, Vocabulary::Portuguese) => "diminuiu",
            (Self::Decreased, Vocabulary::English) => "decreased",
            (Self::Stable, Vocabulary::Portuguese) => "estavel",
            (Self::Stable, Vocabulary::English) => "stable",
            (Self::New, Vocabulary::Portuguese) => "novo",
            (Self::New, Vocabulary::English) => "new",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Weight {
    Weak,
    #[default]
    Moderate,
    Strong,
}

impl Weight {
    pub fn from_token(token: &str) -> Option<Self> {
        match normalize_token(token).as_str() {
            "weak" | "fraca" | "fraco" => Some(Self::Weak),
            "moderate" | "moderada" | "moderado" => Some(Self::Moderate),
            "strong" | "forte" => Some(Self::Strong),
            _ => None,
        }
    }

    pub fn token(self, vocabulary: Vocabulary) -> &'static str {
        match (self, vocabulary) {
            (Self::Weak, Vocabulary::Portuguese) => "fraca",
            (Self::Weak, Vocabulary::English) => "weak",
            (Self::Moderate, Vocabulary::Portuguese) => "moderada",
            (Self::Moderate, Vocabulary::English) => "moderate",
            (Self::Strong, Vocabulary::Portuguese) => "forte",
            (Self::Strong, Vocabulary::English) => "strong",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Polarity {
    #[default]
    Positive,
    Negative,
}

impl Polarity {
    pub fn from_token(token: &str) -> Option<Self> {
        match normalize_token(token).as_str() {
            "positive" | "positiva" | "positivo" | "+" => Some(Self::Positive),
            "negative" | "negativa" | "negativo" | "-" => Some(Self::Negative),
            _ => None,
        }
    }

    pub fn token(self, vocabulary: Vocabulary) -> &'static str {
        match (self, vocabulary) {
            (Self::Positive, Vocabulary::Portuguese) => "positiva",
            (Self::Positive, Vocabulary::English) => "positive",
            (Self::Negative, Vocabulary::Portuguese) => "negativa",
            (Self::Negative, Vocabulary::English) => "negative",
        }
    }
}

/// One of the four anchor points on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl HandleSide {
    pub fn opposite(self) -> Self {
        match self {
            HandleSide::Top => HandleSide::Bottom,
            HandleSide::Right => HandleSide::Left,
            HandleSide::Bottom => HandleSide::Top,
            HandleSide::Left => HandleSide::Right,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, HandleSide::Left | HandleSide::Right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A process in the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub category: Category,
    pub change: ChangeStatus,
    pub is_target: bool,
    pub is_moderator: bool,
    /// Top-left corner, relative to the region container.
    pub position: Point,
    pub region: Region,
}

/// A relation between two processes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub relation: String,
    pub weight: Weight,
    pub polarity: Polarity,
    pub bidirectional: bool,
    pub reverse_weight: Option<Weight>,
    pub reverse_polarity: Option<Polarity>,
    pub source_handle: Option<HandleSide>,
    pub target_handle: Option<HandleSide>,
}

impl Edge {
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Weight of the target→source direction, `None` for one-way relations.
    pub fn effective_reverse_weight(&self) -> Option<Weight> {
        self.bidirectional
            .then(|| self.reverse_weight.unwrap_or(self.weight))
    }

    pub fn effective_reverse_polarity(&self) -> Option<Polarity> {
        self.bidirectional
            .then(|| self.reverse_polarity.unwrap_or(self.polarity))
    }

    /// Drops reverse fields on one-way relations.
    pub(crate) fn normalize_reverse(&mut self) {
        if !self.bidirectional {
            self.reverse_weight = None;
            self.reverse_polarity = None;
        }
    }
}

/// Everything needed to create a node; position and region are layout-owned.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub id: Option<String>,
    pub label: String,
    pub category: Category,
    pub change: ChangeStatus,
    pub is_target: bool,
    pub is_moderator: bool,
}

impl NodeSpec {
    pub fn new(label: impl Into<String>, category: Category) -> Self {
        Self {
            id: None,
            label: label.into(),
            category,
            change: ChangeStatus::default(),
            is_target: false,
            is_moderator: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    pub relation: String,
    pub weight: Weight,
    pub polarity: Polarity,
    pub bidirectional: bool,
    pub reverse_weight: Option<Weight>,
    pub reverse_polarity: Option<Polarity>,
    pub source_handle: Option<HandleSide>,
    pub target_handle: Option<HandleSide>,
}

impl EdgeSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
            relation: String::new(),
            weight: Weight::default(),
            polarity: Polarity::default(),
            bidirectional: false,
            reverse_weight: None,
            reverse_polarity: None,
            source_handle: None,
            target_handle: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub label: Option<String>,
    pub category: Option<Category>,
    pub change: Option<ChangeStatus>,
    pub is_target: Option<bool>,
    pub is_moderator: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgePatch {
    pub relation: Option<String>,
    pub weight: Option<Weight>,
    pub polarity: Option<Polarity>,
    pub bidirectional: Option<bool>,
    pub reverse_weight: Option<Option<Weight>>,
    pub reverse_polarity: Option<Option<Polarity>>,
}

/// Lowercases and strips Portuguese diacritics so "Biofisiológica" and
/// "biofisiologica" compare equal.
pub(crate) fn normalize_token(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|ch| match ch {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

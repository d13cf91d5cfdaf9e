use anyhow::{Context, Result};
use serde_json::Value;

/// One decoded metric value. Anything that is not a finite number in `[0, 1]`
/// is `Invalid`; absent fields never become a `ScoreValue` at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreValue {
    Fraction(f64),
    Invalid,
}

impl ScoreValue {
    pub fn from_json(value: &Value) -> Self {
        match value.as_f64() {
            Some(v) => Self::from_f64(v),
            None => ScoreValue::Invalid,
        }
    }

    pub fn from_f64(v: f64) -> Self {
        if v.is_finite() && (0.0..=1.0).contains(&v) {
            ScoreValue::Fraction(v)
        } else {
            ScoreValue::Invalid
        }
    }

    pub fn fraction(self) -> Option<f64> {
        match self {
            ScoreValue::Fraction(v) => Some(v),
            ScoreValue::Invalid => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreRecord {
    fields: Vec<(String, ScoreValue)>,
}

impl ScoreRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ScoreValue) {
        let key = key.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: ScoreValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<ScoreValue> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, ScoreValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn from_json_object(obj: &serde_json::Map<String, Value>) -> Self {
        let fields = obj
            .iter()
            .map(|(k, v)| (k.clone(), ScoreValue::from_json(v)))
            .collect();
        Self { fields }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawScoreFrame {
    entries: Vec<(String, ScoreRecord)>,
}

impl RawScoreFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x_label: impl Into<String>, record: ScoreRecord) {
        self.entries.push((x_label.into(), record));
    }

    pub fn with(mut self, x_label: impl Into<String>, record: ScoreRecord) -> Self {
        self.push(x_label, record);
        self
    }

    pub fn entries(&self) -> &[(String, ScoreRecord)] {
        &self.entries
    }

    pub fn first_record(&self) -> Option<&ScoreRecord> {
        self.entries.first().map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decodes an already parsed JSON value. Non-object records decode as empty
    /// records; a non-object root decodes as an empty frame.
    pub fn from_json_value(value: &Value) -> Self {
        let Some(root) = value.as_object() else {
            return Self::default();
        };
        let entries = root
            .iter()
            .map(|(x, rec)| {
                let record = rec
                    .as_object()
                    .map(ScoreRecord::from_json_object)
                    .unwrap_or_default();
                (x.clone(), record)
            })
            .collect();
        Self { entries }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_str(trimmed).context("invalid scores json")?;
        Ok(Self::from_json_value(&value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricCategory {
    Talent,
    Score,
    Other,
}

impl MetricCategory {
    pub const ALL: [MetricCategory; 3] = [
        MetricCategory::Talent,
        MetricCategory::Score,
        MetricCategory::Other,
    ];

    pub fn of(key: &str) -> Self {
        let lower = key.to_lowercase();
        if lower.contains("talent") {
            MetricCategory::Talent
        } else if lower.contains("score") {
            MetricCategory::Score
        } else {
            MetricCategory::Other
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricCategory::Talent => "Talents",
            MetricCategory::Score => "Scores",
            MetricCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaPolicy {
    FirstRecord,
    #[default]
    Union,
}

impl SchemaPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "first" | "first_record" => Some(SchemaPolicy::FirstRecord),
            "union" | "all" => Some(SchemaPolicy::Union),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryKeys {
    pub talent: Vec<String>,
    pub score: Vec<String>,
    pub other: Vec<String>,
}

impl CategoryKeys {
    pub fn get(&self, category: MetricCategory) -> &[String] {
        match category {
            MetricCategory::Talent => &self.talent,
            MetricCategory::Score => &self.score,
            MetricCategory::Other => &self.other,
        }
    }

    fn push(&mut self, key: &str) {
        let bucket = match MetricCategory::of(key) {
            MetricCategory::Talent => &mut self.talent,
            MetricCategory::Score => &mut self.score,
            MetricCategory::Other => &mut self.other,
        };
        bucket.push(key.to_string());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub plottable: Vec<String>,
    pub by_category: CategoryKeys,
}

impl Classification {
    fn from_keys(plottable: Vec<String>) -> Self {
        let mut by_category = CategoryKeys::default();
        for key in &plottable {
            by_category.push(key);
        }
        Self {
            plottable,
            by_category,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.plottable.is_empty()
    }

    pub fn keys_in(&self, category: MetricCategory) -> &[String] {
        self.by_category.get(category)
    }

    pub fn populated_categories(&self) -> Vec<MetricCategory> {
        MetricCategory::ALL
            .into_iter()
            .filter(|c| !self.keys_in(*c).is_empty())
            .collect()
    }
}

pub fn classify(sample: &ScoreRecord) -> Classification {
    let plottable = sample
        .fields()
        .filter(|(_, v)| matches!(v, ScoreValue::Fraction(_)))
        .map(|(k, _)| k.to_string())
        .collect();
    Classification::from_keys(plottable)
}

pub fn classify_frame(frame: &RawScoreFrame, policy: SchemaPolicy) -> Classification {
    match policy {
        SchemaPolicy::FirstRecord => frame
            .first_record()
            .map(classify)
            .unwrap_or_default(),
        SchemaPolicy::Union => {
            let mut keys: Vec<String> = Vec::new();
            for (_, record) in frame.entries() {
                for (key, value) in record.fields() {
                    if matches!(value, ScoreValue::Fraction(_)) && !keys.iter().any(|k| k == key) {
                        keys.push(key.to_string());
                    }
                }
            }
            Classification::from_keys(keys)
        }
    }
}

/// `growth_talent_score` -> `Growth Talent Score`.
pub fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut prev_word = false;
    for ch in key.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        let is_word = ch.is_alphanumeric();
        if is_word && !prev_word {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        prev_word = is_word;
    }
    out
}

pub fn short_label(key: &str) -> String {
    let title = title_case(key);
    let stripped = match MetricCategory::of(key) {
        MetricCategory::Talent => title.replacen("Talent", "", 1),
        MetricCategory::Score => title.replacen("Score", "", 1),
        MetricCategory::Other => title.clone(),
    };
    let stripped = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if stripped.is_empty() { title } else { stripped }
}

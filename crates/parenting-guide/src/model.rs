use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Logical fields of a guidance row.
///
/// Source tables spell column names in several ways; each field carries its
/// alias list and the first alias present in a row wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Keywords,
    Title,
    Guidance,
    Soothing,
    Explanatory,
    Reflection,
    Topic,
    Hall,
    ToolCode,
    ToolName,
    ToolUrl,
    Video1,
    Video2,
}

impl Field {
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Keywords => &["關鍵字", "keywords", "keyword", "KeyWords"],
            Field::Title => &["標題", "title", "主題", "相關主題"],
            Field::Guidance => &["智慧引導", "核心理念", "引導", "內容", "guidance", "content"],
            Field::Soothing => &["心靈安撫", "安撫", "soothing"],
            Field::Explanatory => &["腦科學", "腦科學解釋", "explanatory"],
            Field::Reflection => &["思考引導", "課題分離提問", "提問", "reflection", "thinkingPrompt"],
            Field::Topic => &["相關主題", "主題", "topic", "C欄"],
            Field::Hall => &["目標分頁", "展示廳", "展廳", "D欄", "targetPage", "hall"],
            Field::ToolCode => &["推薦工具編號", "工具編號", "E欄", "toolId", "toolCode"],
            Field::ToolName => &["工具名稱", "F欄", "toolName"],
            Field::ToolUrl => &["工具錦囊", "工具網址", "G欄", "toolUrl"],
            Field::Video1 => &["影片錦囊1", "影片連結1", "H欄", "video1"],
            Field::Video2 => &["影片錦囊2", "影片連結2", "I欄", "video2"],
        }
    }
}

/// Column names marking a row as part of the guidance table proper, as opposed to
/// rows from unrelated sheets merged into the same payload.
pub const GUIDANCE_BEARING_KEYS: &[&str] = &[
    "關鍵字",
    "keywords",
    "智慧引導",
    "guidance",
    "工具錦囊",
    "toolUrl",
    "影片錦囊1",
    "video1",
    "影片錦囊2",
    "video2",
    "思考引導",
    "reflection",
    "thinkingPrompt",
];

/// One row of the guidance table. Keys and values are trimmed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    fields: BTreeMap<String, String>,
}

impl Entry {
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().trim().to_string(), v.as_ref().trim().to_string()))
            .collect();
        Self { fields }
    }

    /// Value of the first alias present in this row, or `""`.
    pub fn get(&self, field: Field) -> &str {
        field
            .aliases()
            .iter()
            .find_map(|alias| self.fields.get(*alias))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn has_any_key(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.fields.contains_key(*k))
    }

    /// Rows with neither keywords nor any guidance text (combined or pre-split)
    /// carry nothing to match or show.
    pub fn is_blank(&self) -> bool {
        [Field::Keywords, Field::Guidance, Field::Soothing, Field::Explanatory]
            .into_iter()
            .all(|field| self.get(field).is_empty())
    }
}

/// The in-memory guidance table at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    pub entries: Vec<Entry>,
    /// SHA-256 of the source body this library was parsed from.
    pub fingerprint: Option<String>,
    pub loaded_at_ms: Option<u64>,
}

impl Library {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Tool,
    Video,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Tool => "tool",
            ActionKind::Video => "video",
        }
    }
}

/// A link offered next to a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLink {
    pub kind: ActionKind,
    pub label: String,
    pub url: String,
    pub title: Option<String>,
    pub video_id: Option<String>,
}

/// Recommendation derived from one ranked entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationCard {
    pub topic: String,
    pub hall: String,
    pub tool_code: String,
    pub tool_name: String,
    pub thumbnail_url: Option<String>,
    pub tool_pending: bool,
    pub actions: Vec<ActionLink>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_uses_first_present_alias_and_defaults_to_empty() {
        let entry = Entry::from_pairs([("keywords", " 尖叫 "), ("KeyWords", "ignored")]);
        assert_eq!(entry.get(Field::Keywords), "尖叫");
        assert_eq!(entry.get(Field::Guidance), "");

        let chinese = Entry::from_pairs([("關鍵字", "吵架"), ("keywords", "other")]);
        assert_eq!(chinese.get(Field::Keywords), "吵架");
    }

    #[test]
    fn keys_are_trimmed() {
        let entry = Entry::from_pairs([(" 智慧引導 ", "先抱抱自己")]);
        assert_eq!(entry.get(Field::Guidance), "先抱抱自己");
        assert!(entry.has_any_key(GUIDANCE_BEARING_KEYS));
    }

    #[test]
    fn blank_rows_carry_no_keywords_or_guidance_text() {
        assert!(Entry::from_pairs([("相關主題", "情緒")]).is_blank());
        assert!(!Entry::from_pairs([("內容", "text")]).is_blank());
        assert!(!Entry::from_pairs([("keyword", "吼")]).is_blank());
        assert!(!Entry::from_pairs([("心靈安撫", "先抱抱自己")]).is_blank());
        assert!(!Entry::from_pairs([("腦科學", "杏仁核接管")]).is_blank());
    }
}

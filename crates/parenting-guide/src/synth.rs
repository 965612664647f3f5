/// Content synthesis: turns the ranked entries into a soothing segment, an
/// explanatory segment, a reflection prompt, and recommendation cards.
use crate::model::{ActionKind, ActionLink, Entry, Field, RecommendationCard};
use crate::mood::{Mood, MoodLexicon};
use crate::video::{extract_video_id, thumbnail_url};

const SENTENCE_TERMINATORS: &[char] = &['。', '！', '？', '!', '?', '\n'];

const DEFAULT_TOPIC: &str = "推薦內容";
const TOOL_LABEL: &str = "🚀 取用工具";
const VIDEO1_LABEL: &str = "🎬 影片 1";
const VIDEO2_LABEL: &str = "🎬 影片 2";

/// Marker and term lists driving [`split_guidance`].
#[derive(Debug, Clone)]
pub struct SplitRules {
    /// Searched in priority order; the first one found marks the start of the explanation.
    pub markers: Vec<String>,
    /// A sentence containing any of these is explanatory.
    pub explanatory_terms: Vec<String>,
}

impl Default for SplitRules {
    fn default() -> Self {
        Self {
            markers: ["💡", "科學", "腦", "杏仁核", "前額葉", "PFC"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            explanatory_terms: [
                "杏仁核", "前額葉", "PFC", "壓力", "交感", "皮質醇", "多巴胺", "神經", "戰或逃",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Raw halves of a guidance text. Either side may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidanceSplit {
    pub soothing: String,
    pub explanatory: String,
}

/// Split combined guidance into soothing and explanatory parts.
///
/// A marker found past the start cuts the text in two. Otherwise sentences are
/// classified one by one and each class is joined with blank lines.
pub fn split_guidance(text: &str, rules: &SplitRules) -> GuidanceSplit {
    let text = text.trim();
    if text.is_empty() {
        return GuidanceSplit {
            soothing: String::new(),
            explanatory: String::new(),
        };
    }

    let cut = rules
        .markers
        .iter()
        .filter(|m| !m.is_empty())
        .find_map(|m| text.find(m.as_str()));

    if let Some(idx) = cut.filter(|&idx| idx > 0) {
        return GuidanceSplit {
            soothing: text[..idx].trim().to_string(),
            explanatory: text[idx..].trim().to_string(),
        };
    }

    let (explanatory, soothing): (Vec<&str>, Vec<&str>) = sentences(text)
        .into_iter()
        .partition(|s| rules.explanatory_terms.iter().any(|t| s.contains(t.as_str())));

    GuidanceSplit {
        soothing: soothing.join("\n\n"),
        explanatory: explanatory.join("\n\n"),
    }
}

/// Sentences ending after `。！？!?` or a newline, trimmed, empties dropped.
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        if SENTENCE_TERMINATORS.contains(&c) {
            let end = idx + c.len_utf8();
            out.push(text[start..end].trim());
            start = end;
        }
    }
    out.push(text[start..].trim());
    out.retain(|s| !s.is_empty());
    out
}

pub fn default_soothing(mood: Mood) -> String {
    match mood {
        Mood::Warm => "你已經撐了很久，累是正常的，不代表你做得不好。\n\n\
                       先把肩膀放下來，讓自己喘一口氣。\n\n\
                       你不是壞，你只是太累、太撐，反應跑得比理性快。"
            .to_string(),
        Mood::Steady => "你願意停下來問這一句，就已經很不容易了。\n\n\
                         先不用急著把自己做得更好，先讓心有一點點空間。\n\n\
                         你不是壞，你只是太累、太撐，反應跑得比理性快。"
            .to_string(),
        Mood::Night => "夜裡的情緒總是特別重，睡不著的你並不孤單。\n\n\
                        現在不需要解決所有事，只要先讓呼吸慢下來。\n\n\
                        明天的事，明天的你會有力氣處理。"
            .to_string(),
    }
}

pub fn default_explanatory() -> String {
    "當我們在壓力下，大腦會優先啟動「保命模式」：警報系統（像杏仁核）變得很敏感，理性與剎車（前額葉）就比較慢跟上。\n\n\
     所以你會覺得「我知道不該吼，但就是停不下來」，這不是你沒修養，而是大腦在高壓下的正常現象。\n\n\
     先把警報降下來，前額葉才回得來，溝通才會有效。"
        .to_string()
}

pub fn default_reflection() -> String {
    "（課題分離）\n\
     1) 這件事裡，哪一段是「我的課題」？哪一段是「孩子的課題」？\n\
     2) 我此刻最想守住的，是界線？尊重？安全感？\n\
     3) 我能做的「下一小步」是什麼？（小到今天就做得到）"
        .to_string()
}

/// Everything the presenter needs for a matched query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub mood: Mood,
    pub opening: String,
    pub soothing: String,
    pub explanatory: String,
    pub reflection: String,
    pub cards: Vec<RecommendationCard>,
}

#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    rules: SplitRules,
    lexicon: MoodLexicon,
}

impl Synthesizer {
    pub fn new(rules: SplitRules, lexicon: MoodLexicon) -> Self {
        Self { rules, lexicon }
    }

    /// Build the response for `ranked` (best first). `None` when nothing matched.
    pub fn synthesize(&self, query: &str, ranked: &[&Entry]) -> Option<Synthesis> {
        let top = *ranked.first()?;
        let mood = self.lexicon.classify(query);

        let (soothing, explanatory) = self.segments(top);
        let soothing = non_empty_or(soothing, || default_soothing(mood));
        let explanatory = non_empty_or(explanatory, default_explanatory);

        Some(Synthesis {
            mood,
            opening: mood.opening().to_string(),
            soothing,
            explanatory,
            reflection: reflection(ranked),
            cards: ranked.iter().map(|e| build_card(e)).collect(),
        })
    }

    fn segments(&self, top: &Entry) -> (String, String) {
        let pre_soothing = top.get(Field::Soothing);
        let pre_explanatory = top.get(Field::Explanatory);
        if !pre_soothing.is_empty() || !pre_explanatory.is_empty() {
            return (pre_soothing.to_string(), pre_explanatory.to_string());
        }

        let split = split_guidance(top.get(Field::Guidance), &self.rules);
        (split.soothing, split.explanatory)
    }
}

fn non_empty_or(text: String, fallback: impl FnOnce() -> String) -> String {
    if text.trim().is_empty() {
        fallback()
    } else {
        text
    }
}

/// Top entry's own prompt, else the others' prompts joined, else the journaling template.
fn reflection(ranked: &[&Entry]) -> String {
    let Some((top, rest)) = ranked.split_first() else {
        return default_reflection();
    };
    let own = top.get(Field::Reflection);
    if !own.is_empty() {
        return own.to_string();
    }

    let borrowed: Vec<&str> = rest
        .iter()
        .map(|e| e.get(Field::Reflection))
        .filter(|r| !r.is_empty())
        .collect();
    if borrowed.is_empty() {
        default_reflection()
    } else {
        borrowed.join("\n\n")
    }
}

pub fn build_card(entry: &Entry) -> RecommendationCard {
    let topic = entry.get(Field::Topic);
    let tool_url = entry.get(Field::ToolUrl);
    let tool_name = entry.get(Field::ToolName);

    let mut actions = Vec::new();
    if !tool_url.is_empty() {
        actions.push(ActionLink {
            kind: ActionKind::Tool,
            label: TOOL_LABEL.to_string(),
            url: tool_url.to_string(),
            title: (!tool_name.is_empty()).then(|| tool_name.to_string()),
            video_id: None,
        });
    }

    let mut thumbnail = None;
    for (field, label) in [(Field::Video1, VIDEO1_LABEL), (Field::Video2, VIDEO2_LABEL)] {
        let url = entry.get(field);
        if url.is_empty() {
            continue;
        }
        let video_id = extract_video_id(url);
        if thumbnail.is_none() {
            thumbnail = video_id.as_deref().map(thumbnail_url);
        }
        actions.push(ActionLink {
            kind: ActionKind::Video,
            label: label.to_string(),
            url: url.to_string(),
            title: None,
            video_id,
        });
    }

    RecommendationCard {
        topic: if topic.is_empty() {
            DEFAULT_TOPIC.to_string()
        } else {
            topic.to_string()
        },
        hall: entry.get(Field::Hall).to_string(),
        tool_code: entry.get(Field::ToolCode).to_string(),
        tool_name: tool_name.to_string(),
        thumbnail_url: thumbnail,
        tool_pending: tool_url.is_empty(),
        actions,
    }
}

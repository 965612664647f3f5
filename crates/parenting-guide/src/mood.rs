/// Emotional-tone heuristic used to pick phrasing. It never influences ranking.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Warm,
    Steady,
    Night,
}

impl Mood {
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Warm => "warm",
            Mood::Steady => "steady",
            Mood::Night => "night",
        }
    }

    /// Short line opening every response in this mood.
    pub fn opening(self) -> &'static str {
        match self {
            Mood::Warm => "辛苦了，先讓自己靠一下，我們慢慢來。",
            Mood::Steady => "我們一起把這件事拆開來看。",
            Mood::Night => "夜深了，先照顧好此刻的自己。",
        }
    }
}

/// Word lists behind [`MoodLexicon::classify`].
#[derive(Debug, Clone)]
pub struct MoodLexicon {
    pub warm: Vec<String>,
    pub steady: Vec<String>,
    pub night: Vec<String>,
    pub intensifiers: Vec<String>,
    pub exhaustion: Vec<String>,
}

const WORD_WEIGHT: u32 = 2;
const EXHAUSTION_BONUS: u32 = 1;

impl Default for MoodLexicon {
    fn default() -> Self {
        fn words(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }
        Self {
            warm: words(&[
                "崩潰", "好累", "心很累", "想哭", "難過", "委屈", "自責", "內疚", "愧疚", "無助",
                "孤單", "撐不下去",
            ]),
            steady: words(&[
                "吼", "生氣", "發火", "尖叫", "吵架", "回嘴", "頂嘴", "打人", "失控", "講不聽",
                "摔東西",
            ]),
            night: words(&["睡不著", "失眠", "半夜", "深夜", "夜裡", "晚上", "睡前", "熬夜"]),
            intensifiers: words(&["好", "快", "真的", "超", "太", "一直"]),
            exhaustion: words(&["累", "疲憊", "撐不住", "沒力"]),
        }
    }
}

impl MoodLexicon {
    /// Classify the raw query. Ties at the top and all-zero scores resolve to `Steady`.
    pub fn classify(&self, query: &str) -> Mood {
        let hits = |list: &[String]| -> u32 {
            list.iter()
                .filter(|w| query.contains(w.as_str()))
                .count() as u32
                * WORD_WEIGHT
        };
        let mut warm = hits(&self.warm);
        let steady = hits(&self.steady);
        let night = hits(&self.night);

        let intensified = self.intensifiers.iter().any(|w| query.contains(w.as_str()));
        let exhausted = self.exhaustion.iter().any(|w| query.contains(w.as_str()));
        if intensified && exhausted {
            warm += EXHAUSTION_BONUS;
        }

        if warm > steady && warm > night {
            Mood::Warm
        } else if night > warm && night > steady {
            Mood::Night
        } else {
            Mood::Steady
        }
    }
}

pub fn classify_mood(query: &str) -> Mood {
    MoodLexicon::default().classify(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleeplessness_is_night() {
        assert_eq!(classify_mood("我睡不著"), Mood::Night);
        assert_eq!(classify_mood("每天晚上都睡不著"), Mood::Night);
    }

    #[test]
    fn unrecognized_input_defaults_to_steady() {
        assert_eq!(classify_mood("今天天氣不錯"), Mood::Steady);
        assert_eq!(classify_mood(""), Mood::Steady);
    }

    #[test]
    fn ties_resolve_to_steady() {
        // warm 2 (崩潰) vs steady 2 (尖叫)
        assert_eq!(classify_mood("尖叫崩潰"), Mood::Steady);
        // warm 2 (難過) vs night 2 (半夜)
        assert_eq!(classify_mood("半夜難過"), Mood::Steady);
    }

    #[test]
    fn intensified_exhaustion_tips_warm() {
        // warm: 崩潰 2 + 快…累 1 = 3; steady: 尖叫 = 2
        assert_eq!(classify_mood("孩子尖叫，我快崩潰了，累"), Mood::Warm);
        // exhaustion without an intensifier adds nothing
        assert_eq!(classify_mood("尖叫崩潰很累"), Mood::Steady);
    }

    #[test]
    fn anger_words_are_steady() {
        assert_eq!(classify_mood("孩子回嘴，我好生氣"), Mood::Steady);
    }

    #[test]
    fn openings_differ_per_mood() {
        assert_ne!(Mood::Warm.opening(), Mood::Steady.opening());
        assert_ne!(Mood::Night.opening(), Mood::Steady.opening());
        assert_eq!(Mood::Night.as_str(), "night");
    }
}

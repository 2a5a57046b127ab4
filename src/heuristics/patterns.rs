//! Compiled pattern tables shared by the extractor, the stage classifier and
//! the speaker-role heuristic. Everything here is compiled once on first use.

use once_cell::sync::Lazy;
use regex::{Match, Regex};

use crate::models::{Metric, Topic};

/// One alternative inside a concept pattern
#[derive(Debug, Clone, Copy)]
pub enum Fragment {
    /// Latin abbreviation that must not touch other ASCII word characters.
    /// Non-ASCII neighbours (e.g. the particle in `MRR은`) are allowed.
    Abbreviation(&'static str),
    /// Regular-expression fragment matched anywhere
    Phrase(&'static str),
}

/// Case-insensitive alternation of fragments for one concept
#[derive(Debug)]
pub struct ConceptPattern {
    regex: Regex,
}

const ABBREVIATION_GROUP: &str = "abbr";

impl ConceptPattern {
    pub fn new(fragments: &[Fragment]) -> Self {
        let abbreviations: Vec<&str> = fragments
            .iter()
            .filter_map(|f| match f {
                Fragment::Abbreviation(a) => Some(*a),
                Fragment::Phrase(_) => None,
            })
            .collect();
        let phrases = fragments.iter().filter_map(|f| match f {
            Fragment::Phrase(p) => Some(*p),
            Fragment::Abbreviation(_) => None,
        });

        let mut alternatives = Vec::new();
        if !abbreviations.is_empty() {
            alternatives.push(format!(
                "(?P<{}>{})",
                ABBREVIATION_GROUP,
                abbreviations.join("|")
            ));
        }
        alternatives.extend(phrases.map(|p| p.to_string()));

        let source = format!("(?i){}", alternatives.join("|"));
        let regex = Regex::new(&source).expect("concept pattern tables are valid regexes");
        Self { regex }
    }

    /// All literal substrings of `text` matched by this concept
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                if caps.name(ABBREVIATION_GROUP).is_some() && !is_ascii_bounded(text, &whole) {
                    return None;
                }
                Some(whole.as_str())
            })
            .collect()
    }
}

fn is_ascii_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_ascii_bounded(text: &str, m: &Match<'_>) -> bool {
    let before = text[..m.start()].chars().next_back();
    let after = text[m.end()..].chars().next();
    !before.is_some_and(is_ascii_word) && !after.is_some_and(is_ascii_word)
}

use Fragment::{Abbreviation as A, Phrase as P};

/// Metric name → pattern (English abbreviations and Korean equivalents)
pub static METRIC_PATTERNS: Lazy<Vec<(Metric, ConceptPattern)>> = Lazy::new(|| {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let fragments: &[Fragment] = match metric {
                Metric::Mrr => &[A("MRR"), P(r"월\s*반복\s*매출"), P(r"월간\s*매출")],
                Metric::Arr => &[A("ARR"), P(r"연\s*반복\s*매출"), P(r"연간\s*매출")],
                Metric::Cac => &[A("CAC"), P(r"고객\s*획득\s*비용"), P(r"획득\s*비용")],
                Metric::Ltv => &[A("LTV"), P(r"고객\s*생애\s*가치"), P(r"생애\s*가치")],
                Metric::Churn => &[P("이탈률"), P("Churn"), P("해지율"), P(r"이탈\s*고객")],
                Metric::Nps => &[A("NPS"), P(r"순\s*추천\s*지수")],
                Metric::Mau => &[A("MAU"), P(r"월간\s*활성")],
                Metric::Dau => &[A("DAU"), P(r"일간\s*활성")],
                Metric::Gmv => &[A("GMV"), P(r"총\s*거래액")],
                Metric::Retention => &[P("리텐션"), P("재구매율"), P("유지율")],
                Metric::BurnRate => &[P(r"번\s*레이트"), P(r"Burn\s*Rate"), P(r"월\s*소진")],
                Metric::Runway => &[P("런웨이"), P("Runway"), P(r"자금\s*소진")],
            };
            (metric, ConceptPattern::new(fragments))
        })
        .collect()
});

/// Topic name → pattern
pub static TOPIC_PATTERNS: Lazy<Vec<(Topic, ConceptPattern)>> = Lazy::new(|| {
    Topic::ALL
        .iter()
        .map(|&topic| {
            let fragments: &[Fragment] = match topic {
                Topic::BusinessModel => &[
                    P(r"비즈니스\s*모델"),
                    P(r"수익\s*모델"),
                    P(r"매출\s*구조"),
                    P("BM"),
                ],
                Topic::Team => &[
                    P(r"팀\s*구성"),
                    P(r"공동\s*창업"),
                    P(r"창업\s*팀"),
                    P("CTO"),
                    P("CEO"),
                    P("COO"),
                ],
                Topic::Market => &[
                    P(r"시장\s*규모"),
                    P("TAM"),
                    P("SAM"),
                    P("SOM"),
                    P(r"시장\s*점유율"),
                    P("경쟁사"),
                    P(r"경쟁\s*업체"),
                ],
                Topic::Technology => &[
                    P(r"기술\s*스택"),
                    P(r"핵심\s*기술"),
                    P("특허"),
                    P(r"기술적\s*우위"),
                    P(r"기술\s*장벽"),
                ],
                Topic::Traction => &[
                    P("트랙션"),
                    P(r"고객\s*수"),
                    P(r"사용자\s*수"),
                    P("매출"),
                    P("성장률"),
                    P(r"성장\s*추이"),
                ],
                Topic::Funding => &[
                    P(r"투자\s*유치"),
                    P("시리즈"),
                    P("시드"),
                    P("프리시드"),
                    P("투자금"),
                    P("밸류에이션"),
                ],
                Topic::Risks => &[
                    P("리스크"),
                    P(r"위험\s*요소"),
                    P("챌린지"),
                    P(r"도전\s*과제"),
                ],
                Topic::Competition => &[
                    P(r"경쟁\s*우위"),
                    P("차별화"),
                    P(r"진입\s*장벽"),
                    P("해자"),
                    P("moat"),
                ],
                Topic::Customer => &[
                    P(r"타겟\s*고객"),
                    P(r"목표\s*고객"),
                    P("고객층"),
                    P("페르소나"),
                    P("ICP"),
                ],
                Topic::Product => &[
                    P(r"제품\s*특징"),
                    P(r"핵심\s*기능"),
                    P("MVP"),
                    P("프로덕트"),
                ],
            };
            (topic, ConceptPattern::new(fragments))
        })
        .collect()
});

/// Meeting wrap-up language
pub const CLOSING_PHRASES: &[&str] = &[
    "다음 단계",
    "감사합니다",
    "연락드리겠",
    "검토",
    "마무리",
    "정리하면",
];

fn compile_all(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .map(|s| Regex::new(&format!("(?i){}", s)).expect("role pattern tables are valid regexes"))
        .collect()
}

/// Question forms, metric/KPI vocabulary, comparative and market vocabulary
pub static INTERVIEWER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"어떻게\s*되나요",
        r"얼마인가요",
        r"있나요\?",
        r"인가요\?",
        r"뭔가요",
        r"무엇인가요",
        r"어떤가요",
        r"계신가요",
        r"하셨나요",
        r"있으신가요",
        r"MRR|ARR|CAC|LTV|Churn|NPS|MAU|DAU|GMV",
        r"매출|수익|이익|비용|투자",
        r"성장률|증가율|감소율",
        r"고객.*(수|획득|유지)",
        r"경쟁사|시장|규모",
    ])
});

/// Self-reference, declarative plans, numeric quantities, explanatory verbs
pub static SUBJECT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile_all(&[
        r"저희(는|가|의|도)?",
        r"우리(는|가|의|도)?",
        r"현재.*(있습니다|입니다)",
        r"계획.*(있습니다|입니다)",
        r"목표.*(있습니다|입니다)",
        r"\d+%",
        r"\d+(만|억|천)",
        r"약\s*\d+",
        r"말씀드리",
        r"설명드리",
        r"소개드리",
    ])
});

/// Quantitative statements: amounts, percentages, head counts, months, years
pub static FACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"[0-9,]+\s*만?\s*원",
        r"[0-9]+\s*%",
        r"[0-9]+\s*명",
        r"[0-9]+\s*개월",
        r"[0-9]+\s*년",
    ]
    .iter()
    .map(|p| Regex::new(&format!(".{{0,50}}{}.{{0,50}}", p)).expect("fact patterns are valid regexes"))
    .collect()
});

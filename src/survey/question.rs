//! Question definitions and the fixed mindfulness question set.

use serde::Serialize;

/// A selectable answer within a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyOption {
    /// Identifier, unique within its question.
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
}

/// One survey step.
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<&'static str>,
    pub options: Vec<SurveyOption>,
    /// At least one selection or non-blank free text is needed to move on.
    pub required: bool,
    /// Whether an "other" free-text answer is accepted.
    pub allow_free_text: bool,
    /// Upper bound on selected options, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_select: Option<usize>,
}

impl Question {
    /// Look up an option by id.
    pub fn option(&self, option_id: &str) -> Option<&SurveyOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Immutable, ordered sequence of questions.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Build a question set. Panics on an empty list or duplicate question
    /// ids, both of which are programming errors in the static catalogue.
    pub fn new(questions: Vec<Question>) -> Self {
        assert!(!questions.is_empty(), "question set must not be empty");
        for (i, q) in questions.iter().enumerate() {
            assert!(
                questions[..i].iter().all(|other| other.id != q.id),
                "duplicate question id {}",
                q.id
            );
        }
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Index of the final question.
    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn find(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

/// Question ids whose answers make up the submission payload.
pub mod ids {
    pub const NEEDS: &str = "needs";
    pub const FORMAT: &str = "format";
    pub const CONTENT: &str = "content";
}

const MULTI_SELECT: &str = "중복 선택 가능";

/// The mindfulness pretotype survey.
pub fn mindfulness_questions() -> QuestionSet {
    QuestionSet::new(vec![
        Question {
            id: ids::NEEDS,
            title: "현재 마음챙김이 필요하다고 느끼는 주요 이유는 무엇인가요?",
            subtitle: Some(MULTI_SELECT),
            options: vec![
                SurveyOption { id: "health", label: "건강/불면" },
                SurveyOption { id: "family", label: "가족/관계" },
                SurveyOption { id: "work", label: "경제/일" },
                SurveyOption { id: "meaning", label: "삶의 의미/자아실현" },
                SurveyOption { id: "anxiety", label: "막연한 불안/우울감" },
            ],
            required: true,
            allow_free_text: true,
            max_select: None,
        },
        Question {
            id: ids::FORMAT,
            title: "마음챙김 서비스를 어떤 형태로 받고 싶으신가요?",
            subtitle: Some(MULTI_SELECT),
            options: vec![
                SurveyOption { id: "ai_chat", label: "AI 상담 (언제든 간단하게 대화 가능)" },
                SurveyOption { id: "expert_counsel", label: "전문가 상담 (심리상담사/코치와 1:1)" },
                SurveyOption { id: "group", label: "소규모 그룹 활동 (비슷한 상황의 여성들과 함께)" },
                SurveyOption { id: "community", label: "온라인 커뮤니티 (익명/비밀 대화 및 경험 공유)" },
                SurveyOption { id: "record", label: "콘텐츠 기록학습 (영상, 오디오, 글 등으로 배우기)" },
                SurveyOption { id: "offline", label: "오프라인 치유 프로그램 (요가, 명상, 아트테라피 등)" },
                SurveyOption { id: "individual", label: "맞춤형 루틴 프로그램 (개인 상태에 따라 매번 실천할 것)" },
            ],
            required: true,
            allow_free_text: false,
            max_select: None,
        },
        Question {
            id: ids::CONTENT,
            title: "어떤 콘텐츠가 가장 도움이 될 것 같으신가요?",
            subtitle: Some(MULTI_SELECT),
            options: vec![
                SurveyOption { id: "guide", label: "명상/호흡법 오디오 가이드" },
                SurveyOption { id: "journal", label: "감사 일기/감정 기록 도구" },
                SurveyOption { id: "asmr", label: "치유 음악/ASMR/자연 소리" },
                SurveyOption { id: "stories", label: "실제 사례/스토리텔링 콘텐츠" },
                SurveyOption { id: "expert", label: "전문가 강의/라이브 Q&A" },
                SurveyOption { id: "program", label: "특정 기분/증상 맞춤형 힐링 프로그램" },
            ],
            required: true,
            allow_free_text: false,
            max_select: None,
        },
    ])
}

//! # Assistants
//!
//! Chat front ends to the completion gateway. The personas share one
//! gateway contract and differ in system instruction, XP reward and the
//! fixed messages shown when the gateway cannot answer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rp_core::error::{AppError, Result};
use rp_core::models::{ChatMessage, ChatRole};
use rp_core::stores::IdentityStore;
use rp_core::traits::CompletionGateway;
use tokio::sync::Mutex;

/// Shown when the gateway returns nothing usable.
pub const EMPTY_RESPONSE_MESSAGE: &str = "응답을 생성할 수 없습니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    /// General R&D assistant (floating chat)
    Rnd,
    /// Business-writing assistant (smart work)
    Office,
    /// Lab research assistant
    Lab,
    /// R&D prompt-template workbench; answers like `Rnd` but grants no XP
    Workbench,
}

impl Persona {
    pub fn system_instruction(self) -> &'static str {
        match self {
            Persona::Rnd | Persona::Workbench => "당신은 삼화페인트의 수석 연구원을 보조하는 AI R&D 전문가입니다. 화학, 재료 공학, 도료 기술에 대한 깊은 지식을 바탕으로 전문적이고 논리적인 답변을 제공하세요. 답변은 한국어로 명확하게 작성하며, 마크다운 형식을 사용하여 가독성을 높이세요.",
            Persona::Office => "당신은 유능한 비즈니스 AI 비서입니다. 사용자의 요청에 따라 비즈니스 이메일 초안, 엑셀 수식, 회의록 요약, 번역 등의 업무를 수행합니다. 답변은 정중하고 실무에 바로 사용할 수 있도록 구체적으로 작성하세요.",
            Persona::Lab => "당신은 'ChemAI Research Assistant'입니다. 삼화페인트 연구원들의 실험 설계, 논문 분석, 소재 추천을 돕는 고도화된 연구 파트너입니다. 답변은 매우 전문적이어야 하며, 화학식이나 실험 절차는 정확하게 기술하세요. 불확실한 내용은 추측하지 말고 솔직하게 모른다고 답해야 합니다. 어조는 차분하고 지적이어야 합니다.",
        }
    }

    /// XP granted for each request.
    pub fn reward(self) -> u32 {
        match self {
            Persona::Rnd => 5,
            Persona::Workbench => 0,
            Persona::Office => 10,
            Persona::Lab => 15,
        }
    }

    pub fn not_configured_message(self) -> &'static str {
        match self {
            Persona::Rnd | Persona::Workbench => "API Key가 설정되지 않았습니다. 환경 변수를 확인해주세요.",
            Persona::Office | Persona::Lab => "API Key가 설정되지 않았습니다.",
        }
    }

    pub fn error_message(self) -> &'static str {
        match self {
            Persona::Rnd | Persona::Office | Persona::Workbench => "오류가 발생했습니다.",
            Persona::Lab => "시스템 오류가 발생했습니다. 잠시 후 다시 시도해주세요.",
        }
    }
}

/// A catalog entry. Office templates have their first `[...]` replaced by
/// the user's input; R&D templates are prefilled and edited by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
}

pub const OFFICE_TEMPLATES: &[PromptTemplate] = &[
    PromptTemplate {
        id: "email",
        title: "비즈니스 이메일 작성",
        category: "커뮤니케이션",
        description: "핵심 내용만 입력하면 정중한 업무 메일 초안을 만들어 줍니다.",
        prompt: "다음 내용을 바탕으로 정중한 비즈니스 이메일 초안을 작성해줘: [메일 내용]",
    },
    PromptTemplate {
        id: "excel",
        title: "엑셀 수식 생성",
        category: "데이터",
        description: "원하는 계산을 설명하면 엑셀 수식과 사용법을 알려줍니다.",
        prompt: "다음 작업을 수행하는 엑셀 수식을 만들고 사용법을 설명해줘: [작업 설명]",
    },
    PromptTemplate {
        id: "minutes",
        title: "회의록 요약",
        category: "문서",
        description: "회의 메모를 붙여넣으면 결정 사항과 할 일로 정리합니다.",
        prompt: "다음 회의 내용을 결정 사항, 할 일, 담당자로 요약해줘: [회의 메모]",
    },
    PromptTemplate {
        id: "translate",
        title: "업무 번역",
        category: "커뮤니케이션",
        description: "업무 문서를 자연스러운 영어 비즈니스 문체로 번역합니다.",
        prompt: "다음 문장을 자연스러운 비즈니스 영어로 번역해줘: [번역할 내용]",
    },
];

pub const RND_TEMPLATES: &[PromptTemplate] = &[
    PromptTemplate {
        id: "doe",
        title: "실험 계획(DOE) 설계",
        category: "실험",
        description: "인자와 수준을 정해 최소 실험 횟수의 계획표를 제안받습니다.",
        prompt: "다음 도료 배합 실험의 인자와 수준을 정리하고, 최소 실험 횟수로 주효과를 볼 수 있는 실험 계획표를 제안해줘.\n- 목표 물성: \n- 변경 가능한 원료: ",
    },
    PromptTemplate {
        id: "paper",
        title: "논문 요약",
        category: "문헌",
        description: "논문 초록을 붙여넣으면 핵심 결과와 적용 가능성을 정리합니다.",
        prompt: "다음 논문 초록을 연구 목적, 실험 방법, 핵심 결과, 당사 제품 적용 가능성으로 나누어 요약해줘.\n\n",
    },
    PromptTemplate {
        id: "defect",
        title: "도막 결함 원인 분석",
        category: "품질",
        description: "발생한 결함 현상으로 가능한 원인과 확인 실험을 찾습니다.",
        prompt: "도막에서 다음 결함이 발생했어. 가능한 원인을 원료, 공정, 환경 요인으로 나누고 각각 확인할 실험을 제안해줘.\n- 결함 현상: ",
    },
    PromptTemplate {
        id: "patent",
        title: "특허 동향 조사",
        category: "IP",
        description: "기술 키워드로 주요 출원인과 회피 설계 포인트를 정리합니다.",
        prompt: "다음 기술 분야의 최근 특허 동향을 주요 출원인, 핵심 청구 범위, 회피 설계 포인트 중심으로 정리해줘.\n- 기술 키워드: ",
    },
];

/// A suggested lab-assistant conversation starter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabTopic {
    pub title: &'static str,
    pub prompt: &'static str,
}

pub const LAB_TOPICS: &[LabTopic] = &[
    LabTopic {
        title: "실험 설계",
        prompt: "수성 아크릴 도료의 내수성을 높이기 위한 실험 설계(DOE)를 제안해줘.",
    },
    LabTopic {
        title: "소재 추천",
        prompt: "자동차 클리어코트용 UV 흡수제 후보와 각각의 장단점을 비교해줘.",
    },
    LabTopic {
        title: "논문 분석",
        prompt: "자기치유(self-healing) 코팅 분야의 최근 연구 동향을 요약해줘.",
    },
];

/// Replaces the first single-line `[...]` placeholder in `template`.
/// Templates without one are returned unchanged.
pub fn fill_template(template: &str, input: &str) -> String {
    let mut from = 0;
    while let Some(open) = template[from..].find('[').map(|i| from + i) {
        let rest = &template[open + 1..];
        let close = rest.find(|c: char| c == ']' || c == '\n');
        match close.map(|i| (i, rest.as_bytes()[i])) {
            Some((i, b']')) => {
                let end = open + 1 + i + 1;
                return format!("{}{}{}", &template[..open], input, &template[end..]);
            }
            Some((i, _)) => from = open + 1 + i,
            None => break,
        }
    }
    template.to_string()
}

/// Resets the in-flight flag when the request finishes, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One conversation with a persona.
pub struct Assistant {
    persona: Persona,
    identity: Arc<IdentityStore>,
    gateway: Arc<dyn CompletionGateway>,
    model: String,
    history: Mutex<Vec<ChatMessage>>,
    busy: AtomicBool,
}

impl Assistant {
    pub fn new(
        persona: Persona,
        identity: Arc<IdentityStore>,
        gateway: Arc<dyn CompletionGateway>,
        model: String,
    ) -> Self {
        Self {
            persona,
            identity,
            gateway,
            model,
            history: Mutex::new(Vec::new()),
            busy: AtomicBool::new(false),
        }
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn history(&self) -> Vec<ChatMessage> {
        self.history.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.history.lock().await.clear();
    }

    /// Sends `text` and appends both sides of the exchange to the history.
    ///
    /// Blank input is ignored (`Ok(None)`). A second call while one is in
    /// flight is rejected with `Conflict`. Gateway failures never surface
    /// as errors; they become the persona's fixed message.
    pub async fn send(&self, text: &str) -> Result<Option<ChatMessage>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let _in_flight = self.begin()?;
        Ok(Some(self.exchange(text).await))
    }

    /// Lab topics start a fresh conversation.
    pub async fn start_topic(&self, topic: &LabTopic) -> Result<Option<ChatMessage>> {
        let _in_flight = self.begin()?;
        self.clear().await;
        Ok(Some(self.exchange(topic.prompt).await))
    }

    /// Smart-work request: fills `template` with `input` and returns the
    /// single result. Earlier results are discarded.
    pub async fn compose(&self, template: &PromptTemplate, input: &str) -> Result<Option<String>> {
        if input.is_empty() {
            return Ok(None);
        }
        let _in_flight = self.begin()?;
        self.clear().await;
        let prompt = fill_template(template.prompt, input);
        Ok(Some(self.exchange(&prompt).await.text))
    }

    /// Picks an R&D template: the conversation restarts and the template's
    /// prompt comes back to be edited and sent.
    pub async fn select_template(&self, template: &PromptTemplate) -> Result<&'static str> {
        let _in_flight = self.begin()?;
        self.clear().await;
        Ok(template.prompt)
    }

    /// One round trip. Callers hold the in-flight guard.
    async fn exchange(&self, text: &str) -> ChatMessage {
        self.history
            .lock()
            .await
            .push(ChatMessage::now(ChatRole::User, text));
        self.identity.gain_xp(self.persona.reward()).await;

        let reply = ChatMessage::now(ChatRole::Model, self.complete(text).await);
        self.history.lock().await.push(reply.clone());
        reply
    }

    fn begin(&self) -> Result<InFlight<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(&self.busy))
            .map_err(|_| self.conflict())
    }

    fn conflict(&self) -> AppError {
        AppError::Conflict(format!("{:?} assistant is still answering", self.persona))
    }

    async fn complete(&self, prompt: &str) -> String {
        if !self.gateway.is_configured() {
            return self.persona.not_configured_message().to_string();
        }

        match self
            .gateway
            .generate(prompt, self.persona.system_instruction(), &self.model)
            .await
        {
            Ok(text) if text.trim().is_empty() => EMPTY_RESPONSE_MESSAGE.to_string(),
            Ok(text) => text,
            Err(e) => {
                tracing::error!(persona = ?self.persona, error = %e, "completion request failed");
                self.persona.error_message().to_string()
            }
        }
    }
}

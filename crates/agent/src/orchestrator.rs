//! The request pipeline.
//!
//! One request moves through fixed stages, never revisiting one:
//!
//! ```text
//! Received → Masked → Retrieved → ContextBuilt → Answered → Unmasked
//! ```
//!
//! A failure at any stage aborts the request with a single error. Raw user
//! text only exists before `Masked` and after `Unmasked`: retrieval, prompt
//! assembly, logging and the model call all see the masked form. Live data
//! keyed by the raw user id is masked with the same map before assembly.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use cxbot_core::{ChatSettings, Error, Provider, Result, RetrievalResult};
use cxbot_rag::Retriever;
use cxbot_security::Redactor;
use cxbot_tools::RetailServices;

use crate::assembler::ContextAssembler;
use crate::live_data::LiveData;
use crate::prompts::{SYSTEM_PROMPT, build_user_prompt};

/// Input at the pipeline boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
    pub lat: f64,
    pub lon: f64,
}

/// Output at the pipeline boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// Pipeline stages, in the only order they can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequestStage {
    Received,
    Masked,
    Retrieved,
    ContextBuilt,
    Answered,
    Unmasked,
}

/// Everything a completed request produced, for callers that want more than
/// the answer (the CLI's `ask --sources`, tests).
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub request_id: Uuid,
    pub answer: String,
    pub sources: Vec<RetrievalResult>,
    pub redactions: usize,
    pub stages: Vec<RequestStage>,
}

/// Per-request stage tracker.
struct Turn {
    stages: Vec<RequestStage>,
}

impl Turn {
    fn new() -> Self {
        Self {
            stages: vec![RequestStage::Received],
        }
    }

    fn current(&self) -> RequestStage {
        self.stages
            .last()
            .copied()
            .unwrap_or(RequestStage::Received)
    }

    fn advance(&mut self, next: RequestStage) {
        debug_assert!(next > self.current(), "stage {next:?} revisited");
        debug!(stage = ?next, "Stage reached");
        self.stages.push(next);
    }
}

/// Sequences redaction, retrieval, context assembly and the model call.
///
/// Holds only shared read-only collaborators, so one instance serves every
/// request concurrently.
#[derive(Clone)]
pub struct Orchestrator {
    redactor: Redactor,
    retriever: Retriever,
    services: RetailServices,
    provider: Arc<dyn Provider>,
    settings: ChatSettings,
    assembler: ContextAssembler,
}

impl Orchestrator {
    pub fn new(
        redactor: Redactor,
        retriever: Retriever,
        services: RetailServices,
        provider: Arc<dyn Provider>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            redactor,
            retriever,
            services,
            provider,
            settings,
            assembler: ContextAssembler::new(),
        }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Answer one request.
    pub async fn handle(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let outcome = self.handle_detailed(request).await?;
        Ok(ChatResponse {
            answer: outcome.answer,
        })
    }

    /// Answer one request and keep the retrieval and stage details.
    pub async fn handle_detailed(&self, request: &ChatRequest) -> Result<ChatOutcome> {
        let request_id = Uuid::new_v4();
        let span = info_span!("chat", request_id = %request_id);
        self.run(request_id, request).instrument(span).await
    }

    async fn run(&self, request_id: Uuid, request: &ChatRequest) -> Result<ChatOutcome> {
        let mut turn = Turn::new();
        info!(
            message_chars = request.message.chars().count(),
            "Request received"
        );

        match self.pipeline(&mut turn, request).await {
            Ok((answer, sources, redactions)) => {
                info!(
                    sources = sources.len(),
                    redactions,
                    answer_chars = answer.chars().count(),
                    "Request answered"
                );
                Ok(ChatOutcome {
                    request_id,
                    answer,
                    sources,
                    redactions,
                    stages: turn.stages,
                })
            }
            Err(e) => {
                warn!(stage = ?turn.current(), error = %e, "Request aborted");
                Err(e)
            }
        }
    }

    async fn pipeline(
        &self,
        turn: &mut Turn,
        request: &ChatRequest,
    ) -> Result<(String, Vec<RetrievalResult>, usize)> {
        if request.user_id.trim().is_empty() {
            return Err(Error::MalformedInput("user_id must not be empty".into()));
        }
        if request.message.trim().is_empty() {
            return Err(Error::MalformedInput("message must not be empty".into()));
        }

        let (masked, mut redactions) = self.redactor.mask(&request.message);
        turn.advance(RequestStage::Masked);

        let sources = self.retriever.retrieve(&masked).await?;
        turn.advance(RequestStage::Retrieved);

        let live = LiveData::gather(&self.services, &request.user_id, request.lat, request.lon).await?;
        let profile = self.redactor.mask_into(&live.profile, &mut redactions);
        let tools = self.redactor.mask_into(&live.render(), &mut redactions);
        let context = self.assembler.build(&sources, &tools, &profile);
        let user_prompt = build_user_prompt(&context, &masked);
        turn.advance(RequestStage::ContextBuilt);

        let reply = self
            .provider
            .chat(&self.settings, SYSTEM_PROMPT, &user_prompt)
            .await?;
        turn.advance(RequestStage::Answered);

        let answer = self.redactor.unmask(&reply, &redactions);
        turn.advance(RequestStage::Unmasked);

        Ok((answer, sources, redactions.len()))
    }
}

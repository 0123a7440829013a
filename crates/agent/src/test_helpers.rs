//! Shared test doubles for orchestrator tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cxbot_core::error::ProviderError;
use cxbot_core::message::Message;
use cxbot_core::provider::{ChatSettings, Provider, ProviderRequest, ProviderResponse};
use cxbot_core::Document;
use cxbot_providers::HashingEmbedder;
use cxbot_rag::{Chunker, FlatIndex, Retriever, VectorStore, build_store};
use cxbot_security::Redactor;

use crate::orchestrator::{ChatRequest, Orchestrator};

/// A provider that returns one scripted outcome and records every prompt.
pub struct ScriptedProvider {
    outcome: Result<String, ProviderError>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedProvider {
    pub fn reply(text: &str) -> Self {
        Self {
            outcome: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            outcome: Err(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// `(system, user)` prompt pairs in call order.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let system = request.messages[0].content.clone();
        let user = request.messages[1].content.clone();
        self.prompts.lock().unwrap().push((system, user));

        let text = self.outcome.clone()?;
        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: None,
            model: request.model,
        })
    }
}

pub fn sample_request() -> ChatRequest {
    ChatRequest {
        user_id: "u-1".into(),
        message: "when does the store open".into(),
        lat: 40.7128,
        lon: -74.0060,
    }
}

fn settings() -> ChatSettings {
    ChatSettings {
        model: "test-model".into(),
        temperature: 0.3,
        max_tokens: Some(512),
    }
}

/// An orchestrator over a three-document corpus embedded with feature hashing.
pub async fn orchestrator_with(provider: Arc<dyn Provider>) -> Orchestrator {
    let docs = vec![
        Document::new(
            "returns.md",
            "Our refund policy: returns are accepted within 30 days with a receipt.",
        ),
        Document::new("hours.txt", "Store hours are 7am to 9pm every day."),
        Document::new(
            "menu.md",
            "Our coffee menu includes latte, mocha, cold brew and oat milk options.",
        ),
    ];
    let embedder = Arc::new(HashingEmbedder::new(384).unwrap());
    let chunker = Chunker::new(50, 10).unwrap();
    let (store, _) = build_store(&docs, &chunker, embedder.as_ref(), 8)
        .await
        .unwrap();
    let retriever = Retriever::new(embedder, Arc::new(store), 3).unwrap();

    Orchestrator::new(
        Redactor::new().unwrap(),
        retriever,
        cxbot_tools::default_services(),
        provider,
        settings(),
    )
}

/// An orchestrator whose index holds nothing.
pub fn orchestrator_with_empty_index(provider: Arc<dyn Provider>) -> Orchestrator {
    let embedder = Arc::new(HashingEmbedder::new(64).unwrap());
    let store = VectorStore::new(FlatIndex::new(64), Vec::new(), Vec::new()).unwrap();
    let retriever = Retriever::new(embedder, Arc::new(store), 3).unwrap();

    Orchestrator::new(
        Redactor::new().unwrap(),
        retriever,
        cxbot_tools::default_services(),
        provider,
        settings(),
    )
}

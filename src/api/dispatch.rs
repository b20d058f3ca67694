//! Runs backend requests off the UI thread.
//!
//! Each request is spawned on the shared tokio runtime; its outcome comes
//! back to the UI as an [`AppEvent`] tagged with the ticket it was issued
//! under.

use super::{AnalysisBackend, AnalysisRequest};
use crate::event::{AppEvent, Ticket};
use std::sync::{mpsc, Arc, OnceLock};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn AnalysisBackend>,
    runtime_handle: Handle,
    tx: mpsc::Sender<AppEvent>,
    repaint: Arc<OnceLock<egui::Context>>,
}

impl Dispatcher {
    pub fn new(
        backend: Arc<dyn AnalysisBackend>,
        runtime_handle: Handle,
        tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            backend,
            runtime_handle,
            tx,
            repaint: Arc::new(OnceLock::new()),
        }
    }

    /// Wake the UI whenever an event is posted. Only the first context sticks.
    pub fn attach_context(&self, ctx: &egui::Context) {
        let _ = self.repaint.set(ctx.clone());
    }

    pub fn execute(&self, ticket: Ticket, request: AnalysisRequest) {
        debug!(ticket, kind = request.kind(), "dispatching request");
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let repaint = Arc::clone(&self.repaint);

        self.runtime_handle.spawn(async move {
            let event = run(backend.as_ref(), ticket, request).await;
            post(&tx, &repaint, event);
        });
    }

    pub fn probe_health(&self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let repaint = Arc::clone(&self.repaint);

        self.runtime_handle.spawn(async move {
            let outcome = backend.health().await;
            match &outcome {
                Ok(status) if !status.groq_configured => {
                    warn!("backend reports no model API key configured; analyses will fail")
                }
                Ok(status) => info!(
                    status = status.status.as_deref().unwrap_or("unknown"),
                    "backend reachable"
                ),
                Err(err) => warn!(error = %err, "backend health check failed"),
            }
            post(&tx, &repaint, AppEvent::HealthChecked(outcome));
        });
    }
}

fn post(tx: &mpsc::Sender<AppEvent>, repaint: &OnceLock<egui::Context>, event: AppEvent) {
    if tx.send(event).is_err() {
        debug!("ui receiver dropped; discarding event");
        return;
    }
    if let Some(ctx) = repaint.get() {
        ctx.request_repaint();
    }
}

/// Perform one request against `backend` and wrap the outcome for the UI.
pub async fn run(backend: &dyn AnalysisBackend, ticket: Ticket, request: AnalysisRequest) -> AppEvent {
    match request {
        AnalysisRequest::Legal { file, language } => AppEvent::AnalysisFinished {
            ticket,
            outcome: backend.analyze_legal(&file, &language).await,
        },
        AnalysisRequest::Sustainability {
            file,
            text,
            language,
        } => AppEvent::AnalysisFinished {
            ticket,
            outcome: backend
                .analyze_sustainability(file.as_ref(), text.as_deref(), &language)
                .await,
        },
        AnalysisRequest::Chat {
            question,
            context,
            mode,
            language,
        } => AppEvent::ChatFinished {
            ticket,
            outcome: backend
                .chat(&question, context.as_ref(), mode, &language)
                .await,
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use crate::api::HealthStatus;
    use crate::error::AnalysisError;
    use crate::session::{Mode, SelectedFile};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every call and answers from canned outcomes.
    #[derive(Default)]
    pub(crate) struct FakeBackend {
        pub calls: Mutex<Vec<String>>,
        pub fail_with: Option<AnalysisError>,
    }

    impl FakeBackend {
        fn record(&self, call: String) {
            self.calls.lock().expect("calls lock").push(call);
        }

        fn outcome<T>(&self, value: T) -> Result<T, AnalysisError> {
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(value),
            }
        }
    }

    #[async_trait]
    impl AnalysisBackend for FakeBackend {
        async fn analyze_legal(
            &self,
            file: &SelectedFile,
            language: &str,
        ) -> Result<AnalysisResult, AnalysisError> {
            self.record(format!("legal:{}:{language}", file.name));
            let result = AnalysisResult::from_value(
                Mode::Legal,
                json!({"document_type": "Notice", "simple_summary": language}),
            )
            .expect("fixture should decode");
            self.outcome(result)
        }

        async fn analyze_sustainability(
            &self,
            file: Option<&SelectedFile>,
            text: Option<&str>,
            language: &str,
        ) -> Result<AnalysisResult, AnalysisError> {
            self.record(format!(
                "sustainability:{}:{}:{language}",
                file.map(|f| f.name.as_str()).unwrap_or("-"),
                text.unwrap_or("-")
            ));
            let result =
                AnalysisResult::from_value(Mode::Sustainability, json!({"impact_score": 7}))
                    .expect("fixture should decode");
            self.outcome(result)
        }

        async fn chat(
            &self,
            question: &str,
            context: Option<&AnalysisResult>,
            mode: Mode,
            language: &str,
        ) -> Result<String, AnalysisError> {
            self.record(format!(
                "chat:{question}:{}:{mode}:{language}",
                context.is_some()
            ));
            self.outcome(format!("answer to {question}"))
        }

        async fn health(&self) -> Result<HealthStatus, AnalysisError> {
            self.record("health".to_string());
            self.outcome(HealthStatus {
                status: Some("healthy".to_string()),
                groq_configured: true,
                ..HealthStatus::default()
            })
        }
    }

    #[tokio::test]
    async fn run_routes_requests_to_matching_backend_call() {
        let backend = FakeBackend::default();

        let event = run(
            &backend,
            3,
            AnalysisRequest::Legal {
                file: SelectedFile::new("/docs/notice.pdf", "application/pdf", 10),
                language: "Marathi".to_string(),
            },
        )
        .await;
        assert!(matches!(event, AppEvent::AnalysisFinished { ticket: 3, outcome: Ok(_) }));

        let event = run(
            &backend,
            4,
            AnalysisRequest::Chat {
                question: "Deadline?".to_string(),
                context: None,
                mode: Mode::Legal,
                language: "English".to_string(),
            },
        )
        .await;
        let AppEvent::ChatFinished { ticket, outcome } = event else {
            panic!("expected chat event");
        };
        assert_eq!(ticket, 4);
        assert_eq!(outcome.expect("chat should succeed"), "answer to Deadline?");

        let calls = backend.calls.lock().expect("calls lock").clone();
        assert_eq!(
            calls,
            vec![
                "legal:notice.pdf:Marathi".to_string(),
                "chat:Deadline?:false:legal:English".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn run_passes_failures_through() {
        let backend = FakeBackend {
            fail_with: Some(AnalysisError::new("Analysis failed")),
            ..FakeBackend::default()
        };
        let event = run(
            &backend,
            9,
            AnalysisRequest::Sustainability {
                file: None,
                text: Some("I drive daily".to_string()),
                language: "English".to_string(),
            },
        )
        .await;
        let AppEvent::AnalysisFinished { ticket, outcome } = event else {
            panic!("expected analysis event");
        };
        assert_eq!(ticket, 9);
        assert_eq!(outcome.expect_err("should fail").message, "Analysis failed");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn execute_posts_event_to_channel() {
        let (tx, rx) = mpsc::channel();
        let dispatcher = Dispatcher::new(Arc::new(FakeBackend::default()), Handle::current(), tx);

        dispatcher.execute(
            11,
            AnalysisRequest::Sustainability {
                file: None,
                text: Some("bus commute".to_string()),
                language: "English".to_string(),
            },
        );
        dispatcher.probe_health();

        let received = tokio::task::spawn_blocking(move || {
            let first = rx.recv_timeout(Duration::from_secs(5));
            let second = rx.recv_timeout(Duration::from_secs(5));
            (first, second)
        })
        .await
        .expect("blocking task should join");

        let events = [
            received.0.expect("first event should arrive"),
            received.1.expect("second event should arrive"),
        ];
        assert!(events
            .iter()
            .any(|event| matches!(event, AppEvent::AnalysisFinished { ticket: 11, outcome: Ok(_) })));
        assert!(events
            .iter()
            .any(|event| matches!(event, AppEvent::HealthChecked(Ok(_)))));
    }
}

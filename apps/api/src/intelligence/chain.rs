use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::intelligence::{BackendError, BackendKind, GenerationRequest, SkillIntelligenceBackend};
use crate::skills::json_recovery::recover_json;

/// A value accepted from some backend in the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub backend: BackendKind,
    /// Recovered from unstructured text rather than JSON.
    pub salvaged: bool,
}

/// Ordered backends, each tried once until one yields a usable value.
pub struct FallbackChain {
    backends: Vec<Arc<dyn SkillIntelligenceBackend>>,
}

impl FallbackChain {
    pub fn new(backends: Vec<Arc<dyn SkillIntelligenceBackend>>) -> Self {
        Self { backends }
    }

    pub fn kinds(&self) -> impl Iterator<Item = BackendKind> + '_ {
        self.backends.iter().map(|b| b.kind())
    }

    /// Walks the chain and returns the first response whose recovered JSON passes
    /// `accept`. `None` only when every backend failed or answered off-shape.
    pub async fn resolve<T, A>(
        &self,
        operation: &str,
        request: &GenerationRequest,
        accept: A,
    ) -> Option<Resolved<T>>
    where
        T: Send,
        A: Fn(Value) -> Option<T> + Send + Sync,
    {
        self.resolve_with_salvage(operation, request, accept, |_: &str| None)
            .await
    }

    /// Like [`resolve`](Self::resolve), but the first non-empty unstructured reply is
    /// kept and handed to `salvage` before the heuristic backend is consulted (and
    /// once more if the chain runs out).
    pub async fn resolve_with_salvage<T, A, S>(
        &self,
        operation: &str,
        request: &GenerationRequest,
        accept: A,
        salvage: S,
    ) -> Option<Resolved<T>>
    where
        T: Send,
        A: Fn(Value) -> Option<T> + Send + Sync,
        S: Fn(&str) -> Option<T> + Send + Sync,
    {
        let subject = request.task.subject();
        let mut unstructured: Option<(BackendKind, String)> = None;
        let mut salvage_tried = false;

        for backend in &self.backends {
            let kind = backend.kind();

            if kind == BackendKind::Heuristic {
                salvage_tried = true;
                if let Some(resolved) = try_salvage(operation, &unstructured, &salvage) {
                    return Some(resolved);
                }
            }

            match backend.generate(request).await {
                Ok(text) => {
                    if let Some(value) = recover_json(&text).and_then(&accept) {
                        info!(operation, backend = %kind, subject = %subject, "resolved");
                        return Some(Resolved {
                            value,
                            backend: kind,
                            salvaged: false,
                        });
                    }
                    warn!(
                        operation,
                        backend = %kind,
                        subject = %subject,
                        "response held no usable JSON"
                    );
                    if unstructured.is_none() && !text.trim().is_empty() {
                        unstructured = Some((kind, text));
                    }
                }
                Err(BackendError::MissingCredential) => {
                    debug!(operation, backend = %kind, "skipped, no credential configured");
                }
                Err(err) => {
                    warn!(
                        operation,
                        backend = %kind,
                        subject = %subject,
                        error = %err,
                        "backend failed"
                    );
                }
            }
        }

        if salvage_tried {
            return None;
        }
        try_salvage(operation, &unstructured, &salvage)
    }
}

fn try_salvage<T, S>(
    operation: &str,
    unstructured: &Option<(BackendKind, String)>,
    salvage: &S,
) -> Option<Resolved<T>>
where
    S: Fn(&str) -> Option<T>,
{
    let (kind, text) = unstructured.as_ref()?;
    let value = salvage(text)?;
    info!(operation, backend = %kind, "salvaged unstructured response");
    Some(Resolved {
        value,
        backend: *kind,
        salvaged: true,
    })
}

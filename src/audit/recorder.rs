//! Supervised audit queue.
//!
//! Events are pushed onto a bounded channel and written by a single worker
//! task. Semantics are at-most-once: a full queue or a failed write drops the
//! event with a warning, the client request is never delayed or failed by
//! auditing.

use sqlx::PgPool;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::audit::event::AuditEvent;

pub trait AuditSink: Send + Sync + 'static {
    fn ecrire(&self, evenement: AuditEvent)
        -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Production sink: one INSERT per event into `audit_logs`.
#[derive(Clone)]
pub struct PgAuditSink {
    pool: PgPool,
}

impl PgAuditSink {
    pub fn new(pool: PgPool) -> Self {
        PgAuditSink { pool }
    }
}

impl AuditSink for PgAuditSink {
    fn ecrire(
        &self,
        evenement: AuditEvent,
    ) -> impl Future<Output = anyhow::Result<()>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(
                "INSERT INTO audit_logs \
                 (table_name, record_id, action, old_values, new_values, \
                  user_id, ip_address, user_agent, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(&evenement.table_name)
            .bind(&evenement.record_id)
            .bind(evenement.action.as_str())
            .bind(&evenement.old_values)
            .bind(&evenement.new_values)
            .bind(evenement.user_id)
            .bind(&evenement.ip_address)
            .bind(&evenement.user_agent)
            .bind(evenement.created_at)
            .execute(&pool)
            .await?;
            Ok(())
        }
    }
}

#[derive(Clone)]
pub struct AuditRecorder {
    tx: mpsc::Sender<AuditEvent>,
}

impl AuditRecorder {
    /// Spawns the worker task and returns the handle used by the middleware.
    pub fn demarrer<S: AuditSink>(sink: S, capacite: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<AuditEvent>(capacite.max(1));

        let worker = tokio::spawn(async move {
            while let Some(evenement) = rx.recv().await {
                let resume = evenement.resume();
                match sink.ecrire(evenement).await {
                    Ok(()) => debug!("Entrée d'audit écrite: {}", resume),
                    Err(e) => warn!("Échec d'écriture d'audit ({}): {}", resume, e),
                }
            }
        });

        (AuditRecorder { tx }, worker)
    }

    /// Non-blocking enqueue. A full queue drops the event.
    pub fn enregistrer(&self, evenement: AuditEvent) {
        if let Err(e) = self.tx.try_send(evenement) {
            warn!("Événement d'audit abandonné: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::event::AuditAction;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MemoireSink {
        ecrits: Arc<Mutex<Vec<AuditEvent>>>,
    }

    impl AuditSink for MemoireSink {
        fn ecrire(
            &self,
            evenement: AuditEvent,
        ) -> impl Future<Output = anyhow::Result<()>> + Send {
            let ecrits = self.ecrits.clone();
            async move {
                ecrits.lock().unwrap().push(evenement);
                Ok(())
            }
        }
    }

    fn evenement_test(action: AuditAction) -> AuditEvent {
        AuditEvent {
            table_name: "ressources".to_string(),
            record_id: Some("12".to_string()),
            action,
            old_values: None,
            new_values: Some(serde_json::json!({"nom": "forage de Ndiaganiao"})),
            user_id: Some(1),
            ip_address: Some("127.0.0.1".to_string()),
            user_agent: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_evenement_ecrit_par_le_worker() {
        let sink = MemoireSink::default();
        let (recorder, worker) = AuditRecorder::demarrer(sink.clone(), 16);

        recorder.enregistrer(evenement_test(AuditAction::Create));
        drop(recorder);
        worker.await.unwrap();

        let ecrits = sink.ecrits.lock().unwrap();
        assert_eq!(ecrits.len(), 1);
        assert_eq!(ecrits[0].action, AuditAction::Create);
        assert_eq!(ecrits[0].record_id.as_deref(), Some("12"));
    }

    #[tokio::test]
    async fn test_une_entree_par_evenement() {
        let sink = MemoireSink::default();
        let (recorder, worker) = AuditRecorder::demarrer(sink.clone(), 16);

        recorder.enregistrer(evenement_test(AuditAction::Create));
        recorder.enregistrer(evenement_test(AuditAction::Update));
        recorder.enregistrer(evenement_test(AuditAction::Delete));
        drop(recorder);
        worker.await.unwrap();

        assert_eq!(sink.ecrits.lock().unwrap().len(), 3);
    }
}

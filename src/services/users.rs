//! In-memory user repository. Every operation reports database metrics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::metrics::DbMetricsRecorder;
use crate::models::{AppError, DbMetricsLabelValues};

pub const ERR_USER_NOT_FOUND: &str = "ERR_USER_NOT_FOUND";
pub const ERR_USER_INVALID: &str = "ERR_USER_INVALID";

const SOURCE: &str = "UserRepository";
const ENTITY: &str = "users";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

pub struct UserRepository {
    users: RwLock<HashMap<u64, User>>,
    next_id: AtomicU64,
    metrics: Arc<dyn DbMetricsRecorder>,
}

impl UserRepository {
    pub fn new(metrics: Arc<dyn DbMetricsRecorder>) -> Self {
        UserRepository {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            metrics,
        }
    }

    fn labels(op_type: &str) -> DbMetricsLabelValues {
        DbMetricsLabelValues {
            op_type: op_type.to_string(),
            source: SOURCE.to_string(),
            entity: ENTITY.to_string(),
            is_txn: "false".to_string(),
        }
    }

    pub async fn find(&self, id: u64) -> Result<User, AppError> {
        let lv = Self::labels("select");
        let start = self.metrics.log_metrics_pre(&lv);

        let result = self
            .users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::new(ERR_USER_NOT_FOUND, format!("user {} not found", id)));

        self.metrics.log_metrics_post(result.as_ref().err(), &lv, start);
        result
    }

    pub async fn insert(&self, name: &str, email: &str) -> Result<User, AppError> {
        let lv = Self::labels("insert");
        let start = self.metrics.log_metrics_pre(&lv);

        let result = if name.trim().is_empty() || !email.contains('@') {
            Err(AppError::new(ERR_USER_INVALID, "name and a valid email are required"))
        } else {
            let user = User {
                id: self.next_id.fetch_add(1, Ordering::Relaxed),
                name: name.to_string(),
                email: email.to_string(),
            };
            self.users.write().await.insert(user.id, user.clone());
            debug!(user_id = user.id, "Inserted user");
            Ok(user)
        };

        self.metrics.log_metrics_post(result.as_ref().err(), &lv, start);
        result
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

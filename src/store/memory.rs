use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{hash_map::Entry, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{PlanId, PlanStore, SavedPlan};
use crate::error::AppError;

/// Process-lifetime plan store. No eviction; plans are never updated or removed.
#[derive(Debug, Default)]
pub struct MemoryPlanStore {
    plans: RwLock<HashMap<PlanId, SavedPlan>>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.plans.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.plans.read().await.is_empty()
    }

    /// Keeps an existing plan if `id` is already taken.
    pub async fn insert(&self, id: PlanId, plan: SavedPlan) -> bool {
        match self.plans.write().await.entry(id) {
            Entry::Occupied(entry) => {
                warn!(plan_id = %entry.key(), "Plan id collision, keeping the first plan.");
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(plan);
                true
            }
        }
    }

    /// Stores `plan` under the first id from `next_id` that is not taken yet.
    pub async fn insert_with<F>(&self, mut next_id: F, plan: SavedPlan) -> PlanId
    where
        F: FnMut() -> PlanId + Send,
    {
        let mut plans = self.plans.write().await;
        loop {
            match plans.entry(next_id()) {
                Entry::Occupied(entry) => warn!(plan_id = %entry.key(), "Plan id collision, drawing a new id."),
                Entry::Vacant(entry) => {
                    let id = entry.key().clone();
                    entry.insert(plan);
                    return id;
                }
            }
        }
    }
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn save(&self, form_data: Value, results: Value, created_at: DateTime<Utc>) -> Result<PlanId, AppError> {
        let id = self.insert_with(PlanId::generate, SavedPlan { form_data, results, created_at }).await;
        debug!(plan_id = %id, "Plan saved.");
        Ok(id)
    }

    async fn get(&self, id: &PlanId) -> Result<SavedPlan, AppError> {
        self.plans.read().await.get(id).cloned().ok_or_else(|| AppError::NotFoundError(id.to_string()))
    }
}

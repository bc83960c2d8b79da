use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use serde_json::Value;

use crate::{
    error::AppError,
    store::{PlanId, PlanStore, SavedPlan},
};

mock! {
    pub PlanStore {}

    #[async_trait]
    impl PlanStore for PlanStore {
        async fn save(&self, form_data: Value, results: Value, created_at: DateTime<Utc>) -> Result<PlanId, AppError>;
        async fn get(&self, id: &PlanId) -> Result<SavedPlan, AppError>;
    }
}

/// A store whose every call fails
pub fn failing_store() -> MockPlanStore {
    let mut store = MockPlanStore::new();
    store.expect_save().returning(|_, _, _| Err(AppError::InternalError("store offline".to_owned())));
    store.expect_get().returning(|_| Err(AppError::InternalError("store offline".to_owned())));
    store
}

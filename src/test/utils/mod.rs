pub mod mock_cfg;
pub mod mock_store;
pub mod mock_time;

use crate::{
    api::{router, AppState},
    planner::coefficients::CoefficientTable,
    store::{MemoryPlanStore, PlanStore},
};
use axum::Router;
use mock_cfg::mock_cfg;
use mock_store::{failing_store, MockPlanStore};
use mock_time::MockTimeProvider;
use std::sync::Arc;

pub type MockAppState<S = MemoryPlanStore> = Arc<AppState<S, MockTimeProvider>>;

pub fn set_app_state_with<S: PlanStore>(start_time: i64, store: S) -> MockAppState<S> {
    let time_provider = Arc::new(MockTimeProvider::new(start_time));
    AppState::new(Arc::new(CoefficientTable::default()), Arc::new(store), time_provider, mock_cfg())
}

pub fn set_app_state(start_time: i64) -> MockAppState {
    set_app_state_with(start_time, MemoryPlanStore::new())
}

pub fn set_failing_app_state(start_time: i64) -> MockAppState<MockPlanStore> {
    set_app_state_with(start_time, failing_store())
}

/// Router over a fresh in-memory store, plus the state for inspection
pub fn set_app(start_time: i64) -> (MockAppState, Router) {
    let app_state = set_app_state(start_time);
    (app_state.clone(), router(app_state))
}

//! Stateful property testing for the notification center.
//!
//! Uses proptest-state-machine to interleave server changes, refreshes,
//! mark-as-read calls and gateway failures. The model tracks:
//!
//! - What the server holds (ids and read flags)
//! - What the client cache should hold after each step
//! - Whether fetches or marks currently fail
//!
//! After every step the center must agree with the model, hold unique ids,
//! and report an unread count equal to its unread records.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use proptest_state_machine::{ReferenceStateMachine, StateMachineTest, prop_state_machine};
use tokio::runtime::Runtime;

use common::{MockGateway, id, read_states, record};
use forum_notify_core::{CenterConfig, NotificationCenter, RefreshTrigger};

/// Operations that can be performed on the center or the server.
#[derive(Debug, Clone)]
pub enum CenterOperation {
    /// The server's list changes (new events, other devices reading).
    ServerPublish { records: Vec<(i64, bool)> },
    /// A list refresh from any trigger.
    Refresh,
    /// Mark one notification read.
    MarkOne { id: i64 },
    /// Mark everything read.
    MarkAll,
    /// Make subsequent gateway calls fail or succeed.
    SetFailures { fetch: bool, marks: bool },
}

/// Reference model.
#[derive(Clone, Debug, Default)]
pub struct CenterModel {
    pub server: Vec<(i64, bool)>,
    pub client: Vec<(i64, bool)>,
    pub fetch_fails: bool,
    pub marks_fail: bool,
}

/// First occurrence of each id wins.
fn dedupe(records: &[(i64, bool)]) -> Vec<(i64, bool)> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|(id, _)| seen.insert(*id))
        .copied()
        .collect()
}

impl ReferenceStateMachine for CenterModel {
    type State = Self;
    type Transition = CenterOperation;

    fn init_state() -> BoxedStrategy<Self::State> {
        Just(Self::default()).boxed()
    }

    fn transitions(_state: &Self::State) -> BoxedStrategy<Self::Transition> {
        prop_oneof![
            2 => prop::collection::vec((0i64..8, any::<bool>()), 0..6)
                .prop_map(|records| CenterOperation::ServerPublish { records }),
            3 => Just(CenterOperation::Refresh),
            4 => (0i64..10).prop_map(|id| CenterOperation::MarkOne { id }),
            1 => Just(CenterOperation::MarkAll),
            1 => (any::<bool>(), any::<bool>())
                .prop_map(|(fetch, marks)| CenterOperation::SetFailures { fetch, marks }),
        ]
        .boxed()
    }

    fn apply(mut state: Self::State, transition: &Self::Transition) -> Self::State {
        match transition {
            CenterOperation::ServerPublish { records } => {
                state.server = records.clone();
            }
            CenterOperation::Refresh => {
                if !state.fetch_fails {
                    state.client = dedupe(&state.server);
                }
            }
            CenterOperation::MarkOne { id } => {
                let unread_locally = state
                    .client
                    .iter()
                    .any(|(cid, is_read)| cid == id && !is_read);
                if unread_locally && !state.marks_fail {
                    for (sid, is_read) in state.server.iter_mut() {
                        if sid == id {
                            *is_read = true;
                        }
                    }
                    for (cid, is_read) in state.client.iter_mut() {
                        if cid == id {
                            *is_read = true;
                        }
                    }
                }
            }
            CenterOperation::MarkAll => {
                if !state.marks_fail {
                    for (_, is_read) in state.server.iter_mut() {
                        *is_read = true;
                    }
                    for (_, is_read) in state.client.iter_mut() {
                        *is_read = true;
                    }
                }
            }
            CenterOperation::SetFailures { fetch, marks } => {
                state.fetch_fails = *fetch;
                state.marks_fail = *marks;
            }
        }
        state
    }
}

/// Test harness wrapping a real center and a mock gateway.
pub struct CenterTestHarness {
    runtime: Runtime,
    gateway: Arc<MockGateway>,
    center: Arc<NotificationCenter>,
}

impl CenterTestHarness {
    fn new() -> Self {
        let runtime = Runtime::new().expect("Failed to create tokio runtime");
        let gateway = MockGateway::new(vec![]);
        let center = NotificationCenter::new(gateway.clone(), CenterConfig::default());
        Self {
            runtime,
            gateway,
            center,
        }
    }

    fn apply_operation(&self, op: &CenterOperation) {
        self.runtime.block_on(async {
            match op {
                CenterOperation::ServerPublish { records } => {
                    self.gateway.set_server_list(
                        records
                            .iter()
                            .map(|(id, is_read)| record(*id, *is_read))
                            .collect(),
                    );
                }
                CenterOperation::Refresh => {
                    let _ = self.center.refresh(RefreshTrigger::PollTick).await;
                }
                CenterOperation::MarkOne { id: n } => {
                    let _ = self.center.mark_one(&id(*n)).await;
                }
                CenterOperation::MarkAll => {
                    let _ = self.center.mark_all().await;
                }
                CenterOperation::SetFailures { fetch, marks } => {
                    self.gateway.fail_fetch(*fetch);
                    self.gateway.fail_marks(*marks);
                }
            }
        });
    }

    fn verify_invariants(&self, model: &CenterModel) {
        self.runtime.block_on(async {
            let snapshot = self.center.snapshot().await;

            // Invariant 1: cache matches model, in order
            let expected: Vec<_> = model
                .client
                .iter()
                .map(|(n, is_read)| (id(*n), *is_read))
                .collect();
            assert_eq!(read_states(&snapshot.records), expected);

            // Invariant 2: ids are unique
            let unique: HashSet<_> = snapshot.records.iter().map(|r| r.id.clone()).collect();
            assert_eq!(unique.len(), snapshot.records.len(), "duplicate ids in cache");

            // Invariant 3: counter is derived from the records
            let unread = snapshot.records.iter().filter(|r| !r.is_read).count();
            assert_eq!(snapshot.unread, unread);
            assert_eq!(self.center.unread_count().await, unread);

            // Invariant 4: no refresh is left holding the guard
            assert!(!snapshot.loading);
        });
    }
}

impl StateMachineTest for CenterTestHarness {
    type SystemUnderTest = Self;
    type Reference = CenterModel;

    fn init_test(
        _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
    ) -> Self::SystemUnderTest {
        Self::new()
    }

    fn apply(
        state: Self::SystemUnderTest,
        ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        transition: <Self::Reference as ReferenceStateMachine>::Transition,
    ) -> Self::SystemUnderTest {
        state.apply_operation(&transition);
        state.verify_invariants(ref_state);
        state
    }

    fn check_invariants(
        state: &Self::SystemUnderTest,
        ref_state: &<Self::Reference as ReferenceStateMachine>::State,
    ) {
        state.verify_invariants(ref_state);
    }
}

prop_state_machine! {
    #![proptest_config(ProptestConfig {
        // Use fewer cases for CI, increase with PROPTEST_CASES env var
        cases: 100,
        max_shrink_iters: 10000,
        ..ProptestConfig::default()
    })]

    #[test]
    fn center_state_machine_test(sequential 1..60 => CenterTestHarness);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn refresh_counter_matches_records(
        records in prop::collection::vec((0i64..20, any::<bool>()), 0..30)
    ) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let gateway = MockGateway::new(
                records.iter().map(|(n, is_read)| record(*n, *is_read)).collect(),
            );
            let center = NotificationCenter::new(gateway.clone(), CenterConfig::default());
            center.refresh(RefreshTrigger::Manual).await.unwrap();

            let expected = dedupe(&records);
            let snapshot = center.snapshot().await;
            prop_assert_eq!(snapshot.records.len(), expected.len());
            prop_assert_eq!(
                snapshot.unread,
                expected.iter().filter(|(_, is_read)| !is_read).count()
            );

            Ok(())
        })?;
    }
}

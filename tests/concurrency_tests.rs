//! Concurrent access to a shared store.

mod common;

use std::sync::Arc;

use common::*;
use passcode_store::{PasscodeRequest, PasscodeStore};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_validations_consume_a_code_at_most_once() {
    let harness = Arc::new(TestHarness::new().await);
    let user_id = unique_user_id("race");
    let request = PasscodeRequest::new(&user_id).with_parameter("flow", "login");

    let code = harness.store.issue(&request).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let harness = harness.clone();
        let request = request.clone();
        let code = code.clone();
        handles.push(tokio::spawn(async move {
            harness
                .store
                .validate(&request, &code)
                .await
                .unwrap()
                .is_valid()
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        if handle.await.unwrap() {
            accepted += 1;
        }
    }

    assert_eq!(accepted, 1);
    assert!(harness.raw_record(&user_id).await.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn independent_users_do_not_interfere() {
    let harness = Arc::new(TestHarness::new().await);

    let mut handles = Vec::new();
    for i in 0..16 {
        let harness = harness.clone();
        handles.push(tokio::spawn(async move {
            let user_id = unique_user_id("parallel");
            let request = PasscodeRequest::new(&user_id).with_parameter("n", i.to_string());

            let code = harness.store.issue(&request).await.unwrap();
            let record = harness
                .store
                .validate(&PasscodeRequest::new(&user_id), &code)
                .await
                .unwrap()
                .into_record()
                .expect("own code should validate");
            assert_eq!(record.authorization_parameters["n"], i.to_string());
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    assert!(harness.cache.is_empty().unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn reissue_racing_validation_never_accepts_twice() {
    let harness = Arc::new(TestHarness::new().await);
    let user_id = unique_user_id("reissue_race");
    let request = PasscodeRequest::new(&user_id);

    let code = harness.store.issue(&request).await.unwrap();

    let validator = {
        let harness = harness.clone();
        let request = request.clone();
        let code = code.clone();
        tokio::spawn(async move { harness.store.validate(&request, &code).await.unwrap() })
    };
    let reissuer = {
        let harness = harness.clone();
        let request = request.clone();
        tokio::spawn(async move { harness.store.issue(&request).await.unwrap() })
    };

    let first_outcome = validator.await.unwrap();
    let new_code = reissuer.await.unwrap();

    // Whatever the interleaving, the original code is gone afterwards.
    let again = harness.store.validate(&request, &code).await.unwrap();
    if new_code != code {
        assert!(!again.is_valid());
    }
    if first_outcome.is_valid() {
        assert_eq!(first_outcome.record().unwrap().user_id, user_id);
    }
}

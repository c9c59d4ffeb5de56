// Usage gate tests: free trial, paid tokens, concurrent consumption
// Author: kelexine (https://github.com/kelexine)

use review_translator::error::AppError;
use review_translator::gate::{Grant, UsageGate, TOKEN_REJECTED, TRIAL_EXHAUSTED};
use review_translator::store::{GenerationToken, UsageStore};
use tempfile::TempDir;

fn create_test_gate(limit: u32) -> (UsageGate, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = UsageStore::open(temp_dir.path().join("usage.db")).expect("Failed to open store");
    (UsageGate::new(store, limit), temp_dir)
}

async fn seed_token(gate: &UsageGate, token: &str, remaining: u32) {
    gate.store()
        .upsert_token(GenerationToken {
            token: token.to_string(),
            remaining_generations: remaining,
            expires_at: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_fresh_device_is_permitted() {
    let (gate, _dir) = create_test_gate(3);

    let grant = gate.authorize(Some("device-1"), None).await.unwrap();
    assert_eq!(grant, Grant::Trial { uses_count: 1 });

    let record = gate.store().trial_record("device-1").await.unwrap().unwrap();
    assert_eq!(record.uses_count, 1);
}

#[tokio::test]
async fn test_trial_denied_after_limit() {
    let (gate, _dir) = create_test_gate(3);

    for expected in 1..=3 {
        let grant = gate.authorize(Some("device-1"), None).await.unwrap();
        assert_eq!(grant, Grant::Trial { uses_count: expected });
    }

    for _ in 0..2 {
        match gate.authorize(Some("device-1"), None).await {
            Err(AppError::PaymentRequired(reason)) => assert_eq!(reason, TRIAL_EXHAUSTED),
            other => panic!("expected payment required, got {:?}", other),
        }
    }

    let record = gate.store().trial_record("device-1").await.unwrap().unwrap();
    assert_eq!(record.uses_count, 3);
}

#[tokio::test]
async fn test_devices_are_independent() {
    let (gate, _dir) = create_test_gate(1);
    gate.authorize(Some("a"), None).await.unwrap();
    assert!(gate.authorize(Some("a"), None).await.is_err());
    assert!(gate.authorize(Some("b"), None).await.is_ok());
}

#[tokio::test]
async fn test_trial_status() {
    let (gate, _dir) = create_test_gate(2);

    let status = gate.trial_status("new-device").await.unwrap();
    assert!(status.has_free_trial);
    assert_eq!(status.uses_remaining, 2);

    gate.authorize(Some("new-device"), None).await.unwrap();
    let status = gate.trial_status("new-device").await.unwrap();
    assert!(status.has_free_trial);
    assert_eq!(status.uses_remaining, 1);

    gate.authorize(Some("new-device"), None).await.unwrap();
    let status = gate.trial_status("new-device").await.unwrap();
    assert!(!status.has_free_trial);
    assert_eq!(status.uses_remaining, 0);
}

#[tokio::test]
async fn test_token_decrements_by_one() {
    let (gate, _dir) = create_test_gate(3);
    seed_token(&gate, "tok", 3).await;

    assert_eq!(
        gate.authorize(None, Some("tok")).await.unwrap(),
        Grant::Token { remaining: 2 }
    );
    assert_eq!(
        gate.authorize(None, Some("tok")).await.unwrap(),
        Grant::Token { remaining: 1 }
    );

    let token = gate.store().token("tok").await.unwrap().unwrap();
    assert_eq!(token.remaining_generations, 1);
}

#[tokio::test]
async fn test_exhausted_token_is_denied() {
    let (gate, _dir) = create_test_gate(3);
    seed_token(&gate, "empty", 0).await;

    for _ in 0..3 {
        match gate.authorize(None, Some("empty")).await {
            Err(AppError::PaymentRequired(reason)) => assert_eq!(reason, TOKEN_REJECTED),
            other => panic!("expected payment required, got {:?}", other),
        }
    }
    let token = gate.store().token("empty").await.unwrap().unwrap();
    assert_eq!(token.remaining_generations, 0);
}

#[tokio::test]
async fn test_unknown_token_is_denied() {
    let (gate, _dir) = create_test_gate(3);
    assert!(matches!(
        gate.authorize(None, Some("missing")).await,
        Err(AppError::PaymentRequired(_))
    ));
}

#[tokio::test]
async fn test_expired_token_is_denied() {
    let (gate, _dir) = create_test_gate(3);
    gate.store()
        .upsert_token(GenerationToken {
            token: "stale".to_string(),
            remaining_generations: 10,
            expires_at: Some(chrono::Utc::now().timestamp() - 60),
        })
        .await
        .unwrap();

    assert!(matches!(
        gate.authorize(None, Some("stale")).await,
        Err(AppError::PaymentRequired(_))
    ));
}

#[tokio::test]
async fn test_token_takes_precedence_over_device() {
    let (gate, _dir) = create_test_gate(3);
    seed_token(&gate, "tok", 0).await;

    // Exhausted token is not rescued by a fresh device id
    assert!(matches!(
        gate.authorize(Some("device-1"), Some("tok")).await,
        Err(AppError::PaymentRequired(_))
    ));
    assert!(gate.store().trial_record("device-1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_credentials() {
    let (gate, _dir) = create_test_gate(3);
    assert!(matches!(
        gate.authorize(None, None).await,
        Err(AppError::InvalidRequest(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_last_generation_granted_once() {
    let (gate, _dir) = create_test_gate(3);
    seed_token(&gate, "last-one", 1).await;

    let first = {
        let gate = gate.clone();
        tokio::spawn(async move { gate.authorize(None, Some("last-one")).await })
    };
    let second = {
        let gate = gate.clone();
        tokio::spawn(async move { gate.authorize(None, Some("last-one")).await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let granted = results.iter().filter(|r| r.is_ok()).count();
    let denied = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::PaymentRequired(_))))
        .count();

    assert_eq!(granted, 1);
    assert_eq!(denied, 1);
    let token = gate.store().token("last-one").await.unwrap().unwrap();
    assert_eq!(token.remaining_generations, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_trial_never_overspends() {
    let (gate, _dir) = create_test_gate(3);

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let gate = gate.clone();
            tokio::spawn(async move { gate.authorize(Some("busy-device"), None).await })
        })
        .collect();

    let mut granted = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            granted += 1;
        }
    }

    assert_eq!(granted, 3);
    let record = gate.store().trial_record("busy-device").await.unwrap().unwrap();
    assert_eq!(record.uses_count, 3);
}

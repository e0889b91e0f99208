//! End-to-end relay claims against a mock indexer and backend.

use airdrop_claimer::api::{ApiTransport, BackendClient, IndexerClient};
use airdrop_claimer::auth::{authorization_message, AuthorizationChallenge};
use airdrop_claimer::blockchain::Wallet;
use airdrop_claimer::claim::{ClaimDetail, ClaimOutcome, ClaimRunner, ClaimStrategy, FailureLog, RelayClaim};
use airdrop_claimer::config::{ApiConfig, IndexerConfig, ScheduleConfig};
use airdrop_claimer::Shutdown;
use alloy::primitives::{hex, Address};
use alloy::signers::Signature;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

mod common;

// Anvil accounts #0 and #1
const CLAIMER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const EMPTY_KEY: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

fn relay(addr: SocketAddr) -> RelayClaim {
    let transport = ApiTransport::new(&ApiConfig::default(), Duration::from_secs(60)).unwrap();
    let indexer = IndexerClient::new(
        transport.clone(),
        &IndexerConfig {
            url: format!("http://{}/v2", addr),
            ..IndexerConfig::default()
        },
    )
    .unwrap();
    let backend = BackendClient::new(transport, format!("http://{}/api/", addr)).unwrap();
    RelayClaim::new(Arc::new(indexer), Arc::new(backend), None)
}

/// Routes by path. The claimer wallet owns NFT 200; every other wallet owns nothing.
async fn start_backend(claimer: Address) -> (SocketAddr, common::RequestLog) {
    let claimer = claimer.to_checksum(None);
    common::start_programmable_backend(move |req| {
        let claimer = claimer.clone();
        async move {
            let body = match req.path() {
                "/v2/getNFTsForOwner" if req.target.contains(&claimer) => json!({
                    "ownedNfts": [{"metadata": {"properties": {"number": 200}}}]
                }),
                "/v2/getNFTsForOwner" => json!({"ownedNfts": []}),
                "/api/checkEligible" => json!({"status": 200, "body": ["200"]}),
                "/api/getNonce" => json!({
                    "status": 200,
                    "body": "{\"nonce\":3,\"timestamp\":1700000000000}"
                }),
                "/api/callRelayer" => json!({
                    "statusCode": 200,
                    "body": "{\"message\":\"success\"}"
                }),
                _ => return (404, String::new()),
            };
            (200, body.to_string())
        }
    })
    .await
}

#[tokio::test]
async fn test_relay_claim_end_to_end() {
    let wallet = Wallet::from_private_key(CLAIMER_KEY).unwrap();
    let (addr, log) = start_backend(wallet.address()).await;

    let outcome = relay(addr).claim(&wallet).await.unwrap();
    assert_eq!(
        outcome,
        ClaimOutcome::Claimed(ClaimDetail::Relayed {
            assets: vec!["200".into()]
        })
    );

    let requests = log.lock().unwrap();
    let paths: Vec<&str> = requests.iter().map(|r| r.path()).collect();
    assert_eq!(
        paths,
        vec!["/v2/getNFTsForOwner", "/api/checkEligible", "/api/getNonce", "/api/callRelayer"]
    );

    let payload = requests[3].json();
    assert_eq!(payload["tokenIDs"], json!(["200"]));
    assert_eq!(payload["nonce"], json!(3));
    assert_eq!(payload["timestamp"], json!(1_700_000_000_000u64));

    let sig = hex::decode(payload["sig"].as_str().unwrap()).unwrap();
    let signature = Signature::try_from(sig.as_slice()).unwrap();
    let message = authorization_message(
        wallet.address(),
        &AuthorizationChallenge {
            nonce: 3,
            timestamp: 1_700_000_000_000,
        },
    );
    assert_eq!(
        signature.recover_address_from_msg(message.as_bytes()).unwrap(),
        wallet.address()
    );
}

#[tokio::test]
async fn test_wallet_without_nfts_makes_no_backend_calls() {
    let claimer = Wallet::from_private_key(CLAIMER_KEY).unwrap();
    let empty = Wallet::from_private_key(EMPTY_KEY).unwrap();
    let (addr, log) = start_backend(claimer.address()).await;

    let outcome = relay(addr).claim(&empty).await.unwrap();
    assert_eq!(outcome, ClaimOutcome::NothingToClaim);

    let requests = log.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path(), "/v2/getNFTsForOwner");
}

#[tokio::test]
async fn test_runner_records_unreachable_wallets() {
    let wallet = Wallet::from_private_key(CLAIMER_KEY).unwrap();
    // nothing listens on the discard port of localhost
    let unreachable: SocketAddr = "127.0.0.1:9".parse().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let failure_log = FailureLog::new(dir.path().join("failed_wallets.txt"));
    let runner = ClaimRunner::new(
        Arc::new(relay(unreachable)),
        failure_log.clone(),
        ScheduleConfig {
            sleep_min_secs: 0,
            sleep_max_secs: 0,
            shuffle: false,
        },
        Shutdown::new(),
    );

    let summary = runner.run(vec![wallet.clone()]).await;
    assert_eq!(summary.failed, 1);

    let contents = std::fs::read_to_string(failure_log.path()).unwrap();
    assert_eq!(contents.trim(), wallet.address().to_checksum(None));
}

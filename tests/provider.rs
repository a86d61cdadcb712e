//! End-to-end provider behavior over recorded transport, chain and custody

mod common;

use alloy::primitives::{Address, TxHash, U256};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use common::*;
use p256::ecdsa::{signature::Verifier, Signature, SigningKey, VerifyingKey};
use p256::pkcs8::EncodePrivateKey;
use privy_evm_wallet::contracts::IERC20;
use privy_evm_wallet::{
    Canonicalizer, EvmTransaction, EvmWalletProvider, JsonCanonicalizer, PrivyEvmWalletProvider,
    ReceiptStatus, TypedData, WalletConfig, WalletError,
};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};

// ========== Construction ==========

#[tokio::test]
async fn test_address_is_embedded_wallet() {
    let provider = provider(MockTransport::new()).await.unwrap();

    assert_eq!(provider.address(), WALLET_ADDRESS);
    assert_eq!(provider.name(), "privy_evm_embedded_wallet_provider");
    assert_eq!(
        serde_json::to_value(provider.network()).unwrap(),
        json!({ "protocolFamily": "evm", "chainId": "84532", "networkId": "base-sepolia" })
    );
}

#[tokio::test]
async fn test_missing_fields_fail_construction() {
    let cases = [
        (
            WalletConfig {
                wallet_id: String::new(),
                ..test_config()
            },
            "walletId is required",
        ),
        (
            WalletConfig {
                app_id: String::new(),
                ..test_config()
            },
            "appId and appSecret are required",
        ),
        (
            WalletConfig {
                app_secret: String::new(),
                ..test_config()
            },
            "appId and appSecret are required",
        ),
        (
            WalletConfig {
                authorization_private_key: String::new(),
                ..test_config()
            },
            "authorizationPrivateKey is required",
        ),
    ];

    for (config, message) in cases {
        let custody = MockCustody::default();
        let result =
            PrivyEvmWalletProvider::builder(config, MockChain::default(), MockTransport::new())
                .configure_with_wallet(&custody)
                .await;

        let err = result.err().unwrap();
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), message);
        assert_eq!(custody.lookup_count(), 0);
    }
}

// ========== Signing ==========

#[tokio::test]
async fn test_sign_message() {
    let transport = MockTransport::new();
    let provider = provider(transport.clone()).await.unwrap();

    let signature = assert_ok!(provider.sign_message("Hello, world!").await);
    assert_eq!(signature.to_string(), "0x1234");

    let request = transport.last();
    assert_eq!(request.url, "https://api.privy.io/v1/wallets/test-wallet-id/rpc");
    let body = request.json();
    assert_eq!(body["method"], "personal_sign");
    assert_eq!(body["chain_type"], "ethereum");
    assert_eq!(body["params"], json!({ "message": "Hello, world!", "encoding": "utf-8" }));
    assert_eq!(
        body["address"].as_str().unwrap().parse::<Address>().unwrap(),
        WALLET_ADDRESS
    );
}

#[tokio::test]
async fn test_every_request_carries_authorization_headers() {
    let transport = MockTransport::new();
    let provider = provider(transport.clone()).await.unwrap();

    provider.sign_message("Hello, world!").await.unwrap();
    provider
        .send_transaction(EvmTransaction::transfer(RECIPIENT, U256::from(ONE_ETHER)))
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    for request in requests {
        assert_eq!(request.header("privy-app-id"), "test-app-id");
        assert!(!request.header("privy-authorization-signature").is_empty());
        assert!(request.header("authorization").starts_with("Bearer "));
    }
}

#[tokio::test]
async fn test_sign_typed_data() {
    let transport = MockTransport::new();
    let provider = provider(transport.clone()).await.unwrap();

    let data: TypedData = serde_json::from_value(json!({
        "domain": { "name": "Test", "chainId": 84532 },
        "types": { "Test": [{ "name": "test", "type": "string" }] },
        "primaryType": "Test",
        "message": { "test": "test" },
    }))
    .unwrap();

    let signature = provider.sign_typed_data(data).await.unwrap();
    assert_eq!(signature.to_string(), "0x1234");

    let body = transport.last().json();
    assert_eq!(body["method"], "eth_signTypedData_v4");
    assert_eq!(body["params"]["typed_data"]["primary_type"], "Test");
}

#[tokio::test]
async fn test_sign_transaction_fills_missing_fields() {
    let transport = MockTransport::new();
    let provider = provider(transport.clone()).await.unwrap();

    let signed = provider
        .sign_transaction(EvmTransaction::transfer(RECIPIENT, U256::from(ONE_ETHER)))
        .await
        .unwrap();
    assert_eq!(signed.to_string(), "0x1234");
    assert_eq!(provider.chain().fill_count(), 1);

    let body = transport.last().json();
    let tx = &body["params"]["transaction"];
    assert_eq!(tx["nonce"], 0);
    assert_eq!(tx["gas_limit"], 21_000);
    assert_eq!(tx["chain_id"], 84532);
    assert_eq!(tx["max_fee_per_gas"], "2000000000");
    assert_eq!(
        tx["from"].as_str().unwrap().parse::<Address>().unwrap(),
        WALLET_ADDRESS
    );
}

#[tokio::test]
async fn test_complete_transaction_is_not_refilled() {
    let provider = provider(MockTransport::new()).await.unwrap();

    let tx = EvmTransaction::transfer(RECIPIENT, U256::from(1u64))
        .with_nonce(9)
        .with_gas_limit(30_000)
        .with_fees(3, 1)
        .with_chain_id(84532);
    provider.sign_transaction(tx).await.unwrap();
    assert_eq!(provider.chain().fill_count(), 0);
}

#[tokio::test]
async fn test_send_transaction() {
    let transport = MockTransport::new();
    let provider = provider(transport.clone()).await.unwrap();

    let hash = provider
        .send_transaction(EvmTransaction::transfer(RECIPIENT, U256::from(ONE_ETHER)))
        .await
        .unwrap();
    assert_eq!(hash.to_string(), "0xef01");

    let body = transport.last().json();
    assert_eq!(body["method"], "eth_sendTransaction");
    assert_eq!(body["caip2"], "eip155:84532");
    assert_eq!(body["params"]["transaction"]["value"], "1000000000000000000");
}

#[tokio::test]
async fn test_native_transfer() {
    let transport = MockTransport::new();
    let provider = provider(transport.clone()).await.unwrap();

    let hash = provider.native_transfer(RECIPIENT, "1.0").await.unwrap();
    assert_eq!(hash.to_string(), "0xef01");

    let body = transport.last().json();
    let tx = &body["params"]["transaction"];
    assert_eq!(tx["value"], "1000000000000000000");
    assert_eq!(
        tx["to"].as_str().unwrap().parse::<Address>().unwrap(),
        RECIPIENT
    );
}

#[tokio::test]
async fn test_native_transfer_rejects_bad_amount_without_dispatch() {
    let transport = MockTransport::new();
    let provider = provider(transport.clone()).await.unwrap();

    let err = provider
        .native_transfer(RECIPIENT, "lots")
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidAmount { .. }));
    assert_eq!(transport.call_count(), 0);
}

// ========== Failures ==========

#[tokio::test]
async fn test_canonicalization_failure_makes_no_http_call() {
    let transport = MockTransport::new();
    let provider = PrivyEvmWalletProvider::builder(test_config(), MockChain::default(), transport.clone())
        .authorization_signer(StaticSigner)
        .canonicalizer(RejectingCanonicalizer)
        .configure_with_wallet(&MockCustody::default())
        .await
        .unwrap();

    let err = provider.sign_message("Hello, world!").await.unwrap_err();
    assert_eq!(err.to_string(), "Error generating Privy authorization signature");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_unparseable_authorization_key_makes_no_http_call() {
    // The default signer cannot use the placeholder key
    let transport = MockTransport::new();
    let provider = PrivyEvmWalletProvider::builder(test_config(), MockChain::default(), transport.clone())
        .configure_with_wallet(&MockCustody::default())
        .await
        .unwrap();

    let err = provider.sign_message("Hello, world!").await.unwrap_err();
    assert!(matches!(err, WalletError::SignatureGeneration));
    assert!(!format!("{:?}", err).contains("test-auth-key"));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_http_400() {
    let transport = MockTransport::failing(400);
    let provider = provider(transport.clone()).await.unwrap();

    let err = assert_err!(provider.sign_message("Hello, world!").await);
    assert_eq!(err.to_string(), "Privy request failed: HTTP error! status: 400");
    assert_eq!(transport.call_count(), 1);
}

// ========== Chain reads ==========

#[tokio::test]
async fn test_chain_reads_skip_authorization() {
    let transport = MockTransport::new();
    let provider = provider(transport.clone()).await.unwrap();

    assert_eq!(provider.get_balance().await.unwrap(), U256::from(ONE_ETHER));

    let receipt = provider
        .wait_for_transaction_receipt(TxHash::ZERO)
        .await
        .unwrap();
    assert_eq!(receipt.status, ReceiptStatus::Success);

    let balance = provider
        .read_contract_call(
            RECIPIENT,
            &IERC20::balanceOfCall {
                account: WALLET_ADDRESS,
            },
        )
        .await
        .unwrap();
    assert_eq!(balance, U256::from(42u64));

    assert_eq!(transport.call_count(), 0);
}

// ========== Export ==========

#[tokio::test]
async fn test_export_wallet() {
    let provider = provider(MockTransport::new()).await.unwrap();

    let export = serde_json::to_value(provider.export_wallet()).unwrap();
    assert_eq!(
        export,
        json!({
            "walletId": "test-wallet-id",
            "authorizationPrivateKey": "wallet-auth:test-auth-key",
            "networkId": "base-sepolia",
            "chainId": "84532",
        })
    );
}

// ========== Real authorization signatures ==========

#[tokio::test]
async fn test_signature_header_verifies_against_sent_request() {
    let secret = p256::SecretKey::from_slice(&[11u8; 32]).unwrap();
    let der = secret.to_pkcs8_der().unwrap();
    let key = format!("wallet-auth:{}", BASE64.encode(der.as_bytes()));

    let config = WalletConfig {
        authorization_private_key: key,
        ..test_config()
    };
    let transport = MockTransport::new();
    let provider = PrivyEvmWalletProvider::builder(config, MockChain::default(), transport.clone())
        .configure_with_wallet(&MockCustody::default())
        .await
        .unwrap();

    provider.sign_message("Hello, world!").await.unwrap();

    let request = transport.last();
    let body: Value = request.json();
    let payload = JsonCanonicalizer
        .canonicalize(&json!({
            "version": 1,
            "method": "POST",
            "url": request.url,
            "body": body,
            "headers": { "privy-app-id": "test-app-id" },
        }))
        .unwrap();

    let signature_der = BASE64
        .decode(request.header("privy-authorization-signature"))
        .unwrap();
    let signature = Signature::from_der(&signature_der).unwrap();
    let verifying_key = VerifyingKey::from(&SigningKey::from(secret));
    assert!(verifying_key.verify(payload.as_bytes(), &signature).is_ok());
}

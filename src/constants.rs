//! Constants for the Privy wallet API

/// Privy REST API base URL
pub const PRIVY_API_BASE: &str = "https://api.privy.io";

/// Scheme prefix carried by authorization private keys
pub const AUTHORIZATION_KEY_PREFIX: &str = "wallet-auth:";

/// Version field of the authorization signature payload
pub const AUTHORIZATION_PAYLOAD_VERSION: u8 = 1;

/// Header carrying the Privy app ID
pub const HEADER_APP_ID: &str = "privy-app-id";

/// Header carrying the authorization signature
pub const HEADER_AUTHORIZATION_SIGNATURE: &str = "privy-authorization-signature";

/// Chain type sent on every wallet RPC body
pub const CHAIN_TYPE_ETHEREUM: &str = "ethereum";

/// `walletClientType` of Privy-managed embedded wallets
pub const EMBEDDED_WALLET_CLIENT_TYPE: &str = "privy";

/// Linked account type for wallets
pub const LINKED_ACCOUNT_WALLET: &str = "wallet";

/// Provider name reported by `name()`
pub const PROVIDER_NAME: &str = "privy_evm_embedded_wallet_provider";

/// Network used when the configuration leaves `networkId` empty
pub const DEFAULT_NETWORK_ID: &str = "base-sepolia";

/// Native currency decimals for every supported EVM network
pub const ETHER_DECIMALS: u8 = 18;

/// Build the CAIP-2 identifier for an EVM chain
pub fn caip2(chain_id: u64) -> String {
    format!("eip155:{}", chain_id)
}

/// Wallet RPC endpoint for a wallet ID
pub fn wallet_rpc_url(api_base: &str, wallet_id: &str) -> String {
    format!("{}/v1/wallets/{}/rpc", api_base.trim_end_matches('/'), wallet_id)
}

/// User lookup endpoint
pub fn user_url(api_base: &str, user_id: &str) -> String {
    format!("{}/v1/users/{}", api_base.trim_end_matches('/'), user_id)
}

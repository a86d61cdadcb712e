//! Network definitions and chain metadata
//!
//! Maps network IDs (`base-sepolia`, `ethereum-mainnet`, ...) to their EVM
//! chain IDs and default RPC endpoints.

use crate::constants::ETHER_DECIMALS;
use serde::{Deserialize, Serialize};

/// Protocol family of a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolFamily {
    Evm,
}

/// Network the provider is bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    pub protocol_family: ProtocolFamily,
    #[serde(with = "crate::serde_util::u64_string")]
    pub chain_id: u64,
    pub network_id: String,
}

/// Native currency of a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Chain metadata used to build a chain client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainMetadata {
    pub chain_id: u64,
    pub name: &'static str,
    pub rpc_url: &'static str,
    pub native_currency: NativeCurrency,
}

/// Resolves network IDs to descriptors and chain metadata
pub trait NetworkResolver: Send + Sync {
    fn network(&self, network_id: &str) -> Option<NetworkDescriptor>;

    fn chain(&self, network_id: &str) -> Option<ChainMetadata>;
}

const ETHER: NativeCurrency = NativeCurrency {
    name: "Ether",
    symbol: "ETH",
    decimals: ETHER_DECIMALS,
};

const POL: NativeCurrency = NativeCurrency {
    name: "POL",
    symbol: "POL",
    decimals: ETHER_DECIMALS,
};

/// (network ID, chain metadata)
const KNOWN_NETWORKS: &[(&str, ChainMetadata)] = &[
    (
        "base-mainnet",
        ChainMetadata {
            chain_id: 8453,
            name: "Base",
            rpc_url: "https://mainnet.base.org",
            native_currency: ETHER,
        },
    ),
    (
        "base-sepolia",
        ChainMetadata {
            chain_id: 84532,
            name: "Base Sepolia",
            rpc_url: "https://sepolia.base.org",
            native_currency: ETHER,
        },
    ),
    (
        "ethereum-mainnet",
        ChainMetadata {
            chain_id: 1,
            name: "Ethereum",
            rpc_url: "https://eth.merkle.io",
            native_currency: ETHER,
        },
    ),
    (
        "ethereum-sepolia",
        ChainMetadata {
            chain_id: 11155111,
            name: "Sepolia",
            rpc_url: "https://sepolia.drpc.org",
            native_currency: ETHER,
        },
    ),
    (
        "polygon-mainnet",
        ChainMetadata {
            chain_id: 137,
            name: "Polygon",
            rpc_url: "https://polygon-rpc.com",
            native_currency: POL,
        },
    ),
    (
        "polygon-mumbai",
        ChainMetadata {
            chain_id: 80001,
            name: "Polygon Mumbai",
            rpc_url: "https://rpc-mumbai.maticvigil.com",
            native_currency: POL,
        },
    ),
    (
        "arbitrum-mainnet",
        ChainMetadata {
            chain_id: 42161,
            name: "Arbitrum One",
            rpc_url: "https://arb1.arbitrum.io/rpc",
            native_currency: ETHER,
        },
    ),
    (
        "arbitrum-sepolia",
        ChainMetadata {
            chain_id: 421614,
            name: "Arbitrum Sepolia",
            rpc_url: "https://sepolia-rollup.arbitrum.io/rpc",
            native_currency: ETHER,
        },
    ),
    (
        "optimism-mainnet",
        ChainMetadata {
            chain_id: 10,
            name: "OP Mainnet",
            rpc_url: "https://mainnet.optimism.io",
            native_currency: ETHER,
        },
    ),
    (
        "optimism-sepolia",
        ChainMetadata {
            chain_id: 11155420,
            name: "OP Sepolia",
            rpc_url: "https://sepolia.optimism.io",
            native_currency: ETHER,
        },
    ),
];

/// Chain ID for a network ID, from the fixed lookup table
pub fn chain_id_for(network_id: &str) -> Option<u64> {
    KNOWN_NETWORKS
        .iter()
        .find(|(id, _)| *id == network_id)
        .map(|(_, chain)| chain.chain_id)
}

/// Built-in network table
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticNetworks;

impl NetworkResolver for StaticNetworks {
    fn network(&self, network_id: &str) -> Option<NetworkDescriptor> {
        chain_id_for(network_id).map(|chain_id| NetworkDescriptor {
            protocol_family: ProtocolFamily::Evm,
            chain_id,
            network_id: network_id.to_string(),
        })
    }

    fn chain(&self, network_id: &str) -> Option<ChainMetadata> {
        KNOWN_NETWORKS
            .iter()
            .find(|(id, _)| *id == network_id)
            .map(|(_, chain)| chain.clone())
    }
}

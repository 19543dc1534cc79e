//! Network parameters. Address version bytes are the only thing in this crate that differs
//! between Bitcoin networks, so they travel as an explicit `NetworkParams` value rather than
//! being compiled in.
//!
//! The default network is selected by cargo feature. `mainnet` is enabled by default; enabling
//! `testnet` or `signet` overrides it.

/// The mainnet Legacy PKH base58check version byte.
pub const MAINNET_PKH_VERSION: u8 = 0x00;
/// The mainnet Legacy SH base58check version byte.
pub const MAINNET_SH_VERSION: u8 = 0x05;

/// NetworkParams holds the address encoding parameters for a bitcoin-like network.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct NetworkParams {
    /// Version byte for pay-to-key-hash addresses (0x00 on mainnet)
    pub pkh_version: u8,
    /// Version byte for pay-to-script-hash addresses (0x05 on mainnet)
    pub sh_version: u8,
}

impl NetworkParams {
    /// Parameters for Bitcoin Mainnet
    pub const fn mainnet() -> Self {
        Self {
            pkh_version: MAINNET_PKH_VERSION,
            sh_version: MAINNET_SH_VERSION,
        }
    }

    /// Parameters for Bitcoin Testnet
    pub const fn testnet() -> Self {
        Self {
            pkh_version: 0x6f,
            sh_version: 0xc4,
        }
    }

    /// Parameters for Bitcoin Signet. Signet shares testnet's version bytes.
    pub const fn signet() -> Self {
        Self::testnet()
    }
}

/// The network selected by feature flag
#[cfg(feature = "testnet")]
pub const DEFAULT_NETWORK: NetworkParams = NetworkParams::testnet();

/// The network selected by feature flag
#[cfg(all(feature = "signet", not(feature = "testnet")))]
pub const DEFAULT_NETWORK: NetworkParams = NetworkParams::signet();

/// The network selected by feature flag
#[cfg(not(any(feature = "testnet", feature = "signet")))]
pub const DEFAULT_NETWORK: NetworkParams = NetworkParams::mainnet();

impl Default for NetworkParams {
    fn default() -> Self {
        DEFAULT_NETWORK
    }
}

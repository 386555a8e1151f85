//! Account-id conversions between the EVM and the host chain.
//!
//! The host chain addresses EVM contracts through 32-byte account ids:
//! an `ETH\0` tag followed by the 20 address bytes and zero padding. The
//! reverse direction truncates an account id to its first 20 bytes.

use alloy_primitives::{Address, B256};

const EVM_TAG: &[u8; 4] = b"ETH\0";

/// 32-byte account id of an EVM address: `ETH\0` tag, address bytes,
/// zero padding.
pub fn evm_account_id(address: Address) -> B256 {
    let mut out = [0u8; 32];
    out[..EVM_TAG.len()].copy_from_slice(EVM_TAG);
    out[EVM_TAG.len()..EVM_TAG.len() + Address::len_bytes()].copy_from_slice(address.as_slice());
    B256::from(out)
}

/// Dispatch origin form of an EVM address: address bytes right-padded with
/// zeros to 32 bytes.
pub fn dispatch_origin(address: Address) -> B256 {
    let mut out = [0u8; 32];
    out[..Address::len_bytes()].copy_from_slice(address.as_slice());
    B256::from(out)
}

/// EVM address of an account id: the first 20 bytes.
pub fn truncate_account_id(account: B256) -> Address {
    Address::from_slice(&account.as_slice()[..Address::len_bytes()])
}

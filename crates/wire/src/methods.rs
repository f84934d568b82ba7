// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Method name constants for every JSON-RPC call named in the jobs and
//! the Local RPC Facade. Both the live websocket client and the facade
//! dispatch on these exact strings.

pub const CHAIN_GET_BLOCK_HASH: &str = "chain_getBlockHash";
pub const CHAIN_GET_BLOCK: &str = "chain_getBlock";
pub const CHAIN_GET_FINALISED_HEAD: &str = "chain_getFinalisedHead";
pub const CHAIN_GET_FINALIZED_HEAD: &str = "chain_getFinalizedHead";
pub const CHAIN_GET_HEADER: &str = "chain_getHeader";
pub const CHAIN_GET_RUNTIME_VERSION: &str = "chain_getRuntimeVersion";
pub const STATE_GET_RUNTIME_VERSION: &str = "state_getRuntimeVersion";
pub const STATE_GET_METADATA: &str = "state_getMetadata";
pub const STATE_GET_STORAGE_AT: &str = "state_getStorageAt";
pub const STATE_GET_KEYS_PAGED: &str = "state_getKeysPaged";
pub const SYSTEM_NAME: &str = "system_name";
pub const SYSTEM_CHAIN: &str = "system_chain";
pub const SYSTEM_PROPERTIES: &str = "system_properties";
pub const RPC_METHODS: &str = "rpc_methods";

/// The fixed method subset the Local RPC Facade knows how to serve from
/// the persistent store, per §4.9. Anything not in this list fails with
/// [`crate::envelope::JsonRpcError::method_not_found`].
pub const FACADE_METHODS: &[&str] = &[
    SYSTEM_NAME,
    SYSTEM_CHAIN,
    SYSTEM_PROPERTIES,
    CHAIN_GET_HEADER,
    CHAIN_GET_BLOCK,
    CHAIN_GET_RUNTIME_VERSION,
    STATE_GET_RUNTIME_VERSION,
    STATE_GET_METADATA,
    STATE_GET_STORAGE_AT,
    RPC_METHODS,
];

pub fn is_facade_method(method: &str) -> bool {
    FACADE_METHODS.contains(&method)
}

#[cfg(test)]
#[path = "methods_tests.rs"]
mod tests;

//! LRU-cached ERC-20 `(symbol, decimals)` resolution with RPC fallback
//! (spec §4.4).

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use rosetta_primitives::Address;
use rosetta_types::{Currency, UNKNOWN_ERC20_SYMBOL};

use crate::abi::{decode_decimals, decode_symbol, DECIMALS_SELECTOR, SYMBOL_SELECTOR};

/// The LRU cache's fixed capacity (spec §4.4: "capacity 100, eviction:
/// least-recently-used").
pub const CACHE_CAPACITY: usize = 100;

/// A capability for issuing the two read-only calls the resolver needs:
/// `symbol()` and `decimals()` against a token contract. Implemented by
/// `rosetta_node_adapter::NodeAdapter` at the composition root; kept as a
/// narrow trait here so this crate doesn't need to depend on the RPC
/// transport (spec §9 "narrow capability" pattern, mirrored from the
/// tracer capability).
#[async_trait::async_trait]
pub trait TokenContractRpc: Send + Sync {
    /// The error type a failed call reports.
    type Error: std::fmt::Debug + Send + Sync + 'static;

    /// Issues an `eth_call` against `address` with `calldata`, at the
    /// chain's current head.
    async fn call(&self, address: Address, calldata: [u8; 4]) -> Result<Vec<u8>, Self::Error>;
}

/// An LRU-cached, RPC-backed `(symbol, decimals)` resolver.
///
/// The cache is safe for concurrent readers and writers (spec §4.4): it's
/// a single [`parking_lot::Mutex`]-guarded [`LruCache`], matching the
/// teacher's general preference for `parking_lot` over `std::sync` for
/// short, non-blocking critical sections. Concurrent misses for the same
/// key may duplicate RPC work (spec §4.4: "acceptable to duplicate" — no
/// single-flight deduplication).
pub struct CurrencyResolver {
    cache: Mutex<LruCache<Address, Currency>>,
}

impl Default for CurrencyResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrencyResolver {
    /// Constructs a resolver with the spec-mandated capacity of 100
    /// entries.
    pub fn new() -> Self {
        CurrencyResolver {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(CACHE_CAPACITY).expect("capacity is nonzero"),
            )),
        }
    }

    /// Resolves `address`'s `(symbol, decimals)`, consulting the cache
    /// first and falling back to two RPC calls on a miss. The sentinel
    /// [`UNKNOWN_ERC20_SYMBOL`] with `decimals = 0` is cached and returned
    /// on a decode failure or contract revert (spec §4.4 step 2), so a
    /// known-bad address doesn't get re-probed on every log.
    pub async fn resolve<R: TokenContractRpc>(
        &self,
        address: Address,
        rpc: &R,
    ) -> Currency {
        if let Some(hit) = self.cache.lock().get(&address).cloned() {
            return hit;
        }

        let resolved = Self::probe(address, rpc).await;
        self.cache.lock().put(address, resolved.clone());
        resolved
    }

    async fn probe<R: TokenContractRpc>(address: Address, rpc: &R) -> Currency {
        let symbol = match rpc.call(address, SYMBOL_SELECTOR).await {
            Ok(data) => decode_symbol(&data),
            Err(error) => {
                tracing::debug!(%address, ?error, "symbol() call failed");
                None
            }
        };

        let decimals = match rpc.call(address, DECIMALS_SELECTOR).await {
            Ok(data) => decode_decimals(&data),
            Err(error) => {
                tracing::debug!(%address, ?error, "decimals() call failed");
                None
            }
        };

        match symbol {
            Some(symbol) => Currency {
                symbol,
                decimals: decimals.unwrap_or(0),
                metadata: Some(serde_json::json!({ "contract_address": address })),
            },
            None => unknown(),
        }
    }
}

/// The sentinel currency for a token whose metadata could not be
/// determined (spec §4.4 step 2).
pub fn unknown() -> Currency {
    Currency {
        symbol: UNKNOWN_ERC20_SYMBOL.to_string(),
        decimals: 0,
        metadata: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeRpc {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TokenContractRpc for FakeRpc {
        type Error = std::convert::Infallible;

        async fn call(&self, _address: Address, calldata: [u8; 4]) -> Result<Vec<u8>, Self::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if calldata == SYMBOL_SELECTOR {
                let mut data = vec![0u8; 32];
                data[31] = 0x20;
                let mut length = vec![0u8; 32];
                length[31] = 4;
                data.extend(length);
                let mut payload = b"USDC".to_vec();
                payload.resize(32, 0);
                data.extend(payload);
                Ok(data)
            } else {
                let mut data = vec![0u8; 32];
                data[31] = 6;
                Ok(data)
            }
        }
    }

    #[tokio::test]
    async fn resolves_and_caches_a_known_token() {
        let resolver = CurrencyResolver::new();
        let rpc = FakeRpc { calls: AtomicUsize::new(0) };
        let address = Address::repeat_byte(7);

        let first = resolver.resolve(address, &rpc).await;
        assert_eq!(first.symbol, "USDC");
        assert_eq!(first.decimals, 6);
        assert_eq!(rpc.calls.load(Ordering::SeqCst), 2);

        let second = resolver.resolve(address, &rpc).await;
        assert_eq!(second, first);
        // Cached: no additional RPC calls.
        assert_eq!(rpc.calls.load(Ordering::SeqCst), 2);
    }

    struct FailingRpc;

    #[async_trait::async_trait]
    impl TokenContractRpc for FailingRpc {
        type Error = &'static str;

        async fn call(&self, _address: Address, _calldata: [u8; 4]) -> Result<Vec<u8>, Self::Error> {
            Err("execution reverted")
        }
    }

    #[tokio::test]
    async fn unresolvable_token_caches_the_unknown_sentinel() {
        let resolver = CurrencyResolver::new();
        let resolved = resolver.resolve(Address::repeat_byte(9), &FailingRpc).await;
        assert_eq!(resolved.symbol, UNKNOWN_ERC20_SYMBOL);
        assert_eq!(resolved.decimals, 0);
    }
}

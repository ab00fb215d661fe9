//! Keeper service: runs engine operations against the book.
//!
//! Every command computes all of its transitions from the current
//! snapshots first and writes them back only if each step succeeded, so a
//! failed mint never leaves a reserved id behind.

use std::path::PathBuf;

use launchpad_core::bridge::*;
use launchpad_core::curve::*;
use launchpad_core::sequencer::*;
use launchpad_core::{Quote, SnapshotStore};
use serde::Serialize;

use crate::book::{position_key, Book, CollectionRecord};
use crate::config::LaunchpadConfig;
use crate::error::{KeeperError, KeeperResult};

/// Result of a mint: the reserved token and the committed quote
#[derive(Debug, Clone, Serialize)]
pub struct MintReceipt {
    pub token: LockedTokenMetadata,
    pub quote: Quote,
    pub revealed: bool,
}

/// Audit of one collection plus every pool
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub collection: String,
    pub sequence: ConsistencyReport,
    pub pools: Vec<(String, ShareAudit)>,
}

pub struct Keeper {
    config: LaunchpadConfig,
    book: Book,
    book_path: PathBuf,
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

impl Keeper {
    /// Open the configured book and provision anything the config names
    pub fn open(config: LaunchpadConfig) -> KeeperResult<Self> {
        let book_path = PathBuf::from(&config.book_path);
        let book = Book::open(&book_path)?;
        let mut keeper = Self {
            config,
            book,
            book_path,
        };
        keeper.provision()?;
        Ok(keeper)
    }

    pub fn config(&self) -> &LaunchpadConfig {
        &self.config
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Write the book back to disk
    pub fn persist(&self) -> KeeperResult<()> {
        self.book.persist(&self.book_path)
    }

    fn provision(&mut self) -> KeeperResult<()> {
        for collection in &self.config.collections {
            let key = collection_slug(&collection.name);
            if self.book.collections.contains_key(&key) {
                continue;
            }
            let curve = self.config.curve_for(&collection.name);
            self.book.collections.insert(
                key.clone(),
                CollectionRecord {
                    name: collection.name.clone(),
                    curve,
                },
            );
            self.book.curves.insert(key.clone(), CurveState::new(&curve))?;
            self.book
                .sequences
                .insert(key, TokenSequence::new(collection.name.clone(), collection.total_supply))?;
            log::info!("Provisioned collection {}", collection.name);
        }

        for token in &self.config.tokens {
            if self.book.registry.get(&token.mint).is_some() {
                continue;
            }
            self.book.registry.register(SupportedToken::new(
                token.mint.clone(),
                token.symbol.clone(),
                token.name.clone(),
                token.decimals,
            ))?;
            let pool =
                LiquidityPool::new(token.mint.clone()).with_fee_bps(self.config.bridge.fee_bps)?;
            self.book.pools.insert(token.mint.clone(), pool)?;
            log::info!("Provisioned bridge pool for {}", token.symbol);
        }
        Ok(())
    }

    fn collection(&self, name: &str) -> KeeperResult<(String, CurveConfig)> {
        let key = collection_slug(name);
        let record = self
            .book
            .collections
            .get(&key)
            .ok_or_else(|| KeeperError::UnknownCollection(name.to_string()))?;
        Ok((key, record.curve))
    }

    fn supported_pool(&self, token: &str) -> KeeperResult<String> {
        if !self.book.registry.is_supported(token) || !self.book.pools.contains(token) {
            return Err(KeeperError::UnsupportedToken(token.to_string()));
        }
        Ok(token.to_string())
    }

    fn check_limits(&self, quote: &Quote, curve: &CurveConfig) -> KeeperResult<()> {
        if let Some(limits) = self.config.limits.active() {
            limits.check(quote, curve)?;
        }
        Ok(())
    }

    // ========================================================================
    // Curve
    // ========================================================================

    pub fn quote_buy(&self, collection: &str, base_in: u128) -> KeeperResult<Quote> {
        let (key, curve) = self.collection(collection)?;
        let state = self.book.curves.load(&key)?;
        let quote = quote_buy(&curve, &state, base_in)?;
        self.check_limits(&quote, &curve)?;
        Ok(quote)
    }

    /// Reserve the next token id, price the mint and commit both
    pub fn buy(
        &mut self,
        collection: &str,
        base_in: u128,
        wallet: &str,
        mint_address: &str,
    ) -> KeeperResult<MintReceipt> {
        let (key, curve) = self.collection(collection)?;

        let sequence = self.book.sequences.load(&key)?;
        let (next_sequence, token) = reserve(
            &sequence,
            mint_address,
            wallet,
            now(),
            &self.config.metadata_base_uri,
        )?;

        let state = self.book.curves.load(&key)?;
        let quote = quote_buy(&curve, &state, base_in)?;
        self.check_limits(&quote, &curve)?;
        let next_state = commit_buy(&curve, &state, &quote)?;

        self.book.sequences.save(key.clone(), next_sequence, sequence.version)?;
        let revealed = next_state.revealed;
        self.book.curves.save(key, next_state, state.version)?;

        log::info!(
            "Minted token {} of {} for {}: {} in, {} out",
            token.token_id,
            collection,
            wallet,
            quote.input_amount,
            quote.output_amount
        );
        Ok(MintReceipt {
            token,
            quote,
            revealed,
        })
    }

    pub fn quote_sell(&self, collection: &str, nft_in: u128) -> KeeperResult<Quote> {
        let (key, curve) = self.collection(collection)?;
        let state = self.book.curves.load(&key)?;
        let quote = quote_sell(&curve, &state, nft_in)?;
        self.check_limits(&quote, &curve)?;
        Ok(quote)
    }

    pub fn sell(&mut self, collection: &str, nft_in: u128) -> KeeperResult<Quote> {
        let (key, curve) = self.collection(collection)?;
        let state = self.book.curves.load(&key)?;
        let quote = quote_sell(&curve, &state, nft_in)?;
        self.check_limits(&quote, &curve)?;
        let next = commit_sell(&curve, &state, &quote)?;
        self.book.curves.save(key, next, state.version)?;
        Ok(quote)
    }

    /// Chart samples, over the whole supply or up to `max_supply`
    pub fn price_curve(
        &self,
        collection: &str,
        samples: usize,
        max_supply: Option<u128>,
    ) -> KeeperResult<Vec<PricePoint>> {
        let (_, curve) = self.collection(collection)?;
        let points = match max_supply {
            Some(max) => PriceCurve::over(&curve, max, samples),
            None => preview_price_curve(&curve, samples),
        };
        Ok(points.iter().collect::<Result<Vec<_>, _>>()?)
    }

    pub fn metrics(&self, collection: &str) -> KeeperResult<CurveMetrics> {
        let (key, curve) = self.collection(collection)?;
        let state = self.book.curves.load(&key)?;
        Ok(metrics(&curve, &state)?)
    }

    // ========================================================================
    // Bridge
    // ========================================================================

    pub fn quote_swap(&self, token: &str, nft_amount: u128) -> KeeperResult<BridgeQuote> {
        let key = self.supported_pool(token)?;
        let pool = self.book.pools.load(&key)?;
        Ok(quote_swap(&pool, nft_amount)?)
    }

    /// Redeem NFTs of a revealed collection for `token`
    pub fn swap(
        &mut self,
        collection: &str,
        token: &str,
        nft_amount: u128,
    ) -> KeeperResult<BridgeQuote> {
        let (collection_key, _) = self.collection(collection)?;
        let revealed = self.book.curves.load(&collection_key)?.revealed;
        if !revealed {
            return Err(KeeperError::NotRevealed(collection.to_string()));
        }

        let key = self.supported_pool(token)?;
        let pool = self.book.pools.load(&key)?;
        let quote = quote_swap(&pool, nft_amount)?;
        let next = commit_swap(&pool, &quote)?;
        self.book.pools.save(key, next, pool.version)?;
        Ok(quote)
    }

    pub fn add_liquidity(
        &mut self,
        token: &str,
        provider: &str,
        token_amount: u128,
        nft_amount: u128,
        slippage_bps: Option<u16>,
    ) -> KeeperResult<LiquidityReceipt> {
        let key = self.supported_pool(token)?;
        let pool = self.book.pools.load(&key)?;
        let position_key = position_key(token, provider);
        let position = self
            .book
            .positions
            .get(&position_key)
            .cloned()
            .unwrap_or_else(|| LiquidityPosition::new(token, provider));

        let slippage = slippage_bps.unwrap_or(self.config.bridge.max_slippage_bps);
        let (next, position, receipt) =
            add_liquidity(&pool, &position, token_amount, nft_amount, slippage)?;

        self.book.pools.save(key, next, pool.version)?;
        self.book.positions.insert(position_key, position);
        Ok(receipt)
    }

    pub fn remove_liquidity(
        &mut self,
        token: &str,
        provider: &str,
        shares: u128,
    ) -> KeeperResult<Withdrawal> {
        // Withdrawals stay open for deactivated tokens
        if !self.book.pools.contains(token) {
            return Err(KeeperError::UnsupportedToken(token.to_string()));
        }
        let key = token.to_string();
        let pool = self.book.pools.load(&key)?;
        let position_key = position_key(token, provider);
        let position = self
            .book
            .positions
            .get(&position_key)
            .cloned()
            .unwrap_or_else(|| LiquidityPosition::new(token, provider));

        let (next, position, withdrawal) = remove_liquidity(&pool, &position, shares)?;

        self.book.pools.save(key, next, pool.version)?;
        if position.shares == 0 {
            self.book.positions.remove(&position_key);
        } else {
            self.book.positions.insert(position_key, position);
        }
        Ok(withdrawal)
    }

    pub fn bridge_statistics(&self) -> KeeperResult<BridgeStatistics> {
        Ok(bridge_statistics(self.book.pools.values(), &self.book.registry)?)
    }

    // ========================================================================
    // Sequencer
    // ========================================================================

    /// Reserve a token id without minting
    pub fn reserve(
        &mut self,
        collection: &str,
        mint_address: &str,
        wallet: &str,
    ) -> KeeperResult<LockedTokenMetadata> {
        let (key, _) = self.collection(collection)?;
        let base_uri = self.config.metadata_base_uri.clone();
        let metadata = self.book.sequences.update(key, |seq| {
            reserve(seq, mint_address, wallet, now(), &base_uri)
        })?;
        Ok(metadata)
    }

    pub fn lock(&mut self, collection: &str, actor: &str) -> KeeperResult<SequenceStatus> {
        let (key, _) = self.collection(collection)?;
        let authority = self.config.authority(actor);
        let sequence = self.book.sequences.load(&key)?;
        let next = lock(&sequence, &authority, now())?;
        if next.version != sequence.version {
            self.book.sequences.save(key, next.clone(), sequence.version)?;
        }
        Ok(next.status())
    }

    pub fn unlock(&mut self, collection: &str, actor: &str) -> KeeperResult<SequenceStatus> {
        let (key, _) = self.collection(collection)?;
        let authority = self.config.authority(actor);
        let sequence = self.book.sequences.load(&key)?;
        let next = force_unlock(&sequence, &authority)?;
        if next.version != sequence.version {
            self.book.sequences.save(key, next.clone(), sequence.version)?;
        }
        Ok(next.status())
    }

    pub fn set_supply(
        &mut self,
        collection: &str,
        actor: &str,
        total_supply: u64,
    ) -> KeeperResult<SequenceStatus> {
        let (key, _) = self.collection(collection)?;
        let authority = self.config.authority(actor);
        let status = self.book.sequences.update(key, |seq| {
            let next = update_total_supply(seq, &authority, total_supply)?;
            let status = next.status();
            Ok((next, status))
        })?;
        Ok(status)
    }

    pub fn sequence_status(&self, collection: &str) -> KeeperResult<SequenceStatus> {
        let (key, _) = self.collection(collection)?;
        Ok(self.book.sequences.load(&key)?.status())
    }

    /// Sequence consistency for one collection and share totals for every pool
    pub fn audit(&self, collection: &str) -> KeeperResult<AuditReport> {
        let (key, _) = self.collection(collection)?;
        let sequence = self.book.sequences.load(&key)?;

        let mut pools = Vec::new();
        for (token, pool) in self.book.pools.iter() {
            let audit = audit_positions(pool, self.book.positions_for(token))?;
            if !audit.is_balanced() {
                log::warn!(
                    "Pool {} holds {} shares but positions sum to {}",
                    token,
                    audit.pool_shares,
                    audit.position_shares
                );
            }
            pools.push((token.clone(), audit));
        }

        Ok(AuditReport {
            collection: collection.to_string(),
            sequence: validate_consistency(&sequence),
            pools,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CollectionSettings, TokenSettings};
    use launchpad_core::LaunchpadError;

    fn keeper_in(dir: &tempfile::TempDir) -> Keeper {
        let config = LaunchpadConfig {
            book_path: dir.path().join("book.json").to_string_lossy().into_owned(),
            admins: vec!["admin".to_string()],
            tokens: vec![TokenSettings {
                mint: "usdc-mint".to_string(),
                symbol: "USDC".to_string(),
                name: "USD Coin".to_string(),
                decimals: 6,
            }],
            collections: vec![CollectionSettings {
                name: "Los Bros".to_string(),
                total_supply: 3,
                curve: None,
            }],
            ..LaunchpadConfig::default()
        };
        Keeper::open(config).unwrap()
    }

    #[test]
    fn test_buy_reserves_and_commits() {
        let dir = tempfile::tempdir().unwrap();
        let mut keeper = keeper_in(&dir);

        let receipt = keeper.buy("Los Bros", 1_000_000, "alice", "mint-1").unwrap();
        assert_eq!(receipt.token.token_id, 1);
        assert_eq!(receipt.quote.output_amount, 32_258_064);
        assert_eq!(
            receipt.token.metadata_uri,
            "https://metadata.launchonlos.fun/los_bros/1.json"
        );

        let metrics = keeper.metrics("Los Bros").unwrap();
        assert_eq!(metrics.market_cap, 1_000_000);
        assert_eq!(keeper.sequence_status("Los Bros").unwrap().reserved, 1);
    }

    #[test]
    fn test_failed_mint_leaves_no_reservation() {
        let dir = tempfile::tempdir().unwrap();
        let mut keeper = keeper_in(&dir);

        assert!(keeper.buy("Los Bros", 0, "alice", "mint-1").is_err());
        assert_eq!(keeper.sequence_status("Los Bros").unwrap().reserved, 0);
    }

    #[test]
    fn test_book_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut keeper = keeper_in(&dir);
        keeper.buy("Los Bros", 1_000_000, "alice", "mint-1").unwrap();
        keeper.persist().unwrap();

        let reopened = keeper_in(&dir);
        assert_eq!(reopened.sequence_status("Los Bros").unwrap().next_token_id, 2);
        assert_eq!(reopened.metrics("Los Bros").unwrap().market_cap, 1_000_000);
    }

    #[test]
    fn test_swap_requires_reveal() {
        let dir = tempfile::tempdir().unwrap();
        let mut keeper = keeper_in(&dir);
        keeper.add_liquidity("usdc-mint", "lp", 1_000_000, 1_000, None).unwrap();

        assert!(matches!(
            keeper.swap("Los Bros", "usdc-mint", 10),
            Err(KeeperError::NotRevealed(_))
        ));

        keeper.buy("Los Bros", 10_000_000, "whale", "mint-1").unwrap();
        let quote = keeper.swap("Los Bros", "usdc-mint", 10).unwrap();
        assert_eq!(quote.token_amount, 9_850);
        assert_eq!(keeper.bridge_statistics().unwrap().total_trades, 1);

        assert!(matches!(
            keeper.quote_swap("doge-mint", 10),
            Err(KeeperError::UnsupportedToken(_))
        ));
    }

    #[test]
    fn test_admin_operations() {
        let dir = tempfile::tempdir().unwrap();
        let mut keeper = keeper_in(&dir);
        keeper.reserve("Los Bros", "mint-1", "alice").unwrap();

        assert!(matches!(
            keeper.lock("Los Bros", "mallory"),
            Err(KeeperError::Engine(LaunchpadError::Unauthorized { .. }))
        ));

        assert!(keeper.lock("Los Bros", "admin").unwrap().locked);
        assert!(matches!(
            keeper.reserve("Los Bros", "mint-2", "bob"),
            Err(KeeperError::Engine(LaunchpadError::SequenceLocked))
        ));

        keeper.unlock("Los Bros", "admin").unwrap();
        assert_eq!(keeper.set_supply("Los Bros", "admin", 10).unwrap().total_supply, 10);
        assert_eq!(keeper.reserve("Los Bros", "mint-2", "bob").unwrap().token_id, 2);

        let audit = keeper.audit("Los Bros").unwrap();
        assert!(audit.sequence.valid);
        assert!(audit.pools.iter().all(|(_, a)| a.is_balanced()));
    }

    #[test]
    fn test_liquidity_positions_tracked() {
        let dir = tempfile::tempdir().unwrap();
        let mut keeper = keeper_in(&dir);

        let receipt = keeper.add_liquidity("usdc-mint", "lp", 1_000, 10, None).unwrap();
        assert_eq!(receipt.shares_issued, 100);

        let withdrawal = keeper.remove_liquidity("usdc-mint", "lp", 50).unwrap();
        assert_eq!(withdrawal.token_amount, 500);

        assert!(keeper.remove_liquidity("usdc-mint", "other", 1).is_err());
        keeper.remove_liquidity("usdc-mint", "lp", 50).unwrap();
        assert!(keeper.book().positions.is_empty());
    }
}

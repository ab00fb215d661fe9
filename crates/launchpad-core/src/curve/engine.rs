//! # Bonding Curve Engine
//!
//! Constant-product pricing of mints against a collection's virtual reserve:
//!
//! ```text
//! virtual_reserve * virtual_supply = k
//! ```
//!
//! Buys add base currency to the reserve and take NFTs out of the virtual
//! supply; sells do the reverse. Post-trade reserves are rounded up, so the
//! product never shrinks and the trader never receives more than the curve
//! owes.

use crate::curve::config::CurveConfig;
use crate::curve::state::CurveState;
use crate::errors::{CoreResult, LaunchpadError};
use crate::math::*;
use crate::types::{FeeBreakdown, Quote, TradeSide};

/// Marginal price once `real_supply` NFTs have been minted from a fresh curve
pub fn current_price(config: &CurveConfig, real_supply: u128) -> CoreResult<u128> {
    if real_supply >= config.virtual_supply {
        return Err(LaunchpadError::InsufficientLiquidity {
            required: real_supply,
            available: config.virtual_supply,
        });
    }
    let outstanding = config.virtual_supply - real_supply;
    let reserve = div_product(config.k(), outstanding, Rounding::COLLECT)?;
    marginal_price(reserve, outstanding)
}

/// Split the curve fee on `amount`
pub fn fee_breakdown(config: &CurveConfig, amount: u128) -> CoreResult<FeeBreakdown> {
    let total = apply_bps(amount, config.fee_bps, Rounding::COLLECT)?;
    let creator = apply_bps(amount, config.creator_fee_bps, Rounding::PAYOUT)?;
    let platform = apply_bps(amount, config.platform_fee_bps, Rounding::PAYOUT)?;
    let retained = safe_sub_u128(total, safe_add_u128(creator, platform)?)?;
    Ok(FeeBreakdown {
        total,
        creator,
        platform,
        retained,
    })
}

/// Price a buy of NFTs for `base_in` base currency
pub fn quote_buy(config: &CurveConfig, state: &CurveState, base_in: u128) -> CoreResult<Quote> {
    if base_in == 0 {
        return Err(LaunchpadError::InvalidInput("base currency amount must be positive"));
    }

    let k = widening_mul(state.virtual_reserve, state.virtual_supply);
    let reserve_after = safe_add_u128(state.virtual_reserve, base_in)?;
    let supply_after = div_product(k, reserve_after, Rounding::COLLECT)?;
    let nft_out = safe_sub_u128(state.virtual_supply, supply_after)?;

    if nft_out == 0 {
        return Err(LaunchpadError::InvalidInput("amount too small to buy a unit"));
    }
    let remaining = safe_sub_u128(config.virtual_supply, state.minted)?;
    if nft_out > remaining {
        return Err(LaunchpadError::InsufficientLiquidity {
            required: nft_out,
            available: remaining,
        });
    }

    let fee = fee_breakdown(config, base_in)?;
    Ok(Quote {
        side: TradeSide::Buy,
        input_amount: base_in,
        output_amount: nft_out,
        price_impact_bps: price_change_bps(
            state.virtual_reserve,
            state.virtual_supply,
            reserve_after,
            supply_after,
        )?,
        fee,
        net_amount: safe_sub_u128(base_in, fee.total)?,
        price_before: state.spot_price()?,
        price_after: marginal_price(reserve_after, supply_after)?,
        reserve_after,
        supply_after,
        state_version: state.version,
    })
}

/// Price a sale of `nft_in` NFTs back into the curve.
///
/// The fee comes out of the base currency paid out, not the NFTs.
pub fn quote_sell(config: &CurveConfig, state: &CurveState, nft_in: u128) -> CoreResult<Quote> {
    if nft_in == 0 {
        return Err(LaunchpadError::InvalidInput("nft amount must be positive"));
    }
    if nft_in > state.minted {
        return Err(LaunchpadError::InsufficientLiquidity {
            required: nft_in,
            available: state.minted,
        });
    }

    let k = widening_mul(state.virtual_reserve, state.virtual_supply);
    let supply_after = safe_add_u128(state.virtual_supply, nft_in)?;
    let reserve_after = div_product(k, supply_after, Rounding::COLLECT)?;
    let base_out = safe_sub_u128(state.virtual_reserve, reserve_after)?;

    if base_out == 0 {
        return Err(LaunchpadError::InvalidInput("amount too small to sell"));
    }

    let fee = fee_breakdown(config, base_out)?;
    Ok(Quote {
        side: TradeSide::Sell,
        input_amount: nft_in,
        output_amount: base_out,
        price_impact_bps: price_change_bps(
            state.virtual_reserve,
            state.virtual_supply,
            reserve_after,
            supply_after,
        )?,
        fee,
        net_amount: safe_sub_u128(base_out, fee.total)?,
        price_before: state.spot_price()?,
        price_after: marginal_price(reserve_after, supply_after)?,
        reserve_after,
        supply_after,
        state_version: state.version,
    })
}

fn check_quote(state: &CurveState, quote: &Quote, side: TradeSide) -> CoreResult<()> {
    if quote.side != side {
        return Err(LaunchpadError::QuoteMismatch("quote is for the other trade side"));
    }
    if quote.state_version != state.version {
        log::warn!(
            "Rejected stale curve commit: quote at version {}, state at {}",
            quote.state_version,
            state.version
        );
        return Err(LaunchpadError::stale(quote.state_version, state.version));
    }
    Ok(())
}

/// Apply a buy once the trader's base currency has been received.
///
/// Raised progress counts the gross input. The engine does not deduplicate:
/// each quote must be committed at most once, which the version check
/// enforces as long as the caller stores the returned state.
pub fn commit_buy(
    config: &CurveConfig,
    state: &CurveState,
    quote: &Quote,
) -> CoreResult<CurveState> {
    check_quote(state, quote, TradeSide::Buy)?;

    let minted = safe_add_u128(state.minted, quote.output_amount)?;
    if minted > config.virtual_supply {
        return Err(LaunchpadError::InsufficientLiquidity {
            required: quote.output_amount,
            available: config.virtual_supply.saturating_sub(state.minted),
        });
    }
    if Some(quote.supply_after) != config.virtual_supply.checked_sub(minted) {
        return Err(LaunchpadError::InconsistentState("quote supply does not match minted count"));
    }

    let raised = safe_add_u128(state.raised, quote.input_amount)?;
    let revealed = state.revealed || raised >= config.reveal_cap;
    if revealed && !state.revealed {
        log::info!("Reveal threshold reached: raised {} of cap {}", raised, config.reveal_cap);
    }

    let next = CurveState {
        minted,
        raised,
        virtual_reserve: quote.reserve_after,
        virtual_supply: quote.supply_after,
        revealed,
        total_volume: safe_add_u128(state.total_volume, quote.input_amount)?,
        trade_count: safe_add_u64(state.trade_count, 1)?,
        version: safe_add_u64(state.version, 1)?,
    };
    log::debug!(
        "Committed buy: {} in, {} out, minted {} -> {}",
        quote.input_amount,
        quote.output_amount,
        state.minted,
        next.minted
    );
    Ok(next)
}

/// Apply a sell once the NFTs have been returned.
///
/// `raised` is cumulative inflow and stays put; `revealed` never clears.
pub fn commit_sell(
    config: &CurveConfig,
    state: &CurveState,
    quote: &Quote,
) -> CoreResult<CurveState> {
    check_quote(state, quote, TradeSide::Sell)?;

    let minted = state.minted.checked_sub(quote.input_amount).ok_or(
        LaunchpadError::InsufficientLiquidity {
            required: quote.input_amount,
            available: state.minted,
        },
    )?;
    if Some(quote.supply_after) != config.virtual_supply.checked_sub(minted) {
        return Err(LaunchpadError::InconsistentState("quote supply does not match minted count"));
    }

    let next = CurveState {
        minted,
        raised: state.raised,
        virtual_reserve: quote.reserve_after,
        virtual_supply: quote.supply_after,
        revealed: state.revealed,
        total_volume: safe_add_u128(state.total_volume, quote.output_amount)?,
        trade_count: safe_add_u64(state.trade_count, 1)?,
        version: safe_add_u64(state.version, 1)?,
    };
    log::debug!(
        "Committed sell: {} in, {} out, minted {} -> {}",
        quote.input_amount,
        quote.output_amount,
        state.minted,
        next.minted
    );
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_config() -> CurveConfig {
        CurveConfig {
            virtual_reserve: 30_000_000,
            virtual_supply: 1_000_000_000,
            reveal_cap: 10_000_000,
            fee_bps: 100,
            creator_fee_bps: 50,
            platform_fee_bps: 50,
        }
    }

    #[test]
    fn test_current_price() {
        let config = scenario_config();
        assert_eq!(current_price(&config, 0).unwrap(), 30_000_000);
        // Half the virtual supply out: reserve doubles and supply halves
        assert_eq!(current_price(&config, 500_000_000).unwrap(), 120_000_000);
        assert!(matches!(
            current_price(&config, 1_000_000_000),
            Err(LaunchpadError::InsufficientLiquidity { .. })
        ));
    }

    #[test]
    fn test_quote_buy_scenario() {
        let config = scenario_config();
        let state = CurveState::new(&config);
        let quote = quote_buy(&config, &state, 1_000_000).unwrap();

        // k = 30M * 1B; supply after = ceil(k / 31M)
        assert_eq!(quote.supply_after, 967_741_936);
        assert_eq!(quote.output_amount, 32_258_064);
        assert_eq!(quote.fee.total, 10_000);
        assert_eq!(quote.fee.creator, 5_000);
        assert_eq!(quote.fee.platform, 5_000);
        assert_eq!(quote.fee.retained, 0);
        assert_eq!(quote.net_amount, 990_000);
        assert_eq!(quote.price_before, 30_000_000);
        assert_eq!(quote.price_after, 32_033_333);
        assert_eq!(quote.price_impact_bps, 677);
        assert_eq!(quote.price_impact_percent(), "6.77%");
    }

    #[test]
    fn test_quotes_round_in_favor_of_the_curve() {
        let config = scenario_config();
        let state = CurveState::new(&config);

        // k / 31M is not whole; the trader loses the fraction
        let buy = quote_buy(&config, &state, 1_000_000).unwrap();
        assert!(widening_mul(buy.reserve_after, buy.supply_after) >= config.k());
        assert!(buy.fee.total >= buy.fee.creator + buy.fee.platform);

        let bought = commit_buy(&config, &state, &buy).unwrap();
        let sell = quote_sell(&config, &bought, 1_000_003).unwrap();
        assert!(widening_mul(sell.reserve_after, sell.supply_after) >= config.k());
        assert!(sell.net_amount + sell.fee.total <= sell.output_amount);
    }

    #[test]
    fn test_quote_buy_rejects_bad_input() {
        let config = scenario_config();
        let state = CurveState::new(&config);
        assert!(matches!(quote_buy(&config, &state, 0), Err(LaunchpadError::InvalidInput(_))));

        // Not enough to move the supply by a single unit
        let tiny = CurveConfig {
            virtual_reserve: 1_000_000,
            virtual_supply: 10,
            ..scenario_config()
        };
        let state = CurveState::new(&tiny);
        assert!(matches!(quote_buy(&tiny, &state, 1), Err(LaunchpadError::InvalidInput(_))));
    }

    #[test]
    fn test_commit_buy_advances_state() {
        let config = scenario_config();
        let state = CurveState::new(&config);
        let quote = quote_buy(&config, &state, 1_000_000).unwrap();
        let next = commit_buy(&config, &state, &quote).unwrap();

        assert_eq!(next.minted, 32_258_064);
        assert_eq!(next.raised, 1_000_000);
        assert_eq!(next.virtual_reserve, 31_000_000);
        assert_eq!(next.virtual_supply, 967_741_936);
        assert_eq!(next.trade_count, 1);
        assert_eq!(next.version, 1);
        assert!(!next.revealed);
    }

    #[test]
    fn test_commit_rejects_stale_and_replayed_quotes() {
        let config = scenario_config();
        let state = CurveState::new(&config);
        let first = quote_buy(&config, &state, 1_000_000).unwrap();
        let second = quote_buy(&config, &state, 2_000_000).unwrap();

        let next = commit_buy(&config, &state, &first).unwrap();
        assert_eq!(commit_buy(&config, &next, &second), Err(LaunchpadError::stale(0, 1)));
        assert_eq!(commit_buy(&config, &next, &first), Err(LaunchpadError::stale(0, 1)));
    }

    #[test]
    fn test_commit_rejects_wrong_side() {
        let config = scenario_config();
        let state = CurveState::new(&config);
        let quote = quote_buy(&config, &state, 1_000_000).unwrap();
        assert!(matches!(
            commit_sell(&config, &state, &quote),
            Err(LaunchpadError::QuoteMismatch(_))
        ));
    }

    #[test]
    fn test_reveal_and_minting_after_reveal() {
        let config = scenario_config();
        let state = CurveState::new(&config);

        let quote = quote_buy(&config, &state, 10_000_000).unwrap();
        let revealed = commit_buy(&config, &state, &quote).unwrap();
        assert!(revealed.revealed);

        // Minting continues past the reveal milestone
        let quote = quote_buy(&config, &revealed, 1_000_000).unwrap();
        let after = commit_buy(&config, &revealed, &quote).unwrap();
        assert!(after.revealed);
        assert!(after.minted > revealed.minted);

        // Selling never un-reveals
        let quote = quote_sell(&config, &after, after.minted).unwrap();
        let sold_out = commit_sell(&config, &after, &quote).unwrap();
        assert_eq!(sold_out.minted, 0);
        assert_eq!(sold_out.raised, after.raised);
        assert!(sold_out.revealed);
    }

    #[test]
    fn test_sell_round_trip_loses_fees() {
        let config = scenario_config();
        let state = CurveState::new(&config);
        let buy = quote_buy(&config, &state, 1_000_000).unwrap();
        let state = commit_buy(&config, &state, &buy).unwrap();

        let sell = quote_sell(&config, &state, buy.output_amount).unwrap();
        assert_eq!(sell.output_amount, 999_999);
        assert_eq!(sell.fee.total, 10_000);
        assert_eq!(sell.net_amount, 989_999);
        assert_eq!(sell.reserve_after, 30_000_001);
        assert_eq!(sell.supply_after, 1_000_000_000);
    }

    #[test]
    fn test_sell_more_than_minted() {
        let config = scenario_config();
        let state = CurveState::new(&config);
        assert_eq!(
            quote_sell(&config, &state, 1),
            Err(LaunchpadError::InsufficientLiquidity { required: 1, available: 0 })
        );
        assert!(matches!(
            quote_sell(&config, &state, 0),
            Err(LaunchpadError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_fee_remainder_is_retained() {
        let config = CurveConfig {
            fee_bps: 100,
            creator_fee_bps: 30,
            platform_fee_bps: 30,
            ..scenario_config()
        };
        let fee = fee_breakdown(&config, 1_000_001).unwrap();
        assert_eq!(fee.total, 10_001);
        assert_eq!(fee.creator, 3_000);
        assert_eq!(fee.platform, 3_000);
        assert_eq!(fee.retained, 4_001);
    }
}

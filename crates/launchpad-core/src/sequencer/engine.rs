//! # Sequencer Transitions
//!
//! Reservation hands out `next_id` and advances it, so reserved ids always
//! form the range `[1, next_id - 1]`. Locking freezes new issuance; ids
//! already handed out stay valid. Every transition returns a new snapshot.

use crate::constants::FIRST_TOKEN_ID;
use crate::errors::{CoreResult, LaunchpadError};
use crate::math::safe_add_u64;
use crate::sequencer::sequence::{metadata_uri, LockedTokenMetadata, TokenSequence};
use crate::types::Authority;

/// Reserve the next token id for `mint_address`
pub fn reserve(
    sequence: &TokenSequence,
    mint_address: &str,
    reserved_by: &str,
    reserved_at: i64,
    base_uri: &str,
) -> CoreResult<(TokenSequence, LockedTokenMetadata)> {
    // A lock taken before anything was issued still admits the first id
    if sequence.locked && sequence.next_id > FIRST_TOKEN_ID {
        return Err(LaunchpadError::SequenceLocked);
    }
    if sequence.next_id > sequence.total_supply {
        return Err(LaunchpadError::SupplyExceeded {
            total_supply: sequence.total_supply,
        });
    }
    if mint_address.is_empty() {
        return Err(LaunchpadError::InvalidInput("mint address is required"));
    }

    let token_id = sequence.next_id;
    if sequence.reservations.contains_key(&token_id) {
        return Err(LaunchpadError::InconsistentState("next token id already reserved"));
    }

    let metadata = LockedTokenMetadata {
        token_id,
        collection: sequence.collection.clone(),
        mint_address: mint_address.to_string(),
        metadata_uri: metadata_uri(base_uri, &sequence.collection, token_id),
        reserved_by: reserved_by.to_string(),
        reserved_at,
    };

    let mut next = sequence.clone();
    next.reservations.insert(token_id, metadata.clone());
    next.next_id = safe_add_u64(token_id, 1)?;
    next.version = safe_add_u64(sequence.version, 1)?;

    log::debug!(
        "Reserved token {} of {} for {}",
        token_id,
        sequence.collection,
        reserved_by
    );
    Ok((next, metadata))
}

/// Freeze issuance. Locking a locked sequence is a no-op.
pub fn lock(
    sequence: &TokenSequence,
    authority: &Authority,
    locked_at: i64,
) -> CoreResult<TokenSequence> {
    let actor = authority.require()?;
    if sequence.locked {
        return Ok(sequence.clone());
    }

    let mut next = sequence.clone();
    next.locked = true;
    next.locked_at = Some(locked_at);
    next.locked_by = Some(actor.to_string());
    next.version = safe_add_u64(sequence.version, 1)?;

    log::debug!("Locked {} at token {} by {}", sequence.collection, sequence.next_id, actor);
    Ok(next)
}

/// Lift a lock regardless of who placed it
pub fn force_unlock(sequence: &TokenSequence, authority: &Authority) -> CoreResult<TokenSequence> {
    let actor = authority.require()?;
    if !sequence.locked {
        return Ok(sequence.clone());
    }

    let mut next = sequence.clone();
    next.locked = false;
    next.locked_at = None;
    next.locked_by = None;
    next.version = safe_add_u64(sequence.version, 1)?;

    log::info!("Force-unlocked {} by {}", sequence.collection, actor);
    Ok(next)
}

/// Change the supply ceiling of an unlocked sequence
pub fn update_total_supply(
    sequence: &TokenSequence,
    authority: &Authority,
    new_total: u64,
) -> CoreResult<TokenSequence> {
    let actor = authority.require()?;
    if sequence.locked {
        return Err(LaunchpadError::SequenceLocked);
    }
    if new_total == 0 {
        return Err(LaunchpadError::InvalidInput("total supply must be positive"));
    }
    if new_total < sequence.reserved_count() {
        return Err(LaunchpadError::SupplyExceeded {
            total_supply: new_total,
        });
    }

    let mut next = sequence.clone();
    next.total_supply = new_total;
    next.version = safe_add_u64(sequence.version, 1)?;

    log::debug!(
        "Total supply of {} set {} -> {} by {}",
        sequence.collection,
        sequence.total_supply,
        new_total,
        actor
    );
    Ok(next)
}

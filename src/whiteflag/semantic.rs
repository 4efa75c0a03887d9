// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Semantic validation of a transaction against the outputs it consumes.
//!
//! The rules are evaluated in a fixed order and the first failing rule decides the recorded
//! conflict, so every node reports the same reason for the same transaction.

use std::collections::HashMap;

use crypto::signatures::ed25519;
use primitive_types::U256;

use crate::{
    config::ProtocolConfig,
    types::{
        address::{Address, Ed25519Address},
        ledger::{ConflictReason, LedgerOutput, RentStructureBytes},
        message::transaction::{Signature, TransactionEssence, TransactionPayload, Unlock},
        output::{AliasOutput, BasicOutput, FoundryOutput, NativeTokenId, NftOutput, Output},
        tangle::MilestoneTimestamp,
    },
};

/// Validates a transaction whose inputs have been resolved to `consumed`, in input order.
///
/// Returns [`ConflictReason::None`] when the transaction is applicable to the ledger.
pub fn validate_transaction(
    config: &ProtocolConfig,
    milestone_timestamp: MilestoneTimestamp,
    payload: &TransactionPayload,
    consumed: &[LedgerOutput],
) -> ConflictReason {
    let TransactionEssence::Regular {
        network_id,
        inputs_commitment,
        outputs,
        ..
    } = &payload.essence;

    if *inputs_commitment != TransactionEssence::inputs_commitment(consumed.iter().map(|o| &o.output)) {
        return ConflictReason::InputsCommitmentsMismatch;
    }

    if *network_id != config.network_id() {
        return ConflictReason::SemanticValidationFailed;
    }

    if payload.unlocks.len() != consumed.len() {
        return ConflictReason::InvalidUnlock;
    }

    let essence_hash = payload.essence.hash();
    let mut unlocked_addresses: Vec<Option<Address>> = vec![None; consumed.len()];

    for (index, (spent, unlock)) in consumed.iter().zip(payload.unlocks.iter()).enumerate() {
        if let Some(timelock) = timelock(&spent.output) {
            if timelock > milestone_timestamp {
                return ConflictReason::TimelockNotExpired;
            }
        }

        let Some(required) = required_address(&spent.output, milestone_timestamp) else {
            return ConflictReason::SemanticValidationFailed;
        };

        match unlock {
            Unlock::Signature { signature } => {
                let Signature::Ed25519 { public_key, signature } = signature;
                let Address::Ed25519 { address } = required else {
                    return ConflictReason::InvalidUnlock;
                };
                if Ed25519Address::from_public_key(public_key) != address {
                    return ConflictReason::InvalidUnlock;
                }
                if !verify_ed25519(public_key, signature, &essence_hash) {
                    return ConflictReason::InvalidSignature;
                }
            }
            Unlock::Reference { index: referenced } => {
                let referenced = *referenced as usize;
                let valid = referenced < index
                    && matches!(payload.unlocks[referenced], Unlock::Signature { .. })
                    && unlocked_addresses[referenced] == Some(required);
                if !valid {
                    return ConflictReason::InvalidUnlock;
                }
            }
            Unlock::Alias { index: referenced } => {
                let referenced = *referenced as usize;
                let Address::Alias { alias_id } = required else {
                    return ConflictReason::InvalidUnlock;
                };
                let valid = referenced < index
                    && matches!(
                        &consumed[referenced].output,
                        Output::Alias(AliasOutput { alias_id: unlocked, .. }) if *unlocked == alias_id
                    );
                if !valid {
                    return ConflictReason::InvalidUnlock;
                }
            }
            Unlock::Nft { index: referenced } => {
                let referenced = *referenced as usize;
                let Address::Nft { nft_id } = required else {
                    return ConflictReason::InvalidUnlock;
                };
                let valid = referenced < index
                    && matches!(
                        &consumed[referenced].output,
                        Output::Nft(NftOutput { nft_id: unlocked, .. }) if *unlocked == nft_id
                    );
                if !valid {
                    return ConflictReason::InvalidUnlock;
                }
            }
        }
        unlocked_addresses[index] = Some(required);
    }

    let consumed_amount = consumed.iter().map(|o| o.amount().0 as u128).sum::<u128>();
    let created_amount = outputs.iter().map(|o| o.amount().0 as u128).sum::<u128>();
    if consumed_amount != created_amount {
        return ConflictReason::CreatedConsumedAmountMismatch;
    }
    if created_amount > config.token_supply as u128 {
        return ConflictReason::SemanticValidationFailed;
    }

    if !native_tokens_balanced(consumed, outputs) {
        return ConflictReason::InvalidNativeTokens;
    }

    for spent in consumed {
        if let Some((return_address, amount)) = storage_deposit_return(&spent.output) {
            let repaid = outputs
                .iter()
                .filter_map(|output| match output {
                    Output::Basic(basic) if basic.address_unlock_condition.address == return_address => {
                        Some(basic.amount.0)
                    }
                    _ => None,
                })
                .sum::<u64>();
            if repaid < amount {
                return ConflictReason::StorageDepositReturnUnfulfilled;
            }
        }
    }

    for output in outputs.iter() {
        let minimum = RentStructureBytes::compute(output).rent_cost(&config.rent_structure);
        if output.amount().0 < minimum {
            return ConflictReason::SemanticValidationFailed;
        }
    }

    for output in outputs.iter() {
        for feature in output.features() {
            if let crate::types::output::Feature::Sender { address } = feature {
                if !unlocked_addresses.iter().any(|unlocked| unlocked.as_ref() == Some(address)) {
                    return ConflictReason::UnverifiedSender;
                }
            }
        }
    }

    ConflictReason::None
}

/// The address that must be unlocked to consume the output, taking an elapsed expiration into
/// account. The treasury output is not consumable by a transaction.
fn required_address(output: &Output, milestone_timestamp: MilestoneTimestamp) -> Option<Address> {
    match output {
        Output::Treasury(_) => None,
        Output::Basic(BasicOutput {
            address_unlock_condition,
            expiration_unlock_condition,
            ..
        })
        | Output::Nft(NftOutput {
            address_unlock_condition,
            expiration_unlock_condition,
            ..
        }) => match expiration_unlock_condition {
            Some(expiration) if milestone_timestamp >= expiration.timestamp => Some(expiration.return_address),
            _ => Some(address_unlock_condition.address),
        },
        Output::Alias(AliasOutput {
            state_controller_address_unlock_condition,
            ..
        }) => Some(state_controller_address_unlock_condition.address),
        Output::Foundry(FoundryOutput {
            immutable_alias_address_unlock_condition,
            ..
        }) => Some(immutable_alias_address_unlock_condition.address),
    }
}

fn timelock(output: &Output) -> Option<MilestoneTimestamp> {
    match output {
        Output::Basic(BasicOutput {
            timelock_unlock_condition,
            ..
        })
        | Output::Nft(NftOutput {
            timelock_unlock_condition,
            ..
        }) => timelock_unlock_condition.map(|condition| condition.timestamp),
        _ => None,
    }
}

fn storage_deposit_return(output: &Output) -> Option<(Address, u64)> {
    match output {
        Output::Basic(BasicOutput {
            storage_deposit_return_unlock_condition,
            ..
        })
        | Output::Nft(NftOutput {
            storage_deposit_return_unlock_condition,
            ..
        }) => storage_deposit_return_unlock_condition.map(|condition| (condition.return_address, condition.amount.0)),
        _ => None,
    }
}

/// Whether the native tokens of the transaction balance out.
///
/// A token may only appear or disappear when the transaction also touches the foundry that
/// mints it; the foundry state transition itself authorizes the delta.
fn native_tokens_balanced(consumed: &[LedgerOutput], created: &[Output]) -> bool {
    let mut balance: HashMap<NativeTokenId, (U256, U256)> = HashMap::new();
    for output in consumed.iter().map(|spent| &spent.output) {
        for token in output.native_tokens() {
            balance.entry(token.token_id).or_default().0 += U256::from(token.amount);
        }
    }
    for output in created {
        for token in output.native_tokens() {
            balance.entry(token.token_id).or_default().1 += U256::from(token.amount);
        }
    }

    let touched_foundries = consumed
        .iter()
        .map(|spent| &spent.output)
        .chain(created.iter())
        .filter_map(|output| match output {
            Output::Foundry(foundry) => Some(foundry.native_token_id()),
            _ => None,
        })
        .collect::<Vec<_>>();

    balance
        .into_iter()
        .all(|(token_id, (consumed, created))| consumed == created || touched_foundries.contains(&token_id))
}

fn verify_ed25519(public_key: &[u8; 32], signature: &[u8; 64], message: &[u8]) -> bool {
    match ed25519::PublicKey::try_from_bytes(*public_key) {
        Ok(public_key) => public_key.verify(&ed25519::Signature::from_bytes(*signature), message),
        Err(_) => false,
    }
}

//! Simulated chain state: block time, accounts and ERC20 ledgers.
//!
//! The chain is the single shared mutable resource of the harness. All
//! simulated contracts (pool, sett, strategy) keep their token state here so
//! that cross-contract transfers settle against one ledger set.

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};

use crate::error::{Result, SimError};

/// Genesis timestamp for new chains (arbitrary, stable for tests)
const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

/// An in-memory ERC20 ledger.
#[derive(Debug, Clone, Default)]
struct TokenLedger {
    symbol: String,
    total_supply: U256,
    balances: BTreeMap<Address, U256>,
    allowances: BTreeMap<(Address, Address), U256>,
}

/// Simulated chain: timestamp, block number, account allocation and tokens.
#[derive(Debug, Clone)]
pub struct Chain {
    /// Current block timestamp in seconds
    pub timestamp: u64,
    /// Current block number
    pub block: u64,
    next_account: u64,
    tokens: BTreeMap<Address, TokenLedger>,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    /// Create a fresh chain at the genesis timestamp.
    pub fn new() -> Self {
        Self {
            timestamp: GENESIS_TIMESTAMP,
            block: 1,
            next_account: 1,
            tokens: BTreeMap::new(),
        }
    }

    /// Advance the block timestamp.
    pub fn sleep(&mut self, secs: u64) {
        self.timestamp += secs;
    }

    /// Advance the block number. Does not move time; pair with [`Chain::sleep`].
    pub fn mine(&mut self, blocks: u64) {
        self.block += blocks;
    }

    /// Allocate a deterministic, unique account address.
    pub fn create_account(&mut self) -> Address {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&self.next_account.to_be_bytes());
        self.next_account += 1;
        Address::from(bytes)
    }

    /// Deploy a new ERC20 ledger and return its address.
    pub fn deploy_token(&mut self, symbol: &str) -> Address {
        let address = self.create_account();
        self.tokens.insert(
            address,
            TokenLedger {
                symbol: symbol.to_string(),
                ..TokenLedger::default()
            },
        );
        address
    }

    /// Symbol of a deployed token, if any.
    pub fn token_symbol(&self, token: Address) -> Option<&str> {
        self.tokens.get(&token).map(|l| l.symbol.as_str())
    }

    /// Balance of `holder` in `token`. Unknown tokens and holders read as zero.
    pub fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.tokens
            .get(&token)
            .and_then(|l| l.balances.get(&holder).copied())
            .unwrap_or(U256::ZERO)
    }

    /// Total minted supply of `token`. Unknown tokens read as zero.
    pub fn total_supply(&self, token: Address) -> U256 {
        self.tokens
            .get(&token)
            .map(|l| l.total_supply)
            .unwrap_or(U256::ZERO)
    }

    /// Remaining allowance from `owner` to `spender`.
    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.tokens
            .get(&token)
            .and_then(|l| l.allowances.get(&(owner, spender)).copied())
            .unwrap_or(U256::ZERO)
    }

    fn ledger_mut(&mut self, token: Address) -> Result<&mut TokenLedger> {
        self.tokens
            .get_mut(&token)
            .ok_or(SimError::UnknownToken { token })
    }

    /// Mint `amount` of `token` to `to`.
    pub fn mint(&mut self, token: Address, to: Address, amount: U256) -> Result<()> {
        let ledger = self.ledger_mut(token)?;
        *ledger.balances.entry(to).or_default() += amount;
        ledger.total_supply += amount;
        Ok(())
    }

    /// Burn `amount` of `token` from `from`.
    pub fn burn(&mut self, token: Address, from: Address, amount: U256) -> Result<()> {
        let ledger = self.ledger_mut(token)?;
        let have = ledger.balances.get(&from).copied().unwrap_or(U256::ZERO);
        if have < amount {
            return Err(SimError::InsufficientBalance {
                token,
                holder: from,
                have,
                need: amount,
            });
        }
        ledger.balances.insert(from, have - amount);
        ledger.total_supply -= amount;
        Ok(())
    }

    /// Set the allowance from `owner` to `spender`.
    pub fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<()> {
        let ledger = self.ledger_mut(token)?;
        ledger.allowances.insert((owner, spender), amount);
        Ok(())
    }

    /// Move `amount` of `token` from `from` to `to`.
    pub fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        let ledger = self.ledger_mut(token)?;
        let have = ledger.balances.get(&from).copied().unwrap_or(U256::ZERO);
        if have < amount {
            return Err(SimError::InsufficientBalance {
                token,
                holder: from,
                have,
                need: amount,
            });
        }
        ledger.balances.insert(from, have - amount);
        *ledger.balances.entry(to).or_default() += amount;
        Ok(())
    }

    /// Move `amount` of `token` from `from` to `to`, spending `spender`'s allowance.
    pub fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        let allowed = self.allowance(token, from, spender);
        if allowed < amount {
            return Err(SimError::InsufficientAllowance {
                token,
                owner: from,
                spender,
                have: allowed,
                need: amount,
            });
        }
        self.transfer(token, from, to, amount)?;
        let ledger = self.ledger_mut(token)?;
        ledger.allowances.insert((from, spender), allowed - amount);
        Ok(())
    }
}

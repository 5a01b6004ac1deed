//! Call builders for the game and LORDS token contracts.
//!
//! Builders only produce [`ContractCall`] descriptors; nothing is sent here.
//! Adventurer ids and token amounts are u256 values, encoded as `low, high`
//! felt pairs.

use crate::types::{ContractAddress, ContractCall};

/// 10^18, the LORDS token's base unit.
pub const LORDS_DECIMALS: u128 = 1_000_000_000_000_000_000;

/// Amount of LORDS minted by the faucet button.
pub const DEFAULT_MINT_AMOUNT: u128 = 25 * LORDS_DECIMALS;

/// Builder for the game contract's entrypoints.
#[derive(Debug, Clone)]
pub struct GameContract {
    address: ContractAddress,
}

impl GameContract {
    pub fn new(address: ContractAddress) -> Self {
        Self { address }
    }

    pub fn address(&self) -> &ContractAddress {
        &self.address
    }

    /// `attack(adventurer_id: u256, to_the_death: bool)`.
    ///
    /// With `till_death` set, the contract repeats the exchange until either
    /// the beast or the adventurer reaches zero health.
    pub fn attack(&self, adventurer_id: u64, till_death: bool) -> ContractCall {
        self.battle_call("attack", adventurer_id, till_death)
    }

    /// `flee(adventurer_id: u256, to_the_death: bool)`.
    pub fn flee(&self, adventurer_id: u64, till_death: bool) -> ContractCall {
        self.battle_call("flee", adventurer_id, till_death)
    }

    fn battle_call(&self, entrypoint: &str, adventurer_id: u64, till_death: bool) -> ContractCall {
        let mut calldata = u256_calldata(u128::from(adventurer_id));
        calldata.push(bool_felt(till_death));
        ContractCall::new(self.address.clone(), entrypoint, calldata)
    }
}

/// Builder for the LORDS token contract.
#[derive(Debug, Clone)]
pub struct LordsContract {
    address: ContractAddress,
}

impl LordsContract {
    pub fn new(address: ContractAddress) -> Self {
        Self { address }
    }

    pub fn address(&self) -> &ContractAddress {
        &self.address
    }

    /// `mint(recipient, amount: u256)`.
    pub fn mint(&self, recipient: &ContractAddress, amount: u128) -> ContractCall {
        let mut calldata = vec![recipient.as_str().to_string()];
        calldata.extend(u256_calldata(amount));
        ContractCall::new(self.address.clone(), "mint", calldata)
    }
}

fn u256_calldata(value: u128) -> Vec<String> {
    vec![value.to_string(), "0".to_string()]
}

fn bool_felt(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> GameContract {
        GameContract::new(ContractAddress::new("0x0game"))
    }

    #[test]
    fn attack_encodes_adventurer_and_flag() {
        let call = game().attack(42, false);
        assert_eq!(call.entrypoint, "attack");
        assert_eq!(call.contract_address.as_str(), "0x0game");
        assert_eq!(call.calldata, vec!["42", "0", "0"]);

        assert_eq!(game().attack(42, true).calldata, vec!["42", "0", "1"]);
    }

    #[test]
    fn flee_till_death_sends_till_death_flag() {
        let single = game().flee(7, false);
        let repeated = game().flee(7, true);
        assert_eq!(single.entrypoint, "flee");
        assert_eq!(single.calldata[2], "0");
        assert_eq!(repeated.calldata[2], "1");
    }

    #[test]
    fn mint_encodes_recipient_and_amount() {
        let lords = LordsContract::new(ContractAddress::new("0x0lords"));
        let call = lords.mint(&ContractAddress::new("0x0me"), DEFAULT_MINT_AMOUNT);
        assert_eq!(call.entrypoint, "mint");
        assert_eq!(
            call.calldata,
            vec!["0x0me", "25000000000000000000", "0"]
        );
    }
}

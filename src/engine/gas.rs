// Gas - Gas left in one call frame
use crate::types::{Balance, Gas};

/// Cost table of the scripted reference engine
pub mod costs {
    use crate::types::Gas;

    pub const STORAGE_READ: Gas = 200;
    /// Zero to non-zero slot
    pub const STORAGE_WRITE_NEW: Gas = 20_000;
    pub const STORAGE_WRITE_EXISTING: Gas = 5_000;

    pub const BALANCE_READ: Gas = 100;
    pub const VALUE_TRANSFER: Gas = 9_000;

    /// Origin, gas price, block fields
    pub const CONTEXT_READ: Gas = 2;

    /// Per byte of return or revert data
    pub const RETURN_DATA_BYTE: Gas = 3;
}

/// Counts down the gas a call was given
///
/// The price only matters for [`GasMeter::total_cost`]; system calls run at
/// price 0 so their cost is always 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasMeter {
    limit: Gas,
    left: Gas,
    price: Balance,
}

impl GasMeter {
    pub fn new(limit: Gas, price: Balance) -> Self {
        Self {
            limit,
            left: limit,
            price,
        }
    }

    /// Take `amount` from what is left, or fail without taking anything
    pub fn consume(&mut self, amount: Gas) -> Result<(), GasError> {
        match self.left.checked_sub(amount) {
            Some(left) => {
                self.left = left;
                Ok(())
            }
            None => Err(GasError::OutOfGas {
                needed: amount,
                remaining: self.left,
            }),
        }
    }

    /// Charge `per_byte` for each of `len` bytes
    pub fn consume_per_byte(&mut self, per_byte: Gas, len: usize) -> Result<(), GasError> {
        let amount = Gas::try_from(len)
            .ok()
            .and_then(|len| len.checked_mul(per_byte))
            .ok_or(GasError::Overflow)?;
        self.consume(amount)
    }

    /// Hard failure: nothing is returned to the caller
    pub fn consume_all(&mut self) {
        self.left = 0;
    }

    /// Give back gas, never beyond the limit
    pub fn refund(&mut self, amount: Gas) {
        self.left = self.left.saturating_add(amount).min(self.limit);
    }

    pub fn remaining(&self) -> Gas {
        self.left
    }

    pub fn used(&self) -> Gas {
        self.limit - self.left
    }

    pub fn limit(&self) -> Gas {
        self.limit
    }

    pub fn gas_price(&self) -> Balance {
        self.price
    }

    /// used * price
    pub fn total_cost(&self) -> Balance {
        Balance::from(self.used()).saturating_mul(self.price)
    }
}

/// Metering failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GasError {
    #[error("Out of gas: needed {needed}, remaining {remaining}")]
    OutOfGas { needed: Gas, remaining: Gas },

    /// A computed charge does not fit in a gas counter
    #[error("Gas overflow")]
    Overflow,
}

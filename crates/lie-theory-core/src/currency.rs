//! The theory's currency (rho) and its tau high-water mark.
//!
//! All amounts are [`Decimal`] and every operation is checked. The
//! high-water mark only ever rises; milestone points and publication are
//! both measured against it.

use rust_decimal::Decimal;

/// Errors from currency operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CurrencyError {
    /// Amounts added or spent must not be negative.
    #[error("currency amount must not be negative, got {amount}")]
    NegativeAmount {
        /// The rejected amount.
        amount: Decimal,
    },

    /// The balance does not cover the requested spend.
    #[error("insufficient currency: need {needed}, have {available}")]
    Insufficient {
        /// Amount requested.
        needed: Decimal,
        /// Amount held.
        available: Decimal,
    },

    /// The balance would leave the representable range.
    #[error("currency overflow adding {amount} to {balance}")]
    Overflow {
        /// Balance before the add.
        balance: Decimal,
        /// Amount being added.
        amount: Decimal,
    },
}

/// A single currency balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Currency {
    /// Current balance.
    value: Decimal,
    /// Highest balance ever held.
    max_value: Decimal,
}

impl Currency {
    /// An empty balance.
    pub const fn new() -> Self {
        Self {
            value: Decimal::ZERO,
            max_value: Decimal::ZERO,
        }
    }

    /// Restore a balance and high-water mark. The mark is raised to at
    /// least `value`.
    pub fn from_parts(value: Decimal, max_value: Decimal) -> Self {
        Self {
            value,
            max_value: max_value.max(value),
        }
    }

    /// Current balance.
    pub const fn value(&self) -> Decimal {
        self.value
    }

    /// Highest balance ever held.
    pub const fn max_value(&self) -> Decimal {
        self.max_value
    }

    /// Whether the balance covers `amount`.
    pub fn can_afford(&self, amount: Decimal) -> bool {
        self.value >= amount
    }

    /// Add `amount` and return the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::NegativeAmount`] for negative input and
    /// [`CurrencyError::Overflow`] if the sum is not representable.
    pub fn add(&mut self, amount: Decimal) -> Result<Decimal, CurrencyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(CurrencyError::NegativeAmount { amount });
        }
        self.value = self
            .value
            .checked_add(amount)
            .ok_or(CurrencyError::Overflow {
                balance: self.value,
                amount,
            })?;
        if self.value > self.max_value {
            self.max_value = self.value;
        }
        Ok(self.value)
    }

    /// Deduct `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::NegativeAmount`] for negative input and
    /// [`CurrencyError::Insufficient`] if the balance is too low.
    pub fn spend(&mut self, amount: Decimal) -> Result<(), CurrencyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(CurrencyError::NegativeAmount { amount });
        }
        if !self.can_afford(amount) {
            return Err(CurrencyError::Insufficient {
                needed: amount,
                available: self.value,
            });
        }
        // value >= amount >= 0, so the difference is representable.
        self.value = self.value.checked_sub(amount).unwrap_or(Decimal::ZERO);
        Ok(())
    }

    /// Zero the balance. The high-water mark is kept.
    pub const fn reset(&mut self) {
        self.value = Decimal::ZERO;
    }
}

//! Operation kind
//!
//! A transaction either debits or credits the client's balance. On the wire
//! the kinds are the single-letter codes `"d"` and `"c"`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// Direction of a monetary movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "d")]
    Debit,
    #[serde(rename = "c")]
    Credit,
}

impl Operation {
    /// Single-letter code used on the wire and in the `transactions` table
    pub fn as_code(&self) -> &'static str {
        match self {
            Operation::Debit => "d",
            Operation::Credit => "c",
        }
    }

    /// Signed effect of `amount` on a balance
    pub fn signed(&self, amount: i64) -> i64 {
        match self {
            Operation::Debit => -amount,
            Operation::Credit => amount,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for Operation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "d" => Ok(Operation::Debit),
            "c" => Ok(Operation::Credit),
            other => Err(DomainError::InvalidOperation(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!("d".parse::<Operation>().unwrap(), Operation::Debit);
        assert_eq!("c".parse::<Operation>().unwrap(), Operation::Credit);
    }

    #[test]
    fn test_parse_rejects_unknown_codes() {
        for code in ["", "D", "C", "x", "debit", "dc"] {
            assert!(
                matches!(code.parse::<Operation>(), Err(DomainError::InvalidOperation(_))),
                "code {:?} should be rejected",
                code
            );
        }
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Operation::Debit).unwrap(), "\"d\"");
        let op: Operation = serde_json::from_str("\"c\"").unwrap();
        assert_eq!(op, Operation::Credit);
    }

    #[test]
    fn test_signed() {
        assert_eq!(Operation::Debit.signed(10), -10);
        assert_eq!(Operation::Credit.signed(10), 10);
    }
}

//! Caller identity extraction
//!
//! Reads the account id out of an already verified claim set. Claim names
//! are tried in order and the first one present wins; a present value that
//! is not an integer yields no identity rather than falling through.

use super::token::ClaimSet;
use eventhub_core::AccountId;
use serde_json::Value;

/// Account id claim names, in lookup order: the application claim, then
/// the standard subject claim.
pub const ACCOUNT_ID_CLAIMS: [&str; 2] = ["userId", "sub"];

/// The account making this call, or `None` when the claims carry no usable id
pub fn current_account_id(claims: &ClaimSet) -> Option<AccountId> {
    let value = ACCOUNT_ID_CLAIMS
        .iter()
        .find_map(|name| claims.get(name))?;

    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_i64().map(AccountId),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: serde_json::Value) -> ClaimSet {
        match value {
            Value::Object(map) => ClaimSet::new(map),
            _ => unreachable!("test claims must be an object"),
        }
    }

    #[test]
    fn test_primary_claim() {
        let claims = claims(json!({ "userId": "5", "sub": "9" }));
        assert_eq!(current_account_id(&claims), Some(AccountId(5)));
    }

    #[test]
    fn test_falls_back_to_subject() {
        let claims = claims(json!({ "sub": "9" }));
        assert_eq!(current_account_id(&claims), Some(AccountId(9)));
    }

    #[test]
    fn test_numeric_claim() {
        let claims = claims(json!({ "userId": 12 }));
        assert_eq!(current_account_id(&claims), Some(AccountId(12)));
    }

    #[test]
    fn test_absent_or_unparsable() {
        assert_eq!(current_account_id(&claims(json!({}))), None);
        assert_eq!(current_account_id(&claims(json!({ "sub": "alice@example.com" }))), None);
        assert_eq!(current_account_id(&claims(json!({ "userId": true }))), None);
        assert_eq!(current_account_id(&claims(json!({ "userId": 1.5 }))), None);
    }

    #[test]
    fn test_first_present_claim_wins() {
        let claims = claims(json!({ "userId": "abc", "sub": "9" }));
        assert_eq!(current_account_id(&claims), None);
    }
}

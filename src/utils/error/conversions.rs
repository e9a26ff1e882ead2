//! Type conversions for GatewayError

use super::types::GatewayError;
use crate::auth::tokens::TokenError;

// Token state machine outcomes wrap without losing the variant; the HTTP
// layer decides how much detail leaves the process.
impl From<TokenError> for GatewayError {
    fn from(err: TokenError) -> Self {
        GatewayError::Token(err)
    }
}

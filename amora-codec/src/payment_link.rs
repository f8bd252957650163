//! Payment-link URIs.
//!
//! `amora://pay?meta=<meta-address>[&token=<hex>][&amount=<decimal>][&memo=<utf8>]`
//!
//! Only `meta` is required. Values are form-encoded, so memos with `&`,
//! spaces, or `%` survive the round trip.

use serde::{Deserialize, Serialize};
use starknet_crypto::FieldElement;
use url::Url;

use amora_core::constants::{PAYMENT_LINK_HOST, PAYMENT_LINK_SCHEME};
use amora_core::serde_felt::felt_hex_opt;
use amora_core::{AmoraError, MetaAddress, Result, TokenAmount};

use crate::felt_str::{parse_wire_felt, to_wire_hex};
use crate::meta::{encode_meta_address, parse_meta_address};

/// A request for payment, as carried by a payment link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Recipient meta-address.
    pub meta: MetaAddress,
    /// Suggested token contract, if any.
    #[serde(with = "felt_hex_opt", default, skip_serializing_if = "Option::is_none")]
    pub token: Option<FieldElement>,
    /// Suggested amount, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<TokenAmount>,
    /// Free-form memo, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl PaymentRequest {
    /// A request with only the recipient filled in.
    pub fn new(meta: MetaAddress) -> Self {
        Self {
            meta,
            token: None,
            amount: None,
            memo: None,
        }
    }
}

/// Renders a payment request as an `amora://` link.
pub fn generate_payment_link(request: &PaymentRequest) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("meta", &encode_meta_address(&request.meta));
    if let Some(token) = &request.token {
        query.append_pair("token", &to_wire_hex(token));
    }
    if let Some(amount) = &request.amount {
        query.append_pair("amount", &amount.to_string());
    }
    if let Some(memo) = &request.memo {
        query.append_pair("memo", memo);
    }
    format!(
        "{}://{}?{}",
        PAYMENT_LINK_SCHEME,
        PAYMENT_LINK_HOST,
        query.finish()
    )
}

/// Parses an `amora://` payment link.
pub fn parse_payment_link(link: &str) -> Result<PaymentRequest> {
    let url = Url::parse(link)
        .map_err(|e| AmoraError::InvalidFormat(format!("payment link: {e}")))?;
    if url.scheme() != PAYMENT_LINK_SCHEME {
        return Err(AmoraError::InvalidFormat(format!(
            "payment link scheme is {:?}, expected {PAYMENT_LINK_SCHEME:?}",
            url.scheme()
        )));
    }
    if url.host_str() != Some(PAYMENT_LINK_HOST) {
        return Err(AmoraError::InvalidFormat(format!(
            "payment link host is {:?}, expected {PAYMENT_LINK_HOST:?}",
            url.host_str().unwrap_or_default()
        )));
    }

    let mut meta = None;
    let mut token = None;
    let mut amount = None;
    let mut memo = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "meta" => meta = Some(parse_meta_address(&value)?),
            "token" => token = Some(parse_wire_felt(&value)?),
            "amount" => amount = Some(TokenAmount::from_dec_str(&value)?),
            "memo" => memo = Some(value.into_owned()),
            // Unknown parameters are ignored for forward compatibility.
            _ => {}
        }
    }

    let meta =
        meta.ok_or_else(|| AmoraError::InvalidFormat("payment link is missing meta=".into()))?;
    Ok(PaymentRequest {
        meta,
        token,
        amount,
        memo,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use amora_core::ChainTag;

    fn sample_meta() -> MetaAddress {
        MetaAddress::new(
            ChainTag::Starknet,
            FieldElement::from(0x1111u64),
            FieldElement::from(0x2222u64),
        )
    }

    #[test]
    fn full_roundtrip() {
        let request = PaymentRequest {
            meta: sample_meta(),
            token: Some(FieldElement::from(0x4949u64)),
            amount: Some(TokenAmount::from(123_456u128)),
            memo: Some("coffee & cake 10% off".into()),
        };
        let link = generate_payment_link(&request);
        assert!(link.starts_with("amora://pay?meta="));
        assert_eq!(parse_payment_link(&link).unwrap(), request);
    }

    #[test]
    fn minimal_roundtrip() {
        let request = PaymentRequest::new(sample_meta());
        let link = generate_payment_link(&request);
        let parsed = parse_payment_link(&link).unwrap();
        assert_eq!(parsed, request);
        assert!(parsed.token.is_none());
        assert!(parsed.amount.is_none());
        assert!(parsed.memo.is_none());
    }

    #[test]
    fn memo_special_characters_survive() {
        let request = PaymentRequest {
            meta: sample_meta(),
            token: None,
            amount: None,
            memo: Some("& %".into()),
        };
        let parsed = parse_payment_link(&generate_payment_link(&request)).unwrap();
        assert_eq!(parsed.memo.as_deref(), Some("& %"));
    }

    #[test]
    fn rejects_wrong_scheme_or_host() {
        let link = generate_payment_link(&PaymentRequest::new(sample_meta()));
        let wrong_scheme = link.replacen("amora://", "https://", 1);
        assert!(parse_payment_link(&wrong_scheme).is_err());
        let wrong_host = link.replacen("://pay", "://send", 1);
        assert!(parse_payment_link(&wrong_host).is_err());
    }

    #[test]
    fn rejects_missing_meta() {
        assert!(parse_payment_link("amora://pay?amount=5").is_err());
        assert!(parse_payment_link("not a url").is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let request = PaymentRequest {
            meta: sample_meta(),
            token: Some(FieldElement::from(3u64)),
            amount: Some(TokenAmount::from(9u128)),
            memo: Some("m".into()),
        };
        let json = serde_json::to_string(&request).unwrap();
        let back: PaymentRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request, back);
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let link = format!(
            "{}&future=1",
            generate_payment_link(&PaymentRequest::new(sample_meta()))
        );
        assert!(parse_payment_link(&link).is_ok());
    }
}

use bch_slp_toolkit::decoder::{parse_token_script, parse_token_script_hex, ParseError};
use bch_slp_toolkit::types::SlpMessage;
use bch_slp_toolkit::utils::amount::{format_decimal, format_quantity, scale_quantity};
use bch_slp_toolkit::SlpToolkit;
use num_bigint::BigUint;

use crate::common::{scripts, txid};

#[test]
fn test_genesis_quantity_scaled_by_decimals() {
    let parsed = parse_token_script_hex(&scripts::genesis("TEST", "Test", 2, None, 0x64)).unwrap();

    let SlpMessage::Genesis(genesis) = parsed.message else {
        panic!("expected GENESIS");
    };
    assert_eq!(genesis.decimals, 2);
    assert_eq!(
        format_decimal(&scale_quantity(&genesis.initial_quantity, genesis.decimals)),
        "1.00"
    );
}

#[test]
fn test_nine_decimals_exact() {
    let parsed = parse_token_script_hex(&scripts::genesis("NANO", "Nano", 9, Some(2), 1)).unwrap();

    let SlpMessage::Genesis(genesis) = parsed.message else {
        panic!("expected GENESIS");
    };
    assert_eq!(
        format_quantity(&genesis.initial_quantity, genesis.decimals),
        "0.000000001"
    );
}

#[test]
fn test_large_supply_keeps_every_digit() {
    let parsed = parse_token_script_hex(&scripts::genesis("BIG", "Big", 8, None, u64::MAX)).unwrap();

    let SlpMessage::Genesis(genesis) = parsed.message else {
        panic!("expected GENESIS");
    };
    assert_eq!(genesis.initial_quantity, BigUint::from(u64::MAX));
    assert_eq!(
        format_quantity(&genesis.initial_quantity, 8),
        "184467440737.09551615"
    );
}

#[test]
fn test_rejections_are_typed() {
    assert_eq!(
        parse_token_script_hex(scripts::P2PKH).unwrap_err(),
        ParseError::NotOpReturn
    );
    assert_eq!(
        parse_token_script_hex(&scripts::memo()).unwrap_err(),
        ParseError::NotSlpOpReturn
    );
    assert!(matches!(
        parse_token_script_hex("6a0"),
        Err(ParseError::InvalidHex(_))
    ));
}

#[test]
fn test_send_with_nineteen_outputs_max() {
    let token_id = txid(0xaa);
    let amounts: Vec<u64> = (1..=19).collect();
    let parsed = parse_token_script_hex(&scripts::send(&token_id, &amounts)).unwrap();
    let SlpMessage::Send(send) = parsed.message else {
        panic!("expected SEND");
    };
    assert_eq!(send.amounts.len(), 19);
    assert_eq!(send.amounts[18], BigUint::from(19u32));

    let too_many: Vec<u64> = (1..=20).collect();
    assert!(matches!(
        parse_token_script_hex(&scripts::send(&token_id, &too_many)),
        Err(ParseError::InvalidField { .. })
    ));
}

#[test]
fn test_toolkit_parse_matches_decoder() {
    let script = hex::decode(scripts::mint(&txid(0xbb), Some(2), 10)).unwrap();
    assert_eq!(
        SlpToolkit::<crate::common::MockBackend>::parse_token_script(&script),
        parse_token_script(&script)
    );
}

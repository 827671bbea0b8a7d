//! Liquidity-share token surface: transfers, allowances, signed approvals

mod common;

use common::{addr, banker, e18, PairFixture};
use ethers_core::abi::{encode, Token};
use ethers_core::k256::ecdsa::SigningKey;
use ethers_core::types::{Address, Signature, H256, U256};
use ethers_core::utils::{keccak256, secret_key_to_address};
use xyk_core::{
    permit_typehash, DexError, Event, LogEntry, PairError, TOKEN_DECIMALS, TOKEN_NAME,
    TOKEN_SYMBOL,
};

fn signer() -> (SigningKey, Address) {
    let key = SigningKey::from_slice(&[0x11u8; 32]).unwrap();
    let address = secret_key_to_address(&key);
    (key, address)
}

fn sign_digest(key: &SigningKey, digest: H256) -> Signature {
    let (sig, recovery_id) = key.sign_prehash_recoverable(digest.as_bytes()).unwrap();
    Signature {
        r: U256::from_big_endian(&sig.r().to_bytes()),
        s: U256::from_big_endian(&sig.s().to_bytes()),
        v: u64::from(recovery_id.to_byte()) + 27,
    }
}

#[test]
fn token_metadata() {
    assert_eq!(TOKEN_NAME, "XYK Liquidity");
    assert_eq!(TOKEN_SYMBOL, "XYK-LP");
    assert_eq!(TOKEN_DECIMALS, 18);
    let expected =
        hex::decode("6e71edae12b1b97f4d1f60370fef10105fa2faae0126114a169c64845d6126c9").unwrap();
    assert_eq!(permit_typehash(), H256::from_slice(&expected));
}

#[test]
fn domain_separator_matches_the_eip712_layout() {
    let fx = PairFixture::new();
    let domain_typehash = keccak256(
        b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)",
    );
    let expected = H256::from(keccak256(encode(&[
        Token::FixedBytes(domain_typehash.to_vec()),
        Token::FixedBytes(keccak256(TOKEN_NAME.as_bytes()).to_vec()),
        Token::FixedBytes(keccak256(b"1").to_vec()),
        Token::Uint(U256::one()),
        Token::Address(fx.pair),
    ])));
    assert_eq!(fx.exchange.domain_separator(fx.pair).unwrap(), expected);
}

#[test]
fn approve_and_transfer_from() {
    let mut fx = PairFixture::new();
    fx.add_liquidity(e18(1), e18(4));
    let spender = addr(0x5E);
    let receiver = addr(0x6E);

    fx.exchange
        .share_approve(banker(), fx.pair, spender, e18(1))
        .unwrap();
    assert_eq!(
        fx.exchange.take_events(),
        vec![LogEntry {
            emitter: fx.pair,
            event: Event::Approval {
                owner: banker(),
                spender,
                value: e18(1),
            },
        }]
    );
    assert_eq!(
        fx.exchange.share_allowance(fx.pair, banker(), spender).unwrap(),
        e18(1)
    );

    fx.exchange
        .share_transfer_from(spender, fx.pair, banker(), receiver, e18(1))
        .unwrap();
    assert_eq!(
        fx.exchange.share_allowance(fx.pair, banker(), spender).unwrap(),
        U256::zero()
    );
    assert_eq!(
        fx.exchange.share_balance_of(fx.pair, receiver).unwrap(),
        e18(1)
    );

    // the allowance is spent: a second pull fails and changes nothing
    assert_eq!(
        fx.exchange
            .share_transfer_from(spender, fx.pair, banker(), receiver, U256::one()),
        Err(DexError::Pair(PairError::AllowanceUnderflow))
    );
    assert_eq!(
        fx.exchange.share_balance_of(fx.pair, receiver).unwrap(),
        e18(1)
    );
}

#[test]
fn unlimited_allowance_is_never_decremented() {
    let mut fx = PairFixture::new();
    fx.add_liquidity(e18(1), e18(4));
    let spender = addr(0x5E);

    fx.exchange
        .share_approve(banker(), fx.pair, spender, U256::MAX)
        .unwrap();
    fx.exchange
        .share_transfer_from(spender, fx.pair, banker(), addr(0x6E), e18(1))
        .unwrap();
    assert_eq!(
        fx.exchange.share_allowance(fx.pair, banker(), spender).unwrap(),
        U256::MAX
    );
}

#[test]
fn transfer_rejects_overdraft() {
    let mut fx = PairFixture::new();
    fx.add_liquidity(e18(1), e18(4));
    let balance = fx.exchange.share_balance_of(fx.pair, banker()).unwrap();
    assert_eq!(
        fx.exchange
            .share_transfer(banker(), fx.pair, addr(0x6E), balance + 1),
        Err(DexError::Pair(PairError::BalanceUnderflow))
    );
    // rejected transfer left the balance intact
    assert_eq!(
        fx.exchange.share_balance_of(fx.pair, banker()).unwrap(),
        balance
    );
}

#[test]
fn permit_sets_an_allowance_from_a_signature_alone() {
    let mut fx = PairFixture::new();
    let (key, owner) = signer();
    let spender = addr(0x5E);
    let value = e18(7);
    let deadline = U256::MAX;

    assert_eq!(fx.exchange.nonce_of(fx.pair, owner).unwrap(), U256::zero());
    let digest = fx
        .exchange
        .permit_digest(fx.pair, owner, spender, value, deadline)
        .unwrap();
    let signature = sign_digest(&key, digest);

    fx.exchange
        .permit(fx.pair, owner, spender, value, deadline, &signature)
        .unwrap();
    assert_eq!(
        fx.exchange.share_allowance(fx.pair, owner, spender).unwrap(),
        value
    );
    assert_eq!(fx.exchange.nonce_of(fx.pair, owner).unwrap(), U256::one());
    assert_eq!(
        fx.exchange.take_events(),
        vec![LogEntry {
            emitter: fx.pair,
            event: Event::Approval {
                owner,
                spender,
                value,
            },
        }]
    );

    // the nonce moved on, so replaying the same payload recovers a stranger
    assert_eq!(
        fx.exchange
            .permit(fx.pair, owner, spender, value, deadline, &signature),
        Err(DexError::Pair(PairError::InvalidSignature))
    );
    assert_eq!(fx.exchange.nonce_of(fx.pair, owner).unwrap(), U256::one());
}

#[test]
fn permit_rejects_an_expired_deadline() {
    let mut fx = PairFixture::new();
    let (key, owner) = signer();
    let deadline = U256::from(fx.exchange.now() - 1);
    let digest = fx
        .exchange
        .permit_digest(fx.pair, owner, addr(0x5E), e18(1), deadline)
        .unwrap();
    let signature = sign_digest(&key, digest);
    assert_eq!(
        fx.exchange
            .permit(fx.pair, owner, addr(0x5E), e18(1), deadline, &signature),
        Err(DexError::Pair(PairError::Expired))
    );
}

#[test]
fn permit_rejects_a_foreign_signature() {
    let mut fx = PairFixture::new();
    let (_, owner) = signer();
    let stranger = SigningKey::from_slice(&[0x22u8; 32]).unwrap();
    let digest = fx
        .exchange
        .permit_digest(fx.pair, owner, addr(0x5E), e18(1), U256::MAX)
        .unwrap();
    let signature = sign_digest(&stranger, digest);
    assert_eq!(
        fx.exchange
            .permit(fx.pair, owner, addr(0x5E), e18(1), U256::MAX, &signature),
        Err(DexError::Pair(PairError::InvalidSignature))
    );
    assert_eq!(
        fx.exchange.share_allowance(fx.pair, owner, addr(0x5E)).unwrap(),
        U256::zero()
    );
}

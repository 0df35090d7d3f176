use aegis_credentials::normalize::normalize;
use aegis_credentials::{Curve, Uint256};
use proptest::prelude::*;

/// `n / 2` for secp256k1.
const K256_HALF_ORDER: Uint256 = Uint256::from_words(
    0x5d576e7357a4501ddfe92f46681b20a0,
    0x7fffffffffffffffffffffffffffffff,
);

/// `n / 2` for secp256r1.
const P256_HALF_ORDER: Uint256 = Uint256::from_words(
    0xde737d56d38bcf4279dce5617e3192a8,
    0x7fffffff800000007fffffffffffffff,
);

fn half_order(curve: Curve) -> Uint256 {
    match curve {
        Curve::Secp256k1 => K256_HALF_ORDER,
        Curve::Secp256r1 => P256_HALF_ORDER,
    }
}

/// Whether `a + b == 0 (mod n)`.
fn negates(curve: Curve, a: Uint256, b: Uint256) -> bool {
    use p256::elliptic_curve::ff::PrimeField;
    let (a, b) = (a.to_be_bytes(), b.to_be_bytes());
    match curve {
        Curve::Secp256k1 => {
            let a = Option::<k256::Scalar>::from(k256::Scalar::from_repr(a.into()));
            let b = Option::<k256::Scalar>::from(k256::Scalar::from_repr(b.into()));
            matches!((a, b), (Some(a), Some(b)) if a + b == k256::Scalar::ZERO)
        }
        Curve::Secp256r1 => {
            let a = Option::<p256::Scalar>::from(p256::Scalar::from_repr(a.into()));
            let b = Option::<p256::Scalar>::from(p256::Scalar::from_repr(b.into()));
            matches!((a, b), (Some(a), Some(b)) if a + b == p256::Scalar::ZERO)
        }
    }
}

/// A nonzero scalar below both group orders, drawn from either half.
fn scalar() -> impl Strategy<Value = Uint256> {
    (any::<[u8; 32]>(), any::<bool>()).prop_map(|(mut bytes, high)| {
        // A leading 0xfe lies above n/2 and below n on both curves.
        bytes[0] = if high { 0xfe } else { bytes[0] & 0x7f };
        bytes[31] |= 0x01;
        Uint256::from_be_bytes(bytes)
    })
}

fn signature() -> impl Strategy<Value = (Curve, Uint256, Uint256, bool)> {
    (
        prop_oneof![Just(Curve::Secp256k1), Just(Curve::Secp256r1)],
        scalar(),
        scalar(),
        any::<bool>(),
    )
}

proptest! {
    #[test]
    fn normalized_signatures_are_low_s((curve, r, s, parity) in signature()) {
        let normalized = normalize(curve, r, s, parity);
        prop_assert!(normalized.s <= half_order(curve));
        prop_assert!(normalized.is_canonical(curve));
        prop_assert_eq!(normalized.r, r);
    }

    #[test]
    fn normalization_is_idempotent((curve, r, s, parity) in signature()) {
        let once = normalize(curve, r, s, parity);
        let twice = normalize(curve, once.r, once.s, once.y_parity);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn parity_flips_exactly_when_s_is_negated((curve, r, s, parity) in signature()) {
        let normalized = normalize(curve, r, s, parity);
        prop_assert_eq!(normalized.y_parity != parity, normalized.s != s);
        prop_assert_eq!(normalized.s != s, s > half_order(curve));
        if normalized.s != s {
            prop_assert!(negates(curve, s, normalized.s));
        }
    }
}

//! Property-based tests for rational arithmetic.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{stern_brocot, ApproxConfig, Rational, RationalError};

    fn gcd(mut a: i64, mut b: i64) -> i64 {
        while b != 0 {
            (a, b) = (b, a % b);
        }
        a.abs()
    }

    // Strategy for generating small rationals
    fn small_rational() -> impl Strategy<Value = Rational> {
        (-1000i64..1000i64, 1i64..1000i64)
            .prop_map(|(n, d)| Rational::new(n, d).expect("non-zero denominator"))
    }

    // Strategy for generating non-zero rationals
    fn nonzero_rational() -> impl Strategy<Value = Rational> {
        small_rational().prop_filter("rational must be non-zero", |r| !r.is_zero())
    }

    proptest! {
        #[test]
        fn construction_is_normalized(n in any::<i64>(), d in any::<i64>()) {
            prop_assume!(d != 0);
            if let Ok(r) = Rational::new(n, d) {
                prop_assert!(r.denominator() > 0);
                prop_assert_eq!(gcd(r.numerator(), r.denominator()), 1);
            }
        }

        #[test]
        fn results_stay_normalized(a in small_rational(), b in nonzero_rational()) {
            for r in [a.try_add(b), a.try_sub(b), a.try_mul(b), a.try_div(b)] {
                let r = r.unwrap();
                prop_assert!(r.denominator() > 0);
                prop_assert_eq!(gcd(r.numerator(), r.denominator()), 1);
            }
        }

        #[test]
        fn add_commutative(a in small_rational(), b in small_rational()) {
            prop_assert_eq!(a + b, b + a);
        }

        #[test]
        fn add_associative(a in small_rational(), b in small_rational(), c in small_rational()) {
            prop_assert_eq!((a + b) + c, a + (b + c));
        }

        #[test]
        fn mul_distributes(a in small_rational(), b in small_rational(), c in small_rational()) {
            prop_assert_eq!(a * (b + c), a * b + a * c);
        }

        #[test]
        fn sub_is_add_neg(a in small_rational(), b in small_rational()) {
            prop_assert_eq!(a - b, a + (-b));
        }

        #[test]
        fn div_inverts_mul(a in small_rational(), b in nonzero_rational()) {
            prop_assert_eq!((a * b) / b, a);
        }

        #[test]
        fn equal_values_share_representation(n in -1000i64..1000, d in 1i64..1000, k in 1i64..1000) {
            let a = Rational::new(n, d).unwrap();
            let b = Rational::new(n * k, d * k).unwrap();
            prop_assert_eq!(a.pair(), b.pair());
        }

        #[test]
        fn display_parse_round_trip(r in small_rational()) {
            prop_assert_eq!(r.to_string().parse::<Rational>().unwrap(), r);
        }

        #[test]
        fn overflow_never_wraps(a in any::<i64>(), b in any::<i64>()) {
            let x = Rational::from(a);
            let y = Rational::from(b);
            match x.try_add(y) {
                Ok(sum) => prop_assert_eq!(i128::from(sum.numerator()), i128::from(a) + i128::from(b)),
                Err(e) => {
                    let is_overflow = matches!(e, RationalError::Overflow { .. });
                    prop_assert!(is_overflow);
                }
            }
        }

        #[test]
        fn stern_brocot_recovers_small_fractions(n in -10_000i64..10_000, d in 1i64..1000) {
            let r = Rational::new(n, d).unwrap();
            let found = stern_brocot(r.to_f64(), &ApproxConfig::default()).unwrap();
            prop_assert_eq!(found, r.pair());
        }
    }
}

//! Domain Services
//!
//! Pure purchase logic: total recomputation and gateway signature checks.

use kernel::id::BookId;
use platform::crypto::{constant_time_eq, hmac_sha256_hex};

use crate::domain::entities::Chapter;
use crate::domain::value_objects::Money;
use crate::error::{PurchaseError, PurchaseResult};

/// Server-side total for a set of chapters
pub fn expected_total(chapters: &[Chapter]) -> Money {
    chapters.iter().map(|c| c.price).sum()
}

/// Reject a claimed amount that differs from the expected one
pub fn check_amount(claimed: Money, expected: Money, tolerance: f64) -> PurchaseResult<()> {
    if claimed.approx_eq(expected, tolerance) {
        Ok(())
    } else {
        Err(PurchaseError::AmountMismatch {
            expected,
            actual: claimed,
        })
    }
}

/// Every chapter must belong to `book_id`
pub fn check_same_book(chapters: &[Chapter], book_id: BookId) -> PurchaseResult<()> {
    match chapters.iter().find(|c| c.book_id != book_id) {
        Some(chapter) => Err(PurchaseError::ChapterNotInBook(chapter.id)),
        None => Ok(()),
    }
}

/// Signature the gateway attaches to a successful checkout:
/// hex(HMAC-SHA256(secret, "{order_id}|{payment_id}"))
pub fn payment_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    let payload = format!("{order_id}|{payment_id}");
    hmac_sha256_hex(secret.as_bytes(), payload.as_bytes())
}

/// Constant-time check of a client-supplied gateway signature
///
/// The supplied string is compared as-is against the lowercase hex digest.
pub fn verify_payment_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    let expected = payment_signature(secret, order_id, payment_id);
    constant_time_eq(signature.as_bytes(), expected.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::ChapterId;

    fn chapter(book_id: BookId, price: f64) -> Chapter {
        Chapter {
            id: ChapterId::new(),
            book_id,
            price: Money::new(price).unwrap(),
        }
    }

    #[test]
    fn test_expected_total() {
        let book = BookId::new();
        let chapters = vec![chapter(book, 10.0), chapter(book, 15.5)];
        assert_eq!(expected_total(&chapters).to_string(), "25.50");
        assert_eq!(expected_total(&[]), Money::ZERO);
    }

    #[test]
    fn test_check_amount_tolerance() {
        let expected = Money::new(25.5).unwrap();
        assert!(check_amount(Money::new(25.505).unwrap(), expected, 0.01).is_ok());

        let err = check_amount(Money::new(20.0).unwrap(), expected, 0.01).unwrap_err();
        assert!(err.to_string().contains("expected 25.50"));
        assert!(err.to_string().contains("got 20.00"));
    }

    #[test]
    fn test_check_same_book() {
        let book = BookId::new();
        let stray = chapter(BookId::new(), 5.0);
        let chapters = vec![chapter(book, 5.0), stray.clone()];

        assert!(check_same_book(&chapters[..1], book).is_ok());
        assert!(matches!(
            check_same_book(&chapters, book),
            Err(PurchaseError::ChapterNotInBook(id)) if id == stray.id
        ));
    }

    #[test]
    fn test_payment_signature_matches_manual_hmac() {
        let signature = payment_signature("gateway_secret", "order_abc", "pay_xyz");
        let manual = hmac_sha256_hex(b"gateway_secret", b"order_abc|pay_xyz");
        assert_eq!(signature, manual);
        assert_eq!(signature.len(), 64);
    }

    #[test]
    fn test_verify_payment_signature() {
        let signature = payment_signature("gateway_secret", "order_abc", "pay_xyz");

        assert!(verify_payment_signature(
            "gateway_secret",
            "order_abc",
            "pay_xyz",
            &signature
        ));
        // Swapped ids, wrong secret and truncated signatures all fail
        assert!(!verify_payment_signature(
            "gateway_secret",
            "pay_xyz",
            "order_abc",
            &signature
        ));
        assert!(!verify_payment_signature(
            "other_secret",
            "order_abc",
            "pay_xyz",
            &signature
        ));
        assert!(!verify_payment_signature(
            "gateway_secret",
            "order_abc",
            "pay_xyz",
            &signature[..32]
        ));
    }

    #[test]
    fn test_signature_compared_over_exact_string() {
        let signature = payment_signature("gateway_secret", "order_abc", "pay_xyz");

        for altered in [
            signature.to_ascii_uppercase(),
            format!(" {signature}"),
            format!("{signature}\n"),
        ] {
            assert!(!verify_payment_signature(
                "gateway_secret",
                "order_abc",
                "pay_xyz",
                &altered
            ));
        }
    }
}

// src/noyau/lecture.rs

//! Lecture décimale exacte d’un rationnel (chiffres significatifs, décimales fixes).
//!
//! Tout se fait en entiers “scalés” (r × 10^k) puis en texte, sans passer par f64.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

/* ------------------------ Puissances de 10 ------------------------ */

fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// 10^e en rationnel (e peut être négatif).
fn pow10_rat(e: i32) -> BigRational {
    let p = pow10(e.unsigned_abs() as usize);
    if e >= 0 {
        BigRational::from_integer(p)
    } else {
        BigRational::new(BigInt::one(), p)
    }
}

/* ------------------------ Décimal (scaled -> texte) ------------------------ */

/// Convertit un entier “scalé” (×10^digits) en texte décimal.
pub fn scaled_to_decimal(mut scaled: BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;

    let signe = if neg { "-" } else { "" };
    if digits == 0 {
        return format!("{signe}{int_part}");
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }

    format!("{signe}{int_part}.{frac}")
}

/// Arrondi au plus proche, moitié vers le haut (r >= 0).
fn arrondi_demi_haut(r: &BigRational) -> BigInt {
    let deux = BigInt::from(2);
    (r.numer() * &deux + r.denom()) / (r.denom() * &deux)
}

/* ------------------------ Chiffres significatifs ------------------------ */

/// Exposant décimal e tel que 10^e <= r < 10^(e+1) (r > 0).
pub fn exposant_decimal(r: &BigRational) -> i32 {
    // estimation par le nombre de chiffres, puis correction (au plus 1 pas)
    let ln = r.numer().to_str_radix(10).len() as i32;
    let ld = r.denom().to_str_radix(10).len() as i32;
    let mut e = ln - ld;

    while *r < pow10_rat(e) {
        e -= 1;
    }
    while *r >= pow10_rat(e + 1) {
        e += 1;
    }
    e
}

/// |r| arrondi à `precision` chiffres significatifs.
/// Renvoie (chiffres, e) avec |r| ≈ c0.c1c2… × 10^e.
pub fn chiffres_significatifs(r: &BigRational, precision: usize) -> (String, i32) {
    let p = precision.max(1);
    let r = r.abs();

    if r.is_zero() {
        return ("0".repeat(p), 0);
    }

    let mut e = exposant_decimal(&r);
    let mut m = arrondi_demi_haut(&(&r * pow10_rat(p as i32 - 1 - e)));

    // 9.99… arrondi vers 10.0… : un chiffre de trop
    if m >= pow10(p) {
        m /= BigInt::from(10);
        e += 1;
    }

    (m.to_str_radix(10), e)
}

/// |r| arrondi à `decimales` chiffres après la virgule (texte, sans signe).
pub fn decimales_fixes(r: &BigRational, decimales: usize) -> String {
    let scaled = arrondi_demi_haut(&(r.abs() * pow10_rat(decimales as i32)));
    scaled_to_decimal(scaled, decimales)
}

// src/noyau/arith.rs
//
// Arithmétique des nombres hybrides.
// Toutes les opérations prennent leurs opérandes par valeur et rendent une forme réduite.
// Entiers de taille fixe : tout débordement est signalé (ErreurCalcul::Debordement),
// sauf dans l’alignement d’exposants où l’opérande part entièrement dans la correction.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use tracing::warn;

use super::approx::Approximateur;
use super::erreur::ErreurCalcul;
use super::nombre::{Nombre, UN, ZERO};

fn mul(a: i64, b: i64, op: &'static str) -> Result<i64, ErreurCalcul> {
    a.checked_mul(b).ok_or(ErreurCalcul::Debordement(op))
}

fn add(a: i64, b: i64, op: &'static str) -> Result<i64, ErreurCalcul> {
    a.checked_add(b).ok_or(ErreurCalcul::Debordement(op))
}

/// Même valeur, exposant relevé de `n` :
/// entier / 10^n, le reste de la division passe dans la fraction.
pub fn echelle10(z: Nombre, n: u32) -> Nombre {
    if n == 0 {
        return z;
    }
    let exposant = i32::try_from(i64::from(z.exposant) + i64::from(n)).unwrap_or(i32::MAX);

    let exact = || -> Option<Nombre> {
        let p = 10i64.checked_pow(n)?;
        let num = (z.entier % p).checked_mul(z.den)?.checked_add(z.num)?;
        Nombre {
            entier: z.entier / p,
            num,
            den: z.den.checked_mul(p)?,
            exposant,
            correction: z.correction / p as f64,
        }
        .reduire()
        .ok()
    };

    exact().unwrap_or_else(|| {
        warn!(n, exposant, "alignement hors entiers 64 bits: opérande porté par la correction");
        Nombre {
            exposant,
            correction: z.valeur() / 10f64.powi(exposant),
            ..ZERO
        }
    })
}

/// Amène deux opérandes au plus grand des deux exposants.
fn aligner(x: Nombre, y: Nombre) -> (Nombre, Nombre) {
    match x.exposant.cmp(&y.exposant) {
        Ordering::Greater => (x, echelle10(y, x.exposant.abs_diff(y.exposant))),
        Ordering::Less => (echelle10(x, y.exposant.abs_diff(x.exposant)), y),
        Ordering::Equal => (x, y),
    }
}

pub fn somme(x: Nombre, y: Nombre) -> Result<Nombre, ErreurCalcul> {
    const OP: &str = "somme";
    let (x, y) = aligner(x, y);

    let num = add(mul(x.num, y.den, OP)?, mul(y.num, x.den, OP)?, OP)?;
    Nombre {
        entier: add(x.entier, y.entier, OP)?,
        num,
        den: mul(x.den, y.den, OP)?,
        exposant: x.exposant.max(y.exposant),
        correction: x.correction + y.correction,
    }
    .reduire()
}

//            x.entier            x.num/x.den             x.corr
//          ---------------   --------------------   ---------------
//  y.entier  x.ent*y.ent       y.ent*x.num/x.den      y.ent*x.corr
//  y.n/y.d   x.ent*y.n/y.d     x.n*y.n/(x.d*y.d)      x.corr*y.n/y.d
//  y.corr    x.ent*y.corr      y.corr*x.n/x.d         x.corr*y.corr
//
// Les six premiers termes sont exacts ; la correction est évaluée en flottant.
pub fn produit(x: Nombre, y: Nombre) -> Result<Nombre, ErreurCalcul> {
    const OP: &str = "produit";

    let num = add(
        mul(x.num, y.num, OP)?,
        add(
            mul(mul(x.entier, y.num, OP)?, x.den, OP)?,
            mul(mul(y.entier, x.num, OP)?, y.den, OP)?,
            OP,
        )?,
        OP,
    )?;

    let fx = x.num as f64 / x.den as f64;
    let fy = y.num as f64 / y.den as f64;
    let correction = x.entier as f64 * y.correction
        + y.entier as f64 * x.correction
        + y.correction * fx
        + x.correction * fy
        + x.correction * y.correction;

    Nombre {
        entier: mul(x.entier, y.entier, OP)?,
        num,
        den: mul(x.den, y.den, OP)?,
        exposant: x
            .exposant
            .checked_add(y.exposant)
            .ok_or(ErreurCalcul::Debordement(OP))?,
        correction,
    }
    .reduire()
}

/// 1/z.
/// Exact si pas de correction ; sinon ré-approximation de 1/valeur(z).
pub fn inverse(z: Nombre, approx: &Approximateur) -> Result<Nombre, ErreurCalcul> {
    const OP: &str = "inverse";

    if z == UN {
        return Ok(UN);
    }
    if z.est_zero_exact() || z.valeur() == 0.0 {
        return Err(ErreurCalcul::DivisionParZero);
    }
    if z.correction != 0.0 {
        return approx.approximer(1.0 / z.valeur());
    }

    // (a + n/d) = (a*d + n)/d  =>  inverse = d/(a*d + n)
    let den = add(mul(z.entier, z.den, OP)?, z.num, OP)?;
    Nombre {
        entier: 0,
        num: z.den,
        den,
        exposant: z.exposant.checked_neg().ok_or(ErreurCalcul::Debordement(OP))?,
        correction: 0.0,
    }
    .reduire()
}

/// |a - b|
pub fn ecart(a: Nombre, b: Nombre) -> Result<Nombre, ErreurCalcul> {
    let d = somme(a, b.oppose()?)?;
    if d.valeur() < 0.0 {
        d.oppose()
    } else {
        Ok(d)
    }
}

/// Au-delà de cet écart d’exposants, deux bases non nulles de même signe
/// ne peuvent plus se croiser : 2^-63 * 10^40 > 2^64.
const ECART_EXPOSANT_EXACT: u32 = 40;

/// Comparaison : exacte (rationnels) si aucune correction, sinon en flottants.
pub fn comparer(a: &Nombre, b: &Nombre) -> Option<Ordering> {
    match (a.base_exacte(), b.base_exacte()) {
        (Some(ra), Some(rb)) => Some(comparer_exact(ra, a.exposant, rb, b.exposant)),
        _ => a.valeur().partial_cmp(&b.valeur()),
    }
}

/// ra*10^ea <=> rb*10^eb sans jamais construire 10^|e| en entier long :
/// signes d’abord, puis l’exposant si l’écart est grand,
/// sinon alignement sur le plus petit exposant.
fn comparer_exact(ra: BigRational, ea: i32, rb: BigRational, eb: i32) -> Ordering {
    let (sa, sb) = (ra.signum(), rb.signum());
    if sa != sb || sa.is_zero() {
        return sa.cmp(&sb);
    }

    let ecart = ea.abs_diff(eb);
    if ecart > ECART_EXPOSANT_EXACT {
        let ordre = ea.cmp(&eb);
        return if sa.is_positive() { ordre } else { ordre.reverse() };
    }

    let p10 = BigRational::from_integer(BigInt::from(10).pow(ecart));
    match ea.cmp(&eb) {
        Ordering::Greater => (ra * p10).cmp(&rb),
        Ordering::Less => ra.cmp(&(rb * p10)),
        Ordering::Equal => ra.cmp(&rb),
    }
}

/// base^n par carrés successifs (O(log n) produits).
/// Base négative : signe suivi à part ; n négatif : inverse final.
pub fn puissance_entiere(base: f64, n: i64) -> f64 {
    let negatif = base < 0.0 && n % 2 != 0;

    let mut b = base.abs();
    let mut e = n.unsigned_abs();
    let mut acc = 1.0;
    while e > 0 {
        if e & 1 == 1 {
            acc *= b;
        }
        e >>= 1;
        if e > 0 {
            b *= b;
        }
    }

    let acc = if n < 0 { 1.0 / acc } else { acc };
    if negatif {
        -acc
    } else {
        acc
    }
}

// src/noyau/nombre.rs
//
// Nombre hybride : (entier + num/den + correction) * 10^exposant
// - entier     : partie entière
// - num/den    : fraction propre, den > 0, signe porté par num
// - correction : petit reste flottant (ce que la fraction bornée ne sait pas dire)
//
// Forme canonique (reduire) :
// - den > 0, pgcd(|num|, den) = 1, |num| < den
// - entier et fraction de même signe
// - la fraction 1/1 est interdite (absorbée dans l’entier)

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Zero};

use super::erreur::ErreurCalcul;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nombre {
    pub entier: i64,
    pub num: i64,
    pub den: i64,
    pub exposant: i32,
    pub correction: f64,
}

pub const ZERO: Nombre = Nombre {
    entier: 0,
    num: 0,
    den: 1,
    exposant: 0,
    correction: 0.0,
};

pub const UN: Nombre = Nombre {
    entier: 1,
    num: 0,
    den: 1,
    exposant: 0,
    correction: 0.0,
};

impl Default for Nombre {
    fn default() -> Self {
        ZERO
    }
}

impl Nombre {
    /// Entier exact (n;0;1;0).
    pub fn entier(n: i64) -> Self {
        Nombre { entier: n, ..ZERO }
    }

    /// Booléen codé en rationnel (UN / ZERO).
    pub fn booleen(b: bool) -> Self {
        if b {
            UN
        } else {
            ZERO
        }
    }

    /// Valeur flottante (as_double).
    pub fn valeur(&self) -> f64 {
        (self.entier as f64 + self.num as f64 / self.den as f64 + self.correction)
            * 10f64.powi(self.exposant)
    }

    /// Partie rationnelle exacte A + N/D (sans le facteur 10^E),
    /// seulement si aucune correction flottante.
    pub fn base_exacte(&self) -> Option<BigRational> {
        if self.correction != 0.0 {
            return None;
        }
        Some(
            BigRational::from_integer(BigInt::from(self.entier))
                + BigRational::new(BigInt::from(self.num), BigInt::from(self.den)),
        )
    }

    pub fn est_zero_exact(&self) -> bool {
        self.entier == 0 && self.num == 0 && self.correction == 0.0
    }

    /// -z, exposant inchangé. i64::MIN n’a pas d’opposé : Debordement.
    pub fn oppose(self) -> Result<Nombre, ErreurCalcul> {
        const OP: &str = "opposé";
        Ok(Nombre {
            entier: self.entier.checked_neg().ok_or(ErreurCalcul::Debordement(OP))?,
            num: self.num.checked_neg().ok_or(ErreurCalcul::Debordement(OP))?,
            correction: -self.correction,
            ..self
        })
    }

    /// Canonicalisation (voir en-tête).
    /// den == 0 : DivisionParZero ; sortie des entiers 64 bits : Debordement.
    pub fn reduire(self) -> Result<Nombre, ErreurCalcul> {
        const OP: &str = "réduction";
        let deborde = || ErreurCalcul::Debordement(OP);
        let mut z = self;

        if z.den == 0 {
            return Err(ErreurCalcul::DivisionParZero);
        }
        // entier pur : rien à replier, même pour i64::MIN
        if z.num == 0 {
            return Ok(Nombre { den: 1, ..z });
        }
        if z.den < 0 {
            z.num = z.num.checked_neg().ok_or_else(deborde)?;
            z.den = z.den.checked_neg().ok_or_else(deborde)?;
        }

        let negatif = z.entier < 0;
        if negatif {
            z = z.oppose()?;
        }

        // multiples entiers de den : num -> entier
        let (q, r) = z.num.div_rem(&z.den);
        z.entier = z.entier.checked_add(q).ok_or_else(deborde)?;
        z.num = r;

        // 2 - 1/3 => 1 + 2/3
        if z.entier > 0 && z.num < 0 {
            z.entier -= 1;
            z.num += z.den;
        }

        let g = pgcd(z.num, z.den);
        z.num /= g;
        z.den /= g;

        if z.num == 1 && z.den == 1 {
            z.entier = z.entier.checked_add(1).ok_or_else(deborde)?;
            z.num = 0;
        }

        let z = if negatif { z.oppose()? } else { z };
        debug_assert!(z.est_reduit(), "{z:?}");
        Ok(z)
    }

    /// Vrai si la forme canonique est respectée.
    pub fn est_reduit(&self) -> bool {
        self.den > 0
            && pgcd(self.num, self.den) == 1
            && self.num.unsigned_abs() < self.den.unsigned_abs()
            && !(self.num == 1 && self.den == 1)
            && (self.entier == 0 || self.num == 0 || (self.entier > 0) == (self.num > 0))
    }
}

/// pgcd sur les valeurs absolues ; pgcd(0, d) = d, pgcd(0, 0) = 1.
/// Calculé en u64 : |i64::MIN| y tient.
fn pgcd(a: i64, b: i64) -> i64 {
    let g = a.unsigned_abs().gcd(&b.unsigned_abs());
    if g.is_zero() {
        One::one()
    } else {
        // g <= |b| et b > 0 chez tous les appelants
        i64::try_from(g).unwrap_or(i64::MAX)
    }
}

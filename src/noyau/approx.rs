// src/noyau/approx.rs
//
// Flottant -> Nombre hybride
// --------------------------
// 1) exposant "ingénieur" : e = 3*floor(log10(|x|)/3), y = |x| / 10^e
// 2) y = a0 + frac, 0 <= frac < 1
// 3) frac ≈ p/q par recherche de Stern–Brocot (médiantes)
//    - variante bornée   : q <= max_denominateur, on garde l’extrémité la plus proche
//    - variante tolérance : on s’arrête dès que la médiante est assez proche
// 4) correction = frac - p/q (le reste que la fraction ne dit pas)

use tracing::trace;

use super::config::{
    Configuration, Tolerance, MAX_DENOMINATEUR_DEFAUT, MAX_DENOMINATEUR_PLAFOND,
};
use super::erreur::ErreurCalcul;
use super::nombre::{Nombre, ZERO};

/// Évite log10(0) pour les tout petits |x|.
const EPSILON_LOG: f64 = 1e-15;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Approximateur {
    max_denominateur: i64,
    tolerance: Option<Tolerance>,
}

impl Default for Approximateur {
    fn default() -> Self {
        Self::new(MAX_DENOMINATEUR_DEFAUT)
    }
}

impl Approximateur {
    /// La borne est ramenée dans [1, MAX_DENOMINATEUR_PLAFOND].
    pub fn new(max_denominateur: i64) -> Self {
        Self {
            max_denominateur: max_denominateur.clamp(1, MAX_DENOMINATEUR_PLAFOND),
            tolerance: None,
        }
    }

    pub fn depuis_config(config: &Configuration) -> Self {
        Self {
            tolerance: config.tolerance,
            ..Self::new(config.max_denominateur)
        }
    }

    /// Variante choisie par la configuration.
    pub fn approximer(&self, x: f64) -> Result<Nombre, ErreurCalcul> {
        match self.tolerance {
            Some(t) => self.approximer_tol(x, t),
            None => self.approximer_borne(x),
        }
    }

    /// Budget fixe : dénominateur <= max_denominateur.
    pub fn approximer_borne(&self, x: f64) -> Result<Nombre, ErreurCalcul> {
        verifier_fini(x)?;
        if x == 0.0 {
            return Ok(ZERO);
        }

        let (negatif, exposant, y) = decomposer(x);
        let a0 = y.floor();
        let frac = y - a0;

        let (p, q) = stern_brocot_borne(frac, self.max_denominateur);
        let z = assembler(a0, p, q, exposant, frac)?;

        trace!(x, p, q, exposant, correction = z.correction, "approximation bornée");
        if negatif {
            z.oppose()
        } else {
            Ok(z)
        }
    }

    /// Budget tolérance : |p/q - frac| <= absolue + relative*frac.
    pub fn approximer_tol(&self, x: f64, tol: Tolerance) -> Result<Nombre, ErreurCalcul> {
        verifier_fini(x)?;
        if x == 0.0 {
            return Ok(ZERO);
        }

        let (negatif, exposant, y) = decomposer(x);
        let a0 = y.floor();
        let frac = y - a0;

        // déjà assez proche de zéro : pas de fraction
        let (p, q) = if frac < tol.seuil(frac) {
            (0, 1)
        } else {
            stern_brocot_tol(frac, tol)
        };
        let z = assembler(a0, p, q, exposant, frac)?;

        trace!(x, p, q, exposant, correction = z.correction, "approximation par tolérance");
        if negatif {
            z.oppose()
        } else {
            Ok(z)
        }
    }
}

fn verifier_fini(x: f64) -> Result<(), ErreurCalcul> {
    if x.is_finite() {
        Ok(())
    } else {
        Err(ErreurCalcul::NonFini {
            operation: "approximation".into(),
            valeur: x,
        })
    }
}

/// (signe négatif ?, exposant multiple de 3, mantisse |x|/10^e)
fn decomposer(x: f64) -> (bool, i32, f64) {
    let ax = x.abs();
    let exposant = 3 * ((ax + EPSILON_LOG).log10() / 3.0).floor() as i32;
    (x < 0.0, exposant, ax / 10f64.powi(exposant))
}

fn assembler(a0: f64, p: i64, q: i64, exposant: i32, frac: f64) -> Result<Nombre, ErreurCalcul> {
    Nombre {
        entier: a0 as i64,
        num: p,
        den: q,
        exposant,
        correction: frac - p as f64 / q as f64,
    }
    .reduire()
}

fn ratio(p: i64, q: i64) -> f64 {
    p as f64 / q as f64
}

/// Recherche bornée sur [0/1, 1/1] ; renvoie l’extrémité la plus proche
/// (à égalité : la borne basse).
/// Une médiante exacte reste borne basse jusqu’au bout : on la rend tout de suite.
fn stern_brocot_borne(frac: f64, max_den: i64) -> (i64, i64) {
    if frac == 0.0 {
        return (0, 1);
    }
    let (mut p0, mut q0) = (0i64, 1i64);
    let (mut p1, mut q1) = (1i64, 1i64);

    while q0 + q1 <= max_den {
        let (pm, qm) = (p0 + p1, q0 + q1);
        let m = ratio(pm, qm);
        if m == frac {
            return (pm, qm);
        }
        if m <= frac && frac <= ratio(p1, q1) {
            p0 = pm;
            q0 = qm;
        } else {
            p1 = pm;
            q1 = qm;
        }
    }

    if (frac - ratio(p1, q1)).abs() < (frac - ratio(p0, q0)).abs() {
        (p1, q1)
    } else {
        (p0, q0)
    }
}

/// Recherche par tolérance : première médiante assez proche.
/// Au-delà de MAX_DENOMINATEUR_PLAFOND, on garde l’extrémité la plus proche.
fn stern_brocot_tol(frac: f64, tol: Tolerance) -> (i64, i64) {
    let seuil = tol.seuil(frac);
    let (mut p0, mut q0) = (0i64, 1i64);
    let (mut p1, mut q1) = (1i64, 1i64);

    loop {
        let (pm, qm) = (p0 + p1, q0 + q1);
        if qm > MAX_DENOMINATEUR_PLAFOND {
            break;
        }
        let m = ratio(pm, qm);
        if (m - frac).abs() <= seuil {
            return (pm, qm);
        }
        if m < frac {
            p0 = pm;
            q0 = qm;
        } else {
            p1 = pm;
            q1 = qm;
        }
    }

    if (frac - ratio(p1, q1)).abs() < (frac - ratio(p0, q0)).abs() {
        (p1, q1)
    } else {
        (p0, q0)
    }
}

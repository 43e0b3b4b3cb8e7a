//! Tests scientifiques (campagne) : invariants algébriques sur entrées générées.
//!
//! Lois : générateurs quickcheck sur des entiers courts (i8/i16), loin des
//! débordements 64 bits.
//! - réduction : idempotente, canonique, valeur conservée
//! - somme/produit : exacts contre num-rational
//! - inverse : involutif
//! - approximation : valeur conservée, dénominateur borné
//! - pile vide : les deux politiques
//!
//! Limites : i64::MIN/MAX dans chaque champ, exposants près de i32::MAX.
//! Attendu : une valeur exacte ou ErreurCalcul::Debordement, jamais de panique.

use std::time::{Duration, Instant};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Signed;
use quickcheck::{quickcheck, TestResult};

use super::approx::Approximateur;
use super::arith::{comparer, ecart, inverse, produit, somme};
use super::config::Configuration;
use super::erreur::ErreurCalcul;
use super::evaluer;
use super::nombre::{Nombre, UN, ZERO};
use super::pile::PolitiqueSousPile;

/// Rationnel réduit sans correction ; None si dénominateur nul.
fn rationnel(entier: i8, num: i8, den: i8, exposant: i8) -> Option<Nombre> {
    if den == 0 {
        return None;
    }
    Nombre {
        entier: entier as i64,
        num: num as i64,
        den: den as i64,
        exposant: (exposant % 4) as i32,
        correction: 0.0,
    }
    .reduire()
    .ok()
}

/// Valeur exacte, facteur 10^E compris (petits exposants seulement).
fn exact(z: &Nombre) -> BigRational {
    let base = z
        .base_exacte()
        .unwrap_or_else(|| panic!("correction inattendue: {z:?}"));
    let p10 = BigRational::from_integer(BigInt::from(10).pow(z.exposant.unsigned_abs()));
    if z.exposant >= 0 {
        base * p10
    } else {
        base / p10
    }
}

fn is_debordement(e: &ErreurCalcul) -> bool {
    matches!(e, ErreurCalcul::Debordement(_))
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

quickcheck! {
    fn sci_reduire_canonique(entier: i16, num: i16, den: i16) -> TestResult {
        if den == 0 {
            return TestResult::discard();
        }
        let brut = Nombre {
            entier: entier as i64,
            num: num as i64,
            den: den as i64,
            ..ZERO
        };
        let Ok(z) = brut.reduire() else {
            return TestResult::failed();
        };
        TestResult::from_bool(
            z.est_reduit() && z.reduire() == Ok(z) && exact(&z) == exact(&brut),
        )
    }

    fn sci_reduire_pleine_echelle(entier: i64, num: i64, den: i64) -> TestResult {
        if den == 0 {
            return TestResult::discard();
        }
        let brut = Nombre {
            entier,
            num,
            den,
            ..ZERO
        };
        match brut.reduire() {
            Ok(z) => TestResult::from_bool(
                z.est_reduit() && z.reduire() == Ok(z) && exact(&z) == exact(&brut),
            ),
            Err(e) => TestResult::from_bool(is_debordement(&e)),
        }
    }

    fn sci_somme_exacte_et_commutative(a: (i8, i8, i8, i8), b: (i8, i8, i8, i8)) -> TestResult {
        let (Some(x), Some(y)) = (rationnel(a.0, a.1, a.2, a.3), rationnel(b.0, b.1, b.2, b.3)) else {
            return TestResult::discard();
        };
        let (Ok(xy), Ok(yx)) = (somme(x, y), somme(y, x)) else {
            return TestResult::failed();
        };
        TestResult::from_bool(xy == yx && xy.est_reduit() && exact(&xy) == exact(&x) + exact(&y))
    }

    fn sci_zero_neutre(a: (i8, i8, i8, i8)) -> TestResult {
        let Some(x) = rationnel(a.0, a.1, a.2, a.3) else {
            return TestResult::discard();
        };
        match somme(x, ZERO) {
            Ok(s) => TestResult::from_bool(exact(&s) == exact(&x)),
            Err(_) => TestResult::failed(),
        }
    }

    fn sci_produit_exact(a: (i8, i8, i8, i8), b: (i8, i8, i8, i8)) -> TestResult {
        let (Some(x), Some(y)) = (rationnel(a.0, a.1, a.2, a.3), rationnel(b.0, b.1, b.2, b.3)) else {
            return TestResult::discard();
        };
        match (produit(x, y), produit(x, UN)) {
            (Ok(p), Ok(x1)) => TestResult::from_bool(
                p.est_reduit() && exact(&p) == exact(&x) * exact(&y) && x1 == x,
            ),
            _ => TestResult::failed(),
        }
    }

    fn sci_inverse_involutif(a: (i8, i8, i8, i8)) -> TestResult {
        let Some(x) = rationnel(a.0, a.1, a.2, a.3) else {
            return TestResult::discard();
        };
        let approx = Approximateur::default();
        if x.est_zero_exact() {
            return TestResult::from_bool(inverse(x, &approx) == Err(ErreurCalcul::DivisionParZero));
        }
        let ii = inverse(x, &approx).and_then(|i| inverse(i, &approx));
        match ii {
            Ok(ii) => TestResult::from_bool(exact(&ii) == exact(&x)),
            Err(_) => TestResult::failed(),
        }
    }

    fn sci_ecart_positif(a: (i8, i8, i8, i8), b: (i8, i8, i8, i8)) -> TestResult {
        let (Some(x), Some(y)) = (rationnel(a.0, a.1, a.2, a.3), rationnel(b.0, b.1, b.2, b.3)) else {
            return TestResult::discard();
        };
        match (ecart(x, y), ecart(y, x)) {
            (Ok(d), Ok(d2)) => TestResult::from_bool(
                d.valeur() >= 0.0 && exact(&d) == (exact(&x) - exact(&y)).abs() && d == d2,
            ),
            _ => TestResult::failed(),
        }
    }

    fn sci_approximation_conserve_la_valeur(p: i32, q: i16, k: i8) -> TestResult {
        if q == 0 {
            return TestResult::discard();
        }
        let x = p as f64 / q as f64 * 10f64.powi((k % 10) as i32);
        let z = match Approximateur::default().approximer(x) {
            Ok(z) => z,
            Err(_) => return TestResult::failed(),
        };
        let ok = z.est_reduit()
            && z.den <= 1000
            && z.exposant % 3 == 0
            && (z.valeur() - x).abs() <= 1e-12 * x.abs();
        TestResult::from_bool(ok)
    }

    fn sci_denominateur_borne(p: i32, q: i16, max: u16) -> TestResult {
        if q == 0 {
            return TestResult::discard();
        }
        let max = (max % 2000) as i64 + 1;
        let x = p as f64 / q as f64;
        match Approximateur::new(max).approximer_borne(x) {
            Ok(z) => TestResult::from_bool(z.den >= 1 && z.den <= max),
            Err(_) => TestResult::failed(),
        }
    }

    fn sci_entiers_exacts(a: i32, b: i32) -> bool {
        let pile = evaluer(&format!("{a} {b} +"), &Configuration::default());
        pile == Ok(vec![Nombre::entier(a as i64 + b as i64)])
    }

    fn sci_politique_sous_pile(n: u8) -> bool {
        let n = (n % 20) as usize + 1;
        let prog = vec!["+"; n].join(" ");

        let zero = Configuration {
            politique: PolitiqueSousPile::Zero,
            ..Configuration::default()
        };
        let implicite = evaluer(&prog, &zero) == Ok(vec![ZERO]);

        let explicite = match evaluer(&prog, &Configuration::default()) {
            Err(e) => e.position == 1 && e.source == ErreurCalcul::PileVide,
            Ok(_) => false,
        };
        implicite && explicite
    }
}

/* ------------------------ Stress contrôlé ------------------------ */

#[test]
fn sci_longue_somme_de_tiers() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // 300 × 1/3 = 100, exactement
    let mut prog = String::from("1 3 /");
    for _ in 1..300 {
        prog.push_str(" 1 3 / +");
    }
    budget(t0, max);

    let pile = evaluer(&prog, &Configuration::default()).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);
    assert_eq!(pile, vec![Nombre::entier(100)]);
}

#[test]
fn sci_pile_profonde() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // 1000 empilements puis 999 additions : 1 + 2 + ... + 1000
    let mut prog: Vec<String> = (1..=1000).map(|k| k.to_string()).collect();
    prog.extend(std::iter::repeat("+".to_string()).take(999));

    let pile = evaluer(&prog.join(" "), &Configuration::default())
        .unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);
    assert_eq!(pile, vec![Nombre::entier(500_500)]);
}

#[test]
fn sci_correction_compense_la_fraction() {
    // valeur() reste fidèle au flottant d’origine malgré le dénominateur borné
    for x in [std::f64::consts::PI, std::f64::consts::E, 2f64.sqrt(), -1.0 / 7.0, 6.02e23, 1.6e-19] {
        let z = Approximateur::new(10).approximer(x).unwrap();
        assert!(z.den <= 10, "x={x} z={z:?}");
        assert!((z.valeur() - x).abs() <= 1e-12 * x.abs(), "x={x} z={z:?}");
    }
}

/* ------------------------ Limites 64 bits ------------------------ */

const BORNES_I64: [i64; 9] = [i64::MIN, i64::MIN + 1, -2, -1, 0, 1, 2, i64::MAX - 1, i64::MAX];

#[test]
fn sci_grille_des_bornes_64_bits() {
    let t0 = Instant::now();
    let max = Duration::from_millis(2000);
    let approx = Approximateur::default();

    // somme/produit/inverse peuvent aussi échouer proprement sur zéro ou un flottant non fini
    let attendue = |e: &ErreurCalcul| {
        matches!(
            e,
            ErreurCalcul::Debordement(_) | ErreurCalcul::DivisionParZero | ErreurCalcul::NonFini { .. }
        )
    };

    for entier in BORNES_I64 {
        for num in BORNES_I64 {
            for den in BORNES_I64 {
                budget(t0, max);
                if den == 0 {
                    continue;
                }
                let brut = Nombre {
                    entier,
                    num,
                    den,
                    ..ZERO
                };
                let z = match brut.reduire() {
                    Ok(z) => z,
                    Err(e) => {
                        assert!(is_debordement(&e), "brut={brut:?} err={e}");
                        continue;
                    }
                };
                assert!(z.est_reduit(), "brut={brut:?} z={z:?}");
                assert_eq!(exact(&z), exact(&brut), "brut={brut:?}");

                let resultats = [
                    z.oppose(),
                    somme(z, z),
                    somme(z, UN),
                    produit(z, z),
                    inverse(z, &approx),
                    ecart(z, UN),
                ];
                for r in resultats {
                    match r {
                        Ok(w) => assert!(w.est_reduit(), "z={z:?} w={w:?}"),
                        Err(e) => assert!(attendue(&e), "z={z:?} err={e}"),
                    }
                }
                assert!(comparer(&z, &UN).is_some());
            }
        }
    }
}

#[test]
fn sci_litteraux_aux_bornes_64_bits() {
    let config = Configuration::default();
    let echec = |prog: &str| match evaluer(prog, &config) {
        Ok(pile) => panic!("prog={prog:?} pile={pile:?}"),
        Err(e) => e,
    };

    let e = echec("0;5;-9223372036854775808");
    assert_eq!((e.position, e.source), (1, ErreurCalcul::Debordement("réduction")));

    let e = echec("9223372036854775807;3;2");
    assert_eq!((e.position, e.source), (1, ErreurCalcul::Debordement("réduction")));

    let e = echec("-9223372036854775808 -");
    assert_eq!((e.position, e.source), (2, ErreurCalcul::Debordement("opposé")));

    let e = echec("0;-9223372036854775808;1 -");
    assert_eq!((e.position, e.source), (2, ErreurCalcul::Debordement("opposé")));

    let e = echec("-9223372036854775808 -1 +");
    assert_eq!(e.position, 3);
    assert!(is_debordement(&e.source), "{e}");

    // ce qui tient dans 64 bits passe, exactement
    assert_eq!(
        evaluer("-9223372036854775808 0 +", &config),
        Ok(vec![Nombre::entier(i64::MIN)])
    );
    assert_eq!(
        evaluer("9223372036854775807 -", &config),
        Ok(vec![Nombre::entier(-i64::MAX)])
    );
    assert_eq!(
        evaluer("9223372036854775806;3;3", &config),
        Ok(vec![Nombre::entier(i64::MAX)])
    );
}

#[test]
fn sci_exposants_aux_bornes_32_bits() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);
    let config = Configuration::default();
    let pile = |prog: &str| {
        evaluer(prog, &config).unwrap_or_else(|e| panic!("prog={prog:?} err={e}"))
    };

    // comparaisons : décidées sans construire 10^E en entier long
    assert_eq!(pile("1;0;1;20000000 1 <"), vec![ZERO]);
    assert_eq!(pile("1;0;1;20000000 1 >"), vec![UN]);
    assert_eq!(pile("-1;0;1;2147483647 1;0;1;-2147483648 <"), vec![UN]);
    assert_eq!(pile("3;0;1;2000000000 3;0;1;2000000000 =="), vec![UN]);
    assert_eq!(pile("1;0;1;2147483647 10;0;1;2147483646 =="), vec![UN]);
    budget(t0, max);

    // somme : l’opérande minuscule part dans la correction
    let z = pile("1;0;1;2147483647 1 +")[0];
    assert_eq!((z.entier, z.exposant), (1, i32::MAX));
    assert!(z.est_reduit());
    budget(t0, max);

    // produit : l’exposant sort de i32
    let e = evaluer("1;0;1;2147483647 1;0;1;1 *", &config).unwrap_err();
    assert_eq!(e.source, ErreurCalcul::Debordement("produit"));
    let e = evaluer("1;0;1;-2147483647 1;0;1;-2 *", &config).unwrap_err();
    assert_eq!(e.source, ErreurCalcul::Debordement("produit"));
    budget(t0, max);
}

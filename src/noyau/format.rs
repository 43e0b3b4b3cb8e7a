// src/noyau/format.rs
//
// Affichage d’un nombre hybride, trois formes :
// - humain   : (A +N/D +corr)*pow(10,E)   # valeur
// - brut     : A;N;D;E                    # valeur   (relisible tel quel si A >= 0)
// - flottant : valeur seule, précision tirée de la taille de la correction
//
// `format_g` reproduit le %g du C (chiffres significatifs, zéros de queue retirés).

use super::config::FormatExposant;
use super::nombre::Nombre;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Sortie {
    #[default]
    Humain,
    Brut,
    Flottant,
}

impl Sortie {
    pub fn rendre(&self, z: &Nombre, exposant: FormatExposant) -> String {
        match self {
            Sortie::Humain => format_humain(z, exposant),
            Sortie::Brut => format_brut(z),
            Sortie::Flottant => format_flottant(z),
        }
    }
}

/* ------------------------ %g ------------------------ */

fn sans_zeros_de_queue(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// `%.{precision}g`
pub fn format_g(x: f64, precision: usize) -> String {
    if !x.is_finite() {
        return format!("{x}");
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let p = precision.max(1);

    // l’exposant décimal est celui APRÈS arrondi à p chiffres
    let sci = format!("{:.*e}", p - 1, x);
    let (mantisse, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= p as i32 {
        let signe = if exp < 0 { '-' } else { '+' };
        format!("{}e{signe}{:02}", sans_zeros_de_queue(mantisse), exp.abs())
    } else {
        let decimales = (p as i32 - 1 - exp).max(0) as usize;
        sans_zeros_de_queue(&format!("{:.*}", decimales, x)).to_string()
    }
}

/// `%+.{precision}g`
fn format_g_signe(x: f64, precision: usize) -> String {
    let s = format_g(x, precision);
    if s.starts_with('-') {
        s
    } else {
        format!("+{s}")
    }
}

/* ------------------------ Formes ------------------------ */

pub fn format_brut(z: &Nombre) -> String {
    format!(
        "{};{};{};{}\t# {}",
        z.entier,
        z.num,
        z.den,
        z.exposant,
        format_g(z.valeur(), 6)
    )
}

/// Correction affichée seulement si elle n’est pas négligeable devant l’entier.
fn correction_visible(z: &Nombre) -> bool {
    z.correction.abs() > 1e-15 * (z.entier as f64).abs() + 1e-15
}

pub fn format_humain(z: &Nombre, exposant: FormatExposant) -> String {
    let mut s = format!("({}", z.entier);
    if z.num != 0 {
        s.push_str(&format!(" {:+}/{}", z.num, z.den));
    }
    if correction_visible(z) {
        s.push(' ');
        s.push_str(&format_g_signe(z.correction, 4));
    }
    s.push(')');
    if z.exposant != 0 {
        s.push_str(&exposant.suffixe(z.exposant));
    }
    s.push_str("\t# ");
    s.push_str(&format_g(z.valeur(), 6));
    s
}

/// Plus la correction est petite, plus on peut afficher de chiffres.
pub fn format_flottant(z: &Nombre) -> String {
    let precision = if z.correction == 0.0 {
        15
    } else {
        let l = z.correction.abs().log10().round() as i32 - 6;
        if l < 0 {
            -l
        } else {
            2
        }
    };
    format_g(z.valeur(), precision.clamp(1, 17) as usize)
}

//! Configuration du noyau (construite une fois, passée partout).
//!
//! - max_denominateur : borne de la recherche de Stern–Brocot
//! - format_exposant  : suffixe 10^E à l’affichage humain
//! - tolerance        : si présente, approximation pilotée par tolérance
//! - politique        : comportement de la pile vide

use std::fmt;
use std::str::FromStr;

use super::erreur::ErreurCalcul;
use super::pile::PolitiqueSousPile;

pub const MAX_DENOMINATEUR_DEFAUT: i64 = 1000;

/// Borne haute du dénominateur (recherche en O(max) dans le pire cas).
pub const MAX_DENOMINATEUR_PLAFOND: i64 = 1 << 24;

/// Suffixe d’exposant base 10.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FormatExposant {
    /// `*pow(10,E)`
    #[default]
    Pow,
    /// `*exp10(E)`
    Exp10,
    /// `*10^(E)` (langages de haut niveau)
    Puissance,
    /// `\times 10^{E}`
    Latex,
    /// `×10^(E)`
    Unicode,
}

impl FormatExposant {
    pub fn suffixe(&self, e: i32) -> String {
        match self {
            FormatExposant::Pow => format!("*pow(10,{e})"),
            FormatExposant::Exp10 => format!("*exp10({e})"),
            FormatExposant::Puissance => format!("*10^({e})"),
            FormatExposant::Latex => format!("\\times 10^{{{e}}}"),
            FormatExposant::Unicode => format!("×10^({e})"),
        }
    }
}

impl FromStr for FormatExposant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pow" => Ok(FormatExposant::Pow),
            "exp10" => Ok(FormatExposant::Exp10),
            "puissance" | "^" => Ok(FormatExposant::Puissance),
            "latex" => Ok(FormatExposant::Latex),
            "unicode" => Ok(FormatExposant::Unicode),
            autre => Err(format!(
                "format d’exposant inconnu: {autre} (pow, exp10, puissance, latex, unicode)"
            )),
        }
    }
}

impl fmt::Display for FormatExposant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FormatExposant::Pow => "pow",
            FormatExposant::Exp10 => "exp10",
            FormatExposant::Puissance => "puissance",
            FormatExposant::Latex => "latex",
            FormatExposant::Unicode => "unicode",
        };
        f.write_str(s)
    }
}

/// Budget de précision pour l’approximation par tolérance :
/// on s’arrête quand |médiante - x| <= absolue + relative * x.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    absolue: f64,
    relative: f64,
}

impl Tolerance {
    pub fn new(absolue: f64, relative: f64) -> Result<Self, ErreurCalcul> {
        let valide = absolue.is_finite()
            && relative.is_finite()
            && absolue >= 0.0
            && relative >= 0.0
            && (absolue > 0.0 || relative > 0.0);
        if !valide {
            return Err(ErreurCalcul::ToleranceInvalide { absolue, relative });
        }
        Ok(Tolerance { absolue, relative })
    }

    pub fn absolue(&self) -> f64 {
        self.absolue
    }

    pub fn relative(&self) -> f64 {
        self.relative
    }

    /// Seuil accepté autour de `x`.
    pub fn seuil(&self, x: f64) -> f64 {
        self.absolue + x.abs() * self.relative
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    pub max_denominateur: i64,
    pub format_exposant: FormatExposant,
    pub tolerance: Option<Tolerance>,
    pub politique: PolitiqueSousPile,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            max_denominateur: MAX_DENOMINATEUR_DEFAUT,
            format_exposant: FormatExposant::default(),
            tolerance: None,
            politique: PolitiqueSousPile::default(),
        }
    }
}

// src/noyau/erreur.rs
//
// Erreurs du noyau.
// - ErreurCalcul    : ce qui peut échouer dans une opération (arith, approx, pile, lecture)
// - ErreurEvaluation : la même chose, rattachée au jeton fautif du programme
//
// Le noyau n’arrête jamais le processus : c’est main.rs qui décide (code de sortie).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErreurCalcul {
    #[error("fonction inconnue: {0}")]
    FonctionInconnue(String),

    #[error("opérateur inconnu: {0}")]
    OperateurInconnu(String),

    #[error("division par zéro")]
    DivisionParZero,

    #[error("littéral invalide: {0}")]
    LitteralInvalide(String),

    #[error("valeur non finie ({valeur}) après {operation}")]
    NonFini { operation: String, valeur: f64 },

    #[error("débordement entier dans {0}")]
    Debordement(&'static str),

    #[error("pile vide")]
    PileVide,

    #[error("tolérance invalide (absolue={absolue}, relative={relative})")]
    ToleranceInvalide { absolue: f64, relative: f64 },
}

impl ErreurCalcul {
    /// Code de sortie du binaire, un par famille d’erreur.
    pub fn code_sortie(&self) -> u8 {
        match self {
            ErreurCalcul::FonctionInconnue(_) | ErreurCalcul::OperateurInconnu(_) => 3,
            ErreurCalcul::DivisionParZero => 4,
            ErreurCalcul::LitteralInvalide(_) => 5,
            ErreurCalcul::NonFini { .. } => 6,
            ErreurCalcul::Debordement(_) => 7,
            ErreurCalcul::PileVide => 8,
            ErreurCalcul::ToleranceInvalide { .. } => 9,
        }
    }
}

/// Erreur d’évaluation : position (1-based) et texte du jeton fautif.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("jeton {position} ({jeton:?}): {source}")]
pub struct ErreurEvaluation {
    pub position: usize,
    pub jeton: String,
    #[source]
    pub source: ErreurCalcul,
}

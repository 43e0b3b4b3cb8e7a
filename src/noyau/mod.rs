//! Noyau de la calculatrice hybride (entier + fraction + correction flottante, ×10^E)
//!
//! Organisation interne :
//! - nombre.rs   : représentation hybride + réduction canonique
//! - approx.rs   : flottant -> nombre hybride (Stern-Brocot, borné ou à tolérance)
//! - arith.rs    : alignement d’exposants, somme, produit, inverse, écart
//! - pile.rs     : pile d’opérandes + politique de sous-pile
//! - jetons.rs   : découpage et classement des jetons
//! - eval.rs     : évaluation postfixée complète
//! - format.rs   : affichages humain / brut / flottant (%g)
//! - config.rs   : réglages (dénominateur max, exposant, tolérance)
//! - erreur.rs   : erreurs typées + codes de sortie

pub mod approx;
pub mod arith;
pub mod config;
pub mod erreur;
pub mod eval;
pub mod format;
pub mod jetons;
pub mod nombre;
pub mod pile;

#[cfg(test)]
mod tests_scientifiques;


// API publique minimale
pub use eval::evaluer;

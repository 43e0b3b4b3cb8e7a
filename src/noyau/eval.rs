//! Noyau : évaluation d’un programme postfixé (notation polonaise inversée)
//!
//! Une seule passe, de gauche à droite : chaque jeton est classé (jetons.rs),
//! consomme ses opérandes sur la pile et y dépose exactement un résultat.
//!
//! Ordre des opérandes : le sommet de pile est l’opérande de DROITE
//! ("10 4 /" = 10/4), sauf `\` qui divise le sommet par l’avant-dernier.

use std::cmp::Ordering;

use tracing::debug;

use super::approx::Approximateur;
use super::arith::{comparer, ecart, inverse, produit, puissance_entiere, somme};
use super::config::Configuration;
use super::erreur::{ErreurCalcul, ErreurEvaluation};
use super::jetons::{classer, decouper, Fonction, Jeton, Operateur};
use super::nombre::Nombre;
use super::pile::Pile;

#[derive(Clone, Debug)]
pub struct Evaluateur {
    approx: Approximateur,
    pile: Pile,
}

impl Evaluateur {
    pub fn new(config: &Configuration) -> Self {
        Self {
            approx: Approximateur::depuis_config(config),
            pile: Pile::new(config.politique),
        }
    }

    pub fn pile(&self) -> &Pile {
        &self.pile
    }

    pub fn into_pile(self) -> Pile {
        self.pile
    }

    /// Évalue le programme sur la pile courante (elle n’est pas vidée avant).
    /// S’arrête au premier jeton fautif, qui est nommé dans l’erreur.
    pub fn evaluer(&mut self, programme: &str) -> Result<(), ErreurEvaluation> {
        for (i, texte) in decouper(programme).enumerate() {
            self.pas(texte).map_err(|source| ErreurEvaluation {
                position: i + 1,
                jeton: texte.to_string(),
                source,
            })?;
        }
        Ok(())
    }

    fn pas(&mut self, texte: &str) -> Result<(), ErreurCalcul> {
        let jeton = classer(texte)?;
        debug!(%jeton, profondeur = self.pile.len(), "jeton");

        let z = match jeton {
            Jeton::Nombre(z) => z,
            Jeton::Flottant(x) => self.approx.approximer(x)?,
            Jeton::Operateur(op) => self.operateur(op)?,
            Jeton::Fonction(f) => self.fonction(f)?,
        };
        self.pile.empiler(z);
        Ok(())
    }

    fn operateur(&mut self, op: Operateur) -> Result<Nombre, ErreurCalcul> {
        use Operateur::*;

        match op {
            Moins => self.pile.depiler()?.oppose(),
            Inverse => inverse(self.pile.depiler()?, &self.approx),

            Plus => {
                let (a, b) = self.pile.depiler_paire()?;
                somme(a, b)
            }
            Fois => {
                let (a, b) = self.pile.depiler_paire()?;
                produit(a, b)
            }
            Divise => {
                let (a, b) = self.pile.depiler_paire()?;
                produit(a, inverse(b, &self.approx)?)
            }
            DiviseInverse => {
                let (a, b) = self.pile.depiler_paire()?;
                produit(inverse(a, &self.approx)?, b)
            }

            Puissance => {
                let (base, e) = self.pile.depiler_paire()?;
                self.reel("^", base.valeur().powf(e.valeur()))
            }
            PuissanceEntiere => {
                let (base, e) = self.pile.depiler_paire()?;
                let n = e.valeur().round() as i64;
                self.reel("**", puissance_entiere(base.valeur(), n))
            }

            Inferieur => self.comparaison(|o| o == Ordering::Less),
            Superieur => self.comparaison(|o| o == Ordering::Greater),
            Egal | EgalEgal => self.comparaison(|o| o == Ordering::Equal),
            InferieurEgal => self.comparaison(|o| o != Ordering::Greater),
            SuperieurEgal => self.comparaison(|o| o != Ordering::Less),
        }
    }

    fn fonction(&mut self, f: Fonction) -> Result<Nombre, ErreurCalcul> {
        match f.reelle() {
            Some(g) => {
                let x = self.pile.depiler()?;
                self.reel(f.nom(), g(x.valeur()))
            }
            None => {
                let (a, b) = self.pile.depiler_paire()?;
                ecart(a, b)
            }
        }
    }

    fn comparaison(&mut self, test: impl Fn(Ordering) -> bool) -> Result<Nombre, ErreurCalcul> {
        let (a, b) = self.pile.depiler_paire()?;
        Ok(Nombre::booleen(comparer(&a, &b).is_some_and(test)))
    }

    /// Résultat flottant d’une opération -> nombre hybride.
    fn reel(&self, operation: &str, v: f64) -> Result<Nombre, ErreurCalcul> {
        if !v.is_finite() {
            return Err(ErreurCalcul::NonFini {
                operation: operation.to_string(),
                valeur: v,
            });
        }
        self.approx.approximer(v)
    }
}

/// API publique : évalue un programme sur une pile neuve et rend la pile
/// (du fond vers le sommet).
pub fn evaluer(programme: &str, config: &Configuration) -> Result<Vec<Nombre>, ErreurEvaluation> {
    let mut ev = Evaluateur::new(config);
    ev.evaluer(programme)?;
    Ok(ev.into_pile().into_vec())
}

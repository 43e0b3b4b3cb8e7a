// src/noyau/pile.rs
//
// Pile de nombres hybrides (dernier entré, premier sorti).
// - croissance par incrément fixe quand la capacité est atteinte
// - pile vide : selon la politique, erreur explicite ou ZERO implicite

use super::erreur::ErreurCalcul;
use super::nombre::{Nombre, ZERO};

const CAPACITE_INITIALE: usize = 32;
const INCREMENT: usize = 8;

/// Que faire quand on dépile une pile vide ?
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PolitiqueSousPile {
    /// `ErreurCalcul::PileVide`
    #[default]
    Erreur,
    /// ZERO, indéfiniment (compatibilité avec l’ancien comportement)
    Zero,
}

#[derive(Clone, Debug)]
pub struct Pile {
    elements: Vec<Nombre>,
    politique: PolitiqueSousPile,
}

impl Default for Pile {
    fn default() -> Self {
        Self::new(PolitiqueSousPile::default())
    }
}

impl Pile {
    pub fn new(politique: PolitiqueSousPile) -> Self {
        Self {
            elements: Vec::with_capacity(CAPACITE_INITIALE),
            politique,
        }
    }

    pub fn empiler(&mut self, z: Nombre) {
        if self.elements.len() == self.elements.capacity() {
            self.elements.reserve_exact(INCREMENT);
        }
        self.elements.push(z);
    }

    pub fn depiler(&mut self) -> Result<Nombre, ErreurCalcul> {
        match (self.elements.pop(), self.politique) {
            (Some(z), _) => Ok(z),
            (None, PolitiqueSousPile::Zero) => Ok(ZERO),
            (None, PolitiqueSousPile::Erreur) => Err(ErreurCalcul::PileVide),
        }
    }

    /// Dépile deux valeurs : (avant-dernière, dernière).
    /// Le sommet est l’opérande de droite.
    pub fn depiler_paire(&mut self) -> Result<(Nombre, Nombre), ErreurCalcul> {
        let b = self.depiler()?;
        let a = self.depiler()?;
        Ok((a, b))
    }

    pub fn sommet(&self) -> Option<&Nombre> {
        self.elements.last()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Éléments du fond vers le sommet (ordre d’empilement).
    pub fn into_vec(self) -> Vec<Nombre> {
        self.elements
    }
}

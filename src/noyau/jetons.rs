// src/noyau/jetons.rs
//
// Tokenisation d’un programme postfixé.
// - commentaire : tout ce qui suit le premier '#'
// - jetons séparés par des blancs
// - chaque jeton est classé une fois pour toutes (pas de devinette sur la longueur) :
//     a;n;d;e     -> Nombre (littéral rationnel)
//     1.5  2e-3   -> Flottant (sera approximé)
//     -42         -> Nombre (entier exact)
//     sin, diff   -> Fonction (identifiant, quelle que soit sa longueur)
//     + ** <=     -> Operateur (table explicite)

use std::fmt;

use super::erreur::ErreurCalcul;
use super::nombre::Nombre;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operateur {
    Plus,
    Moins,
    Fois,
    Divise,
    DiviseInverse, // \ : sommet / avant-dernier
    Puissance,     // ^  : réel
    PuissanceEntiere,
    Inferieur,
    Superieur,
    Egal,
    InferieurEgal,
    SuperieurEgal,
    EgalEgal,
    Inverse, // @
}

impl Operateur {
    pub const TOUS: [Operateur; 14] = [
        Operateur::Plus,
        Operateur::Moins,
        Operateur::Fois,
        Operateur::Divise,
        Operateur::DiviseInverse,
        Operateur::Puissance,
        Operateur::PuissanceEntiere,
        Operateur::Inferieur,
        Operateur::Superieur,
        Operateur::Egal,
        Operateur::InferieurEgal,
        Operateur::SuperieurEgal,
        Operateur::EgalEgal,
        Operateur::Inverse,
    ];

    pub fn symbole(&self) -> &'static str {
        match self {
            Operateur::Plus => "+",
            Operateur::Moins => "-",
            Operateur::Fois => "*",
            Operateur::Divise => "/",
            Operateur::DiviseInverse => "\\",
            Operateur::Puissance => "^",
            Operateur::PuissanceEntiere => "**",
            Operateur::Inferieur => "<",
            Operateur::Superieur => ">",
            Operateur::Egal => "=",
            Operateur::InferieurEgal => "<=",
            Operateur::SuperieurEgal => ">=",
            Operateur::EgalEgal => "==",
            Operateur::Inverse => "@",
        }
    }

    pub fn depuis_symbole(s: &str) -> Option<Self> {
        Self::TOUS.iter().copied().find(|op| op.symbole() == s)
    }
}

/// Fonctions nommées. Toutes réelles (f64 -> f64, puis ré-approximation), sauf `diff`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Exp,
    Log,
    Log10,
    Log2,
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    Diff,
}

impl Fonction {
    pub const TOUTES: [Fonction; 11] = [
        Fonction::Exp,
        Fonction::Log,
        Fonction::Log10,
        Fonction::Log2,
        Fonction::Sin,
        Fonction::Cos,
        Fonction::Tan,
        Fonction::Sinh,
        Fonction::Cosh,
        Fonction::Tanh,
        Fonction::Diff,
    ];

    pub fn nom(&self) -> &'static str {
        match self {
            Fonction::Exp => "exp",
            Fonction::Log => "log",
            Fonction::Log10 => "log10",
            Fonction::Log2 => "log2",
            Fonction::Sin => "sin",
            Fonction::Cos => "cos",
            Fonction::Tan => "tan",
            Fonction::Sinh => "sinh",
            Fonction::Cosh => "cosh",
            Fonction::Tanh => "tanh",
            Fonction::Diff => "diff",
        }
    }

    pub fn depuis_nom(nom: &str) -> Option<Self> {
        Self::TOUTES.iter().copied().find(|f| f.nom() == nom)
    }

    /// Application réelle ; None pour `diff` (binaire, exacte).
    pub fn reelle(&self) -> Option<fn(f64) -> f64> {
        let f: fn(f64) -> f64 = match self {
            Fonction::Exp => f64::exp,
            Fonction::Log => f64::ln,
            Fonction::Log10 => f64::log10,
            Fonction::Log2 => f64::log2,
            Fonction::Sin => f64::sin,
            Fonction::Cos => f64::cos,
            Fonction::Tan => f64::tan,
            Fonction::Sinh => f64::sinh,
            Fonction::Cosh => f64::cosh,
            Fonction::Tanh => f64::tanh,
            Fonction::Diff => return None,
        };
        Some(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Jeton {
    /// Littéral exact (rationnel a;n;d;e ou entier).
    Nombre(Nombre),
    /// Littéral flottant, à approximer.
    Flottant(f64),
    Operateur(Operateur),
    Fonction(Fonction),
}

impl fmt::Display for Jeton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Jeton::Nombre(z) => write!(f, "{};{};{};{}", z.entier, z.num, z.den, z.exposant),
            Jeton::Flottant(x) => write!(f, "{x:?}"),
            Jeton::Operateur(op) => f.write_str(op.symbole()),
            Jeton::Fonction(fct) => f.write_str(fct.nom()),
        }
    }
}

/// Retire le commentaire puis découpe sur les blancs.
pub fn decouper(programme: &str) -> impl Iterator<Item = &str> {
    let code = programme.split('#').next().unwrap_or("");
    code.split_whitespace()
}

/// Classe un jeton isolé (non vide, sans blanc).
pub fn classer(t: &str) -> Result<Jeton, ErreurCalcul> {
    if t.contains(';') {
        return lire_rationnel(t).map(Jeton::Nombre);
    }

    if ressemble_flottant(t) {
        return t
            .parse::<f64>()
            .map(Jeton::Flottant)
            .map_err(|_| ErreurCalcul::LitteralInvalide(t.to_string()));
    }

    if ressemble_entier(t) {
        // au-delà de 64 bits : on passe par l’approximation
        return Ok(match t.parse::<i64>() {
            Ok(n) => Jeton::Nombre(Nombre::entier(n)),
            Err(_) => Jeton::Flottant(
                t.parse::<f64>()
                    .map_err(|_| ErreurCalcul::LitteralInvalide(t.to_string()))?,
            ),
        });
    }

    if t.starts_with(|c: char| c.is_ascii_alphabetic()) {
        let nom = t.to_lowercase();
        return Fonction::depuis_nom(&nom)
            .map(Jeton::Fonction)
            .ok_or(ErreurCalcul::FonctionInconnue(nom));
    }

    // commence comme un nombre sans en être un : 12abc, 1e
    if sans_signe(t).starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ErreurCalcul::LitteralInvalide(t.to_string()));
    }

    Operateur::depuis_symbole(t)
        .map(Jeton::Operateur)
        .ok_or_else(|| ErreurCalcul::OperateurInconnu(t.to_string()))
}

fn sans_signe(t: &str) -> &str {
    t.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(t)
}

/// signe? chiffres
fn ressemble_entier(t: &str) -> bool {
    let corps = sans_signe(t);
    !corps.is_empty() && corps.bytes().all(|b| b.is_ascii_digit())
}

/// signe? puis chiffre ou '.', et ('.' présent ou e/E entre un chiffre et un chiffre/signe)
fn ressemble_flottant(t: &str) -> bool {
    let corps = sans_signe(t).as_bytes();
    match corps.first() {
        Some(c) if c.is_ascii_digit() || *c == b'.' => {}
        _ => return false,
    }
    if corps.contains(&b'.') {
        return true;
    }
    corps.windows(3).any(|w| {
        w[0].is_ascii_digit()
            && (w[1] == b'e' || w[1] == b'E')
            && (w[2].is_ascii_digit() || w[2] == b'+' || w[2] == b'-')
    })
}

/// Littéral rationnel `A[;N[;D[;E]]]`.
/// - N, D absents => 0/1 ; E absent => 0
/// - le signe de A (texte, donc aussi "-0") est reporté sur N
/// - D négatif : signe reporté sur N
/// - fraction impropre : repliée dans l’entier (reduire)
pub fn lire_rationnel(t: &str) -> Result<Nombre, ErreurCalcul> {
    let invalide = || ErreurCalcul::LitteralInvalide(t.to_string());

    let champs: Vec<&str> = t.split(';').map(str::trim).collect();
    if champs.len() > 4 {
        return Err(invalide());
    }

    let a_txt = champs[0];
    let entier: i64 = a_txt.parse().map_err(|_| invalide())?;
    let negatif = a_txt.starts_with('-');

    let optionnel = |i: usize| champs.get(i).copied().filter(|s| !s.is_empty());

    let num: i64 = match optionnel(1) {
        Some(s) => s.parse().map_err(|_| invalide())?,
        None => 0,
    };
    let den: i64 = match optionnel(2) {
        Some(s) => s.parse().map_err(|_| invalide())?,
        None => 1,
    };
    let exposant: i32 = match optionnel(3) {
        Some(s) => s.parse().map_err(|_| invalide())?,
        None => 0,
    };

    if den == 0 {
        return Err(invalide());
    }

    let num = if negatif {
        num.checked_neg().ok_or_else(invalide)?
    } else {
        num
    };

    Ok(Nombre {
        entier,
        num,
        den,
        exposant,
        correction: 0.0,
    }
    .reduire()?)
}

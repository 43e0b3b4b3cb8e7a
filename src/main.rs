// src/main.rs
//
// Calculatrice hybride : point d’entrée en ligne de commande
// ----------------------------------------------------------
// - un programme postfixé (argument ou -e)
// - chaque élément de la pile finale est affiché, du fond vers le sommet
// - erreurs : une ligne sur stderr + code de sortie propre à la famille

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use structopt::clap::AppSettings;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

mod noyau;

use noyau::config::{
    Configuration, FormatExposant, Tolerance, MAX_DENOMINATEUR_DEFAUT, MAX_DENOMINATEUR_PLAFOND,
};
use noyau::erreur::ErreurCalcul;
use noyau::format::Sortie;
use noyau::nombre::Nombre;
use noyau::pile::PolitiqueSousPile;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "calculatrice_hybride",
    about = "Calculatrice RPN sur nombres hybrides (entier + fraction + correction) ×10^E",
    // un programme peut commencer par un nombre négatif : "-2 3 +"
    setting = AppSettings::AllowLeadingHyphen
)]
struct Opt {
    /// Affichage brut A;N;D;E
    #[structopt(short = "r", long = "brut")]
    brut: bool,

    /// Affichage en flottant seul
    #[structopt(short = "d", long = "flottant", conflicts_with = "brut")]
    flottant: bool,

    /// Programme à évaluer (prioritaire sur l’argument positionnel)
    #[structopt(short = "e", long = "programme", allow_hyphen_values = true)]
    programme_e: Option<String>,

    /// Dénominateur maximal de l’approximation
    #[structopt(long, default_value = "1000")]
    max_denominateur: i64,

    /// Suffixe d’exposant : pow, exp10, puissance, latex, unicode
    #[structopt(long, default_value = "pow")]
    exposant: FormatExposant,

    /// Tolérance absolue (active l’approximation par tolérance)
    #[structopt(long)]
    tolerance_absolue: Option<f64>,

    /// Tolérance relative (active l’approximation par tolérance)
    #[structopt(long)]
    tolerance_relative: Option<f64>,

    /// Pile vide : rendre 0 au lieu d’échouer
    #[structopt(long)]
    zero_implicite: bool,

    /// Programme à évaluer, ex. "3 4 +"
    programme: Option<String>,
}

impl Opt {
    fn sortie(&self) -> Sortie {
        if self.brut {
            Sortie::Brut
        } else if self.flottant {
            Sortie::Flottant
        } else {
            Sortie::Humain
        }
    }

    fn configuration(&self) -> Result<Configuration, ErreurCalcul> {
        let tolerance = match (self.tolerance_absolue, self.tolerance_relative) {
            (None, None) => None,
            (a, r) => Some(Tolerance::new(a.unwrap_or(0.0), r.unwrap_or(0.0))?),
        };
        let max_denominateur = match self.max_denominateur {
            m if m < 1 => {
                tracing::warn!(demande = m, "dénominateur maximal invalide, valeur par défaut");
                MAX_DENOMINATEUR_DEFAUT
            }
            m if m > MAX_DENOMINATEUR_PLAFOND => {
                tracing::warn!(
                    demande = m,
                    plafond = MAX_DENOMINATEUR_PLAFOND,
                    "dénominateur maximal ramené au plafond"
                );
                MAX_DENOMINATEUR_PLAFOND
            }
            m => m,
        };
        if let Some(t) = tolerance {
            tracing::debug!(
                absolue = t.absolue(),
                relative = t.relative(),
                "approximation par tolérance"
            );
        }
        Ok(Configuration {
            max_denominateur,
            format_exposant: self.exposant,
            tolerance,
            politique: if self.zero_implicite {
                PolitiqueSousPile::Zero
            } else {
                PolitiqueSousPile::Erreur
            },
        })
    }
}

fn installer_traces() {
    let filtre = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filtre)
        .with_writer(io::stderr)
        .init();
}

fn afficher(pile: &[Nombre], sortie: Sortie, config: &Configuration) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for z in pile {
        writeln!(out, "{}", sortie.rendre(z, config.format_exposant))
            .context("écriture sur la sortie standard")?;
    }
    out.flush().context("écriture sur la sortie standard")?;
    Ok(())
}

fn main() -> ExitCode {
    // Sans aucun argument : usage, échec.
    if std::env::args_os().len() <= 1 {
        let mut app = Opt::clap();
        let _ = app.write_help(&mut io::stderr());
        eprintln!();
        return ExitCode::FAILURE;
    }

    let opt = Opt::from_args();
    installer_traces();

    let config = match opt.configuration() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(erreur = %e, "configuration refusée");
            eprintln!("erreur: {e}");
            return ExitCode::from(e.code_sortie());
        }
    };

    let programme = opt
        .programme_e
        .as_deref()
        .or(opt.programme.as_deref())
        .unwrap_or("");

    let pile = match noyau::evaluer(programme, &config) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(position = e.position, jeton = %e.jeton, "évaluation interrompue");
            eprintln!("erreur: {e}");
            return ExitCode::from(e.source.code_sortie());
        }
    };

    match afficher(&pile, opt.sortie(), &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("erreur: {e:#}");
            ExitCode::FAILURE
        }
    }
}

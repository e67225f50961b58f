// src/noyau/format.rs

//! Formatage numérique du moteur : précision, bornes d’exposant, notation.
//!
//! C’est la primitive “brute” : pas de groupement, pas de séparateur local.
//! Le pipeline d’affichage (affichage.rs) repasse ensuite sur chaque scalaire.

use serde::Deserialize;

use super::lecture::{chiffres_significatifs, decimales_fixes};
use super::valeur::Nombre;

/// Précision des rationnels quand aucune n’est configurée.
pub const PRECISION_RATIONNEL: usize = 64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum Notation {
    /// Positionnel entre les bornes, exponentiel ailleurs.
    #[default]
    #[serde(rename = "auto")]
    Auto,
    /// `precision` = chiffres après la virgule.
    #[serde(rename = "fixed")]
    Fixe,
    #[serde(rename = "exponential")]
    Exponentielle,
    /// Exposant multiple de 3.
    #[serde(rename = "engineering")]
    Ingenieur,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionsNotation {
    pub precision: Option<usize>,
    /// Borne basse incluse : |x| >= 10^borne_inf reste positionnel.
    pub borne_inf: i32,
    /// Borne haute exclue : |x| >= 10^borne_sup passe en exponentiel.
    pub borne_sup: i32,
    pub notation: Notation,
}

impl Default for OptionsNotation {
    fn default() -> Self {
        Self {
            precision: None,
            borne_inf: -3,
            borne_sup: 20,
            notation: Notation::Auto,
        }
    }
}

/* ------------------------ Mantisse ------------------------ */

/// |x| ≈ c0.c1c2… × 10^exposant (chiffres non vides).
#[derive(Clone, Debug, PartialEq, Eq)]
struct Mantisse {
    chiffres: String,
    exposant: i32,
}

impl Mantisse {
    fn est_zero(&self) -> bool {
        self.chiffres.bytes().all(|b| b == b'0')
    }

    fn sans_zeros_finaux(mut self) -> Self {
        let garde = self.chiffres.trim_end_matches('0').len();
        if garde == 0 {
            return Mantisse {
                chiffres: "0".into(),
                exposant: 0,
            };
        }
        self.chiffres.truncate(garde);
        self
    }
}

/// Lit la forme `d.ddde±x` produite par `{:e}`.
fn lire_exposant_rust(s: &str) -> Option<Mantisse> {
    let (m, e) = s.split_once('e')?;
    let chiffres: String = m.chars().filter(|c| *c != '.').collect();
    if chiffres.is_empty() || !chiffres.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(Mantisse {
        chiffres,
        exposant: e.parse().ok()?,
    })
}

/// Chiffres significatifs de |n| (précision absente : plus courte écriture exacte).
fn mantisse(n: &Nombre, precision: Option<usize>) -> Option<Mantisse> {
    let precision = precision.filter(|p| *p > 0);
    match n {
        Nombre::Flottant(x) => {
            let s = match precision {
                Some(p) => format!("{:.*e}", p - 1, x.abs()),
                None => format!("{:e}", x.abs()),
            };
            lire_exposant_rust(&s)
        }
        Nombre::Rationnel(r) => {
            let (chiffres, exposant) =
                chiffres_significatifs(r, precision.unwrap_or(PRECISION_RATIONNEL));
            Some(Mantisse { chiffres, exposant })
        }
    }
}

/* ------------------------ Écritures ------------------------ */

fn positionnel(m: &Mantisse) -> String {
    let ch = &m.chiffres;
    if m.exposant < 0 {
        let zeros = "0".repeat((-m.exposant - 1) as usize);
        return format!("0.{zeros}{ch}");
    }

    let n_entiers = m.exposant as usize + 1;
    if ch.len() <= n_entiers {
        format!("{ch}{}", "0".repeat(n_entiers - ch.len()))
    } else {
        format!("{}.{}", &ch[..n_entiers], &ch[n_entiers..])
    }
}

fn suffixe_exposant(e: i32) -> String {
    if e < 0 {
        format!("e-{}", e.unsigned_abs())
    } else {
        format!("e+{e}")
    }
}

fn exponentiel(m: &Mantisse) -> String {
    let (tete, reste) = m.chiffres.split_at(1);
    let exp = suffixe_exposant(m.exposant);
    if reste.is_empty() {
        format!("{tete}{exp}")
    } else {
        format!("{tete}.{reste}{exp}")
    }
}

fn ingenieur(m: &Mantisse) -> String {
    let decalage = m.exposant.rem_euclid(3);
    let tete = positionnel(&Mantisse {
        chiffres: m.chiffres.clone(),
        exposant: decalage,
    });
    format!("{tete}{}", suffixe_exposant(m.exposant - decalage))
}

fn fixe(n: &Nombre, decimales: Option<usize>) -> Option<String> {
    match (n, decimales) {
        (Nombre::Flottant(x), Some(p)) => Some(format!("{:.*}", p, x.abs())),
        // Display f64 : jamais d’exposant, plus courte écriture
        (Nombre::Flottant(x), None) => Some(format!("{}", x.abs())),
        (Nombre::Rationnel(r), Some(p)) => Some(decimales_fixes(r, p)),
        (Nombre::Rationnel(_), None) => {
            mantisse(n, None).map(|m| positionnel(&m.sans_zeros_finaux()))
        }
    }
}

fn non_fini(n: &Nombre) -> Option<String> {
    match n {
        Nombre::Flottant(x) if x.is_nan() => Some("NaN".into()),
        Nombre::Flottant(x) if x.is_infinite() => Some(if x.is_sign_negative() {
            "-Infinity".into()
        } else {
            "Infinity".into()
        }),
        _ => None,
    }
}

/* ------------------------ API ------------------------ */

/// Formate un scalaire comme le moteur (pas de groupement, point décimal `.`).
pub fn formater_nombre(n: &Nombre, options: &OptionsNotation) -> String {
    if let Some(special) = non_fini(n) {
        return special;
    }

    let corps = match options.notation {
        Notation::Fixe => fixe(n, options.precision),
        Notation::Exponentielle => mantisse(n, options.precision).map(|m| exponentiel(&m)),
        Notation::Ingenieur => mantisse(n, options.precision).map(|m| ingenieur(&m)),
        Notation::Auto => mantisse(n, options.precision).map(|m| {
            let m = m.sans_zeros_finaux();
            let dans_bornes = (options.borne_inf..options.borne_sup).contains(&m.exposant);
            if m.est_zero() || dans_bornes {
                positionnel(&m)
            } else {
                exponentiel(&m)
            }
        }),
    };

    match corps {
        Some(c) if n.est_negatif() => format!("-{c}"),
        Some(c) => c,
        None => n.to_string(),
    }
}

// src/noyau/affichage.rs

//! Affichage des résultats : valeur du moteur -> texte pour l’utilisateur.
//!
//! Par scalaire : format moteur -> zéros finaux -> marque décimale
//! -> groupement -> séparateur décimal local.
//! Puis, sur la chaîne entière : `5 USD` -> `$5` si la devise locale est active.

use std::fmt::Write;

use chrono::{NaiveDateTime, Timelike};
use regex::Regex;
use tracing::warn;

use super::balayage::{est_mot, remplacer_garde};
use super::format::formater_nombre;
use super::valeur::{Nombre, Valeur};
use crate::reglages::{ReglagesFormat, FORMAT_DATE, FORMAT_DATE_HEURE};

/// Marque temporaire du point décimal (zone privée Unicode, jamais produite par le moteur).
const MARQUE_DECIMALE: char = '\u{E000}';

/* ------------------------ Dates ------------------------ */

fn rendre_date(d: &NaiveDateTime, motif: &str) -> Option<String> {
    let mut s = String::new();
    write!(s, "{}", d.format(motif)).ok()?;
    Some(s)
}

/// Date seule si l’heure est à zéro (h, min, s, sous-seconde), date + heure sinon.
pub fn formater_date(d: &NaiveDateTime, reglages: &ReglagesFormat) -> String {
    let avec_heure = d.hour() != 0 || d.minute() != 0 || d.second() != 0 || d.nanosecond() != 0;

    let (motif, defaut) = if avec_heure {
        (&reglages.format_date_heure, FORMAT_DATE_HEURE)
    } else {
        (&reglages.format_date, FORMAT_DATE)
    };

    rendre_date(d, motif)
        .or_else(|| {
            warn!(%motif, "motif de date inutilisable, retour au motif par défaut");
            rendre_date(d, defaut)
        })
        .unwrap_or_else(|| d.to_string())
}

/* ------------------------ Scalaires ------------------------ */

fn chiffres(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn separer_signe(s: &str) -> (&str, &str) {
    match s.chars().next() {
        Some('-' | '+') => s.split_at(1),
        _ => ("", s),
    }
}

/// `[signe]chiffres.chiffres` : retire les zéros finaux, puis le point s’il reste seul.
fn retirer_zeros_finaux(s: &str) -> String {
    let (_, corps) = separer_signe(s);
    match corps.split_once('.') {
        Some((ent, frac)) if chiffres(ent) && chiffres(frac) => {
            let t = s.trim_end_matches('0');
            t.strip_suffix('.').unwrap_or(t).to_string()
        }
        _ => s.to_string(),
    }
}

/// `[signe]chiffres[<marque>chiffres]` : virgule fixe simple, sans exposant.
fn est_fixe_simple(s: &str) -> bool {
    let (_, corps) = separer_signe(s);
    match corps.split_once(MARQUE_DECIMALE) {
        Some((ent, frac)) => chiffres(ent) && chiffres(frac),
        None => chiffres(corps),
    }
}

/// Insère `symbole` tous les 3 chiffres de la partie entière (jamais après la marque).
fn grouper(s: &str, symbole: &str) -> String {
    let (signe, corps) = separer_signe(s);
    let (entier, reste) = match corps.find(MARQUE_DECIMALE) {
        Some(i) => corps.split_at(i),
        None => (corps, ""),
    };

    let mut out = String::with_capacity(s.len() + entier.len() / 3 * symbole.len());
    out.push_str(signe);
    for (i, c) in entier.chars().enumerate() {
        if i > 0 && (entier.len() - i) % 3 == 0 {
            out.push_str(symbole);
        }
        out.push(c);
    }
    out.push_str(reste);
    out
}

/// Pipeline d’un scalaire.
pub fn formater_scalaire(n: &Nombre, reglages: &ReglagesFormat) -> String {
    let brut = formater_nombre(n, &reglages.options_notation());

    let brut = if reglages.suppr_zeros_finaux {
        retirer_zeros_finaux(&brut)
    } else {
        brut
    };

    let marque = brut.replace('.', MARQUE_DECIMALE.encode_utf8(&mut [0; 4]));

    let groupe = match reglages.symbole_groupement() {
        Some(symbole) if est_fixe_simple(&marque) => grouper(&marque, symbole),
        _ => marque,
    };

    groupe.replace(MARQUE_DECIMALE, &reglages.separateur_decimal)
}

/* ------------------------ Composites ------------------------ */

fn rendre(valeur: &Valeur, reglages: &ReglagesFormat) -> String {
    match valeur {
        Valeur::Nombre(n) => formater_scalaire(n, reglages),
        Valeur::Unite { valeur, unite } if unite.is_empty() => formater_scalaire(valeur, reglages),
        Valeur::Unite { valeur, unite } => {
            format!("{} {unite}", formater_scalaire(valeur, reglages))
        }
        Valeur::Matrice(elements) => {
            let parties: Vec<String> = elements.iter().map(|e| rendre(e, reglages)).collect();
            format!("[{}]", parties.join(", "))
        }
        Valeur::Date(d) => formater_date(d, reglages),
    }
}

/* ------------------------ Devise locale ------------------------ */

/// `1,234.5 USD` -> `$1,234.5` (le signe reste devant le symbole).
///
/// Un symbole de groupement n’appartient au montant que s’il est suivi de trois
/// chiffres : `[1, 2 USD]` sous groupement " " ne lit pas `1, 2` comme un montant.
fn reafficher_devise(texte: &str, reglages: &ReglagesFormat) -> String {
    let entier = match reglages.symbole_groupement() {
        Some(symbole) => format!(r"(?:[0-9]{{1,3}}(?:{}[0-9]{{3}})+|[0-9]+)", regex::escape(symbole)),
        None => "[0-9]+".to_string(),
    };

    let source = format!(
        r"({entier}(?:{}[0-9]+)?(?:e[+\-][0-9]+)?) {}\b",
        regex::escape(&reglages.separateur_decimal),
        regex::escape(&reglages.code_devise_locale)
    );

    let re = match Regex::new(&source) {
        Ok(re) => re,
        Err(err) => {
            warn!(%source, %err, "motif de devise refusé");
            return texte.to_string();
        }
    };

    let symbole = &reglages.symbole_devise_locale;
    remplacer_garde(
        &re,
        texte,
        |avant, _, _| !avant.chars().last().is_some_and(est_mot),
        |c| format!("{symbole}{}", &c[1]),
    )
}

/* ------------------------ API ------------------------ */

/// Rend une valeur du moteur pour l’affichage.
pub fn formater(valeur: &Valeur, reglages: &ReglagesFormat) -> String {
    if let Valeur::Date(d) = valeur {
        return formater_date(d, reglages);
    }

    let texte = rendre(valeur, reglages);
    if reglages.convertir_devise_locale {
        reafficher_devise(&texte, reglages)
    } else {
        texte
    }
}
